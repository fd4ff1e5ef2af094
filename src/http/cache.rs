//! Validators for conditional requests

use std::time::{SystemTime, UNIX_EPOCH};

/// Cache-Control sent with static files
pub const STATIC_CACHE_CONTROL: &str = "public, max-age=3600";

/// Build an `ETag` from file size and modification time
///
/// Changes whenever the file is rewritten.
pub fn etag_for(len: u64, modified: Option<SystemTime>) -> String {
    let nanos = modified
        .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
        .map_or(0, |d| d.as_nanos());
    format!("\"{len:x}-{nanos:x}\"")
}

/// Whether `If-None-Match` names `etag` (or `*`)
pub fn etag_matches(if_none_match: Option<&str>, etag: &str) -> bool {
    if_none_match.is_some_and(|header| {
        header.split(',').map(str::trim).any(|candidate| {
            candidate == "*" || candidate.strip_prefix("W/").unwrap_or(candidate) == etag
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_etag_changes_with_inputs() {
        let t = UNIX_EPOCH + Duration::from_secs(1_700_000_000);
        let base = etag_for(10, Some(t));
        assert_eq!(base, etag_for(10, Some(t)));
        assert_ne!(base, etag_for(11, Some(t)));
        assert_ne!(base, etag_for(10, Some(t + Duration::from_secs(1))));
        assert!(base.starts_with('"') && base.ends_with('"'));
    }

    #[test]
    fn test_etag_matches() {
        let etag = "\"a-1\"";
        assert!(etag_matches(Some("\"a-1\""), etag));
        assert!(etag_matches(Some("\"zz\", W/\"a-1\""), etag));
        assert!(etag_matches(Some("*"), etag));
        assert!(!etag_matches(Some("\"a-2\""), etag));
        assert!(!etag_matches(None, etag));
    }
}
