//! Single byte-range parsing (RFC 9110 §14)

/// Inclusive byte span inside a representation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange {
    pub start: usize,
    pub end: usize,
}

impl ByteRange {
    pub const fn content_length(self) -> usize {
        self.end - self.start + 1
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum RangeOutcome {
    /// No usable Range header; send the whole body
    Full,
    Partial(ByteRange),
    /// Answer 416
    Unsatisfiable,
}

/// Interpret a `Range` header against a body of `len` bytes
///
/// Multi-range requests, other units and malformed values yield
/// [`RangeOutcome::Full`].
pub fn resolve(header: Option<&str>, len: usize) -> RangeOutcome {
    let Some(set) = header.and_then(|h| h.trim().strip_prefix("bytes=")) else {
        return RangeOutcome::Full;
    };
    if set.contains(',') {
        return RangeOutcome::Full;
    }
    let Some((first, last)) = set.split_once('-') else {
        return RangeOutcome::Full;
    };
    let (first, last) = (first.trim(), last.trim());

    if first.is_empty() {
        // suffix form: last N bytes
        return match last.parse::<usize>() {
            Ok(0) => RangeOutcome::Unsatisfiable,
            Ok(_) if len == 0 => RangeOutcome::Unsatisfiable,
            Ok(n) => RangeOutcome::Partial(ByteRange {
                start: len.saturating_sub(n),
                end: len - 1,
            }),
            Err(_) => RangeOutcome::Full,
        };
    }

    let Ok(start) = first.parse::<usize>() else {
        return RangeOutcome::Full;
    };
    if start >= len {
        return RangeOutcome::Unsatisfiable;
    }
    let end = if last.is_empty() {
        len - 1
    } else {
        match last.parse::<usize>() {
            Ok(end) if end < start => return RangeOutcome::Unsatisfiable,
            Ok(end) => end.min(len - 1),
            Err(_) => return RangeOutcome::Full,
        }
    };
    RangeOutcome::Partial(ByteRange { start, end })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_and_open_ranges() {
        assert_eq!(
            resolve(Some("bytes=0-9"), 100),
            RangeOutcome::Partial(ByteRange { start: 0, end: 9 })
        );
        assert_eq!(
            resolve(Some("bytes=90-"), 100),
            RangeOutcome::Partial(ByteRange { start: 90, end: 99 })
        );
        assert_eq!(
            resolve(Some("bytes=50-500"), 100),
            RangeOutcome::Partial(ByteRange { start: 50, end: 99 })
        );
    }

    #[test]
    fn test_suffix_range() {
        let RangeOutcome::Partial(r) = resolve(Some("bytes=-10"), 100) else {
            panic!("expected partial");
        };
        assert_eq!((r.start, r.end, r.content_length()), (90, 99, 10));
        assert_eq!(
            resolve(Some("bytes=-500"), 100),
            RangeOutcome::Partial(ByteRange { start: 0, end: 99 })
        );
    }

    #[test]
    fn test_unsatisfiable() {
        assert_eq!(resolve(Some("bytes=100-"), 100), RangeOutcome::Unsatisfiable);
        assert_eq!(resolve(Some("bytes=5-2"), 100), RangeOutcome::Unsatisfiable);
        assert_eq!(resolve(Some("bytes=-0"), 100), RangeOutcome::Unsatisfiable);
        assert_eq!(resolve(Some("bytes=-3"), 0), RangeOutcome::Unsatisfiable);
    }

    #[test]
    fn test_ignored_headers() {
        assert_eq!(resolve(None, 100), RangeOutcome::Full);
        assert_eq!(resolve(Some("items=0-1"), 100), RangeOutcome::Full);
        assert_eq!(resolve(Some("bytes=0-1,5-6"), 100), RangeOutcome::Full);
        assert_eq!(resolve(Some("bytes=a-b"), 100), RangeOutcome::Full);
    }
}
