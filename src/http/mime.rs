//! Content-Type lookup by file extension

use std::path::Path;

const FALLBACK: &str = "application/octet-stream";

/// Extension → MIME type, grouped by family
const TYPES: &[(&str, &str)] = &[
    ("html", "text/html; charset=utf-8"),
    ("htm", "text/html; charset=utf-8"),
    ("css", "text/css; charset=utf-8"),
    ("txt", "text/plain; charset=utf-8"),
    ("md", "text/markdown; charset=utf-8"),
    ("csv", "text/csv; charset=utf-8"),
    ("xml", "application/xml"),
    ("js", "text/javascript; charset=utf-8"),
    ("mjs", "text/javascript; charset=utf-8"),
    ("json", "application/json"),
    ("map", "application/json"),
    ("wasm", "application/wasm"),
    ("png", "image/png"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("gif", "image/gif"),
    ("svg", "image/svg+xml"),
    ("ico", "image/x-icon"),
    ("webp", "image/webp"),
    ("mp4", "video/mp4"),
    ("webm", "video/webm"),
    ("mp3", "audio/mpeg"),
    ("wav", "audio/wav"),
    ("woff", "font/woff"),
    ("woff2", "font/woff2"),
    ("ttf", "font/ttf"),
    ("pdf", "application/pdf"),
    ("zip", "application/zip"),
    ("gz", "application/gzip"),
];

/// MIME type for `path`, matching the extension case-insensitively
///
/// ```
/// use std::path::Path;
/// use chorus::http::mime::content_type_for;
/// assert_eq!(content_type_for(Path::new("a/INDEX.HTML")), "text/html; charset=utf-8");
/// assert_eq!(content_type_for(Path::new("blob")), "application/octet-stream");
/// ```
pub fn content_type_for(path: &Path) -> &'static str {
    let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
        return FALLBACK;
    };
    TYPES
        .iter()
        .find(|(known, _)| known.eq_ignore_ascii_case(ext))
        .map_or(FALLBACK, |&(_, mime)| mime)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_extensions() {
        assert_eq!(content_type_for(Path::new("README.md")), "text/markdown; charset=utf-8");
        assert_eq!(content_type_for(Path::new("app.JS")), "text/javascript; charset=utf-8");
        assert_eq!(content_type_for(Path::new("x/y/logo.svg")), "image/svg+xml");
    }

    #[test]
    fn test_unknown_or_missing_extension() {
        assert_eq!(content_type_for(Path::new("data.xyz")), FALLBACK);
        assert_eq!(content_type_for(Path::new("Makefile")), FALLBACK);
    }
}
