//! HTTP response builders
//!
//! Every builder falls back to a bare response when `Response::builder()`
//! rejects a header, after logging the failure.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};

use super::cache::STATIC_CACHE_CONTROL;
use super::range::ByteRange;

type Resp = Response<Full<Bytes>>;

pub fn build_404_response() -> Resp {
    build_text_response(404, "404 Not Found")
}

/// 405 with the verbs that would have been accepted
pub fn build_405_response(allow: &str) -> Resp {
    Response::builder()
        .status(405)
        .header("Content-Type", "text/plain; charset=utf-8")
        .header("Allow", allow)
        .body(Full::new(Bytes::from_static(b"405 Method Not Allowed")))
        .unwrap_or_else(|e| fallback(405, &e))
}

pub fn build_413_response() -> Resp {
    build_text_response(413, "413 Payload Too Large")
}

pub fn build_416_response(total_size: usize) -> Resp {
    Response::builder()
        .status(416)
        .header("Content-Type", "text/plain; charset=utf-8")
        .header("Content-Range", format!("bytes */{total_size}"))
        .body(Full::new(Bytes::from_static(b"416 Range Not Satisfiable")))
        .unwrap_or_else(|e| fallback(416, &e))
}

pub fn build_304_response(etag: &str) -> Resp {
    Response::builder()
        .status(304)
        .header("ETag", etag)
        .header("Cache-Control", STATIC_CACHE_CONTROL)
        .body(Full::new(Bytes::new()))
        .unwrap_or_else(|e| fallback(304, &e))
}

/// Plain-text response with an arbitrary status
pub fn build_text_response(status: u16, body: impl Into<Bytes>) -> Resp {
    let body = body.into();
    Response::builder()
        .status(status)
        .header("Content-Type", "text/plain; charset=utf-8")
        .header("Content-Length", body.len())
        .body(Full::new(body))
        .unwrap_or_else(|e| fallback(status, &e))
}

/// Static file metadata shared by full and partial responses
pub struct FileMeta<'a> {
    pub content_type: &'a str,
    pub etag: &'a str,
    pub total_size: usize,
}

/// 200 with the whole file; `body` is empty for HEAD
pub fn build_file_response(meta: &FileMeta<'_>, body: Bytes) -> Resp {
    Response::builder()
        .status(200)
        .header("Content-Type", meta.content_type)
        .header("Content-Length", meta.total_size)
        .header("Accept-Ranges", "bytes")
        .header("ETag", meta.etag)
        .header("Cache-Control", STATIC_CACHE_CONTROL)
        .body(Full::new(body))
        .unwrap_or_else(|e| fallback(200, &e))
}

/// 206 for a single byte range; `body` is empty for HEAD
pub fn build_partial_response(meta: &FileMeta<'_>, range: ByteRange, body: Bytes) -> Resp {
    Response::builder()
        .status(206)
        .header("Content-Type", meta.content_type)
        .header("Content-Length", range.content_length())
        .header(
            "Content-Range",
            format!("bytes {}-{}/{}", range.start, range.end, meta.total_size),
        )
        .header("Accept-Ranges", "bytes")
        .header("ETag", meta.etag)
        .header("Cache-Control", STATIC_CACHE_CONTROL)
        .body(Full::new(body))
        .unwrap_or_else(|e| fallback(206, &e))
}

fn fallback(status: u16, error: &hyper::http::Error) -> Resp {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
    let mut resp = Response::new(Full::new(Bytes::new()));
    *resp.status_mut() = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    resp
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_statuses() {
        assert_eq!(build_404_response().status(), 404);
        assert_eq!(build_413_response().status(), 413);

        let resp = build_405_response("GET, HEAD");
        assert_eq!(resp.status(), 405);
        assert_eq!(resp.headers()["Allow"], "GET, HEAD");

        let resp = build_416_response(42);
        assert_eq!(resp.headers()["Content-Range"], "bytes */42");
    }

    #[test]
    fn test_rejected_header_keeps_status() {
        let resp = build_405_response("GET\nHEAD");
        assert_eq!(resp.status(), 405);
        assert!(resp.headers().get("Allow").is_none());

        assert_eq!(build_text_response(1000, "bogus").status(), 500);
    }

    #[test]
    fn test_partial_headers() {
        let meta = FileMeta {
            content_type: "text/plain",
            etag: "\"1\"",
            total_size: 10,
        };
        let resp = build_partial_response(
            &meta,
            ByteRange { start: 2, end: 4 },
            Bytes::from_static(b"cde"),
        );
        assert_eq!(resp.status(), 206);
        assert_eq!(resp.headers()["Content-Range"], "bytes 2-4/10");
        assert_eq!(resp.headers()["Content-Length"], "3");
    }
}
