//! Request view shared by every dispatch stage
//!
//! The connection layer collects the hyper body once and hands the dispatcher an
//! owned `RouteRequest`, so handlers and compliance modules never deal with a
//! streaming body and tests can build requests without a socket.

use hyper::body::Bytes;
use hyper::header::{HeaderMap, HeaderName, HeaderValue};
use hyper::http::request::Parts;
use hyper::{Method, Version};
use std::net::SocketAddr;

use super::Verb;

#[derive(Debug, Clone)]
pub struct RouteRequest {
    pub method: Method,
    /// Raw path component of the request URI, without the query
    pub path: String,
    pub query: Option<String>,
    pub version: Version,
    pub headers: HeaderMap,
    pub body: Bytes,
    pub peer_addr: Option<SocketAddr>,
}

impl RouteRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: None,
            version: Version::HTTP_11,
            headers: HeaderMap::new(),
            body: Bytes::new(),
            peer_addr: None,
        }
    }

    /// Build from the head of a hyper request and its collected body
    pub fn from_parts(parts: Parts, body: Bytes, peer_addr: Option<SocketAddr>) -> Self {
        Self {
            path: parts.uri.path().to_string(),
            query: parts.uri.query().map(ToString::to_string),
            method: parts.method,
            version: parts.version,
            headers: parts.headers,
            body,
            peer_addr,
        }
    }

    #[must_use]
    pub fn with_header(mut self, name: &'static str, value: &str) -> Self {
        if let Ok(value) = HeaderValue::from_str(value) {
            self.headers.insert(HeaderName::from_static(name), value);
        }
        self
    }

    #[must_use]
    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// Header value as text; non-ASCII values are treated as absent
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn verb(&self) -> Option<Verb> {
        Verb::from_method(&self.method)
    }

    pub fn is_head(&self) -> bool {
        self.method == Method::HEAD
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hyper::Request;

    #[test]
    fn test_from_parts_splits_query() {
        let (parts, ()) = Request::builder()
            .method(Method::POST)
            .uri("/submit?draft=1")
            .header("content-type", "text/plain")
            .body(())
            .unwrap()
            .into_parts();
        let req = RouteRequest::from_parts(parts, Bytes::from_static(b"hi"), None);
        assert_eq!(req.path, "/submit");
        assert_eq!(req.query.as_deref(), Some("draft=1"));
        assert_eq!(req.header("content-type"), Some("text/plain"));
        assert_eq!(req.verb(), Some(Verb::Post));
        assert_eq!(&req.body[..], b"hi");
    }

    #[test]
    fn test_builder_helpers() {
        let req = RouteRequest::new(Method::HEAD, "/a").with_header("range", "bytes=0-1");
        assert!(req.is_head());
        assert_eq!(req.header("range"), Some("bytes=0-1"));
        assert_eq!(req.header("missing"), None);
    }
}
