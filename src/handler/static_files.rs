//! Static file fallback
//!
//! Terminal dispatch stage: resolves the request path under a root directory
//! and serves the file, or answers 404. Paths are cleaned before they touch
//! the filesystem and the canonical result must stay inside the root.

use hyper::body::Bytes;
use hyper::Method;
use percent_encoding::percent_decode_str;
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::http::response::{build_file_response, build_partial_response, FileMeta};
use crate::http::{self, cache, mime, range};
use crate::logger;
use crate::routing::{HttpResponse, RouteRequest};

const DEFAULT_INDEX_FILES: [&str; 2] = ["index.html", "index.htm"];

#[derive(Debug, Clone)]
pub struct StaticFallback {
    root: PathBuf,
    index_files: Vec<String>,
}

impl StaticFallback {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            index_files: DEFAULT_INDEX_FILES.map(String::from).to_vec(),
        }
    }

    #[must_use]
    pub fn with_index_files(mut self, index_files: Vec<String>) -> Self {
        self.index_files = index_files;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub async fn serve(&self, req: &RouteRequest) -> HttpResponse {
        self.serve_path(req, &req.path).await
    }

    /// Serve `raw_path` (URI form, possibly percent-encoded) from the root
    pub async fn serve_path(&self, req: &RouteRequest, raw_path: &str) -> HttpResponse {
        let Some(relative) = clean_path(raw_path) else {
            logger::log_warning(&format!("Rejected malformed path: {raw_path:?}"));
            return http::build_404_response();
        };
        self.serve_relative(req, &relative).await
    }

    /// Serve an already cleaned root-relative path
    pub async fn serve_relative(&self, req: &RouteRequest, relative: &Path) -> HttpResponse {
        let Some(file) = self.resolve_relative(relative).await else {
            logger::log_debug(&format!(
                "[Static] {} /{} -> 404",
                req.method,
                relative.display()
            ));
            return http::build_404_response();
        };

        if !matches!(req.method, Method::GET | Method::HEAD) {
            return http::build_405_response("GET, HEAD");
        }

        serve_file(req, &file).await
    }

    /// Map a cleaned path onto an existing file inside the root
    async fn resolve_relative(&self, relative: &Path) -> Option<PathBuf> {
        let root = match fs::canonicalize(&self.root).await {
            Ok(root) => root,
            Err(e) => {
                logger::log_warning(&format!(
                    "Static root '{}' is not accessible: {e}",
                    self.root.display()
                ));
                return None;
            }
        };

        let mut candidate = root.join(relative);
        if is_dir(&candidate).await {
            candidate = self.find_index(&candidate).await?;
        }

        // Missing files are routine, so no log here
        let canonical = fs::canonicalize(&candidate).await.ok()?;
        if !canonical.starts_with(&root) {
            logger::log_warning(&format!(
                "Path traversal attempt blocked: /{} -> {}",
                relative.display(),
                canonical.display()
            ));
            return None;
        }

        let meta = fs::metadata(&canonical).await.ok()?;
        meta.is_file().then_some(canonical)
    }

    async fn find_index(&self, dir: &Path) -> Option<PathBuf> {
        for name in &self.index_files {
            let path = dir.join(name);
            if fs::metadata(&path).await.is_ok_and(|m| m.is_file()) {
                return Some(path);
            }
        }
        None
    }
}

/// Normalize a URI path into a root-relative filesystem path
///
/// Decodes percent escapes, drops empty and `.` segments and lets `..` pop
/// at most back to the root. Returns `None` for undecodable input or NUL bytes.
///
/// ```
/// use std::path::PathBuf;
/// use chorus::handler::static_files::clean_path;
/// assert_eq!(clean_path("/a/./b/../c.txt"), Some(PathBuf::from("a/c.txt")));
/// assert_eq!(clean_path("/../../etc/passwd"), Some(PathBuf::from("etc/passwd")));
/// ```
pub fn clean_path(raw: &str) -> Option<PathBuf> {
    let decoded = percent_decode_str(raw).decode_utf8().ok()?;
    if decoded.contains('\0') {
        return None;
    }

    let mut segments: Vec<&str> = Vec::new();
    for segment in decoded.split(['/', '\\']) {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            s => segments.push(s),
        }
    }
    Some(segments.iter().collect())
}

/// Serve one file with conditional, range and HEAD handling
pub async fn serve_file(req: &RouteRequest, path: &Path) -> HttpResponse {
    let meta = match fs::metadata(path).await {
        Ok(meta) if meta.is_file() => meta,
        Ok(_) => return http::build_404_response(),
        Err(e) => return io_failure(path, &e),
    };
    let content = match fs::read(path).await {
        Ok(content) => Bytes::from(content),
        Err(e) => return io_failure(path, &e),
    };

    let etag = cache::etag_for(meta.len(), meta.modified().ok());
    if cache::etag_matches(req.header("if-none-match"), &etag) {
        return http::build_304_response(&etag);
    }

    let file_meta = FileMeta {
        content_type: mime::content_type_for(path),
        etag: &etag,
        total_size: content.len(),
    };

    match range::resolve(req.header("range"), content.len()) {
        range::RangeOutcome::Partial(span) => {
            let body = if req.is_head() {
                Bytes::new()
            } else {
                content.slice(span.start..=span.end)
            };
            build_partial_response(&file_meta, span, body)
        }
        range::RangeOutcome::Unsatisfiable => http::build_416_response(content.len()),
        range::RangeOutcome::Full => {
            let body = if req.is_head() { Bytes::new() } else { content };
            build_file_response(&file_meta, body)
        }
    }
}

fn io_failure(path: &Path, error: &io::Error) -> HttpResponse {
    if error.kind() == io::ErrorKind::NotFound {
        return http::build_404_response();
    }
    logger::log_error(&format!("Failed to read '{}': {error}", path.display()));
    http::build_text_response(500, "500 Internal Server Error")
}

async fn is_dir(path: &Path) -> bool {
    fs::metadata(path).await.is_ok_and(|m| m.is_dir())
}
