//! Fixed-file handlers for informational routes

use std::path::{Path, PathBuf};

use super::static_files::serve_file;
use crate::routing::{Handler, ResponseFuture, RouteRequest};

/// Serves one configured file regardless of the request path
#[derive(Debug, Clone)]
pub struct FileHandler {
    path: PathBuf,
}

impl FileHandler {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Handler for FileHandler {
    fn handle<'a>(&'a self, req: &'a RouteRequest) -> ResponseFuture<'a> {
        Box::pin(serve_file(req, &self.path))
    }
}

/// `(pattern, file)` pairs for a documentation tree
///
/// `GET /<doc_root>/` maps to `<dir>/README.md` and each section gets
/// `GET /<doc_root>/<section>/` → `<dir>/<section>/README.md`.
pub fn doc_routes(doc_root: &str, dir: &Path, sections: &[String]) -> Vec<(String, PathBuf)> {
    let doc_root = doc_root.trim_matches('/');
    let mut routes = vec![(format!("GET /{doc_root}/"), dir.join("README.md"))];
    routes.extend(sections.iter().map(|section| {
        let section = section.trim_matches('/');
        (
            format!("GET /{doc_root}/{section}/"),
            dir.join(section).join("README.md"),
        )
    }));
    routes
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use hyper::Method;

    #[test]
    fn test_doc_routes_layout() {
        let routes = doc_routes("/song/", Path::new("SONG"), &["veni".into(), "vidi".into()]);
        assert_eq!(
            routes,
            vec![
                ("GET /song/".to_string(), PathBuf::from("SONG/README.md")),
                ("GET /song/veni/".to_string(), PathBuf::from("SONG/veni/README.md")),
                ("GET /song/vidi/".to_string(), PathBuf::from("SONG/vidi/README.md")),
            ]
        );
    }

    #[tokio::test]
    async fn test_file_handler_serves_or_404s() {
        let dir = tempfile::TempDir::new().unwrap();
        let readme = dir.path().join("README.md");
        std::fs::write(&readme, "# Docs").unwrap();

        let handler = FileHandler::new(&readme);
        let resp = handler.handle(&RouteRequest::new(Method::GET, "/anything")).await;
        assert_eq!(resp.status(), 200);
        assert_eq!(resp.headers()["Content-Type"], "text/markdown; charset=utf-8");
        let body = resp.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], b"# Docs");

        let missing = FileHandler::new(dir.path().join("nope.md"));
        let resp = missing.handle(&RouteRequest::new(Method::GET, "/")).await;
        assert_eq!(resp.status(), 404);
    }
}
