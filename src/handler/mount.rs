//! Named directory mounts
//!
//! A mount owns every request whose first path component equals its name
//! (ignoring case) and serves the rest of the path from its own directory.
//! Matching runs on the decoded, cleaned path.

use std::path::PathBuf;

use super::module::ComplianceModule;
use super::static_files::{clean_path, StaticFallback};
use crate::routing::{ResponseFuture, RouteRequest};

#[derive(Debug, Clone)]
pub struct MountModule {
    name: String,
    files: StaticFallback,
}

impl MountModule {
    pub fn new(name: impl Into<String>, files: StaticFallback) -> Self {
        Self {
            name: name.into().trim_matches('/').to_string(),
            files,
        }
    }

    /// Mount-relative path left after removing the mount component
    fn strip(&self, path: &str) -> Option<PathBuf> {
        let cleaned = clean_path(path)?;
        let mut components = cleaned.iter();
        let first = components.next()?.to_str()?;
        first
            .eq_ignore_ascii_case(&self.name)
            .then(|| components.collect())
    }
}

impl ComplianceModule for MountModule {
    fn name(&self) -> &str {
        &self.name
    }

    fn comply(&self, req: &RouteRequest) -> bool {
        !self.name.is_empty() && self.strip(&req.path).is_some()
    }

    fn process<'a>(&'a self, req: &'a RouteRequest) -> ResponseFuture<'a> {
        Box::pin(async move {
            let rest = self.strip(&req.path).unwrap_or_default();
            self.files.serve_relative(req, &rest).await
        })
    }
}
