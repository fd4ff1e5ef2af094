//! Exact-path route table
//!
//! One table exists per verb; the dispatcher also keeps one keyed by literal
//! registration pattern. Tables can be mutated while serving, so the map sits
//! behind a reader/writer lock that is only held for the map operation itself.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::{HttpResponse, RouteRequest, SharedHandler};
use crate::http;

#[derive(Default)]
pub struct MethodRouteTable {
    routes: RwLock<HashMap<String, SharedHandler>>,
    /// Suffix under which every route is registered a second time
    alias_suffix: Option<&'static str>,
}

impl MethodRouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Table that mirrors each route under `<route><suffix>`
    pub fn with_alias_suffix(suffix: &'static str) -> Self {
        Self {
            routes: RwLock::default(),
            alias_suffix: Some(suffix),
        }
    }

    /// Insert or silently replace the handler for `path`
    pub fn add_route(&self, path: &str, handler: SharedHandler) {
        let mut routes = self.write();
        if let Some(suffix) = self.alias_suffix {
            routes.insert(format!("{path}{suffix}"), Arc::clone(&handler));
        }
        routes.insert(path.to_string(), handler);
    }

    /// Remove `path` (and its alias); absent paths are ignored
    pub fn remove_route(&self, path: &str) {
        let mut routes = self.write();
        if let Some(suffix) = self.alias_suffix {
            routes.remove(&format!("{path}{suffix}"));
        }
        routes.remove(path);
    }

    /// Remove `path` (and its alias) only while it still maps to `handler`
    pub fn remove_handler(&self, path: &str, handler: &SharedHandler) -> bool {
        let mut routes = self.write();
        if !routes.get(path).is_some_and(|h| Arc::ptr_eq(h, handler)) {
            return false;
        }
        routes.remove(path);
        if let Some(suffix) = self.alias_suffix {
            let alias = format!("{path}{suffix}");
            if routes.get(&alias).is_some_and(|h| Arc::ptr_eq(h, handler)) {
                routes.remove(&alias);
            }
        }
        true
    }

    /// Exact-match lookup; the lock is released before the handler is used
    pub fn lookup(&self, path: &str) -> Option<SharedHandler> {
        self.read().get(path).cloned()
    }

    pub fn contains(&self, path: &str) -> bool {
        self.read().contains_key(path)
    }

    /// Serve `req` as a standalone router: matched handler or 404
    pub async fn dispatch(&self, req: &RouteRequest) -> HttpResponse {
        match self.lookup(&req.path) {
            Some(handler) => handler.handle(req).await,
            None => http::build_404_response(),
        }
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Registered keys in sorted order
    pub fn paths(&self) -> Vec<String> {
        let mut paths: Vec<String> = self.read().keys().cloned().collect();
        paths.sort();
        paths
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, SharedHandler>> {
        self.routes.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, SharedHandler>> {
        self.routes.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for MethodRouteTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MethodRouteTable")
            .field("paths", &self.paths())
            .field("alias_suffix", &self.alias_suffix)
            .finish()
    }
}
