//! Request dispatcher
//!
//! Owns the per-verb route tables, the literal pattern table and the ordered
//! compliance chain. Every request walks the chain once:
//!
//! 1. mounts, in the order they were added
//! 2. backend modules, in the order they were added
//! 3. verb routes (exact path in the table for the request's verb)
//! 4. static fallback under the root directory
//!
//! The first stage that complies produces the response; later stages are
//! never consulted.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::docs::{doc_routes, FileHandler};
use super::module::{ComplianceModule, VerbRouteModule};
use super::mount::MountModule;
use super::static_files::StaticFallback;
use crate::config::DispatchConfig;
use crate::error::RegistrationError;
use crate::logger;
use crate::routing::{
    handler_fn, HttpResponse, MethodRouteTable, RoutePattern, RouteRequest, SharedHandler, Verb,
};

/// Stage name reported when no module claimed the request
pub const STATIC_STAGE: &str = "static";

pub struct Dispatcher {
    verb_routes: Arc<VerbRouteModule>,
    /// Every registration keyed by its literal pattern
    patterns: MethodRouteTable,
    modules: Vec<Arc<dyn ComplianceModule>>,
    fallback: StaticFallback,
}

impl Dispatcher {
    /// Dispatcher with no modules beyond the verb routes
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        Self::builder(root_dir).build()
    }

    pub fn builder(root_dir: impl Into<PathBuf>) -> DispatcherBuilder {
        DispatcherBuilder {
            fallback: StaticFallback::new(root_dir),
            index_files: None,
            mounts: Vec::new(),
            backends: Vec::new(),
        }
    }

    /// Build from the `[dispatch]` config section, including docs routes
    pub fn from_config(config: &DispatchConfig) -> Result<Self, RegistrationError> {
        let mut builder = Self::builder(&config.root_dir).index_files(config.index_files.clone());
        for mount in &config.mounts {
            builder = builder.mount(&mount.name, &mount.dir);
        }
        let dispatcher = builder.build();

        if let Some(docs) = &config.docs {
            dispatcher.register_docs(&docs.root, &docs.dir, &docs.sections)?;
        }
        Ok(dispatcher)
    }

    /// Register `handler` under a bare (`/path`) or verb-prefixed (`GET /path`) pattern
    ///
    /// Bare patterns land in the GET and POST tables; prefixed patterns only
    /// in their verb's table. Unknown verbs are rejected and nothing is
    /// registered.
    pub fn route(&self, pattern: &str, handler: SharedHandler) -> Result<(), RegistrationError> {
        let parsed = RoutePattern::parse(pattern)?;
        for verb in parsed.verbs() {
            self.verb_routes
                .table(*verb)
                .add_route(parsed.path(), Arc::clone(&handler));
        }
        self.patterns.add_route(pattern, handler);
        self.prune_patterns(parsed.path());
        logger::log_route_registered(pattern, parsed.verbs());
        Ok(())
    }

    /// [`Dispatcher::route`] for an async closure
    pub fn route_fn<F, Fut>(&self, pattern: &str, func: F) -> Result<(), RegistrationError>
    where
        F: Fn(RouteRequest) -> Fut + Send + Sync + 'static,
        Fut: std::future::Future<Output = HttpResponse> + Send + 'static,
    {
        self.route(pattern, handler_fn(func))
    }

    /// Undo a registration made with the same pattern
    ///
    /// Table entries since overwritten by another pattern are left alone.
    pub fn unroute(&self, pattern: &str) -> Result<(), RegistrationError> {
        let parsed = RoutePattern::parse(pattern)?;
        let Some(handler) = self.patterns.lookup(pattern) else {
            return Ok(());
        };
        for verb in parsed.verbs() {
            self.table(*verb).remove_handler(parsed.path(), &handler);
        }
        self.patterns.remove_handler(pattern, &handler);
        self.prune_patterns(parsed.path());
        Ok(())
    }

    /// Drop patterns on `path` whose handler no longer sits in any of their tables
    fn prune_patterns(&self, path: &str) {
        for key in self.patterns.paths() {
            let Ok(parsed) = RoutePattern::parse(&key) else {
                continue;
            };
            if parsed.path() != path {
                continue;
            }
            let Some(handler) = self.patterns.lookup(&key) else {
                continue;
            };
            let live = parsed.verbs().iter().any(|verb| {
                self.table(*verb)
                    .lookup(path)
                    .is_some_and(|h| Arc::ptr_eq(&h, &handler))
            });
            if !live && self.patterns.remove_handler(&key, &handler) {
                logger::log_debug(&format!("[Route] '{key}' fully overridden, dropped"));
            }
        }
    }

    /// Pre-register the GET-only documentation pages
    pub fn register_docs(
        &self,
        doc_root: &str,
        dir: &Path,
        sections: &[String],
    ) -> Result<(), RegistrationError> {
        for (pattern, file) in doc_routes(doc_root, dir, sections) {
            self.route(&pattern, Arc::new(FileHandler::new(file)))?;
        }
        Ok(())
    }

    /// Top-level request handler
    pub async fn handle(&self, req: &RouteRequest) -> HttpResponse {
        self.handle_with_stage(req).await.0
    }

    /// Like [`Dispatcher::handle`], also naming the stage that answered
    pub async fn handle_with_stage(&self, req: &RouteRequest) -> (HttpResponse, &str) {
        for module in &self.modules {
            if module.comply(req) {
                logger::log_debug(&format!(
                    "[Dispatch] {} {} -> {}",
                    req.method,
                    req.path,
                    module.name()
                ));
                return (module.process(req).await, module.name());
            }
        }
        logger::log_debug(&format!("[Dispatch] {} {} -> {STATIC_STAGE}", req.method, req.path));
        (self.fallback.serve(req).await, STATIC_STAGE)
    }

    pub fn table(&self, verb: Verb) -> &MethodRouteTable {
        self.verb_routes.table(verb)
    }

    /// Handler registered under the literal `pattern`
    pub fn pattern(&self, pattern: &str) -> Option<SharedHandler> {
        self.patterns.lookup(pattern)
    }

    /// All literal patterns, sorted
    pub fn patterns(&self) -> Vec<String> {
        self.patterns.paths()
    }

    /// Module names in consultation order
    pub fn module_names(&self) -> Vec<&str> {
        self.modules.iter().map(|m| m.name()).collect()
    }

    pub fn root_dir(&self) -> &Path {
        self.fallback.root()
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("root_dir", &self.root_dir())
            .field("modules", &self.module_names())
            .field("patterns", &self.patterns())
            .finish()
    }
}

/// Assembles the module chain; order is fixed once built
pub struct DispatcherBuilder {
    fallback: StaticFallback,
    /// Applied to the root fallback and every mount
    index_files: Option<Vec<String>>,
    mounts: Vec<(String, PathBuf)>,
    backends: Vec<Arc<dyn ComplianceModule>>,
}

impl DispatcherBuilder {
    #[must_use]
    pub fn index_files(mut self, index_files: Vec<String>) -> Self {
        self.index_files = Some(index_files);
        self
    }

    /// Serve `dir` for requests whose first path component is `name`
    #[must_use]
    pub fn mount(mut self, name: &str, dir: impl Into<PathBuf>) -> Self {
        self.mounts.push((name.to_string(), dir.into()));
        self
    }

    /// Add a backend module, consulted before the verb routes
    #[must_use]
    pub fn backend(mut self, module: Arc<dyn ComplianceModule>) -> Self {
        self.backends.push(module);
        self
    }

    pub fn build(self) -> Dispatcher {
        let with_index = |files: StaticFallback| match &self.index_files {
            Some(index_files) => files.with_index_files(index_files.clone()),
            None => files,
        };

        let verb_routes = Arc::new(VerbRouteModule::new());
        let mut modules: Vec<Arc<dyn ComplianceModule>> = Vec::new();
        for (name, dir) in self.mounts {
            let mount = MountModule::new(name, with_index(StaticFallback::new(dir)));
            modules.push(Arc::new(mount));
        }
        modules.extend(self.backends);
        modules.push(Arc::clone(&verb_routes) as Arc<dyn ComplianceModule>);

        Dispatcher {
            verb_routes,
            patterns: MethodRouteTable::new(),
            modules,
            fallback: with_index(self.fallback),
        }
    }
}
