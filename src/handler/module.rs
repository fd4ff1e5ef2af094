//! Compliance modules
//!
//! A compliance module first says whether it owns a request and, if it does,
//! produces the whole response. The dispatcher walks its modules in order and
//! the first one that complies is final.

use crate::routing::{MethodRouteTable, ResponseFuture, RouteRequest, Verb};
use crate::http;

/// A pluggable request owner consulted before the static fallback
///
/// Backend modules (database-backed handlers and the like) implement this
/// trait; the dispatcher never looks past these two capabilities. Failures
/// inside `process` are the module's to turn into a status code.
pub trait ComplianceModule: Send + Sync + 'static {
    /// Short label used in logs
    fn name(&self) -> &str;

    fn comply(&self, req: &RouteRequest) -> bool;

    fn process<'a>(&'a self, req: &'a RouteRequest) -> ResponseFuture<'a>;
}

/// Module backed by one exact-path table per verb
pub struct VerbRouteModule {
    tables: [MethodRouteTable; 9],
}

/// Every POST route is also reachable under this suffix
pub const POST_ALIAS_SUFFIX: &str = "/post";

impl VerbRouteModule {
    pub fn new() -> Self {
        Self {
            tables: Verb::ALL.map(|verb| match verb {
                Verb::Post => MethodRouteTable::with_alias_suffix(POST_ALIAS_SUFFIX),
                _ => MethodRouteTable::new(),
            }),
        }
    }

    pub const fn table(&self, verb: Verb) -> &MethodRouteTable {
        &self.tables[verb.index()]
    }
}

impl Default for VerbRouteModule {
    fn default() -> Self {
        Self::new()
    }
}

impl ComplianceModule for VerbRouteModule {
    fn name(&self) -> &str {
        "verb-routes"
    }

    fn comply(&self, req: &RouteRequest) -> bool {
        req.verb()
            .is_some_and(|verb| self.table(verb).contains(&req.path))
    }

    fn process<'a>(&'a self, req: &'a RouteRequest) -> ResponseFuture<'a> {
        Box::pin(async move {
            match req.verb() {
                Some(verb) => self.table(verb).dispatch(req).await,
                None => http::build_404_response(),
            }
        })
    }
}

impl std::fmt::Debug for VerbRouteModule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut s = f.debug_struct("VerbRouteModule");
        for verb in Verb::ALL {
            s.field(verb.as_str(), &self.table(verb).len());
        }
        s.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::build_text_response;
    use crate::routing::handler_fn;
    use hyper::Method;

    #[tokio::test]
    async fn test_comply_requires_matching_verb_and_path() {
        let module = VerbRouteModule::new();
        module.table(Verb::Put).add_route(
            "/doc",
            handler_fn(|_req| async { build_text_response(201, "stored") }),
        );

        assert!(module.comply(&RouteRequest::new(Method::PUT, "/doc")));
        assert!(!module.comply(&RouteRequest::new(Method::GET, "/doc")));
        assert!(!module.comply(&RouteRequest::new(Method::PUT, "/doc/")));

        let resp = module.process(&RouteRequest::new(Method::PUT, "/doc")).await;
        assert_eq!(resp.status(), 201);
    }

    #[test]
    fn test_extension_methods_never_comply() {
        let module = VerbRouteModule::new();
        module.table(Verb::Get).add_route(
            "/x",
            handler_fn(|_req| async { build_text_response(200, "x") }),
        );
        let method = Method::from_bytes(b"PROPFIND").unwrap();
        assert!(!module.comply(&RouteRequest::new(method, "/x")));
    }

    #[test]
    fn test_only_post_table_aliases() {
        let module = VerbRouteModule::new();
        let h = handler_fn(|_req| async { build_text_response(200, "form") });
        module.table(Verb::Get).add_route("/form", h.clone());
        module.table(Verb::Post).add_route("/form", h);

        assert!(module.comply(&RouteRequest::new(Method::POST, "/form/post")));
        assert!(!module.comply(&RouteRequest::new(Method::GET, "/form/post")));
    }
}
