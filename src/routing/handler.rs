//! Handler objects stored in route tables
//!
//! Route tables hold `Arc<dyn Handler>` rather than bare function pointers so
//! business logic, fixed-file handlers and test fakes share one contract.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use super::RouteRequest;

pub type HttpResponse = Response<Full<Bytes>>;

/// Boxed response future returned by handlers and compliance modules
pub type ResponseFuture<'a> = Pin<Box<dyn Future<Output = HttpResponse> + Send + 'a>>;

/// A request handler registered under a route
pub trait Handler: Send + Sync + 'static {
    fn handle<'a>(&'a self, req: &'a RouteRequest) -> ResponseFuture<'a>;
}

pub type SharedHandler = Arc<dyn Handler>;

/// Adapts an async closure into a [`Handler`]
///
/// The closure receives an owned clone of the request so its future can be
/// `'static`.
pub struct HandlerFn<F> {
    func: F,
}

impl<F> HandlerFn<F> {
    pub const fn new(func: F) -> Self {
        Self { func }
    }
}

impl<F, Fut> Handler for HandlerFn<F>
where
    F: Fn(RouteRequest) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = HttpResponse> + Send + 'static,
{
    fn handle<'a>(&'a self, req: &'a RouteRequest) -> ResponseFuture<'a> {
        Box::pin((self.func)(req.clone()))
    }
}

impl<F> fmt::Debug for HandlerFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerFn").finish_non_exhaustive()
    }
}

/// Wrap an async closure as a shared handler
pub fn handler_fn<F, Fut>(func: F) -> SharedHandler
where
    F: Fn(RouteRequest) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = HttpResponse> + Send + 'static,
{
    Arc::new(HandlerFn::new(func))
}
