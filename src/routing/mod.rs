//! Routing primitives
//!
//! Verb classification, registration patterns, handler objects and the
//! exact-path route table the dispatcher is assembled from.

mod handler;
mod pattern;
mod request;
mod table;
mod verb;

pub use handler::{handler_fn, Handler, HandlerFn, HttpResponse, ResponseFuture, SharedHandler};
pub use pattern::RoutePattern;
pub use request::RouteRequest;
pub use table::MethodRouteTable;
pub use verb::Verb;
