//! chorus: a layered HTTP dispatcher
//!
//! Requests pass through an ordered chain of compliance modules (mounts,
//! backends, per-verb route tables) and end at a sanitized static-file
//! fallback.

pub mod config;
pub mod error;
pub mod handler;
pub mod http;
pub mod logger;
pub mod routing;
pub mod server;

pub use error::RegistrationError;
pub use handler::{ComplianceModule, Dispatcher};
pub use routing::{RouteRequest, Verb};
