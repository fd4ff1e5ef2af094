//! Request handling
//!
//! The dispatcher, its compliance modules and the static file fallback.

pub mod docs;
pub mod module;
pub mod mount;
pub mod router;
pub mod static_files;

pub use module::{ComplianceModule, VerbRouteModule};
pub use router::{Dispatcher, DispatcherBuilder, STATIC_STAGE};
pub use static_files::StaticFallback;
