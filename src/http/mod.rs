//! HTTP protocol helpers
//!
//! Response builders and the conditional/range machinery used by static
//! file serving, kept free of dispatch logic.

pub mod cache;
pub mod mime;
pub mod range;
pub mod response;

pub use response::{
    build_304_response, build_404_response, build_405_response, build_413_response,
    build_416_response, build_text_response,
};
