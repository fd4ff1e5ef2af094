//! Error types

use thiserror::Error;

/// Configuration-time failures while registering routes
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistrationError {
    #[error("unrecognized HTTP method '{method}' in route pattern '{pattern}'")]
    UnknownMethod { method: String, pattern: String },

    #[error("route pattern '{pattern}' has a method but no path")]
    EmptyPath { pattern: String },
}
