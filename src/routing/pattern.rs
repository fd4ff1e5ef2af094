//! Registration pattern parsing
//!
//! A pattern is either a bare path (`/foo`) or a verb-prefixed path
//! (`GET /foo`). Only the first space separates the verb from the route.

use crate::error::RegistrationError;

use super::Verb;

/// Where a registration lands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoutePattern {
    /// No verb prefix: readable and submittable, registered under GET and POST
    Bare(String),
    /// Explicit verb: registered under that verb only
    Verb(Verb, String),
}

impl RoutePattern {
    pub fn parse(pattern: &str) -> Result<Self, RegistrationError> {
        let Some((method, route)) = pattern.split_once(' ') else {
            return Ok(Self::Bare(pattern.to_string()));
        };

        let verb = Verb::parse(method).ok_or_else(|| RegistrationError::UnknownMethod {
            method: method.to_string(),
            pattern: pattern.to_string(),
        })?;

        if route.is_empty() {
            return Err(RegistrationError::EmptyPath {
                pattern: pattern.to_string(),
            });
        }

        Ok(Self::Verb(verb, route.to_string()))
    }

    /// Tables the route is installed into
    pub fn verbs(&self) -> &'static [Verb] {
        match self {
            Self::Bare(_) => &[Verb::Get, Verb::Post],
            Self::Verb(verb, _) => std::slice::from_ref(verb_ref(*verb)),
        }
    }

    pub fn path(&self) -> &str {
        match self {
            Self::Bare(path) | Self::Verb(_, path) => path,
        }
    }
}

static VERBS: [Verb; 9] = Verb::ALL;

fn verb_ref(verb: Verb) -> &'static Verb {
    &VERBS[verb.index()]
}
