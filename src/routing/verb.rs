//! HTTP verb classification
//!
//! The dispatcher keeps one route table per recognized verb. Anything outside
//! this set is never matched by a verb table and falls through to static serving.

use hyper::Method;
use std::fmt;

/// The nine HTTP verbs that own a route table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Verb {
    Get,
    Head,
    Options,
    Trace,
    Put,
    Delete,
    Post,
    Patch,
    Connect,
}

impl Verb {
    /// All verbs in table order
    pub const ALL: [Self; 9] = [
        Self::Get,
        Self::Head,
        Self::Options,
        Self::Trace,
        Self::Put,
        Self::Delete,
        Self::Post,
        Self::Patch,
        Self::Connect,
    ];

    /// Parse a registration token, ignoring case
    ///
    /// ```
    /// use chorus::routing::Verb;
    /// assert_eq!(Verb::parse("get"), Some(Verb::Get));
    /// assert_eq!(Verb::parse("PaTcH"), Some(Verb::Patch));
    /// assert_eq!(Verb::parse("FETCH"), None);
    /// ```
    pub fn parse(token: &str) -> Option<Self> {
        match token.to_ascii_lowercase().as_str() {
            "get" => Some(Self::Get),
            "head" => Some(Self::Head),
            "options" => Some(Self::Options),
            "trace" => Some(Self::Trace),
            "put" => Some(Self::Put),
            "delete" => Some(Self::Delete),
            "post" => Some(Self::Post),
            "patch" => Some(Self::Patch),
            "connect" => Some(Self::Connect),
            _ => None,
        }
    }

    /// Map a request method onto a verb; extension methods have no table
    pub fn from_method(method: &Method) -> Option<Self> {
        match *method {
            Method::GET => Some(Self::Get),
            Method::HEAD => Some(Self::Head),
            Method::OPTIONS => Some(Self::Options),
            Method::TRACE => Some(Self::Trace),
            Method::PUT => Some(Self::Put),
            Method::DELETE => Some(Self::Delete),
            Method::POST => Some(Self::Post),
            Method::PATCH => Some(Self::Patch),
            Method::CONNECT => Some(Self::Connect),
            _ => None,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Head => "HEAD",
            Self::Options => "OPTIONS",
            Self::Trace => "TRACE",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
            Self::Post => "POST",
            Self::Patch => "PATCH",
            Self::Connect => "CONNECT",
        }
    }

    /// Position of this verb's table inside the dispatcher
    pub const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
