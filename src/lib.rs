//! Uniform scripting-runtime surface for caption rendering engines.
//!
//! A caption renderer runs on top of a host scripting runtime whose built-in
//! behaviors vary: leading-whitespace trimming, prefix/suffix tests, integer
//! parsing (old hosts infer octal from a leading zero) and set-like
//! collections are all shaky ground. [`CompatEnvironment`] probes an injected
//! [`HostProfile`] once, keeps every conformant host capability and installs
//! a conforming replacement for everything else, so downstream code can call
//! one surface without caring which implementation is active.

use std::error::Error as StdError;
use std::fmt;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    UnsupportedElement { kind: &'static str },
    NotImplemented(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedElement { kind } => {
                write!(f, "unsupported set element: {kind}")
            }
            Self::NotImplemented(operation) => {
                write!(f, "not implemented: {operation}")
            }
        }
    }
}

impl StdError for Error {}

mod dom;
mod environment;
mod fallback_set;
mod numeric;
mod string_ops;
mod value;

pub use dom::{Dom, NodeId};
pub use environment::{
    Capability, CompatEnvironment, HostProfile, ParseIntegerFn, PrefixFn, RemoveElementFn,
    SetFactoryFn, TrimFn,
};
pub use fallback_set::{AssociativeSet, EnumeratedSetAdapter, FallbackSet};
pub use value::Value;
