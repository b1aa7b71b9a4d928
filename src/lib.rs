//! mismatch-lint — mismatched query/update analysis for Java containers.
//!
//! Finds collections, `StringBuilder`s and arrays whose contents are only
//! ever written or only ever read within their scope. Sources are parsed
//! with tree-sitter; the [`engine`] classifies every occurrence of each
//! candidate and the [`scan`] pipeline runs it over whole directories.

pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod observability;
pub mod scan;
pub mod syntax;
pub mod types;

pub use engine::{CancellationToken, MismatchReporter};
pub use error::{MismatchError, Result};
pub use types::{ContainerFamily, Finding, MissingRole, Usage, UsageFlags};
