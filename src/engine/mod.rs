//! The usage-classification engine.
//!
//! Layered leaves first: name [`tables`] and the [`registry`] of views,
//! wrappers, safe arguments, and factories; per-family [`family`] profiles;
//! the [`alias`] resolver; the [`classify`] strategies; the scope [`walker`];
//! and the [`reporter`] that ties them together per candidate.

pub mod alias;
pub mod cancel;
pub mod classify;
pub mod family;
pub mod registry;
pub mod reporter;
pub mod tables;
pub mod walker;

pub use alias::{AliasResolver, Resolved};
pub use cancel::CancellationToken;
pub use classify::{ImplicitSelfClassifier, UsageClassifier, VariableClassifier, Verdict};
pub use family::{FamilyProfile, FamilySet, Initializer};
pub use reporter::{Candidate, Evaluation, FileReport, MismatchReporter};
pub use tables::{ClassificationTables, NameTable};
pub use walker::{ScopeWalker, TrackedTarget, WalkOptions, WalkOutcome};
