//! Core domain types for mismatch-lint.
//!
//! These are the values that flow between the engine stages and out to the
//! host: the container family a target belongs to, the per-occurrence
//! [`Usage`], the per-walk [`UsageFlags`], and the emitted [`Finding`].

use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// ContainerFamily
// ---------------------------------------------------------------------------

/// The mutable container families the engine knows how to classify.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContainerFamily {
    /// `java.util` collections and maps.
    Collection,
    /// `StringBuilder` / `StringBuffer`.
    StringBuilder,
    /// Java arrays of any element type.
    Array,
}

impl ContainerFamily {
    pub const ALL: [ContainerFamily; 3] = [Self::Collection, Self::StringBuilder, Self::Array];

    /// Canonical string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Collection => "collection",
            Self::StringBuilder => "string_builder",
            Self::Array => "array",
        }
    }

    /// Parse from a loose string (case-insensitive, dashes accepted).
    pub fn from_str_loose(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "collection" | "collections" => Some(Self::Collection),
            "string_builder" | "stringbuilder" | "builder" => Some(Self::StringBuilder),
            "array" | "arrays" => Some(Self::Array),
            _ => None,
        }
    }

    /// Noun used in diagnostics ("Contents of collection 'x' ...").
    fn noun(&self) -> &'static str {
        match self {
            Self::Collection => "collection",
            Self::StringBuilder => "StringBuilder",
            Self::Array => "array",
        }
    }
}

impl fmt::Display for ContainerFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Usage
// ---------------------------------------------------------------------------

/// How a single occurrence of a target uses the target's contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Usage {
    /// Neither reads nor writes contents (e.g. a null check).
    Ignore,
    Query,
    Update,
    /// Reads and writes, or an escape whose effect is unknown.
    Both,
}

impl Usage {
    pub fn from_parts(queried: bool, updated: bool) -> Self {
        match (queried, updated) {
            (false, false) => Self::Ignore,
            (true, false) => Self::Query,
            (false, true) => Self::Update,
            (true, true) => Self::Both,
        }
    }

    pub fn queries(self) -> bool {
        matches!(self, Self::Query | Self::Both)
    }

    pub fn updates(self) -> bool {
        matches!(self, Self::Update | Self::Both)
    }

    /// Least upper bound of two usages.
    #[must_use]
    pub fn union(self, other: Usage) -> Usage {
        Self::from_parts(
            self.queries() || other.queries(),
            self.updates() || other.updates(),
        )
    }
}

// ---------------------------------------------------------------------------
// UsageFlags
// ---------------------------------------------------------------------------

/// Sticky `(queried, updated)` pair accumulated over one walk.
///
/// Flags only ever go from `false` to `true`; there is no way to clear one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageFlags {
    queried: bool,
    updated: bool,
}

impl UsageFlags {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn queried(&self) -> bool {
        self.queried
    }

    pub fn updated(&self) -> bool {
        self.updated
    }

    /// Fold one occurrence's usage into the flags.
    pub fn record(&mut self, usage: Usage) {
        self.queried |= usage.queries();
        self.updated |= usage.updates();
    }

    /// Fold another set of flags (e.g. initializer evidence) into these.
    pub fn merge(&mut self, other: UsageFlags) {
        self.queried |= other.queried;
        self.updated |= other.updated;
    }

    /// Both flags set: nothing further can change the outcome.
    pub fn is_saturated(&self) -> bool {
        self.queried && self.updated
    }

    pub fn as_usage(&self) -> Usage {
        Usage::from_parts(self.queried, self.updated)
    }

    /// The role that never happened, when exactly one of the two did.
    pub fn missing_role(&self) -> Option<MissingRole> {
        match (self.queried, self.updated) {
            (true, false) => Some(MissingRole::Update),
            (false, true) => Some(MissingRole::Query),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Finding
// ---------------------------------------------------------------------------

/// The role a reported target is missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingRole {
    /// Updated but never queried.
    Query,
    /// Queried but never updated.
    Update,
}

/// Whether a target is a local variable or a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetKind {
    Local,
    Field,
}

impl TargetKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Field => "field",
        }
    }
}

/// A 1-based position in a source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceLocation {
    pub file_path: String,
    pub line: u32,
    pub column: u32,
}

/// A container that is only ever queried or only ever updated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub name: String,
    pub kind: TargetKind,
    pub family: ContainerFamily,
    pub missing: MissingRole,
    pub location: SourceLocation,
}

impl Finding {
    /// Human-readable diagnostic text.
    pub fn message(&self) -> String {
        let (done, missing) = match (self.family, self.missing) {
            (ContainerFamily::Array, MissingRole::Query) => ("written to", "read"),
            (ContainerFamily::Array, MissingRole::Update) => ("read", "written to"),
            (_, MissingRole::Query) => ("updated", "queried"),
            (_, MissingRole::Update) => ("queried", "updated"),
        };
        format!(
            "Contents of {} '{}' are {}, but never {}",
            self.family.noun(),
            self.name,
            done,
            missing
        )
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
