//! Upward alias resolution.
//!
//! From one occurrence of a tracked value, climb through syntax that passes
//! the value through unchanged: parentheses, casts, ternary branches, derived
//! views such as `list.subList(a, b)`, and wrapping factories such as
//! `Collections.unmodifiableList(list)`. The outermost such expression and
//! its parent are what the classifier looks at.

use tree_sitter::Node;

use super::family::FamilyProfile;
use crate::syntax::source::{argument_count, argument_position, field_of, simple_name, JavaSource};
use crate::types::Usage;

/// The outermost expression attributable to an occurrence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolved<'t> {
    pub expr: Node<'t>,
    /// `None` only for a malformed tree.
    pub parent: Option<Node<'t>>,
    /// Roles performed by the views passed through on the way up.
    pub implied: Usage,
    /// Number of levels climbed.
    pub hops: usize,
}

impl<'t> Resolved<'t> {
    /// The grammar field `expr` occupies in `parent`.
    pub fn field(&self) -> Option<&'static str> {
        field_of(self.expr)
    }
}

/// Climbs from occurrences to their effective expressions.
pub struct AliasResolver<'a> {
    source: &'a JavaSource,
    profile: &'a FamilyProfile,
}

impl<'a> AliasResolver<'a> {
    pub fn new(source: &'a JavaSource, profile: &'a FamilyProfile) -> Self {
        Self { source, profile }
    }

    /// Resolve `occurrence` to its effective expression. Always terminates:
    /// every step moves to a strict ancestor.
    pub fn resolve_effective(&self, occurrence: Node<'a>) -> Resolved<'a> {
        let mut expr = occurrence;
        let mut implied = Usage::Ignore;
        let mut hops = 0;
        while let Some((outer, role)) = self.step(expr) {
            expr = outer;
            implied = implied.union(role);
            hops += 1;
        }
        Resolved {
            expr,
            parent: expr.parent(),
            implied,
            hops,
        }
    }

    /// One transparent level above `current`, with the role it implies.
    fn step(&self, current: Node<'a>) -> Option<(Node<'a>, Usage)> {
        let parent = current.parent()?;
        let field = field_of(current);
        match parent.kind() {
            "parenthesized_expression" => Some((parent, Usage::Ignore)),
            "cast_expression" if field == Some("value") => Some((parent, Usage::Ignore)),
            "ternary_expression" if matches!(field, Some("consequence" | "alternative")) => {
                Some((parent, Usage::Ignore))
            }
            "method_invocation" if field == Some("object") => {
                let name = self.source.text(parent.child_by_field_name("name")?);
                self.profile.view(name).map(|view| (parent, view.implied))
            }
            "argument_list" => {
                let (call, index) = argument_position(current)?;
                if call.kind() != "method_invocation" {
                    return None;
                }
                let owner = simple_name(self.source.text(call.child_by_field_name("object")?));
                let name = self.source.text(call.child_by_field_name("name")?);
                self.profile
                    .wrapper(owner, name, index, argument_count(call))
                    .map(|_| (call, Usage::Ignore))
            }
            _ => None,
        }
    }

    /// The local variable that `resolved` initializes, if any
    /// (`List<String> view = Collections.synchronizedList(log);`).
    pub fn alias_declaration(&self, resolved: &Resolved<'a>) -> Option<Node<'a>> {
        let declarator = resolved.parent?;
        if declarator.kind() != "variable_declarator" || resolved.field() != Some("value") {
            return None;
        }
        if declarator.parent()?.kind() != "local_variable_declaration" {
            return None;
        }
        declarator.child_by_field_name("name")
    }
}
