//! Single-pass scope traversal.
//!
//! The walker visits every node of a scope once, in pre-order, picks out the
//! occurrences of one tracked target, runs each through the alias resolver
//! and a [`UsageClassifier`], and folds the verdicts into [`UsageFlags`].
//! With early exit on, the walk stops as soon as both flags are set.
//!
//! Locals initialized from the target (`List<String> v = log;`) are adopted
//! as aliases when their declaration is reached, so later uses of `v` count
//! toward `log`.

use std::ops::ControlFlow;

use tree_sitter::Node;

use super::alias::{AliasResolver, Resolved};
use super::classify::{UsageClassifier, Verdict};
use super::family::FamilyProfile;
use crate::syntax::source::{field_of, is_type_body, is_type_declaration, JavaSource};
use crate::syntax::symbols::{is_declaration_name, is_self_reference, DeclId, SymbolResolver};
use crate::types::{TargetKind, UsageFlags};

/// What a walk is looking for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackedTarget<'t> {
    /// A local or field, identified by its declarator name node.
    Variable { name: Node<'t>, kind: TargetKind },
    /// The instance being built by an anonymous class body: receiver-less
    /// calls and bare `this` inside `body`.
    ImplicitSelf { body: Node<'t> },
}

/// Walk configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WalkOptions {
    /// Stop once both flags are set.
    pub early_exit: bool,
}

impl Default for WalkOptions {
    fn default() -> Self {
        Self { early_exit: true }
    }
}

/// Result of one walk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WalkOutcome {
    pub flags: UsageFlags,
    /// Occurrences classified, including alias occurrences.
    pub occurrences: usize,
    /// The walk stopped before the end of the scope.
    pub short_circuited: bool,
}

/// Traverses scopes of one source on behalf of one container family.
pub struct ScopeWalker<'a> {
    source: &'a JavaSource,
    symbols: SymbolResolver<'a>,
    aliases: AliasResolver<'a>,
    options: WalkOptions,
}

/// Names and declaration ids that currently stand for the target.
struct AliasSet {
    names: Vec<String>,
    ids: Vec<DeclId>,
}

impl AliasSet {
    fn adopt(&mut self, name: String, id: DeclId) {
        if !self.ids.contains(&id) {
            self.names.push(name);
            self.ids.push(id);
        }
    }
}

impl<'a> ScopeWalker<'a> {
    pub fn new(source: &'a JavaSource, profile: &'a FamilyProfile, options: WalkOptions) -> Self {
        Self {
            source,
            symbols: SymbolResolver::new(source),
            aliases: AliasResolver::new(source, profile),
            options,
        }
    }

    /// Classify every occurrence of `target` in `scope` and fold the results.
    pub fn walk<C>(&self, scope: Node<'a>, target: TrackedTarget<'a>, classifier: &C) -> WalkOutcome
    where
        C: UsageClassifier<'a>,
    {
        let mut outcome = WalkOutcome::default();
        let early_exit = self.options.early_exit;
        let flow = self.for_each_occurrence(scope, target, |occurrence, resolved| {
            let verdict = classifier.classify(occurrence, resolved);
            outcome.occurrences += 1;
            outcome.flags.record(verdict.usage());
            if early_exit && outcome.flags.is_saturated() {
                return ControlFlow::Break(());
            }
            match verdict {
                Verdict::Alias(decl, _) => ControlFlow::Continue(Some(decl)),
                Verdict::Use(_) => ControlFlow::Continue(None),
            }
        });
        outcome.short_circuited = flow.is_break();
        outcome
    }

    /// Visit each occurrence of `target` in pre-order.
    ///
    /// The visitor returns `Continue(Some(name))` to adopt the local declared
    /// at `name` as an alias of the target, or `Break` to stop the walk.
    pub fn for_each_occurrence<F>(
        &self,
        scope: Node<'a>,
        target: TrackedTarget<'a>,
        mut visit: F,
    ) -> ControlFlow<()>
    where
        F: FnMut(Node<'a>, &Resolved<'a>) -> ControlFlow<(), Option<Node<'a>>>,
    {
        let mut tracked = AliasSet {
            names: Vec::new(),
            ids: Vec::new(),
        };
        if let TrackedTarget::Variable { name, .. } = target {
            tracked.adopt(self.source.text(name).to_string(), DeclId::of(name));
        }

        let mut cursor = scope.walk();
        let mut depth = 0usize;
        loop {
            let node = cursor.node();
            if self.is_occurrence(node, target, &tracked) {
                let resolved = self.aliases.resolve_effective(node);
                match visit(node, &resolved) {
                    ControlFlow::Break(()) => return ControlFlow::Break(()),
                    ControlFlow::Continue(Some(alias)) => {
                        tracked.adopt(self.source.text(alias).to_string(), DeclId::of(alias));
                    }
                    ControlFlow::Continue(None) => {}
                }
            }

            if self.descends_into(node, scope, target) && cursor.goto_first_child() {
                depth += 1;
                continue;
            }
            loop {
                if depth == 0 {
                    return ControlFlow::Continue(());
                }
                if cursor.goto_next_sibling() {
                    break;
                }
                cursor.goto_parent();
                depth -= 1;
            }
        }
    }

    fn is_occurrence(&self, node: Node<'a>, target: TrackedTarget<'a>, tracked: &AliasSet) -> bool {
        match target {
            TrackedTarget::Variable { name, kind } => match node.kind() {
                "identifier" => {
                    let text = self.source.text(node);
                    // Cheap name filter before resolving.
                    if !tracked.names.iter().any(|n| n == text) || is_declaration_name(node) {
                        return false;
                    }
                    self.symbols
                        .declaration_of(node)
                        .is_some_and(|id| tracked.ids.contains(&id))
                }
                "field_access" if kind == TargetKind::Field => {
                    self.is_field_access_of(node, name)
                }
                _ => false,
            },
            TrackedTarget::ImplicitSelf { .. } => match node.kind() {
                "method_invocation" => node.child_by_field_name("object").is_none(),
                "this" => !(node.parent().is_some_and(|p| p.kind() == "field_access")
                    && field_of(node) == Some("field")),
                _ => false,
            },
        }
    }

    /// `this.f`, `Outer.this.f`, or `q.f` where `f` names the tracked field.
    ///
    /// A private field is reachable through any instance of its class, so
    /// other qualifiers match unless their declared type is known to be a
    /// different class.
    fn is_field_access_of(&self, access: Node<'a>, field_name: Node<'a>) -> bool {
        let Some(field) = access.child_by_field_name("field") else {
            return false;
        };
        if self.source.text(field) != self.source.text(field_name) {
            return false;
        }
        match access.child_by_field_name("object") {
            Some(object) if is_self_reference(object) => self
                .symbols
                .resolve_self_field(access)
                .is_some_and(|decl| decl.id() == field_name.id()),
            Some(object) => match self.symbols.type_of_expression(object) {
                Some(ty) => self
                    .symbols
                    .declaring_type(field_name)
                    .map_or(true, |owner| owner == ty),
                None => true,
            },
            None => false,
        }
    }

    fn descends_into(&self, node: Node<'a>, scope: Node<'a>, target: TrackedTarget<'a>) -> bool {
        match target {
            TrackedTarget::Variable { .. } => true,
            // Receiver-less calls in a nested class belong to that class.
            TrackedTarget::ImplicitSelf { .. } => {
                node.id() == scope.id()
                    || !(is_type_body(node.kind()) || is_type_declaration(node.kind()))
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
