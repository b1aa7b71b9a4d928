//! Context classification: what one occurrence does to a container.
//!
//! Given the effective expression produced by the alias resolver and its
//! parent, decide whether the occurrence reads the contents, writes them,
//! both, or neither. Unrecognized contexts are `Both`: an unknown use must not
//! hide a real query or update.
//!
//! Two strategies share this module. [`VariableClassifier`] handles a named
//! local or field. [`ImplicitSelfClassifier`] handles the receiver-less calls
//! and `this` references inside an anonymous container subclass.

use tree_sitter::Node;

use super::alias::{AliasResolver, Resolved};
use super::family::{FamilyProfile, Initializer};
use super::registry::{self, CallSite};
use crate::config::defaults;
use crate::syntax::source::{
    anonymous_body, argument_position, created_type_name, field_of, invoked_name, is_type_body,
    is_type_declaration, significant_children, simple_name, JavaSource,
};
use crate::syntax::symbols::SymbolResolver;
use crate::types::{ContainerFamily, Usage};

/// Outcome of classifying one occurrence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict<'t> {
    Use(Usage),
    /// The occurrence initializes another local, which from here on stands
    /// for the same container. Carries the role the occurrence itself implies.
    Alias(Node<'t>, Usage),
}

impl Verdict<'_> {
    pub fn usage(&self) -> Usage {
        match self {
            Self::Use(usage) | Self::Alias(_, usage) => *usage,
        }
    }
}

/// Strategy the scope walker calls for each occurrence.
pub trait UsageClassifier<'a> {
    /// Classify `occurrence`, whose effective expression is `resolved`.
    fn classify(&self, occurrence: Node<'a>, resolved: &Resolved<'a>) -> Verdict<'a>;
}

// ---------------------------------------------------------------------------
// Named variables and fields
// ---------------------------------------------------------------------------

/// Classifier for a named local or field.
pub struct VariableClassifier<'a> {
    source: &'a JavaSource,
    profile: &'a FamilyProfile,
    aliases: AliasResolver<'a>,
    symbols: SymbolResolver<'a>,
}

impl<'a> UsageClassifier<'a> for VariableClassifier<'a> {
    fn classify(&self, _occurrence: Node<'a>, resolved: &Resolved<'a>) -> Verdict<'a> {
        match self.context(resolved) {
            Verdict::Use(usage) => Verdict::Use(usage.union(resolved.implied)),
            Verdict::Alias(decl, usage) => Verdict::Alias(decl, usage.union(resolved.implied)),
        }
    }
}

impl<'a> VariableClassifier<'a> {
    pub fn new(source: &'a JavaSource, profile: &'a FamilyProfile) -> Self {
        Self {
            source,
            profile,
            aliases: AliasResolver::new(source, profile),
            symbols: SymbolResolver::new(source),
        }
    }

    /// Cases in priority order; the implied role is folded in by the caller.
    fn context(&self, resolved: &Resolved<'a>) -> Verdict<'a> {
        let Some(parent) = resolved.parent else {
            return Verdict::Use(Usage::Both);
        };
        let expr = resolved.expr;
        let field = resolved.field();
        let usage = match parent.kind() {
            "method_invocation" if field == Some("object") => self.direct_call(parent),
            "method_reference" if is_reference_receiver(parent, expr) => {
                self.method_reference(parent)
            }
            "argument_list" => self.argument(expr),
            "enhanced_for_statement" if field == Some("value") => Usage::Query,
            "assignment_expression" => self.assignment(parent, field),
            "binary_expression" => self.binary(parent),
            "instanceof_expression" => Usage::Ignore,
            "assert_statement" => {
                let condition = significant_children(parent).into_iter().next();
                if condition.is_some_and(|c| c.id() == expr.id()) {
                    Usage::Both
                } else {
                    Usage::Query
                }
            }
            "array_access" if field == Some("array") => self.array_element(parent),
            "field_access" if field == Some("object") => self.member_access(parent),
            "synchronized_statement" | "expression_statement" => Usage::Ignore,
            "lambda_expression" if discards_value(self.source, expr) => Usage::Ignore,
            "variable_declarator" if field == Some("value") => {
                return match self.aliases.alias_declaration(resolved) {
                    Some(decl) => Verdict::Alias(decl, Usage::Ignore),
                    None => Verdict::Use(Usage::Both),
                };
            }
            _ => Usage::Both,
        };
        Verdict::Use(usage)
    }

    /// Roles for a call named `name` on the container, or `None` when the
    /// tables do not know the name.
    pub fn call_usage(&self, name: &str, result_used: bool) -> Option<Usage> {
        let tables = self.profile.tables();
        let (query, update) = (tables.is_query_name(name), tables.is_update_name(name));
        if update {
            return Some(if query || result_used {
                Usage::Both
            } else {
                Usage::Update
            });
        }
        if query || self.profile.is_pure(name) {
            return Some(Usage::Query);
        }
        None
    }

    fn direct_call(&self, call: Node<'a>) -> Usage {
        let Some(name) = invoked_name(self.source, call) else {
            return Usage::Both;
        };
        self.call_usage(name, !discards_value(self.source, call))
            .unwrap_or(Usage::Both)
    }

    fn method_reference(&self, reference: Node<'a>) -> Usage {
        let Some(name) = invoked_name(self.source, reference) else {
            return Usage::Both;
        };
        if name == "new" {
            return Usage::Both;
        }
        let returns_value = !self.profile.is_void(name);
        self.call_usage(name, returns_value).unwrap_or(Usage::Both)
    }

    fn argument(&self, arg: Node<'a>) -> Usage {
        let Some((call, index)) = argument_position(arg) else {
            return Usage::Both;
        };
        match call.kind() {
            "method_invocation" => {
                let site = self.call_site(call);
                let name = invoked_name(self.source, call).unwrap_or_default();
                if self.profile.family() == ContainerFamily::Array
                    && name == "arraycopy"
                    && matches!(site, CallSite::Unqualified | CallSite::Named("System"))
                {
                    return array_copy_usage(index);
                }
                registry::safe_argument(site, name)
                    .map(|entry| entry.shape.usage_at(index))
                    .unwrap_or(Usage::Both)
            }
            "object_creation_expression" => {
                if anonymous_body(call).is_some() {
                    return Usage::Both;
                }
                created_type_name(self.source, call)
                    .and_then(|owner| registry::safe_argument(CallSite::Named(owner), "new"))
                    .map(|entry| entry.shape.usage_at(index))
                    .unwrap_or(Usage::Both)
            }
            _ => Usage::Both,
        }
    }

    /// What the qualifier of `call` is known to be.
    fn call_site(&self, call: Node<'a>) -> CallSite<'a> {
        let Some(object) = call.child_by_field_name("object") else {
            return CallSite::Unqualified;
        };
        let text = self.source.text(object);
        if matches!(text, "System.out" | "System.err") {
            return CallSite::Console;
        }
        if self
            .symbols
            .type_of_expression(object)
            .is_some_and(is_container_type)
        {
            return CallSite::Container;
        }
        CallSite::Named(simple_name(text))
    }

    fn assignment(&self, assignment: Node<'a>, field: Option<&str>) -> Usage {
        let operator = assignment
            .child_by_field_name("operator")
            .map(|op| self.source.text(op))
            .unwrap_or("=");
        match (field, operator) {
            (Some("left"), "=") => {
                let Some(value) = assignment.child_by_field_name("right") else {
                    return Usage::Both;
                };
                match self.profile.initializer(self.source, value) {
                    Initializer::Fresh | Initializer::Null => Usage::Ignore,
                    Initializer::Populated => Usage::Update,
                    Initializer::Anonymous(_) | Initializer::Unknown => Usage::Both,
                }
            }
            (Some("right"), "+=") => Usage::Query,
            _ => Usage::Both,
        }
    }

    fn binary(&self, binary: Node<'a>) -> Usage {
        let operator = binary
            .child_by_field_name("operator")
            .map(|op| self.source.text(op))
            .unwrap_or("");
        match operator {
            "+" => Usage::Query,
            "==" | "!=" => Usage::Ignore,
            _ => Usage::Both,
        }
    }

    /// `a[i]` as an rvalue reads; `a[i] = v` writes; `a[i] += v` and `a[i]++` do both.
    fn array_element(&self, access: Node<'a>) -> Usage {
        let mut outer = access;
        while let Some(parent) = outer.parent() {
            if parent.kind() == "array_access" && field_of(outer) == Some("array") {
                outer = parent;
            } else {
                break;
            }
        }
        let Some(parent) = outer.parent() else {
            return Usage::Both;
        };
        match parent.kind() {
            "assignment_expression" if field_of(outer) == Some("left") => {
                let operator = parent
                    .child_by_field_name("operator")
                    .map(|op| self.source.text(op))
                    .unwrap_or("=");
                if operator == "=" {
                    Usage::Update
                } else {
                    Usage::Both
                }
            }
            "update_expression" => Usage::Both,
            _ => Usage::Query,
        }
    }

    fn member_access(&self, access: Node<'a>) -> Usage {
        let is_length = access
            .child_by_field_name("field")
            .is_some_and(|f| self.source.text(f) == "length");
        if is_length && self.profile.family() == ContainerFamily::Array {
            Usage::Ignore
        } else {
            Usage::Both
        }
    }
}

/// `System.arraycopy(src, srcPos, dest, destPos, length)`.
fn array_copy_usage(index: usize) -> Usage {
    match index {
        0 => Usage::Query,
        2 => Usage::Update,
        _ => Usage::Both,
    }
}

fn is_container_type(simple: &str) -> bool {
    simple == "String"
        || [ContainerFamily::Collection, ContainerFamily::StringBuilder]
            .into_iter()
            .any(|family| defaults::type_names(family).contains(&simple))
}

/// Whether the value of `expr` is thrown away: it is a bare expression
/// statement, or the body of an expression lambda handed to a void consumer
/// such as `forEach`.
pub fn discards_value(source: &JavaSource, expr: Node<'_>) -> bool {
    let Some(parent) = expr.parent() else {
        return false;
    };
    match parent.kind() {
        "expression_statement" => true,
        "lambda_expression" if field_of(expr) == Some("body") => argument_position(parent)
            .filter(|(call, _)| call.kind() == "method_invocation")
            .and_then(|(call, _)| invoked_name(source, call))
            .is_some_and(|name| registry::VOID_CONSUMERS.contains(&name)),
        _ => false,
    }
}

fn is_reference_receiver(reference: Node<'_>, expr: Node<'_>) -> bool {
    reference
        .named_child(0)
        .is_some_and(|first| first.id() == expr.id())
}

// ---------------------------------------------------------------------------
// Implicit self (anonymous container subclasses)
// ---------------------------------------------------------------------------

/// Classifier for receiver-less calls and `this` inside an anonymous body
/// such as `new ArrayList<>() {{ add("a"); }}`.
pub struct ImplicitSelfClassifier<'a> {
    source: &'a JavaSource,
    profile: &'a FamilyProfile,
    body: Node<'a>,
    variable: VariableClassifier<'a>,
}

impl<'a> UsageClassifier<'a> for ImplicitSelfClassifier<'a> {
    fn classify(&self, occurrence: Node<'a>, resolved: &Resolved<'a>) -> Verdict<'a> {
        if occurrence.kind() != "method_invocation" {
            return self.as_receiver(resolved, Usage::Ignore);
        }
        let Some(name) = invoked_name(self.source, occurrence) else {
            return Verdict::Use(Usage::Both);
        };
        if let Some(view) = self.profile.view(name) {
            return self.as_receiver(resolved, view.implied);
        }
        let usage = self
            .variable
            .call_usage(name, !discards_value(self.source, occurrence))
            .unwrap_or_else(|| self.unknown_call(name));
        Verdict::Use(usage)
    }
}

impl<'a> ImplicitSelfClassifier<'a> {
    pub fn new(source: &'a JavaSource, profile: &'a FamilyProfile, body: Node<'a>) -> Self {
        Self {
            source,
            profile,
            body,
            variable: VariableClassifier::new(source, profile),
        }
    }

    /// `this`, or the result of a receiver-less view call, used as a value.
    fn as_receiver(&self, resolved: &Resolved<'a>, implied: Usage) -> Verdict<'a> {
        if resolved.parent.is_some_and(|p| p.kind() == "argument_list") {
            return Verdict::Use(Usage::Both);
        }
        let usage = match self.variable.classify(resolved.expr, resolved) {
            Verdict::Use(usage) => usage,
            // Aliases of the anonymous instance are not followed.
            Verdict::Alias(..) => Usage::Both,
        };
        Verdict::Use(usage.union(implied))
    }

    /// A name outside the tables: ignored when it is a method of an enclosing
    /// named class, otherwise unknown.
    fn unknown_call(&self, name: &str) -> Usage {
        if declares_method(self.source, self.body, name) {
            return Usage::Both;
        }
        let mut current = self.body;
        while let Some(parent) = current.parent() {
            if is_type_body(parent.kind())
                && parent.parent().is_some_and(|d| is_type_declaration(d.kind()))
                && declares_method(self.source, parent, name)
            {
                return Usage::Ignore;
            }
            current = parent;
        }
        Usage::Both
    }
}

fn declares_method(source: &JavaSource, body: Node<'_>, name: &str) -> bool {
    significant_children(body).into_iter().any(|member| {
        member.kind() == "method_declaration"
            && member
                .child_by_field_name("name")
                .is_some_and(|n| source.text(n) == name)
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
