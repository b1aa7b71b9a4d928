//! Candidate discovery and mismatch reporting.
//!
//! For each local or field whose declared type belongs to a tracked family,
//! the reporter applies the cheap pre-filters, rejects candidates that escape
//! the scope, runs the walker, folds in what the initializer contributes, and
//! emits a [`Finding`] when exactly one of the two usage flags is set.

use tree_sitter::{Node, Query, QueryCursor};

use super::alias::{AliasResolver, Resolved};
use super::cancel::CancellationToken;
use super::classify::{discards_value, ImplicitSelfClassifier, VariableClassifier};
use super::family::{FamilyProfile, FamilySet, Initializer};
use super::registry;
use super::walker::{ScopeWalker, TrackedTarget, WalkOptions};
use crate::config::LintConfig;
use crate::error::Result;
use crate::syntax::parser::JavaParser;
use crate::syntax::source::{
    anonymous_body, argument_position, created_type_name, has_annotation, has_modifier,
    is_type_declaration, simple_name, strip_transparent, JavaSource,
};
use crate::types::{ContainerFamily, Finding, TargetKind, Usage, UsageFlags};

// ---------------------------------------------------------------------------
// Candidates
// ---------------------------------------------------------------------------

/// A declared local or field that might be reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate<'t> {
    /// The declarator's name identifier; its node id is the target identity.
    pub name: Node<'t>,
    pub declarator: Node<'t>,
    /// The enclosing `local_variable_declaration` or `field_declaration`.
    pub declaration: Node<'t>,
    pub kind: TargetKind,
    pub family: ContainerFamily,
}

impl<'t> Candidate<'t> {
    pub fn initializer(&self) -> Option<Node<'t>> {
        self.declarator.child_by_field_name("value")
    }

    pub fn target(&self) -> TrackedTarget<'t> {
        TrackedTarget::Variable {
            name: self.name,
            kind: self.kind,
        }
    }

    /// The lexical scope the walk covers.
    ///
    /// Locals: the enclosing block (the whole `switch` block for a local
    /// declared in a case group). Fields of a top-level type: the type body.
    /// Fields of a nested type: the whole file, since the enclosing type can
    /// reach them too.
    pub fn scope(&self, source: &'t JavaSource) -> Option<Node<'t>> {
        let parent = self.declaration.parent()?;
        match self.kind {
            TargetKind::Local if parent.kind() == "switch_block_statement_group" => parent.parent(),
            TargetKind::Local => Some(parent),
            TargetKind::Field => {
                let body = if parent.kind() == "enum_body_declarations" {
                    parent.parent()?
                } else {
                    parent
                };
                let owner = body.parent()?;
                let top_level = is_type_declaration(owner.kind())
                    && owner.parent().is_some_and(|p| p.kind() == "program");
                Some(if top_level { body } else { source.root() })
            }
        }
    }
}

/// Why a candidate was dropped before or instead of classification.
pub type SkipReason = &'static str;

/// What the reporter concluded about one candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Evaluation {
    Skipped(SkipReason),
    Classified(UsageFlags),
}

/// Per-file totals from [`MismatchReporter::check_source`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileReport {
    pub findings: Vec<Finding>,
    pub candidates: usize,
    pub skipped: usize,
}

// ---------------------------------------------------------------------------
// Reporter
// ---------------------------------------------------------------------------

/// Finds containers that are only queried or only updated.
///
/// Holds no per-file state and can be shared across threads.
pub struct MismatchReporter {
    families: FamilySet,
    options: WalkOptions,
    candidates: Query,
}

impl MismatchReporter {
    pub fn new(config: &LintConfig) -> Result<Self> {
        Ok(Self {
            families: FamilySet::from_config(config),
            options: WalkOptions {
                early_exit: config.performance.early_exit,
            },
            candidates: JavaParser::candidates_query()?,
        })
    }

    /// Override the walk options taken from the config.
    #[must_use]
    pub fn with_options(mut self, options: WalkOptions) -> Self {
        self.options = options;
        self
    }

    pub fn families(&self) -> &FamilySet {
        &self.families
    }

    /// Every local and field declarator whose type maps to a tracked,
    /// non-ignored family, in source order.
    pub fn discover_candidates<'s>(&self, source: &'s JavaSource) -> Vec<Candidate<'s>> {
        use streaming_iterator::StreamingIterator;

        let names = self.candidates.capture_names();
        let mut cursor = QueryCursor::new();
        let mut matches = cursor.matches(&self.candidates, source.root(), source.bytes());
        let mut found: Vec<Candidate<'s>> = Vec::new();

        while let Some(m) = matches.next() {
            let mut type_node = None;
            let mut name_node = None;
            let mut declaration = None;
            for capture in m.captures {
                match names[capture.index as usize] {
                    "type" => type_node = Some(capture.node),
                    "name" => name_node = Some(capture.node),
                    "local" => declaration = Some((capture.node, TargetKind::Local)),
                    "field" => declaration = Some((capture.node, TargetKind::Field)),
                    _ => {}
                }
            }
            let (Some(ty), Some(name), Some((declaration, kind))) = (type_node, name_node, declaration)
            else {
                continue;
            };
            if found.iter().any(|c| c.name.id() == name.id()) {
                continue;
            }
            let Some(declarator) = name.parent() else {
                continue;
            };
            let Some(family) = self.family_for(source, ty, declarator) else {
                continue;
            };
            found.push(Candidate {
                name,
                declarator,
                declaration,
                kind,
                family,
            });
        }

        found.sort_by_key(|c| c.name.start_byte());
        found
    }

    /// Family of a declared type, `None` when untracked or ignored.
    fn family_for(&self, source: &JavaSource, ty: Node<'_>, declarator: Node<'_>) -> Option<ContainerFamily> {
        if declarator.child_by_field_name("dimensions").is_some() {
            return self.unless_ignored(ContainerFamily::Array, simple_name(source.text(ty)));
        }
        if ty.kind() == "array_type" {
            let element = ty.child_by_field_name("element").unwrap_or(ty);
            return self.unless_ignored(ContainerFamily::Array, simple_name(source.text(element)));
        }
        let declared = simple_name(source.text(ty));
        if declared == "var" {
            return self.inferred_family(source, declarator.child_by_field_name("value")?);
        }
        let family = self.families.family_of_type(declared)?;
        self.unless_ignored(family, declared)
    }

    /// Family of a `var` declaration, read off its initializer.
    fn inferred_family(&self, source: &JavaSource, value: Node<'_>) -> Option<ContainerFamily> {
        let value = strip_transparent(value);
        match value.kind() {
            "array_creation_expression" => {
                let element = value.child_by_field_name("type")?;
                self.unless_ignored(ContainerFamily::Array, simple_name(source.text(element)))
            }
            "object_creation_expression" => {
                let created = created_type_name(source, value)?;
                let family = self.families.family_of_type(created)?;
                self.unless_ignored(family, created)
            }
            _ => None,
        }
    }

    fn unless_ignored(&self, family: ContainerFamily, simple: &str) -> Option<ContainerFamily> {
        (!self.families.get(family).is_ignored_type(simple)).then_some(family)
    }

    /// Classify each candidate and collect findings.
    ///
    /// Returns `Err(Cancelled)` if `cancel` fires; it is checked before each
    /// candidate and never in the middle of a walk.
    pub fn find_mismatches<'s>(
        &self,
        source: &'s JavaSource,
        candidates: &[Candidate<'s>],
        cancel: &CancellationToken,
    ) -> Result<Vec<Finding>> {
        let mut findings = Vec::new();
        for candidate in candidates {
            cancel.check()?;
            if let Some(finding) = self.report(source, candidate) {
                findings.push(finding);
            }
        }
        Ok(findings)
    }

    /// Discover candidates in `source` and check all of them.
    pub fn check_source(&self, source: &JavaSource, cancel: &CancellationToken) -> Result<FileReport> {
        let candidates = self.discover_candidates(source);
        let mut report = FileReport {
            candidates: candidates.len(),
            ..FileReport::default()
        };
        for candidate in &candidates {
            cancel.check()?;
            match self.evaluate(source, candidate) {
                Evaluation::Skipped(_) => report.skipped += 1,
                Evaluation::Classified(flags) => {
                    report.findings.extend(finding_for(source, candidate, flags));
                }
            }
        }
        Ok(report)
    }

    fn report(&self, source: &JavaSource, candidate: &Candidate<'_>) -> Option<Finding> {
        match self.evaluate(source, candidate) {
            Evaluation::Skipped(_) => None,
            Evaluation::Classified(flags) => finding_for(source, candidate, flags),
        }
    }

    /// Run the pre-filters, the escape check, the walk, and the initializer
    /// fold for one candidate.
    pub fn evaluate<'s>(&self, source: &'s JavaSource, candidate: &Candidate<'s>) -> Evaluation {
        let profile = self.families.get(candidate.family);
        let name = source.text(candidate.name);

        if candidate.kind == TargetKind::Field {
            if !has_modifier(candidate.declaration, "private") {
                return skip(name, "field is not private");
            }
            if has_annotation(candidate.declaration) {
                return skip(name, "field is annotated");
            }
        }
        let Some(scope) = candidate.scope(source) else {
            return skip(name, "no enclosing scope");
        };

        let walker = ScopeWalker::new(source, profile, self.options);
        if let Some(reason) = self.escape(source, profile, &walker, scope, candidate) {
            return skip(name, reason);
        }

        let classifier = VariableClassifier::new(source, profile);
        let mut flags = walker.walk(scope, candidate.target(), &classifier).flags;

        if let Some(value) = candidate.initializer() {
            match profile.initializer(source, value) {
                Initializer::Populated => flags.record(Usage::Update),
                Initializer::Anonymous(body) => {
                    let implicit = ImplicitSelfClassifier::new(source, profile, body);
                    let outcome = walker.walk(body, TrackedTarget::ImplicitSelf { body }, &implicit);
                    flags.merge(outcome.flags);
                }
                Initializer::Unknown => flags.record(Usage::Both),
                Initializer::Fresh | Initializer::Null => {}
            }
        }

        tracing::trace!(
            name,
            family = %candidate.family,
            queried = flags.queried(),
            updated = flags.updated(),
            "classified candidate"
        );
        Evaluation::Classified(flags)
    }

    /// First use of the target (or an alias) that lets it leave the scope.
    fn escape<'s>(
        &self,
        source: &'s JavaSource,
        profile: &FamilyProfile,
        walker: &ScopeWalker<'s>,
        scope: Node<'s>,
        candidate: &Candidate<'s>,
    ) -> Option<SkipReason> {
        let aliases = AliasResolver::new(source, profile);
        let mut found = None;
        let _ = walker.for_each_occurrence(scope, candidate.target(), |_, resolved| {
            if let Some(reason) = escape_reason(source, profile, resolved) {
                found = Some(reason);
                return std::ops::ControlFlow::Break(());
            }
            std::ops::ControlFlow::Continue(aliases.alias_declaration(resolved))
        });
        found
    }
}

fn skip(name: &str, reason: SkipReason) -> Evaluation {
    tracing::debug!(name, reason, "skipping candidate");
    Evaluation::Skipped(reason)
}

fn finding_for(source: &JavaSource, candidate: &Candidate<'_>, flags: UsageFlags) -> Option<Finding> {
    let missing = flags.missing_role()?;
    Some(Finding {
        name: source.text(candidate.name).to_string(),
        kind: candidate.kind,
        family: candidate.family,
        missing,
        location: source.location(candidate.name),
    })
}

/// Whether the context of `resolved` lets the value leave the scope.
fn escape_reason(source: &JavaSource, profile: &FamilyProfile, resolved: &Resolved<'_>) -> Option<SkipReason> {
    let parent = resolved.parent?;
    let field = resolved.field();
    match parent.kind() {
        "return_statement" => Some("returned"),
        "yield_statement" => Some("yielded from a switch"),
        "lambda_expression" if field == Some("body") && !discards_value(source, resolved.expr) => {
            Some("yielded from a lambda")
        }
        "array_initializer" => Some("stored in an array initializer"),
        "assignment_expression" => {
            let op = parent.child_by_field_name("operator").map(|op| source.text(op));
            if op != Some("=") {
                return None;
            }
            match field {
                Some("right") => Some("assigned to another variable"),
                Some("left") => {
                    let value = parent.child_by_field_name("right")?;
                    match profile.initializer(source, value) {
                        Initializer::Unknown | Initializer::Anonymous(_) => {
                            Some("reassigned from an unrecognized source")
                        }
                        _ => None,
                    }
                }
                _ => None,
            }
        }
        "variable_declarator" if field == Some("value") => {
            let declaration = parent.parent()?;
            (declaration.kind() != "local_variable_declaration").then_some("assigned to a field")
        }
        "argument_list" => {
            let (call, _) = argument_position(resolved.expr)?;
            match call.kind() {
                "explicit_constructor_invocation" => Some("passed to a constructor"),
                "object_creation_expression" => {
                    let copies = anonymous_body(call).is_none()
                        && created_type_name(source, call).is_some_and(registry::is_copy_constructor);
                    (!copies).then_some("passed to a constructor")
                }
                _ => None,
            }
        }
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MissingRole;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    fn reporter() -> MismatchReporter {
        MismatchReporter::new(&LintConfig::default()).unwrap()
    }

    fn in_method(body: &str) -> JavaSource {
        JavaSource::from_text(format!("class A {{ void m() {{ {body} }} }}")).unwrap()
    }

    /// Findings as `(name, missing)` pairs.
    fn check(src: &JavaSource) -> Vec<(String, MissingRole)> {
        reporter()
            .check_source(src, &CancellationToken::new())
            .unwrap()
            .findings
            .into_iter()
            .map(|f| (f.name, f.missing))
            .collect()
    }

    fn evaluate_first(src: &JavaSource) -> Evaluation {
        let reporter = reporter();
        let candidates = reporter.discover_candidates(src);
        reporter.evaluate(src, &candidates[0])
    }

    // -- Phase 1: discovery --

    #[test]
    fn discovers_tracked_declarations_only() {
        let src = JavaSource::from_text(
            "class A { private List<String> a; private String s; \
             void m() { StringBuilder b = new StringBuilder(); int n = 0; int[] c = new int[3]; \
             int d[] = {1}; var e = new HashMap<String, String>(); var f = compute(); } }",
        )
        .unwrap();
        let found: Vec<(String, ContainerFamily, TargetKind)> = reporter()
            .discover_candidates(&src)
            .iter()
            .map(|c| (src.text(c.name).to_string(), c.family, c.kind))
            .collect();
        assert_eq!(
            found,
            vec![
                ("a".to_string(), ContainerFamily::Collection, TargetKind::Field),
                ("b".to_string(), ContainerFamily::StringBuilder, TargetKind::Local),
                ("c".to_string(), ContainerFamily::Array, TargetKind::Local),
                ("d".to_string(), ContainerFamily::Array, TargetKind::Local),
                ("e".to_string(), ContainerFamily::Collection, TargetKind::Local),
            ]
        );
    }

    #[test]
    fn multiple_declarators_are_separate_candidates() {
        let src = in_method("List<String> a = new ArrayList<>(), b = new ArrayList<>();");
        assert_eq!(reporter().discover_candidates(&src).len(), 2);
    }

    #[test]
    fn ignored_types_are_not_candidates() {
        let config: LintConfig =
            serde_yaml::from_str("collection:\n  ignored_types: [Properties]\n").unwrap();
        let reporter = MismatchReporter::new(&config).unwrap();
        let src = in_method("Properties p = new Properties(); p.put(k, v);");
        assert!(reporter.discover_candidates(&src).is_empty());
    }

    // -- Phase 2: pre-filters --

    #[test_case("List<String> log = new ArrayList<>(); log.add(x); return log;", "returned" ; "return")]
    #[test_case("List<String> log = new ArrayList<>(); log.add(x); Supplier<List<String>> s = () -> log;", "yielded from a lambda" ; "expression lambda")]
    #[test_case("List<String> log = new ArrayList<>(); log.add(x); Object[] all = {log};", "stored in an array initializer" ; "array initializer")]
    #[test_case("List<String> log = new ArrayList<>(); log.add(x); other = log;", "assigned to another variable" ; "assigned away")]
    #[test_case("List<String> log = new ArrayList<>(); log.add(x); log = repo.load();", "reassigned from an unrecognized source" ; "reassigned")]
    #[test_case("List<String> log = new ArrayList<>(); log.add(x); new Holder(log);", "passed to a constructor" ; "constructor")]
    #[test_case("List<String> log = new ArrayList<>(); log.add(x); List<String> v = log; return v;", "returned" ; "returned through alias")]
    fn escapes_are_skipped(body: &str, reason: &'static str) {
        assert_eq!(evaluate_first(&in_method(body)), Evaluation::Skipped(reason));
    }

    #[test]
    fn copy_constructor_is_not_an_escape() {
        let src = in_method("List<String> log = new ArrayList<>(); log.add(x); Set<String> s = new HashSet<>(log);");
        assert!(matches!(
            evaluate_first(&src),
            Evaluation::Classified(flags) if flags.as_usage() == Usage::Both
        ));
        // The copy itself is only ever filled.
        assert_eq!(check(&src), vec![("s".to_string(), MissingRole::Query)]);
    }

    #[test]
    fn fresh_reassignment_is_not_an_escape() {
        let src = in_method("List<String> log = null; log = new ArrayList<>(); log.add(x);");
        assert_eq!(check(&src), vec![("log".to_string(), MissingRole::Query)]);
    }

    #[test]
    fn non_private_fields_are_skipped() {
        let src = JavaSource::from_text(
            "class A { List<String> items = new ArrayList<>(); void m() { items.add(x); } }",
        )
        .unwrap();
        assert_eq!(evaluate_first(&src), Evaluation::Skipped("field is not private"));
    }

    #[test]
    fn annotated_fields_are_skipped() {
        let src = JavaSource::from_text(
            "class A { @Inject private List<String> items = new ArrayList<>(); void m() { items.add(x); } }",
        )
        .unwrap();
        assert_eq!(evaluate_first(&src), Evaluation::Skipped("field is annotated"));
    }

    // -- Phase 3: classification and emission --

    #[test]
    fn update_only_local() {
        let src = in_method("List<String> log = new ArrayList<>(); log.add(\"a\");");
        assert_eq!(check(&src), vec![("log".to_string(), MissingRole::Query)]);
    }

    #[test]
    fn query_only_local() {
        let src = in_method("List<String> log = new ArrayList<>(); if (log.isEmpty()) { print(log.size()); }");
        assert_eq!(check(&src), vec![("log".to_string(), MissingRole::Update)]);
    }

    #[test]
    fn unused_fresh_local_is_not_reported() {
        assert!(check(&in_method("List<String> log = new ArrayList<>();")).is_empty());
    }

    #[test]
    fn populated_initializer_counts_as_update() {
        let src = in_method("List<String> log = new ArrayList<>(seed);");
        assert_eq!(check(&src), vec![("log".to_string(), MissingRole::Query)]);
    }

    #[test]
    fn unknown_initializer_counts_as_both() {
        let src = in_method("List<String> log = repo.load(); print(log.size());");
        assert!(check(&src).is_empty());
    }

    #[test]
    fn double_brace_initializer_walks_the_body() {
        let src = in_method(
            "List<String> log = new ArrayList<String>() {{ add(\"a\"); add(\"b\"); }}; \
             for (String s : log) { print(s); }",
        );
        assert!(check(&src).is_empty());
        let src = in_method("List<String> log = new ArrayList<String>() {{ add(\"a\"); }};");
        assert_eq!(check(&src), vec![("log".to_string(), MissingRole::Query)]);
    }

    #[test]
    fn private_field_uses_in_methods_count() {
        let src = JavaSource::from_text(
            "class A { private final Map<String, Integer> cache = new HashMap<>(); \
             void put(String k) { cache.put(k, 1); } \
             void clear() { this.cache.clear(); } }",
        )
        .unwrap();
        let findings = reporter().check_source(&src, &CancellationToken::new()).unwrap();
        assert_eq!(findings.candidates, 1);
        assert_eq!(findings.findings.len(), 1);
        let finding = &findings.findings[0];
        assert_eq!(finding.kind, TargetKind::Field);
        assert_eq!(finding.location.line, 1);
        assert_eq!(
            finding.message(),
            "Contents of collection 'cache' are updated, but never queried"
        );
    }

    #[test]
    fn nested_class_field_scope_is_the_file() {
        let src = JavaSource::from_text(
            "class Outer { \
               static class Inner { private List<String> names = new ArrayList<>(); void add(String n) { names.add(n); } } \
               int count(Inner i) { return i.names.size(); } }",
        )
        .unwrap();
        let candidate = reporter().discover_candidates(&src)[0];
        assert_eq!(candidate.scope(&src).map(|n| n.kind()), Some("program"));
        assert!(check(&src).is_empty());
    }

    #[test]
    fn local_in_switch_group_walks_the_whole_switch() {
        let src = in_method(
            "switch (k) { case 1: List<String> log = new ArrayList<>(); log.add(x); break; \
             case 2: print(log.size()); break; }",
        );
        let candidate = reporter().discover_candidates(&src)[0];
        assert_eq!(candidate.scope(&src).map(|n| n.kind()), Some("switch_block"));
        assert!(check(&src).is_empty());
    }

    #[test]
    fn arrays_use_read_write_wording() {
        let src = in_method("int[] counts = new int[4]; counts[0] = 1;");
        let report = reporter().check_source(&src, &CancellationToken::new()).unwrap();
        assert_eq!(
            report.findings[0].message(),
            "Contents of array 'counts' are written to, but never read"
        );
    }

    #[test]
    fn cancelled_token_stops_before_first_candidate() {
        let src = in_method("List<String> log = new ArrayList<>(); log.add(x);");
        let reporter = reporter();
        let candidates = reporter.discover_candidates(&src);
        let cancel = CancellationToken::new();
        cancel.cancel();
        assert!(matches!(
            reporter.find_mismatches(&src, &candidates, &cancel),
            Err(crate::error::MismatchError::Cancelled)
        ));
    }

    #[test]
    fn find_mismatches_matches_check_source() {
        let src = in_method(
            "List<String> a = new ArrayList<>(); a.add(x); \
             StringBuilder b = new StringBuilder(); print(b.length());",
        );
        let reporter = reporter();
        let candidates = reporter.discover_candidates(&src);
        let direct = reporter
            .find_mismatches(&src, &candidates, &CancellationToken::new())
            .unwrap();
        let report = reporter.check_source(&src, &CancellationToken::new()).unwrap();
        assert_eq!(direct, report.findings);
        assert_eq!(direct.len(), 2);
    }
}
