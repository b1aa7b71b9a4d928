//! Property-based tests for mismatch-lint using proptest.
//!
//! These tests verify invariants that must hold for all inputs: table
//! matching, flag monotonicity, the xor rule, early-exit equivalence, and
//! alias transparency over every registered view.

use proptest::prelude::*;

use mismatch_lint::config::LintConfig;
use mismatch_lint::engine::registry::{COLLECTION_VIEWS, STRING_BUILDER_VIEWS};
use mismatch_lint::engine::{Evaluation, MismatchReporter, NameTable, WalkOptions};
use mismatch_lint::syntax::JavaSource;
use mismatch_lint::types::{MissingRole, Usage, UsageFlags};

// ---------------------------------------------------------------------------
// Strategy helpers
// ---------------------------------------------------------------------------

fn arb_usage() -> impl Strategy<Value = Usage> {
    prop_oneof![
        Just(Usage::Ignore),
        Just(Usage::Query),
        Just(Usage::Update),
        Just(Usage::Both),
    ]
}

fn arb_identifier() -> impl Strategy<Value = String> {
    "[a-z][a-zA-Z0-9]{0,10}"
}

/// Statements that use the local `log` in different ways.
fn arb_statement() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec![
        "log.add(\"a\");",
        "log.size();",
        "log.clear();",
        "System.out.println(log.get(0));",
        "if (log.isEmpty()) { return; }",
        "boolean r = log.remove(\"a\");",
        "for (String s : log) { System.out.println(s); }",
        "if (log == null) { return; }",
        "log.hashCode();",
        "int n = 0;",
        "other.addAll(log);",
        "Collections.sort(log);",
    ])
}

/// Evaluate the first candidate in `body` with the given early-exit setting.
fn evaluate(body: &str, early_exit: bool) -> Evaluation {
    let src = JavaSource::from_text(format!(
        "class A {{ void m(List<String> other) {{ {body} }} }}"
    ))
    .unwrap();
    let reporter = MismatchReporter::new(&LintConfig::default())
        .unwrap()
        .with_options(WalkOptions { early_exit });
    let candidates = reporter.discover_candidates(&src);
    reporter.evaluate(&src, &candidates[0])
}

fn usage_of(evaluation: Evaluation) -> Usage {
    match evaluation {
        Evaluation::Classified(flags) => flags.as_usage(),
        Evaluation::Skipped(reason) => panic!("unexpected skip: {reason}"),
    }
}

// ---------------------------------------------------------------------------
// Name tables
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn fragment_matches_every_extension(fragment in arb_identifier(), suffix in "[A-Za-z0-9]{0,8}") {
        let table = NameTable::new([fragment.clone()]);
        let name = format!("{fragment}{suffix}");
        prop_assert!(table.matches(&name));
    }

    #[test]
    fn names_shorter_than_every_fragment_never_match(fragment in "[a-z]{3,8}") {
        let table = NameTable::new([fragment.clone()]);
        let shorter = &fragment[..fragment.len() - 1];
        prop_assert!(!table.matches(shorter));
    }

    #[test]
    fn table_order_does_not_change_matching(
        mut fragments in prop::collection::vec(arb_identifier(), 1..6),
        name in arb_identifier(),
    ) {
        let forward = NameTable::new(fragments.clone());
        fragments.reverse();
        let backward = NameTable::new(fragments);
        prop_assert_eq!(forward.matches(&name), backward.matches(&name));
    }
}

// ---------------------------------------------------------------------------
// Flags
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn flags_are_monotonic(usages in prop::collection::vec(arb_usage(), 0..20)) {
        let mut flags = UsageFlags::new();
        let mut expected = Usage::Ignore;
        for usage in usages {
            let before = flags;
            flags.record(usage);
            prop_assert!(!before.queried() || flags.queried());
            prop_assert!(!before.updated() || flags.updated());
            expected = expected.union(usage);
        }
        prop_assert_eq!(flags.as_usage(), expected);
    }

    #[test]
    fn merge_is_commutative(a in prop::collection::vec(arb_usage(), 0..6), b in prop::collection::vec(arb_usage(), 0..6)) {
        let fold = |usages: &[Usage]| {
            let mut flags = UsageFlags::new();
            usages.iter().for_each(|u| flags.record(*u));
            flags
        };
        let (fa, fb) = (fold(&a), fold(&b));
        let mut ab = fa;
        ab.merge(fb);
        let mut ba = fb;
        ba.merge(fa);
        prop_assert_eq!(ab, ba);
    }

    #[test]
    fn finding_iff_exactly_one_flag(queried in any::<bool>(), updated in any::<bool>()) {
        let mut flags = UsageFlags::new();
        flags.record(Usage::from_parts(queried, updated));
        let missing = flags.missing_role();
        prop_assert_eq!(missing.is_some(), queried != updated);
        if updated && !queried {
            prop_assert_eq!(missing, Some(MissingRole::Query));
        }
        if queried && !updated {
            prop_assert_eq!(missing, Some(MissingRole::Update));
        }
    }
}

// ---------------------------------------------------------------------------
// Walks
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn early_exit_does_not_change_the_verdict(statements in prop::collection::vec(arb_statement(), 0..8)) {
        let body = format!("List<String> log = new ArrayList<>(); {}", statements.join(" "));
        prop_assert_eq!(evaluate(&body, true), evaluate(&body, false));
    }

    #[test]
    fn collection_views_are_transparent(
        view in 0..COLLECTION_VIEWS.len(),
        terminal in prop::sample::select(vec!["add", "size", "clear", "contains", "isEmpty", "remove", "frobnicate"]),
    ) {
        let view = COLLECTION_VIEWS[view];
        let through = format!("List<String> log = new ArrayList<>(); log.{}().{terminal}(x);", view.name);
        let direct = format!("List<String> log = new ArrayList<>(); log.{terminal}(x);");
        prop_assert_eq!(
            usage_of(evaluate(&through, false)),
            usage_of(evaluate(&direct, false)).union(view.implied)
        );
    }

    #[test]
    fn builder_chains_are_transparent(
        view in 0..STRING_BUILDER_VIEWS.len(),
        terminal in prop::sample::select(vec!["length", "toString", "charAt", "setLength", "frobnicate"]),
    ) {
        let view = STRING_BUILDER_VIEWS[view];
        let through = format!("StringBuilder log = new StringBuilder(); log.{}(x).{terminal}();", view.name);
        let direct = format!("StringBuilder log = new StringBuilder(); log.{terminal}();");
        prop_assert_eq!(
            usage_of(evaluate(&through, false)),
            usage_of(evaluate(&direct, false)).union(view.implied)
        );
    }
}
