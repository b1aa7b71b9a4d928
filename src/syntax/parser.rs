//! Native tree-sitter parser wrapper for Java sources.
//!
//! # Design decisions
//!
//! - **No stored state.** `JavaParser` carries no fields. Tree-sitter's
//!   `Parser` is `!Send + !Sync`, so a fresh parser is created on every call.
//!   `Parser::new()` is a single allocation and `set_language` is a pointer
//!   swap, which keeps per-file parsing inside rayon workers trivial.
//!
//! - **Queries embedded at compile time.** The candidate-discovery query lives
//!   in `queries/candidates.scm` and is pulled in with `include_str!`.

use crate::error::{MismatchError, Result};

/// Source of the candidate-discovery query.
pub const CANDIDATES_QUERY: &str = include_str!("../../queries/candidates.scm");

/// Thin wrapper around native tree-sitter parsing for Java.
pub struct JavaParser;

impl JavaParser {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Parse `content` and return the concrete syntax tree.
    ///
    /// Syntax errors do not fail the parse; tree-sitter recovers and marks
    /// `ERROR` nodes, which the engine treats like any unrecognized shape.
    pub fn parse(&self, content: &str) -> Result<tree_sitter::Tree> {
        let mut parser = tree_sitter::Parser::new();
        parser
            .set_language(&Self::language())
            .map_err(|e| MismatchError::Parse(format!("Language version mismatch: {e}")))?;

        parser.parse(content, None).ok_or_else(|| {
            MismatchError::Parse("tree-sitter returned None (timeout or cancellation)".into())
        })
    }

    /// The statically linked Java grammar.
    #[must_use]
    pub fn language() -> tree_sitter::Language {
        tree_sitter_java::LANGUAGE.into()
    }

    /// Compile the candidate-discovery query.
    pub fn candidates_query() -> Result<tree_sitter::Query> {
        Self::load_query(CANDIDATES_QUERY)
    }

    /// Compile an arbitrary `.scm` query against the Java grammar.
    pub fn load_query(source: &str) -> Result<tree_sitter::Query> {
        tree_sitter::Query::new(&Self::language(), source)
            .map_err(|e| MismatchError::Parse(format!("Query compilation error: {e}")))
    }

    /// Whether `file_path` looks like a Java source file.
    #[must_use]
    pub fn is_supported(file_path: &str) -> bool {
        std::path::Path::new(file_path)
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e == "java")
    }
}

impl Default for JavaParser {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn parse_java_returns_valid_tree() {
        let parser = JavaParser::new();
        let source = r#"
package com.example;

import java.util.*;

public class Inventory {
    private final Map<String, Integer> stock = new HashMap<>();

    public void restock(String item, int count) {
        List<String> log = new ArrayList<>();
        log.add(item);
        stock.merge(item, count, Integer::sum);
    }
}
"#;
        let tree = parser.parse(source).expect("should parse Java");
        let root = tree.root_node();
        assert_eq!(root.kind(), "program");
        assert!(root.child_count() > 0, "tree should have children");
        assert!(!root.has_error(), "tree should be error-free");
    }

    #[test]
    fn parse_empty_source_returns_tree() {
        let tree = JavaParser::new().parse("").expect("empty source should parse");
        assert_eq!(tree.root_node().kind(), "program");
        assert_eq!(tree.root_node().child_count(), 0);
    }

    #[test]
    fn parse_with_syntax_errors_still_returns_tree() {
        let tree = JavaParser::new()
            .parse("class Broken { void m( { }")
            .expect("error recovery should still yield a tree");
        assert!(tree.root_node().has_error());
    }

    #[test]
    fn candidates_query_compiles() {
        let query = JavaParser::candidates_query().expect("query should compile");
        let names = query.capture_names();
        for expected in ["type", "name", "local", "field"] {
            assert!(
                names.contains(&expected),
                "missing capture @{expected} in {names:?}"
            );
        }
    }

    #[test]
    fn invalid_query_is_a_parse_error() {
        let err = JavaParser::load_query("(not_a_real_node) @x").unwrap_err();
        assert!(matches!(err, MismatchError::Parse(_)));
    }

    #[test_case("src/main/java/A.java", true ; "java file")]
    #[test_case("A.JAVA", false ; "uppercase extension")]
    #[test_case("build.gradle", false ; "gradle file")]
    #[test_case("README", false ; "no extension")]
    #[test_case("Foo.java.bak", false ; "backup file")]
    fn is_supported_parameterized(path: &str, expected: bool) {
        assert_eq!(JavaParser::is_supported(path), expected);
    }
}
