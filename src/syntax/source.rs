//! A parsed Java file plus the small set of node helpers the engine needs.
//!
//! `JavaSource` owns both the text and the tree so node lifetimes can borrow
//! from one value. Everything here is read-only.

use std::path::{Path, PathBuf};

use tree_sitter::{Node, Tree};

use super::parser::JavaParser;
use crate::error::Result;
use crate::types::SourceLocation;

/// Placeholder path for sources that did not come from disk.
const IN_MEMORY_PATH: &str = "<memory>";

/// A Java compilation unit: path, text, and syntax tree.
pub struct JavaSource {
    path: PathBuf,
    text: String,
    tree: Tree,
}

impl JavaSource {
    /// Parse `text` as the contents of `path`.
    pub fn parse(path: impl Into<PathBuf>, text: impl Into<String>) -> Result<Self> {
        let text = text.into();
        let tree = JavaParser::new().parse(&text)?;
        Ok(Self {
            path: path.into(),
            text,
            tree,
        })
    }

    /// Parse a source that has no file on disk.
    pub fn from_text(text: impl Into<String>) -> Result<Self> {
        Self::parse(IN_MEMORY_PATH, text)
    }

    /// Read and parse a file from disk.
    pub fn read(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::parse(path, text)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn root(&self) -> Node<'_> {
        self.tree.root_node()
    }

    pub fn has_errors(&self) -> bool {
        self.tree.root_node().has_error()
    }

    /// Source text covered by `node` (empty if the slice is not valid UTF-8).
    pub fn text(&self, node: Node<'_>) -> &str {
        node.utf8_text(self.text.as_bytes()).unwrap_or("")
    }

    pub fn bytes(&self) -> &[u8] {
        self.text.as_bytes()
    }

    /// 1-based location of `node`'s first character.
    pub fn location(&self, node: Node<'_>) -> SourceLocation {
        let point = node.start_position();
        SourceLocation {
            file_path: self.path.display().to_string(),
            line: point.row as u32 + 1,
            column: point.column as u32 + 1,
        }
    }
}

// ---------------------------------------------------------------------------
// Node helpers
// ---------------------------------------------------------------------------

/// The grammar field under which `node` hangs from its parent, if any.
pub fn field_of(node: Node<'_>) -> Option<&'static str> {
    let parent = node.parent()?;
    let mut cursor = parent.walk();
    if !cursor.goto_first_child() {
        return None;
    }
    loop {
        if cursor.node().id() == node.id() {
            return cursor.field_name();
        }
        if !cursor.goto_next_sibling() {
            return None;
        }
    }
}

pub fn is_comment(node: Node<'_>) -> bool {
    matches!(node.kind(), "line_comment" | "block_comment")
}

/// Named, non-comment children of `node`, in source order.
pub fn significant_children<'t>(node: Node<'t>) -> Vec<Node<'t>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor)
        .filter(|child| !is_comment(*child))
        .collect()
}

/// Descend through parentheses and casts to the expression they wrap.
pub fn strip_transparent(mut node: Node<'_>) -> Node<'_> {
    loop {
        let inner = match node.kind() {
            "parenthesized_expression" => significant_children(node).into_iter().next(),
            "cast_expression" => node.child_by_field_name("value"),
            _ => None,
        };
        match inner {
            Some(inner) => node = inner,
            None => return node,
        }
    }
}

/// For an argument expression, the enclosing call and the argument's index.
pub fn argument_position(arg: Node<'_>) -> Option<(Node<'_>, usize)> {
    let list = arg.parent()?;
    if list.kind() != "argument_list" {
        return None;
    }
    let index = significant_children(list)
        .iter()
        .position(|child| child.id() == arg.id())?;
    Some((list.parent()?, index))
}

/// Number of arguments passed at a call or object creation site.
pub fn argument_count(call: Node<'_>) -> usize {
    call.child_by_field_name("arguments")
        .map(|args| significant_children(args).len())
        .unwrap_or(0)
}

/// Last dotted segment with any generic arguments removed:
/// `java.util.ArrayList<String>` → `ArrayList`.
pub fn simple_name(text: &str) -> &str {
    let base = text.split('<').next().unwrap_or(text).trim();
    base.rsplit('.').next().unwrap_or(base).trim()
}

/// Method name of a `method_invocation` or `method_reference`.
pub fn invoked_name<'s>(source: &'s JavaSource, call: Node<'_>) -> Option<&'s str> {
    match call.kind() {
        "method_invocation" => call.child_by_field_name("name").map(|n| source.text(n)),
        "method_reference" => {
            let children = significant_children(call);
            match children.last() {
                Some(last) if children.len() > 1 && last.kind() == "identifier" => {
                    Some(source.text(*last))
                }
                // `Type::new`
                _ => Some("new"),
            }
        }
        _ => None,
    }
}

/// Simple type name created by an `object_creation_expression`.
pub fn created_type_name<'s>(source: &'s JavaSource, creation: Node<'_>) -> Option<&'s str> {
    creation
        .child_by_field_name("type")
        .map(|t| simple_name(source.text(t)))
}

/// The anonymous class body attached to an object creation, if any.
pub fn anonymous_body(creation: Node<'_>) -> Option<Node<'_>> {
    let mut cursor = creation.walk();
    let body = creation
        .named_children(&mut cursor)
        .find(|child| child.kind() == "class_body");
    body
}

/// Node kinds that own a body of members.
pub fn is_type_body(kind: &str) -> bool {
    matches!(
        kind,
        "class_body" | "interface_body" | "enum_body" | "enum_body_declarations"
    )
}

/// Node kinds that declare a named type.
pub fn is_type_declaration(kind: &str) -> bool {
    matches!(
        kind,
        "class_declaration"
            | "interface_declaration"
            | "enum_declaration"
            | "record_declaration"
            | "annotation_type_declaration"
    )
}

/// Whether the `modifiers` child of a declaration contains `keyword`.
pub fn has_modifier(declaration: Node<'_>, keyword: &str) -> bool {
    modifiers_of(declaration).is_some_and(|mods| {
        let mut cursor = mods.walk();
        let found = mods.children(&mut cursor).any(|m| m.kind() == keyword);
        found
    })
}

/// Whether a declaration carries any annotation.
pub fn has_annotation(declaration: Node<'_>) -> bool {
    modifiers_of(declaration).is_some_and(|mods| {
        let mut cursor = mods.walk();
        let found = mods
            .named_children(&mut cursor)
            .any(|m| matches!(m.kind(), "marker_annotation" | "annotation"));
        found
    })
}

fn modifiers_of(declaration: Node<'_>) -> Option<Node<'_>> {
    let mut cursor = declaration.walk();
    let mods = declaration
        .children(&mut cursor)
        .find(|child| child.kind() == "modifiers");
    mods
}

/// Integer-ish literal nodes (capacities and sizes).
pub fn is_numeric_literal(kind: &str) -> bool {
    matches!(
        kind,
        "decimal_integer_literal"
            | "hex_integer_literal"
            | "octal_integer_literal"
            | "binary_integer_literal"
            | "decimal_floating_point_literal"
            | "hex_floating_point_literal"
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
