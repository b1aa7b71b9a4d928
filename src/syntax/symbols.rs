//! Lexical name resolution for Java identifiers.
//!
//! Maps an identifier reference to the name node of the declaration it binds
//! to, using Java's block-scoping rules: locals declared earlier in an
//! enclosing block, loop and catch variables, lambda and method parameters,
//! then fields of each enclosing type body from the inside out.
//!
//! Resolution is purely syntactic. Inherited fields and static imports are not
//! known, so a reference to one of them resolves to `None`, and the engine
//! treats it as a different variable.

use tree_sitter::Node;

use super::source::{
    created_type_name, field_of, is_type_body, is_type_declaration, significant_children, simple_name,
    strip_transparent, JavaSource,
};

/// Identity of a declaration: the tree-sitter id of its name node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DeclId(usize);

impl DeclId {
    pub fn of(name: Node<'_>) -> Self {
        Self(name.id())
    }
}

/// Resolves identifier references against the declarations of one source.
pub struct SymbolResolver<'s> {
    source: &'s JavaSource,
}

impl<'s> SymbolResolver<'s> {
    pub fn new(source: &'s JavaSource) -> Self {
        Self { source }
    }

    /// Declaration identity for `reference`, if it is a variable reference
    /// that resolves inside this file.
    pub fn declaration_of(&self, reference: Node<'s>) -> Option<DeclId> {
        self.resolve(reference).map(DeclId::of)
    }

    /// Name node of the declaration `reference` binds to.
    ///
    /// A declaration name resolves to itself.
    pub fn resolve(&self, reference: Node<'s>) -> Option<Node<'s>> {
        if reference.kind() != "identifier" {
            return None;
        }
        if is_declaration_name(reference) {
            return Some(reference);
        }
        if !is_variable_reference(reference) {
            return None;
        }
        let name = self.source.text(reference);
        let mut current = reference;
        while let Some(parent) = current.parent() {
            if let Some(found) = self.lookup_in(parent, current, name) {
                return Some(found);
            }
            current = parent;
        }
        None
    }

    /// Resolve `this.x` or `Outer.this.x` to the field `x` of the nearest
    /// enclosing type that declares it.
    pub fn resolve_self_field(&self, access: Node<'s>) -> Option<Node<'s>> {
        if access.kind() != "field_access" {
            return None;
        }
        let object = access.child_by_field_name("object")?;
        if !is_self_reference(object) {
            return None;
        }
        let field = access.child_by_field_name("field")?;
        let name = self.source.text(field);
        let mut current = access;
        while let Some(parent) = current.parent() {
            if is_type_body(parent.kind()) {
                if let Some(found) = self.field_in_body(parent, name) {
                    return Some(found);
                }
            }
            current = parent;
        }
        None
    }

    /// Simple name of the declared type of the variable named by `name`, a
    /// declaration name node. `var` is taken from an object creation
    /// initializer. Array-typed variables have no simple type.
    pub fn declared_type(&self, name: Node<'s>) -> Option<&'s str> {
        let holder = name.parent()?;
        let (typed, declarator) = match holder.kind() {
            "variable_declarator" => (holder.parent()?, Some(holder)),
            "formal_parameter" | "enhanced_for_statement" | "resource" => (holder, None),
            _ => return None,
        };
        if declarator.is_some_and(|d| d.child_by_field_name("dimensions").is_some())
            || typed.child_by_field_name("dimensions").is_some()
        {
            return None;
        }
        let ty = typed.child_by_field_name("type")?;
        if ty.kind() == "array_type" {
            return None;
        }
        let simple = simple_name(self.source.text(ty));
        if simple != "var" {
            return Some(simple);
        }
        let value = strip_transparent(declarator?.child_by_field_name("value")?);
        if value.kind() != "object_creation_expression" {
            return None;
        }
        created_type_name(self.source, value)
    }

    /// Declared type of the variable an expression reads: a plain name, or
    /// `this.x`. String literals are `String`.
    pub fn type_of_expression(&self, expr: Node<'s>) -> Option<&'s str> {
        let expr = strip_transparent(expr);
        let decl = match expr.kind() {
            "string_literal" => return Some("String"),
            "identifier" => self.resolve(expr)?,
            "field_access" => self.resolve_self_field(expr)?,
            _ => return None,
        };
        self.declared_type(decl)
    }

    /// Simple name of the named type whose body declares the field `name`.
    pub fn declaring_type(&self, name: Node<'s>) -> Option<&'s str> {
        let mut current = name;
        while let Some(parent) = current.parent() {
            if is_type_body(parent.kind()) && parent.kind() != "enum_body_declarations" {
                let owner = parent.parent()?;
                if !is_type_declaration(owner.kind()) {
                    return None;
                }
                return owner.child_by_field_name("name").map(|n| self.source.text(n));
            }
            current = parent;
        }
        None
    }

    /// Declarations introduced by `scope` that are visible from `child`.
    fn lookup_in(&self, scope: Node<'s>, child: Node<'s>, name: &str) -> Option<Node<'s>> {
        match scope.kind() {
            "block" | "constructor_body" | "switch_block_statement_group" | "program" => {
                self.locals_before(scope, child, name)
            }
            "local_variable_declaration" => self.declarators_before(scope, child, name),
            "switch_block" => {
                // Locals of a statement group stay in scope for later groups.
                for group in significant_children(scope) {
                    if group.id() == child.id() {
                        break;
                    }
                    if group.kind() == "switch_block_statement_group" {
                        if let Some(found) = self.locals_before(group, child, name) {
                            return Some(found);
                        }
                    }
                }
                None
            }
            "for_statement" => {
                let mut cursor = scope.walk();
                let inits: Vec<_> = scope.children_by_field_name("init", &mut cursor).collect();
                inits
                    .into_iter()
                    .filter(|init| init.id() != child.id())
                    .filter(|init| init.kind() == "local_variable_declaration")
                    .find_map(|init| self.declarator_named(init, name))
            }
            "enhanced_for_statement" => {
                if field_of(child) != Some("body") {
                    return None;
                }
                scope
                    .child_by_field_name("name")
                    .filter(|n| self.source.text(*n) == name)
            }
            "catch_clause" => significant_children(scope)
                .into_iter()
                .filter(|c| c.kind() == "catch_formal_parameter")
                .filter_map(|c| c.child_by_field_name("name"))
                .find(|n| self.source.text(*n) == name),
            "try_with_resources_statement" => {
                let resources = scope.child_by_field_name("resources")?;
                significant_children(resources)
                    .into_iter()
                    .filter(|r| r.id() != child.id())
                    .filter_map(|r| r.child_by_field_name("name"))
                    .find(|n| self.source.text(*n) == name)
            }
            "lambda_expression" => {
                let params = scope.child_by_field_name("parameters")?;
                if params.id() == child.id() {
                    return None;
                }
                self.parameter_named(params, name)
            }
            "method_declaration" | "constructor_declaration" | "record_declaration" => {
                let params = scope.child_by_field_name("parameters")?;
                self.parameter_named(params, name)
            }
            kind if is_type_body(kind) => self.field_in_body(scope, name),
            _ => None,
        }
    }

    /// Local declarations among the statements of `block` that precede `child`.
    fn locals_before(&self, block: Node<'s>, child: Node<'s>, name: &str) -> Option<Node<'s>> {
        let mut found = None;
        for statement in significant_children(block) {
            if statement.id() == child.id() {
                break;
            }
            if statement.kind() == "local_variable_declaration" {
                if let Some(decl) = self.declarator_named(statement, name) {
                    found = Some(decl);
                }
            }
        }
        found
    }

    /// Earlier declarators of the same declaration (`int a = 1, b = a;`).
    fn declarators_before(
        &self,
        declaration: Node<'s>,
        child: Node<'s>,
        name: &str,
    ) -> Option<Node<'s>> {
        let mut cursor = declaration.walk();
        let declarators: Vec<_> = declaration
            .children_by_field_name("declarator", &mut cursor)
            .collect();
        declarators
            .into_iter()
            .take_while(|d| d.id() != child.id())
            .filter_map(|d| d.child_by_field_name("name"))
            .find(|n| self.source.text(*n) == name)
    }

    fn declarator_named(&self, declaration: Node<'s>, name: &str) -> Option<Node<'s>> {
        let mut cursor = declaration.walk();
        let declarators: Vec<_> = declaration
            .children_by_field_name("declarator", &mut cursor)
            .collect();
        declarators
            .into_iter()
            .filter_map(|d| d.child_by_field_name("name"))
            .find(|n| self.source.text(*n) == name)
    }

    fn parameter_named(&self, params: Node<'s>, name: &str) -> Option<Node<'s>> {
        if params.kind() == "identifier" {
            return (self.source.text(params) == name).then_some(params);
        }
        significant_children(params)
            .into_iter()
            .filter_map(|param| match param.kind() {
                "identifier" => Some(param),
                "formal_parameter" => param.child_by_field_name("name"),
                "spread_parameter" => significant_children(param)
                    .into_iter()
                    .find(|c| c.kind() == "variable_declarator")
                    .and_then(|d| d.child_by_field_name("name")),
                _ => None,
            })
            .find(|n| self.source.text(*n) == name)
    }

    /// A field named `name` declared directly in a type body.
    pub fn field_in_body(&self, body: Node<'s>, name: &str) -> Option<Node<'s>> {
        significant_children(body).into_iter().find_map(|member| match member.kind() {
            "field_declaration" | "constant_declaration" => self.declarator_named(member, name),
            "enum_body_declarations" => self.field_in_body(member, name),
            _ => None,
        })
    }
}

/// `this` or `Outer.this`.
pub fn is_self_reference(node: Node<'_>) -> bool {
    match node.kind() {
        "this" => true,
        "field_access" => node
            .child_by_field_name("field")
            .is_some_and(|f| f.kind() == "this"),
        _ => false,
    }
}

/// Whether `node` is the name being declared by a variable declaration.
pub fn is_declaration_name(node: Node<'_>) -> bool {
    let Some(parent) = node.parent() else {
        return false;
    };
    match parent.kind() {
        "variable_declarator"
        | "formal_parameter"
        | "catch_formal_parameter"
        | "resource"
        | "enhanced_for_statement" => field_of(node) == Some("name"),
        "lambda_expression" => field_of(node) == Some("parameters"),
        "inferred_parameters" => true,
        _ => false,
    }
}

/// Whether an identifier stands for a variable rather than a method, label,
/// member name, annotation, or package segment.
pub fn is_variable_reference(node: Node<'_>) -> bool {
    if node.kind() != "identifier" {
        return false;
    }
    let Some(parent) = node.parent() else {
        return false;
    };
    let field = field_of(node);
    match parent.kind() {
        "method_invocation" => field != Some("name"),
        "field_access" => field != Some("field"),
        "method_reference" => parent
            .named_child(0)
            .is_some_and(|first| first.id() == node.id()),
        "method_declaration"
        | "constructor_declaration"
        | "class_declaration"
        | "interface_declaration"
        | "enum_declaration"
        | "record_declaration"
        | "annotation_type_declaration"
        | "annotation_type_element_declaration" => field != Some("name"),
        "marker_annotation" | "annotation" => field != Some("name"),
        "element_value_pair" => field != Some("key"),
        "labeled_statement"
        | "break_statement"
        | "continue_statement"
        | "scoped_identifier"
        | "import_declaration"
        | "package_declaration"
        | "enum_constant"
        | "inferred_parameters" => false,
        _ => !is_declaration_name(node),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
