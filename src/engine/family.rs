//! Per-family configuration objects.
//!
//! A [`FamilyProfile`] bundles everything that differs between the
//! collection, StringBuilder, and array analyses: name tables, type names,
//! registries, and the initializer predicates. The walker and classifier are
//! shared and take a profile as input.

use std::collections::HashSet;

use tree_sitter::Node;

use super::registry::{self, DerivedView, Factory, WrappingCall};
use super::tables::{ClassificationTables, NameTable};
use crate::config::{defaults, LintConfig};
use crate::syntax::source::{
    anonymous_body, argument_count, created_type_name, invoked_name, is_numeric_literal,
    significant_children, simple_name, strip_transparent, JavaSource,
};
use crate::syntax::symbols::SymbolResolver;
use crate::types::ContainerFamily;

/// What an initializer or assignment source puts into a container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Initializer<'t> {
    /// A new, empty container.
    Fresh,
    /// A new container that already holds elements.
    Populated,
    Null,
    /// A new container with an anonymous subclass body (double-brace style).
    Anonymous(Node<'t>),
    /// Anything else: another variable, a call result, a field.
    Unknown,
}

/// Tables and registries for one container family.
#[derive(Debug, Clone)]
pub struct FamilyProfile {
    family: ContainerFamily,
    tables: ClassificationTables,
    type_names: HashSet<&'static str>,
    ignored_types: HashSet<String>,
    pure_names: &'static [&'static str],
    void_names: &'static [&'static str],
    views: &'static [DerivedView],
    wrappers: &'static [WrappingCall],
    factories: &'static [Factory],
}

impl FamilyProfile {
    /// Profile with built-in defaults.
    pub fn new(family: ContainerFamily) -> Self {
        Self::from_config(family, &LintConfig::default())
    }

    /// Profile with the name tables and ignored types from `config`.
    pub fn from_config(family: ContainerFamily, config: &LintConfig) -> Self {
        let names = config.names_for(family);
        Self {
            family,
            tables: ClassificationTables::new(
                NameTable::new(names.query_names),
                NameTable::new(names.update_names),
            ),
            type_names: defaults::type_names(family).iter().copied().collect(),
            ignored_types: names.ignored_types.into_iter().collect(),
            pure_names: defaults::pure_names(family),
            void_names: defaults::void_names(family),
            views: registry::views(family),
            wrappers: registry::wrappers(family),
            factories: registry::factories(family),
        }
    }

    pub fn family(&self) -> ContainerFamily {
        self.family
    }

    pub fn tables(&self) -> &ClassificationTables {
        &self.tables
    }

    /// Whether a declared simple type name belongs to this family.
    pub fn tracks_type(&self, simple: &str) -> bool {
        self.type_names.contains(simple)
    }

    pub fn is_ignored_type(&self, simple: &str) -> bool {
        self.ignored_types.contains(simple)
    }

    pub fn is_pure(&self, name: &str) -> bool {
        self.pure_names.contains(&name)
    }

    /// Whether `name` is known to return nothing.
    pub fn is_void(&self, name: &str) -> bool {
        self.void_names.contains(&name)
    }

    pub fn view(&self, name: &str) -> Option<&DerivedView> {
        self.views.iter().find(|v| v.name == name)
    }

    pub fn views(&self) -> &[DerivedView] {
        self.views
    }

    /// Wrapper registered for `owner.name(...)` that wraps argument `index`
    /// of a call with `arity` arguments.
    pub fn wrapper(
        &self,
        owner: &str,
        name: &str,
        index: usize,
        arity: usize,
    ) -> Option<&WrappingCall> {
        self.wrappers.iter().find(|w| {
            w.owner == owner && w.name == name && w.argument == index && (!w.sole || arity == 1)
        })
    }

    /// Classify an initializer or assignment source.
    pub fn initializer<'t>(&self, source: &JavaSource, expr: Node<'t>) -> Initializer<'t> {
        let expr = strip_transparent(expr);
        match expr.kind() {
            "null_literal" => Initializer::Null,
            "object_creation_expression" => {
                if let Some(body) = anonymous_body(expr) {
                    return Initializer::Anonymous(body);
                }
                let Some(created) = created_type_name(source, expr) else {
                    return Initializer::Unknown;
                };
                if !self.tracks_type(created) {
                    return Initializer::Unknown;
                }
                if only_sizing_arguments(source, expr) {
                    Initializer::Fresh
                } else {
                    Initializer::Populated
                }
            }
            "array_creation_expression" if self.family == ContainerFamily::Array => {
                match expr.child_by_field_name("value") {
                    Some(values) => array_contents(values),
                    None => Initializer::Fresh,
                }
            }
            "array_initializer" if self.family == ContainerFamily::Array => array_contents(expr),
            "method_invocation" => self.factory_result(source, expr),
            _ => Initializer::Unknown,
        }
    }

    fn factory_result<'t>(&self, source: &JavaSource, call: Node<'t>) -> Initializer<'t> {
        let Some(object) = call.child_by_field_name("object") else {
            return Initializer::Unknown;
        };
        let Some(name) = call.child_by_field_name("name") else {
            return Initializer::Unknown;
        };
        let owner = simple_name(source.text(object));
        let name = source.text(name);
        match self.factories.iter().find(|f| f.matches(owner, name)) {
            Some(f) if f.always_populated => Initializer::Populated,
            Some(_) if argument_count(call) == 0 => Initializer::Fresh,
            Some(_) => Initializer::Populated,
            None => Initializer::Unknown,
        }
    }
}

/// Constructor arguments that size or configure a container without filling it:
/// capacities, load factors, `Foo.class` keys, comparators.
fn only_sizing_arguments<'t>(source: &'t JavaSource, creation: Node<'t>) -> bool {
    let Some(args) = creation.child_by_field_name("arguments") else {
        return true;
    };
    let symbols = SymbolResolver::new(source);
    significant_children(args).into_iter().all(|arg| {
        let arg = strip_transparent(arg);
        matches!(
            arg.kind(),
            "class_literal" | "lambda_expression" | "method_reference"
        ) || is_numeric(source, &symbols, arg)
    })
}

const NUMERIC_TYPES: &[&str] = &[
    "int", "long", "short", "byte", "char", "float", "double", "Integer",
];

/// Whether `expr` is a number: a literal, a numeric-typed variable, a size
/// or length, or arithmetic over those.
fn is_numeric<'t>(source: &'t JavaSource, symbols: &SymbolResolver<'t>, expr: Node<'t>) -> bool {
    let expr = strip_transparent(expr);
    match expr.kind() {
        kind if is_numeric_literal(kind) => true,
        "identifier" => symbols
            .type_of_expression(expr)
            .is_some_and(|ty| NUMERIC_TYPES.contains(&ty)),
        "field_access" => expr
            .child_by_field_name("field")
            .is_some_and(|f| source.text(f) == "length"),
        "method_invocation" => {
            argument_count(expr) == 0
                && invoked_name(source, expr).is_some_and(|name| matches!(name, "size" | "length"))
        }
        "binary_expression" => {
            let arithmetic = expr
                .child_by_field_name("operator")
                .is_some_and(|op| matches!(source.text(op), "+" | "-" | "*" | "/" | "%" | "<<" | ">>"));
            arithmetic
                && ["left", "right"].into_iter().all(|side| {
                    expr.child_by_field_name(side)
                        .is_some_and(|operand| is_numeric(source, symbols, operand))
                })
        }
        "unary_expression" => expr
            .child_by_field_name("operand")
            .is_some_and(|operand| is_numeric(source, symbols, operand)),
        _ => false,
    }
}

fn array_contents(initializer: Node<'_>) -> Initializer<'_> {
    if significant_children(initializer).is_empty() {
        Initializer::Fresh
    } else {
        Initializer::Populated
    }
}

/// Profiles for all three families, built once per run.
#[derive(Debug, Clone)]
pub struct FamilySet {
    collection: FamilyProfile,
    string_builder: FamilyProfile,
    array: FamilyProfile,
}

impl FamilySet {
    pub fn from_config(config: &LintConfig) -> Self {
        Self {
            collection: FamilyProfile::from_config(ContainerFamily::Collection, config),
            string_builder: FamilyProfile::from_config(ContainerFamily::StringBuilder, config),
            array: FamilyProfile::from_config(ContainerFamily::Array, config),
        }
    }

    pub fn get(&self, family: ContainerFamily) -> &FamilyProfile {
        match family {
            ContainerFamily::Collection => &self.collection,
            ContainerFamily::StringBuilder => &self.string_builder,
            ContainerFamily::Array => &self.array,
        }
    }

    /// Family whose type list contains `simple`.
    pub fn family_of_type(&self, simple: &str) -> Option<ContainerFamily> {
        [&self.collection, &self.string_builder]
            .into_iter()
            .find(|profile| profile.tracks_type(simple))
            .map(FamilyProfile::family)
    }
}

impl Default for FamilySet {
    fn default() -> Self {
        Self::from_config(&LintConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn first_value<'t>(src: &'t JavaSource) -> Node<'t> {
        fn find<'t>(node: Node<'t>) -> Option<Node<'t>> {
            if node.kind() == "variable_declarator" {
                return node.child_by_field_name("value");
            }
            let mut cursor = node.walk();
            let children: Vec<_> = node.children(&mut cursor).collect();
            children.into_iter().find_map(find)
        }
        find(src.root()).unwrap()
    }

    fn classify(family: ContainerFamily, decl: &str) -> &'static str {
        let src = JavaSource::from_text(format!(
            "class A {{ void m(int n, List<String> other, String words) {{ {decl} }} }}"
        ))
        .unwrap();
        let value = first_value(&src);
        match FamilyProfile::new(family).initializer(&src, value) {
            Initializer::Fresh => "fresh",
            Initializer::Populated => "populated",
            Initializer::Null => "null",
            Initializer::Anonymous(_) => "anonymous",
            Initializer::Unknown => "unknown",
        }
    }

    #[test_case("List<String> a = new ArrayList<>();", "fresh" ; "empty constructor")]
    #[test_case("List<String> a = new ArrayList<>(16);", "fresh" ; "capacity")]
    #[test_case("Map<K, V> a = new EnumMap<>(K.class);", "fresh" ; "enum map key class")]
    #[test_case("Set<String> a = new TreeSet<>((x, y) -> 0);", "fresh" ; "comparator lambda")]
    #[test_case("List<String> a = new ArrayList<>(other);", "populated" ; "copy constructor")]
    #[test_case("List<String> a = new ArrayList<>(n);", "fresh" ; "int capacity")]
    #[test_case("List<String> a = new ArrayList<>(n * 2 + 1);", "fresh" ; "arithmetic capacity")]
    #[test_case("List<String> a = new ArrayList<>(other.size());", "fresh" ; "sized from another")]
    #[test_case("Map<K, V> a = new HashMap<>(n, 0.75f);", "fresh" ; "capacity and load factor")]
    #[test_case("List<String> a = new ArrayList<>(other.subList(0, n));", "populated" ; "copied view")]
    #[test_case("List<String> a = new ArrayList<>(words);", "populated" ; "from string parameter")]
    #[test_case("List<String> a = null;", "null" ; "null")]
    #[test_case("List<String> a = (null);", "null" ; "parenthesized null")]
    #[test_case("List<String> a = new ArrayList<>() {{ add(\"x\"); }};", "anonymous" ; "double brace")]
    #[test_case("List<String> a = Lists.newArrayList();", "fresh" ; "guava empty")]
    #[test_case("List<String> a = Lists.newArrayList(x, y);", "populated" ; "guava filled")]
    #[test_case("Set<E> a = EnumSet.noneOf(E.class);", "fresh" ; "enum set none")]
    #[test_case("Set<E> a = EnumSet.of(E.A);", "populated" ; "enum set of")]
    #[test_case("List<String> a = List.of(\"a\");", "populated" ; "list of")]
    #[test_case("List<String> a = repo.load();", "unknown" ; "call result")]
    #[test_case("List<String> a = other;", "unknown" ; "other variable")]
    #[test_case("List<String> a = new Foo();", "unknown" ; "unknown type")]
    fn collection_initializers(decl: &str, expected: &str) {
        assert_eq!(classify(ContainerFamily::Collection, decl), expected);
    }

    #[test_case("StringBuilder a = new StringBuilder();", "fresh" ; "empty")]
    #[test_case("StringBuilder a = new StringBuilder(64);", "fresh" ; "capacity")]
    #[test_case("StringBuilder a = new StringBuilder(\"x\");", "populated" ; "seeded")]
    #[test_case("StringBuilder a = new StringBuilder(n);", "fresh" ; "capacity variable")]
    #[test_case("StringBuilder a = new StringBuilder(words);", "populated" ; "seeded from variable")]
    #[test_case("StringBuilder a = new StringBuilder(other.length());", "fresh" ; "capacity from length")]
    fn builder_initializers(decl: &str, expected: &str) {
        assert_eq!(classify(ContainerFamily::StringBuilder, decl), expected);
    }

    #[test_case("int[] a = new int[10];", "fresh" ; "dimension only")]
    #[test_case("int[] a = {};", "fresh" ; "empty literal")]
    #[test_case("int[] a = {1, 2};", "populated" ; "literal")]
    #[test_case("int[] a = new int[] {1};", "populated" ; "creation with values")]
    #[test_case("int[] a = s.toArray();", "unknown" ; "call result")]
    fn array_initializers(decl: &str, expected: &str) {
        assert_eq!(classify(ContainerFamily::Array, decl), expected);
    }

    #[test]
    fn ignored_types_come_from_config() {
        let config: LintConfig =
            serde_yaml::from_str("collection:\n  ignored_types: [Properties]\n").unwrap();
        let profile = FamilyProfile::from_config(ContainerFamily::Collection, &config);
        assert!(profile.is_ignored_type("Properties"));
        assert!(profile.tracks_type("Properties"));
        assert!(!profile.is_ignored_type("List"));
    }

    #[test]
    fn family_of_type() {
        let families = FamilySet::default();
        assert_eq!(
            families.family_of_type("HashMap"),
            Some(ContainerFamily::Collection)
        );
        assert_eq!(
            families.family_of_type("StringBuffer"),
            Some(ContainerFamily::StringBuilder)
        );
        assert_eq!(families.family_of_type("String"), None);
    }

    #[test]
    fn sole_argument_wrappers() {
        let arrays = FamilyProfile::new(ContainerFamily::Array);
        assert!(arrays.wrapper("Arrays", "asList", 0, 1).is_some());
        assert!(arrays.wrapper("Arrays", "asList", 0, 2).is_none());
        assert!(arrays.wrapper("ByteBuffer", "wrap", 0, 3).is_some());
    }
}
