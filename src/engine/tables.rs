//! Role → name-fragment tables with exact-then-prefix matching.
//!
//! One table type serves every container family; families differ only in
//! the fragments they load.

use crate::types::Usage;

/// An ordered set of method-name fragments for one role.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameTable {
    fragments: Vec<String>,
}

impl NameTable {
    pub fn new<I, S>(fragments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut table = Self::default();
        for fragment in fragments {
            let fragment = fragment.into();
            if !fragment.is_empty() && !table.fragments.contains(&fragment) {
                table.fragments.push(fragment);
            }
        }
        table
    }

    /// `name` equals a fragment, or starts with one (`remove` → `removeAll`).
    pub fn matches(&self, name: &str) -> bool {
        self.fragments.iter().any(|f| f == name)
            || self.fragments.iter().any(|f| name.starts_with(f.as_str()))
    }

    pub fn fragments(&self) -> &[String] {
        &self.fragments
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }
}

/// The query and update tables of one family.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassificationTables {
    query: NameTable,
    update: NameTable,
}

impl ClassificationTables {
    pub fn new(query: NameTable, update: NameTable) -> Self {
        Self { query, update }
    }

    pub fn is_query_name(&self, name: &str) -> bool {
        self.query.matches(name)
    }

    pub fn is_update_name(&self, name: &str) -> bool {
        self.update.matches(name)
    }

    /// Roles `name` satisfies. A name in both tables is `Both`; in neither, `Ignore`.
    pub fn lookup(&self, name: &str) -> Usage {
        Usage::from_parts(self.is_query_name(name), self.is_update_name(name))
    }

    pub fn query(&self) -> &NameTable {
        &self.query
    }

    pub fn update(&self) -> &NameTable {
        &self.update
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn tables() -> ClassificationTables {
        ClassificationTables::new(
            NameTable::new(["get", "size", "compute"]),
            NameTable::new(["add", "remove", "compute"]),
        )
    }

    #[test_case("remove", Usage::Update ; "exact update")]
    #[test_case("removeAll", Usage::Update ; "prefix update")]
    #[test_case("removeIf", Usage::Update ; "prefix update predicate")]
    #[test_case("getOrDefault", Usage::Query ; "prefix query")]
    #[test_case("size", Usage::Query ; "exact query")]
    #[test_case("computeIfAbsent", Usage::Both ; "in both tables")]
    #[test_case("iterator", Usage::Ignore ; "unknown")]
    #[test_case("ad", Usage::Ignore ; "shorter than fragment")]
    fn lookup(name: &str, expected: Usage) {
        assert_eq!(tables().lookup(name), expected);
    }

    #[test]
    fn duplicates_and_empty_fragments_are_dropped() {
        let table = NameTable::new(["add", "", "add", "put"]);
        assert_eq!(table.fragments(), ["add".to_string(), "put".to_string()]);
        assert!(!table.matches(""));
    }

    #[test]
    fn empty_table_matches_nothing() {
        let table = NameTable::default();
        assert!(table.is_empty());
        assert!(!table.matches("add"));
    }
}
