//! Table repository
//!
//! The query engine reads tables through `TableStore` only. There is no
//! process-wide registry: callers own a store and pass it by reference.

use std::collections::BTreeMap;

use crate::table::Table;

/// Read access to named tables
pub trait TableStore {
    /// Returns the table, or `None` if no table has that name
    fn get_table(&self, name: &str) -> Option<&Table>;

    /// Registered table names in sorted order
    fn table_names(&self) -> Vec<&str>;

    /// Returns true if a table with that name is registered
    fn contains(&self, name: &str) -> bool {
        self.get_table(name).is_some()
    }
}

/// In-memory table repository
#[derive(Debug, Clone, Default)]
pub struct MemoryTableStore {
    tables: BTreeMap<String, Table>,
}

impl MemoryTableStore {
    /// Creates an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a table, returning any table it replaced
    pub fn insert(&mut self, name: impl Into<String>, table: Table) -> Option<Table> {
        self.tables.insert(name.into(), table)
    }

    /// Mutable access for the store's own mutation paths
    pub(crate) fn get_mut(&mut self, name: &str) -> Option<&mut Table> {
        self.tables.get_mut(name)
    }

    /// Number of registered tables
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    /// Returns true if no tables are registered
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

impl TableStore for MemoryTableStore {
    fn get_table(&self, name: &str) -> Option<&Table> {
        self.tables.get(name)
    }

    fn table_names(&self) -> Vec<&str> {
        self.tables.keys().map(String::as_str).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_lookup() {
        let mut store = MemoryTableStore::new();
        assert!(store.insert("b", Table::new(["x"]).unwrap()).is_none());
        store.insert("a", Table::new(["y"]).unwrap());

        assert!(store.contains("a"));
        assert!(!store.contains("c"));
        assert_eq!(store.table_names(), vec!["a", "b"]);
        assert_eq!(store.get_table("b").map(|t| t.columns().len()), Some(1));
    }

    #[test]
    fn test_replace_returns_previous() {
        let mut store = MemoryTableStore::new();
        store.insert("t", Table::new(["x"]).unwrap());
        let old = store.insert("t", Table::new(["y"]).unwrap()).unwrap();
        assert_eq!(old.columns(), &["x".to_string()]);
        assert_eq!(store.len(), 1);
    }
}
