//! Result types for query execution

use serde_json::{Map, Value as JsonValue};

use crate::table::{Row, Table};

use super::batch::BatchSize;

/// Fully materialized query output, chunked into fixed-size batches for
/// emission
#[derive(Debug, Clone, PartialEq)]
pub struct ResultSet {
    table: Table,
    batch_size: BatchSize,
}

impl ResultSet {
    /// Wraps a final table
    pub fn new(table: Table, batch_size: BatchSize) -> Self {
        Self { table, batch_size }
    }

    /// Output column names in order
    pub fn columns(&self) -> &[String] {
        self.table.columns()
    }

    /// Rows in batches of at most the configured size
    pub fn batches(&self) -> impl Iterator<Item = &[Row]> {
        self.table.rows().chunks(self.batch_size.get())
    }

    /// Number of batches
    pub fn batch_count(&self) -> usize {
        self.batch_size.batch_count(self.table.len())
    }

    /// All rows in order
    pub fn rows(&self) -> &[Row] {
        self.table.rows()
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Returns true if no rows matched. An empty result is a success, not
    /// an error.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Converts one row to a JSON object in column order
    pub fn record(&self, row: &Row) -> Map<String, JsonValue> {
        self.table.record(row)
    }
}
