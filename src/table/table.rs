//! Rows and tables
//!
//! A `Table` owns an ordered column list and an ordered row sequence.
//! A `Row` stores its values positionally, aligned with the column list of
//! the table that holds it, so every row carries exactly the table's column
//! set in the table's order.

use std::collections::HashSet;

use serde_json::{Map, Value as JsonValue};

use super::errors::{TableError, TableResult};
use super::value::Value;

/// One record, positionally aligned with its table's columns
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    values: Vec<Value>,
}

impl Row {
    /// Creates a row from values in column order
    pub fn new(values: Vec<Value>) -> Self {
        Self { values }
    }

    /// Value at a column position
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    /// All values in column order
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Consumes the row, returning its values
    pub fn into_values(self) -> Vec<Value> {
        self.values
    }

    /// Number of values in the row
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if the row has no values
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Builds a row holding only the values at `indices`, in that order
    pub fn pick(&self, indices: &[usize]) -> Row {
        Row::new(
            indices
                .iter()
                .map(|&i| self.values.get(i).cloned().unwrap_or(Value::Null))
                .collect(),
        )
    }
}

impl From<Vec<Value>> for Row {
    fn from(values: Vec<Value>) -> Self {
        Row::new(values)
    }
}

/// An ordered row sequence with a fixed column schema
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Row>,
}

impl Table {
    /// Creates an empty table with the given columns.
    ///
    /// Column names must be unique and non-empty.
    pub fn new<S: Into<String>>(columns: impl IntoIterator<Item = S>) -> TableResult<Self> {
        let columns: Vec<String> = columns.into_iter().map(Into::into).collect();

        let mut seen = HashSet::with_capacity(columns.len());
        for column in &columns {
            if column.trim().is_empty() {
                return Err(TableError::EmptyColumnName);
            }
            if !seen.insert(column.as_str()) {
                return Err(TableError::DuplicateColumn(column.clone()));
            }
        }

        Ok(Self {
            columns,
            rows: Vec::new(),
        })
    }

    /// Creates a table and appends every row, checking arity
    pub fn with_rows<S: Into<String>>(
        columns: impl IntoIterator<Item = S>,
        rows: impl IntoIterator<Item = Vec<Value>>,
    ) -> TableResult<Self> {
        let mut table = Self::new(columns)?;
        for values in rows {
            table.push_row(Row::new(values))?;
        }
        Ok(table)
    }

    /// Builds a table from parts whose shape the caller already guarantees
    pub(crate) fn from_parts(columns: Vec<String>, rows: Vec<Row>) -> Self {
        debug_assert!(rows.iter().all(|r| r.len() == columns.len()));
        Self { columns, rows }
    }

    /// Column names in order
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Rows in order
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if the table has no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a column, if present
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Returns true if the column exists
    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Appends a row after checking its arity
    pub fn push_row(&mut self, row: Row) -> TableResult<()> {
        if row.len() != self.columns.len() {
            return Err(TableError::ArityMismatch {
                expected: self.columns.len(),
                found: row.len(),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    /// Keeps only the rows for which `keep` returns true, returning how many
    /// were removed
    pub fn retain_rows<F: FnMut(&Row) -> bool>(&mut self, keep: F) -> usize {
        let before = self.rows.len();
        self.rows.retain(keep);
        before - self.rows.len()
    }

    /// Converts one row to a JSON object in column order
    pub fn record(&self, row: &Row) -> Map<String, JsonValue> {
        self.columns
            .iter()
            .zip(row.values())
            .map(|(c, v)| (c.clone(), v.to_json()))
            .collect()
    }
}
