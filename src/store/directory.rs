//! Directory-backed table store
//!
//! One delimited file per table, `<dir>/<table>.csv`. Every mutation is
//! applied to a copy of the table, persisted by writing
//! `<table>_temp.csv` and renaming it over the original, and only then
//! swapped into memory. A failed mutation leaves both the file and the
//! in-memory table unchanged.
//!
//! The committed in-memory table is the persisted text read back, so
//! column types after a mutation are the ones a fresh load would infer.

use std::fs;
use std::path::PathBuf;

use crate::executor::PredicateFilter;
use crate::table::{Row, Table};

use super::delimited::{parse_table, read_table_file, render_table, split_record};
use super::errors::{StoreError, StoreResult};
use super::inference::{coerce, column_types};
use super::store::{MemoryTableStore, TableStore};

const EXTENSION: &str = "csv";

/// Tables loaded from, and persisted to, a directory of delimited files
#[derive(Debug)]
pub struct CsvTableStore {
    dir: PathBuf,
    delimiter: u8,
    tables: MemoryTableStore,
}

impl CsvTableStore {
    /// Loads every `*.csv` file in `dir`; the file stem is the table name.
    ///
    /// Leftover `*_temp.csv` files from an interrupted save are ignored.
    pub fn open(dir: impl Into<PathBuf>, delimiter: u8) -> StoreResult<Self> {
        let dir = dir.into();
        let entries = fs::read_dir(&dir).map_err(|e| StoreError::io(&dir, e))?;

        let mut paths = Vec::new();
        for entry in entries {
            let path = entry.map_err(|e| StoreError::io(&dir, e))?.path();
            if path.is_file() && path.extension().is_some_and(|ext| ext == EXTENSION) {
                paths.push(path);
            }
        }
        paths.sort();

        let mut tables = MemoryTableStore::new();
        for path in paths {
            let Some(name) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            if name.ends_with("_temp") {
                continue;
            }
            let table = read_table_file(&path, delimiter)?;
            tables.insert(name, table);
        }

        Ok(Self {
            dir,
            delimiter,
            tables,
        })
    }

    /// Path of a table's file
    pub fn table_path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{}.{}", name, EXTENSION))
    }

    /// Number of loaded tables
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    /// Returns true if no tables are loaded
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Creates an empty table with the given column headers and writes its file
    pub fn create_table<S: Into<String>>(
        &mut self,
        name: &str,
        columns: impl IntoIterator<Item = S>,
    ) -> StoreResult<()> {
        if !is_valid_table_name(name) {
            return Err(StoreError::InvalidTableName(name.to_string()));
        }
        if self.tables.contains(name) {
            return Err(StoreError::TableExists(name.to_string()));
        }

        let columns: Vec<String> = columns
            .into_iter()
            .map(|c| Into::<String>::into(c).trim().to_string())
            .collect();
        if columns.is_empty() {
            return Err(StoreError::NoColumns);
        }

        let table = Table::new(columns)?;
        self.persist(name, &render_table(&table, self.delimiter))?;
        self.tables.insert(name, table);
        Ok(())
    }

    /// Appends rows given as delimited lines, one row per non-blank line.
    ///
    /// Every line is validated before any row is added. Returns the number
    /// of rows inserted.
    pub fn insert_rows(&mut self, name: &str, text: &str) -> StoreResult<usize> {
        let mut table = self.table(name)?.clone();
        let inserted = self.append_lines(name, &mut table, text)?;
        self.commit(name, table)?;
        Ok(inserted)
    }

    /// Deletes the rows matching `condition`, returning how many were removed.
    ///
    /// A blank condition is refused rather than treated as "all rows".
    pub fn delete_where(&mut self, name: &str, condition: &str) -> StoreResult<usize> {
        let mut table = self.table(name)?.clone();
        let removed = Self::remove_matching(&mut table, condition)?;
        self.commit(name, table)?;
        Ok(removed)
    }

    /// Replaces the rows matching `condition` with the rows in `text`.
    ///
    /// Matching rows are removed and the new rows appended at the end.
    /// Returns `(removed, inserted)`.
    pub fn update_where(
        &mut self,
        name: &str,
        condition: &str,
        text: &str,
    ) -> StoreResult<(usize, usize)> {
        let mut table = self.table(name)?.clone();
        let removed = Self::remove_matching(&mut table, condition)?;
        let inserted = self.append_lines(name, &mut table, text)?;
        self.commit(name, table)?;
        Ok((removed, inserted))
    }

    fn table(&self, name: &str) -> StoreResult<&Table> {
        self.tables
            .get_table(name)
            .ok_or_else(|| StoreError::TableNotFound(name.to_string()))
    }

    fn append_lines(&self, name: &str, table: &mut Table, text: &str) -> StoreResult<usize> {
        let types = column_types(table);
        let mut rows = Vec::new();

        for (i, line) in text.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let fields = split_record(line, self.delimiter).map_err(|reason| {
                StoreError::Malformed {
                    path: self.table_path(name),
                    line: i + 1,
                    reason,
                }
            })?;
            if fields.len() != types.len() {
                return Err(StoreError::ArityMismatch {
                    table: name.to_string(),
                    line: i + 1,
                    expected: types.len(),
                    found: fields.len(),
                });
            }
            let values = fields
                .iter()
                .zip(&types)
                .map(|(cell, ty)| coerce(cell, *ty))
                .collect();
            rows.push(Row::new(values));
        }

        let inserted = rows.len();
        for row in rows {
            table.push_row(row)?;
        }
        Ok(inserted)
    }

    fn remove_matching(table: &mut Table, condition: &str) -> StoreResult<usize> {
        let predicate = PredicateFilter::prepare(Some(condition), table.columns())?
            .ok_or(StoreError::ConditionRequired)?;
        Ok(table.retain_rows(|row| !predicate.matches(row)))
    }

    fn commit(&mut self, name: &str, table: Table) -> StoreResult<()> {
        let text = render_table(&table, self.delimiter);
        let stored = parse_table(&text, self.delimiter, &self.table_path(name))?;
        self.persist(name, &text)?;
        if let Some(slot) = self.tables.get_mut(name) {
            *slot = stored;
        }
        Ok(())
    }

    fn persist(&self, name: &str, text: &str) -> StoreResult<()> {
        let temp = self.dir.join(format!("{}_temp.{}", name, EXTENSION));
        let target = self.table_path(name);

        fs::write(&temp, text).map_err(|e| StoreError::io(&temp, e))?;
        fs::rename(&temp, &target).map_err(|e| StoreError::io(&target, e))?;
        Ok(())
    }
}

fn is_valid_table_name(name: &str) -> bool {
    !name.is_empty()
        && !name.ends_with("_temp")
        && name
            .chars()
            .all(|c| c.is_alphanumeric() || c == '_' || c == '-')
}

impl TableStore for CsvTableStore {
    fn get_table(&self, name: &str) -> Option<&Table> {
        self.tables.get_table(name)
    }

    fn table_names(&self) -> Vec<&str> {
        self.tables.table_names()
    }
}
