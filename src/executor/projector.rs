//! Column projection

use crate::table::Table;

use super::errors::{QueryError, QueryResult};

/// Selects a subset of columns
pub struct Projector;

impl Projector {
    /// Keeps only `columns`, in the caller's order.
    ///
    /// `None` or an empty list returns the table unchanged. A column named
    /// twice is kept once, at its first position.
    pub fn project(table: &Table, columns: Option<&[String]>) -> QueryResult<Table> {
        let requested = match columns {
            Some(c) if !c.is_empty() => c,
            _ => return Ok(table.clone()),
        };

        let (names, indices) = Self::resolve(table.columns(), requested)?;
        let rows = table.rows().iter().map(|r| r.pick(&indices)).collect();

        Ok(Table::from_parts(names, rows))
    }

    /// Maps requested names to positions in `available`
    pub(crate) fn resolve(
        available: &[String],
        requested: &[String],
    ) -> QueryResult<(Vec<String>, Vec<usize>)> {
        let mut names: Vec<String> = Vec::with_capacity(requested.len());
        let mut indices = Vec::with_capacity(requested.len());

        for name in requested {
            let index = available
                .iter()
                .position(|c| c == name)
                .ok_or_else(|| QueryError::unknown_column(name.as_str()))?;
            if names.contains(name) {
                continue;
            }
            names.push(name.clone());
            indices.push(index);
        }

        Ok((names, indices))
    }
}
