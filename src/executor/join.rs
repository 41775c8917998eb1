//! Positional batch join
//!
//! Tables are combined by row position, not by matching join-column
//! values. Batch `i` of every listed table is concatenated column-wise;
//! a column name appearing in more than one table keeps the first
//! table's values. Where a table has no row at a position its columns
//! are null, so the output has as many positions as the longest table.
//! The post-join condition and the output selection are applied to each
//! concatenated batch before it is appended.
//!
//! Join columns are only checked for presence in every table.

use serde::{Deserialize, Serialize};

use crate::store::TableStore;
use crate::table::{Row, Table, Value};

use super::batch::BatchSize;
use super::errors::{QueryError, QueryResult};
use super::filters::PredicateFilter;
use super::projector::Projector;

/// A join request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinSpec {
    /// Tables to combine, in order (at least two)
    pub tables: Vec<String>,
    /// Columns that must exist in every listed table
    #[serde(default)]
    pub join_columns: Vec<String>,
    /// Output columns; empty or absent keeps every combined column
    #[serde(default)]
    pub select: Option<Vec<String>>,
    /// Condition applied to each combined batch
    #[serde(default)]
    pub condition: Option<String>,
}

impl JoinSpec {
    /// Joins `tables` on `join_columns` with no selection or condition
    pub fn new<S: Into<String>>(
        tables: impl IntoIterator<Item = S>,
        join_columns: impl IntoIterator<Item = S>,
    ) -> Self {
        Self {
            tables: tables.into_iter().map(Into::into).collect(),
            join_columns: join_columns.into_iter().map(Into::into).collect(),
            select: None,
            condition: None,
        }
    }

    /// Sets the output column selection
    pub fn select<S: Into<String>>(mut self, columns: impl IntoIterator<Item = S>) -> Self {
        self.select = Some(columns.into_iter().map(Into::into).collect());
        self
    }

    /// Sets the post-join condition
    pub fn condition(mut self, condition: impl Into<String>) -> Self {
        self.condition = Some(condition.into());
        self
    }
}

/// Combines tables positionally, one batch at a time
#[derive(Debug, Clone, Copy, Default)]
pub struct BatchJoiner {
    batch_size: BatchSize,
}

impl BatchJoiner {
    /// Creates a joiner with the given batch size
    pub fn new(batch_size: BatchSize) -> Self {
        Self { batch_size }
    }

    /// Resolves the listed tables from `store` and joins them
    pub fn join<S: TableStore + ?Sized>(&self, store: &S, spec: &JoinSpec) -> QueryResult<Table> {
        if spec.tables.len() < 2 {
            return Err(QueryError::InvalidJoin(format!(
                "At least two tables are required, got {}",
                spec.tables.len()
            )));
        }

        let tables = spec
            .tables
            .iter()
            .map(|name| {
                store
                    .get_table(name)
                    .ok_or_else(|| QueryError::TableNotFound(name.clone()))
            })
            .collect::<QueryResult<Vec<&Table>>>()?;

        for (name, table) in spec.tables.iter().zip(&tables) {
            if let Some(missing) = spec.join_columns.iter().find(|c| !table.has_column(c)) {
                return Err(QueryError::JoinColumnMissing {
                    table: name.clone(),
                    column: missing.clone(),
                });
            }
        }

        self.join_tables(&tables, spec.select.as_deref(), spec.condition.as_deref())
    }

    /// Joins already resolved tables
    pub fn join_tables(
        &self,
        tables: &[&Table],
        select: Option<&[String]>,
        condition: Option<&str>,
    ) -> QueryResult<Table> {
        // (table, column) source of every combined column, first occurrence wins
        let mut columns: Vec<String> = Vec::new();
        let mut sources: Vec<(usize, usize)> = Vec::new();
        for (t, table) in tables.iter().enumerate() {
            for (c, name) in table.columns().iter().enumerate() {
                if !columns.contains(name) {
                    columns.push(name.clone());
                    sources.push((t, c));
                }
            }
        }

        let predicate = PredicateFilter::prepare(condition, &columns)?;
        let selection = match select {
            Some(s) if !s.is_empty() => Some(Projector::resolve(&columns, s)?),
            _ => None,
        };

        let positions = tables.iter().map(|t| t.len()).max().unwrap_or(0);
        let batch = self.batch_size.get();
        let mut rows = Vec::new();

        let mut start = 0;
        while start < positions {
            let end = (start + batch).min(positions);

            for position in start..end {
                let combined = Row::new(
                    sources
                        .iter()
                        .map(|&(t, c)| {
                            tables[t]
                                .rows()
                                .get(position)
                                .and_then(|r| r.get(c))
                                .cloned()
                                .unwrap_or(Value::Null)
                        })
                        .collect(),
                );

                if predicate.as_ref().is_some_and(|p| !p.matches(&combined)) {
                    continue;
                }

                rows.push(match &selection {
                    Some((_, indices)) => combined.pick(indices),
                    None => combined,
                });
            }

            start = end;
        }

        let out_columns = match selection {
            Some((names, _)) => names,
            None => columns,
        };

        Ok(Table::from_parts(out_columns, rows))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryTableStore;

    fn store() -> MemoryTableStore {
        let mut store = MemoryTableStore::new();
        store.insert(
            "players",
            Table::with_rows(
                ["id", "name"],
                vec![
                    vec![1.into(), "Maxey".into()],
                    vec![2.into(), "Embiid".into()],
                    vec![3.into(), "Oubre".into()],
                ],
            )
            .unwrap(),
        );
        store.insert(
            "stats",
            Table::with_rows(
                ["id", "pts"],
                vec![vec![2.into(), 25.into()], vec![1.into(), 34.into()]],
            )
            .unwrap(),
        );
        store
    }

    #[test]
    fn test_rows_combine_by_position_not_value() {
        let out = BatchJoiner::default()
            .join(&store(), &JoinSpec::new(["players", "stats"], ["id"]))
            .unwrap();

        assert_eq!(out.columns(), &["id".to_string(), "name".into(), "pts".into()]);
        assert_eq!(out.len(), 3);
        // id 1 from players paired with the first stats row (id 2, 25 pts)
        assert_eq!(out.rows()[0].values(), &[Value::Int(1), "Maxey".into(), Value::Int(25)]);
        assert_eq!(out.rows()[2].values(), &[Value::Int(3), "Oubre".into(), Value::Null]);
    }

    #[test]
    fn test_condition_and_selection_applied() {
        let spec = JoinSpec::new(["players", "stats"], ["id"])
            .condition("pts > 30")
            .select(["name", "pts"]);
        let out = BatchJoiner::new(BatchSize::new(1).unwrap()).join(&store(), &spec).unwrap();

        assert_eq!(out.columns(), &["name".to_string(), "pts".into()]);
        assert_eq!(out.rows().len(), 1);
        assert_eq!(out.rows()[0].values(), &["Embiid".into(), Value::Int(34)]);
    }

    #[test]
    fn test_batch_size_does_not_change_result() {
        let spec = JoinSpec::new(["players", "stats"], ["id"]);
        let whole = BatchJoiner::default().join(&store(), &spec).unwrap();
        let split = BatchJoiner::new(BatchSize::new(2).unwrap()).join(&store(), &spec).unwrap();
        assert_eq!(whole, split);
    }

    #[test]
    fn test_missing_table() {
        let err = BatchJoiner::default()
            .join(&store(), &JoinSpec::new(["players", "teams"], ["id"]))
            .unwrap_err();
        assert_eq!(err, QueryError::TableNotFound("teams".into()));
    }

    #[test]
    fn test_missing_join_column() {
        let err = BatchJoiner::default()
            .join(&store(), &JoinSpec::new(["players", "stats"], ["name"]))
            .unwrap_err();
        assert_eq!(
            err,
            QueryError::JoinColumnMissing {
                table: "stats".into(),
                column: "name".into()
            }
        );
    }

    #[test]
    fn test_single_table_rejected() {
        let err = BatchJoiner::default()
            .join(&store(), &JoinSpec::new(["players"], ["id"]))
            .unwrap_err();
        assert_eq!(err.code(), "FLAT_INVALID_JOIN");
    }

    #[test]
    fn test_unknown_selected_column() {
        let spec = JoinSpec::new(["players", "stats"], ["id"]).select(["reb"]);
        let err = BatchJoiner::default().join(&store(), &spec).unwrap_err();
        assert_eq!(err, QueryError::UnknownColumn("reb".into()));
    }
}
