//! Batched group-count
//!
//! Input rows are processed in consecutive batches. Each batch contributes
//! one output row per distinct grouping value present in that batch, in
//! first-seen order, carrying the count within that batch only. Counts are
//! never merged across batches: a value that spans two batches yields two
//! rows with partial counts.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::table::{Row, Table, Value};

use super::batch::BatchSize;
use super::errors::{QueryError, QueryResult};

/// Name of the count column in group-count output
pub const COUNT_COLUMN: &str = "count";

/// Requested aggregation: grouping columns plus aggregation function names.
///
/// Only one grouping column with the single function `count` is supported.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregationSpec {
    #[serde(default, alias = "groupBy")]
    pub group_by: Vec<String>,
    #[serde(default)]
    pub aggregations: Vec<String>,
}

impl AggregationSpec {
    /// `count` grouped by one column
    pub fn count_by(column: impl Into<String>) -> Self {
        Self {
            group_by: vec![column.into()],
            aggregations: vec![COUNT_COLUMN.to_string()],
        }
    }

    /// Returns the grouping column if the spec has the supported shape
    pub fn grouping_column(&self) -> QueryResult<&str> {
        let column = match self.group_by.as_slice() {
            [column] => column,
            [] => return Err(QueryError::unsupported("A group by column is required")),
            _ => {
                return Err(QueryError::unsupported(
                    "Only one group by column is supported",
                ))
            }
        };

        match self.aggregations.as_slice() {
            [agg] if agg.trim().eq_ignore_ascii_case(COUNT_COLUMN) => Ok(column),
            [agg] => Err(QueryError::unsupported(format!(
                "Aggregation '{}' is not supported",
                agg
            ))),
            _ => Err(QueryError::unsupported("Only one aggregation is supported")),
        }
    }
}

/// Computes per-batch counts for one grouping column
#[derive(Debug, Clone, Copy, Default)]
pub struct BatchGroupCounter {
    batch_size: BatchSize,
}

impl BatchGroupCounter {
    /// Creates a counter with the given batch size
    pub fn new(batch_size: BatchSize) -> Self {
        Self { batch_size }
    }

    /// Validates `spec` and counts by its grouping column.
    ///
    /// On error the input table is untouched and remains with the caller.
    pub fn aggregate(&self, table: &Table, spec: &AggregationSpec) -> QueryResult<Table> {
        let column = spec.grouping_column()?;
        self.group_count(table, column)
    }

    /// Returns a `(column, count)` table with one row per distinct value per batch
    pub fn group_count(&self, table: &Table, column: &str) -> QueryResult<Table> {
        let index = table
            .column_index(column)
            .ok_or_else(|| QueryError::unknown_column(column))?;
        if column == COUNT_COLUMN {
            return Err(QueryError::unsupported(format!(
                "Cannot group by the '{}' output column",
                COUNT_COLUMN
            )));
        }

        let mut rows = Vec::new();
        for batch in table.rows().chunks(self.batch_size.get()) {
            Self::count_batch(batch, index, &mut rows);
        }

        Ok(Table::from_parts(
            vec![column.to_string(), COUNT_COLUMN.to_string()],
            rows,
        ))
    }

    fn count_batch(batch: &[Row], index: usize, out: &mut Vec<Row>) {
        let mut slots: HashMap<&Value, usize> = HashMap::new();
        let mut groups: Vec<(&Value, i64)> = Vec::new();

        for row in batch {
            let Some(value) = row.get(index) else {
                continue;
            };
            match slots.get(value) {
                Some(&slot) => groups[slot].1 += 1,
                None => {
                    slots.insert(value, groups.len());
                    groups.push((value, 1));
                }
            }
        }

        out.extend(
            groups
                .into_iter()
                .map(|(value, count)| Row::new(vec![value.clone(), Value::Int(count)])),
        );
    }
}
