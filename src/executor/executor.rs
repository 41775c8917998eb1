//! Query executor for flatdb
//!
//! Execution flow (strict order):
//! 1. Resolve the table from the store
//! 2. Filter rows by the condition
//! 3. Project the requested columns
//! 4. Group-count (if requested)
//! 5. Sort (if requested)
//! 6. Return the result chunked into batches
//!
//! A failing stage aborts the remaining stages; no partial result is
//! returned. The store is only read.

use serde::{Deserialize, Serialize};

use crate::store::TableStore;

use super::aggregator::{AggregationSpec, BatchGroupCounter};
use super::batch::BatchSize;
use super::errors::{QueryError, QueryResult};
use super::filters::PredicateFilter;
use super::join::{BatchJoiner, JoinSpec};
use super::projector::Projector;
use super::result::ResultSet;
use super::sorter::BatchMergeSorter;

/// A single-table query
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryRequest {
    /// Table to read
    pub table: String,
    /// Row condition; absent or blank matches every row
    #[serde(default)]
    pub condition: Option<String>,
    /// Output columns; absent or empty keeps every column
    #[serde(default)]
    pub columns: Option<Vec<String>>,
    /// Group-count request
    #[serde(default)]
    pub aggregation: Option<AggregationSpec>,
    /// Column to sort by, ascending
    #[serde(default)]
    pub sort_column: Option<String>,
}

impl QueryRequest {
    /// Reads every row of `table`
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            ..Default::default()
        }
    }

    /// Sets the row condition
    pub fn condition(mut self, condition: impl Into<String>) -> Self {
        self.condition = Some(condition.into());
        self
    }

    /// Sets the output columns
    pub fn columns<S: Into<String>>(mut self, columns: impl IntoIterator<Item = S>) -> Self {
        self.columns = Some(columns.into_iter().map(Into::into).collect());
        self
    }

    /// Sets the aggregation
    pub fn aggregation(mut self, spec: AggregationSpec) -> Self {
        self.aggregation = Some(spec);
        self
    }

    /// Sets the sort column
    pub fn sort_by(mut self, column: impl Into<String>) -> Self {
        self.sort_column = Some(column.into());
        self
    }
}

/// Runs queries against a table store
pub struct QueryExecutor<'a, S: TableStore + ?Sized> {
    store: &'a S,
    batch_size: BatchSize,
}

impl<'a, S: TableStore + ?Sized> QueryExecutor<'a, S> {
    /// Creates an executor over `store`
    pub fn new(store: &'a S, batch_size: BatchSize) -> Self {
        Self { store, batch_size }
    }

    /// Batch size used by every stage and for result chunking
    pub fn batch_size(&self) -> BatchSize {
        self.batch_size
    }

    /// Executes a query.
    ///
    /// Same request + same table = same result.
    pub fn execute(&self, request: &QueryRequest) -> QueryResult<ResultSet> {
        let table = self
            .store
            .get_table(&request.table)
            .ok_or_else(|| QueryError::TableNotFound(request.table.clone()))?;

        let mut result = PredicateFilter::filter(table, request.condition.as_deref())?;

        result = Projector::project(&result, request.columns.as_deref())?;

        if let Some(spec) = &request.aggregation {
            result = BatchGroupCounter::new(self.batch_size).aggregate(&result, spec)?;
        }

        if let Some(column) = request.sort_column.as_deref().filter(|c| !c.trim().is_empty()) {
            result = BatchMergeSorter::new(self.batch_size).sort_by(&result, column)?;
        }

        Ok(ResultSet::new(result, self.batch_size))
    }

    /// Executes a positional join
    pub fn join(&self, spec: &JoinSpec) -> QueryResult<ResultSet> {
        let table = BatchJoiner::new(self.batch_size).join(self.store, spec)?;
        Ok(ResultSet::new(table, self.batch_size))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryTableStore;
    use crate::table::{Table, Value};

    fn store() -> MemoryTableStore {
        let mut store = MemoryTableStore::new();
        store.insert(
            "Players",
            Table::with_rows(
                ["name", "team", "pts"],
                vec![
                    vec!["A".into(), "PHI".into(), 10.into()],
                    vec!["B".into(), "BOS".into(), 30.into()],
                    vec!["C".into(), "PHI".into(), 20.into()],
                ],
            )
            .unwrap(),
        );
        store
    }

    fn executor(store: &MemoryTableStore, batch: usize) -> QueryExecutor<'_, MemoryTableStore> {
        QueryExecutor::new(store, BatchSize::new(batch).unwrap())
    }

    #[test]
    fn test_full_pipeline_order() {
        let store = store();
        let request = QueryRequest::new("Players")
            .condition("pts >= 10")
            .columns(["team"])
            .aggregation(AggregationSpec::count_by("team"))
            .sort_by("count");

        let result = executor(&store, 100).execute(&request).unwrap();

        assert_eq!(result.columns(), &["team".to_string(), "count".into()]);
        let rows: Vec<&[Value]> = result.rows().iter().map(|r| r.values()).collect();
        assert_eq!(
            rows,
            vec![
                &[Value::from("BOS"), Value::Int(1)][..],
                &[Value::from("PHI"), Value::Int(2)][..],
            ]
        );
    }

    #[test]
    fn test_table_not_found() {
        let store = store();
        let err = executor(&store, 10).execute(&QueryRequest::new("Teams")).unwrap_err();
        assert_eq!(err, QueryError::TableNotFound("Teams".into()));
    }

    #[test]
    fn test_stage_failure_aborts() {
        let store = store();
        // projection removes pts, so sorting by it must fail
        let request = QueryRequest::new("Players").columns(["name"]).sort_by("pts");
        let err = executor(&store, 10).execute(&request).unwrap_err();
        assert_eq!(err, QueryError::UnknownColumn("pts".into()));
    }

    #[test]
    fn test_no_match_is_empty_success() {
        let store = store();
        let result = executor(&store, 10)
            .execute(&QueryRequest::new("Players").condition("pts > 100"))
            .unwrap();
        assert!(result.is_empty());
        assert_eq!(result.columns().len(), 3);
    }

    #[test]
    fn test_results_emitted_in_batches() {
        let store = store();
        let result = executor(&store, 2).execute(&QueryRequest::new("Players")).unwrap();
        assert_eq!(result.batch_count(), 2);
        assert_eq!(result.batches().map(|b| b.len()).collect::<Vec<_>>(), vec![2, 1]);
    }

    #[test]
    fn test_store_untouched() {
        let store = store();
        let before = store.get_table("Players").cloned();
        executor(&store, 1)
            .execute(&QueryRequest::new("Players").sort_by("pts"))
            .unwrap();
        assert_eq!(store.get_table("Players").cloned(), before);
    }

    #[test]
    fn test_request_deserializes() {
        let request: QueryRequest = serde_json::from_value(serde_json::json!({
            "table": "Players",
            "condition": "pts > 15",
            "sort_column": "pts"
        }))
        .unwrap();
        assert_eq!(request, QueryRequest::new("Players").condition("pts > 15").sort_by("pts"));
    }
}
