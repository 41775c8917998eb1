//! Query executor subsystem for flatdb
//!
//! The batch-oriented query core: predicate filter, projector, group-count,
//! merge sort and positional join, orchestrated by `QueryExecutor`.
//!
//! # Execution Flow (strict order)
//!
//! 1. Filter rows by condition
//! 2. Project columns
//! 3. Group-count (optional)
//! 4. Sort (optional)
//! 5. Emit results in fixed-size batches
//!
//! # Invariants
//!
//! - Tables are never mutated; every stage returns a new table
//! - Row order is preserved unless a sort is requested
//! - Sorting is stable
//! - The core does no logging; errors are returned to the caller

mod aggregator;
mod batch;
mod compare;
mod errors;
mod executor;
mod filters;
mod join;
mod projector;
mod result;
mod sorter;

pub use aggregator::{AggregationSpec, BatchGroupCounter, COUNT_COLUMN};
pub use batch::{BatchSize, DEFAULT_BATCH_SIZE};
pub use compare::{compare_values, satisfies};
pub use errors::{QueryError, QueryResult};
pub use executor::{QueryExecutor, QueryRequest};
pub use filters::{BoundOperand, BoundPredicate, PredicateFilter};
pub use join::{BatchJoiner, JoinSpec};
pub use projector::Projector;
pub use result::ResultSet;
pub use sorter::{merge, merge_sort, BatchMergeSorter};
