//! flatdb - batch-oriented ad hoc queries over flat delimited tables
//!
//! Tables live one per file in a data directory. The query engine filters,
//! projects, group-counts, sorts, and joins them in fixed-size batches.

pub mod cli;
pub mod executor;
pub mod observability;
pub mod planner;
pub mod store;
pub mod table;
