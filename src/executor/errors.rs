//! Query error types
//!
//! Error codes:
//! - FLAT_TABLE_NOT_FOUND
//! - FLAT_UNKNOWN_COLUMN
//! - FLAT_MALFORMED_PREDICATE
//! - FLAT_UNSUPPORTED_AGGREGATION
//! - FLAT_JOIN_COLUMN_MISSING
//! - FLAT_INVALID_JOIN
//!
//! No query error is fatal: a failed query leaves every table untouched.

use thiserror::Error;

use crate::planner::PlannerError;

/// Result type for query operations
pub type QueryResult<T> = Result<T, QueryError>;

/// Errors raised by the query engine
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    /// The named table is not registered in the store
    #[error("Table '{0}' does not exist")]
    TableNotFound(String),

    /// A referenced column is not in the schema
    #[error("Unknown column '{0}'")]
    UnknownColumn(String),

    /// The condition string could not be parsed
    #[error("Malformed condition: {0}")]
    MalformedPredicate(#[from] PlannerError),

    /// Aggregation other than a single-column `count`
    #[error("Unsupported aggregation: {0}")]
    UnsupportedAggregation(String),

    /// A join column is absent from one of the joined tables
    #[error("Join column '{column}' does not exist in '{table}'")]
    JoinColumnMissing { table: String, column: String },

    /// A join request that cannot be satisfied by shape alone
    #[error("Invalid join: {0}")]
    InvalidJoin(String),
}

impl QueryError {
    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            QueryError::TableNotFound(_) => "FLAT_TABLE_NOT_FOUND",
            QueryError::UnknownColumn(_) => "FLAT_UNKNOWN_COLUMN",
            QueryError::MalformedPredicate(_) => "FLAT_MALFORMED_PREDICATE",
            QueryError::UnsupportedAggregation(_) => "FLAT_UNSUPPORTED_AGGREGATION",
            QueryError::JoinColumnMissing { .. } => "FLAT_JOIN_COLUMN_MISSING",
            QueryError::InvalidJoin(_) => "FLAT_INVALID_JOIN",
        }
    }

    pub(crate) fn unknown_column(name: impl Into<String>) -> Self {
        QueryError::UnknownColumn(name.into())
    }

    pub(crate) fn unsupported(reason: impl Into<String>) -> Self {
        QueryError::UnsupportedAggregation(reason.into())
    }
}
