//! Table store errors
//!
//! Error codes:
//! - FLAT_STORE_TABLE_NOT_FOUND
//! - FLAT_STORE_TABLE_EXISTS
//! - FLAT_STORE_INVALID_TABLE_NAME
//! - FLAT_STORE_NO_COLUMNS
//! - FLAT_STORE_ARITY_MISMATCH
//! - FLAT_STORE_MALFORMED_FILE
//! - FLAT_STORE_CONDITION_REQUIRED
//! - FLAT_STORE_IO
//! - query and table errors keep their own codes

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::executor::QueryError;
use crate::table::TableError;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors raised while loading, mutating or persisting tables
#[derive(Debug, Error)]
pub enum StoreError {
    /// No table with this name
    #[error("Table '{0}' does not exist")]
    TableNotFound(String),

    /// A table with this name already exists
    #[error("Table '{0}' already exists. Choose a different name.")]
    TableExists(String),

    /// Name that cannot be used as a file stem
    #[error("Invalid table name '{0}'")]
    InvalidTableName(String),

    /// Table creation without column headers
    #[error("Columns must be provided when creating a new table")]
    NoColumns,

    /// An inserted line does not have one value per column
    #[error("Line {line} for '{table}' has {found} values, expected {expected}")]
    ArityMismatch {
        table: String,
        line: usize,
        expected: usize,
        found: usize,
    },

    /// A delimited file could not be parsed
    #[error("Malformed file {}: line {line}: {reason}", path.display())]
    Malformed {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    /// Delete or update without a condition
    #[error("Conditions not provided. No rows changed.")]
    ConditionRequired,

    /// A condition or query failed
    #[error(transparent)]
    Query(#[from] QueryError),

    /// The table shape is invalid
    #[error(transparent)]
    Table(#[from] TableError),

    /// Filesystem failure
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl StoreError {
    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            StoreError::TableNotFound(_) => "FLAT_STORE_TABLE_NOT_FOUND",
            StoreError::TableExists(_) => "FLAT_STORE_TABLE_EXISTS",
            StoreError::InvalidTableName(_) => "FLAT_STORE_INVALID_TABLE_NAME",
            StoreError::NoColumns => "FLAT_STORE_NO_COLUMNS",
            StoreError::ArityMismatch { .. } => "FLAT_STORE_ARITY_MISMATCH",
            StoreError::Malformed { .. } => "FLAT_STORE_MALFORMED_FILE",
            StoreError::ConditionRequired => "FLAT_STORE_CONDITION_REQUIRED",
            StoreError::Query(e) => e.code(),
            StoreError::Table(e) => e.code(),
            StoreError::Io { .. } => "FLAT_STORE_IO",
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        StoreError::Io {
            path: path.into(),
            source,
        }
    }
}
