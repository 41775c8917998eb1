//! Table shape errors

use thiserror::Error;

/// Result type for table construction
pub type TableResult<T> = Result<T, TableError>;

/// Violations of the table shape invariants
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    /// Two columns share a name
    #[error("Duplicate column name: {0}")]
    DuplicateColumn(String),

    /// A column name is blank
    #[error("Column names must not be empty")]
    EmptyColumnName,

    /// A row does not carry exactly one value per column
    #[error("Row has {found} values but the table has {expected} columns")]
    ArityMismatch { expected: usize, found: usize },
}

impl TableError {
    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            TableError::DuplicateColumn(_) => "FLAT_TABLE_DUPLICATE_COLUMN",
            TableError::EmptyColumnName => "FLAT_TABLE_EMPTY_COLUMN",
            TableError::ArityMismatch { .. } => "FLAT_TABLE_ARITY_MISMATCH",
        }
    }
}
