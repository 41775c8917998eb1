//! CLI-specific error types
//!
//! Config and I/O errors are fatal to the process. Store and query errors
//! raised inside the interactive loop are reported and the loop continues.

use std::io;

use thiserror::Error;

use crate::executor::QueryError;
use crate::store::StoreError;

/// CLI error
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration file or override rejected
    #[error("{0}")]
    Config(String),

    /// Reading input or writing output failed
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Result serialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Query(#[from] QueryError),
}

impl CliError {
    /// Config error
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Get the error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::Config(_) => "FLAT_CLI_CONFIG_ERROR",
            Self::Io(_) => "FLAT_CLI_IO_ERROR",
            Self::Json(_) => "FLAT_CLI_IO_ERROR",
            Self::Store(e) => e.code(),
            Self::Query(e) => e.code(),
        }
    }

    /// Returns true if the process should stop
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Config(_) | Self::Io(_) | Self::Json(_))
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;
