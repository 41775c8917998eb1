//! Configuration file handling
//!
//! `flatdb.json` is optional; an absent file means all defaults. A file
//! that exists but fails to parse or validate is a fatal error.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::executor::{BatchSize, DEFAULT_BATCH_SIZE};
use crate::observability::Severity;

use super::errors::{CliError, CliResult};

/// Configuration file structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Directory holding one delimited file per table
    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    /// Rows per processing batch (must be > 0)
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Field delimiter, a single ASCII character
    #[serde(default = "default_delimiter")]
    pub delimiter: String,

    /// Minimum log severity: trace, info, warn or error
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_data_dir() -> String {
    ".".to_string()
}
fn default_batch_size() -> usize {
    DEFAULT_BATCH_SIZE
}
fn default_delimiter() -> String {
    ",".to_string()
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            batch_size: default_batch_size(),
            delimiter: default_delimiter(),
            log_level: default_log_level(),
        }
    }
}

impl Config {
    /// Load configuration from file, falling back to defaults if it is absent
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => {
                return Err(CliError::config_error(format!(
                    "Failed to read config {}: {}",
                    path.display(),
                    e
                )))
            }
        };

        let config: Config = serde_json::from_str(&content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    /// Applies command-line overrides and re-validates
    pub fn with_overrides(
        mut self,
        data_dir: Option<PathBuf>,
        batch_size: Option<usize>,
    ) -> CliResult<Self> {
        if let Some(dir) = data_dir {
            self.data_dir = dir.to_string_lossy().into_owned();
        }
        if let Some(size) = batch_size {
            self.batch_size = size;
        }
        self.validate()?;
        Ok(self)
    }

    /// Validate configuration
    pub fn validate(&self) -> CliResult<()> {
        if self.data_dir.trim().is_empty() {
            return Err(CliError::config_error("data_dir must not be empty"));
        }

        self.batch()?;
        self.delimiter_byte()?;
        self.severity()?;

        Ok(())
    }

    /// Get data directory as Path
    pub fn data_path(&self) -> &Path {
        Path::new(&self.data_dir)
    }

    /// Batch size as the engine's type
    pub fn batch(&self) -> CliResult<BatchSize> {
        BatchSize::new(self.batch_size)
            .ok_or_else(|| CliError::config_error("batch_size must be > 0"))
    }

    /// Delimiter as a single byte
    pub fn delimiter_byte(&self) -> CliResult<u8> {
        match self.delimiter.as_bytes() {
            [b] if b.is_ascii() && *b != b'"' && *b != b'\n' && *b != b'\r' => Ok(*b),
            _ => Err(CliError::config_error(format!(
                "Invalid delimiter: '{}'. Must be a single ASCII character other than a quote or newline.",
                self.delimiter
            ))),
        }
    }

    /// Log threshold
    pub fn severity(&self) -> CliResult<Severity> {
        self.log_level.parse().map_err(CliError::config_error)
    }
}
