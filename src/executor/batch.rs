//! Batch sizing
//!
//! Batches are contiguous row slices used to bound per-step working memory.
//! They are never persisted.

use std::fmt;
use std::num::NonZeroUsize;

/// Default number of rows per batch
pub const DEFAULT_BATCH_SIZE: usize = 1000;

/// Maximum rows per batch; always at least one
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BatchSize(NonZeroUsize);

impl BatchSize {
    /// Returns `None` for zero
    pub fn new(rows: usize) -> Option<Self> {
        NonZeroUsize::new(rows).map(Self)
    }

    /// Rows per batch
    pub fn get(self) -> usize {
        self.0.get()
    }

    /// Number of batches needed for `len` rows
    pub fn batch_count(self, len: usize) -> usize {
        len.div_ceil(self.get())
    }
}

impl Default for BatchSize {
    fn default() -> Self {
        Self(NonZeroUsize::MIN.saturating_add(DEFAULT_BATCH_SIZE - 1))
    }
}

impl fmt::Display for BatchSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
