//! Table storage for flatdb
//!
//! The query engine reads tables through the `TableStore` trait.
//! `CsvTableStore` loads one delimited file per table from a data
//! directory, infers column types, and persists every mutation with a
//! temp-file-then-rename write.

mod delimited;
mod directory;
mod errors;
mod inference;
mod store;

pub use delimited::{format_record, parse_table, read_table_file, render_table, split_record};
pub use directory::CsvTableStore;
pub use errors::{StoreError, StoreResult};
pub use inference::{coerce, column_types, infer_column, ColumnType};
pub use store::{MemoryTableStore, TableStore};
