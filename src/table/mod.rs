//! Row/table data model
//!
//! Every other subsystem reads and produces these types. Tables are
//! immutable for the duration of a query; the query engine always returns
//! new tables.

mod errors;
mod table;
mod value;

pub use errors::{TableError, TableResult};
pub use table::{Row, Table};
pub use value::Value;
