//! Condition planning for flatdb
//!
//! Turns user-supplied condition strings (`pts > 15 and team == "PHI"`)
//! into a typed `Predicate` tree. Column names are not resolved here;
//! binding against a concrete column list happens in the executor.

mod ast;
mod errors;
mod parser;

pub use ast::{CompareOp, Operand, Predicate};
pub use errors::{PlannerError, PlannerResult};
pub use parser::{parse_condition, parse_predicate};
