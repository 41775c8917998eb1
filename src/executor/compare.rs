//! Value comparison shared by filtering and sorting
//!
//! Ordering rules:
//! - null sorts before every other value
//! - two numeric values compare numerically (int and float mix freely)
//! - two strings compare lexically
//! - a number against a string compares the number's text form lexically

use std::cmp::Ordering;

use crate::planner::CompareOp;
use crate::table::Value;

/// Ordering used by the sorter.
///
/// This is a total order only over a single-typed column (nulls aside).
/// Mixing numbers with strings falls back to text comparison, which is not
/// transitive: `"10" < 9 < 10 == "10"`. Store columns never mix the two,
/// since each mutation commits the table as a fresh load would type it.
pub fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Null, Value::Null) => Ordering::Equal,
        (Value::Null, _) => Ordering::Less,
        (_, Value::Null) => Ordering::Greater,
        (Value::Int(x), Value::Int(y)) => x.cmp(y),
        (Value::Str(x), Value::Str(y)) => x.cmp(y),
        (x, y) => match (x.as_f64(), y.as_f64()) {
            (Some(xf), Some(yf)) => xf.partial_cmp(&yf).unwrap_or_else(|| xf.total_cmp(&yf)),
            _ => x.to_string().cmp(&y.to_string()),
        },
    }
}

/// Evaluates `left op right` for a predicate.
///
/// A null or NaN operand satisfies only `!=`.
pub fn satisfies(left: &Value, op: CompareOp, right: &Value) -> bool {
    if is_missing(left) || is_missing(right) {
        return op == CompareOp::Ne;
    }
    op.holds(compare_values(left, right))
}

fn is_missing(v: &Value) -> bool {
    match v {
        Value::Null => true,
        Value::Float(f) => f.is_nan(),
        _ => false,
    }
}
