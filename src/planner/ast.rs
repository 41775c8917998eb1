//! Predicate AST
//!
//! Conditions are comparisons between operands (column references or
//! literals), optionally combined with `and` / `or`.

use std::cmp::Ordering;
use std::fmt;

use crate::table::Value;

/// Comparison operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    /// `==`
    Eq,
    /// `!=`
    Ne,
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// `>`
    Gt,
    /// `>=`
    Ge,
}

impl CompareOp {
    /// Operator as written in a condition
    pub fn symbol(&self) -> &'static str {
        match self {
            CompareOp::Eq => "==",
            CompareOp::Ne => "!=",
            CompareOp::Lt => "<",
            CompareOp::Le => "<=",
            CompareOp::Gt => ">",
            CompareOp::Ge => ">=",
        }
    }

    /// Returns true if `ordering` (left relative to right) satisfies the operator
    pub fn holds(&self, ordering: Ordering) -> bool {
        match self {
            CompareOp::Eq => ordering == Ordering::Equal,
            CompareOp::Ne => ordering != Ordering::Equal,
            CompareOp::Lt => ordering == Ordering::Less,
            CompareOp::Le => ordering != Ordering::Greater,
            CompareOp::Gt => ordering == Ordering::Greater,
            CompareOp::Ge => ordering != Ordering::Less,
        }
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// One side of a comparison
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    /// Reference to a column by name
    Column(String),
    /// Quoted string or numeric literal
    Literal(Value),
}

impl Operand {
    /// Column reference shorthand
    pub fn column(name: impl Into<String>) -> Self {
        Operand::Column(name.into())
    }

    /// Literal shorthand
    pub fn literal(value: impl Into<Value>) -> Self {
        Operand::Literal(value.into())
    }
}

/// A boolean condition over row values.
///
/// `And` and `Or` hold their terms flat, so a long chain of one connective
/// stays one level deep; only parentheses add nesting.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// `left op right`
    Compare {
        left: Operand,
        op: CompareOp,
        right: Operand,
    },
    /// Every term must hold
    And(Vec<Predicate>),
    /// At least one term must hold
    Or(Vec<Predicate>),
}

impl Predicate {
    /// Creates a comparison
    pub fn compare(left: Operand, op: CompareOp, right: Operand) -> Self {
        Predicate::Compare { left, op, right }
    }

    /// Combines with `and`
    pub fn and(self, other: Predicate) -> Self {
        let mut terms = match self {
            Predicate::And(terms) => terms,
            p => vec![p],
        };
        match other {
            Predicate::And(more) => terms.extend(more),
            p => terms.push(p),
        }
        Predicate::And(terms)
    }

    /// Combines with `or`
    pub fn or(self, other: Predicate) -> Self {
        let mut terms = match self {
            Predicate::Or(terms) => terms,
            p => vec![p],
        };
        match other {
            Predicate::Or(more) => terms.extend(more),
            p => terms.push(p),
        }
        Predicate::Or(terms)
    }
}
