//! Predicate filtering
//!
//! Column references are resolved once against the table's column list
//! (`bind`), then the bound predicate is evaluated row by row. An unknown
//! column fails even when the table has no rows.

use crate::planner::{parse_condition, CompareOp, Operand, Predicate};
use crate::table::{Row, Table, Value};

use super::compare::satisfies;
use super::errors::{QueryError, QueryResult};

/// An operand resolved to a column position or a literal
#[derive(Debug, Clone)]
pub enum BoundOperand {
    Column(usize),
    Literal(Value),
}

impl BoundOperand {
    fn resolve<'a>(&'a self, row: &'a Row) -> &'a Value {
        const NULL: &Value = &Value::Null;
        match self {
            BoundOperand::Column(i) => row.get(*i).unwrap_or(NULL),
            BoundOperand::Literal(v) => v,
        }
    }
}

/// A predicate whose columns have been resolved to positions
#[derive(Debug, Clone)]
pub enum BoundPredicate {
    Compare {
        left: BoundOperand,
        op: CompareOp,
        right: BoundOperand,
    },
    And(Vec<BoundPredicate>),
    Or(Vec<BoundPredicate>),
}

impl BoundPredicate {
    /// Evaluates against a row laid out like the bound column list
    pub fn matches(&self, row: &Row) -> bool {
        match self {
            BoundPredicate::Compare { left, op, right } => {
                satisfies(left.resolve(row), *op, right.resolve(row))
            }
            BoundPredicate::And(terms) => terms.iter().all(|t| t.matches(row)),
            BoundPredicate::Or(terms) => terms.iter().any(|t| t.matches(row)),
        }
    }
}

/// Evaluates conditions against tables
pub struct PredicateFilter;

impl PredicateFilter {
    /// Resolves every column reference in `predicate` against `columns`
    pub fn bind(predicate: &Predicate, columns: &[String]) -> QueryResult<BoundPredicate> {
        let bind_operand = |operand: &Operand| -> QueryResult<BoundOperand> {
            match operand {
                Operand::Column(name) => columns
                    .iter()
                    .position(|c| c == name)
                    .map(BoundOperand::Column)
                    .ok_or_else(|| QueryError::unknown_column(name.as_str())),
                Operand::Literal(v) => Ok(BoundOperand::Literal(v.clone())),
            }
        };

        Ok(match predicate {
            Predicate::Compare { left, op, right } => BoundPredicate::Compare {
                left: bind_operand(left)?,
                op: *op,
                right: bind_operand(right)?,
            },
            Predicate::And(terms) => BoundPredicate::And(Self::bind_all(terms, columns)?),
            Predicate::Or(terms) => BoundPredicate::Or(Self::bind_all(terms, columns)?),
        })
    }

    fn bind_all(terms: &[Predicate], columns: &[String]) -> QueryResult<Vec<BoundPredicate>> {
        terms.iter().map(|t| Self::bind(t, columns)).collect()
    }

    /// Parses and binds an optional condition string.
    ///
    /// Returns `None` for an absent or blank condition.
    pub fn prepare(condition: Option<&str>, columns: &[String]) -> QueryResult<Option<BoundPredicate>> {
        match parse_condition(condition)? {
            Some(predicate) => Self::bind(&predicate, columns).map(Some),
            None => Ok(None),
        }
    }

    /// Returns the rows of `table` for which `condition` holds, in order.
    ///
    /// An absent or blank condition matches every row.
    pub fn filter(table: &Table, condition: Option<&str>) -> QueryResult<Table> {
        match Self::prepare(condition, table.columns())? {
            Some(bound) => Ok(Self::apply(table, &bound)),
            None => Ok(table.clone()),
        }
    }

    fn apply(table: &Table, bound: &BoundPredicate) -> Table {
        let rows = table
            .rows()
            .iter()
            .filter(|row| bound.matches(row))
            .cloned()
            .collect();
        Table::from_parts(table.columns().to_vec(), rows)
    }
}
