//! Batched merge sort
//!
//! Each input batch is sorted on its own with a two-way recursive merge
//! sort, then merged into the running result with the same two-way merge.
//! Batching bounds the size of each recursive sort, not the total working
//! set: the running result grows to the full input size.
//!
//! Sort is ascending and stable. On ties the merge takes from the left
//! operand, and the running result is always the left operand, so rows
//! with equal keys keep their input order.

use std::cmp::Ordering;

use crate::table::{Row, Table};

use super::batch::BatchSize;
use super::compare::compare_values;
use super::errors::{QueryError, QueryResult};

/// Sorts a table by one column, one batch at a time
#[derive(Debug, Clone, Copy, Default)]
pub struct BatchMergeSorter {
    batch_size: BatchSize,
}

impl BatchMergeSorter {
    /// Creates a sorter with the given batch size
    pub fn new(batch_size: BatchSize) -> Self {
        Self { batch_size }
    }

    /// Returns a new table ordered ascending by `column`
    pub fn sort_by(&self, table: &Table, column: &str) -> QueryResult<Table> {
        let index = table
            .column_index(column)
            .ok_or_else(|| QueryError::unknown_column(column))?;

        let cmp = |a: &Row, b: &Row| match (a.get(index), b.get(index)) {
            (Some(x), Some(y)) => compare_values(x, y),
            _ => Ordering::Equal,
        };

        let mut merged: Vec<Row> = Vec::new();
        for batch in table.rows().chunks(self.batch_size.get()) {
            let sorted = merge_sort(batch.to_vec(), &cmp);
            merged = merge(merged, sorted, &cmp);
        }

        Ok(Table::from_parts(table.columns().to_vec(), merged))
    }
}

/// Stable two-way recursive merge sort
pub fn merge_sort<T, F>(mut items: Vec<T>, cmp: &F) -> Vec<T>
where
    F: Fn(&T, &T) -> Ordering,
{
    if items.len() <= 1 {
        return items;
    }

    let right = items.split_off(items.len() / 2);
    let left = merge_sort(items, cmp);
    let right = merge_sort(right, cmp);

    merge(left, right, cmp)
}

/// Merges two sorted sequences, taking from `left` on ties
pub fn merge<T, F>(left: Vec<T>, right: Vec<T>, cmp: &F) -> Vec<T>
where
    F: Fn(&T, &T) -> Ordering,
{
    if left.is_empty() {
        return right;
    }
    if right.is_empty() {
        return left;
    }

    let mut out = Vec::with_capacity(left.len() + right.len());
    let mut left = left.into_iter().peekable();
    let mut right = right.into_iter().peekable();

    loop {
        let take_left = match (left.peek(), right.peek()) {
            (Some(l), Some(r)) => cmp(l, r) != Ordering::Greater,
            (Some(_), None) => true,
            (None, Some(_)) => false,
            (None, None) => break,
        };
        let next = if take_left { left.next() } else { right.next() };
        out.extend(next);
    }

    out
}
