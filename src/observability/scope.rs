//! ObservationScope for begin/complete logging around one operation
//!
//! - Logs `{name}_BEGIN` on creation
//! - Logs `{name}_COMPLETE` or `{name}_FAILED` when closed
//! - Logs `{name}_INCOMPLETE` if dropped without being closed
//!
//! Every line a scope writes carries the same `query_id`, so the lines of
//! one query can be picked out of an interleaved log.

use std::cell::Cell;
use std::time::Instant;

use uuid::Uuid;

use super::logger::{Logger, Severity};

/// A scope that logs the lifecycle of one operation
///
/// ```ignore
/// let scope = ObservationScope::with_fields("QUERY", &[("table", "players")]);
/// match executor.execute(&request) {
///     Ok(rs) => scope.complete_with_fields(&[("rows", &rs.len().to_string())]),
///     Err(e) => scope.fail(e.code(), &e.to_string()),
/// }
/// ```
pub struct ObservationScope<'a> {
    name: &'a str,
    query_id: Uuid,
    completed: Cell<bool>,
    fields: Vec<(&'a str, String)>,
    timer: Timer,
}

impl<'a> ObservationScope<'a> {
    /// Create a new observation scope, logging `{name}_BEGIN`
    pub fn new(name: &'a str) -> Self {
        Self::with_fields(name, &[])
    }

    /// Create a new observation scope whose lines all carry `fields`
    pub fn with_fields(name: &'a str, fields: &[(&'a str, &str)]) -> Self {
        let scope = Self {
            name,
            query_id: Uuid::new_v4(),
            completed: Cell::new(false),
            fields: fields.iter().map(|(k, v)| (*k, v.to_string())).collect(),
            timer: Timer::new(),
        };
        scope.emit(Severity::Info, "BEGIN", &[]);
        scope
    }

    /// Identifier shared by every line of this scope
    pub fn query_id(&self) -> Uuid {
        self.query_id
    }

    /// Mark the scope as successfully completed
    pub fn complete(self) {
        self.complete_with_fields(&[]);
    }

    /// Mark the scope as completed, adding result fields to the line
    pub fn complete_with_fields(self, extra_fields: &[(&str, &str)]) {
        self.completed.set(true);
        let elapsed = self.timer.elapsed_ms();
        let mut extra: Vec<(&str, &str)> = extra_fields.to_vec();
        extra.push(("elapsed_ms", &elapsed));
        self.emit(Severity::Info, "COMPLETE", &extra);
    }

    /// Mark the scope as failed with an error code and reason
    pub fn fail(self, code: &str, reason: &str) {
        self.completed.set(true);
        self.emit(Severity::Error, "FAILED", &[("code", code), ("reason", reason)]);
    }

    /// Check if the scope has been closed
    pub fn is_completed(&self) -> bool {
        self.completed.get()
    }

    fn emit(&self, severity: Severity, suffix: &str, extra: &[(&str, &str)]) {
        if !Logger::enabled(severity) {
            return;
        }
        let event = format!("{}_{}", self.name, suffix);
        let id = self.query_id.to_string();

        let mut all_fields: Vec<(&str, &str)> = self
            .fields
            .iter()
            .map(|(k, v)| (*k, v.as_str()))
            .collect();
        all_fields.push(("query_id", &id));
        all_fields.extend(extra.iter().copied());

        Logger::log(severity, &event, &all_fields);
    }
}

impl Drop for ObservationScope<'_> {
    fn drop(&mut self) {
        if !self.completed.get() {
            self.emit(
                Severity::Warn,
                "INCOMPLETE",
                &[("reason", "scope dropped without completion")],
            );
        }
    }
}

/// A simple duration timer for logging elapsed time
pub struct Timer {
    start: Instant,
}

impl Timer {
    /// Create a new timer
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Get elapsed milliseconds as a string
    pub fn elapsed_ms(&self) -> String {
        self.start.elapsed().as_millis().to_string()
    }
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}
