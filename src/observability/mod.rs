//! Observability for flatdb
//!
//! Structured JSON-lines logging to stderr, lifecycle events, and
//! per-query observation scopes. The table and query engine modules never
//! log; only the command surface and boot path do.
//!
//! # Usage
//!
//! ```ignore
//! use flatdb::observability::{Logger, Event, ObservationScope, log_event_with_fields};
//!
//! log_event_with_fields(Event::TablesLoaded, &[("tables", "3")]);
//!
//! let scope = ObservationScope::with_fields("QUERY", &[("table", "players")]);
//! // ... run the query ...
//! scope.complete_with_fields(&[("rows", "42")]);
//! ```

mod events;
mod logger;
mod scope;

pub use events::Event;
pub use logger::{Logger, Severity};
pub use scope::{ObservationScope, Timer};

fn severity_for(event: Event) -> Severity {
    if event.is_fatal() {
        Severity::Fatal
    } else if event.is_failure() {
        Severity::Warn
    } else {
        Severity::Info
    }
}

/// Log a lifecycle event
pub fn log_event(event: Event) {
    Logger::log(severity_for(event), event.as_str(), &[]);
}

/// Log a lifecycle event with fields
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    Logger::log(severity_for(event), event.as_str(), fields);
}
