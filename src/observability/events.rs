//! Observable events for flatdb

use std::fmt;

/// Lifecycle and operation events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Boot & Lifecycle
    /// Startup begins
    BootStart,
    /// Configuration loaded
    ConfigLoaded,
    /// Config file rejected (FATAL)
    ConfigInvalid,
    /// Tables loaded from the data directory
    TablesLoaded,
    /// Interactive loop ready for commands
    ShellReady,
    /// Interactive loop ended
    ShellExit,

    // Table mutations
    /// Table created
    TableCreated,
    /// Rows appended
    RowsInserted,
    /// Rows removed
    RowsDeleted,
    /// Rows replaced
    RowsUpdated,
    /// Mutation refused
    MutationRejected,

    // Queries
    /// Query or join rejected
    QueryRejected,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::BootStart => "FLATDB_STARTUP_BEGIN",
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::ConfigInvalid => "CONFIG_INVALID",
            Event::TablesLoaded => "TABLES_LOADED",
            Event::ShellReady => "SHELL_READY",
            Event::ShellExit => "SHELL_EXIT",

            Event::TableCreated => "TABLE_CREATED",
            Event::RowsInserted => "ROWS_INSERTED",
            Event::RowsDeleted => "ROWS_DELETED",
            Event::RowsUpdated => "ROWS_UPDATED",
            Event::MutationRejected => "MUTATION_REJECTED",

            Event::QueryRejected => "QUERY_REJECTED",
        }
    }

    /// Returns true if this event indicates a fatal condition
    pub fn is_fatal(&self) -> bool {
        matches!(self, Event::ConfigInvalid)
    }

    /// Returns true if this event reports a non-fatal failure
    pub fn is_failure(&self) -> bool {
        matches!(self, Event::MutationRejected | Event::QueryRejected)
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
