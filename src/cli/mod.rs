//! CLI module for flatdb
//!
//! Provides the command-line interface:
//! - shell: interactive command loop (default)
//! - query: one-shot query execution
//! - join: one-shot join execution
//! - tables: list loaded tables

mod args;
mod commands;
mod config;
mod errors;
mod io;
mod shell;

pub use args::{Cli, Command};
pub use commands::{
    boot_config, join_spec, open_store, query_request, run, run_command, run_join, run_query,
};
pub use config::Config;
pub use errors::{CliError, CliResult};
pub use io::{clean_list, parse_list, parse_optional, write_error, write_result, write_tables};
pub use shell::Shell;
