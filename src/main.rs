//! flatdb CLI entry point
//!
//! This is a minimal entrypoint that:
//! 1. Parses CLI arguments (via cli::run)
//! 2. Dispatches to CLI commands (via cli::run)
//! 3. Prints errors to stderr
//! 4. Exits with non-zero on failure
//!
//! All logic is delegated to the CLI module.

use flatdb::cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("{}: {}", e.code(), e);
        std::process::exit(1);
    }
}
