//! CLI argument definitions using clap
//!
//! Commands:
//! - flatdb [shell]
//! - flatdb query --table <name> [--where <cond>] [--columns a,b] [--group-by c --agg count] [--sort-by c]
//! - flatdb join --tables a,b --on <col> [--select a,b] [--where <cond>]
//! - flatdb tables

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// flatdb - ad hoc batch queries over a directory of delimited tables
#[derive(Parser, Debug)]
#[command(name = "flatdb")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, global = true, default_value = "./flatdb.json")]
    pub config: PathBuf,

    /// Directory holding the table files (overrides config)
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Rows per processing batch (overrides config)
    #[arg(long, global = true)]
    pub batch_size: Option<usize>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Interactive command loop (default)
    Shell,

    /// Run a single query and print the result
    Query {
        /// Table to read
        #[arg(long)]
        table: String,

        /// Row condition, e.g. `pts > 15 and season == 2024`
        #[arg(long = "where")]
        condition: Option<String>,

        /// Columns to keep (comma-separated)
        #[arg(long, value_delimiter = ',')]
        columns: Vec<String>,

        /// Column to group by
        #[arg(long, value_delimiter = ',')]
        group_by: Vec<String>,

        /// Aggregation to apply to each group (only `count`)
        #[arg(long, value_delimiter = ',')]
        agg: Vec<String>,

        /// Column to sort by, ascending
        #[arg(long)]
        sort_by: Option<String>,
    },

    /// Join tables row by row and print the result
    Join {
        /// Tables to join (comma-separated, at least two)
        #[arg(long, value_delimiter = ',', required = true)]
        tables: Vec<String>,

        /// Columns every table must contain (comma-separated)
        #[arg(long, value_delimiter = ',')]
        on: Vec<String>,

        /// Columns to keep (comma-separated)
        #[arg(long, value_delimiter = ',')]
        select: Vec<String>,

        /// Row condition applied to the joined rows
        #[arg(long = "where")]
        condition: Option<String>,
    },

    /// List loaded tables
    Tables,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }

    /// Subcommand to run; the interactive loop when none is given
    pub fn effective_command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Shell)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_default_is_shell() {
        let cli = Cli::try_parse_from(["flatdb"]).unwrap();
        assert_eq!(cli.effective_command(), Command::Shell);
        assert_eq!(cli.config, PathBuf::from("./flatdb.json"));
    }

    #[test]
    fn test_query_args() {
        let cli = Cli::try_parse_from([
            "flatdb",
            "--batch-size",
            "2",
            "query",
            "--table",
            "players",
            "--where",
            "pts > 15",
            "--columns",
            "player,pts",
            "--sort-by",
            "pts",
        ])
        .unwrap();

        assert_eq!(cli.batch_size, Some(2));
        match cli.effective_command() {
            Command::Query {
                table,
                condition,
                columns,
                sort_by,
                group_by,
                ..
            } => {
                assert_eq!(table, "players");
                assert_eq!(condition.as_deref(), Some("pts > 15"));
                assert_eq!(columns, vec!["player", "pts"]);
                assert_eq!(sort_by.as_deref(), Some("pts"));
                assert!(group_by.is_empty());
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_join_requires_tables() {
        assert!(Cli::try_parse_from(["flatdb", "join", "--on", "id"]).is_err());
        let cli = Cli::try_parse_from(["flatdb", "join", "--tables", "a,b", "--on", "id"]).unwrap();
        assert!(matches!(cli.effective_command(), Command::Join { tables, .. } if tables == ["a", "b"]));
    }
}
