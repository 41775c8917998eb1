//! Interactive command loop
//!
//! Reads one command per line, then prompts for that command's inputs.
//! Store and query failures are printed as `CODE: message` and the loop
//! continues. Only I/O failures on the terminal itself end the loop with an
//! error. End of input behaves like `exit`.

use std::io::{BufRead, Write};

use crate::executor::BatchSize;
use crate::observability::{log_event, log_event_with_fields, Event};
use crate::store::{CsvTableStore, TableStore};

use super::commands::{join_spec, query_request, run_join, run_query};
use super::errors::{CliError, CliResult};
use super::io::{parse_list, parse_optional, write_error, write_result, write_tables};

const COMMAND_PROMPT: &str = "\nEnter command ('help' for more help, 'exit' to quit): ";
const CONDITION_EXAMPLE: &str = "(e.g., 'player == \"Tyrese Maxey\" and season == 2024')";

const HELP: &str = "\nAvailable Commands:
'tables' - See available tables
'insert' - Insert rows into a table
'delete' - Delete rows from a table
'update' - Replace matching rows in a table
'query' - Query data from a table
'join' - Join tables row by row
'create' - Create new table
'exit' - Quit the program";

/// Interactive session over a table store
pub struct Shell<'s, R, W> {
    store: &'s mut CsvTableStore,
    batch_size: BatchSize,
    input: R,
    output: W,
}

impl<'s, R: BufRead, W: Write> Shell<'s, R, W> {
    /// Create a session reading commands from `input`
    pub fn new(store: &'s mut CsvTableStore, batch_size: BatchSize, input: R, output: W) -> Self {
        Self {
            store,
            batch_size,
            input,
            output,
        }
    }

    /// Run until `exit` or end of input
    pub fn run(&mut self) -> CliResult<()> {
        writeln!(self.output, "Welcome to flatdb")?;
        log_event(Event::ShellReady);

        while let Some(line) = self.read_line(COMMAND_PROMPT)? {
            let command = line.trim().to_ascii_lowercase();
            let outcome = match command.as_str() {
                "" => continue,
                "exit" => break,
                "help" => self.help(),
                "tables" => self.tables(),
                "create" => self.create(),
                "insert" => self.insert(),
                "delete" => self.delete(),
                "update" => self.update(),
                "query" => self.query(),
                "join" => self.join(),
                _ => writeln!(self.output, "Invalid Command").map_err(CliError::from),
            };

            if let Err(e) = outcome {
                if e.is_fatal() {
                    return Err(e);
                }
                write_error(&mut self.output, e.code(), &e.to_string())?;
            }
        }

        log_event(Event::ShellExit);
        Ok(())
    }

    fn help(&mut self) -> CliResult<()> {
        writeln!(self.output, "{}", HELP)?;
        Ok(())
    }

    fn tables(&mut self) -> CliResult<()> {
        let names = self.store.table_names();
        write_tables(&mut self.output, &names)
    }

    fn create(&mut self) -> CliResult<()> {
        let name = self.ask("Enter the table name: ")?;
        let columns = self.ask("Enter column headers (comma-separated): ")?;
        let name = name.trim();

        self.store
            .create_table(name, parse_list(&columns).unwrap_or_default())
            .map_err(|e| rejected("create", name, e))?;

        log_event_with_fields(Event::TableCreated, &[("table", name)]);
        writeln!(self.output, "Table '{}' created successfully.", name)?;
        Ok(())
    }

    fn insert(&mut self) -> CliResult<()> {
        let name = self.ask("Enter the table name: ")?;
        let data = self.ask("Enter data for the table (comma-separated): ")?;
        let name = name.trim();

        let inserted = self
            .store
            .insert_rows(name, &data)
            .map_err(|e| rejected("insert", name, e))?;

        let count = inserted.to_string();
        log_event_with_fields(Event::RowsInserted, &[("rows", &count), ("table", name)]);
        writeln!(self.output, "Inserted {} row(s) into '{}'.", inserted, name)?;
        Ok(())
    }

    fn delete(&mut self) -> CliResult<()> {
        let name = self.ask("Enter the table name: ")?;
        let condition = self.ask(&format!("Enter conditions for deleting {}: ", CONDITION_EXAMPLE))?;
        let name = name.trim();

        let removed = self
            .store
            .delete_where(name, &condition)
            .map_err(|e| rejected("delete", name, e))?;

        let count = removed.to_string();
        log_event_with_fields(Event::RowsDeleted, &[("rows", &count), ("table", name)]);
        writeln!(self.output, "Deleted {} row(s) from '{}'.", removed, name)?;
        Ok(())
    }

    fn update(&mut self) -> CliResult<()> {
        let name = self.ask("Enter the table name: ")?;
        let condition = self.ask(&format!("Enter conditions for updating {}: ", CONDITION_EXAMPLE))?;
        let values = self.ask("Enter values to update (comma-separated): ")?;
        let name = name.trim();

        let (removed, inserted) = self
            .store
            .update_where(name, &condition, &values)
            .map_err(|e| rejected("update", name, e))?;

        log_event_with_fields(
            Event::RowsUpdated,
            &[
                ("inserted", &inserted.to_string()),
                ("removed", &removed.to_string()),
                ("table", name),
            ],
        );
        writeln!(
            self.output,
            "Replaced {} row(s) with {} row(s) in '{}'.",
            removed, inserted, name
        )?;
        Ok(())
    }

    fn query(&mut self) -> CliResult<()> {
        let table = self.ask("Enter the table name: ")?;
        let condition = self.ask(&format!(
            "Enter conditions for querying {} or press Enter for all rows: ",
            CONDITION_EXAMPLE
        ))?;
        let columns =
            self.ask("Enter columns to retrieve (comma-separated, or press Enter for all columns): ")?;
        let group_by = self.ask("Enter group by column (or press Enter for no grouping): ")?;
        let aggregations = self.ask("Enter count for agg. (press Enter for no aggregations): ")?;
        let sort_column = self.ask("Enter column to sort by (or press Enter for no sorting): ")?;

        let request = query_request(
            table,
            parse_optional(&condition),
            parse_list(&columns),
            parse_list(&group_by),
            parse_list(&aggregations),
            parse_optional(&sort_column),
        );
        let result = run_query(&*self.store, self.batch_size, &request)?;

        writeln!(self.output, "\nQuery Result:")?;
        write_result(&mut self.output, &result)
    }

    fn join(&mut self) -> CliResult<()> {
        let tables = self.ask("Enter the table names to join (comma-separated): ")?;
        let join_columns = self.ask("Enter the columns to join on (comma-separated): ")?;
        let select =
            self.ask("Enter the columns to select (comma-separated, or press Enter for all columns): ")?;
        let condition = self.ask("Enter conditions for joining (or press Enter for all rows): ")?;

        let spec = join_spec(
            parse_list(&tables).unwrap_or_default(),
            parse_list(&join_columns).unwrap_or_default(),
            parse_list(&select),
            parse_optional(&condition),
        );
        let result = run_join(&*self.store, self.batch_size, &spec)?;

        writeln!(self.output, "\nJoin Result:")?;
        write_result(&mut self.output, &result)
    }

    /// Prompts and reads one line; `None` at end of input
    fn read_line(&mut self, prompt: &str) -> CliResult<Option<String>> {
        write!(self.output, "{}", prompt)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    /// Prompts for a command input; end of input reads as blank
    fn ask(&mut self, prompt: &str) -> CliResult<String> {
        Ok(self.read_line(prompt)?.unwrap_or_default())
    }
}

fn rejected(operation: &str, table: &str, err: crate::store::StoreError) -> CliError {
    log_event_with_fields(
        Event::MutationRejected,
        &[("code", err.code()), ("operation", operation), ("table", table)],
    );
    err.into()
}
