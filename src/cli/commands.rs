//! CLI command implementations
//!
//! Boot sequence:
//! 1. Configuration load (absent file means defaults; invalid file is fatal)
//! 2. Command-line overrides
//! 3. Log threshold
//! 4. Table load from the data directory
//! 5. Command dispatch
//!
//! Query and join execution is shared by the one-shot commands and the
//! interactive loop.

use std::fs;
use std::io::{self, Write};

use crate::executor::{
    AggregationSpec, BatchSize, JoinSpec, QueryExecutor, QueryRequest, ResultSet,
};
use crate::observability::{log_event, log_event_with_fields, Event, Logger, ObservationScope};
use crate::store::{CsvTableStore, TableStore};

use super::args::{Cli, Command};
use super::config::Config;
use super::errors::{CliError, CliResult};
use super::io::{clean_list, write_result, write_tables};
use super::shell::Shell;

/// Main CLI entry point
///
/// Parses arguments, boots, and dispatches to the selected command.
/// This is the only function that main.rs should call.
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    log_event(Event::BootStart);

    let config = boot_config(&cli)?;
    let mut store = open_store(&config)?;
    let batch_size = config.batch()?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    run_command(cli.effective_command(), &mut store, batch_size, &mut out)
}

/// Run one command against an opened store
pub fn run_command<W: Write>(
    cmd: Command,
    store: &mut CsvTableStore,
    batch_size: BatchSize,
    out: &mut W,
) -> CliResult<()> {
    match cmd {
        Command::Shell => {
            let stdin = io::stdin();
            Shell::new(store, batch_size, stdin.lock(), out).run()
        }
        Command::Query {
            table,
            condition,
            columns,
            group_by,
            agg,
            sort_by,
        } => {
            let request = query_request(
                table,
                condition,
                clean_list(columns),
                clean_list(group_by),
                clean_list(agg),
                sort_by,
            );
            let result = run_query(&*store, batch_size, &request)?;
            write_result(out, &result)
        }
        Command::Join {
            tables,
            on,
            select,
            condition,
        } => {
            let spec = join_spec(
                clean_list(tables).unwrap_or_default(),
                clean_list(on).unwrap_or_default(),
                clean_list(select),
                condition,
            );
            let result = run_join(&*store, batch_size, &spec)?;
            write_result(out, &result)
        }
        Command::Tables => {
            let names = store.table_names();
            write_tables(out, &names)
        }
    }
}

/// Load, override, and validate configuration, then set the log threshold
pub fn boot_config(cli: &Cli) -> CliResult<Config> {
    let config = Config::load(&cli.config)
        .and_then(|c| c.with_overrides(cli.data_dir.clone(), cli.batch_size))
        .map_err(|e| {
            log_event_with_fields(Event::ConfigInvalid, &[("reason", &e.to_string())]);
            e
        })?;

    Logger::set_min_severity(config.severity()?);

    let batch_size = config.batch_size.to_string();
    log_event_with_fields(
        Event::ConfigLoaded,
        &[
            ("batch_size", &batch_size),
            ("data_dir", &config.data_dir),
            ("delimiter", &config.delimiter),
        ],
    );
    Ok(config)
}

/// Open the data directory, creating it if it does not exist
pub fn open_store(config: &Config) -> CliResult<CsvTableStore> {
    let dir = config.data_path();
    if !dir.exists() {
        fs::create_dir_all(dir).map_err(|e| {
            CliError::config_error(format!("Failed to create directory {}: {}", dir.display(), e))
        })?;
    }

    let store = CsvTableStore::open(dir, config.delimiter_byte()?)?;
    log_event_with_fields(
        Event::TablesLoaded,
        &[
            ("data_dir", &config.data_dir),
            ("tables", &store.len().to_string()),
        ],
    );
    Ok(store)
}

/// Assemble a query from user inputs.
///
/// An aggregation is attached when either a grouping column or an
/// aggregation name was given; the engine decides whether the shape is
/// supported.
pub fn query_request(
    table: String,
    condition: Option<String>,
    columns: Option<Vec<String>>,
    group_by: Option<Vec<String>>,
    aggregations: Option<Vec<String>>,
    sort_column: Option<String>,
) -> QueryRequest {
    let aggregation = match (group_by, aggregations) {
        (None, None) => None,
        (group_by, aggregations) => Some(AggregationSpec {
            group_by: group_by.unwrap_or_default(),
            aggregations: aggregations.unwrap_or_default(),
        }),
    };

    QueryRequest {
        table: table.trim().to_string(),
        condition: condition.filter(|c| !c.trim().is_empty()),
        columns,
        aggregation,
        sort_column: sort_column
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty()),
    }
}

/// Assemble a join from user inputs
pub fn join_spec(
    tables: Vec<String>,
    join_columns: Vec<String>,
    select: Option<Vec<String>>,
    condition: Option<String>,
) -> JoinSpec {
    JoinSpec {
        tables,
        join_columns,
        select,
        condition: condition.filter(|c| !c.trim().is_empty()),
    }
}

/// Execute a query inside an observation scope
pub fn run_query<S: TableStore + ?Sized>(
    store: &S,
    batch_size: BatchSize,
    request: &QueryRequest,
) -> CliResult<ResultSet> {
    let scope = ObservationScope::with_fields("QUERY", &[("table", &request.table)]);

    match QueryExecutor::new(store, batch_size).execute(request) {
        Ok(result) => {
            scope.complete_with_fields(&[
                ("batches", &result.batch_count().to_string()),
                ("rows", &result.len().to_string()),
            ]);
            Ok(result)
        }
        Err(e) => {
            scope.fail(e.code(), &e.to_string());
            log_event_with_fields(Event::QueryRejected, &[("code", e.code())]);
            Err(e.into())
        }
    }
}

/// Execute a join inside an observation scope
pub fn run_join<S: TableStore + ?Sized>(
    store: &S,
    batch_size: BatchSize,
    spec: &JoinSpec,
) -> CliResult<ResultSet> {
    let tables = spec.tables.join(",");
    let scope = ObservationScope::with_fields("JOIN", &[("tables", &tables)]);

    match QueryExecutor::new(store, batch_size).join(spec) {
        Ok(result) => {
            scope.complete_with_fields(&[
                ("batches", &result.batch_count().to_string()),
                ("rows", &result.len().to_string()),
            ]);
            Ok(result)
        }
        Err(e) => {
            scope.fail(e.code(), &e.to_string());
            log_event_with_fields(Event::QueryRejected, &[("code", e.code())]);
            Err(e.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup() -> (TempDir, CsvTableStore) {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("players.csv"),
            "player,team,pts\nA,PHI,10\nB,BOS,30\nC,PHI,20\n",
        )
        .unwrap();
        fs::write(tmp.path().join("teams.csv"), "team,city\nPHI,Philadelphia\n").unwrap();
        let store = CsvTableStore::open(tmp.path(), b',').unwrap();
        (tmp, store)
    }

    fn output_of(cmd: Command, store: &mut CsvTableStore, batch: usize) -> CliResult<String> {
        let mut out = Vec::new();
        run_command(cmd, store, BatchSize::new(batch).unwrap(), &mut out)?;
        Ok(String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_query_request_aggregation_shape() {
        let request = query_request(
            " players ".into(),
            Some("  ".into()),
            None,
            Some(vec!["team".into()]),
            None,
            Some(" ".into()),
        );
        assert_eq!(request.table, "players");
        assert_eq!(request.condition, None);
        assert_eq!(request.sort_column, None);
        assert_eq!(
            request.aggregation,
            Some(AggregationSpec {
                group_by: vec!["team".into()],
                aggregations: vec![],
            })
        );

        let plain = query_request("players".into(), None, None, None, None, None);
        assert_eq!(plain.aggregation, None);
    }

    #[test]
    fn test_one_shot_query() {
        let (_tmp, mut store) = setup();
        let out = output_of(
            Command::Query {
                table: "players".into(),
                condition: Some("pts > 15".into()),
                columns: vec!["player".into(), " pts".into()],
                group_by: vec![],
                agg: vec![],
                sort_by: Some("pts".into()),
            },
            &mut store,
            10,
        )
        .unwrap();

        assert_eq!(
            out.lines().collect::<Vec<_>>(),
            vec![
                r#"{"batch":1,"batches":1,"rows":2}"#,
                r#"{"player":"C","pts":20}"#,
                r#"{"player":"B","pts":30}"#,
            ]
        );
    }

    #[test]
    fn test_one_shot_group_count() {
        let (_tmp, mut store) = setup();
        let out = output_of(
            Command::Query {
                table: "players".into(),
                condition: None,
                columns: vec![],
                group_by: vec!["team".into()],
                agg: vec!["count".into()],
                sort_by: None,
            },
            &mut store,
            1000,
        )
        .unwrap();

        assert!(out.contains(r#"{"team":"PHI","count":2}"#));
        assert!(out.contains(r#"{"team":"BOS","count":1}"#));
    }

    #[test]
    fn test_one_shot_unsupported_aggregation() {
        let (_tmp, mut store) = setup();
        let err = output_of(
            Command::Query {
                table: "players".into(),
                condition: None,
                columns: vec![],
                group_by: vec!["team".into()],
                agg: vec!["sum".into()],
                sort_by: None,
            },
            &mut store,
            1000,
        )
        .unwrap_err();
        assert_eq!(err.code(), "FLAT_UNSUPPORTED_AGGREGATION");
    }

    #[test]
    fn test_one_shot_join_and_tables() {
        let (_tmp, mut store) = setup();
        let out = output_of(
            Command::Join {
                tables: vec!["players".into(), "teams".into()],
                on: vec!["team".into()],
                select: vec!["player".into(), "city".into()],
                condition: None,
            },
            &mut store,
            1000,
        )
        .unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], r#"{"batch":1,"batches":1,"rows":3}"#);
        assert_eq!(lines[1], r#"{"player":"A","city":"Philadelphia"}"#);
        assert_eq!(lines[2], r#"{"player":"B","city":null}"#);

        let out = output_of(Command::Tables, &mut store, 1000).unwrap();
        assert!(out.contains("players\nteams\n"));
    }
}
