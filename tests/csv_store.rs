//! Directory Store Tests
//!
//! Tests for the file-backed table store:
//! - Tables load from `*.csv` files with per-column type inference
//! - Quoted fields and custom delimiters survive a save/load cycle
//! - Mutations persist and a failed mutation changes nothing
//! - The query engine runs unchanged against the loaded store

use std::fs;

use flatdb::executor::{AggregationSpec, BatchSize, QueryExecutor, QueryRequest};
use flatdb::store::{CsvTableStore, StoreError, TableStore};
use flatdb::table::Value;
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn setup_dir() -> TempDir {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join("players.csv"),
        "player,team,season,pts,ts_pct\n\
         \"Maxey, Tyrese\",PHI,2024,25,0.58\n\
         Embiid,PHI,2024,34,\n\
         Brown,BOS,2024,23,0.57\n",
    )
    .unwrap();
    fs::write(tmp.path().join("notes.txt"), "not a table").unwrap();
    fs::write(tmp.path().join("players_temp.csv"), "leftover,from\n1,2\n").unwrap();
    tmp
}

// =============================================================================
// Load Tests
// =============================================================================

/// Only `*.csv` files load, and interrupted-save leftovers are skipped.
#[test]
fn test_open_skips_other_files() {
    let tmp = setup_dir();
    let store = CsvTableStore::open(tmp.path(), b',').unwrap();
    assert_eq!(store.table_names(), vec!["players"]);
}

/// Cells take their column's inferred type; empty cells are null.
#[test]
fn test_column_types_inferred() {
    let tmp = setup_dir();
    let store = CsvTableStore::open(tmp.path(), b',').unwrap();
    let table = store.get_table("players").unwrap();

    assert_eq!(
        table.rows()[0].values(),
        &[
            Value::from("Maxey, Tyrese"),
            Value::from("PHI"),
            Value::Int(2024),
            Value::Int(25),
            Value::Float(0.58),
        ]
    );
    assert_eq!(table.rows()[1].get(4), Some(&Value::Null));
}

/// A row with the wrong number of fields is a load error naming the line.
#[test]
fn test_ragged_file_rejected() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("bad.csv"), "a,b\n1,2\n3\n").unwrap();

    let err = CsvTableStore::open(tmp.path(), b',').unwrap_err();
    assert!(matches!(err, StoreError::Malformed { line: 3, .. }), "{:?}", err);
}

// =============================================================================
// Persistence Tests
// =============================================================================

/// Quoted fields are written back quoted and reload identically.
#[test]
fn test_save_reload_roundtrip() {
    let tmp = setup_dir();
    let mut store = CsvTableStore::open(tmp.path(), b',').unwrap();
    store
        .insert_rows("players", "\"Oubre \"\"Kelly\"\"\",PHI,2024,15,0.55")
        .unwrap();

    let reopened = CsvTableStore::open(tmp.path(), b',').unwrap();
    assert_eq!(reopened.get_table("players"), store.get_table("players"));
    assert_eq!(
        reopened.get_table("players").unwrap().rows()[3].get(0),
        Some(&Value::from("Oubre \"Kelly\""))
    );
}

/// A pipe-delimited directory loads and saves with pipes.
#[test]
fn test_custom_delimiter() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("teams.csv"), "abbr|city\nPHI|Philadelphia\n").unwrap();

    let mut store = CsvTableStore::open(tmp.path(), b'|').unwrap();
    store.insert_rows("teams", "BOS|Boston, MA").unwrap();

    assert_eq!(
        fs::read_to_string(tmp.path().join("teams.csv")).unwrap(),
        "abbr|city\nPHI|Philadelphia\nBOS|Boston, MA\n"
    );
}

/// A failed update leaves the file and the table untouched.
#[test]
fn test_failed_update_changes_nothing() {
    let tmp = setup_dir();
    let path = tmp.path().join("players.csv");
    let before = fs::read_to_string(&path).unwrap();
    let mut store = CsvTableStore::open(tmp.path(), b',').unwrap();
    let table_before = store.get_table("players").cloned();

    let err = store
        .update_where("players", "team == 'PHI'", "Embiid,PHI,2024")
        .unwrap_err();
    assert_eq!(err.code(), "FLAT_STORE_ARITY_MISMATCH");

    let err = store
        .update_where("players", "rebounds > 5", "Embiid,PHI,2024,35,0.6")
        .unwrap_err();
    assert_eq!(err.code(), "FLAT_UNKNOWN_COLUMN");

    assert_eq!(store.get_table("players").cloned(), table_before);
    assert_eq!(fs::read_to_string(&path).unwrap(), before);
}

/// Query answers after a mutation match the answers after a reload.
#[test]
fn test_query_stable_across_reload() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("p.csv"), "name,season
A,2024
B,2023
").unwrap();
    let mut store = CsvTableStore::open(tmp.path(), b',').unwrap();
    store.insert_rows("p", "C,unknown").unwrap();

    let request = QueryRequest::new("p").condition("season > 999");
    let run = |store: &CsvTableStore| {
        QueryExecutor::new(store, BatchSize::default())
            .execute(&request)
            .unwrap()
            .rows()
            .to_vec()
    };

    let before = run(&store);
    let reopened = CsvTableStore::open(tmp.path(), b',').unwrap();
    assert_eq!(run(&reopened), before);
    assert_eq!(before.len(), 1);
}

// =============================================================================
// Query Integration Tests
// =============================================================================

/// The executor reads the file-backed store through the same trait.
#[test]
fn test_query_over_loaded_tables() {
    let tmp = setup_dir();
    let mut store = CsvTableStore::open(tmp.path(), b',').unwrap();
    store.delete_where("players", "team == 'BOS'").unwrap();

    let executor = QueryExecutor::new(&store, BatchSize::new(1).unwrap());
    let result = executor
        .execute(
            &QueryRequest::new("players")
                .condition("season == 2024")
                .aggregation(AggregationSpec::count_by("team")),
        )
        .unwrap();

    // batch size 1: one group row per input row
    let teams: Vec<_> = result.rows().iter().map(|r| r.values().to_vec()).collect();
    assert_eq!(
        teams,
        vec![
            vec![Value::from("PHI"), Value::Int(1)],
            vec![Value::from("PHI"), Value::Int(1)],
        ]
    );
}
