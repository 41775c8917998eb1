//! Positional Join Tests
//!
//! Rows are combined by position, batch by batch:
//! - Duplicate column names collapse to the first table's values
//! - Shorter tables are padded with nulls
//! - Selection and condition apply to the combined rows
//! - Missing tables and join columns are explicit errors

use flatdb::executor::{BatchSize, JoinSpec, QueryError, QueryExecutor};
use flatdb::store::MemoryTableStore;
use flatdb::table::{Table, Value};
use serde_json::json;

// =============================================================================
// Helper Functions
// =============================================================================

fn setup_store() -> MemoryTableStore {
    let mut store = MemoryTableStore::new();
    store.insert(
        "players",
        Table::with_rows(
            ["id", "player"],
            vec![
                vec![Value::Int(1), Value::from("Maxey")],
                vec![Value::Int(2), Value::from("Embiid")],
                vec![Value::Int(3), Value::from("Oubre")],
            ],
        )
        .unwrap(),
    );
    store.insert(
        "stats",
        Table::with_rows(
            ["id", "pts"],
            vec![vec![Value::Int(9), Value::Int(25)], vec![Value::Int(8), Value::Int(34)]],
        )
        .unwrap(),
    );
    store
}

fn run(store: &MemoryTableStore, size: usize, spec: &JoinSpec) -> Vec<serde_json::Value> {
    let result = QueryExecutor::new(store, BatchSize::new(size).unwrap())
        .join(spec)
        .unwrap();
    result
        .rows()
        .iter()
        .map(|r| serde_json::Value::Object(result.record(r)))
        .collect()
}

// =============================================================================
// Combination Tests
// =============================================================================

/// Two one-row tables sharing their only column give one row, one column.
#[test]
fn test_single_shared_column() {
    let mut store = MemoryTableStore::new();
    store.insert("x", Table::with_rows(["id"], vec![vec![Value::Int(1)]]).unwrap());
    store.insert("y", Table::with_rows(["id"], vec![vec![Value::Int(1)]]).unwrap());

    let rows = run(&store, 10, &JoinSpec::new(["x", "y"], ["id"]));
    assert_eq!(rows, vec![json!({"id": 1})]);
}

/// Values are matched by position, not by the join column.
#[test]
fn test_rows_pair_by_position_with_null_padding() {
    let store = setup_store();
    let rows = run(&store, 2, &JoinSpec::new(["players", "stats"], ["id"]));

    assert_eq!(
        rows,
        vec![
            json!({"id": 1, "player": "Maxey", "pts": 25}),
            json!({"id": 2, "player": "Embiid", "pts": 34}),
            json!({"id": 3, "player": "Oubre", "pts": null}),
        ]
    );
}

/// Output does not depend on the batch size.
#[test]
fn test_batch_size_does_not_change_output() {
    let store = setup_store();
    let spec = JoinSpec::new(["stats", "players"], ["id"]);
    let reference = run(&store, 1000, &spec);
    for size in [1, 2, 3] {
        assert_eq!(run(&store, size, &spec), reference);
    }
    // stats listed first, so its ids win
    assert_eq!(reference[0]["id"], json!(9));
    assert_eq!(reference[2], json!({"id": null, "pts": null, "player": "Oubre"}));
}

/// Condition then selection on the combined rows.
#[test]
fn test_condition_and_selection() {
    let store = setup_store();
    let spec = JoinSpec::new(["players", "stats"], ["id"])
        .condition("pts > 30 or pts != 0 and player == 'Oubre'")
        .select(["player"]);

    assert_eq!(
        run(&store, 2, &spec),
        vec![json!({"player": "Embiid"}), json!({"player": "Oubre"})]
    );
}

// =============================================================================
// Error Tests
// =============================================================================

#[test]
fn test_join_errors() {
    let store = setup_store();
    let executor = QueryExecutor::new(&store, BatchSize::default());

    let err = executor
        .join(&JoinSpec::new(["players", "teams"], ["id"]))
        .unwrap_err();
    assert_eq!(err, QueryError::TableNotFound("teams".into()));

    let err = executor
        .join(&JoinSpec::new(["players", "stats"], ["player"]))
        .unwrap_err();
    assert_eq!(
        err,
        QueryError::JoinColumnMissing {
            table: "stats".into(),
            column: "player".into(),
        }
    );

    let err = executor.join(&JoinSpec::new(["players"], ["id"])).unwrap_err();
    assert_eq!(err.code(), "FLAT_INVALID_JOIN");

    let err = executor
        .join(&JoinSpec::new(["players", "stats"], ["id"]).select(["rebounds"]))
        .unwrap_err();
    assert_eq!(err.code(), "FLAT_UNKNOWN_COLUMN");
}
