//! Column type inference
//!
//! A column is integer when every non-blank cell parses as an integer,
//! float when every non-blank cell parses as a number, else string.
//! A column with no non-blank cells has no type yet and each cell is
//! parsed on its own.

use crate::table::{Table, Value};

/// Inferred column type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    /// No non-blank values seen
    Unknown,
    Int,
    Float,
    Str,
}

/// Infers a column type from raw cells
pub fn infer_column<'a>(cells: impl IntoIterator<Item = &'a str>) -> ColumnType {
    let mut ty = ColumnType::Unknown;
    for cell in cells {
        let cell_ty = match Value::parse_cell(cell) {
            Value::Null => continue,
            Value::Int(_) => ColumnType::Int,
            Value::Float(_) => ColumnType::Float,
            Value::Str(_) => return ColumnType::Str,
        };
        ty = widen(ty, cell_ty);
    }
    ty
}

/// Types of a loaded table's columns, derived from its values
pub fn column_types(table: &Table) -> Vec<ColumnType> {
    (0..table.columns().len())
        .map(|c| {
            table
                .rows()
                .iter()
                .filter_map(|r| r.get(c))
                .fold(ColumnType::Unknown, |ty, v| match v {
                    Value::Null => ty,
                    Value::Int(_) => widen(ty, ColumnType::Int),
                    Value::Float(_) => widen(ty, ColumnType::Float),
                    Value::Str(_) => ColumnType::Str,
                })
        })
        .collect()
}

/// Converts a raw cell to a value of the column's type where it fits
pub fn coerce(cell: &str, ty: ColumnType) -> Value {
    let parsed = Value::parse_cell(cell);
    match (ty, parsed) {
        (_, Value::Null) => Value::Null,
        (ColumnType::Str, _) => Value::Str(cell.to_string()),
        (ColumnType::Float, Value::Int(i)) => Value::Float(i as f64),
        (_, v) => v,
    }
}

fn widen(current: ColumnType, next: ColumnType) -> ColumnType {
    use ColumnType::*;
    match (current, next) {
        (Str, _) | (_, Str) => Str,
        (Float, _) | (_, Float) => Float,
        (Int, _) | (_, Int) => Int,
        (Unknown, Unknown) => Unknown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_infer_column() {
        assert_eq!(infer_column(["1", "2", ""]), ColumnType::Int);
        assert_eq!(infer_column(["1", "2.5"]), ColumnType::Float);
        assert_eq!(infer_column(["1", "x"]), ColumnType::Str);
        assert_eq!(infer_column(["", " "]), ColumnType::Unknown);
    }

    #[test]
    fn test_coerce() {
        assert_eq!(coerce("3", ColumnType::Float), Value::Float(3.0));
        assert_eq!(coerce("3", ColumnType::Str), Value::from("3"));
        assert_eq!(coerce("3", ColumnType::Int), Value::Int(3));
        assert_eq!(coerce("", ColumnType::Str), Value::Null);
        assert_eq!(coerce("x", ColumnType::Int), Value::from("x"));
        assert_eq!(coerce("7", ColumnType::Unknown), Value::Int(7));
    }

    #[test]
    fn test_column_types_from_values() {
        let table = Table::with_rows(
            ["a", "b", "c", "d"],
            vec![
                vec![Value::Int(1), Value::Int(1), Value::from("x"), Value::Null],
                vec![Value::Int(2), Value::Float(0.5), Value::Int(3), Value::Null],
            ],
        )
        .unwrap();
        assert_eq!(
            column_types(&table),
            vec![ColumnType::Int, ColumnType::Float, ColumnType::Str, ColumnType::Unknown]
        );
    }
}
