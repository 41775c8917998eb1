//! Text and JSON output for the CLI
//!
//! - Result rows: one JSON object per line, column order preserved
//! - Each batch is preceded by a header line `{"batch":i,"batches":n,"rows":k}`
//! - Errors: `CODE: message`

use std::io::Write;

use serde_json::json;

use crate::executor::ResultSet;

use super::errors::CliResult;

/// Splits a comma-separated user list; blank items are dropped and an
/// all-blank list is absent.
pub fn parse_list(input: &str) -> Option<Vec<String>> {
    clean_list(input.split(','))
}

/// Trims list items from any source; an empty result is absent
pub fn clean_list<I, S>(items: I) -> Option<Vec<String>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let items: Vec<String> = items
        .into_iter()
        .map(|s| s.as_ref().trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();
    (!items.is_empty()).then_some(items)
}

/// Trims a single user value; blank is absent
pub fn parse_optional(input: &str) -> Option<String> {
    let trimmed = input.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Write a result set batch by batch
pub fn write_result<W: Write>(out: &mut W, result: &ResultSet) -> CliResult<()> {
    let batches = result.batch_count();
    if batches == 0 {
        serde_json::to_writer(&mut *out, &json!({"batch": 0, "batches": 0, "rows": 0}))?;
        writeln!(out)?;
    }

    for (i, batch) in result.batches().enumerate() {
        let header = json!({"batch": i + 1, "batches": batches, "rows": batch.len()});
        serde_json::to_writer(&mut *out, &header)?;
        writeln!(out)?;

        for row in batch {
            serde_json::to_writer(&mut *out, &result.record(row))?;
            writeln!(out)?;
        }
    }

    out.flush()?;
    Ok(())
}

/// Write an error as `CODE: message`
pub fn write_error<W: Write>(out: &mut W, code: &str, message: &str) -> CliResult<()> {
    writeln!(out, "{}: {}", code, message)?;
    out.flush()?;
    Ok(())
}

/// Write table names, one per line
pub fn write_tables<W: Write>(out: &mut W, names: &[&str]) -> CliResult<()> {
    writeln!(out, "\nAvailable Tables:")?;
    for name in names {
        writeln!(out, "{}", name)?;
    }
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::BatchSize;
    use crate::table::{Table, Value};

    #[test]
    fn test_parse_list() {
        assert_eq!(
            parse_list(" player , pts,"),
            Some(vec!["player".to_string(), "pts".to_string()])
        );
        assert_eq!(parse_list(""), None);
        assert_eq!(parse_list(" , "), None);
    }

    #[test]
    fn test_parse_optional() {
        assert_eq!(parse_optional("  pts "), Some("pts".to_string()));
        assert_eq!(parse_optional("   "), None);
    }

    #[test]
    fn test_write_result_batches() {
        let table = Table::with_rows(
            ["player", "pts"],
            vec![
                vec![Value::from("A"), Value::Int(10)],
                vec![Value::from("B"), Value::Int(30)],
                vec![Value::from("C"), Value::Null],
            ],
        )
        .unwrap();
        let result = ResultSet::new(table, BatchSize::new(2).unwrap());

        let mut out = Vec::new();
        write_result(&mut out, &result).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(
            lines,
            vec![
                r#"{"batch":1,"batches":2,"rows":2}"#,
                r#"{"player":"A","pts":10}"#,
                r#"{"player":"B","pts":30}"#,
                r#"{"batch":2,"batches":2,"rows":1}"#,
                r#"{"player":"C","pts":null}"#,
            ]
        );
    }

    #[test]
    fn test_write_empty_result() {
        let result = ResultSet::new(Table::new(["a"]).unwrap(), BatchSize::default());
        let mut out = Vec::new();
        write_result(&mut out, &result).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "{\"batch\":0,\"batches\":0,\"rows\":0}\n"
        );
    }

    #[test]
    fn test_write_error() {
        let mut out = Vec::new();
        write_error(&mut out, "FLAT_UNKNOWN_COLUMN", "Unknown column 'x'").unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "FLAT_UNKNOWN_COLUMN: Unknown column 'x'\n"
        );
    }
}
