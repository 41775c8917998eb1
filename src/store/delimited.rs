//! Delimited text reader and writer
//!
//! One record per line. Fields may be wrapped in double quotes; inside a
//! quoted field `""` is a literal quote and the delimiter loses its
//! meaning. Quoted fields cannot span lines.

use std::fs;
use std::path::Path;

use crate::table::{Row, Table};

use super::errors::{StoreError, StoreResult};
use super::inference::{coerce, infer_column};

/// Splits one line into fields
pub fn split_record(line: &str, delimiter: u8) -> Result<Vec<String>, String> {
    let delimiter = delimiter as char;
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut chars = line.chars().peekable();

    loop {
        if chars.peek() == Some(&'"') {
            chars.next();
            loop {
                match chars.next() {
                    Some('"') if chars.peek() == Some(&'"') => {
                        chars.next();
                        field.push('"');
                    }
                    Some('"') => break,
                    Some(c) => field.push(c),
                    None => return Err("unterminated quoted field".to_string()),
                }
            }
            match chars.next() {
                None => {
                    fields.push(field);
                    return Ok(fields);
                }
                Some(c) if c == delimiter => {
                    fields.push(std::mem::take(&mut field));
                }
                Some(c) => {
                    return Err(format!("unexpected '{}' after closing quote", c));
                }
            }
        } else {
            loop {
                match chars.next() {
                    None => {
                        fields.push(field);
                        return Ok(fields);
                    }
                    Some(c) if c == delimiter => {
                        fields.push(std::mem::take(&mut field));
                        break;
                    }
                    Some(c) => field.push(c),
                }
            }
        }
    }
}

/// Joins fields into one line, quoting where needed
pub fn format_record<I, S>(fields: I, delimiter: u8) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let delimiter = delimiter as char;
    let mut line = String::new();

    for (i, field) in fields.into_iter().enumerate() {
        if i > 0 {
            line.push(delimiter);
        }
        let field = field.as_ref();
        let needs_quotes = field.contains(delimiter)
            || field.contains('"')
            || field.contains('\n')
            || field.contains('\r');
        if needs_quotes {
            line.push('"');
            line.push_str(&field.replace('"', "\"\""));
            line.push('"');
        } else {
            line.push_str(field);
        }
    }

    line
}

/// Parses delimited text with a header line into a table.
///
/// Blank lines are skipped. Column types are inferred from the cells.
pub fn parse_table(text: &str, delimiter: u8, path: &Path) -> StoreResult<Table> {
    let malformed = |line: usize, reason: String| StoreError::Malformed {
        path: path.to_path_buf(),
        line,
        reason,
    };

    let mut lines = text
        .lines()
        .enumerate()
        .map(|(i, l)| (i + 1, l))
        .filter(|(_, l)| !l.trim().is_empty());

    let (header_line, header) = lines
        .next()
        .ok_or_else(|| malformed(1, "no header line".to_string()))?;
    let columns: Vec<String> = split_record(header, delimiter)
        .map_err(|e| malformed(header_line, e))?
        .into_iter()
        .map(|c| c.trim().to_string())
        .collect();

    let mut records: Vec<Vec<String>> = Vec::new();
    for (number, line) in lines {
        let fields = split_record(line, delimiter).map_err(|e| malformed(number, e))?;
        if fields.len() != columns.len() {
            return Err(malformed(
                number,
                format!("expected {} fields, found {}", columns.len(), fields.len()),
            ));
        }
        records.push(fields);
    }

    let types: Vec<_> = (0..columns.len())
        .map(|c| infer_column(records.iter().map(|r| r[c].as_str())))
        .collect();

    let mut table = Table::new(columns)?;
    for record in records {
        let values = record
            .iter()
            .zip(&types)
            .map(|(cell, ty)| coerce(cell, *ty))
            .collect();
        table.push_row(Row::new(values))?;
    }

    Ok(table)
}

/// Reads a delimited file into a table
pub fn read_table_file(path: &Path, delimiter: u8) -> StoreResult<Table> {
    let text = fs::read_to_string(path).map_err(|e| StoreError::io(path, e))?;
    parse_table(&text, delimiter, path)
}

/// Renders a table as delimited text with a header line
pub fn render_table(table: &Table, delimiter: u8) -> String {
    let mut out = format_record(table.columns(), delimiter);
    out.push('\n');
    for row in table.rows() {
        out.push_str(&format_record(
            row.values().iter().map(|v| v.to_string()),
            delimiter,
        ));
        out.push('\n');
    }
    out
}
