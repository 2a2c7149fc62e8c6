use crate::models::Record;
use anyhow::{Context, Result};
use csv::{ReaderBuilder, WriterBuilder};
use serde_json::{Number, Value};
use std::fs::File;
use std::io::{BufReader, Write};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("unsupported file format: {0} (expected .csv or .json)")]
    UnsupportedFormat(String),

    #[error("expected a JSON array of objects")]
    NotAnArray,

    #[error("row {0} is not a JSON object")]
    NotAnObject(usize),
}

/// Typed value of a CSV cell: empty -> null, finite number -> number, otherwise text.
fn parse_cell(cell: &str) -> Value {
    if cell.is_empty() {
        return Value::Null;
    }
    if let Ok(i) = cell.parse::<i64>() {
        return Value::from(i);
    }
    match cell.parse::<f64>().ok().and_then(Number::from_f64) {
        Some(n) => Value::Number(n),
        None => Value::String(cell.to_string()),
    }
}

/// Load records from a CSV file with a header row.
pub fn load_csv<P: AsRef<Path>>(path: P) -> Result<Vec<Record>> {
    let path = path.as_ref();
    let mut rdr = ReaderBuilder::new()
        .from_path(path)
        .with_context(|| format!("open {}", path.display()))?;
    let headers = rdr.headers()?.clone();
    let mut out = Vec::new();
    for row in rdr.records() {
        let row = row.with_context(|| format!("read {}", path.display()))?;
        let rec: Record = headers
            .iter()
            .zip(row.iter())
            .map(|(h, cell)| (h.to_string(), parse_cell(cell)))
            .collect();
        out.push(rec);
    }
    Ok(out)
}

/// Load records from a JSON array of objects.
pub fn load_json<P: AsRef<Path>>(path: P) -> Result<Vec<Record>> {
    let path = path.as_ref();
    let f = File::open(path).with_context(|| format!("open {}", path.display()))?;
    let v: Value = serde_json::from_reader(BufReader::new(f))
        .with_context(|| format!("parse {}", path.display()))?;
    let Value::Array(rows) = v else {
        return Err(StorageError::NotAnArray.into());
    };
    rows.into_iter()
        .enumerate()
        .map(|(i, row)| -> Result<Record> {
            match row {
                Value::Object(m) => Ok(m),
                _ => Err(StorageError::NotAnObject(i).into()),
            }
        })
        .collect()
}

/// Load records, choosing the format from the file extension.
pub fn load_records<P: AsRef<Path>>(path: P) -> Result<Vec<Record>> {
    let path = path.as_ref();
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();
    match ext.as_str() {
        "csv" => load_csv(path),
        "json" => load_json(path),
        other => Err(StorageError::UnsupportedFormat(other.to_string()).into()),
    }
}

/// Prefix text that a spreadsheet would evaluate as a formula.
fn defuse(s: &str) -> String {
    match s.chars().next() {
        Some('=' | '+' | '-' | '@' | '\t' | '\r') => format!("'{s}"),
        _ => s.to_string(),
    }
}

fn cell_text(v: Option<&Value>) -> String {
    match v {
        None | Some(Value::Null) => String::new(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::String(s)) => defuse(s),
        Some(other) => defuse(&other.to_string()),
    }
}

/// Save records as CSV with header. Columns follow first-seen field order.
pub fn save_csv<P: AsRef<Path>>(records: &[Record], path: P) -> Result<()> {
    let mut columns: Vec<&str> = Vec::new();
    for r in records {
        for k in r.keys() {
            if !columns.contains(&k.as_str()) {
                columns.push(k.as_str());
            }
        }
    }

    let mut wtr = WriterBuilder::new().from_path(path)?;
    wtr.write_record(&columns)?;
    for r in records {
        wtr.write_record(columns.iter().map(|c| cell_text(r.get(*c))))?;
    }
    wtr.flush()?;
    Ok(())
}

/// Save records as pretty JSON array.
pub fn save_json<P: AsRef<Path>>(records: &[Record], path: P) -> Result<()> {
    let mut f = File::create(path)?;
    let s = serde_json::to_string_pretty(records)?;
    f.write_all(s.as_bytes())?;
    Ok(())
}
