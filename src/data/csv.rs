// CSV import into record tables

use std::path::Path;

use tracing::debug;

use super::{RecordTable, Value};
use crate::error::AppError;

/// Read and parse a CSV file. I/O failures surface as [`AppError::Io`],
/// parse failures as [`AppError::DataFormat`].
pub fn read_path(path: &Path) -> Result<RecordTable, AppError> {
    let bytes = std::fs::read(path)?;
    let table = parse(&bytes)?;
    debug!(path = %path.display(), rows = table.len(), columns = table.columns().len(), "csv loaded");
    Ok(table)
}

/// Parse CSV bytes: header row first, one record per line, field types
/// inferred per cell. Every record must have exactly as many fields as the
/// header. Blank and repeated header names are renamed, never rejected.
pub fn parse(bytes: &[u8]) -> Result<RecordTable, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(false)
        .trim(csv::Trim::All)
        .from_reader(bytes);

    let headers = reader
        .headers()
        .map_err(|e| AppError::DataFormat(format!("unreadable header row: {e}")))?
        .clone();

    if headers.is_empty() {
        return Err(AppError::DataFormat("missing header row".into()));
    }

    let mut table = RecordTable::new(column_names(headers.iter()));
    for result in reader.records() {
        let record = result.map_err(|e| AppError::DataFormat(e.to_string()))?;
        table.push_row(record.iter().map(Value::parse).collect())?;
    }
    Ok(table)
}

/// A blank header at position `i` becomes `Unnamed: {i}`. A repeated name
/// gets the first free `.1`, `.2`, ... suffix.
fn column_names<'a>(headers: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut columns: Vec<String> = Vec::new();
    for (i, h) in headers.enumerate() {
        let base = if h.is_empty() { format!("Unnamed: {i}") } else { h.to_string() };
        let mut name = base.clone();
        let mut n = 1;
        while columns.contains(&name) {
            name = format!("{base}.{n}");
            n += 1;
        }
        columns.push(name);
    }
    columns
}
