//! Record tables: the in-memory shape every pipeline stage works on.
//!
//! A [`RecordTable`] is column-ordered and row-ordered. Rows are stored as
//! value vectors aligned with the column list, so the column set is the same
//! for every row by construction. Row order is the source order and is
//! significant: prompt excerpts and previews take the *first* N rows.

pub mod catalog;
pub mod csv;

use std::fmt;

use crate::error::AppError;

/// A single scalar cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i64),
    Float(f64),
    Text(String),
    /// Empty source field.
    Missing,
}

impl Value {
    /// Infer the narrowest type for a raw CSV field.
    pub fn parse(raw: &str) -> Self {
        let s = raw.trim();
        if s.is_empty() {
            return Value::Missing;
        }
        if let Ok(i) = s.parse::<i64>() {
            return Value::Int(i);
        }
        if let Ok(f) = s.parse::<f64>() {
            return Value::Float(f);
        }
        Value::Text(s.to_string())
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(x) if x.is_finite() && x.fract() == 0.0 => write!(f, "{x:.1}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Text(s) => f.write_str(s),
            Value::Missing => f.write_str("NaN"),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

/// Ordered table of records with a fixed column set.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RecordTable {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl RecordTable {
    pub fn new(columns: Vec<String>) -> Self {
        Self { columns, rows: Vec::new() }
    }

    /// Append a row. The row must have exactly one value per column.
    pub fn push_row(&mut self, row: Vec<Value>) -> Result<(), AppError> {
        if row.len() != self.columns.len() {
            return Err(AppError::DataFormat(format!(
                "row {} has {} fields, expected {}",
                self.rows.len(),
                row.len(),
                self.columns.len()
            )));
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Cell lookup by row position and column name.
    pub fn get(&self, row: usize, column: &str) -> Option<&Value> {
        let idx = self.column_index(column)?;
        self.rows.get(row).map(|r| &r[idx])
    }

    /// All values of `column` in row order, or `None` if the column is absent.
    pub fn column(&self, name: &str) -> Option<impl Iterator<Item = &Value>> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().map(move |r| &r[idx]))
    }

    /// Replace the values of `name` if the column exists, otherwise append it.
    /// `values` must hold one entry per row.
    pub fn set_column(&mut self, name: &str, values: Vec<Value>) -> Result<(), AppError> {
        if values.len() != self.rows.len() {
            return Err(AppError::DataFormat(format!(
                "column '{name}' has {} values for {} rows",
                values.len(),
                self.rows.len()
            )));
        }
        match self.column_index(name) {
            Some(idx) => {
                for (row, v) in self.rows.iter_mut().zip(values) {
                    row[idx] = v;
                }
            }
            None => {
                self.columns.push(name.to_string());
                for (row, v) in self.rows.iter_mut().zip(values) {
                    row.push(v);
                }
            }
        }
        Ok(())
    }

    /// First `n` rows as a new table.
    pub fn head(&self, n: usize) -> RecordTable {
        RecordTable {
            columns: self.columns.clone(),
            rows: self.rows.iter().take(n).cloned().collect(),
        }
    }

    /// Render the first `n` rows as an aligned text grid with a leading row
    /// index, one line per row plus a header line.
    pub fn render(&self, n: usize) -> String {
        let shown = &self.rows[..self.rows.len().min(n)];
        let cells: Vec<Vec<String>> = shown
            .iter()
            .map(|r| r.iter().map(ToString::to_string).collect())
            .collect();

        let index_width = shown.len().saturating_sub(1).to_string().len();
        let widths: Vec<usize> = self
            .columns
            .iter()
            .enumerate()
            .map(|(ci, name)| {
                cells
                    .iter()
                    .map(|r| r[ci].chars().count())
                    .chain(std::iter::once(name.chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let mut out = String::new();
        out.push_str(&" ".repeat(index_width));
        for (name, w) in self.columns.iter().zip(&widths) {
            out.push_str(&format!("  {name:>w$}"));
        }
        for (ri, row) in cells.iter().enumerate() {
            out.push('\n');
            out.push_str(&format!("{ri:<index_width$}"));
            for (cell, w) in row.iter().zip(&widths) {
                out.push_str(&format!("  {cell:>w$}"));
            }
        }
        out
    }
}
