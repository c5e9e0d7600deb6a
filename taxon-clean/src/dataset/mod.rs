//! In-memory tabular dataset
//!
//! Every cell is text. An empty cell is treated as an absent value, the same
//! way spreadsheet readers surface blank cells as nulls.

pub mod csv_io;

pub use csv_io::{read_csv, read_csv_from, write_csv, write_csv_to};

use std::collections::HashMap;

/// One row of the dataset, keyed by column name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    values: HashMap<String, String>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a record from (column, value) pairs
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            values: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Value of a field, `None` when absent or empty
    pub fn get(&self, field: &str) -> Option<&str> {
        self.values
            .get(field)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    /// True when the field is absent, empty, or whitespace-only
    pub fn is_blank(&self, field: &str) -> bool {
        self.get(field).map_or(true, |v| v.trim().is_empty())
    }

    pub fn set(&mut self, field: impl Into<String>, value: impl Into<String>) {
        self.values.insert(field.into(), value.into());
    }

    /// Cell text for export (empty string when absent)
    pub fn cell(&self, field: &str) -> &str {
        self.values.get(field).map(String::as_str).unwrap_or("")
    }
}

/// Ordered column schema plus rows
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dataset {
    columns: Vec<String>,
    rows: Vec<Record>,
}

impl Dataset {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn with_rows(columns: Vec<String>, rows: Vec<Record>) -> Self {
        Self { columns, rows }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Record] {
        &self.rows
    }

    pub fn rows_mut(&mut self) -> &mut [Record] {
        &mut self.rows
    }

    pub fn into_rows(self) -> Vec<Record> {
        self.rows
    }

    pub fn push(&mut self, record: Record) {
        self.rows.push(record);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    /// Append a column to the schema if it is not already present
    pub fn ensure_column(&mut self, column: &str) {
        if !self.has_column(column) {
            self.columns.push(column.to_string());
        }
    }

    /// Move a column to the end of the schema, appending it if absent
    pub fn move_column_to_end(&mut self, column: &str) {
        self.columns.retain(|c| c != column);
        self.columns.push(column.to_string());
    }

    /// Fixed-width text rendering of the first `limit` rows
    ///
    /// Columns not in the schema are skipped.
    pub fn preview(&self, limit: usize, columns: &[&str]) -> String {
        let shown: Vec<&str> = columns
            .iter()
            .copied()
            .filter(|c| self.has_column(c))
            .collect();
        let rows: Vec<&Record> = self.rows.iter().take(limit).collect();

        let widths: Vec<usize> = shown
            .iter()
            .map(|col| {
                rows.iter()
                    .map(|r| r.cell(col).chars().count())
                    .chain(std::iter::once(col.chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let render = |cells: Vec<&str>| -> String {
            cells
                .iter()
                .zip(&widths)
                .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
                .collect::<Vec<_>>()
                .join(" | ")
                .trim_end()
                .to_string()
        };

        let mut lines = Vec::with_capacity(rows.len() + 2);
        lines.push(render(shown.clone()));
        lines.push(
            widths
                .iter()
                .map(|w| "-".repeat(*w))
                .collect::<Vec<_>>()
                .join("-+-"),
        );
        for row in rows {
            lines.push(render(shown.iter().map(|c| row.cell(c)).collect()));
        }
        lines.join("\n")
    }
}
