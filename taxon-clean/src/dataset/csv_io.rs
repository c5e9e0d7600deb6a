//! CSV import and export
//!
//! All cells are read as text with no numeric or date coercion. Short rows
//! are padded with empty cells so ragged exports from spreadsheet tools load.

use super::{Dataset, Record};
use crate::error::{CleanError, CleanResult};
use std::collections::HashSet;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use tracing::debug;

/// Read a CSV file with a header row
pub fn read_csv(path: &Path) -> CleanResult<Dataset> {
    let file = File::open(path)?;
    let dataset = read_csv_from(file)?;
    debug!(
        path = %path.display(),
        rows = dataset.len(),
        columns = dataset.columns().len(),
        "Loaded dataset"
    );
    Ok(dataset)
}

/// Read CSV from any reader
pub fn read_csv_from<R: Read>(reader: R) -> CleanResult<Dataset> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let columns: Vec<String> = csv_reader
        .headers()?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').to_string())
        .collect();

    let mut seen = HashSet::with_capacity(columns.len());
    for column in &columns {
        if !seen.insert(column.as_str()) {
            return Err(CleanError::DuplicateColumn(column.clone()));
        }
    }

    let mut dataset = Dataset::new(columns);
    for row in csv_reader.records() {
        let row = row?;
        let record = Record::from_pairs(
            dataset
                .columns()
                .iter()
                .enumerate()
                .map(|(i, column)| (column.clone(), row.get(i).unwrap_or("").to_string())),
        );
        dataset.push(record);
    }

    Ok(dataset)
}

/// Write a dataset as CSV, columns in schema order
pub fn write_csv(dataset: &Dataset, path: &Path) -> CleanResult<()> {
    let file = File::create(path)?;
    write_csv_to(dataset, file)?;
    debug!(path = %path.display(), rows = dataset.len(), "Wrote dataset");
    Ok(())
}

/// Write CSV to any writer
pub fn write_csv_to<W: Write>(dataset: &Dataset, writer: W) -> CleanResult<()> {
    let mut csv_writer = csv::WriterBuilder::new().from_writer(writer);

    csv_writer.write_record(dataset.columns())?;
    for record in dataset.rows() {
        csv_writer.write_record(dataset.columns().iter().map(|c| record.cell(c)))?;
    }
    csv_writer.flush()?;
    Ok(())
}
