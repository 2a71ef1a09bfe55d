//! Delimited-file loading and saving of tables.

use std::path::{Path, PathBuf};

use anomaly_spi::{AnomalyError, Column, ColumnData, Result, Table};
use tracing::debug;

fn csv_error(err: csv::Error) -> AnomalyError {
    match err.kind() {
        csv::ErrorKind::Io(io) => AnomalyError::Io(io.to_string()),
        _ => AnomalyError::Csv(err.to_string()),
    }
}

/// Load a CSV file with a header row.
///
/// A column is numeric when every non-empty field parses as `f64`, and
/// text otherwise. Empty fields are missing values.
pub fn read_csv(path: impl AsRef<Path>) -> Result<Table> {
    let path = path.as_ref();
    let mut reader = csv::Reader::from_path(path).map_err(csv_error)?;
    let headers: Vec<String> = reader
        .headers()
        .map_err(csv_error)?
        .iter()
        .map(str::to_string)
        .collect();

    let mut fields: Vec<Vec<String>> = vec![Vec::new(); headers.len()];
    for record in reader.records() {
        let record = record.map_err(csv_error)?;
        for (column, field) in fields.iter_mut().zip(record.iter()) {
            column.push(field.trim().to_string());
        }
    }

    let columns = headers
        .into_iter()
        .zip(fields)
        .map(|(name, raw)| Column::new(name, infer_column(raw)))
        .collect();
    let table = Table::from_columns(columns)?;

    debug!(
        path = %path.display(),
        rows = table.row_count(),
        columns = table.column_count(),
        "Loaded table"
    );
    Ok(table)
}

fn infer_column(raw: Vec<String>) -> ColumnData {
    let parsed: Option<Vec<Option<f64>>> = raw
        .iter()
        .map(|field| {
            if field.is_empty() {
                Some(None)
            } else {
                field.parse::<f64>().ok().map(Some)
            }
        })
        .collect();

    match parsed {
        Some(values) => ColumnData::Numeric(values),
        None => ColumnData::Text(
            raw.into_iter()
                .map(|field| (!field.is_empty()).then_some(field))
                .collect(),
        ),
    }
}

/// Write `table` as CSV with a header row and no index column.
///
/// Missing values become empty fields and flags become `0`/`1`.
pub fn write_csv(table: &Table, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let mut writer = csv::Writer::from_path(path).map_err(csv_error)?;
    if table.column_count() == 0 {
        writer.flush()?;
        return Ok(());
    }

    writer
        .write_record(table.column_names())
        .map_err(csv_error)?;
    for row in 0..table.row_count() {
        let record: Vec<String> = table
            .columns()
            .iter()
            .map(|column| format_cell(column.data(), row))
            .collect();
        writer.write_record(&record).map_err(csv_error)?;
    }
    writer.flush()?;

    debug!(path = %path.display(), rows = table.row_count(), "Wrote table");
    Ok(())
}

fn format_cell(data: &ColumnData, row: usize) -> String {
    match data {
        ColumnData::Numeric(values) => match values[row] {
            Some(v) if !v.is_nan() => v.to_string(),
            _ => String::new(),
        },
        ColumnData::Flag(values) => String::from(if values[row] { "1" } else { "0" }),
        ColumnData::Text(values) => values[row].clone().unwrap_or_default(),
    }
}

/// `{stem}{suffix}{.ext}` in the directory of `path`.
pub fn derive_output_path(path: &Path, suffix: &str) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let file_name = match path.extension() {
        Some(ext) => format!("{}{}.{}", stem, suffix, ext.to_string_lossy()),
        None => format!("{}{}", stem, suffix),
    };
    path.with_file_name(file_name)
}
