//! Column-oriented table model.

use serde::{Deserialize, Serialize};

use crate::error::{AnomalyError, Result};

/// Values held by one column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "values", rename_all = "snake_case")]
pub enum ColumnData {
    /// Real values; `None` marks a missing cell.
    Numeric(Vec<Option<f64>>),
    /// 0/1 anomaly flags.
    Flag(Vec<bool>),
    /// Anything that did not parse as a number.
    Text(Vec<Option<String>>),
}

impl ColumnData {
    pub fn len(&self) -> usize {
        match self {
            Self::Numeric(values) => values.len(),
            Self::Flag(values) => values.len(),
            Self::Text(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Numeric view of the column. NaN is reported as missing and flags
    /// become 0.0 / 1.0. Text columns have no numeric view.
    pub fn to_numeric(&self) -> Option<Vec<Option<f64>>> {
        match self {
            Self::Numeric(values) => Some(
                values
                    .iter()
                    .map(|v| v.filter(|x| !x.is_nan()))
                    .collect(),
            ),
            Self::Flag(values) => Some(
                values
                    .iter()
                    .map(|&f| Some(if f { 1.0 } else { 0.0 }))
                    .collect(),
            ),
            Self::Text(_) => None,
        }
    }
}

/// A named column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    name: String,
    data: ColumnData,
}

impl Column {
    pub fn new(name: impl Into<String>, data: ColumnData) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }

    /// Numeric column with possibly missing cells.
    pub fn numeric(name: impl Into<String>, values: Vec<Option<f64>>) -> Self {
        Self::new(name, ColumnData::Numeric(values))
    }

    /// Numeric column without missing cells.
    pub fn dense(name: impl Into<String>, values: Vec<f64>) -> Self {
        Self::numeric(name, values.into_iter().map(Some).collect())
    }

    pub fn flag(name: impl Into<String>, values: Vec<bool>) -> Self {
        Self::new(name, ColumnData::Flag(values))
    }

    pub fn text(name: impl Into<String>, values: Vec<Option<String>>) -> Self {
        Self::new(name, ColumnData::Text(values))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn data(&self) -> &ColumnData {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// An ordered collection of equally long, named columns.
///
/// Every column shares one implicit row index `0..row_count()`; the table
/// refuses any column whose length would break that alignment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    columns: Vec<Column>,
    rows: usize,
}

impl Table {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from columns, checking lengths and names.
    pub fn from_columns(columns: Vec<Column>) -> Result<Self> {
        let mut table = Self::new();
        for column in columns {
            if table.contains(column.name()) {
                return Err(AnomalyError::DuplicateColumn(column.name().to_string()));
            }
            table.insert_column(column)?;
        }
        Ok(table)
    }

    pub fn row_count(&self) -> usize {
        self.rows
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(Column::name).collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c.name() == name)
    }

    /// Look up a column by name.
    pub fn column(&self, name: &str) -> Result<&Column> {
        self.columns
            .iter()
            .find(|c| c.name() == name)
            .ok_or_else(|| AnomalyError::ColumnNotFound(name.to_string()))
    }

    /// Numeric view of a column; see [`ColumnData::to_numeric`].
    pub fn numeric_values(&self, name: &str) -> Result<Vec<Option<f64>>> {
        self.column(name)?
            .data()
            .to_numeric()
            .ok_or_else(|| AnomalyError::NonNumericColumn(name.to_string()))
    }

    /// Append a column, or replace the existing column of the same name in
    /// place. The first column of an empty table fixes the row count.
    pub fn insert_column(&mut self, column: Column) -> Result<()> {
        if self.columns.is_empty() {
            self.rows = column.len();
        } else if column.len() != self.rows {
            return Err(AnomalyError::LengthMismatch {
                column: column.name().to_string(),
                expected: self.rows,
                got: column.len(),
            });
        }

        match self.columns.iter_mut().find(|c| c.name() == column.name()) {
            Some(existing) => *existing = column,
            None => self.columns.push(column),
        }
        Ok(())
    }
}
