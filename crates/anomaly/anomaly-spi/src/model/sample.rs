//! Row-aligned samples drawn from a single column.

use serde::{Deserialize, Serialize};

/// Which cells of a column are eligible for detection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SampleFilter {
    /// Keep every present value.
    #[default]
    DropMissing,
    /// Keep present values that are not exactly zero.
    DropMissingAndZero,
}

impl SampleFilter {
    /// Whether a present value passes the filter.
    pub fn keeps(&self, value: f64) -> bool {
        match self {
            Self::DropMissing => true,
            Self::DropMissingAndZero => value != 0.0,
        }
    }
}

/// The eligible values of one column together with the table rows they
/// came from, so per-value results can be scattered back onto the table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sample {
    rows: Vec<usize>,
    values: Vec<f64>,
}

impl Sample {
    /// Select the eligible cells of a column.
    pub fn from_column(cells: &[Option<f64>], filter: SampleFilter) -> Self {
        let (rows, values) = cells
            .iter()
            .enumerate()
            .filter_map(|(row, cell)| match cell {
                Some(v) if !v.is_nan() && filter.keeps(*v) => Some((row, *v)),
                _ => None,
            })
            .unzip();
        Self { rows, values }
    }

    /// Table row index of each sample value.
    pub fn rows(&self) -> &[usize] {
        &self.rows
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Spread per-sample results over `row_count` rows, filling rows outside
    /// the sample with `default`.
    pub fn scatter<T: Clone>(&self, per_value: &[T], row_count: usize, default: T) -> Vec<T> {
        let mut out = vec![default; row_count];
        for (&row, value) in self.rows.iter().zip(per_value) {
            out[row] = value.clone();
        }
        out
    }
}
