//! Data models for anomaly detection.
//!
//! This module contains data structures used throughout the anomaly detection system.

mod anomaly_result;
mod sample;
mod summary;
mod table;

pub use anomaly_result::AnomalyResult;
pub use sample::{Sample, SampleFilter};
pub use summary::{SummaryRecord, SummaryTable};
pub use table::{Column, ColumnData, Table};
