//! Anomaly Detection Service Provider Interface
//!
//! Defines the strategy contract, error types and the table model shared by
//! every anomaly detection crate.

pub mod contract;
pub mod error;
pub mod model;

// Re-export all public items at crate root for convenience
pub use contract::AnomalyStrategy;
pub use error::{AnomalyError, Result};
pub use model::{
    AnomalyResult, Column, ColumnData, Sample, SampleFilter, SummaryRecord, SummaryTable, Table,
};
