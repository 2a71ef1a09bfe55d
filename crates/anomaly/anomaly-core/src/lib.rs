//! Anomaly Detection Core
//!
//! Strategy implementations, the column processor, the multi-column
//! detector and CSV persistence.

pub mod forest;
pub mod neighbors;
pub mod persistence;
pub mod stats;

mod detector;
mod processor;
mod strategies;

pub use detector::{AnomalyDetector, DEFAULT_SUFFIX};
pub use forest::IsolationForest;
pub use neighbors::LocalOutlierFactor;
pub use persistence::{derive_output_path, read_csv, write_csv};
pub use processor::{
    assign_labels, flag_column_name, score_column_name, Annotation, ColumnOutcome,
    ColumnProcessor, LabeledStrategy,
};
pub use strategies::{
    build_strategy, IQRStrategy, IsolationForestStrategy, LocalOutlierFactorStrategy,
    ZScoreStrategy,
};

// Re-export SPI types used in signatures
pub use anomaly_spi::{
    AnomalyError, AnomalyResult, AnomalyStrategy, Column, ColumnData, Result, Sample,
    SampleFilter, SummaryRecord, SummaryTable, Table,
};
