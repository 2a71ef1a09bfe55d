//! # anomaly
//!
//! Multi-strategy anomaly detection for numeric table columns.
//! Runs local outlier factor, isolation forest, z-score and IQR strategies
//! over selected columns, annotates the table with per-strategy flags and
//! scores, and summarises the anomalies found.

pub use anomaly_facade::*;
