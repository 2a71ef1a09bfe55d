//! Contract definitions for anomaly detection.
//!
//! This module contains trait definitions that strategies must implement.

mod anomaly_strategy;

pub use anomaly_strategy::AnomalyStrategy;
