//! Error taxonomy shared by strategies, the column processor and
//! persistence, plus the crate-wide `Result` alias.

mod anomaly_error;

pub use anomaly_error::{AnomalyError, Result};
