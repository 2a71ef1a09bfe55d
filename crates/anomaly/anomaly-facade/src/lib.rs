//! Anomaly Detection Facade
//!
//! One import surface over the contract, configuration and implementation
//! crates:
//! - `AnomalyStrategy`, `AnomalyError` and the table model (`Table`,
//!   `Column`, `SummaryTable`, ...) from SPI
//! - `DetectorConfig`, `StrategyConfig` and per-strategy configs from API
//! - the four strategies, `ColumnProcessor`, `AnomalyDetector` and CSV
//!   persistence from Core
//!
//! Most callers only need the [`prelude`].

pub use anomaly_api::*;
pub use anomaly_core::*;
pub use anomaly_spi::*;

/// Types needed to load a table, run a detector and save the result.
pub mod prelude {
    pub use anomaly_api::{DetectorConfig, StrategyConfig};
    pub use anomaly_core::{read_csv, write_csv, AnomalyDetector};
    pub use anomaly_spi::{
        AnomalyError, AnomalyStrategy, Result, SampleFilter, SummaryTable, Table,
    };
}
