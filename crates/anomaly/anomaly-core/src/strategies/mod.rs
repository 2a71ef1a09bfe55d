//! Anomaly strategy implementations.
//!
//! - [`ZScoreStrategy`]: distance from the mean in standard deviations
//! - [`IQRStrategy`]: box-plot fences around the quartiles
//! - [`IsolationForestStrategy`]: randomised isolation ensemble
//! - [`LocalOutlierFactorStrategy`]: k-nearest-neighbour local density

mod iqr;
mod isolation_forest;
mod local_outlier_factor;
mod zscore;

pub use iqr::IQRStrategy;
pub use isolation_forest::IsolationForestStrategy;
pub use local_outlier_factor::LocalOutlierFactorStrategy;
pub use zscore::ZScoreStrategy;

use anomaly_api::StrategyConfig;
use anomaly_spi::{AnomalyStrategy, Result};

/// Build a strategy from its configuration, validating parameters.
pub fn build_strategy(config: &StrategyConfig) -> Result<Box<dyn AnomalyStrategy>> {
    Ok(match config {
        StrategyConfig::ZScore(c) => Box::new(ZScoreStrategy::from_config(c)?),
        StrategyConfig::Iqr(c) => Box::new(IQRStrategy::from_config(c)?),
        StrategyConfig::IsolationForest(c) => Box::new(IsolationForestStrategy::new(c.clone())?),
        StrategyConfig::LocalOutlierFactor(c) => {
            Box::new(LocalOutlierFactorStrategy::new(c.clone())?)
        }
    })
}
