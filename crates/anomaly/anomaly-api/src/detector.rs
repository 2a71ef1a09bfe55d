//! Detector-level configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use anomaly_spi::{AnomalyError, Result, SampleFilter};

use crate::{
    IQRConfig, IsolationForestConfig, LocalOutlierFactorConfig, StrategyConfig, ZScoreConfig,
};

/// Everything needed to build a detector: the ordered strategies plus the
/// column processing and persistence policy.
///
/// Loadable from TOML:
///
/// ```toml
/// sample_filter = "drop_missing_and_zero"
/// suffix = "_anomaly"
///
/// [[strategies]]
/// method = "zscore"
/// threshold = 3.0
///
/// [[strategies]]
/// method = "isolation_forest"
/// n_estimators = 100
/// contamination = "auto"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// Which cells of a column enter the sample.
    pub sample_filter: SampleFilter,
    /// Inserted before the extension of the saved table's file name.
    pub suffix: String,
    /// Process columns concurrently with per-column strategy clones.
    pub parallel: bool,
    /// Strategies, run in this order on every column.
    pub strategies: Vec<StrategyConfig>,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            sample_filter: SampleFilter::default(),
            suffix: "_anomaly".to_string(),
            parallel: false,
            strategies: vec![
                LocalOutlierFactorConfig::default().into(),
                IsolationForestConfig::default().into(),
                ZScoreConfig::default().into(),
                IQRConfig::default().into(),
            ],
        }
    }
}

impl DetectorConfig {
    /// Default policy with the given strategies.
    pub fn new(strategies: Vec<StrategyConfig>) -> Self {
        Self {
            strategies,
            ..Self::default()
        }
    }

    pub fn with_strategy(mut self, strategy: impl Into<StrategyConfig>) -> Self {
        self.strategies.push(strategy.into());
        self
    }

    pub fn with_sample_filter(mut self, sample_filter: SampleFilter) -> Self {
        self.sample_filter = sample_filter;
        self
    }

    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.strategies.is_empty() {
            return Err(AnomalyError::invalid_parameter(
                "strategies",
                "at least one strategy is required",
            ));
        }
        if self.suffix.is_empty() {
            return Err(AnomalyError::invalid_parameter(
                "suffix",
                "must not be empty, the source file would be overwritten",
            ));
        }
        self.strategies.iter().try_for_each(StrategyConfig::validate)
    }

    /// Parse and validate a TOML document.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(source).map_err(|e| AnomalyError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let source = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&source)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string(self).map_err(|e| AnomalyError::Config(e.to_string()))
    }
}
