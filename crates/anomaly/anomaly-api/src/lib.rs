//! Anomaly Detection API
//!
//! Configuration types and builders for anomaly detection.

use serde::{Deserialize, Serialize};

mod contamination;
mod detector;

pub use contamination::Contamination;
pub use detector::DetectorConfig;

// Re-export SPI types
pub use anomaly_spi::{AnomalyError, AnomalyResult, Result, SampleFilter, SummaryRecord, SummaryTable};

fn require_positive(name: &str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(AnomalyError::invalid_parameter(
            name,
            format!("must be positive, got {}", value),
        ))
    }
}

fn require_finite(name: &str, value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(AnomalyError::invalid_parameter(name, "must be finite"))
    }
}

// ============================================================================
// Statistical Strategies
// ============================================================================

/// Z-Score strategy configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZScoreConfig {
    /// Z-score threshold for anomaly detection (default: 3.0).
    pub threshold: f64,
}

impl Default for ZScoreConfig {
    fn default() -> Self {
        Self { threshold: 3.0 }
    }
}

impl ZScoreConfig {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    pub fn validate(&self) -> Result<()> {
        require_positive("threshold", self.threshold)
    }
}

/// Interquartile range strategy configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IQRConfig {
    /// IQR multiplier for outlier bounds (default: 1.5).
    pub multiplier: f64,
}

impl Default for IQRConfig {
    fn default() -> Self {
        Self { multiplier: 1.5 }
    }
}

impl IQRConfig {
    pub fn new(multiplier: f64) -> Self {
        Self { multiplier }
    }

    pub fn validate(&self) -> Result<()> {
        require_positive("multiplier", self.multiplier)
    }
}

// ============================================================================
// Model-based Strategies
// ============================================================================

/// Isolation forest strategy configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IsolationForestConfig {
    /// Number of trees in the ensemble (default: 100).
    pub n_estimators: usize,
    /// Rows drawn per tree; `None` means `min(256, n)`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_samples: Option<usize>,
    /// Contamination used for the forest's native offset.
    pub contamination: Contamination,
    /// Seed for the tree sampler (default: 42).
    pub seed: u64,
    /// Rows scoring below this are flagged (default: -0.82).
    pub score_threshold: f64,
}

impl Default for IsolationForestConfig {
    fn default() -> Self {
        Self {
            n_estimators: 100,
            max_samples: None,
            contamination: Contamination::Auto,
            seed: 42,
            score_threshold: -0.82,
        }
    }
}

impl IsolationForestConfig {
    pub fn new(n_estimators: usize, contamination: Contamination) -> Self {
        Self {
            n_estimators,
            contamination,
            ..Self::default()
        }
    }

    pub fn with_max_samples(mut self, max_samples: usize) -> Self {
        self.max_samples = Some(max_samples);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_score_threshold(mut self, score_threshold: f64) -> Self {
        self.score_threshold = score_threshold;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.n_estimators == 0 {
            return Err(AnomalyError::invalid_parameter(
                "n_estimators",
                "must be at least 1",
            ));
        }
        if self.max_samples == Some(0) {
            return Err(AnomalyError::invalid_parameter(
                "max_samples",
                "must be at least 1",
            ));
        }
        self.contamination.validate()?;
        require_finite("score_threshold", self.score_threshold)
    }
}

/// Local outlier factor strategy configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocalOutlierFactorConfig {
    /// Neighbourhood size (default: 20).
    pub n_neighbors: usize,
    /// Contamination used for the model's native offset.
    pub contamination: Contamination,
    /// Rows whose outlier factor exceeds this are flagged (default: 15.0).
    pub score_threshold: f64,
}

impl Default for LocalOutlierFactorConfig {
    fn default() -> Self {
        Self {
            n_neighbors: 20,
            contamination: Contamination::Auto,
            score_threshold: 15.0,
        }
    }
}

impl LocalOutlierFactorConfig {
    pub fn new(n_neighbors: usize, contamination: Contamination) -> Self {
        Self {
            n_neighbors,
            contamination,
            ..Self::default()
        }
    }

    pub fn with_score_threshold(mut self, score_threshold: f64) -> Self {
        self.score_threshold = score_threshold;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.n_neighbors == 0 {
            return Err(AnomalyError::invalid_parameter(
                "n_neighbors",
                "must be at least 1",
            ));
        }
        self.contamination.validate()?;
        require_positive("score_threshold", self.score_threshold)
    }
}

// ============================================================================
// Strategy Selection
// ============================================================================

/// One configured strategy, tagged by `method`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method")]
pub enum StrategyConfig {
    #[serde(rename = "zscore")]
    ZScore(ZScoreConfig),
    #[serde(rename = "iqr")]
    Iqr(IQRConfig),
    #[serde(rename = "isolation_forest")]
    IsolationForest(IsolationForestConfig),
    #[serde(rename = "local_outlier_factor")]
    LocalOutlierFactor(LocalOutlierFactorConfig),
}

impl StrategyConfig {
    /// The `method` tag of this configuration.
    pub fn method(&self) -> &'static str {
        match self {
            Self::ZScore(_) => "zscore",
            Self::Iqr(_) => "iqr",
            Self::IsolationForest(_) => "isolation_forest",
            Self::LocalOutlierFactor(_) => "local_outlier_factor",
        }
    }

    pub fn validate(&self) -> Result<()> {
        match self {
            Self::ZScore(c) => c.validate(),
            Self::Iqr(c) => c.validate(),
            Self::IsolationForest(c) => c.validate(),
            Self::LocalOutlierFactor(c) => c.validate(),
        }
    }
}

impl From<ZScoreConfig> for StrategyConfig {
    fn from(config: ZScoreConfig) -> Self {
        Self::ZScore(config)
    }
}

impl From<IQRConfig> for StrategyConfig {
    fn from(config: IQRConfig) -> Self {
        Self::Iqr(config)
    }
}

impl From<IsolationForestConfig> for StrategyConfig {
    fn from(config: IsolationForestConfig) -> Self {
        Self::IsolationForest(config)
    }
}

impl From<LocalOutlierFactorConfig> for StrategyConfig {
    fn from(config: LocalOutlierFactorConfig) -> Self {
        Self::LocalOutlierFactor(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        assert_eq!(ZScoreConfig::default().threshold, 3.0);
        assert_eq!(IQRConfig::default().multiplier, 1.5);

        let forest = IsolationForestConfig::default();
        assert_eq!(forest.n_estimators, 100);
        assert_eq!(forest.seed, 42);
        assert_eq!(forest.score_threshold, -0.82);
        assert_eq!(forest.contamination, Contamination::Auto);

        let lof = LocalOutlierFactorConfig::default();
        assert_eq!(lof.n_neighbors, 20);
        assert_eq!(lof.score_threshold, 15.0);
    }

    #[test]
    fn test_zscore_rejects_non_positive_threshold() {
        assert!(ZScoreConfig::new(0.0).validate().is_err());
        assert!(ZScoreConfig::new(-1.0).validate().is_err());
        assert!(ZScoreConfig::new(f64::INFINITY).validate().is_err());
        assert!(ZScoreConfig::new(2.5).validate().is_ok());
    }

    #[test]
    fn test_iqr_rejects_non_positive_multiplier() {
        let err = IQRConfig::new(0.0).validate().unwrap_err();
        assert!(matches!(err, AnomalyError::InvalidParameter { ref name, .. } if name == "multiplier"));
    }

    #[test]
    fn test_isolation_forest_validation() {
        assert!(IsolationForestConfig::new(0, Contamination::Auto).validate().is_err());
        assert!(IsolationForestConfig::default()
            .with_max_samples(0)
            .validate()
            .is_err());
        assert!(IsolationForestConfig::new(50, Contamination::Fraction(0.7))
            .validate()
            .is_err());
        assert!(IsolationForestConfig::new(50, Contamination::Fraction(0.1))
            .with_score_threshold(-0.85)
            .validate()
            .is_ok());
    }

    #[test]
    fn test_lof_validation() {
        let err = LocalOutlierFactorConfig::new(0, Contamination::Auto)
            .validate()
            .unwrap_err();
        assert!(matches!(err, AnomalyError::InvalidParameter { ref name, .. } if name == "n_neighbors"));
        assert!(LocalOutlierFactorConfig::new(5, Contamination::Fraction(0.0))
            .validate()
            .is_err());
    }

    #[test]
    fn test_strategy_config_tagging() {
        let config: StrategyConfig = IQRConfig::new(3.0).into();
        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["method"], "iqr");
        assert_eq!(json["multiplier"], 3.0);

        let parsed: StrategyConfig =
            serde_json::from_str(r#"{"method": "local_outlier_factor", "n_neighbors": 5}"#).unwrap();
        assert_eq!(parsed.method(), "local_outlier_factor");
        match parsed {
            StrategyConfig::LocalOutlierFactor(c) => {
                assert_eq!(c.n_neighbors, 5);
                assert_eq!(c.score_threshold, 15.0);
            }
            other => panic!("unexpected {:?}", other),
        }
    }
}
