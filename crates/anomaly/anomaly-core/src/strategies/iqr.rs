//! Interquartile range strategy.

use std::collections::BTreeMap;

use anomaly_api::IQRConfig;
use anomaly_spi::{AnomalyError, AnomalyResult, AnomalyStrategy, Result};

use crate::stats;

/// Interquartile Range (IQR) based anomaly strategy
///
/// Flags values outside `[Q1 - m * IQR, Q3 + m * IQR]`, the fences of a
/// box plot. Quartiles use linear interpolation between order statistics.
///
/// The score is the distance beyond the nearer fence in units of IQR and
/// is 0 for every in-bound value. When the quartiles coincide (IQR = 0)
/// the raw distance beyond the fence is used instead.
///
/// @algorithm IQR
/// @category StatisticalStrategy
/// @complexity O(n log n) fit, O(n) detect
/// @thread_safe false
#[derive(Debug, Clone)]
pub struct IQRStrategy {
    multiplier: f64,
    q1: f64,
    q3: f64,
    fitted: bool,
}

impl IQRStrategy {
    /// Create a new IQR strategy
    ///
    /// # Arguments
    ///
    /// * `multiplier` - IQR multiplier for outlier bounds (typically 1.5)
    pub fn new(multiplier: f64) -> Result<Self> {
        Self::from_config(&IQRConfig::new(multiplier))
    }

    /// Create from configuration.
    pub fn from_config(config: &IQRConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            multiplier: config.multiplier,
            q1: 0.0,
            q3: 0.0,
            fitted: false,
        })
    }

    /// Get the multiplier
    pub fn multiplier(&self) -> f64 {
        self.multiplier
    }

    /// Get the first quartile
    pub fn q1(&self) -> f64 {
        self.q1
    }

    /// Get the third quartile
    pub fn q3(&self) -> f64 {
        self.q3
    }

    /// Get the IQR
    pub fn iqr(&self) -> f64 {
        self.q3 - self.q1
    }

    /// Lower and upper fences.
    pub fn bounds(&self) -> (f64, f64) {
        let iqr = self.iqr();
        (
            self.q1 - self.multiplier * iqr,
            self.q3 + self.multiplier * iqr,
        )
    }
}

impl Default for IQRStrategy {
    fn default() -> Self {
        Self {
            multiplier: IQRConfig::default().multiplier,
            q1: 0.0,
            q3: 0.0,
            fitted: false,
        }
    }
}

impl AnomalyStrategy for IQRStrategy {
    fn name(&self) -> &'static str {
        "InterquartileRange"
    }

    fn params(&self) -> BTreeMap<String, String> {
        BTreeMap::from([("multiplier".to_string(), self.multiplier.to_string())])
    }

    fn fit(&mut self, sample: &[f64]) -> Result<()> {
        self.fitted = false;
        if sample.is_empty() {
            return Err(AnomalyError::InsufficientData {
                required: 1,
                got: 0,
            });
        }

        let sorted = stats::sorted(sample);
        self.q1 = stats::percentile(&sorted, 25.0);
        self.q3 = stats::percentile(&sorted, 75.0);
        self.fitted = true;
        Ok(())
    }

    fn detect(&self, sample: &[f64]) -> Result<AnomalyResult> {
        if !self.fitted {
            return Err(AnomalyError::NotFitted);
        }

        let iqr = self.iqr();
        let (lower, upper) = self.bounds();

        let is_anomaly: Vec<bool> = sample.iter().map(|&x| x < lower || x > upper).collect();
        let scores: Vec<f64> = sample
            .iter()
            .map(|&x| {
                let excess = if x < lower {
                    lower - x
                } else if x > upper {
                    x - upper
                } else {
                    0.0
                };
                if iqr > 0.0 {
                    excess / iqr
                } else {
                    excess
                }
            })
            .collect();

        Ok(AnomalyResult::new(is_anomaly, scores, self.multiplier))
    }

    fn is_fitted(&self) -> bool {
        self.fitted
    }

    fn clone_box(&self) -> Box<dyn AnomalyStrategy> {
        Box::new(self.clone())
    }
}
