//! Z-Score strategy.

use std::collections::BTreeMap;

use anomaly_api::ZScoreConfig;
use anomaly_spi::{AnomalyError, AnomalyResult, AnomalyStrategy, Result};

use crate::stats;

/// Z-Score based anomaly strategy.
///
/// Scores each value by its absolute distance from the fitted mean in
/// population standard deviations and flags scores above the threshold.
/// A sample whose values are all equal has no spread; every value then
/// scores 0 and nothing is flagged.
///
/// @algorithm ZScore
/// @category StatisticalStrategy
/// @complexity O(n) fit, O(n) detect
/// @thread_safe false
#[derive(Debug, Clone)]
pub struct ZScoreStrategy {
    threshold: f64,
    mean: f64,
    std_dev: f64,
    fitted: bool,
}

impl ZScoreStrategy {
    /// Create a new Z-Score strategy
    ///
    /// # Arguments
    ///
    /// * `threshold` - Number of standard deviations for anomaly threshold
    pub fn new(threshold: f64) -> Result<Self> {
        Self::from_config(&ZScoreConfig::new(threshold))
    }

    /// Create from configuration.
    pub fn from_config(config: &ZScoreConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            threshold: config.threshold,
            mean: 0.0,
            std_dev: 0.0,
            fitted: false,
        })
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Get the fitted mean
    pub fn mean(&self) -> f64 {
        self.mean
    }

    /// Get the fitted population standard deviation
    pub fn std_dev(&self) -> f64 {
        self.std_dev
    }
}

impl Default for ZScoreStrategy {
    fn default() -> Self {
        Self {
            threshold: ZScoreConfig::default().threshold,
            mean: 0.0,
            std_dev: 0.0,
            fitted: false,
        }
    }
}

impl AnomalyStrategy for ZScoreStrategy {
    fn name(&self) -> &'static str {
        "ZScore"
    }

    fn params(&self) -> BTreeMap<String, String> {
        BTreeMap::from([("threshold".to_string(), self.threshold.to_string())])
    }

    fn fit(&mut self, sample: &[f64]) -> Result<()> {
        self.fitted = false;
        if sample.is_empty() {
            return Err(AnomalyError::InsufficientData {
                required: 1,
                got: 0,
            });
        }

        if stats::is_constant(sample) {
            self.mean = sample[0];
            self.std_dev = 0.0;
        } else {
            self.mean = stats::mean(sample);
            self.std_dev = stats::population_std(sample, self.mean);
        }
        self.fitted = true;
        Ok(())
    }

    fn detect(&self, sample: &[f64]) -> Result<AnomalyResult> {
        if !self.fitted {
            return Err(AnomalyError::NotFitted);
        }

        let scores = if self.std_dev == 0.0 {
            vec![0.0; sample.len()]
        } else {
            sample
                .iter()
                .map(|&x| ((x - self.mean) / self.std_dev).abs())
                .collect()
        };

        let threshold = self.threshold;
        Ok(AnomalyResult::from_scores(scores, threshold, |s| s > threshold))
    }

    fn is_fitted(&self) -> bool {
        self.fitted
    }

    fn clone_box(&self) -> Box<dyn AnomalyStrategy> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_non_positive_threshold() {
        assert!(matches!(
            ZScoreStrategy::new(0.0),
            Err(AnomalyError::InvalidParameter { .. })
        ));
        assert!(ZScoreStrategy::new(-3.0).is_err());
    }

    #[test]
    fn test_small_sample_cannot_reach_threshold() {
        // With n = 6 the largest possible population z-score is sqrt(5).
        let sample = [1.0, 2.0, 2.0, 3.0, 2.0, 100.0];
        let mut strategy = ZScoreStrategy::new(3.0).unwrap();
        strategy.fit(&sample).unwrap();

        assert!((strategy.mean() - 110.0 / 6.0).abs() < 1e-12);
        assert!((strategy.std_dev() - 36.5270).abs() < 1e-3);

        let result = strategy.detect(&sample).unwrap();
        assert!((result.scores[5] - 5f64.sqrt()).abs() < 1e-9);
        assert_eq!(result.anomaly_count(), 0);
    }

    #[test]
    fn test_flags_value_beyond_threshold() {
        let mut sample = vec![10.0; 30];
        sample[0] = 9.0;
        sample[1] = 11.0;
        sample.push(60.0);
        let mut strategy = ZScoreStrategy::default();
        strategy.fit(&sample).unwrap();

        let flags = strategy.predict(&sample).unwrap();
        assert!(flags[30]);
        assert_eq!(flags.iter().filter(|&&f| f).count(), 1);
    }

    #[test]
    fn test_constant_sample_has_no_anomalies() {
        let sample = [5.0; 10];
        let mut strategy = ZScoreStrategy::default();
        strategy.fit(&sample).unwrap();

        let result = strategy.detect(&sample).unwrap();
        assert_eq!(result.scores, vec![0.0; 10]);
        assert_eq!(result.anomaly_count(), 0);
    }

    #[test]
    fn test_long_constant_sample_scores_zero() {
        // The sum of 1000 copies of 0.1 is not exact.
        let sample = vec![0.1; 1000];
        let mut strategy = ZScoreStrategy::default();
        strategy.fit(&sample).unwrap();

        assert_eq!(strategy.mean(), 0.1);
        assert_eq!(strategy.std_dev(), 0.0);
        let result = strategy.detect(&sample).unwrap();
        assert!(result.scores.iter().all(|&s| s == 0.0));
        assert_eq!(result.anomaly_count(), 0);

        let others = strategy.detect(&[0.1, 0.2, -4.0]).unwrap();
        assert_eq!(others.scores, vec![0.0; 3]);
    }

    #[test]
    fn test_predict_and_score_share_computation() {
        let sample = [1.0, 4.0, 2.0, 8.0, 30.0, 3.0, 2.5, 1.5, 2.0, 3.5, 2.0, 1.0];
        let mut strategy = ZScoreStrategy::new(2.0).unwrap();
        strategy.fit(&sample).unwrap();

        let flags = strategy.predict(&sample).unwrap();
        let scores = strategy.score(&sample).unwrap();
        for (flag, score) in flags.iter().zip(&scores) {
            assert_eq!(*flag, *score > 2.0);
            assert!(*score >= 0.0);
        }
    }

    #[test]
    fn test_not_fitted_and_empty() {
        let mut strategy = ZScoreStrategy::default();
        assert!(matches!(strategy.detect(&[1.0]), Err(AnomalyError::NotFitted)));
        assert!(matches!(
            strategy.fit(&[]),
            Err(AnomalyError::InsufficientData { required: 1, got: 0 })
        ));
    }

    #[test]
    fn test_params() {
        let strategy = ZScoreStrategy::new(2.5).unwrap();
        assert_eq!(strategy.params()["threshold"], "2.5");
        assert_eq!(strategy.name(), "ZScore");
    }
}
