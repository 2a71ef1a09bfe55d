//! Local outlier factor strategy.

use std::collections::BTreeMap;

use anomaly_api::LocalOutlierFactorConfig;
use anomaly_spi::{AnomalyError, AnomalyResult, AnomalyStrategy, Result};

use crate::neighbors::LocalOutlierFactor;

/// Density-based strategy using the local outlier factor.
///
/// The score is the outlier factor itself (the negated native
/// `negative_outlier_factor`), so higher means a sparser neighbourhood;
/// values around 1 are ordinary. Rows whose factor exceeds
/// `score_threshold` are flagged.
///
/// Detecting on the exact sample the model was fitted on reuses the factors
/// computed during `fit`; any other sample is scored against the fitted
/// neighbourhoods. Detection never refits.
#[derive(Debug, Clone)]
pub struct LocalOutlierFactorStrategy {
    config: LocalOutlierFactorConfig,
    model: LocalOutlierFactor,
}

impl LocalOutlierFactorStrategy {
    pub fn new(config: LocalOutlierFactorConfig) -> Result<Self> {
        config.validate()?;
        let model = LocalOutlierFactor::new(config.n_neighbors, config.contamination.fraction());
        Ok(Self { config, model })
    }

    pub fn config(&self) -> &LocalOutlierFactorConfig {
        &self.config
    }

    /// The fitted density model.
    pub fn model(&self) -> &LocalOutlierFactor {
        &self.model
    }

    fn negative_factors(&self, sample: &[f64]) -> Result<Vec<f64>> {
        match self.model.fit_sample() {
            Some(fitted) if fitted == sample => Ok(self.model.negative_outlier_factor()?.to_vec()),
            Some(_) => self.model.score_samples(sample),
            None => Err(AnomalyError::NotFitted),
        }
    }
}

impl Default for LocalOutlierFactorStrategy {
    fn default() -> Self {
        let config = LocalOutlierFactorConfig::default();
        let model = LocalOutlierFactor::new(config.n_neighbors, config.contamination.fraction());
        Self { config, model }
    }
}

impl AnomalyStrategy for LocalOutlierFactorStrategy {
    fn name(&self) -> &'static str {
        "LocalOutlierFactor"
    }

    fn params(&self) -> BTreeMap<String, String> {
        BTreeMap::from([
            ("n_neighbors".to_string(), self.config.n_neighbors.to_string()),
            ("contamination".to_string(), self.config.contamination.to_string()),
            (
                "score_threshold".to_string(),
                self.config.score_threshold.to_string(),
            ),
        ])
    }

    fn fit(&mut self, sample: &[f64]) -> Result<()> {
        self.model.fit(sample)
    }

    fn detect(&self, sample: &[f64]) -> Result<AnomalyResult> {
        let scores: Vec<f64> = self
            .negative_factors(sample)?
            .into_iter()
            .map(|v| -v)
            .collect();
        let threshold = self.config.score_threshold;
        Ok(AnomalyResult::from_scores(scores, threshold, |s| s > threshold))
    }

    fn is_fitted(&self) -> bool {
        self.model.is_fitted()
    }

    fn clone_box(&self) -> Box<dyn AnomalyStrategy> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anomaly_api::Contamination;

    fn sample() -> Vec<f64> {
        let mut data: Vec<f64> = (0..40).map(|i| 100.0 + i as f64).collect();
        data.push(5000.0);
        data
    }

    #[test]
    fn test_flags_sparse_value() {
        let data = sample();
        let mut strategy =
            LocalOutlierFactorStrategy::new(LocalOutlierFactorConfig::new(5, Contamination::Auto))
                .unwrap();
        strategy.fit(&data).unwrap();

        let result = strategy.detect(&data).unwrap();
        assert_eq!(result.anomaly_indices(), vec![40]);
        assert!(result.scores[40] > 15.0);
        assert!(result.scores[..40].iter().all(|&s| s < 2.0));
    }

    #[test]
    fn test_scores_reuse_fit_time_factors() {
        let data = sample();
        let mut strategy =
            LocalOutlierFactorStrategy::new(LocalOutlierFactorConfig::new(5, Contamination::Auto))
                .unwrap();
        strategy.fit(&data).unwrap();

        let expected: Vec<f64> = strategy
            .model()
            .negative_outlier_factor()
            .unwrap()
            .iter()
            .map(|v| -v)
            .collect();
        assert_eq!(strategy.score(&data).unwrap(), expected);
        assert_eq!(
            strategy.predict(&data).unwrap(),
            expected.iter().map(|&s| s > 15.0).collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_novel_sample_is_scored_without_refit() {
        let data = sample();
        let mut strategy =
            LocalOutlierFactorStrategy::new(LocalOutlierFactorConfig::new(5, Contamination::Auto))
                .unwrap();
        strategy.fit(&data).unwrap();

        let result = strategy.detect(&[120.5, 9000.0]).unwrap();
        assert_eq!(result.is_anomaly, vec![false, true]);
        assert_eq!(strategy.model().fit_sample(), Some(data.as_slice()));
    }

    #[test]
    fn test_too_few_rows_for_neighbourhood() {
        let mut strategy = LocalOutlierFactorStrategy::default();
        let err = strategy.fit(&[1.0, 2.0, 3.0]).unwrap_err();
        assert!(matches!(
            err,
            AnomalyError::InsufficientData { required: 21, got: 3 }
        ));
        assert!(!strategy.is_fitted());
    }

    #[test]
    fn test_invalid_config() {
        assert!(LocalOutlierFactorStrategy::new(LocalOutlierFactorConfig::new(
            0,
            Contamination::Auto
        ))
        .is_err());
    }

    #[test]
    fn test_not_fitted() {
        let strategy = LocalOutlierFactorStrategy::default();
        assert!(matches!(strategy.detect(&[1.0]), Err(AnomalyError::NotFitted)));
    }
}
