//! Isolation forest strategy.

use std::collections::BTreeMap;

use anomaly_api::IsolationForestConfig;
use anomaly_spi::{AnomalyError, AnomalyResult, AnomalyStrategy, Result};

use crate::forest::IsolationForest;

/// Ensemble isolation strategy.
///
/// Scores are the forest's raw `score_samples` output: values in `[-1, 0]`
/// where more negative means easier to isolate. Rows scoring below
/// `score_threshold` are flagged. The forest's own contamination offset is
/// not used for flagging.
///
/// Scores are on a different scale and orientation than the statistical
/// strategies and must not be compared with them directly.
#[derive(Debug, Clone)]
pub struct IsolationForestStrategy {
    config: IsolationForestConfig,
    forest: IsolationForest,
}

impl IsolationForestStrategy {
    pub fn new(config: IsolationForestConfig) -> Result<Self> {
        config.validate()?;
        let forest = IsolationForest::new(
            config.n_estimators,
            config.max_samples,
            config.contamination.fraction(),
            config.seed,
        );
        Ok(Self { config, forest })
    }

    pub fn config(&self) -> &IsolationForestConfig {
        &self.config
    }

    /// The fitted forest.
    pub fn forest(&self) -> &IsolationForest {
        &self.forest
    }
}

impl Default for IsolationForestStrategy {
    fn default() -> Self {
        let config = IsolationForestConfig::default();
        let forest = IsolationForest::new(
            config.n_estimators,
            config.max_samples,
            config.contamination.fraction(),
            config.seed,
        );
        Self { config, forest }
    }
}

impl AnomalyStrategy for IsolationForestStrategy {
    fn name(&self) -> &'static str {
        "IsolationForest"
    }

    fn params(&self) -> BTreeMap<String, String> {
        let mut params = BTreeMap::from([
            ("n_estimators".to_string(), self.config.n_estimators.to_string()),
            ("contamination".to_string(), self.config.contamination.to_string()),
            ("seed".to_string(), self.config.seed.to_string()),
            (
                "score_threshold".to_string(),
                self.config.score_threshold.to_string(),
            ),
        ]);
        if let Some(max_samples) = self.config.max_samples {
            params.insert("max_samples".to_string(), max_samples.to_string());
        }
        params
    }

    fn fit(&mut self, sample: &[f64]) -> Result<()> {
        self.forest.fit(sample)
    }

    fn detect(&self, sample: &[f64]) -> Result<AnomalyResult> {
        if !self.forest.is_fitted() {
            return Err(AnomalyError::NotFitted);
        }

        let scores = self.forest.score_samples(sample)?;
        let threshold = self.config.score_threshold;
        Ok(AnomalyResult::from_scores(scores, threshold, |s| s < threshold))
    }

    fn is_fitted(&self) -> bool {
        self.forest.is_fitted()
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
        let mut data: Vec<f64> = (0..200).map(|i| 50.0 + ((i * 37) % 21) as f64 * 0.5).collect();
        data.push(400.0);
        data
    }

    #[test]
    fn test_flags_isolated_value() {
        let data = sample();
        let mut strategy = IsolationForestStrategy::default();
        strategy.fit(&data).unwrap();

        let result = strategy.detect(&data).unwrap();
        assert!(result.is_anomaly[200]);
        assert!(result.scores[200] < -0.82);
        assert!(result.anomaly_count() < 10);
    }

    #[test]
    fn test_refit_is_idempotent() {
        let data = sample();
        let mut strategy = IsolationForestStrategy::new(
            IsolationForestConfig::new(50, Contamination::Auto).with_seed(3),
        )
        .unwrap();
        strategy.fit(&data).unwrap();
        let first = strategy.detect(&data).unwrap();
        strategy.fit(&data).unwrap();
        let second = strategy.detect(&data).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_flags_follow_score_threshold() {
        let data = sample();
        let mut strategy = IsolationForestStrategy::new(
            IsolationForestConfig::default().with_score_threshold(-0.5),
        )
        .unwrap();
        strategy.fit(&data).unwrap();
        let flags = strategy.predict(&data).unwrap();
        let scores = strategy.score(&data).unwrap();
        for (flag, score) in flags.iter().zip(&scores) {
            assert_eq!(*flag, *score < -0.5);
        }
    }

    #[test]
    fn test_invalid_config() {
        assert!(IsolationForestStrategy::new(IsolationForestConfig::new(0, Contamination::Auto)).is_err());
        assert!(IsolationForestStrategy::new(IsolationForestConfig::new(
            10,
            Contamination::Fraction(0.9)
        ))
        .is_err());
    }

    #[test]
    fn test_params_report_configuration() {
        let strategy = IsolationForestStrategy::default();
        let params = strategy.params();
        assert_eq!(params["n_estimators"], "100");
        assert_eq!(params["contamination"], "auto");
        assert_eq!(params["score_threshold"], "-0.82");
        assert!(!params.contains_key("max_samples"));
    }
}
