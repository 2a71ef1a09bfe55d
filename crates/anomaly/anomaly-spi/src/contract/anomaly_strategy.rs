//! Anomaly strategy trait definition.

use std::collections::BTreeMap;

use crate::error::Result;
use crate::model::AnomalyResult;

/// A single-column anomaly detection algorithm.
///
/// Strategies are stateful: `fit` overwrites whatever an earlier `fit`
/// left behind, and `detect`, `predict` and `score` read that state.
/// Flags and scores are always derived from the one computation done in
/// [`detect`](AnomalyStrategy::detect), so `predict` and `score` can
/// never disagree for the same fitted state.
///
/// A strategy must not be shared between columns processed concurrently;
/// use [`clone_box`](AnomalyStrategy::clone_box) to give each column its
/// own instance.
pub trait AnomalyStrategy: Send + Sync {
    /// Identifying name, used for annotation columns and summaries.
    fn name(&self) -> &'static str;

    /// Configuration parameters reported in summary records.
    fn params(&self) -> BTreeMap<String, String> {
        BTreeMap::new()
    }

    /// Fit the strategy to a sample.
    fn fit(&mut self, sample: &[f64]) -> Result<()>;

    /// Compute flags and scores for a sample in one pass.
    fn detect(&self, sample: &[f64]) -> Result<AnomalyResult>;

    /// Anomaly flag for each value.
    fn predict(&self, sample: &[f64]) -> Result<Vec<bool>> {
        Ok(self.detect(sample)?.is_anomaly)
    }

    /// Continuous anomaly score for each value.
    fn score(&self, sample: &[f64]) -> Result<Vec<f64>> {
        Ok(self.detect(sample)?.scores)
    }

    /// Check if the strategy has been fitted.
    fn is_fitted(&self) -> bool;

    /// Clone into a fresh boxed instance carrying the same configuration
    /// and fitted state.
    fn clone_box(&self) -> Box<dyn AnomalyStrategy>;
}

impl Clone for Box<dyn AnomalyStrategy> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

impl std::fmt::Debug for dyn AnomalyStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnomalyStrategy")
            .field("name", &self.name())
            .field("params", &self.params())
            .field("fitted", &self.is_fitted())
            .finish()
    }
}
