//! Anomaly detection result types.

use serde::{Deserialize, Serialize};

/// Flags and scores produced by one strategy over one sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnomalyResult {
    /// Boolean mask indicating anomalies.
    pub is_anomaly: Vec<bool>,
    /// Anomaly scores for each point.
    pub scores: Vec<f64>,
    /// Threshold used for detection.
    pub threshold: f64,
}

impl AnomalyResult {
    /// Create a new anomaly result.
    pub fn new(is_anomaly: Vec<bool>, scores: Vec<f64>, threshold: f64) -> Self {
        Self {
            is_anomaly,
            scores,
            threshold,
        }
    }

    /// Derive flags from scores with a single predicate, so a flag can never
    /// disagree with the score it came from.
    pub fn from_scores(scores: Vec<f64>, threshold: f64, flag: impl Fn(f64) -> bool) -> Self {
        let is_anomaly = scores.iter().map(|&s| flag(s)).collect();
        Self::new(is_anomaly, scores, threshold)
    }

    /// Get indices of detected anomalies.
    pub fn anomaly_indices(&self) -> Vec<usize> {
        self.is_anomaly
            .iter()
            .enumerate()
            .filter_map(|(i, &is_anomaly)| if is_anomaly { Some(i) } else { None })
            .collect()
    }

    /// Count of detected anomalies.
    pub fn anomaly_count(&self) -> usize {
        self.is_anomaly.iter().filter(|&&x| x).count()
    }

    /// Number of scored points.
    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_scores_flags_match_predicate() {
        let result = AnomalyResult::from_scores(vec![0.5, 3.5, 3.0, 4.0], 3.0, |s| s > 3.0);
        assert_eq!(result.is_anomaly, vec![false, true, false, true]);
        assert_eq!(result.anomaly_indices(), vec![1, 3]);
        assert_eq!(result.anomaly_count(), 2);
        assert_eq!(result.len(), 4);
    }

    #[test]
    fn test_empty_result() {
        let result = AnomalyResult::new(vec![], vec![], 1.5);
        assert!(result.is_empty());
        assert_eq!(result.anomaly_count(), 0);
    }
}
