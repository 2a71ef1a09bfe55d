//! Isolation forest over one-dimensional samples.
//!
//! Each tree isolates points by recursive random splits drawn uniformly
//! between the node's minimum and maximum. Points that need few splits to
//! end up alone are anomalous. Scores follow the usual convention of
//! `-2^(-E[h(x)] / c(psi))`, so they lie in `[-1, 0]` and lower means more
//! anomalous.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use anomaly_spi::{AnomalyError, Result};

use crate::stats;

const EULER_GAMMA: f64 = 0.577_215_664_901_532_9;

/// Rows drawn per tree when no explicit `max_samples` is set.
pub const DEFAULT_MAX_SAMPLES: usize = 256;

/// Native offset used with automatic contamination.
const AUTO_OFFSET: f64 = -0.5;

/// Average path length of an unsuccessful search in a binary search tree
/// of `n` nodes; normalises path lengths across sample sizes.
pub fn average_path_length(n: usize) -> f64 {
    match n {
        0 | 1 => 0.0,
        2 => 1.0,
        _ => {
            let n = n as f64;
            2.0 * ((n - 1.0).ln() + EULER_GAMMA) - 2.0 * (n - 1.0) / n
        }
    }
}

#[derive(Debug, Clone)]
enum Node {
    Leaf {
        size: usize,
    },
    Split {
        threshold: f64,
        left: Box<Node>,
        right: Box<Node>,
    },
}

impl Node {
    fn grow(values: Vec<f64>, depth: usize, height_limit: usize, rng: &mut ChaCha8Rng) -> Self {
        if depth >= height_limit || values.len() <= 1 {
            return Node::Leaf { size: values.len() };
        }

        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        if !(min < max) {
            return Node::Leaf { size: values.len() };
        }

        // Interpolated so that a span wider than f64::MAX stays finite.
        let u: f64 = rng.gen();
        let threshold = min * (1.0 - u) + max * u;
        let (left, right): (Vec<f64>, Vec<f64>) = values.into_iter().partition(|&v| v <= threshold);

        Node::Split {
            threshold,
            left: Box::new(Node::grow(left, depth + 1, height_limit, rng)),
            right: Box::new(Node::grow(right, depth + 1, height_limit, rng)),
        }
    }

    fn path_length(&self, x: f64) -> f64 {
        let mut node = self;
        let mut depth = 0.0;
        loop {
            match node {
                Node::Leaf { size } => return depth + average_path_length(*size),
                Node::Split {
                    threshold,
                    left,
                    right,
                } => {
                    node = if x <= *threshold { left } else { right };
                    depth += 1.0;
                }
            }
        }
    }
}

/// Randomised isolation ensemble.
///
/// Fitting is deterministic for a given seed: two fits on equal data grow
/// identical trees.
#[derive(Debug, Clone)]
pub struct IsolationForest {
    n_estimators: usize,
    max_samples: Option<usize>,
    contamination: Option<f64>,
    seed: u64,
    trees: Vec<Node>,
    sample_size: usize,
    offset: f64,
}

impl IsolationForest {
    /// Create an unfitted forest.
    ///
    /// # Arguments
    ///
    /// * `n_estimators` - Number of trees
    /// * `max_samples` - Rows per tree, `None` for `min(256, n)`
    /// * `contamination` - Expected anomaly share, `None` for automatic
    /// * `seed` - Sampler seed
    pub fn new(
        n_estimators: usize,
        max_samples: Option<usize>,
        contamination: Option<f64>,
        seed: u64,
    ) -> Self {
        Self {
            n_estimators,
            max_samples,
            contamination,
            seed,
            trees: Vec::new(),
            sample_size: 0,
            offset: AUTO_OFFSET,
        }
    }

    /// Grow the ensemble on `data`. Requires at least two points, all
    /// finite.
    pub fn fit(&mut self, data: &[f64]) -> Result<()> {
        self.trees.clear();
        if data.len() < 2 {
            return Err(AnomalyError::InsufficientData {
                required: 2,
                got: data.len(),
            });
        }
        if let Some(bad) = data.iter().find(|v| !v.is_finite()) {
            return Err(AnomalyError::DetectionError(format!(
                "cannot isolate non-finite value {}",
                bad
            )));
        }
        if self.n_estimators == 0 {
            return Err(AnomalyError::invalid_parameter(
                "n_estimators",
                "must be at least 1",
            ));
        }

        let n = data.len();
        let sample_size = self
            .max_samples
            .unwrap_or(DEFAULT_MAX_SAMPLES)
            .min(n)
            .max(2);
        let height_limit = (sample_size as f64).log2().ceil() as usize;

        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        self.trees = (0..self.n_estimators)
            .map(|_| {
                let subsample: Vec<f64> = rand::seq::index::sample(&mut rng, n, sample_size)
                    .iter()
                    .map(|i| data[i])
                    .collect();
                Node::grow(subsample, 0, height_limit, &mut rng)
            })
            .collect();
        self.sample_size = sample_size;

        self.offset = match self.contamination {
            None => AUTO_OFFSET,
            Some(c) => {
                let scores = stats::sorted(&self.score_samples(data)?);
                stats::percentile(&scores, 100.0 * c)
            }
        };
        Ok(())
    }

    /// Anomaly score per value; lower is more anomalous.
    pub fn score_samples(&self, data: &[f64]) -> Result<Vec<f64>> {
        if !self.is_fitted() {
            return Err(AnomalyError::NotFitted);
        }

        let normaliser = average_path_length(self.sample_size);
        let trees = self.trees.len() as f64;
        Ok(data
            .iter()
            .map(|&x| {
                let mean_path = self.trees.iter().map(|t| t.path_length(x)).sum::<f64>() / trees;
                -(2f64).powf(-mean_path / normaliser)
            })
            .collect())
    }

    /// Native outlier flags: score below the contamination offset.
    pub fn predict(&self, data: &[f64]) -> Result<Vec<bool>> {
        Ok(self
            .score_samples(data)?
            .into_iter()
            .map(|s| s < self.offset)
            .collect())
    }

    /// Score cut-off derived from the contamination setting.
    pub fn offset(&self) -> f64 {
        self.offset
    }

    /// Rows drawn per tree in the last fit.
    pub fn sample_size(&self) -> usize {
        self.sample_size
    }

    pub fn is_fitted(&self) -> bool {
        !self.trees.is_empty()
    }
}
