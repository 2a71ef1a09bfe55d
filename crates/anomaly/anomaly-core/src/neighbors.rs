//! Local outlier factor over one-dimensional samples.
//!
//! The model keeps the fit-time sample sorted so neighbourhoods are found by
//! walking outwards from a point's position, which is linear in `k` per
//! query. Fit-time factors are stored and exposed as
//! [`LocalOutlierFactor::negative_outlier_factor`]; new points are scored
//! against the fitted neighbourhoods without refitting.

use anomaly_spi::{AnomalyError, Result};

use crate::stats;

/// Native offset used with automatic contamination.
const AUTO_OFFSET: f64 = -1.5;

/// Guards the density of points whose neighbours are all duplicates.
const DENSITY_EPSILON: f64 = 1e-10;

#[derive(Debug, Clone)]
struct Fitted {
    /// Fit-time sample in input order.
    sample: Vec<f64>,
    /// Ascending copy of `sample`.
    sorted: Vec<f64>,
    /// Distance to the k-th neighbour, per sorted position.
    k_distance: Vec<f64>,
    /// Local reachability density, per sorted position.
    lrd: Vec<f64>,
    /// `-LOF` per row of `sample`.
    negative_outlier_factor: Vec<f64>,
    offset: f64,
}

/// k-nearest-neighbour local density model in novelty mode.
#[derive(Debug, Clone)]
pub struct LocalOutlierFactor {
    n_neighbors: usize,
    contamination: Option<f64>,
    fitted: Option<Fitted>,
}

impl LocalOutlierFactor {
    /// Create an unfitted model.
    pub fn new(n_neighbors: usize, contamination: Option<f64>) -> Self {
        Self {
            n_neighbors,
            contamination,
            fitted: None,
        }
    }

    pub fn n_neighbors(&self) -> usize {
        self.n_neighbors
    }

    /// Fit on `data`. Every point needs `n_neighbors` other points, so the
    /// sample must be strictly larger than `n_neighbors`.
    pub fn fit(&mut self, data: &[f64]) -> Result<()> {
        self.fitted = None;
        let k = self.n_neighbors;
        if k == 0 {
            return Err(AnomalyError::invalid_parameter(
                "n_neighbors",
                "must be at least 1",
            ));
        }
        if data.len() <= k {
            return Err(AnomalyError::InsufficientData {
                required: k + 1,
                got: data.len(),
            });
        }

        let mut order: Vec<usize> = (0..data.len()).collect();
        order.sort_by(|&a, &b| {
            data[a]
                .partial_cmp(&data[b])
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        let sorted: Vec<f64> = order.iter().map(|&i| data[i]).collect();

        let neighbourhoods: Vec<Vec<(usize, f64)>> = (0..sorted.len())
            .map(|i| k_nearest(&sorted, sorted[i], i, Some(i), k))
            .collect();

        let k_distance: Vec<f64> = neighbourhoods
            .iter()
            .map(|hood| hood.last().map(|&(_, d)| d).unwrap_or(0.0))
            .collect();

        let lrd: Vec<f64> = neighbourhoods
            .iter()
            .map(|hood| reachability_density(hood, &k_distance))
            .collect();

        let mut negative_outlier_factor = vec![0.0; data.len()];
        for (pos, hood) in neighbourhoods.iter().enumerate() {
            negative_outlier_factor[order[pos]] = -outlier_factor(hood, lrd[pos], &lrd);
        }

        let offset = match self.contamination {
            None => AUTO_OFFSET,
            Some(c) => stats::percentile(&stats::sorted(&negative_outlier_factor), 100.0 * c),
        };

        self.fitted = Some(Fitted {
            sample: data.to_vec(),
            sorted,
            k_distance,
            lrd,
            negative_outlier_factor,
            offset,
        });
        Ok(())
    }

    /// `-LOF` for every fit-time row, in fit order. More negative means a
    /// sparser neighbourhood.
    pub fn negative_outlier_factor(&self) -> Result<&[f64]> {
        self.fitted
            .as_ref()
            .map(|f| f.negative_outlier_factor.as_slice())
            .ok_or(AnomalyError::NotFitted)
    }

    /// The sample the model was fitted on.
    pub fn fit_sample(&self) -> Option<&[f64]> {
        self.fitted.as_ref().map(|f| f.sample.as_slice())
    }

    /// `-LOF` of new points relative to the fitted neighbourhoods.
    pub fn score_samples(&self, data: &[f64]) -> Result<Vec<f64>> {
        let fitted = self.fitted.as_ref().ok_or(AnomalyError::NotFitted)?;
        let k = self.n_neighbors;

        Ok(data
            .iter()
            .map(|&x| {
                let start = fitted.sorted.partition_point(|&v| v < x);
                let hood = k_nearest(&fitted.sorted, x, start, None, k);
                let density = reachability_density(&hood, &fitted.k_distance);
                -outlier_factor(&hood, density, &fitted.lrd)
            })
            .collect())
    }

    /// Native novelty flags: score below the contamination offset.
    pub fn predict(&self, data: &[f64]) -> Result<Vec<bool>> {
        let offset = self.offset()?;
        Ok(self
            .score_samples(data)?
            .into_iter()
            .map(|s| s < offset)
            .collect())
    }

    /// Score cut-off derived from the contamination setting.
    pub fn offset(&self) -> Result<f64> {
        self.fitted
            .as_ref()
            .map(|f| f.offset)
            .ok_or(AnomalyError::NotFitted)
    }

    pub fn is_fitted(&self) -> bool {
        self.fitted.is_some()
    }
}

/// The `k` values of `sorted` closest to `x`, nearest first, as
/// `(sorted position, distance)`. Candidates are taken outwards from
/// `start`, the first position not below `x`; `skip` excludes the query
/// point itself at fit time.
fn k_nearest(
    sorted: &[f64],
    x: f64,
    start: usize,
    skip: Option<usize>,
    k: usize,
) -> Vec<(usize, f64)> {
    let mut out = Vec::with_capacity(k);
    let mut left = start;
    let mut right = start;

    while out.len() < k {
        if right < sorted.len() && Some(right) == skip {
            right += 1;
            continue;
        }
        if left > 0 && Some(left - 1) == skip {
            left -= 1;
            continue;
        }

        let left_dist = (left > 0).then(|| (x - sorted[left - 1]).abs());
        let right_dist = (right < sorted.len()).then(|| (sorted[right] - x).abs());

        match (left_dist, right_dist) {
            (Some(l), Some(r)) if l <= r => {
                left -= 1;
                out.push((left, l));
            }
            (_, Some(r)) => {
                out.push((right, r));
                right += 1;
            }
            (Some(l), None) => {
                left -= 1;
                out.push((left, l));
            }
            (None, None) => break,
        }
    }
    out
}

fn reachability_density(hood: &[(usize, f64)], k_distance: &[f64]) -> f64 {
    if hood.is_empty() {
        return 0.0;
    }
    let mean_reach = hood
        .iter()
        .map(|&(o, d)| d.max(k_distance[o]))
        .sum::<f64>()
        / hood.len() as f64;
    1.0 / (mean_reach + DENSITY_EPSILON)
}

fn outlier_factor(hood: &[(usize, f64)], density: f64, lrd: &[f64]) -> f64 {
    if hood.is_empty() {
        return 1.0;
    }
    let neighbour_density = hood.iter().map(|&(o, _)| lrd[o]).sum::<f64>() / hood.len() as f64;
    neighbour_density / density
}
