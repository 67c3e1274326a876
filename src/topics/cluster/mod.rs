// Cluster selection: picks a clustering strategy for the batch and runs it.
//
// Density-based clustering finds the number of topics on its own and leaves
// one-off stories as noise, which is what we want on a good hour. On sparse,
// high-dimensional text it often degrades into "everything is noise" because
// most points look equidistant; when that happens we fall back to k-means
// with a small bounded k so the report always has a usable partition.

mod dbscan;
mod kmeans;

pub use dbscan::Dbscan;
pub use kmeans::Kmeans;

use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, info, warn};

use super::traits::ClusteringStrategy;

/// Per-document cluster labels. `None` marks a noise point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterAssignment {
    pub labels: Vec<Option<usize>>,
}

impl ClusterAssignment {
    /// Every document in cluster 0.
    pub fn single(n: usize) -> Self {
        Self {
            labels: vec![Some(0); n],
        }
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn noise_count(&self) -> usize {
        self.labels.iter().filter(|l| l.is_none()).count()
    }

    /// Fraction of documents labelled as noise (0.0 for an empty set).
    pub fn noise_ratio(&self) -> f64 {
        if self.labels.is_empty() {
            0.0
        } else {
            self.noise_count() as f64 / self.labels.len() as f64
        }
    }

    /// Distinct non-noise labels in ascending order.
    pub fn cluster_labels(&self) -> Vec<usize> {
        self.labels
            .iter()
            .flatten()
            .copied()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Indices of the documents carrying `label`.
    pub fn members(&self, label: usize) -> Vec<usize> {
        self.labels
            .iter()
            .enumerate()
            .filter(|(_, l)| **l == Some(label))
            .map(|(i, _)| i)
            .collect()
    }

    /// Relabel clusters to 0..m in ascending order of their original label,
    /// dropping gaps left by empty clusters. Noise stays noise.
    pub fn renumbered(&self) -> Self {
        let mapping: BTreeMap<usize, usize> = self
            .cluster_labels()
            .into_iter()
            .enumerate()
            .map(|(new, old)| (old, new))
            .collect();
        Self {
            labels: self
                .labels
                .iter()
                .map(|l| l.and_then(|old| mapping.get(&old).copied()))
                .collect(),
        }
    }
}

/// Adaptive clustering policy.
#[derive(Debug, Clone)]
pub struct ClusterSelector {
    /// DBSCAN neighborhood radius
    pub eps: f64,
    /// DBSCAN minimum neighborhood size (a point counts itself)
    pub min_samples: usize,
    /// Discard DBSCAN output when more than this fraction is noise
    pub max_noise_ratio: f64,
    /// Bounds on the fallback k-means cluster count
    pub min_k: usize,
    pub max_k: usize,
    /// Fixed seed for reproducible k-means runs
    pub seed: u64,
}

impl Default for ClusterSelector {
    fn default() -> Self {
        Self {
            eps: 0.5,
            min_samples: 2,
            max_noise_ratio: 0.5,
            min_k: 3,
            max_k: 7,
            seed: 42,
        }
    }
}

impl ClusterSelector {
    /// Cluster count used when DBSCAN is rejected: N/3 clamped to [min_k, max_k].
    pub fn fallback_k(&self, n: usize) -> usize {
        (n / 3).clamp(self.min_k, self.max_k)
    }

    /// Cluster the points. Returns `None` when no strategy produced a
    /// usable partition; the caller falls back to a single topic.
    ///
    /// Labels in the returned assignment are renumbered to 0..m.
    pub fn select(
        &self,
        points: &[Vec<f64>],
        requested_k: Option<usize>,
    ) -> Option<ClusterAssignment> {
        if let Some(k) = requested_k {
            return self.run(&Kmeans::new(k, self.seed), points);
        }

        let dbscan = Dbscan::new(self.eps, self.min_samples);
        match dbscan.fit_predict(points) {
            Ok(assignment) if assignment.noise_ratio() <= self.max_noise_ratio => {
                info!(
                    clusters = assignment.cluster_labels().len(),
                    noise = assignment.noise_count(),
                    "Density-based clustering accepted"
                );
                return Some(assignment.renumbered());
            }
            Ok(assignment) => {
                debug!(
                    noise_ratio = assignment.noise_ratio(),
                    "Density-based clustering too noisy, falling back to k-means"
                );
            }
            Err(e) => {
                warn!(error = %e, "Density-based clustering failed, falling back to k-means");
            }
        }

        let k = self.fallback_k(points.len());
        self.run(&Kmeans::new(k, self.seed), points)
    }

    fn run(&self, strategy: &dyn ClusteringStrategy, points: &[Vec<f64>]) -> Option<ClusterAssignment> {
        match strategy.fit_predict(points) {
            Ok(assignment) => {
                info!(
                    strategy = strategy.name(),
                    clusters = assignment.cluster_labels().len(),
                    "Clustering complete"
                );
                Some(assignment.renumbered())
            }
            Err(e) => {
                warn!(strategy = strategy.name(), error = %e, "Clustering failed");
                None
            }
        }
    }
}

/// Squared Euclidean distance.
pub(crate) fn squared_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum()
}

/// Reject empty-dimensional, ragged or non-finite input.
pub(crate) fn validate_points(points: &[Vec<f64>]) -> anyhow::Result<()> {
    let Some(first) = points.first() else {
        return Ok(());
    };
    let dim = first.len();
    for (i, p) in points.iter().enumerate() {
        if p.len() != dim {
            anyhow::bail!("point {i} has {} dimensions, expected {dim}", p.len());
        }
        if p.iter().any(|x| !x.is_finite()) {
            anyhow::bail!("point {i} contains a non-finite value");
        }
    }
    Ok(())
}
