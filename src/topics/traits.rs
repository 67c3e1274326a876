// Clustering strategy trait.
//
// The adaptive policy in ClusterSelector decides *which* strategy to run;
// implementations only know how to partition a set of dense vectors.

use anyhow::Result;

use super::cluster::ClusterAssignment;

/// A clustering algorithm over dense, equal-length vectors.
pub trait ClusteringStrategy {
    /// Short name for logging.
    fn name(&self) -> &'static str;

    /// Assign every point a cluster label or mark it as noise.
    fn fit_predict(&self, points: &[Vec<f64>]) -> Result<ClusterAssignment>;
}
