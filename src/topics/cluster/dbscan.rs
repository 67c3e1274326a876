// DBSCAN over dense vectors with Euclidean distance.

use std::collections::VecDeque;

use anyhow::Result;

use super::{squared_distance, validate_points, ClusterAssignment};
use crate::topics::traits::ClusteringStrategy;

#[derive(Debug, Clone)]
pub struct Dbscan {
    /// Neighborhood radius (inclusive)
    pub eps: f64,
    /// Points needed within `eps`, counting the point itself, to be a core point
    pub min_samples: usize,
}

impl Dbscan {
    pub fn new(eps: f64, min_samples: usize) -> Self {
        Self { eps, min_samples }
    }

    fn neighbors(&self, points: &[Vec<f64>], i: usize) -> Vec<usize> {
        let eps2 = self.eps * self.eps;
        (0..points.len())
            .filter(|&j| squared_distance(&points[i], &points[j]) <= eps2)
            .collect()
    }
}

impl ClusteringStrategy for Dbscan {
    fn name(&self) -> &'static str {
        "dbscan"
    }

    fn fit_predict(&self, points: &[Vec<f64>]) -> Result<ClusterAssignment> {
        if !(self.eps.is_finite() && self.eps > 0.0) {
            anyhow::bail!("DBSCAN eps must be positive, got {}", self.eps);
        }
        if self.min_samples == 0 {
            anyhow::bail!("DBSCAN min_samples must be at least 1");
        }
        validate_points(points)?;

        let n = points.len();
        let neighborhoods: Vec<Vec<usize>> = (0..n).map(|i| self.neighbors(points, i)).collect();
        let is_core: Vec<bool> = neighborhoods
            .iter()
            .map(|nb| nb.len() >= self.min_samples)
            .collect();

        let mut labels: Vec<Option<usize>> = vec![None; n];
        let mut next_label = 0;

        for seed in 0..n {
            if labels[seed].is_some() || !is_core[seed] {
                continue;
            }

            let label = next_label;
            next_label += 1;
            labels[seed] = Some(label);

            let mut queue: VecDeque<usize> = neighborhoods[seed].iter().copied().collect();
            while let Some(p) = queue.pop_front() {
                if labels[p].is_some() {
                    continue;
                }
                labels[p] = Some(label);
                // Border points join the cluster but don't extend it
                if is_core[p] {
                    queue.extend(neighborhoods[p].iter().copied().filter(|&q| labels[q].is_none()));
                }
            }
        }

        Ok(ClusterAssignment { labels })
    }
}
