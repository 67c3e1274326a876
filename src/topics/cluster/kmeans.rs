// K-means with k-means++ seeding and a fixed RNG seed.
//
// Several restarts are run from the same seeded generator and the partition
// with the lowest inertia wins, so the result is reproducible run to run.

use anyhow::Result;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::{squared_distance, validate_points, ClusterAssignment};
use crate::topics::traits::ClusteringStrategy;

#[derive(Debug, Clone)]
pub struct Kmeans {
    pub k: usize,
    pub seed: u64,
    /// Independent k-means++ initializations
    pub n_init: usize,
    pub max_iter: usize,
}

impl Kmeans {
    pub fn new(k: usize, seed: u64) -> Self {
        Self {
            k,
            seed,
            n_init: 10,
            max_iter: 300,
        }
    }

    /// Pick initial centers with D² weighting.
    fn init_centers(&self, points: &[Vec<f64>], rng: &mut StdRng) -> Vec<Vec<f64>> {
        let n = points.len();
        let mut centers = vec![points[rng.random_range(0..n)].clone()];

        while centers.len() < self.k {
            let d2: Vec<f64> = points
                .iter()
                .map(|p| {
                    centers
                        .iter()
                        .map(|c| squared_distance(p, c))
                        .fold(f64::INFINITY, f64::min)
                })
                .collect();
            let total: f64 = d2.iter().sum();

            let next = if total > 0.0 {
                let mut target = rng.random::<f64>() * total;
                let mut chosen = n - 1;
                for (i, &d) in d2.iter().enumerate() {
                    if target < d {
                        chosen = i;
                        break;
                    }
                    target -= d;
                }
                chosen
            } else {
                // All remaining points coincide with a center
                rng.random_range(0..n)
            };
            centers.push(points[next].clone());
        }
        centers
    }

    /// Run Lloyd iterations from the given centers. Returns labels and inertia.
    fn lloyd(&self, points: &[Vec<f64>], mut centers: Vec<Vec<f64>>) -> (Vec<usize>, f64) {
        let dim = points[0].len();
        let mut labels = vec![usize::MAX; points.len()];

        for _ in 0..self.max_iter {
            let mut changed = false;
            for (i, p) in points.iter().enumerate() {
                let nearest = nearest_center(p, &centers).0;
                if labels[i] != nearest {
                    labels[i] = nearest;
                    changed = true;
                }
            }
            if !changed {
                break;
            }

            let mut sums = vec![vec![0.0; dim]; self.k];
            let mut counts = vec![0usize; self.k];
            for (p, &l) in points.iter().zip(&labels) {
                counts[l] += 1;
                for (s, x) in sums[l].iter_mut().zip(p) {
                    *s += x;
                }
            }
            for (c, (sum, count)) in sums.into_iter().zip(counts).enumerate() {
                // An emptied cluster keeps its previous center
                if count > 0 {
                    centers[c] = sum.into_iter().map(|s| s / count as f64).collect();
                }
            }
        }

        let inertia = points
            .iter()
            .zip(&labels)
            .map(|(p, &l)| squared_distance(p, &centers[l]))
            .sum();
        (labels, inertia)
    }
}

/// Index of and squared distance to the closest center (lowest index on ties).
fn nearest_center(p: &[f64], centers: &[Vec<f64>]) -> (usize, f64) {
    centers
        .iter()
        .enumerate()
        .map(|(i, c)| (i, squared_distance(p, c)))
        .fold((0, f64::INFINITY), |best, cur| if cur.1 < best.1 { cur } else { best })
}

impl ClusteringStrategy for Kmeans {
    fn name(&self) -> &'static str {
        "kmeans"
    }

    fn fit_predict(&self, points: &[Vec<f64>]) -> Result<ClusterAssignment> {
        if self.k == 0 {
            anyhow::bail!("k-means needs at least one cluster");
        }
        if points.len() < self.k {
            anyhow::bail!(
                "k-means needs at least k={} points, got {}",
                self.k,
                points.len()
            );
        }
        validate_points(points)?;

        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut best: Option<(Vec<usize>, f64)> = None;

        for _ in 0..self.n_init.max(1) {
            let centers = self.init_centers(points, &mut rng);
            let (labels, inertia) = self.lloyd(points, centers);
            let improves = match &best {
                Some((_, best_inertia)) => inertia < *best_inertia,
                None => true,
            };
            if improves {
                best = Some((labels, inertia));
            }
        }

        let labels = best.map(|(l, _)| l).unwrap_or_default();
        Ok(ClusterAssignment {
            labels: labels.into_iter().map(Some).collect(),
        })
    }
}
