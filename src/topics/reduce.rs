// Dimensionality reduction: truncated SVD over the TF-IDF matrix.
//
// With up to 1000 vocabulary columns and a few dozen documents, distances in
// the raw space are dominated by sparsity. Projecting onto the top singular
// directions keeps clustering tractable and less noisy.
//
// We never form the SVD of X directly. For N documents the Gram matrix
// G = X·Xᵀ is only N×N, and its eigenpairs (λ, u) give the document
// projections U·Σ with Σ = sqrt(λ). A cyclic Jacobi sweep is exact enough
// for matrices this small and fully deterministic.

use tracing::debug;

use super::vectorizer::TermDocumentMatrix;

/// Eigenvalues at or below this are treated as zero (rank deficiency).
const EIGEN_EPSILON: f64 = 1e-12;

const MAX_SWEEPS: usize = 100;

#[derive(Debug, Clone)]
pub struct DimensionalityReducer {
    /// Reduce only when the vocabulary is larger than this
    pub vocabulary_threshold: usize,
    /// Upper bound on output dimensions (further capped at N - 1)
    pub max_components: usize,
}

impl Default for DimensionalityReducer {
    fn default() -> Self {
        Self {
            vocabulary_threshold: 100,
            max_components: 50,
        }
    }
}

impl DimensionalityReducer {
    /// Produce dense document vectors for clustering.
    pub fn reduce(&self, matrix: &TermDocumentMatrix) -> Vec<Vec<f64>> {
        let n = matrix.n_docs();
        if matrix.n_terms() <= self.vocabulary_threshold || n < 2 {
            return matrix.to_dense();
        }

        let k = self.max_components.min(n - 1);
        let reduced = truncated_svd(matrix, k);
        debug!(
            documents = n,
            terms = matrix.n_terms(),
            components = reduced.first().map_or(0, Vec::len),
            "Reduced TF-IDF matrix"
        );
        reduced
    }
}

/// Project documents onto the top `k` singular directions (rows of U·Σ).
pub fn truncated_svd(matrix: &TermDocumentMatrix, k: usize) -> Vec<Vec<f64>> {
    let n = matrix.n_docs();
    let mut gram = vec![vec![0.0; n]; n];
    for i in 0..n {
        for j in i..n {
            let dot = matrix.row_dot(i, j);
            gram[i][j] = dot;
            gram[j][i] = dot;
        }
    }

    let (values, vectors) = symmetric_eigen(gram);

    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| values[b].total_cmp(&values[a]));
    let components: Vec<usize> = order
        .into_iter()
        .filter(|&c| values[c] > EIGEN_EPSILON)
        .take(k)
        .collect();

    (0..n)
        .map(|doc| {
            components
                .iter()
                .map(|&c| vectors[doc][c] * values[c].sqrt())
                .collect()
        })
        .collect()
}

/// Eigen-decompose a symmetric matrix with cyclic Jacobi rotations.
///
/// Returns the eigenvalues and the eigenvector matrix, where column `c` of
/// the second value is the eigenvector for eigenvalue `c`.
pub fn symmetric_eigen(mut a: Vec<Vec<f64>>) -> (Vec<f64>, Vec<Vec<f64>>) {
    let n = a.len();
    let mut v = vec![vec![0.0; n]; n];
    for (i, row) in v.iter_mut().enumerate() {
        row[i] = 1.0;
    }

    for _ in 0..MAX_SWEEPS {
        let off: f64 = (0..n)
            .flat_map(|p| (p + 1..n).map(move |q| (p, q)))
            .map(|(p, q)| a[p][q] * a[p][q])
            .sum();
        if off < 1e-22 {
            break;
        }

        for p in 0..n {
            for q in p + 1..n {
                if a[p][q].abs() < 1e-300 {
                    continue;
                }
                let theta = (a[q][q] - a[p][p]) / (2.0 * a[p][q]);
                let t = theta.signum() / (theta.abs() + (theta * theta + 1.0).sqrt());
                let c = 1.0 / (t * t + 1.0).sqrt();
                let s = t * c;

                for row in a.iter_mut() {
                    let (akp, akq) = (row[p], row[q]);
                    row[p] = c * akp - s * akq;
                    row[q] = s * akp + c * akq;
                }
                for k in 0..n {
                    let (apk, aqk) = (a[p][k], a[q][k]);
                    a[p][k] = c * apk - s * aqk;
                    a[q][k] = s * apk + c * aqk;
                }
                for row in v.iter_mut() {
                    let (vkp, vkq) = (row[p], row[q]);
                    row[p] = c * vkp - s * vkq;
                    row[q] = s * vkp + c * vkq;
                }
            }
        }
    }

    let values = (0..n).map(|i| a[i][i]).collect();
    (values, v)
}
