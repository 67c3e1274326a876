// Keyword-overlap similarity between two topic descriptors.
//
// For the terms both topics share, we sum the smaller of the two weights and
// normalize by the geometric mean of each topic's total keyword weight:
//
//   sum(min(weight_a, weight_b)) / sqrt(sum(weight_a) * sum(weight_b))
//
// It behaves like cosine (identical topics score 1.0, disjoint ones 0.0) but
// works on the truncated top-n keyword lists rather than full vectors.

use std::collections::HashMap;

use crate::models::TopicDescriptor;

/// Similarity of two topics in [0, 1].
pub fn topic_similarity(a: &TopicDescriptor, b: &TopicDescriptor) -> f64 {
    let weights_a = keyword_weights(a);
    let weights_b = keyword_weights(b);
    overlap_from_weights(&weights_a, &weights_b)
}

/// Similarity from raw keyword weight maps.
///
/// Separated from `topic_similarity` so callers holding ad-hoc weight maps
/// don't have to build descriptors.
pub fn overlap_from_weights(
    weights_a: &HashMap<String, f64>,
    weights_b: &HashMap<String, f64>,
) -> f64 {
    let shared: f64 = weights_a
        .iter()
        .filter_map(|(term, &wa)| weights_b.get(term).map(|&wb| wa.min(wb)))
        .sum();
    if shared == 0.0 {
        return 0.0;
    }

    let total_a: f64 = weights_a.values().sum();
    let total_b: f64 = weights_b.values().sum();
    let denom = (total_a * total_b).sqrt();
    if !(denom > f64::EPSILON) {
        return 0.0;
    }

    (shared / denom).clamp(0.0, 1.0)
}

/// Full similarity matrix: rows are `current`, columns are `historical`.
pub fn similarity_matrix(
    current: &[TopicDescriptor],
    historical: &[TopicDescriptor],
) -> Vec<Vec<f64>> {
    let hist_weights: Vec<HashMap<String, f64>> = historical.iter().map(keyword_weights).collect();
    current
        .iter()
        .map(|c| {
            let cw = keyword_weights(c);
            hist_weights
                .iter()
                .map(|hw| overlap_from_weights(&cw, hw))
                .collect()
        })
        .collect()
}

/// A topic's keywords as a term -> weight map.
pub fn keyword_weights(topic: &TopicDescriptor) -> HashMap<String, f64> {
    topic.keywords.iter().cloned().collect()
}
