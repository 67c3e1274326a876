// Trend classification: compare this hour's topics with the previous hour's.
//
// Matching is greedy and independent per current topic: each current topic
// looks for its single most similar historical topic. Two current topics may
// therefore claim the same historical topic; both are reported as
// continuing, and the historical topic leaves the fading set once.

use tracing::{debug, info};

use super::similarity::similarity_matrix;
use crate::models::{TopicDescriptor, TrendRecord};

#[derive(Debug, Clone)]
pub struct TrendClassifier {
    /// Minimum similarity for a topic to count as continuing
    pub threshold: f64,
}

impl Default for TrendClassifier {
    fn default() -> Self {
        Self { threshold: 0.3 }
    }
}

impl TrendClassifier {
    /// Classify current topics against the previous bucket's topics.
    ///
    /// Records come out as one Emerging/Continuing per current topic in
    /// input order, followed by Fading records in historical order.
    pub fn classify(
        &self,
        current: &[TopicDescriptor],
        historical: &[TopicDescriptor],
    ) -> Vec<TrendRecord> {
        if historical.is_empty() || current.is_empty() {
            debug!(
                current = current.len(),
                historical = historical.len(),
                "Nothing to match, current topics are emerging"
            );
            return current
                .iter()
                .map(|t| TrendRecord::Emerging { topic: t.id })
                .collect();
        }

        let matrix = similarity_matrix(current, historical);
        let mut still_fading = vec![true; historical.len()];
        let mut records = Vec::with_capacity(current.len() + historical.len());

        for (topic, row) in current.iter().zip(&matrix) {
            // Strictly greater keeps the first historical topic on ties
            let mut best: Option<(usize, f64)> = None;
            for (j, &sim) in row.iter().enumerate() {
                if sim > best.map_or(0.0, |(_, s)| s) {
                    best = Some((j, sim));
                }
            }

            match best {
                Some((j, similarity)) if similarity >= self.threshold => {
                    still_fading[j] = false;
                    records.push(TrendRecord::Continuing {
                        topic: topic.id,
                        historical: historical[j].id,
                        similarity,
                    });
                }
                _ => records.push(TrendRecord::Emerging { topic: topic.id }),
            }
        }

        records.extend(
            historical
                .iter()
                .zip(still_fading)
                .filter(|(_, fading)| *fading)
                .map(|(h, _)| TrendRecord::Fading { historical: h.id }),
        );

        let continuing = records
            .iter()
            .filter(|r| matches!(r, TrendRecord::Continuing { .. }))
            .count();
        info!(
            current = current.len(),
            historical = historical.len(),
            continuing,
            "Classified topic trends"
        );

        records
    }
}
