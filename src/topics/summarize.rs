// Topic summarization: one ranked keyword descriptor per cluster.
//
// Keywords come from the cluster centroid in the full TF-IDF space (not the
// reduced one), so they are real vocabulary terms with interpretable weights.

use tracing::debug;

use super::cluster::ClusterAssignment;
use super::vectorizer::TermDocumentMatrix;
use crate::models::TopicDescriptor;

#[derive(Debug, Clone)]
pub struct TopicSummarizer {
    /// Keywords kept per topic
    pub top_n: usize,
}

impl Default for TopicSummarizer {
    fn default() -> Self {
        Self { top_n: 5 }
    }
}

impl TopicSummarizer {
    /// Describe every non-noise cluster. Topic ids are the cluster labels,
    /// which ClusterSelector has already renumbered to 0..m.
    pub fn summarize(
        &self,
        matrix: &TermDocumentMatrix,
        assignment: &ClusterAssignment,
    ) -> Vec<TopicDescriptor> {
        assignment
            .cluster_labels()
            .into_iter()
            .map(|label| self.describe(matrix, label, &assignment.members(label)))
            .collect()
    }

    /// Build the descriptor for one cluster from its member documents.
    pub fn describe(
        &self,
        matrix: &TermDocumentMatrix,
        id: usize,
        members: &[usize],
    ) -> TopicDescriptor {
        if members.is_empty() {
            return TopicDescriptor {
                id,
                keywords: Vec::new(),
                size: 0,
            };
        }

        let mut centroid = vec![0.0; matrix.n_terms()];
        for &doc in members {
            for &(term, weight) in &matrix.rows[doc] {
                centroid[term] += weight;
            }
        }
        let count = members.len() as f64;
        for w in &mut centroid {
            *w /= count;
        }

        // Vocabulary is alphabetical, so the index tiebreak is alphabetical too
        let mut ranked: Vec<(usize, f64)> = centroid
            .into_iter()
            .enumerate()
            .filter(|&(_, w)| w > 0.0)
            .collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
        ranked.truncate(self.top_n);

        let keywords: Vec<(String, f64)> = ranked
            .into_iter()
            .map(|(term, w)| (matrix.vocabulary[term].clone(), w))
            .collect();

        debug!(
            topic = id,
            size = members.len(),
            top = keywords.first().map(|(t, _)| t.as_str()).unwrap_or(""),
            "Summarized topic"
        );

        TopicDescriptor {
            id,
            keywords,
            size: members.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matrix() -> TermDocumentMatrix {
        TermDocumentMatrix {
            vocabulary: vec!["alpha".into(), "beta".into(), "gamma".into()],
            rows: vec![
                vec![(0, 0.8), (1, 0.6)],
                vec![(0, 0.6), (1, 0.8)],
                vec![(2, 1.0)],
            ],
        }
    }

    #[test]
    fn centroid_keywords_sorted_descending() {
        let s = TopicSummarizer::default();
        let d = s.describe(&matrix(), 0, &[0, 1]);
        assert_eq!(d.size, 2);
        // alpha and beta tie at 0.7: alphabetical order breaks the tie
        assert_eq!(d.keywords.len(), 2);
        assert_eq!(d.keywords[0].0, "alpha");
        assert!((d.keywords[0].1 - 0.7).abs() < 1e-12);
        assert!(d.keywords.windows(2).all(|w| w[0].1 >= w[1].1));
    }

    #[test]
    fn top_n_truncates() {
        let s = TopicSummarizer { top_n: 1 };
        let d = s.describe(&matrix(), 3, &[0, 1, 2]);
        assert_eq!(d.id, 3);
        assert_eq!(d.keywords.len(), 1);
    }

    #[test]
    fn empty_cluster_has_no_keywords() {
        let d = TopicSummarizer::default().describe(&matrix(), 1, &[]);
        assert!(d.keywords.is_empty());
        assert_eq!(d.size, 0);
    }

    #[test]
    fn noise_documents_are_not_summarized() {
        let a = ClusterAssignment {
            labels: vec![Some(0), Some(0), None],
        };
        let topics = TopicSummarizer::default().summarize(&matrix(), &a);
        assert_eq!(topics.len(), 1);
        assert_eq!(topics[0].size, 2);
        assert!(topics[0].keywords.iter().all(|(t, _)| t != "gamma"));
    }
}
