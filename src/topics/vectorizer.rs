// TF-IDF vector space over unigrams and bigrams.
//
// Each processed item is one document. Terms must appear in at least
// `min_df` documents (a word that shows up once can't tie two stories
// together) and in no more than `max_df` of them (a word in every story
// can't tell them apart). The surviving vocabulary is capped at
// `max_features` by corpus frequency to keep memory flat on small hosts.

use std::collections::HashMap;

use tracing::debug;

use crate::models::ProcessedDocument;

/// A row-sparse, L2-normalized TF-IDF matrix.
#[derive(Debug, Clone)]
pub struct TermDocumentMatrix {
    /// Terms in alphabetical order; column index = position
    pub vocabulary: Vec<String>,
    /// One row per document: (term index, weight), sorted by term index
    pub rows: Vec<Vec<(usize, f64)>>,
}

impl TermDocumentMatrix {
    pub fn n_docs(&self) -> usize {
        self.rows.len()
    }

    pub fn n_terms(&self) -> usize {
        self.vocabulary.len()
    }

    /// Expand one row into a dense vector over the full vocabulary.
    pub fn dense_row(&self, doc: usize) -> Vec<f64> {
        let mut out = vec![0.0; self.n_terms()];
        for &(term, weight) in &self.rows[doc] {
            out[term] = weight;
        }
        out
    }

    pub fn to_dense(&self) -> Vec<Vec<f64>> {
        (0..self.n_docs()).map(|d| self.dense_row(d)).collect()
    }

    /// Dot product of two rows.
    pub fn row_dot(&self, a: usize, b: usize) -> f64 {
        let (ra, rb) = (&self.rows[a], &self.rows[b]);
        let (mut i, mut j, mut sum) = (0, 0, 0.0);
        while i < ra.len() && j < rb.len() {
            match ra[i].0.cmp(&rb[j].0) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    sum += ra[i].1 * rb[j].1;
                    i += 1;
                    j += 1;
                }
            }
        }
        sum
    }
}

/// Builds TF-IDF matrices from normalized documents.
#[derive(Debug, Clone)]
pub struct VectorSpaceBuilder {
    pub max_features: usize,
    /// Minimum number of documents a term must appear in
    pub min_df: usize,
    /// Maximum fraction of documents a term may appear in
    pub max_df: f64,
}

impl Default for VectorSpaceBuilder {
    fn default() -> Self {
        Self {
            max_features: 1000,
            min_df: 2,
            max_df: 0.8,
        }
    }
}

impl VectorSpaceBuilder {
    /// Build the weighted term-document matrix.
    ///
    /// Returns `None` when no term survives the document-frequency bounds
    /// (every document normalized to nothing, or nothing is shared). The
    /// caller is expected to degrade to a single keyword-less topic.
    pub fn build(&self, docs: &[ProcessedDocument]) -> Option<TermDocumentMatrix> {
        let n = docs.len();
        if n == 0 {
            return None;
        }

        let doc_counts: Vec<HashMap<String, usize>> =
            docs.iter().map(|d| term_counts(&d.tokens)).collect();

        // Document frequency and corpus frequency per term
        let mut df: HashMap<&str, usize> = HashMap::new();
        let mut corpus_tf: HashMap<&str, usize> = HashMap::new();
        for counts in &doc_counts {
            for (term, &count) in counts {
                *df.entry(term.as_str()).or_insert(0) += 1;
                *corpus_tf.entry(term.as_str()).or_insert(0) += count;
            }
        }

        let max_doc_count = self.max_df * n as f64;
        let mut kept: Vec<&str> = df
            .iter()
            .filter(|&(_, &d)| d >= self.min_df && d as f64 <= max_doc_count)
            .map(|(&term, _)| term)
            .collect();

        if kept.len() > self.max_features {
            kept.sort_by(|a, b| corpus_tf[b].cmp(&corpus_tf[a]).then_with(|| a.cmp(b)));
            kept.truncate(self.max_features);
        }

        if kept.is_empty() {
            debug!(documents = n, "No terms survived document-frequency bounds");
            return None;
        }

        kept.sort_unstable();
        let index: HashMap<&str, usize> = kept.iter().enumerate().map(|(i, &t)| (t, i)).collect();

        // Smoothed idf: ln((1 + n) / (1 + df)) + 1
        let idf: Vec<f64> = kept
            .iter()
            .map(|t| ((1.0 + n as f64) / (1.0 + df[t] as f64)).ln() + 1.0)
            .collect();

        let rows = doc_counts
            .iter()
            .map(|counts| {
                let mut row: Vec<(usize, f64)> = counts
                    .iter()
                    .filter_map(|(term, &count)| {
                        index
                            .get(term.as_str())
                            .map(|&i| (i, count as f64 * idf[i]))
                    })
                    .collect();
                row.sort_unstable_by_key(|&(i, _)| i);

                let norm = row.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
                if norm > 0.0 {
                    for (_, w) in &mut row {
                        *w /= norm;
                    }
                }
                row
            })
            .collect();

        let vocabulary: Vec<String> = kept.iter().map(|t| t.to_string()).collect();
        debug!(
            documents = n,
            terms = vocabulary.len(),
            "Built TF-IDF matrix"
        );

        Some(TermDocumentMatrix { vocabulary, rows })
    }
}

/// Count unigrams and adjacent-token bigrams in one document.
fn term_counts(tokens: &[String]) -> HashMap<String, usize> {
    let mut counts = HashMap::new();
    for token in tokens {
        *counts.entry(token.clone()).or_insert(0) += 1;
    }
    for pair in tokens.windows(2) {
        *counts.entry(format!("{} {}", pair[0], pair[1])).or_insert(0) += 1;
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(i: usize, text: &str) -> ProcessedDocument {
        ProcessedDocument {
            item_index: i,
            tokens: text.split_whitespace().map(str::to_string).collect(),
        }
    }

    #[test]
    fn bigrams_counted() {
        let counts = term_counts(&["borrow".into(), "checker".into(), "borrow".into()]);
        assert_eq!(counts["borrow"], 2);
        assert_eq!(counts["borrow checker"], 1);
        assert_eq!(counts["checker borrow"], 1);
    }

    #[test]
    fn df_bounds_applied() {
        let docs = vec![
            doc(0, "alpha beta common"),
            doc(1, "alpha beta common"),
            doc(2, "gamma common"),
            doc(3, "gamma delta common"),
            doc(4, "unique common"),
        ];
        let m = VectorSpaceBuilder::default().build(&docs).unwrap();
        // "common" is in 5/5 > 80%, "delta" and "unique" are in 1 doc
        assert!(!m.vocabulary.contains(&"common".to_string()));
        assert!(!m.vocabulary.contains(&"delta".to_string()));
        assert!(!m.vocabulary.contains(&"unique".to_string()));
        assert!(m.vocabulary.contains(&"alpha".to_string()));
        assert!(m.vocabulary.contains(&"alpha beta".to_string()));
        assert!(m.vocabulary.contains(&"gamma".to_string()));
    }

    #[test]
    fn rows_are_unit_length_or_empty() {
        let docs = vec![
            doc(0, "alpha beta"),
            doc(1, "alpha beta"),
            doc(2, "gamma"),
            doc(3, "gamma"),
            doc(4, "nothing shared"),
        ];
        let m = VectorSpaceBuilder::default().build(&docs).unwrap();
        for d in 0..4 {
            let norm = m.row_dot(d, d).sqrt();
            assert!((norm - 1.0).abs() < 1e-9, "row {d} norm {norm}");
        }
        assert!(m.rows[4].is_empty());
    }

    #[test]
    fn empty_corpus_has_no_features() {
        let docs = vec![doc(0, ""), doc(1, ""), doc(2, "")];
        assert!(VectorSpaceBuilder::default().build(&docs).is_none());
        assert!(VectorSpaceBuilder::default().build(&[]).is_none());
    }

    #[test]
    fn max_features_keeps_most_frequent() {
        let docs = vec![
            doc(0, "aaa aaa bbb ccc"),
            doc(1, "aaa aaa bbb ccc"),
            doc(2, "zzz"),
            doc(3, "zzz"),
            doc(4, "zzz"),
        ];
        let builder = VectorSpaceBuilder {
            max_features: 1,
            ..Default::default()
        };
        let m = builder.build(&docs).unwrap();
        assert_eq!(m.vocabulary, vec!["aaa".to_string()]);
    }
}
