// Topic engine: one batch of items in, one AnalysisResult out.
//
// Stages: normalize -> TF-IDF -> (SVD) -> cluster -> summarize, then compare
// against the previous hour's bucket and persist this hour's topics.
//
// The engine never returns an error. Every failure mode has a local answer:
//   - fewer than 3 items, or nothing left after normalization: one
//     catch-all topic holding every item
//   - DBSCAN too noisy or failing: k-means with a bounded k
//   - k-means failing too: the same catch-all topic
//   - history unreadable/unwritable: empty history / best-effort write

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::{info, warn};

use crate::history::{BucketKey, HistoricalStore};
use crate::models::{AnalysisResult, Item, TopicDescriptor, Trends};
use crate::text::normalizer::TextNormalizer;
use crate::text::resources::LanguageResources;
use crate::topics::cluster::{ClusterAssignment, ClusterSelector};
use crate::topics::reduce::DimensionalityReducer;
use crate::topics::summarize::TopicSummarizer;
use crate::topics::vectorizer::VectorSpaceBuilder;
use crate::trends::classifier::TrendClassifier;

/// Batches smaller than this skip vectorization and clustering entirely.
pub const MIN_CLUSTERABLE_ITEMS: usize = 3;

/// Tunable parameters for every stage.
#[derive(Debug, Clone, Default)]
pub struct EngineConfig {
    pub vectorizer: VectorSpaceBuilder,
    pub reducer: DimensionalityReducer,
    pub selector: ClusterSelector,
    pub summarizer: TopicSummarizer,
    pub classifier: TrendClassifier,
}

impl EngineConfig {
    /// Defaults with a different keyword count per topic.
    pub fn with_top_n(top_n: usize) -> Self {
        Self {
            summarizer: TopicSummarizer { top_n },
            ..Self::default()
        }
    }
}

/// Topics for one batch plus the per-item assignment that produced them.
#[derive(Debug, Clone)]
pub struct DetectedTopics {
    pub topics: Vec<TopicDescriptor>,
    pub assignment: ClusterAssignment,
}

impl DetectedTopics {
    fn single(topic: TopicDescriptor, n: usize) -> Self {
        Self {
            topics: vec![topic],
            assignment: ClusterAssignment::single(n),
        }
    }
}

pub struct TopicEngine {
    config: EngineConfig,
    normalizer: TextNormalizer,
    history: HistoricalStore,
}

impl TopicEngine {
    pub fn new(
        config: EngineConfig,
        resources: Arc<dyn LanguageResources>,
        history: HistoricalStore,
    ) -> Self {
        Self {
            config,
            normalizer: TextNormalizer::new(resources),
            history,
        }
    }

    pub fn history(&self) -> &HistoricalStore {
        &self.history
    }

    /// Analyze a batch collected for `bucket`.
    ///
    /// `n_clusters` forces k-means with that k; otherwise the cluster count
    /// is chosen adaptively.
    pub fn analyze(
        &self,
        items: &[Item],
        bucket: BucketKey,
        n_clusters: Option<usize>,
    ) -> AnalysisResult {
        info!(bucket = %bucket, items = items.len(), "Analyzing topics");

        if items.is_empty() {
            return AnalysisResult::empty(bucket.date_string(), bucket.hour_string());
        }

        let detected = self.detect_topics(items, n_clusters);

        let mut items_by_topic: BTreeMap<usize, Vec<Item>> = BTreeMap::new();
        for (item, label) in items.iter().zip(&detected.assignment.labels) {
            if let Some(topic) = label {
                items_by_topic.entry(*topic).or_default().push(item.clone());
            }
        }

        let historical = self.history.load(&bucket.previous());
        let records = self
            .config
            .classifier
            .classify(&detected.topics, &historical);
        let trends = Trends::from_records(records);

        self.history.save(&bucket, &detected.topics);

        info!(
            bucket = %bucket,
            topics = detected.topics.len(),
            emerging = trends.emerging.len(),
            continuing = trends.continuing.len(),
            fading = trends.fading.len(),
            "Topic analysis complete"
        );

        AnalysisResult {
            date: bucket.date_string(),
            hour: bucket.hour_string(),
            topics: detected.topics,
            items_by_topic,
            trends,
        }
    }

    /// Run the clustering half of the pipeline (no history involved).
    pub fn detect_topics(&self, items: &[Item], n_clusters: Option<usize>) -> DetectedTopics {
        let n = items.len();
        if n == 0 {
            return DetectedTopics {
                topics: Vec::new(),
                assignment: ClusterAssignment { labels: Vec::new() },
            };
        }
        if n < MIN_CLUSTERABLE_ITEMS {
            info!(items = n, "Too few items to cluster, using a single topic");
            return DetectedTopics::single(TopicDescriptor::catch_all(n), n);
        }

        let docs = self.normalizer.process(items);

        let Some(matrix) = self.config.vectorizer.build(&docs) else {
            warn!(items = n, "No usable features after normalization, using a single topic");
            return DetectedTopics::single(TopicDescriptor::catch_all(n), n);
        };

        let points = self.config.reducer.reduce(&matrix);

        let assignment = match self.config.selector.select(&points, n_clusters) {
            Some(assignment) => assignment,
            None => {
                warn!(items = n, "No usable clusters, using a single topic");
                return DetectedTopics::single(TopicDescriptor::catch_all(n), n);
            }
        };

        let topics = self.config.summarizer.summarize(&matrix, &assignment);
        DetectedTopics { topics, assignment }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::resources::EnglishResources;

    fn engine() -> TopicEngine {
        TopicEngine::new(
            EngineConfig::default(),
            Arc::new(EnglishResources::load()),
            HistoricalStore::in_memory(),
        )
    }

    fn bucket() -> BucketKey {
        "2024-06-01_12".parse().unwrap()
    }

    #[test]
    fn empty_batch_has_no_topics() {
        let result = engine().analyze(&[], bucket(), None);
        assert!(result.topics.is_empty());
        assert!(result.items_by_topic.is_empty());
        assert_eq!(result.date, "2024-06-01");
        assert_eq!(result.hour, "12");
    }

    #[test]
    fn result_is_persisted_for_next_hour() {
        let e = engine();
        let items = vec![Item::titled(1, "one"), Item::titled(2, "two")];
        e.analyze(&items, bucket(), None);
        let saved = e.history().load(&bucket());
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].size, 2);
    }

    #[test]
    fn requested_k_too_large_degrades_to_single_topic() {
        let items: Vec<Item> = [
            "Rust compiler release",
            "Rust compiler bugs",
            "Python packaging woes",
            "Python packaging tools",
        ]
        .iter()
        .enumerate()
        .map(|(i, t)| Item::titled(i as u64, t))
        .collect();
        let detected = engine().detect_topics(&items, Some(10));
        assert_eq!(detected.topics.len(), 1);
        assert_eq!(detected.topics[0].size, 4);
        assert!(detected.topics[0].keywords.is_empty());
        assert!(detected.assignment.labels.iter().all(|l| *l == Some(0)));
    }
}
