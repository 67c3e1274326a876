// Analysis pipeline: the synchronous topic engine and the async wrapper
// that runs it off the event loop under a deadline.

pub mod engine;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::warn;

use crate::history::BucketKey;
use crate::models::{AnalysisResult, Item};
use engine::TopicEngine;

/// Run an analysis on a blocking worker thread, giving up after `deadline`.
///
/// The engine is CPU-bound and never yields, so it must not run on an async
/// executor thread. If the deadline passes the worker is left to finish in
/// the background and the caller gets an error.
pub async fn run_with_deadline(
    engine: Arc<TopicEngine>,
    items: Vec<Item>,
    bucket: BucketKey,
    n_clusters: Option<usize>,
    deadline: Duration,
) -> Result<AnalysisResult> {
    let task =
        tokio::task::spawn_blocking(move || engine.analyze(&items, bucket, n_clusters));

    match tokio::time::timeout(deadline, task).await {
        Ok(joined) => joined.context("Analysis worker panicked"),
        Err(_) => {
            warn!(bucket = %bucket, ?deadline, "Analysis exceeded its deadline");
            anyhow::bail!(
                "Topic analysis for {bucket} did not finish within {}s",
                deadline.as_secs()
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::HistoricalStore;
    use crate::text::resources::EnglishResources;
    use engine::EngineConfig;

    #[tokio::test]
    async fn runs_engine_on_worker() {
        let engine = Arc::new(TopicEngine::new(
            EngineConfig::default(),
            Arc::new(EnglishResources::load()),
            HistoricalStore::in_memory(),
        ));
        let bucket: BucketKey = "2024-06-01_12".parse().unwrap();
        let result = run_with_deadline(
            engine,
            vec![Item::titled(1, "Show HN: my tool")],
            bucket,
            None,
            Duration::from_secs(30),
        )
        .await
        .unwrap();
        assert_eq!(result.topics.len(), 1);
    }
}
