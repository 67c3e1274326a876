// System status display: store backend, bucket count, latest bucket.

use anyhow::Result;

use crate::config::Config;
use crate::history::HistoricalStore;

/// Display store status to the terminal.
pub fn show(store: &HistoricalStore, config: &Config) -> Result<()> {
    println!(
        "Store: {} ({})",
        store.backend_name(),
        config.store_location()
    );

    let keys = store.keys()?;
    println!("Buckets stored: {}", keys.len());

    match keys.last() {
        Some(latest) => {
            let topics = store.load(latest);
            println!("Latest bucket: {} ({} topics)", latest, topics.len());
            if let Some(first) = keys.first() {
                println!("Oldest bucket: {first}");
            }
        }
        None => {
            println!("Latest bucket: none");
            println!("  Run `trendline analyze --input items.json` to create one");
        }
    }

    println!(
        "Engine: top {} keywords per topic, up to {} features, {}s timeout",
        config.top_n,
        config.max_features,
        config.timeout.as_secs()
    );

    Ok(())
}
