// Ingestion boundary: turns fetched JSON into validated Item records.
//
// The fetch side hands us HN-style objects where almost every field can be
// missing or null. All of that is resolved here so the pipeline only ever
// sees fully-populated Items.

use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::{debug, info};

use crate::models::Item;

/// An item exactly as it arrives on the wire.
#[derive(Debug, Deserialize)]
struct RawItem {
    id: Option<u64>,
    title: Option<String>,
    text: Option<String>,
    url: Option<String>,
    score: Option<i64>,
    by: Option<String>,
    time: Option<i64>,
    descendants: Option<u32>,
    #[serde(default)]
    deleted: bool,
    #[serde(default)]
    dead: bool,
}

impl RawItem {
    /// Validate and fill defaults. Returns None for items that should not
    /// take part in analysis (deleted, dead, or without an id).
    fn into_item(self) -> Option<Item> {
        if self.deleted || self.dead {
            return None;
        }
        let id = self.id?;
        Some(Item {
            id,
            title: self.title.unwrap_or_default(),
            text: self.text.filter(|t| !t.trim().is_empty()),
            url: self.url.filter(|u| !u.trim().is_empty()),
            score: self.score.unwrap_or(0),
            by: self.by.unwrap_or_default(),
            time: self.time.unwrap_or(0),
            descendants: self.descendants.unwrap_or(0),
        })
    }
}

/// Parse a JSON array of items.
pub fn parse_items(json: &str) -> Result<Vec<Item>> {
    let raw: Vec<RawItem> =
        serde_json::from_str(json).context("Item batch is not a JSON array of items")?;
    let total = raw.len();

    let items: Vec<Item> = raw.into_iter().filter_map(RawItem::into_item).collect();

    if items.len() < total {
        debug!(
            dropped = total - items.len(),
            "Skipped deleted, dead or id-less items"
        );
    }
    Ok(items)
}

/// Load items from a file, or from stdin when the path is `-`.
pub fn load_items(path: &Path) -> Result<Vec<Item>> {
    let json = if path.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read items from stdin")?;
        buf
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read items from {}", path.display()))?
    };

    let items = parse_items(&json)?;
    info!(count = items.len(), "Loaded item batch");
    Ok(items)
}
