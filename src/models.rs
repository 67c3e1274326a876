// Core data types shared by every stage of the analysis pipeline.
//
// Items come in from the fetch side, TopicDescriptors are what we persist
// per hour, and AnalysisResult is the single object handed to whatever
// renders the report.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A single news item as collected for one hourly window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: u64,
    pub title: String,
    /// Body text (Ask HN / Show HN posts carry one, links usually don't)
    pub text: Option<String>,
    pub url: Option<String>,
    pub score: i64,
    /// Author handle
    pub by: String,
    /// Unix timestamp (seconds)
    pub time: i64,
    /// Comment count
    pub descendants: u32,
}

impl Item {
    /// Convenience constructor for an item with only a title.
    pub fn titled(id: u64, title: &str) -> Self {
        Self {
            id,
            title: title.to_string(),
            text: None,
            url: None,
            score: 0,
            by: String::new(),
            time: 0,
            descendants: 0,
        }
    }

    /// The host part of the item's URL, if it has a parseable one.
    pub fn domain(&self) -> Option<&str> {
        let url = self.url.as_deref()?;
        let rest = url.split_once("://").map(|(_, r)| r)?;
        let host = rest
            .split(['/', '?', '#'])
            .next()
            .unwrap_or_default()
            .rsplit('@')
            .next()
            .unwrap_or_default();
        let host = host.split(':').next().unwrap_or_default();
        if host.is_empty() {
            None
        } else {
            Some(host)
        }
    }

    /// Title, body and URL domain joined into the text the normalizer sees.
    pub fn combined_text(&self) -> String {
        format!(
            "{} {} {}",
            self.title,
            self.text.as_deref().unwrap_or_default(),
            self.domain().unwrap_or_default()
        )
    }
}

/// Normalized tokens for one item, pointing back at the item by index.
#[derive(Debug, Clone)]
pub struct ProcessedDocument {
    pub item_index: usize,
    pub tokens: Vec<String>,
}

impl ProcessedDocument {
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

/// One detected topic: its ranked keywords and how many items it covers.
///
/// Ids are assigned per run (0..m) and are not stable across hours; the
/// keyword list is what identifies a topic from one bucket to the next.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicDescriptor {
    pub id: usize,
    /// (term, centroid weight) pairs, highest weight first
    pub keywords: Vec<(String, f64)>,
    /// Number of member items
    pub size: usize,
}

impl TopicDescriptor {
    /// The catch-all topic used when clustering is skipped or degrades.
    pub fn catch_all(size: usize) -> Self {
        Self {
            id: 0,
            keywords: Vec::new(),
            size,
        }
    }

    /// Keyword terms joined for display.
    pub fn label(&self) -> String {
        self.keywords
            .iter()
            .map(|(term, _)| term.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// The trend state of a single topic relative to the previous hour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum TrendRecord {
    Emerging {
        topic: usize,
    },
    Continuing {
        topic: usize,
        historical: usize,
        similarity: f64,
    },
    Fading {
        historical: usize,
    },
}

/// A current topic matched to a topic from the previous bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Continuation {
    pub topic: usize,
    pub historical: usize,
    pub similarity: f64,
}

/// Trend records grouped by state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Trends {
    /// Current topic ids with no counterpart in the previous bucket
    pub emerging: Vec<usize>,
    pub continuing: Vec<Continuation>,
    /// Historical topic ids no current topic matched
    pub fading: Vec<usize>,
}

impl Trends {
    pub fn from_records(records: impl IntoIterator<Item = TrendRecord>) -> Self {
        let mut trends = Self::default();
        for record in records {
            match record {
                TrendRecord::Emerging { topic } => trends.emerging.push(topic),
                TrendRecord::Continuing {
                    topic,
                    historical,
                    similarity,
                } => trends.continuing.push(Continuation {
                    topic,
                    historical,
                    similarity,
                }),
                TrendRecord::Fading { historical } => trends.fading.push(historical),
            }
        }
        trends
    }

    /// Look up the continuation for a current topic, if it has one.
    pub fn continuation_of(&self, topic: usize) -> Option<&Continuation> {
        self.continuing.iter().find(|c| c.topic == topic)
    }
}

/// Everything one analysis run produces for downstream rendering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// `YYYY-MM-DD`
    pub date: String,
    /// Zero-padded `HH`
    pub hour: String,
    pub topics: Vec<TopicDescriptor>,
    /// Topic id -> member items, in input order
    pub items_by_topic: BTreeMap<usize, Vec<Item>>,
    pub trends: Trends,
}

impl AnalysisResult {
    /// A result with no topics (used for an empty batch).
    pub fn empty(date: String, hour: String) -> Self {
        Self {
            date,
            hour,
            topics: Vec::new(),
            items_by_topic: BTreeMap::new(),
            trends: Trends::default(),
        }
    }

    /// Member items of a topic, or an empty slice.
    pub fn items_for(&self, topic: usize) -> &[Item] {
        self.items_by_topic
            .get(&topic)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}
