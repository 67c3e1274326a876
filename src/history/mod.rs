// Historical topic store: persisted topic descriptors per hourly bucket.
//
// Trend detection only ever looks one bucket back, but every run writes its
// own bucket so the next hour has something to compare against. Nothing in
// here is allowed to fail an analysis run: unreadable history is treated as
// no history, and a failed write is logged and forgotten.

pub mod file;
pub mod memory;
#[cfg(feature = "sqlite")]
pub mod schema;
#[cfg(feature = "sqlite")]
pub mod sqlite;
pub mod traits;

pub use file::FileBucketStore;
pub use memory::MemoryBucketStore;
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteBucketStore;
pub use traits::BucketStore;

use std::fmt;
use std::str::FromStr;

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Local, NaiveDate, NaiveDateTime, NaiveTime, Timelike, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::models::TopicDescriptor;

/// Current on-disk format version for bucket payloads.
pub const BUCKET_FORMAT_VERSION: u32 = 1;

/// An hourly time bucket, rendered as `YYYY-MM-DD_HH`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BucketKey {
    date: NaiveDate,
    hour: u32,
}

impl BucketKey {
    pub fn new(date: NaiveDate, hour: u32) -> Result<Self> {
        if hour > 23 {
            anyhow::bail!("Hour must be 00-23, got {hour}");
        }
        Ok(Self { date, hour })
    }

    /// Build from separate `YYYY-MM-DD` and `HH` strings.
    pub fn from_parts(date: &str, hour: &str) -> Result<Self> {
        let date = NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .with_context(|| format!("Invalid date '{date}', expected YYYY-MM-DD"))?;
        let hour: u32 = hour
            .parse()
            .with_context(|| format!("Invalid hour '{hour}', expected HH"))?;
        Self::new(date, hour)
    }

    pub fn from_datetime(dt: NaiveDateTime) -> Self {
        Self {
            date: dt.date(),
            hour: dt.hour(),
        }
    }

    /// The bucket containing the current local time.
    pub fn now() -> Self {
        Self::from_datetime(Local::now().naive_local())
    }

    /// `YYYY-MM-DD`
    pub fn date_string(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }

    /// Zero-padded `HH`
    pub fn hour_string(&self) -> String {
        format!("{:02}", self.hour)
    }

    /// Start of the bucket's hour.
    pub fn start(&self) -> NaiveDateTime {
        self.date.and_time(NaiveTime::default()) + Duration::hours(i64::from(self.hour))
    }

    /// The immediately preceding hour, rolling back across midnight.
    pub fn previous(&self) -> Self {
        Self::from_datetime(self.start() - Duration::hours(1))
    }

    /// `n` hours earlier.
    pub fn hours_before(&self, n: i64) -> Self {
        Self::from_datetime(self.start() - Duration::hours(n))
    }
}

impl fmt::Display for BucketKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{:02}", self.date.format("%Y-%m-%d"), self.hour)
    }
}

impl FromStr for BucketKey {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let (date, hour) = s
            .split_once('_')
            .with_context(|| format!("Invalid bucket key '{s}', expected YYYY-MM-DD_HH"))?;
        if hour.len() != 2 {
            anyhow::bail!("Invalid bucket key '{s}', hour must be two digits");
        }
        Self::from_parts(date, hour)
    }
}

/// What gets written for each bucket.
#[derive(Debug, Serialize, Deserialize)]
struct BucketEnvelope {
    version: u32,
    key: String,
    saved_at: DateTime<Utc>,
    topics: Vec<TopicDescriptor>,
}

/// Accepted payload shapes: the versioned envelope, or a bare topic array
/// as written before versioning existed.
#[derive(Deserialize)]
#[serde(untagged)]
enum StoredBucket {
    Versioned(BucketEnvelope),
    Legacy(Vec<TopicDescriptor>),
}

/// Loads and saves topic descriptors per bucket over any BucketStore.
pub struct HistoricalStore {
    backend: Box<dyn BucketStore>,
}

impl HistoricalStore {
    pub fn new(backend: Box<dyn BucketStore>) -> Self {
        Self { backend }
    }

    /// Convenience: a store that keeps everything in memory.
    pub fn in_memory() -> Self {
        Self::new(Box::new(MemoryBucketStore::new()))
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    /// Topics stored for `key`. Absent, unreadable or corrupt buckets all
    /// come back empty.
    pub fn load(&self, key: &BucketKey) -> Vec<TopicDescriptor> {
        let key_str = key.to_string();
        let payload = match self.backend.get(&key_str) {
            Ok(Some(payload)) => payload,
            Ok(None) => {
                debug!(bucket = %key_str, "No historical bucket");
                return Vec::new();
            }
            Err(e) => {
                warn!(bucket = %key_str, error = %e, "Failed to read historical bucket");
                return Vec::new();
            }
        };

        match serde_json::from_str::<StoredBucket>(&payload) {
            Ok(StoredBucket::Versioned(envelope)) if envelope.version > BUCKET_FORMAT_VERSION => {
                warn!(
                    bucket = %key_str,
                    version = envelope.version,
                    "Historical bucket written by a newer format, ignoring"
                );
                Vec::new()
            }
            Ok(StoredBucket::Versioned(envelope)) => envelope.topics,
            Ok(StoredBucket::Legacy(topics)) => {
                debug!(bucket = %key_str, "Loaded unversioned historical bucket");
                topics
            }
            Err(e) => {
                warn!(bucket = %key_str, error = %e, "Historical bucket is corrupt, ignoring");
                Vec::new()
            }
        }
    }

    /// Persist the topics for `key`, replacing whatever was there. Returns
    /// whether the write succeeded; failures are logged, never raised.
    pub fn save(&self, key: &BucketKey, topics: &[TopicDescriptor]) -> bool {
        let key_str = key.to_string();
        let envelope = BucketEnvelope {
            version: BUCKET_FORMAT_VERSION,
            key: key_str.clone(),
            saved_at: Utc::now(),
            topics: topics.to_vec(),
        };

        let result = serde_json::to_string(&envelope)
            .context("Failed to serialize bucket")
            .and_then(|json| self.backend.put(&key_str, &json));

        match result {
            Ok(()) => {
                info!(bucket = %key_str, topics = topics.len(), "Saved topic bucket");
                true
            }
            Err(e) => {
                warn!(bucket = %key_str, error = %e, "Failed to save topic bucket");
                false
            }
        }
    }

    /// All stored bucket keys in chronological order. Keys that don't parse
    /// as buckets are skipped.
    pub fn keys(&self) -> Result<Vec<BucketKey>> {
        let mut keys: Vec<BucketKey> = self
            .backend
            .keys()?
            .iter()
            .filter_map(|k| k.parse().ok())
            .collect();
        keys.sort();
        Ok(keys)
    }

    /// The most recent stored bucket.
    pub fn latest(&self) -> Result<Option<BucketKey>> {
        Ok(self.keys()?.pop())
    }

    pub fn delete(&self, key: &BucketKey) -> Result<bool> {
        self.backend.delete(&key.to_string())
    }

    /// Delete every bucket strictly older than `cutoff`. Returns how many
    /// were removed.
    pub fn prune_before(&self, cutoff: &BucketKey) -> Result<usize> {
        let mut removed = 0;
        for key in self.keys()?.into_iter().filter(|k| k < cutoff) {
            if self.delete(&key)? {
                removed += 1;
            }
        }
        info!(removed, cutoff = %cutoff, "Pruned old topic buckets");
        Ok(removed)
    }
}
