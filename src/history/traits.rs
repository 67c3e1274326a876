// Bucket store trait: backend-agnostic key-value interface for persisted
// hourly topic buckets.
//
// Implementors: FileBucketStore (one JSON file per bucket), SqliteBucketStore
// (single table), MemoryBucketStore (tests). Values are opaque serialized
// payloads; HistoricalStore owns the format.

use anyhow::Result;

pub trait BucketStore: Send + Sync {
    /// Backend name for status output.
    fn name(&self) -> &'static str;

    /// Fetch the payload stored under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store a payload, replacing any previous value for `key`. Readers must
    /// never observe a partially written value.
    fn put(&self, key: &str, value: &str) -> Result<()>;

    /// Remove a key. Returns whether anything was removed.
    fn delete(&self, key: &str) -> Result<bool>;

    /// All stored keys in ascending order.
    fn keys(&self) -> Result<Vec<String>>;
}
