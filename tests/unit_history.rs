// Unit tests for the historical topic store and its backends.
//
// File-backed tests run in a temp directory; the SQLite tests open a
// database file inside one.

mod common;

use common::topic;
use trendline::history::{BucketKey, FileBucketStore, HistoricalStore};

fn key(s: &str) -> BucketKey {
    s.parse().unwrap()
}

fn sample_topics() -> Vec<trendline::models::TopicDescriptor> {
    vec![
        topic(0, &[("rust", 0.5), ("compiler", 0.25)], 10),
        topic(1, &[("mortgage", 0.7)], 4),
    ]
}

// ============================================================
// BucketKey
// ============================================================

#[test]
fn previous_bucket_crosses_midnight() {
    assert_eq!(key("2024-06-01_00").previous(), key("2024-05-31_23"));
    assert_eq!(key("2024-06-01_00").previous().to_string(), "2024-05-31_23");
}

#[test]
fn hours_before_spans_days() {
    assert_eq!(key("2024-06-03_05").hours_before(48), key("2024-06-01_05"));
}

#[test]
fn keys_order_chronologically() {
    assert!(key("2024-05-31_23") < key("2024-06-01_00"));
    assert!(key("2024-06-01_09") < key("2024-06-01_10"));
}

// ============================================================
// File backend
// ============================================================

#[test]
fn file_store_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let store = HistoricalStore::new(Box::new(FileBucketStore::new(dir.path().join("topics"))));

    assert!(store.load(&key("2024-06-01_12")).is_empty());
    assert!(store.save(&key("2024-06-01_12"), &sample_topics()));
    assert_eq!(store.load(&key("2024-06-01_12")), sample_topics());
    assert!(dir.path().join("topics").join("2024-06-01_12.json").exists());
}

#[test]
fn file_store_writes_versioned_envelope() {
    let dir = tempfile::tempdir().unwrap();
    let store = HistoricalStore::new(Box::new(FileBucketStore::new(dir.path())));
    store.save(&key("2024-06-01_12"), &sample_topics());

    let raw = std::fs::read_to_string(dir.path().join("2024-06-01_12.json")).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(value["version"], 1);
    assert_eq!(value["key"], "2024-06-01_12");
    assert_eq!(value["topics"].as_array().map(Vec::len), Some(2));
}

#[test]
fn save_replaces_existing_bucket() {
    let dir = tempfile::tempdir().unwrap();
    let store = HistoricalStore::new(Box::new(FileBucketStore::new(dir.path())));
    store.save(&key("2024-06-01_12"), &sample_topics());
    store.save(&key("2024-06-01_12"), &sample_topics()[..1]);
    assert_eq!(store.load(&key("2024-06-01_12")).len(), 1);
}

#[test]
fn corrupt_bucket_loads_as_empty() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("2024-06-01_12.json"), "{not json").unwrap();
    let store = HistoricalStore::new(Box::new(FileBucketStore::new(dir.path())));
    assert!(store.load(&key("2024-06-01_12")).is_empty());
}

#[test]
fn legacy_bare_array_still_loads() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("2024-06-01_12.json"),
        r#"[{"id": 3, "keywords": [["kernel", 0.4]], "size": 5}]"#,
    )
    .unwrap();
    let store = HistoricalStore::new(Box::new(FileBucketStore::new(dir.path())));
    let topics = store.load(&key("2024-06-01_12"));
    assert_eq!(topics, vec![topic(3, &[("kernel", 0.4)], 5)]);
}

#[test]
fn unwritable_directory_reports_failure() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("not-a-dir");
    std::fs::write(&blocker, "file in the way").unwrap();

    let store = HistoricalStore::new(Box::new(FileBucketStore::new(&blocker)));
    assert!(!store.save(&key("2024-06-01_12"), &sample_topics()));
    assert!(store.load(&key("2024-06-01_12")).is_empty());
}

#[test]
fn latest_and_prune() {
    let dir = tempfile::tempdir().unwrap();
    let store = HistoricalStore::new(Box::new(FileBucketStore::new(dir.path())));
    for k in ["2024-05-31_23", "2024-06-01_00", "2024-06-01_01"] {
        store.save(&key(k), &sample_topics());
    }
    // stray files are ignored
    std::fs::write(dir.path().join("notes.txt"), "").unwrap();

    assert_eq!(store.latest().unwrap(), Some(key("2024-06-01_01")));
    assert_eq!(store.prune_before(&key("2024-06-01_00")).unwrap(), 1);
    assert_eq!(
        store.keys().unwrap(),
        vec![key("2024-06-01_00"), key("2024-06-01_01")]
    );
}

// ============================================================
// SQLite backend
// ============================================================

#[cfg(feature = "sqlite")]
#[test]
fn sqlite_store_round_trip() {
    use trendline::history::SqliteBucketStore;

    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("nested").join("trendline.db");
    let backend = SqliteBucketStore::open(db_path.to_str().unwrap()).unwrap();
    let store = HistoricalStore::new(Box::new(backend));

    assert_eq!(store.backend_name(), "sqlite");
    assert!(store.save(&key("2024-06-01_00"), &sample_topics()));
    assert_eq!(store.load(&key("2024-06-01_00")), sample_topics());
    assert_eq!(
        store.load(&key("2024-06-01_01").previous()),
        sample_topics()
    );
}

#[cfg(feature = "sqlite")]
#[test]
fn sqlite_store_survives_reopen() {
    use trendline::history::SqliteBucketStore;

    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("trendline.db");
    let path = db_path.to_str().unwrap();
    {
        let store = HistoricalStore::new(Box::new(SqliteBucketStore::open(path).unwrap()));
        store.save(&key("2024-06-01_00"), &sample_topics());
    }
    let store = HistoricalStore::new(Box::new(SqliteBucketStore::open(path).unwrap()));
    assert_eq!(store.latest().unwrap(), Some(key("2024-06-01_00")));
}
