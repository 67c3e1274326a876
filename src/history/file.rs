// FileBucketStore: one `<key>.json` file per bucket in a cache directory.
//
// Writes go to a temp file in the same directory and are renamed into place,
// so a reader racing a manual re-run sees either the old bucket or the new
// one, never half of it.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use tempfile::NamedTempFile;

use super::traits::BucketStore;

pub struct FileBucketStore {
    dir: PathBuf,
}

impl FileBucketStore {
    /// The directory is created lazily on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", safe_file_stem(key)))
    }
}

/// Map a key to a file-safe stem (anything but alphanumerics, `-` and `_`
/// becomes `_`).
fn safe_file_stem(key: &str) -> String {
    key.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

impl BucketStore for FileBucketStore {
    fn name(&self) -> &'static str {
        "file"
    }

    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        match std::fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("Failed to read bucket {}", path.display())),
        }
    }

    fn put(&self, key: &str, value: &str) -> Result<()> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create bucket directory {}", self.dir.display()))?;

        let path = self.path_for(key);
        let mut tmp = NamedTempFile::new_in(&self.dir)
            .with_context(|| format!("Failed to create temp file in {}", self.dir.display()))?;
        tmp.write_all(value.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(&path)
            .with_context(|| format!("Failed to move bucket into place at {}", path.display()))?;
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<bool> {
        let path = self.path_for(key);
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e).with_context(|| format!("Failed to delete bucket {}", path.display())),
        }
    }

    fn keys(&self) -> Result<Vec<String>> {
        let entries = match std::fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("Failed to list {}", self.dir.display()))
            }
        };

        let mut keys = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                keys.push(stem.to_string());
            }
        }
        keys.sort();
        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn put_get_overwrite_delete() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileBucketStore::new(dir.path().join("buckets"));

        assert_eq!(store.get("2024-05-01_10").unwrap(), None);
        store.put("2024-05-01_10", "[1]").unwrap();
        store.put("2024-05-01_10", "[2]").unwrap();
        assert_eq!(store.get("2024-05-01_10").unwrap().as_deref(), Some("[2]"));

        assert!(store.delete("2024-05-01_10").unwrap());
        assert!(!store.delete("2024-05-01_10").unwrap());
        assert_eq!(store.get("2024-05-01_10").unwrap(), None);
    }

    #[test]
    fn keys_sorted_and_temp_files_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileBucketStore::new(dir.path());
        store.put("2024-05-01_11", "[]").unwrap();
        store.put("2024-05-01_09", "[]").unwrap();
        std::fs::write(dir.path().join(".tmp123"), "partial").unwrap();

        assert_eq!(store.keys().unwrap(), vec!["2024-05-01_09", "2024-05-01_11"]);
    }

    #[test]
    fn missing_dir_lists_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileBucketStore::new(dir.path().join("never-created"));
        assert!(store.keys().unwrap().is_empty());
    }

    #[test]
    fn unsafe_key_chars_replaced() {
        assert_eq!(safe_file_stem("../etc/passwd"), "___etc_passwd");
        assert_eq!(safe_file_stem("2024-05-01_10"), "2024-05-01_10");
    }
}
