use parking_lot::Mutex;
use serde_json::Value;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::utils::Result;

/// Best-effort key/value store for the history list
///
/// `save` is fire-and-forget: implementations must not hold up the caller on a slow
/// write and must log their own failures instead of reporting them.
#[cfg_attr(test, mockall::automock)]
pub trait HistoryPersistence: Send + Sync {
    fn load(&self, key: &str) -> Option<Value>;
    fn save(&self, key: &str, ids: Vec<String>);
}

/// Process-local store, useful for tests and ephemeral hosts
#[derive(Debug, Default)]
pub struct MemoryPersistence {
    values: Mutex<HashMap<String, Value>>,
}

impl MemoryPersistence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a raw value, including malformed ones
    pub fn with_value(self, key: &str, value: Value) -> Self {
        self.values.lock().insert(key.to_string(), value);
        self
    }
}

impl HistoryPersistence for MemoryPersistence {
    fn load(&self, key: &str) -> Option<Value> {
        self.values.lock().get(key).cloned()
    }

    fn save(&self, key: &str, ids: Vec<String>) {
        self.values.lock().insert(key.to_string(), Value::from(ids));
    }
}

/// JSON files under a data directory, one file per key
///
/// Writes go through `spawn_blocking` when a tokio runtime is available. Every write
/// carries a sequence number so a slow, older write never overwrites a newer one.
#[derive(Debug, Clone)]
pub struct FilePersistence {
    dir: PathBuf,
    next_seq: Arc<AtomicU64>,
    last_written: Arc<Mutex<u64>>,
}

impl FilePersistence {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            next_seq: Arc::new(AtomicU64::new(1)),
            last_written: Arc::new(Mutex::new(0)),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }

    fn write(path: &Path, json: &str, seq: u64, last_written: &Mutex<u64>) -> Result<()> {
        let mut last = last_written.lock();
        if seq < *last {
            debug!("Skipping stale history write #{}", seq);
            return Ok(());
        }

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, path)?;

        *last = seq;
        Ok(())
    }
}

impl HistoryPersistence for FilePersistence {
    fn load(&self, key: &str) -> Option<Value> {
        let path = self.path_for(key);
        if !path.exists() {
            return None;
        }

        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) => {
                warn!("Failed to read {}: {}", path.display(), e);
                return None;
            }
        };

        match serde_json::from_str(&content) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("Ignoring corrupt history file {}: {}", path.display(), e);
                None
            }
        }
    }

    fn save(&self, key: &str, ids: Vec<String>) {
        let json = match serde_json::to_string_pretty(&ids) {
            Ok(json) => json,
            Err(e) => {
                warn!("Failed to serialize history: {}", e);
                return;
            }
        };

        let path = self.path_for(key);
        let seq = self.next_seq.fetch_add(1, Ordering::SeqCst);
        let last_written = Arc::clone(&self.last_written);

        let write = move || {
            if let Err(e) = Self::write(&path, &json, seq, &last_written) {
                warn!("Failed to persist history to {}: {}", path.display(), e);
            }
        };

        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn_blocking(write);
            }
            Err(_) => write(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_memory_round_trip() {
        let store = MemoryPersistence::new();
        assert!(store.load("history").is_none());

        store.save("history", vec!["a".into(), "b".into()]);
        assert_eq!(store.load("history"), Some(json!(["a", "b"])));
    }

    #[test]
    fn test_file_save_without_runtime_writes_inline() {
        let temp_dir = TempDir::new().unwrap();
        let store = FilePersistence::new(temp_dir.path().join("data"));

        store.save("history", vec!["x".into(), "y".into()]);

        assert!(store.path_for("history").exists());
        assert_eq!(store.load("history"), Some(json!(["x", "y"])));
    }

    #[test]
    fn test_file_load_of_corrupt_file_is_absent() {
        let temp_dir = TempDir::new().unwrap();
        let store = FilePersistence::new(temp_dir.path());
        std::fs::write(store.path_for("history"), "{not json").unwrap();

        assert!(store.load("history").is_none());
        assert!(store.load("missing").is_none());
    }

    #[test]
    fn test_stale_write_is_skipped() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("history.json");
        let last_written = Mutex::new(0);

        FilePersistence::write(&path, "[\"new\"]", 2, &last_written).unwrap();
        FilePersistence::write(&path, "[\"old\"]", 1, &last_written).unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "[\"new\"]");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_file_save_inside_runtime_is_eventually_durable() {
        let temp_dir = TempDir::new().unwrap();
        let store = FilePersistence::new(temp_dir.path());

        store.save("history", vec!["first".into()]);
        store.save("history", vec!["second".into()]);

        let mut value = None;
        for _ in 0..50 {
            tokio::time::sleep(std::time::Duration::from_millis(20)).await;
            value = store.load("history");
            if value == Some(json!(["second"])) {
                break;
            }
        }
        assert_eq!(value, Some(json!(["second"])));
    }
}
