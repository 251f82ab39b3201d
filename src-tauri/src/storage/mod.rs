//! Key/value persistence for record snapshots and the lecture catalogue.
//!
//! Every backend stores JSON documents under string keys with overwrite
//! semantics. Keys follow `<lecture>/<YYYY-MM-DD>_<HHMMSS>.json`.

pub mod files;
pub mod keys;
pub mod memory;
pub mod sqlite;

use std::{path::Path, sync::Arc};

use anyhow::Result;
use async_trait::async_trait;
use log::info;
use serde_json::Value;

use crate::settings::{StorageBackend, StorageSettings};

pub use files::FileStore;
pub use keys::{lecture_prefix, snapshot_file_name, snapshot_key, SnapshotZone, LECTURES_KEY};
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

#[async_trait]
pub trait Storage: Send + Sync {
    /// Writes `value` under `key`, replacing any previous value.
    async fn save(&self, key: &str, value: &Value) -> Result<()>;

    async fn load(&self, key: &str) -> Result<Option<Value>>;

    /// Keys starting with `prefix`, in ascending order.
    async fn list_keys(&self, prefix: &str) -> Result<Vec<String>>;

    /// Removes `key`. Missing keys are not an error.
    async fn delete(&self, key: &str) -> Result<()>;
}

pub fn open_storage(settings: &StorageSettings, data_dir: &Path) -> Result<Arc<dyn Storage>> {
    let storage: Arc<dyn Storage> = match settings.backend {
        StorageBackend::Files => Arc::new(FileStore::new(data_dir.join("timer_logs"))?),
        StorageBackend::Sqlite => Arc::new(SqliteStore::new(data_dir.join("slidescribe.sqlite3"))?),
        StorageBackend::Memory => Arc::new(MemoryStore::new()),
    };
    info!("Using {} storage backend", settings.backend.as_str());
    Ok(storage)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn opens_each_backend() {
        let dir = tempfile::tempdir().unwrap();
        for backend in [StorageBackend::Files, StorageBackend::Sqlite, StorageBackend::Memory] {
            let storage = open_storage(&StorageSettings { backend }, dir.path()).unwrap();
            storage.save("intro/a.json", &json!([1])).await.unwrap();
            assert_eq!(storage.load("intro/a.json").await.unwrap(), Some(json!([1])));
        }
        assert!(dir.path().join("timer_logs").join("intro").join("a.json").exists());
        assert!(dir.path().join("slidescribe.sqlite3").exists());
    }
}
