//! Lecture catalogue and saved snapshots.
//!
//! The catalogue is a JSON array of names under [`LECTURES_KEY`]. Each
//! lecture's snapshots live under the `<lecture>/` key prefix.

#[cfg(feature = "gui")]
pub mod commands;

use std::{collections::BTreeSet, sync::Arc};

use log::{info, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::Mutex;

use crate::{
    error::LibraryError,
    records::{decode_snapshot, encode_snapshot, Record},
    storage::{lecture_prefix, Storage, LECTURES_KEY},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotEntry {
    pub lecture: String,
    pub file_name: String,
    pub key: String,
}

impl SnapshotEntry {
    fn new(lecture: &str, file_name: &str) -> Self {
        Self {
            lecture: lecture.to_string(),
            file_name: file_name.to_string(),
            key: format!("{}{}", lecture_prefix(lecture), file_name),
        }
    }
}

pub struct Library {
    storage: Arc<dyn Storage>,
    // Serializes read-modify-write of the catalogue.
    catalogue: Mutex<()>,
}

impl Library {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self {
            storage,
            catalogue: Mutex::new(()),
        }
    }

    /// Catalogue order. Without a catalogue the names are derived from stored keys.
    pub async fn list_lectures(&self) -> Result<Vec<String>, LibraryError> {
        if let Some(value) = self.storage.load(LECTURES_KEY).await? {
            return Ok(serde_json::from_value(value)?);
        }

        let derived: BTreeSet<String> = self
            .storage
            .list_keys("")
            .await?
            .into_iter()
            .filter_map(|key| key.split_once('/').map(|(lecture, _)| lecture.to_string()))
            .collect();
        Ok(derived.into_iter().collect())
    }

    /// Validated name of a catalogued lecture.
    pub async fn require_lecture(&self, name: &str) -> Result<String, LibraryError> {
        let name = validate_lecture_name(name)?;
        if self.list_lectures().await?.contains(&name) {
            Ok(name)
        } else {
            Err(LibraryError::UnknownLecture(name))
        }
    }

    pub async fn add_lecture(&self, name: &str) -> Result<String, LibraryError> {
        let name = validate_lecture_name(name)?;
        let _guard = self.catalogue.lock().await;

        let mut lectures = self.list_lectures().await?;
        if lectures.iter().any(|existing| existing == &name) {
            return Err(LibraryError::DuplicateLecture(name));
        }
        lectures.push(name.clone());
        self.write_catalogue(&lectures).await?;

        info!("Added lecture '{name}'");
        Ok(name)
    }

    /// Drops the lectures from the catalogue along with every snapshot they own.
    pub async fn remove_lectures(&self, names: &[String]) -> Result<(), LibraryError> {
        let _guard = self.catalogue.lock().await;

        let mut lectures = self.list_lectures().await?;
        if let Some(unknown) = names.iter().find(|name| !lectures.contains(name)) {
            return Err(LibraryError::UnknownLecture(unknown.clone()));
        }

        for name in names {
            for key in self.storage.list_keys(&lecture_prefix(name)).await? {
                self.storage.delete(&key).await?;
            }
        }
        lectures.retain(|lecture| !names.contains(lecture));
        self.write_catalogue(&lectures).await?;

        info!("Removed {} lecture(s)", names.len());
        Ok(())
    }

    /// Snapshots of `lecture`, newest first.
    pub async fn list_snapshots(&self, lecture: &str) -> Result<Vec<SnapshotEntry>, LibraryError> {
        let prefix = lecture_prefix(lecture);
        let mut entries: Vec<SnapshotEntry> = self
            .storage
            .list_keys(&prefix)
            .await?
            .iter()
            .filter_map(|key| key.strip_prefix(&prefix))
            .filter(|file_name| is_snapshot_file_name(file_name))
            .map(|file_name| SnapshotEntry::new(lecture, file_name))
            .collect();
        entries.reverse();
        Ok(entries)
    }

    /// A missing snapshot reads as an empty list.
    pub async fn load_snapshot(
        &self,
        lecture: &str,
        file_name: &str,
    ) -> Result<Vec<Record>, LibraryError> {
        let entry = snapshot_entry(lecture, file_name)?;
        match self.storage.load(&entry.key).await? {
            Some(value) => Ok(decode_snapshot(value)?),
            None => Ok(Vec::new()),
        }
    }

    /// Overwrites an existing snapshot after it was edited in the records table.
    pub async fn save_snapshot(
        &self,
        lecture: &str,
        file_name: &str,
        records: &[Record],
    ) -> Result<SnapshotEntry, LibraryError> {
        let entry = snapshot_entry(lecture, file_name)?;
        self.storage.save(&entry.key, &encode_snapshot(records)?).await?;
        info!("Saved {} record(s) to {}", records.len(), entry.key);
        Ok(entry)
    }

    pub async fn delete_snapshot(&self, lecture: &str, file_name: &str) -> Result<(), LibraryError> {
        let entry = snapshot_entry(lecture, file_name)?;
        self.storage.delete(&entry.key).await?;
        info!("Deleted snapshot {}", entry.key);
        Ok(())
    }

    /// Stores an uploaded snapshot under its own file name. The contents must
    /// decode as records; they are rewritten in the canonical shape.
    pub async fn import_snapshot(
        &self,
        lecture: &str,
        file_name: &str,
        contents: &str,
    ) -> Result<SnapshotEntry, LibraryError> {
        let lecture = self.require_lecture(lecture).await?;
        let entry = snapshot_entry(&lecture, file_name)?;

        let value: Value = serde_json::from_str(contents)?;
        let records = decode_snapshot(value).map_err(|err| {
            warn!("Rejected upload {file_name} for '{lecture}': {err}");
            err
        })?;

        self.storage.save(&entry.key, &encode_snapshot(&records)?).await?;
        info!("Imported {} record(s) into {}", records.len(), entry.key);
        Ok(entry)
    }

    /// Pretty-printed snapshot for download.
    pub async fn export_snapshot(
        &self,
        lecture: &str,
        file_name: &str,
    ) -> Result<String, LibraryError> {
        let records = self.load_snapshot(lecture, file_name).await?;
        Ok(serde_json::to_string_pretty(&records)?)
    }

    async fn write_catalogue(&self, lectures: &[String]) -> Result<(), LibraryError> {
        self.storage
            .save(LECTURES_KEY, &serde_json::to_value(lectures)?)
            .await?;
        Ok(())
    }
}

pub fn validate_lecture_name(name: &str) -> Result<String, LibraryError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(LibraryError::EmptyLectureName);
    }
    if trimmed.contains(['/', '\\']) || trimmed == "." || trimmed == ".." || trimmed == LECTURES_KEY
    {
        return Err(LibraryError::InvalidLectureName(trimmed.to_string()));
    }
    Ok(trimmed.to_string())
}

fn is_snapshot_file_name(file_name: &str) -> bool {
    file_name.len() > ".json".len()
        && file_name.ends_with(".json")
        && !file_name.contains(['/', '\\'])
        && !file_name.starts_with('.')
}

fn snapshot_entry(lecture: &str, file_name: &str) -> Result<SnapshotEntry, LibraryError> {
    let lecture = validate_lecture_name(lecture)?;
    if !is_snapshot_file_name(file_name) {
        return Err(LibraryError::InvalidFileName(file_name.to_string()));
    }
    Ok(SnapshotEntry::new(&lecture, file_name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use serde_json::json;

    fn library() -> (Arc<MemoryStore>, Library) {
        let store = Arc::new(MemoryStore::new());
        (store.clone(), Library::new(store))
    }

    #[tokio::test]
    async fn adds_lectures_in_order_and_rejects_duplicates() {
        let (_store, library) = library();
        library.add_lecture("Compilers").await.unwrap();
        library.add_lecture("  Networks ").await.unwrap();

        assert!(matches!(
            library.add_lecture("Compilers").await,
            Err(LibraryError::DuplicateLecture(_))
        ));
        assert!(matches!(
            library.add_lecture("   ").await,
            Err(LibraryError::EmptyLectureName)
        ));
        assert!(matches!(
            library.add_lecture("a/b").await,
            Err(LibraryError::InvalidLectureName(_))
        ));
        assert_eq!(library.list_lectures().await.unwrap(), vec!["Compilers", "Networks"]);

        assert_eq!(library.require_lecture(" Networks").await.unwrap(), "Networks");
        assert!(matches!(
            library.require_lecture("Ghost").await,
            Err(LibraryError::UnknownLecture(_))
        ));
        assert!(matches!(
            library.require_lecture("Net/works").await,
            Err(LibraryError::InvalidLectureName(_))
        ));
    }

    #[tokio::test]
    async fn derives_lectures_from_keys_without_catalogue() {
        let (store, library) = library();
        store.save("Networks/2026-10-14_090000.json", &json!([])).await.unwrap();
        store.save("Algebra/2026-10-13_090000.json", &json!([])).await.unwrap();

        assert_eq!(library.list_lectures().await.unwrap(), vec!["Algebra", "Networks"]);
    }

    #[tokio::test]
    async fn removing_a_lecture_deletes_its_snapshots() {
        let (store, library) = library();
        library.add_lecture("Networks").await.unwrap();
        library.add_lecture("Networks II").await.unwrap();
        store.save("Networks/2026-10-14_090000.json", &json!([])).await.unwrap();
        store.save("Networks II/2026-10-14_090000.json", &json!([])).await.unwrap();

        library.remove_lectures(&["Networks".to_string()]).await.unwrap();

        assert_eq!(library.list_lectures().await.unwrap(), vec!["Networks II"]);
        assert!(store.list_keys("Networks/").await.unwrap().is_empty());
        assert_eq!(store.list_keys("Networks II/").await.unwrap().len(), 1);
        assert!(matches!(
            library.remove_lectures(&["Ghost".to_string()]).await,
            Err(LibraryError::UnknownLecture(_))
        ));
    }

    #[tokio::test]
    async fn lists_snapshots_newest_first() {
        let (store, library) = library();
        for key in [
            "Networks/2026-10-13_080000.json",
            "Networks/2026-10-14_120000.json",
            "Networks/2026-10-14_090000.json",
            "Networks/readme.txt",
        ] {
            store.save(key, &json!([])).await.unwrap();
        }

        let names: Vec<String> = library
            .list_snapshots("Networks")
            .await
            .unwrap()
            .into_iter()
            .map(|entry| entry.file_name)
            .collect();
        assert_eq!(
            names,
            vec![
                "2026-10-14_120000.json",
                "2026-10-14_090000.json",
                "2026-10-13_080000.json"
            ]
        );
    }

    #[tokio::test]
    async fn edits_and_exports_a_snapshot() {
        let (_store, library) = library();
        assert!(library.load_snapshot("Networks", "none.json").await.unwrap().is_empty());

        let records = vec![Record::new(1, "10:00:00.000", "10:05:00.000", "intro")];
        let entry = library
            .save_snapshot("Networks", "2026-10-14_100500.json", &records)
            .await
            .unwrap();
        assert_eq!(entry.key, "Networks/2026-10-14_100500.json");

        let mut edited = library
            .load_snapshot("Networks", "2026-10-14_100500.json")
            .await
            .unwrap();
        edited[0].notes = "overview".into();
        library
            .save_snapshot("Networks", "2026-10-14_100500.json", &edited)
            .await
            .unwrap();

        let exported = library
            .export_snapshot("Networks", "2026-10-14_100500.json")
            .await
            .unwrap();
        assert!(exported.contains("\"notes\": \"overview\""));

        library
            .delete_snapshot("Networks", "2026-10-14_100500.json")
            .await
            .unwrap();
        assert!(library.list_snapshots("Networks").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn import_validates_and_normalizes() {
        let (store, library) = library();
        library.add_lecture("Networks").await.unwrap();

        let upload = r#"[{"Slide Number": "2", "Start Time": "00:00:00.000", "End Time": "00:00:05.000"}]"#;
        let entry = library
            .import_snapshot("Networks", "lecture1.json", upload)
            .await
            .unwrap();
        assert_eq!(
            store.load(&entry.key).await.unwrap(),
            Some(json!([{
                "slide_number": 2,
                "start_time": "00:00:00.000",
                "end_time": "00:00:05.000",
                "notes": ""
            }]))
        );

        assert!(matches!(
            library.import_snapshot("Networks", "bad.json", "{not json").await,
            Err(LibraryError::InvalidSnapshot(_))
        ));
        assert!(matches!(
            library.import_snapshot("Networks", "shape.json", r#"{"a": 1}"#).await,
            Err(LibraryError::InvalidSnapshot(_))
        ));
        assert!(matches!(
            library.import_snapshot("Networks", "../x.json", "[]").await,
            Err(LibraryError::InvalidFileName(_))
        ));
        assert!(matches!(
            library.import_snapshot("Ghost", "a.json", "[]").await,
            Err(LibraryError::UnknownLecture(_))
        ));
    }
}
