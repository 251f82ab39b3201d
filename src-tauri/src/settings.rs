use anyhow::{bail, Context, Result};
use log::warn;
use serde::{Deserialize, Serialize};
use std::{
    env, fs,
    path::PathBuf,
    str::FromStr,
    sync::{RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use crate::storage::SnapshotZone;

pub const DATA_DIR_ENV: &str = "SLIDESCRIBE_DATA_DIR";
pub const STORAGE_ENV: &str = "SLIDESCRIBE_STORAGE";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Files,
    Sqlite,
    Memory,
}

impl StorageBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageBackend::Files => "files",
            StorageBackend::Sqlite => "sqlite",
            StorageBackend::Memory => "memory",
        }
    }
}

impl FromStr for StorageBackend {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "files" | "file" => Ok(StorageBackend::Files),
            "sqlite" => Ok(StorageBackend::Sqlite),
            "memory" => Ok(StorageBackend::Memory),
            other => bail!("unknown storage backend '{other}'"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageSettings {
    #[serde(default)]
    pub backend: StorageBackend,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSettings {
    #[serde(default)]
    pub storage: StorageSettings,
    /// Fixed offset for snapshot names, e.g. `540` for UTC+9. Local time when unset.
    #[serde(default)]
    pub snapshot_utc_offset_minutes: Option<i32>,
}

pub struct SettingsStore {
    path: PathBuf,
    data: RwLock<UserSettings>,
}

impl SettingsStore {
    pub fn new(path: PathBuf) -> Result<Self> {
        let data = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read settings from {}", path.display()))?;
            serde_json::from_str(&contents).unwrap_or_else(|err| {
                warn!("Ignoring unreadable settings file {}: {err}", path.display());
                UserSettings::default()
            })
        } else {
            UserSettings::default()
        };

        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    pub fn snapshot(&self) -> UserSettings {
        self.read().clone()
    }

    pub fn storage(&self) -> StorageSettings {
        self.read().storage.clone()
    }

    /// Persisted storage settings with `SLIDESCRIBE_STORAGE` applied on top.
    pub fn effective_storage(&self) -> StorageSettings {
        let mut storage = self.storage();
        if let Ok(value) = env::var(STORAGE_ENV) {
            match value.parse() {
                Ok(backend) => storage.backend = backend,
                Err(err) => warn!("Ignoring {STORAGE_ENV}: {err}"),
            }
        }
        storage
    }

    pub fn snapshot_zone(&self) -> SnapshotZone {
        SnapshotZone::from_offset_minutes(self.read().snapshot_utc_offset_minutes)
    }

    pub fn update_storage(&self, settings: StorageSettings) -> Result<()> {
        let mut guard = self.write();
        guard.storage = settings;
        self.persist(&guard)
    }

    pub fn update_snapshot_offset(&self, minutes: Option<i32>) -> Result<()> {
        if let Some(value) = minutes {
            if !(-24 * 60 < value && value < 24 * 60) {
                bail!("snapshot offset {value} minutes is out of range");
            }
        }
        let mut guard = self.write();
        guard.snapshot_utc_offset_minutes = minutes;
        self.persist(&guard)
    }

    fn persist(&self, data: &UserSettings) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let serialized = serde_json::to_string_pretty(data)?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("Failed to write settings to {}", self.path.display()))
    }

    fn read(&self) -> RwLockReadGuard<'_, UserSettings> {
        self.data.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, UserSettings> {
        self.data.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl SettingsStore {
    /// Re-reads the settings file after it was edited outside the app. A
    /// missing or unreadable file leaves the current settings untouched.
    pub fn reload(&self) -> Result<UserSettings> {
        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read settings from {}", self.path.display()))?;
        let data: UserSettings = serde_json::from_str(&contents)
            .with_context(|| format!("{} is not valid settings JSON", self.path.display()))?;
        *self.write() = data.clone();
        Ok(data)
    }
}

/// `SLIDESCRIBE_DATA_DIR` when set, `default` otherwise.
pub fn resolve_data_dir(default: PathBuf) -> PathBuf {
    match env::var_os(DATA_DIR_ENV) {
        Some(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => default,
    }
}
