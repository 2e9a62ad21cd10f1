// SPDX-FileCopyrightText: 2026 GuideDesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! [`KeyValueStore`] implementations: one file per key on disk, or a map in memory.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use guidedesk_core::{GuideDeskError, KeyValueStore};
use tokio::sync::Mutex;
use tracing::debug;

/// Stores each key as `<dir>/<key>.json`.
///
/// Writes go to a temporary sibling first and are renamed into place, so a
/// crash mid-write leaves either the old value or the new one.
#[derive(Debug, Clone)]
pub struct FileKeyValueStore {
    dir: PathBuf,
}

impl FileKeyValueStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn slot_path(&self, key: &str) -> Result<PathBuf, GuideDeskError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(GuideDeskError::Storage {
                source: format!("invalid storage key `{key}`").into(),
            });
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

fn storage_err(e: std::io::Error) -> GuideDeskError {
    GuideDeskError::Storage {
        source: Box::new(e),
    }
}

#[async_trait]
impl KeyValueStore for FileKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>, GuideDeskError> {
        let path = self.slot_path(key)?;
        match tokio::fs::read_to_string(&path).await {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(storage_err(e)),
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), GuideDeskError> {
        let path = self.slot_path(key)?;
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(storage_err)?;
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, value).await.map_err(storage_err)?;
        tokio::fs::rename(&tmp, &path).await.map_err(storage_err)?;
        debug!(path = %path.display(), "storage slot written");
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), GuideDeskError> {
        let path = self.slot_path(key)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(storage_err(e)),
        }
    }
}

/// Non-durable store for tests and throwaway sessions.
#[derive(Debug, Default)]
pub struct MemoryKeyValueStore {
    slots: Mutex<HashMap<String, String>>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for MemoryKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>, GuideDeskError> {
        Ok(self.slots.lock().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), GuideDeskError> {
        self.slots
            .lock()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), GuideDeskError> {
        self.slots.lock().await.remove(key);
        Ok(())
    }
}
