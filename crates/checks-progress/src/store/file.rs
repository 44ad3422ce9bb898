//! JSON file holding the flattened key space

use super::keys;
use super::ProgressStore;
use crate::error::{ProgressStoreError, ProgressStoreResult};
use crate::state_machine::ProgressRecord;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

type Entries = BTreeMap<String, Value>;

/// Progress store backed by one JSON object of flattened keys
///
/// The file is read lazily on first access and rewritten after every
/// change. An unreadable file is treated as empty: progress is lost, the
/// session keeps working.
#[derive(Debug)]
pub struct FileProgressStore {
    path: PathBuf,
    entries: Mutex<Option<Entries>>,
}

impl FileProgressStore {
    /// Store backed by `path`; nothing is read until first use
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            entries: Mutex::new(None),
        }
    }

    /// Backing file
    #[inline]
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_file(&self) -> ProgressStoreResult<Entries> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Entries::new()),
            Err(e) => return Err(ProgressStoreError::io_error(&self.path, e)),
        };
        match serde_json::from_slice(&bytes) {
            Ok(entries) => Ok(entries),
            Err(e) => {
                tracing::warn!("discarding unreadable progress file {}: {}", self.path.display(), e);
                Ok(Entries::new())
            }
        }
    }

    async fn write_file(&self, entries: &Entries) -> ProgressStoreResult<()> {
        let bytes = serde_json::to_vec_pretty(entries)?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| ProgressStoreError::io_error(parent, e))?;
        }
        tokio::fs::write(&self.path, bytes)
            .await
            .map_err(|e| ProgressStoreError::io_error(&self.path, e))
    }

    /// Apply `edit` to the cached entries and persist the result
    async fn update<F>(&self, edit: F) -> ProgressStoreResult<()>
    where
        F: FnOnce(&mut Entries) + Send,
    {
        let mut guard = self.entries.lock().await;
        let mut entries = match guard.take() {
            Some(entries) => entries,
            None => self.read_file().await?,
        };
        edit(&mut entries);
        let written = self.write_file(&entries).await;
        *guard = Some(entries);
        written
    }
}

#[async_trait]
impl ProgressStore for FileProgressStore {
    async fn load(&self, checklist_id: &str) -> ProgressStoreResult<ProgressRecord> {
        let mut guard = self.entries.lock().await;
        if guard.is_none() {
            *guard = Some(self.read_file().await?);
        }
        Ok(guard
            .as_ref()
            .map(|entries| keys::unflatten(entries, checklist_id))
            .unwrap_or_default())
    }

    async fn save(&self, checklist_id: &str, record: &ProgressRecord) -> ProgressStoreResult<()> {
        tracing::debug!("saving progress for '{}'", checklist_id);
        self.update(|entries| keys::flatten_into(entries, checklist_id, record))
            .await
    }

    async fn remove(&self, checklist_id: &str) -> ProgressStoreResult<()> {
        self.update(|entries| {
            for key in keys::all_keys(checklist_id) {
                entries.remove(&key);
            }
        })
        .await
    }

    async fn reset_all(&self) -> ProgressStoreResult<()> {
        self.update(Entries::clear).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mode::ModePreference;
    use tempfile::TempDir;

    #[tokio::test]
    async fn survives_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("state").join("progress.json");
        let record = ProgressRecord {
            step_index: 2,
            checked: [1, 4].into_iter().collect(),
            voice_control: true,
            ..ProgressRecord::default()
        };

        FileProgressStore::new(&path).save("a", &record).await.unwrap();

        let reopened = FileProgressStore::new(&path);
        assert_eq!(reopened.load("a").await.unwrap(), record);
    }

    #[tokio::test]
    async fn file_uses_flattened_keys() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("progress.json");
        let store = FileProgressStore::new(&path);
        let record = ProgressRecord {
            checked: [3, 1].into_iter().collect(),
            mode_preference: ModePreference::ForceFullList,
            ..ProgressRecord::default()
        };
        store.save("pre", &record).await.unwrap();

        let raw: Entries = serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
        assert_eq!(raw.get("checked_pre"), Some(&Value::String("1,3".into())));
        assert_eq!(raw.get("fullList_pre"), Some(&Value::Bool(true)));
        assert_eq!(raw.get("idx_pre"), Some(&Value::from(0)));
    }

    #[tokio::test]
    async fn remove_only_touches_one_id() {
        let dir = TempDir::new().unwrap();
        let store = FileProgressStore::new(dir.path().join("progress.json"));
        let record = ProgressRecord {
            step_index: 1,
            ..ProgressRecord::default()
        };
        store.save("a", &record).await.unwrap();
        store.save("b", &record).await.unwrap();

        store.remove("a").await.unwrap();

        assert_eq!(store.load("a").await.unwrap(), ProgressRecord::default());
        assert_eq!(store.load("b").await.unwrap(), record);

        store.reset_all().await.unwrap();
        assert_eq!(store.load("b").await.unwrap(), ProgressRecord::default());
    }

    #[tokio::test]
    async fn corrupt_file_reads_as_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("progress.json");
        std::fs::write(&path, b"{ not json").unwrap();

        let store = FileProgressStore::new(&path);
        assert_eq!(store.load("a").await.unwrap(), ProgressRecord::default());
    }
}
