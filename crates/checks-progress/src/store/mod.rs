//! Progress persistence
//!
//! A [`ProgressStore`] maps checklist ids to [`ProgressRecord`]s. How a
//! record is laid out on disk is up to the implementation.

mod file;
pub mod keys;

pub use file::FileProgressStore;

use crate::error::ProgressStoreResult;
use crate::state_machine::ProgressRecord;
use async_trait::async_trait;
use dashmap::DashMap;

/// Key-value collaborator holding one record per checklist id
#[async_trait]
pub trait ProgressStore: Send + Sync {
    /// Record for `checklist_id`, or the default record if none was saved
    async fn load(&self, checklist_id: &str) -> ProgressStoreResult<ProgressRecord>;

    /// Replace the record for `checklist_id`
    async fn save(&self, checklist_id: &str, record: &ProgressRecord) -> ProgressStoreResult<()>;

    /// Forget everything about `checklist_id`, preferences included
    async fn remove(&self, checklist_id: &str) -> ProgressStoreResult<()>;

    /// Forget every checklist
    async fn reset_all(&self) -> ProgressStoreResult<()>;
}

/// In-memory store
#[derive(Debug, Default)]
pub struct MemoryProgressStore {
    records: DashMap<String, ProgressRecord>,
}

impl MemoryProgressStore {
    /// Create empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of checklists with a saved record
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if no record was saved
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[async_trait]
impl ProgressStore for MemoryProgressStore {
    async fn load(&self, checklist_id: &str) -> ProgressStoreResult<ProgressRecord> {
        Ok(self
            .records
            .get(checklist_id)
            .map(|entry| entry.value().clone())
            .unwrap_or_default())
    }

    async fn save(&self, checklist_id: &str, record: &ProgressRecord) -> ProgressStoreResult<()> {
        self.records.insert(checklist_id.to_string(), record.clone());
        Ok(())
    }

    async fn remove(&self, checklist_id: &str) -> ProgressStoreResult<()> {
        self.records.remove(checklist_id);
        Ok(())
    }

    async fn reset_all(&self) -> ProgressStoreResult<()> {
        self.records.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mode::ModePreference;

    #[tokio::test]
    async fn unknown_id_loads_default() {
        let store = MemoryProgressStore::new();
        assert_eq!(store.load("nope").await.unwrap(), ProgressRecord::default());
    }

    #[tokio::test]
    async fn records_are_independent_per_id() {
        let store = MemoryProgressStore::new();
        let record = ProgressRecord {
            step_index: 3,
            mode_preference: ModePreference::ForceFullList,
            ..ProgressRecord::default()
        };
        store.save("a", &record).await.unwrap();

        assert_eq!(store.load("a").await.unwrap(), record);
        assert_eq!(store.load("b").await.unwrap(), ProgressRecord::default());

        store.remove("a").await.unwrap();
        assert!(store.is_empty());
    }
}
