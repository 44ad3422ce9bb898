//! Progress session: one owner per checklist id
//!
//! Every mutation updates the in-memory [`ProgressState`] first, then queues
//! a snapshot for a background writer. The writer persists snapshots in the
//! order they were queued; when it falls behind only the newest one is kept.
//! A failed write is logged and never reaches the caller.
//!
//! ```text
//! caller ─► ProgressSession ─(mpsc)─► writer task ─► ProgressStore
//!              (state)                 (latest wins)
//! ```

use crate::mode::ModePreference;
use crate::state_machine::{ProgressRecord, ProgressState, Transition};
use crate::store::ProgressStore;
use std::collections::BTreeSet;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Owner of one checklist's progress
#[derive(Debug)]
pub struct ProgressSession {
    checklist_id: String,
    state: ProgressState,
    writer: mpsc::UnboundedSender<ProgressRecord>,
    task: JoinHandle<()>,
}

impl ProgressSession {
    /// Load the saved state for `checklist_id` and start the writer
    ///
    /// A store that cannot be read yields a fresh state.
    pub async fn open(store: Arc<dyn ProgressStore>, checklist_id: impl Into<String>) -> Self {
        let checklist_id = checklist_id.into();
        let state = match store.load(&checklist_id).await {
            Ok(record) => ProgressState::from_record(record),
            Err(e) => {
                tracing::warn!("could not load progress for '{}': {}", checklist_id, e);
                ProgressState::new()
            }
        };

        let (writer, rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(writer_task(store, checklist_id.clone(), rx));

        Self {
            checklist_id,
            state,
            writer,
            task,
        }
    }

    /// Checklist this session owns
    #[inline]
    #[must_use]
    pub fn checklist_id(&self) -> &str {
        &self.checklist_id
    }

    /// Current state
    #[inline]
    #[must_use]
    pub const fn state(&self) -> &ProgressState {
        &self.state
    }

    /// Advance one step, persisting on change
    pub fn next_step(&mut self, max_index: usize) -> Transition {
        let transition = self.state.next_step(max_index);
        self.persist_if(transition.changed());
        transition
    }

    /// Go back one step, persisting on change
    pub fn prev_step(&mut self) -> Transition {
        let transition = self.state.prev_step();
        self.persist_if(transition.changed());
        transition
    }

    /// Advance one page, persisting on change
    pub fn next_page(&mut self, max_page: usize) -> Transition {
        let transition = self.state.next_page(max_page);
        self.persist_if(transition.changed());
        transition
    }

    /// Go back one page, persisting on change
    pub fn prev_page(&mut self) -> Transition {
        let transition = self.state.prev_page();
        self.persist_if(transition.changed());
        transition
    }

    /// Jump to a step, clamped to `max_index`
    pub fn set_step(&mut self, index: usize, max_index: usize) -> Transition {
        let transition = self.state.set_step(index, max_index);
        self.persist_if(transition.changed());
        transition
    }

    /// Jump to a page, clamped to `max_page`
    pub fn set_page(&mut self, page: usize, max_page: usize) -> Transition {
        let transition = self.state.set_page(page, max_page);
        self.persist_if(transition.changed());
        transition
    }

    /// Pull both indices back inside their bounds
    pub fn clamp(&mut self, max_index: usize, max_page: usize) {
        let step = self.state.clamp_step(max_index);
        let page = self.state.clamp_page(max_page);
        self.persist_if(step.changed() || page.changed());
    }

    /// Replace the checked set
    pub fn set_checked(&mut self, checked: BTreeSet<usize>) {
        if self.state.checked() != &checked {
            self.state.set_checked(checked);
            self.persist();
        }
    }

    /// Flip one position; returns whether it is now checked
    pub fn toggle_checked(&mut self, position: usize) -> bool {
        let checked = self.state.toggle_checked(position);
        self.persist();
        checked
    }

    /// Store the display mode preference
    pub fn set_mode_preference(&mut self, preference: ModePreference) {
        if self.state.mode_preference() != preference {
            self.state.set_mode_preference(preference);
            self.persist();
        }
    }

    /// Store the voice control toggle
    pub fn set_voice_control(&mut self, enabled: bool) {
        if self.state.voice_control() != enabled {
            self.state.set_voice_control(enabled);
            self.persist();
        }
    }

    /// Clear progress, keeping preferences
    pub fn reset(&mut self) {
        self.state.reset();
        self.persist();
    }

    /// Stop accepting changes and wait for pending writes
    pub async fn close(self) {
        let Self { writer, task, .. } = self;
        drop(writer);
        if let Err(e) = task.await {
            tracing::error!("progress writer task failed: {}", e);
        }
    }

    fn persist_if(&self, changed: bool) {
        if changed {
            self.persist();
        }
    }

    fn persist(&self) {
        if self.writer.send(self.state.to_record()).is_err() {
            tracing::warn!("progress writer for '{}' is gone; change kept in memory only", self.checklist_id);
        }
    }
}

async fn writer_task(
    store: Arc<dyn ProgressStore>,
    checklist_id: String,
    mut rx: mpsc::UnboundedReceiver<ProgressRecord>,
) {
    while let Some(mut record) = rx.recv().await {
        while let Ok(newer) = rx.try_recv() {
            record = newer;
        }
        if let Err(e) = store.save(&checklist_id, &record).await {
            tracing::warn!("failed to persist progress for '{}': {}", checklist_id, e);
        }
    }
    tracing::debug!("progress writer for '{}' stopped", checklist_id);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryProgressStore;

    #[tokio::test]
    async fn changes_reach_the_store_after_close() {
        let store = Arc::new(MemoryProgressStore::new());
        let mut session = ProgressSession::open(store.clone(), "a").await;

        let _ = session.next_step(3);
        let _ = session.next_step(3);
        session.toggle_checked(1);
        session.close().await;

        let record = store.load("a").await.unwrap();
        assert_eq!(record.step_index, 2);
        assert!(record.checked.contains(&1));
    }

    #[tokio::test]
    async fn reopen_restores_state() {
        let store = Arc::new(MemoryProgressStore::new());
        let mut session = ProgressSession::open(store.clone(), "a").await;
        session.set_voice_control(true);
        session.set_mode_preference(ModePreference::ForceStepByStep);
        session.close().await;

        let session = ProgressSession::open(store, "a").await;
        assert!(session.state().voice_control());
        assert_eq!(session.state().mode_preference(), ModePreference::ForceStepByStep);
    }

    #[tokio::test]
    async fn noop_transition_is_not_written() {
        let store = Arc::new(MemoryProgressStore::new());
        let mut session = ProgressSession::open(store.clone(), "a").await;

        assert_eq!(session.prev_step(), Transition::AtBound);
        session.close().await;

        assert!(store.is_empty());
    }
}
