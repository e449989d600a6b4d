/// Quick-note store
///
/// Same shape as the habit store, smaller surface: notes are created and
/// deleted, never updated. Notes append, so the list reads in creation order.

use std::sync::Arc;
use chrono::Utc;

use crate::domain::{NoteId, QuickNote};
use crate::storage::KeyValueStorage;
use crate::store::persist::SnapshotWriter;

/// Storage key holding the serialized note list
pub const NOTES_KEY: &str = "quick_notes";

/// Starter notes used when nothing is stored yet
pub fn seed_notes() -> Vec<QuickNote> {
    vec![
        QuickNote::new(NoteId(1), "Remember to buy groceries after work."),
        QuickNote::new(NoteId(2), "Call mom this weekend."),
        QuickNote::new(NoteId(3), "Finish the project proposal by Wednesday."),
    ]
}

/// Owner of the quick-note list
pub struct NoteStore {
    storage: Arc<dyn KeyValueStorage>,
    writer: SnapshotWriter,
    notes: Vec<QuickNote>,
    loading: bool,
}

impl NoteStore {
    /// Create an empty store over the given storage backend
    ///
    /// Must be created inside a Tokio runtime (the snapshot writer is
    /// spawned here).
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        let writer = SnapshotWriter::spawn(Arc::clone(&storage), NOTES_KEY);
        Self {
            storage,
            writer,
            notes: Vec::new(),
            loading: true,
        }
    }

    /// Load persisted notes, falling back to the starter set
    pub async fn load(&mut self) {
        self.loading = true;

        self.notes = match self.storage.get(NOTES_KEY).await {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<QuickNote>>(&raw) {
                Ok(notes) => {
                    tracing::info!("Loaded {} notes from storage", notes.len());
                    notes
                }
                Err(e) => {
                    tracing::warn!("Stored notes are unreadable, using starter notes: {}", e);
                    seed_notes()
                }
            },
            Ok(None) => {
                tracing::info!("No stored notes, starting from starter notes");
                seed_notes()
            }
            Err(e) => {
                tracing::warn!("Failed to read notes, using starter notes: {}", e);
                seed_notes()
            }
        };

        self.loading = false;
        self.queue_persist();
    }

    /// Add a note; blank text is silently ignored
    ///
    /// The id is the current UNIX time in milliseconds, bumped when needed so
    /// ids stay strictly increasing even within one millisecond. New notes are
    /// appended.
    pub fn add(&mut self, text: &str) -> Option<NoteId> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return None;
        }

        let now = Utc::now().timestamp_millis();
        let highest = self.notes.iter().map(|n| n.id.0).max().unwrap_or(0);
        let id = NoteId(now.max(highest.saturating_add(1)));

        self.notes.push(QuickNote::new(id, trimmed));
        tracing::debug!("Added note {}", id);
        self.queue_persist();

        Some(id)
    }

    /// Remove the note with the given id; unknown ids are a warned no-op
    pub fn remove(&mut self, id: NoteId) {
        let before = self.notes.len();
        self.notes.retain(|n| n.id != id);

        if self.notes.len() == before {
            tracing::warn!("Attempted to delete non-existent note with id: {}", id);
            return;
        }

        tracing::debug!("Deleted note {}", id);
        self.queue_persist();
    }

    /// The note list, in creation order
    pub fn notes(&self) -> &[QuickNote] {
        &self.notes
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// True until the first load completes
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Write the current state directly, awaiting the result
    pub async fn flush(&self) {
        match serde_json::to_string(&self.notes) {
            Ok(json) => {
                if let Err(e) = self.storage.set(NOTES_KEY, &json).await {
                    tracing::warn!("Failed to flush notes: {}", e);
                }
            }
            Err(e) => {
                tracing::warn!("Failed to serialize notes: {}", e);
            }
        }
    }

    fn queue_persist(&self) {
        match serde_json::to_string(&self.notes) {
            Ok(json) => self.writer.submit(json),
            Err(e) => {
                tracing::warn!("Failed to serialize notes: {}", e);
            }
        }
    }
}
