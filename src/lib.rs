/// Public library interface for the HabitKit core
///
/// This crate carries the offline-first state layer of a habit tracker:
/// owned in-memory stores with snapshot persistence, a session gate in
/// front of an external identity provider, and read-only statistics.

use std::sync::Arc;
use thiserror::Error;

pub mod auth;
pub mod domain;
pub mod stats;
pub mod storage;
pub mod store;

// Re-export the headline types for easy access
pub use auth::{
    AuthError, IdentityProvider, MemoryIdentityProvider, Session, SessionGate, SessionState,
};
pub use domain::*;
pub use storage::{KeyValueStorage, MemoryStorage, SqliteStorage, StorageError};
pub use store::{HabitStore, NoteStore};

/// Errors that can occur during app operation
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("Authentication error: {0}")]
    Auth(#[from] auth::AuthError),

    #[error("Domain validation error: {0}")]
    Domain(#[from] domain::DomainError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// The assembled app core: session gate plus the two stores
///
/// Owns one storage handle shared by both stores and one identity provider
/// behind the session gate. Construction only wires the pieces together;
/// `bootstrap` performs the startup work.
pub struct HabitApp {
    session: SessionGate,
    habits: HabitStore,
    notes: NoteStore,
}

impl HabitApp {
    pub fn new(storage: Arc<dyn KeyValueStorage>, provider: Arc<dyn IdentityProvider>) -> Self {
        Self {
            session: SessionGate::new(provider),
            habits: HabitStore::new(Arc::clone(&storage)),
            notes: NoteStore::new(storage),
        }
    }

    /// Run the startup sequence: session check, then both store loads
    ///
    /// Never fails. A broken storage or identity backend degrades to seeded
    /// stores and a signed-out session, so the app always comes up.
    pub async fn bootstrap(&mut self) {
        tracing::info!("Bootstrapping app core");
        self.session.resolve().await;
        self.habits.load().await;
        self.notes.load().await;
    }

    /// Write both stores through to storage, bypassing the background writers
    ///
    /// Useful before exit, when there is no time left for the fire-and-forget
    /// mirror to catch up.
    pub async fn flush(&self) {
        self.habits.flush().await;
        self.notes.flush().await;
    }

    /// Get a reference to the session gate
    pub fn session(&self) -> &SessionGate {
        &self.session
    }

    /// Get a reference to the habit store
    pub fn habits(&self) -> &HabitStore {
        &self.habits
    }

    /// Get a mutable reference to the habit store
    pub fn habits_mut(&mut self) -> &mut HabitStore {
        &mut self.habits
    }

    /// Get a reference to the note store
    pub fn notes(&self) -> &NoteStore {
        &self.notes
    }

    /// Get a mutable reference to the note store
    pub fn notes_mut(&mut self) -> &mut NoteStore {
        &mut self.notes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_bootstrap_brings_up_every_layer() {
        let storage = Arc::new(MemoryStorage::default());
        let provider = Arc::new(MemoryIdentityProvider::new());
        let mut app = HabitApp::new(storage, provider);

        assert!(app.session().is_loading());
        assert!(app.habits().is_loading());

        app.bootstrap().await;

        assert_eq!(app.session().state(), SessionState::Unauthenticated);
        assert!(!app.habits().is_loading());
        assert_eq!(app.habits().len(), 2); // starter habits
        assert_eq!(app.notes().notes().len(), 3); // starter notes
    }

    #[tokio::test]
    async fn test_bootstrap_survives_broken_storage() {
        let storage = MemoryStorage::default();
        storage.set_fail_reads(true);
        let mut app = HabitApp::new(
            Arc::new(storage),
            Arc::new(MemoryIdentityProvider::new()),
        );

        app.bootstrap().await;
        assert_eq!(app.habits().len(), 2); // seeded despite the read failure
    }
}
