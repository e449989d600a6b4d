/// Background persistence for store snapshots
///
/// Every mutation hands the writer a full JSON snapshot of the store. The
/// writer keeps only the newest one (a latest-value channel, not a queue), so
/// bursts coalesce and an older snapshot can never land after a newer one.
/// Write failures are logged and dropped; memory stays the source of truth.

use std::sync::Arc;
use tokio::sync::watch;

use crate::storage::KeyValueStorage;

/// Handle to a per-key background snapshot writer
///
/// Dropping the handle closes the channel and the writer task exits after
/// draining nothing further. Must be created inside a Tokio runtime.
pub struct SnapshotWriter {
    tx: watch::Sender<Option<String>>,
}

impl SnapshotWriter {
    /// Start a writer task that mirrors submitted snapshots under `key`
    pub fn spawn(storage: Arc<dyn KeyValueStorage>, key: &'static str) -> Self {
        let (tx, mut rx) = watch::channel::<Option<String>>(None);

        tokio::spawn(async move {
            while rx.changed().await.is_ok() {
                let snapshot = rx.borrow_and_update().clone();
                if let Some(json) = snapshot {
                    if let Err(e) = storage.set(key, &json).await {
                        tracing::warn!("Failed to persist snapshot under '{}': {}", key, e);
                    }
                }
            }
            tracing::debug!("Snapshot writer for '{}' stopped", key);
        });

        Self { tx }
    }

    /// Replace any snapshot still waiting to be written with this one
    pub fn submit(&self, json: String) {
        self.tx.send_replace(Some(json));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{KeyValueStorage as _, MemoryStorage};

    /// Let the current-thread test runtime run the writer task
    async fn drain() {
        for _ in 0..100 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test]
    async fn test_newest_snapshot_is_what_lands() {
        let storage = MemoryStorage::new();
        let writer = SnapshotWriter::spawn(Arc::new(storage.clone()), "habits");

        writer.submit("[1]".to_string());
        writer.submit("[1,2]".to_string());
        drain().await;

        assert_eq!(
            storage.get("habits").await.unwrap().as_deref(),
            Some("[1,2]")
        );
    }

    #[tokio::test]
    async fn test_write_failures_are_swallowed() {
        let storage = MemoryStorage::new();
        let writer = SnapshotWriter::spawn(Arc::new(storage.clone()), "habits");

        storage.set_fail_writes(true);
        writer.submit("[1]".to_string());
        drain().await;
        storage.set_fail_writes(false);
        assert_eq!(storage.get("habits").await.unwrap(), None);

        // The writer keeps going after a failure
        writer.submit("[2]".to_string());
        drain().await;
        assert_eq!(storage.get("habits").await.unwrap().as_deref(), Some("[2]"));
    }
}
