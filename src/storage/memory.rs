/// In-memory key-value storage for tests and ephemeral runs
///
/// Clones share the same underlying map, so a test can keep one handle for
/// inspection while the store under test writes through another. Read and
/// write failures can be induced to exercise the degraded paths.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use async_trait::async_trait;

use crate::storage::{KeyValueStorage, StorageError};

/// Map-backed storage fake with failure injection
#[derive(Debug, Default, Clone)]
pub struct MemoryStorage {
    entries: Arc<Mutex<HashMap<String, String>>>,
    fail_reads: Arc<AtomicBool>,
    fail_writes: Arc<AtomicBool>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-seed an entry, builder style
    pub fn with_entry(self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.entries().insert(key.into(), value.into());
        self
    }

    /// Make every subsequent read fail until turned off again
    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Make every subsequent write (set and remove) fail until turned off
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<String, String>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl KeyValueStorage for MemoryStorage {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StorageError::Backend("simulated read failure".to_string()));
        }
        Ok(self.entries().get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::Backend("simulated write failure".to_string()));
        }
        self.entries().insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::Backend("simulated write failure".to_string()));
        }
        self.entries().remove(key);
        Ok(())
    }
}
