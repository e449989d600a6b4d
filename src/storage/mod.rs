/// Storage layer: the string-keyed blob store the app persists into
///
/// Everything durable lives as JSON strings under opaque keys. This module
/// defines the async key-value interface plus the two backends: SQLite for
/// real use and an in-memory fake for tests.

pub mod sqlite;
pub mod memory;

// Re-export the main storage types
pub use sqlite::*;
pub use memory::*;

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Storage connection error: {0}")]
    Connection(String),

    #[error("Storage query error: {0}")]
    Query(#[from] rusqlite::Error),

    #[error("Storage backend error: {0}")]
    Backend(String),
}

/// Async string-keyed blob storage
///
/// This is the seam the stores persist through; any backend that can hold
/// strings under string keys works. All three operations may fail, and the
/// callers treat those failures as non-fatal.
#[async_trait]
pub trait KeyValueStorage: Send + Sync {
    /// Read the value stored under a key, if any
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write a value under a key, replacing any previous value
    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete a key; deleting an absent key is not an error
    async fn remove(&self, key: &str) -> Result<(), StorageError>;
}
