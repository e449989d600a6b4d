/// State layer: the owned in-memory stores and their snapshot persistence
///
/// Each store holds the authoritative copy of its list and mirrors every
/// change to the key-value storage as a full JSON snapshot.

pub mod habits;
pub mod notes;

mod persist;

// Re-export the store types and their storage keys
pub use habits::*;
pub use notes::*;
