/// Quick note entity
///
/// Notes are free-text scratch entries with no update operation: they are
/// created, listed, and deleted.

use serde::{Deserialize, Serialize};
use chrono::{DateTime, TimeZone, Utc};
use crate::domain::NoteId;

/// A free-text quick note
///
/// The id doubles as the creation timestamp (UNIX milliseconds), which is how
/// the stored blobs identify notes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuickNote {
    /// Timestamp-derived unique identifier
    pub id: NoteId,
    /// Trimmed note text; never blank
    pub text: String,
}

impl QuickNote {
    pub fn new(id: NoteId, text: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
        }
    }

    /// Creation instant recovered from the id
    ///
    /// Returns None for ids outside the representable timestamp range (seed
    /// notes use small literal ids, which still map to 1970 and resolve fine).
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_millis_opt(self.id.0).single()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_created_at_matches_id() {
        let note = QuickNote::new(NoteId(1_700_000_000_000), "Call mom this weekend.");
        let at = note.created_at().unwrap();
        assert_eq!(at.timestamp_millis(), 1_700_000_000_000);
    }

    #[test]
    fn test_serializes_with_plain_fields() {
        let note = QuickNote::new(NoteId(42), "Buy groceries");
        let value = serde_json::to_value(&note).unwrap();
        assert_eq!(value["id"], 42);
        assert_eq!(value["text"], "Buy groceries");

        let reloaded: QuickNote = serde_json::from_value(value).unwrap();
        assert_eq!(reloaded, note);
    }
}
