/// The authoritative in-memory habit list with mirror persistence
///
/// The store owns the ordered habit sequence. Mutations apply to memory
/// synchronously and queue a full-snapshot write; storage is a best-effort
/// mirror, never the source of truth, so its failures degrade silently.

use std::sync::Arc;

use crate::domain::{CheckStatus, Habit, HabitDraft, HabitId, HabitKind, HabitPatch, DomainError};
use crate::storage::KeyValueStorage;
use crate::store::persist::SnapshotWriter;

/// Storage key holding the serialized habit list
pub const HABITS_KEY: &str = "habits";
/// Storage key holding the schema version string
pub const HABITS_VERSION_KEY: &str = "habits_version";
/// Current schema version; written on load, not yet read for migration
pub const SCHEMA_VERSION: &str = "1.0";

/// The built-in starter set used when nothing is stored yet
///
/// Two example daily habits, built through the canonical normalize path like
/// every other record.
pub fn seed_habits() -> Vec<Habit> {
    use crate::domain::{HabitColor, HabitIcon};

    vec![
        Habit::from_draft(
            HabitId(1),
            HabitDraft {
                name: "Morning Workout".to_string(),
                icon: HabitIcon::Dumbbell,
                color: HabitColor::Red,
                notes: "Focus on cardio today.".to_string(),
                reminder: true,
                reminder_time: Some("07:00".to_string()),
                streak: Some(5),
                longest_streak: Some(20),
                total: Some(120),
                completion_rate: Some(75.0),
                trend: Some(vec![1, 1, 0, 1, 1, 1, 0]),
                ..HabitDraft::default()
            },
        ),
        Habit::from_draft(
            HabitId(2),
            HabitDraft {
                name: "Read for 30 mins".to_string(),
                icon: HabitIcon::BookOpen,
                color: HabitColor::Blue,
                notes: "Chapter 4 of 'The Alchemist'.".to_string(),
                status: Some(CheckStatus::Completed),
                streak: Some(12),
                longest_streak: Some(30),
                total: Some(350),
                completion_rate: Some(90.0),
                trend: Some(vec![1, 1, 1, 1, 0, 1, 1]),
                ..HabitDraft::default()
            },
        ),
    ]
}

/// Owner of the habit list
///
/// Constructed once at application start and handed to consumers by
/// reference. All mutations go through `&mut self`, so there is exactly one
/// writer; the only background activity is the snapshot mirror.
pub struct HabitStore {
    storage: Arc<dyn KeyValueStorage>,
    writer: SnapshotWriter,
    habits: Vec<Habit>,
    loading: bool,
}

impl HabitStore {
    /// Create an empty store over the given storage backend
    ///
    /// The store starts in the loading state; call [`load`](Self::load) to
    /// populate it. Must be created inside a Tokio runtime (the snapshot
    /// writer is spawned here).
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        let writer = SnapshotWriter::spawn(Arc::clone(&storage), HABITS_KEY);
        Self {
            storage,
            writer,
            habits: Vec::new(),
            loading: true,
        }
    }

    /// Load the persisted list, falling back to seed data
    ///
    /// Never fails from the caller's point of view: an absent key, unreadable
    /// JSON, or a failing read all land on the seed set with a log line.
    /// Ensures the schema version key is written, clears the loading flag on
    /// every path, and mirrors the resulting state back to storage.
    pub async fn load(&mut self) {
        self.loading = true;

        let stored_version = match self.storage.get(HABITS_VERSION_KEY).await {
            Ok(version) => version,
            Err(e) => {
                tracing::warn!("Failed to read schema version: {}", e);
                None
            }
        };

        self.habits = match self.storage.get(HABITS_KEY).await {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<Habit>>(&raw) {
                Ok(habits) => {
                    tracing::info!("Loaded {} habits from storage", habits.len());
                    habits
                }
                Err(e) => {
                    tracing::warn!("Stored habits are unreadable, using seed data: {}", e);
                    seed_habits()
                }
            },
            Ok(None) => {
                tracing::info!("No stored habits, starting from seed data");
                seed_habits()
            }
            Err(e) => {
                tracing::warn!("Failed to read habits, using seed data: {}", e);
                seed_habits()
            }
        };

        if stored_version.as_deref() != Some(SCHEMA_VERSION) {
            if let Err(e) = self.storage.set(HABITS_VERSION_KEY, SCHEMA_VERSION).await {
                tracing::warn!("Failed to write schema version: {}", e);
            }
        }

        self.loading = false;
        self.queue_persist();
    }

    /// Add a new habit from a draft
    ///
    /// Validates before touching state, assigns the next id (highest existing
    /// plus one, starting at 1, saturating at the id ceiling), appends
    /// preserving insertion order, and queues a persist.
    pub fn add(&mut self, draft: HabitDraft) -> Result<HabitId, DomainError> {
        draft.validate()?;

        let highest = self.habits.iter().map(|h| h.id.0).max().unwrap_or(0);
        let next_id = HabitId(highest.saturating_add(1));
        let habit = Habit::from_draft(next_id, draft);
        tracing::debug!("Added habit '{}' ({})", habit.name, habit.id);
        self.habits.push(habit);
        self.queue_persist();

        Ok(next_id)
    }

    /// Shallow-merge a patch onto the habit with the given id
    ///
    /// Unknown ids are a warned no-op; idempotent updates are an accepted
    /// caller pattern.
    pub fn update(&mut self, id: HabitId, patch: HabitPatch) {
        match self.habits.iter_mut().find(|h| h.id == id) {
            Some(habit) => {
                habit.apply(patch);
                tracing::debug!("Updated habit {}", id);
                self.queue_persist();
            }
            None => {
                tracing::warn!("Attempted to update non-existent habit with id: {}", id);
            }
        }
    }

    /// Remove the habit with the given id
    ///
    /// Unknown ids are a warned no-op. Removed ids are never reused: the next
    /// add still takes highest-plus-one.
    pub fn remove(&mut self, id: HabitId) {
        let before = self.habits.len();
        self.habits.retain(|h| h.id != id);

        if self.habits.len() == before {
            tracing::warn!("Attempted to delete non-existent habit with id: {}", id);
            return;
        }

        tracing::debug!("Deleted habit {}", id);
        self.queue_persist();
    }

    /// Add a signed delta to a habit's tally, clamped at zero
    pub fn adjust_count(&mut self, id: HabitId, delta: i32) {
        match self.habits.iter_mut().find(|h| h.id == id) {
            Some(habit) => {
                habit.count = habit.count.saturating_add_signed(delta);
                tracing::debug!("Habit {} count is now {}", id, habit.count);
                self.queue_persist();
            }
            None => {
                tracing::warn!("Attempted to change count of non-existent habit with id: {}", id);
            }
        }
    }

    /// Start a new day: every daily habit goes back to pending with a zero
    /// tally; other kinds are untouched
    pub fn reset_daily(&mut self) {
        for habit in self.habits.iter_mut().filter(|h| h.kind == HabitKind::Daily) {
            habit.status = CheckStatus::Pending;
            habit.count = 0;
        }
        tracing::debug!("Reset daily habits");
        self.queue_persist();
    }

    /// The full list in insertion order
    pub fn habits(&self) -> &[Habit] {
        &self.habits
    }

    /// Look up a habit by id
    pub fn find_by_id(&self, id: HabitId) -> Option<&Habit> {
        self.habits.iter().find(|h| h.id == id)
    }

    /// All habits of one kind, preserving relative order
    pub fn by_kind(&self, kind: HabitKind) -> Vec<&Habit> {
        self.habits.iter().filter(|h| h.kind == kind).collect()
    }

    pub fn len(&self) -> usize {
        self.habits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.habits.is_empty()
    }

    /// True until the first load completes
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Write the current state directly, awaiting the result
    ///
    /// For shutdown and tests; failures are still only logged.
    pub async fn flush(&self) {
        match serde_json::to_string(&self.habits) {
            Ok(json) => {
                if let Err(e) = self.storage.set(HABITS_KEY, &json).await {
                    tracing::warn!("Failed to flush habits: {}", e);
                }
            }
            Err(e) => {
                tracing::warn!("Failed to serialize habits: {}", e);
            }
        }
    }

    /// Hand the current state to the background writer
    fn queue_persist(&self) {
        match serde_json::to_string(&self.habits) {
            Ok(json) => self.writer.submit(json),
            Err(e) => {
                tracing::warn!("Failed to serialize habits: {}", e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CompletionType, HabitColor, HabitIcon};
    use crate::storage::{KeyValueStorage as _, MemoryStorage};

    fn checkmark_draft(name: &str) -> HabitDraft {
        HabitDraft {
            name: name.to_string(),
            ..HabitDraft::default()
        }
    }

    fn count_draft(name: &str, kind: HabitKind, target: Option<u32>) -> HabitDraft {
        HabitDraft {
            name: name.to_string(),
            kind,
            completion_type: CompletionType::Count,
            target_count: target,
            ..HabitDraft::default()
        }
    }

    async fn loaded_store(storage: MemoryStorage) -> HabitStore {
        let mut store = HabitStore::new(Arc::new(storage));
        store.load().await;
        store
    }

    fn empty_store() -> HabitStore {
        // No load: starts genuinely empty, for the id-assignment properties
        let mut store = HabitStore::new(Arc::new(MemoryStorage::new()));
        store.loading = false;
        store
    }

    #[tokio::test]
    async fn test_load_seeds_when_storage_is_empty() {
        let store = loaded_store(MemoryStorage::new()).await;

        assert!(!store.is_loading());
        assert_eq!(store.len(), 2);
        assert_eq!(store.habits()[0].name, "Morning Workout");
        assert_eq!(store.habits()[0].icon, HabitIcon::Dumbbell);
        assert_eq!(store.habits()[0].color, HabitColor::Red);
        assert_eq!(store.habits()[0].streak, 5);
        assert_eq!(store.habits()[1].name, "Read for 30 mins");
        assert_eq!(store.habits()[1].status, CheckStatus::Completed);
        assert_eq!(store.habits()[1].total, 350);
    }

    #[tokio::test]
    async fn test_load_writes_schema_version() {
        let storage = MemoryStorage::new();
        let _store = loaded_store(storage.clone()).await;

        assert_eq!(
            storage.get(HABITS_VERSION_KEY).await.unwrap().as_deref(),
            Some(SCHEMA_VERSION)
        );
    }

    #[tokio::test]
    async fn test_load_reads_persisted_habits() {
        let json = r#"[{"id":5,"name":"Meditate","type":"daily","completionType":"checkmark","status":"completed","streak":3}]"#;
        let storage = MemoryStorage::new().with_entry(HABITS_KEY, json);
        let store = loaded_store(storage).await;

        assert_eq!(store.len(), 1);
        let habit = store.find_by_id(HabitId(5)).unwrap();
        assert_eq!(habit.name, "Meditate");
        assert_eq!(habit.status, CheckStatus::Completed);
        assert_eq!(habit.streak, 3);
        // Fields the stored record omitted are back-filled
        assert_eq!(habit.count, 0);
        assert_eq!(habit.target_count, None);
        assert!(habit.trend.is_empty());
    }

    #[tokio::test]
    async fn test_load_falls_back_on_corrupt_json() {
        let storage = MemoryStorage::new().with_entry(HABITS_KEY, "definitely not json");
        let store = loaded_store(storage).await;

        assert!(!store.is_loading());
        assert_eq!(store.len(), 2);
        assert_eq!(store.habits()[0].name, "Morning Workout");
    }

    #[tokio::test]
    async fn test_load_falls_back_on_read_failure() {
        let storage = MemoryStorage::new();
        storage.set_fail_reads(true);
        let store = loaded_store(storage).await;

        assert!(!store.is_loading());
        assert_eq!(store.len(), 2);
    }

    #[tokio::test]
    async fn test_add_assigns_strictly_increasing_ids_from_one() {
        let mut store = empty_store();

        let first = store.add(checkmark_draft("One")).unwrap();
        let second = store.add(checkmark_draft("Two")).unwrap();
        let third = store.add(checkmark_draft("Three")).unwrap();

        assert_eq!(first, HabitId(1));
        assert_eq!(second, HabitId(2));
        assert_eq!(third, HabitId(3));
    }

    #[tokio::test]
    async fn test_add_saturates_at_the_id_ceiling() {
        let json = format!(
            r#"[{{"id":{},"name":"Edge","type":"daily","completionType":"checkmark"}}]"#,
            u32::MAX
        );
        let storage = MemoryStorage::new().with_entry(HABITS_KEY, json);
        let mut store = loaded_store(storage).await;

        // A stored id at the ceiling must not overflow the next assignment
        let id = store.add(checkmark_draft("One more")).unwrap();
        assert_eq!(id, HabitId(u32::MAX));
        assert_eq!(store.len(), 2);
    }

    #[tokio::test]
    async fn test_add_drink_water_scenario() {
        let mut store = empty_store();

        let id = store
            .add(count_draft("Drink Water", HabitKind::Good, Some(8)))
            .unwrap();

        assert_eq!(id, HabitId(1));
        let habit = store.find_by_id(id).unwrap();
        assert_eq!(habit.count, 0);
        assert_eq!(habit.target_count, Some(8));
        assert_eq!(habit.status, CheckStatus::Pending);
    }

    #[tokio::test]
    async fn test_add_rejects_blank_name_without_mutating() {
        let mut store = empty_store();

        assert!(store.add(checkmark_draft("   ")).is_err());
        assert!(store.is_empty());

        // The next successful add still starts at 1
        assert_eq!(store.add(checkmark_draft("Walk")).unwrap(), HabitId(1));
    }

    #[tokio::test]
    async fn test_ids_are_not_reused_after_remove() {
        let mut store = empty_store();
        store.add(checkmark_draft("One")).unwrap();
        store.add(checkmark_draft("Two")).unwrap();

        store.remove(HabitId(1));
        assert_eq!(store.len(), 1);
        assert_eq!(store.habits()[0].id, HabitId(2));

        let next = store.add(checkmark_draft("Three")).unwrap();
        assert_eq!(next, HabitId(3));
    }

    #[tokio::test]
    async fn test_update_merges_only_patched_fields() {
        let mut store = loaded_store(MemoryStorage::new()).await;

        store.update(
            HabitId(1),
            HabitPatch {
                status: Some(CheckStatus::Completed),
                streak: Some(6),
                ..HabitPatch::default()
            },
        );

        let habit = store.find_by_id(HabitId(1)).unwrap();
        assert_eq!(habit.status, CheckStatus::Completed);
        assert_eq!(habit.streak, 6);
        assert_eq!(habit.name, "Morning Workout");
        assert_eq!(habit.longest_streak, 20);
    }

    #[tokio::test]
    async fn test_update_unknown_id_is_a_no_op() {
        let mut store = loaded_store(MemoryStorage::new()).await;
        let before = store.habits().to_vec();

        store.update(
            HabitId(99),
            HabitPatch {
                name: Some("x".to_string()),
                ..HabitPatch::default()
            },
        );

        assert_eq!(store.habits(), before.as_slice());
    }

    #[tokio::test]
    async fn test_remove_unknown_id_keeps_state() {
        let mut store = loaded_store(MemoryStorage::new()).await;

        store.remove(HabitId(99));

        assert_eq!(store.len(), 2);
        assert!(store.find_by_id(HabitId(99)).is_none());
    }

    #[tokio::test]
    async fn test_remove_shrinks_by_exactly_one() {
        let mut store = loaded_store(MemoryStorage::new()).await;

        store.remove(HabitId(1));

        assert_eq!(store.len(), 1);
        assert!(store.find_by_id(HabitId(1)).is_none());
        assert!(store.find_by_id(HabitId(2)).is_some());
    }

    #[tokio::test]
    async fn test_by_kind_preserves_relative_order() {
        let mut store = empty_store();
        store.add(checkmark_draft("Daily A")).unwrap();
        store
            .add(count_draft("Good B", HabitKind::Good, None))
            .unwrap();
        store.add(checkmark_draft("Daily C")).unwrap();

        let dailies = store.by_kind(HabitKind::Daily);
        assert_eq!(dailies.len(), 2);
        assert_eq!(dailies[0].name, "Daily A");
        assert_eq!(dailies[1].name, "Daily C");

        assert_eq!(store.by_kind(HabitKind::Bad).len(), 0);
    }

    #[tokio::test]
    async fn test_flush_round_trips_through_storage() {
        let storage = MemoryStorage::new();
        let mut store = loaded_store(storage.clone()).await;
        store
            .add(count_draft("Drink Water", HabitKind::Good, Some(8)))
            .unwrap();
        store.update(
            HabitId(1),
            HabitPatch {
                streak: Some(6),
                ..HabitPatch::default()
            },
        );
        store.flush().await;

        let reloaded = loaded_store(storage).await;
        assert_eq!(reloaded.habits(), store.habits());
    }

    #[tokio::test]
    async fn test_write_failure_keeps_memory_authoritative() {
        let storage = MemoryStorage::new();
        storage.set_fail_writes(true);
        let mut store = HabitStore::new(Arc::new(storage.clone()));

        store.add(checkmark_draft("Walk")).unwrap();
        store.flush().await;

        // Nothing landed in storage, but the in-memory state kept the add
        assert_eq!(store.len(), 1);
        assert_eq!(storage.get(HABITS_KEY).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_background_persist_eventually_lands() {
        let storage = MemoryStorage::new();
        let mut store = HabitStore::new(Arc::new(storage.clone()));

        store.add(checkmark_draft("Walk")).unwrap();
        for _ in 0..100 {
            tokio::task::yield_now().await;
        }

        let raw = storage.get(HABITS_KEY).await.unwrap().unwrap();
        let persisted: Vec<Habit> = serde_json::from_str(&raw).unwrap();
        assert_eq!(persisted.as_slice(), store.habits());
    }

    #[tokio::test]
    async fn test_adjust_count_clamps_at_zero() {
        let mut store = empty_store();
        let id = store
            .add(count_draft("Drink Water", HabitKind::Good, Some(8)))
            .unwrap();

        store.adjust_count(id, 3);
        assert_eq!(store.find_by_id(id).unwrap().count, 3);

        store.adjust_count(id, -5);
        assert_eq!(store.find_by_id(id).unwrap().count, 0);

        store.adjust_count(HabitId(99), 1); // Unknown id: no panic, no change
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_reset_daily_touches_only_daily_habits() {
        let mut store = loaded_store(MemoryStorage::new()).await;
        let good = store
            .add(count_draft("Drink Water", HabitKind::Good, Some(8)))
            .unwrap();
        store.adjust_count(good, 4);
        store.update(
            HabitId(1),
            HabitPatch {
                status: Some(CheckStatus::Completed),
                count: Some(2),
                ..HabitPatch::default()
            },
        );

        store.reset_daily();

        let first = store.find_by_id(HabitId(1)).unwrap();
        assert_eq!(first.status, CheckStatus::Pending);
        assert_eq!(first.count, 0);
        let second = store.find_by_id(HabitId(2)).unwrap();
        assert_eq!(second.status, CheckStatus::Pending);

        // Non-daily habits keep their tallies
        assert_eq!(store.find_by_id(good).unwrap().count, 4);
    }
}
