/// Habit entity and related functionality
///
/// This module defines the core Habit struct, the draft used to create one,
/// the patch used to update one, and the single normalization path that every
/// construction and deserialization boundary funnels through.

use serde::{Deserialize, Serialize};
use crate::domain::{CheckStatus, CompletionType, DomainError, HabitColor, HabitIcon, HabitId, HabitKind};

/// A habit the user is tracking
///
/// Persisted as camelCase JSON (the field layout of the stored blobs). The
/// numeric aggregates are caller-maintained: the store never recomputes
/// streaks or completion rates on its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "StoredHabit")]
pub struct Habit {
    /// Unique identifier assigned by the store
    pub id: HabitId,
    /// Display name (e.g., "Morning Workout")
    pub name: String,
    /// Icon key from the fixed icon set
    pub icon: HabitIcon,
    /// Accent color from the fixed palette
    pub color: HabitColor,
    /// Classification; immutable after creation
    #[serde(rename = "type")]
    pub kind: HabitKind,
    /// Which completion fields are authoritative for this habit
    pub completion_type: CompletionType,
    /// Pending/completed toggle (checkmark habits)
    pub status: CheckStatus,
    /// Current consecutive-period completion count
    pub streak: u32,
    /// Best streak ever reached
    pub longest_streak: u32,
    /// Lifetime completion count
    pub total: u32,
    /// Completion percentage, 0-100
    pub completion_rate: f64,
    /// Recent per-period 0/1 completion markers
    pub trend: Vec<u8>,
    /// Current tally (count habits)
    pub count: u32,
    /// Optional tally target; None means no target
    pub target_count: Option<u32>,
    /// Free-text notes
    pub notes: String,
    /// Whether a reminder is enabled
    pub reminder: bool,
    /// Reminder time as "HH:MM"; only meaningful when reminder is true
    pub reminder_time: Option<String>,
}

/// Input for creating a habit; everything except the identity fields is
/// optional and falls back to the documented defaults
///
/// `Default` gives the same values the creation form starts from: a daily
/// checkmark habit with the Plus icon and blue accent.
#[derive(Debug, Clone, Default)]
pub struct HabitDraft {
    /// Display name; must be non-blank
    pub name: String,
    /// Classification
    pub kind: HabitKind,
    /// Completion mechanism
    pub completion_type: CompletionType,
    /// Icon key; defaults to Plus
    pub icon: HabitIcon,
    /// Accent color; defaults to blue
    pub color: HabitColor,
    /// Free-text notes
    pub notes: String,
    /// Tally target for count habits
    pub target_count: Option<u32>,
    /// Whether a reminder is enabled
    pub reminder: bool,
    /// Reminder time as "HH:MM"
    pub reminder_time: Option<String>,
    /// Optional seed values, normally left unset
    pub status: Option<CheckStatus>,
    pub streak: Option<u32>,
    pub longest_streak: Option<u32>,
    pub total: Option<u32>,
    pub completion_rate: Option<f64>,
    pub trend: Option<Vec<u8>>,
    pub count: Option<u32>,
}

impl HabitDraft {
    /// Check the draft before it is allowed to mutate the store
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.name.trim().is_empty() {
            return Err(DomainError::InvalidHabitName(
                "Habit name cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Partial update applied to an existing habit
///
/// Fields set to Some are written; None leaves the current value alone. The
/// doubly-optional fields distinguish "leave alone" from "clear". There is no
/// kind field: a habit's classification cannot change after creation.
#[derive(Debug, Clone, Default)]
pub struct HabitPatch {
    pub name: Option<String>,
    pub icon: Option<HabitIcon>,
    pub color: Option<HabitColor>,
    pub completion_type: Option<CompletionType>,
    pub status: Option<CheckStatus>,
    pub streak: Option<u32>,
    pub longest_streak: Option<u32>,
    pub total: Option<u32>,
    pub completion_rate: Option<f64>,
    pub trend: Option<Vec<u8>>,
    pub count: Option<u32>,
    pub target_count: Option<Option<u32>>,
    pub notes: Option<String>,
    pub reminder: Option<bool>,
    pub reminder_time: Option<Option<String>>,
}

impl Habit {
    /// Build a habit from a draft, filling every omitted optional field
    ///
    /// This is the one canonical normalization path: creation goes through it
    /// directly and deserialization funnels into it via [`StoredHabit`], so
    /// load-time and add-time defaulting cannot diverge.
    pub fn from_draft(id: HabitId, draft: HabitDraft) -> Self {
        Self {
            id,
            name: draft.name.trim().to_string(),
            icon: draft.icon,
            color: draft.color,
            kind: draft.kind,
            completion_type: draft.completion_type,
            status: draft.status.unwrap_or_default(),
            streak: draft.streak.unwrap_or(0),
            longest_streak: draft.longest_streak.unwrap_or(0),
            total: draft.total.unwrap_or(0),
            completion_rate: draft.completion_rate.unwrap_or(0.0),
            trend: draft.trend.unwrap_or_default(),
            count: draft.count.unwrap_or(0),
            // A stored or submitted target of 0 means "no target"
            target_count: draft.target_count.filter(|target| *target > 0),
            notes: draft.notes.trim().to_string(),
            reminder: draft.reminder,
            reminder_time: draft.reminder_time,
        }
    }

    /// Shallow-merge a patch onto this habit
    ///
    /// No cross-field validation: consumers read only the fields their
    /// completion type makes authoritative.
    pub fn apply(&mut self, patch: HabitPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(icon) = patch.icon {
            self.icon = icon;
        }
        if let Some(color) = patch.color {
            self.color = color;
        }
        if let Some(completion_type) = patch.completion_type {
            self.completion_type = completion_type;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(streak) = patch.streak {
            self.streak = streak;
        }
        if let Some(longest_streak) = patch.longest_streak {
            self.longest_streak = longest_streak;
        }
        if let Some(total) = patch.total {
            self.total = total;
        }
        if let Some(completion_rate) = patch.completion_rate {
            self.completion_rate = completion_rate;
        }
        if let Some(trend) = patch.trend {
            self.trend = trend;
        }
        if let Some(count) = patch.count {
            self.count = count;
        }
        if let Some(target_count) = patch.target_count {
            self.target_count = target_count;
        }
        if let Some(notes) = patch.notes {
            self.notes = notes;
        }
        if let Some(reminder) = patch.reminder {
            self.reminder = reminder;
        }
        if let Some(reminder_time) = patch.reminder_time {
            self.reminder_time = reminder_time;
        }
    }

    /// Whether this habit counts as complete right now
    ///
    /// Checkmark habits are complete when checked off; count habits when a
    /// target exists and the tally has reached it.
    pub fn is_completed(&self) -> bool {
        match self.completion_type {
            CompletionType::Checkmark => self.status == CheckStatus::Completed,
            CompletionType::Count => self
                .target_count
                .map_or(false, |target| self.count >= target),
        }
    }
}

/// Raw persisted form of a habit
///
/// Only the identity fields are required; everything else is optional here
/// and back-filled by [`Habit::from_draft`]. Records written before a field
/// existed load cleanly this way.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredHabit {
    id: HabitId,
    name: String,
    #[serde(rename = "type")]
    kind: HabitKind,
    completion_type: CompletionType,
    #[serde(default)]
    icon: Option<HabitIcon>,
    #[serde(default)]
    color: Option<HabitColor>,
    #[serde(default)]
    status: Option<CheckStatus>,
    #[serde(default)]
    streak: Option<u32>,
    #[serde(default)]
    longest_streak: Option<u32>,
    #[serde(default)]
    total: Option<u32>,
    #[serde(default)]
    completion_rate: Option<f64>,
    #[serde(default)]
    trend: Option<Vec<u8>>,
    #[serde(default)]
    count: Option<u32>,
    #[serde(default)]
    target_count: Option<u32>,
    #[serde(default)]
    notes: Option<String>,
    #[serde(default)]
    reminder: Option<bool>,
    #[serde(default)]
    reminder_time: Option<String>,
}

impl From<StoredHabit> for Habit {
    fn from(stored: StoredHabit) -> Self {
        let draft = HabitDraft {
            name: stored.name,
            kind: stored.kind,
            completion_type: stored.completion_type,
            // Missing icon/color fields degrade the same way unknown keys do
            icon: stored.icon.unwrap_or(HabitIcon::Circle),
            color: stored.color.unwrap_or(HabitColor::Blue),
            notes: stored.notes.unwrap_or_default(),
            target_count: stored.target_count,
            reminder: stored.reminder.unwrap_or(false),
            reminder_time: stored.reminder_time,
            status: stored.status,
            streak: stored.streak,
            longest_streak: stored.longest_streak,
            total: stored.total,
            completion_rate: stored.completion_rate,
            trend: stored.trend,
            count: stored.count,
        };
        Habit::from_draft(stored.id, draft)
    }
}
