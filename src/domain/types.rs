/// Core types and enums used throughout the domain layer
///
/// This module defines the identifier newtypes and the fixed classification,
/// completion, icon and color vocabularies used by Habit and QuickNote.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a habit
///
/// Habit ids are small integers assigned by the store (highest existing id
/// plus one). The wrapper keeps them from being confused with note ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HabitId(pub u32);

impl fmt::Display for HabitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a quick note
///
/// Note ids are derived from the creation timestamp in milliseconds, so they
/// need the wider integer type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NoteId(pub i64);

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Classification of a habit, used for filtering and aggregate scoping
///
/// The kind is fixed at creation time; the update patch has no field for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HabitKind {
    /// Everyday habits that reset each day
    #[default]
    Daily,
    /// Habits the user wants to build up
    Good,
    /// Habits the user wants to cut down
    Bad,
    /// Focus and work-related habits
    Productivity,
}

impl HabitKind {
    /// Display label for section headers
    pub fn label(&self) -> &'static str {
        match self {
            HabitKind::Daily => "Daily",
            HabitKind::Good => "Good",
            HabitKind::Bad => "Bad",
            HabitKind::Productivity => "Productivity",
        }
    }

    /// All kinds in display order
    pub fn all() -> [HabitKind; 4] {
        [
            HabitKind::Daily,
            HabitKind::Good,
            HabitKind::Bad,
            HabitKind::Productivity,
        ]
    }
}

/// How a habit is marked complete
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompletionType {
    /// Single pending/completed toggle per period
    #[default]
    Checkmark,
    /// Integer tally toward an optional target
    Count,
}

/// Completion state of a checkmark habit
///
/// Stored values outside the known set degrade to Pending rather than failing
/// the whole load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CheckStatus {
    #[default]
    Pending,
    Completed,
}

impl CheckStatus {
    /// Parse a stored status key, falling back to Pending for unknown values
    pub fn from_key(key: &str) -> Self {
        match key {
            "completed" => CheckStatus::Completed,
            _ => CheckStatus::Pending,
        }
    }

    /// The stored string form of this status
    pub fn key(&self) -> &'static str {
        match self {
            CheckStatus::Pending => "pending",
            CheckStatus::Completed => "completed",
        }
    }
}

impl From<String> for CheckStatus {
    fn from(key: String) -> Self {
        CheckStatus::from_key(&key)
    }
}

impl From<CheckStatus> for String {
    fn from(status: CheckStatus) -> Self {
        status.key().to_string()
    }
}

/// Icon shown next to a habit
///
/// The set is fixed; unknown stored keys degrade to the neutral Circle so a
/// record never becomes unloadable over a missing glyph. New drafts default
/// to Plus, matching the creation form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum HabitIcon {
    Dumbbell,
    BookOpen,
    BrainCircuit,
    CheckCircle,
    Smile,
    Frown,
    #[default]
    Plus,
    Briefcase,
    /// Neutral fallback for unknown keys
    Circle,
}

impl HabitIcon {
    /// Parse a stored icon key, falling back to the neutral Circle
    pub fn from_key(key: &str) -> Self {
        match key {
            "Dumbbell" => HabitIcon::Dumbbell,
            "BookOpen" => HabitIcon::BookOpen,
            "BrainCircuit" => HabitIcon::BrainCircuit,
            "CheckCircle" => HabitIcon::CheckCircle,
            "Smile" => HabitIcon::Smile,
            "Frown" => HabitIcon::Frown,
            "Plus" => HabitIcon::Plus,
            "Briefcase" => HabitIcon::Briefcase,
            "Circle" => HabitIcon::Circle,
            _ => HabitIcon::Circle,
        }
    }

    /// The stored string form of this icon
    pub fn key(&self) -> &'static str {
        match self {
            HabitIcon::Dumbbell => "Dumbbell",
            HabitIcon::BookOpen => "BookOpen",
            HabitIcon::BrainCircuit => "BrainCircuit",
            HabitIcon::CheckCircle => "CheckCircle",
            HabitIcon::Smile => "Smile",
            HabitIcon::Frown => "Frown",
            HabitIcon::Plus => "Plus",
            HabitIcon::Briefcase => "Briefcase",
            HabitIcon::Circle => "Circle",
        }
    }
}

impl From<String> for HabitIcon {
    fn from(key: String) -> Self {
        HabitIcon::from_key(&key)
    }
}

impl From<HabitIcon> for String {
    fn from(icon: HabitIcon) -> Self {
        icon.key().to_string()
    }
}

/// Accent color of a habit
///
/// Each color carries a fixed palette (text plus light/dark backgrounds).
/// Unknown stored keys degrade to blue, the same fallback the card renderer
/// used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum HabitColor {
    Red,
    #[default]
    Blue,
    Purple,
    Cyan,
    Orange,
    Green,
}

/// Resolved hex palette for a habit color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorSet {
    /// Foreground/accent hex value
    pub text: &'static str,
    /// Card background in light mode
    pub bg_light: &'static str,
    /// Card background in dark mode
    pub bg_dark: &'static str,
}

impl HabitColor {
    /// Parse a stored color key, falling back to blue
    pub fn from_key(key: &str) -> Self {
        match key {
            "red" => HabitColor::Red,
            "blue" => HabitColor::Blue,
            "purple" => HabitColor::Purple,
            "cyan" => HabitColor::Cyan,
            "orange" => HabitColor::Orange,
            "green" => HabitColor::Green,
            _ => HabitColor::Blue,
        }
    }

    /// The stored string form of this color
    pub fn key(&self) -> &'static str {
        match self {
            HabitColor::Red => "red",
            HabitColor::Blue => "blue",
            HabitColor::Purple => "purple",
            HabitColor::Cyan => "cyan",
            HabitColor::Orange => "orange",
            HabitColor::Green => "green",
        }
    }

    /// The fixed hex palette for this color
    pub fn palette(&self) -> ColorSet {
        match self {
            HabitColor::Red => ColorSet {
                text: "#ef4444",
                bg_light: "#fee2e2",
                bg_dark: "#450a0a",
            },
            HabitColor::Blue => ColorSet {
                text: "#3b82f6",
                bg_light: "#dbeafe",
                bg_dark: "#1e3a8a",
            },
            HabitColor::Purple => ColorSet {
                text: "#8b5cf6",
                bg_light: "#ede9fe",
                bg_dark: "#5b21b6",
            },
            HabitColor::Cyan => ColorSet {
                text: "#06b6d4",
                bg_light: "#cffafe",
                bg_dark: "#164e63",
            },
            HabitColor::Orange => ColorSet {
                text: "#f97316",
                bg_light: "#ffedd5",
                bg_dark: "#7c2d12",
            },
            HabitColor::Green => ColorSet {
                text: "#22c55e",
                bg_light: "#dcfce7",
                bg_dark: "#166534",
            },
        }
    }

    /// Background hex for the requested theme
    pub fn background(&self, dark_mode: bool) -> &'static str {
        let palette = self.palette();
        if dark_mode {
            palette.bg_dark
        } else {
            palette.bg_light
        }
    }
}

impl From<String> for HabitColor {
    fn from(key: String) -> Self {
        HabitColor::from_key(&key)
    }
}

impl From<HabitColor> for String {
    fn from(color: HabitColor) -> Self {
        color.key().to_string()
    }
}
