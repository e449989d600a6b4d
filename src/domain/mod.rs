/// Domain module containing core business logic and data types
///
/// This module defines the core entities (Habit, QuickNote) and the fixed
/// vocabularies they draw from, along with creation-time validation rules.

pub mod habit;
pub mod note;
pub mod types;

// Re-export public types for easy access
pub use habit::*;
pub use note::*;
pub use types::*;

use thiserror::Error;

/// Errors that can occur during domain operations
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Invalid habit name: {0}")]
    InvalidHabitName(String),
}
