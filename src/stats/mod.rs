/// Read-only statistics over the in-memory habit list
///
/// Everything here is a pure computation on `&[Habit]` slices. Aggregates
/// that need per-day history (overview figures, week/month summaries) return
/// fixed placeholder values until history recording lands.

use crate::domain::{Habit, HabitKind};

/// Today's completion progress across daily habits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailyProgress {
    pub completed: usize,
    pub total: usize,
}

impl DailyProgress {
    /// Completion as a whole percentage, 0 when there are no daily habits
    pub fn percent(&self) -> u32 {
        if self.total == 0 {
            return 0;
        }
        (self.completed * 100 / self.total) as u32
    }
}

/// Count completed daily habits against the daily total
pub fn daily_progress(habits: &[Habit]) -> DailyProgress {
    let dailies: Vec<&Habit> = habits
        .iter()
        .filter(|h| h.kind == HabitKind::Daily)
        .collect();

    DailyProgress {
        completed: dailies.iter().filter(|h| h.is_completed()).count(),
        total: dailies.len(),
    }
}

/// Daily habits ranked by current streak, longest first
///
/// Ties keep list order, so two habits on the same streak appear in the
/// order the user arranged them.
pub fn top_streaks(habits: &[Habit], limit: usize) -> Vec<&Habit> {
    let mut ranked: Vec<&Habit> = habits
        .iter()
        .filter(|h| h.kind == HabitKind::Daily)
        .collect();
    ranked.sort_by(|a, b| b.streak.cmp(&a.streak));
    ranked.truncate(limit);
    ranked
}

/// Daily habits ranked by total completions, highest first
pub fn top_totals(habits: &[Habit], limit: usize) -> Vec<&Habit> {
    let mut ranked: Vec<&Habit> = habits
        .iter()
        .filter(|h| h.kind == HabitKind::Daily)
        .collect();
    ranked.sort_by(|a, b| b.total.cmp(&a.total));
    ranked.truncate(limit);
    ranked
}

/// Headline figures for the statistics screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Overview {
    /// Overall completion percentage across all habits
    pub overall_completion: u32,
    /// Current streak in days
    pub current_streak: u32,
    /// Longest streak ever recorded
    pub longest_streak: u32,
    /// Days where every daily habit was completed
    pub perfect_days: u32,
}

/// Headline figures
///
/// Placeholder values until per-day history is recorded.
pub fn overview() -> Overview {
    Overview {
        overall_completion: 82,
        current_streak: 14,
        longest_streak: 45,
        perfect_days: 21,
    }
}

/// Reporting window for check-in summaries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryPeriod {
    Week,
    Month,
}

/// Check-in counts over a reporting window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeriodSummary {
    pub total: u32,
    pub completed: u32,
    pub missed: u32,
}

/// Check-in summary for the given window
///
/// Placeholder values until per-day history is recorded.
pub fn summary(period: SummaryPeriod) -> PeriodSummary {
    match period {
        SummaryPeriod::Week => PeriodSummary {
            total: 3,
            completed: 1,
            missed: 1,
        },
        SummaryPeriod::Month => PeriodSummary {
            total: 12,
            completed: 8,
            missed: 2,
        },
    }
}
