//! Streak reset policy.
//!
//! Evaluated on load, on focus and on a timer by the caller; never on every
//! read of a streak.

use chrono::NaiveDate;

use super::{effective_target, window_for, Frequency, HabitRecord};

/// Whether the habit's streak must be zeroed as of `today`.
///
/// Daily: more than one full day has passed since `last_completed` (or the
/// latest completion date when that field is missing). Missing today alone is
/// still inside the grace window.
///
/// Weekly/monthly/yearly: the period right before the current one fell short
/// of the target. The current period is still in progress and never triggers
/// a reset.
pub fn should_reset(habit: &HabitRecord, today: NaiveDate) -> bool {
    match habit.frequency {
        Frequency::Daily => match habit
            .last_completed
            .or_else(|| habit.completed_dates.last().copied())
        {
            Some(last) => (today - last).num_days() > 1,
            None => false,
        },
        frequency => {
            let previous = window_for(frequency, today, -1);
            let completed = habit
                .completed_dates
                .range(previous.start..=previous.end)
                .count();
            completed < effective_target(frequency, habit.frequency_target)
        }
    }
}

/// Refresh every habit's cached streak, returning the ids whose run was reset.
pub fn reset_stale_streaks(habits: &mut [HabitRecord], today: NaiveDate) -> Vec<String> {
    habits
        .iter_mut()
        .filter_map(|habit| habit.refresh_streak(today).then(|| habit.id.clone()))
        .collect()
}
