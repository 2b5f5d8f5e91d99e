//! Habit records and the streak math that runs over them.
//!
//! A [`HabitRecord`] is owned by the completion store; the engine only reads
//! its completions and keeps the cached `streak` field in sync with
//! [`current_streak`].

mod reset;
mod stats;
mod streak;
mod window;

pub use reset::{reset_stale_streaks, should_reset};
pub use stats::{
    completion_rate, effective_streak, streak_leaders, streak_score, streak_trend, OverallStats,
    StreakAggregation, StreakTrend,
};
pub use streak::current_streak;
pub use window::{window_for, DateWindow};

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, ValidationError};

/// Recurrence unit a habit's target applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl Frequency {
    pub fn as_str(self) -> &'static str {
        match self {
            Frequency::Daily => "daily",
            Frequency::Weekly => "weekly",
            Frequency::Monthly => "monthly",
            Frequency::Yearly => "yearly",
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Frequency {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "daily" => Ok(Frequency::Daily),
            "weekly" => Ok(Frequency::Weekly),
            "monthly" => Ok(Frequency::Monthly),
            "yearly" => Ok(Frequency::Yearly),
            other => Err(CoreError::InvalidFrequency(other.to_string())),
        }
    }
}

/// Completions required per period. Daily habits always need exactly one;
/// non-positive targets are coerced to one.
pub fn effective_target(frequency: Frequency, frequency_target: i32) -> usize {
    match frequency {
        Frequency::Daily => 1,
        _ => frequency_target.max(1) as usize,
    }
}

/// Value logged with a completion. Display-only; streak math ignores it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CompletionValue {
    Done(bool),
    Amount(f64),
}

impl Default for CompletionValue {
    fn default() -> Self {
        CompletionValue::Done(true)
    }
}

/// A habit as read from the completion store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HabitRecord {
    pub id: String,
    pub frequency: Frequency,
    #[serde(default = "default_frequency_target")]
    pub frequency_target: i32,
    #[serde(default)]
    pub completed_dates: BTreeSet<NaiveDate>,
    #[serde(default)]
    pub completion_values: BTreeMap<NaiveDate, CompletionValue>,
    /// Cached result of [`current_streak`]; never edited by hand.
    #[serde(default)]
    pub streak: u32,
    #[serde(default)]
    pub last_completed: Option<NaiveDate>,
}

fn default_frequency_target() -> i32 {
    1
}

impl HabitRecord {
    pub fn new(id: impl Into<String>, frequency: Frequency, frequency_target: i32) -> Self {
        Self {
            id: id.into(),
            frequency,
            frequency_target,
            completed_dates: BTreeSet::new(),
            completion_values: BTreeMap::new(),
            streak: 0,
            last_completed: None,
        }
    }

    /// Log a completion on `date` and recompute the cached streak as of `today`.
    ///
    /// Completing the same date twice only overwrites its value. `last_completed`
    /// never moves backwards, so backfilling an old date leaves it untouched.
    pub fn record_completion(&mut self, date: NaiveDate, value: CompletionValue, today: NaiveDate) {
        self.completed_dates.insert(date);
        self.completion_values.insert(date, value);
        self.last_completed = Some(match self.last_completed {
            Some(last) if last >= date => last,
            _ => date,
        });
        self.recompute_streak(today);
        tracing::debug!(
            habit = %self.id,
            %date,
            streak = self.streak,
            "recorded completion"
        );
    }

    /// Run the reset policy and bring the cached streak back in line.
    ///
    /// Returns true when the policy decided the run was broken. The broken run
    /// is dropped and the cached streak is recomputed from the current period,
    /// so a periodic habit keeps one only if its current period already
    /// qualifies.
    pub fn refresh_streak(&mut self, today: NaiveDate) -> bool {
        let reset = should_reset(self, today);
        let before = self.streak;
        if reset {
            self.streak = 0;
        }
        self.recompute_streak(today);
        if reset && before != self.streak {
            tracing::info!(
                habit = %self.id,
                frequency = %self.frequency,
                before,
                after = self.streak,
                "streak reset"
            );
        }
        reset
    }

    pub fn is_completed_on(&self, date: NaiveDate) -> bool {
        self.completed_dates.contains(&date)
    }

    fn recompute_streak(&mut self, today: NaiveDate) {
        self.streak = current_streak(
            &self.completed_dates,
            self.frequency,
            self.frequency_target,
            today,
        );
    }
}

/// Parse an ISO calendar date (`YYYY-MM-DD`).
pub fn parse_date(s: &str) -> Result<NaiveDate, CoreError> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|_| ValidationError::InvalidDate(s.to_string()).into())
}
