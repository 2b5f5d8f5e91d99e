//! Aggregate numbers over one or many habits.

use std::ops::Bound::{Excluded, Included};

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use super::HabitRecord;
use crate::milestone::{achieved_milestones, MilestoneRow};

/// How the streaks of several habits collapse into the one streak the wheel
/// is driven by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreakAggregation {
    /// Best streak among all habits.
    #[default]
    Highest,
    /// Weakest streak, so every habit has to reach a milestone.
    All,
}

/// Streak the wheel should use for this set of habits. Zero when there are none.
pub fn effective_streak(habits: &[HabitRecord], aggregation: StreakAggregation) -> u32 {
    let streaks = habits.iter().map(|h| h.streak);
    match aggregation {
        StreakAggregation::Highest => streaks.max(),
        StreakAggregation::All => streaks.min(),
    }
    .unwrap_or(0)
}

/// Percentage of the last `days` days (ending today) with a completion.
pub fn completion_rate(habit: &HabitRecord, days: u32, today: NaiveDate) -> f64 {
    if days == 0 {
        return 0.0;
    }
    let start = today
        .checked_sub_signed(Duration::days(i64::from(days) - 1))
        .unwrap_or(NaiveDate::MIN);
    let completed = habit.completed_dates.range(start..=today).count();
    completed as f64 / f64::from(days) * 100.0
}

/// Direction of a habit's recent activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StreakTrend {
    Up,
    Down,
    Stable,
}

/// Compare completions in the last `days` days against the `days` before.
///
/// Stable when `days` is zero or the habit has fewer than `days` completions
/// overall.
pub fn streak_trend(habit: &HabitRecord, days: u32, today: NaiveDate) -> StreakTrend {
    if days == 0 || habit.completed_dates.len() < days as usize {
        return StreakTrend::Stable;
    }
    let back = |n: i64| {
        today
            .checked_sub_signed(Duration::days(n))
            .unwrap_or(NaiveDate::MIN)
    };
    let split = back(i64::from(days));
    let earliest = back(2 * i64::from(days));

    let dates = &habit.completed_dates;
    let recent = dates.range((Excluded(split), Included(today))).count();
    let earlier = dates.range((Excluded(earliest), Included(split))).count();

    match recent.cmp(&earlier) {
        std::cmp::Ordering::Greater => StreakTrend::Up,
        std::cmp::Ordering::Less => StreakTrend::Down,
        std::cmp::Ordering::Equal => StreakTrend::Stable,
    }
}

/// Ranking score: ten points per streak period plus a five point consistency
/// bonus per period, and two points per logged completion.
pub fn streak_score(habit: &HabitRecord) -> u64 {
    let streak = u64::from(habit.streak);
    let completions = habit.completed_dates.len() as u64;
    streak * 10 + streak * 5 + completions * 2
}

/// Up to `limit` habits with the longest cached streak, best first. Ties keep
/// their stored order.
pub fn streak_leaders(habits: &[HabitRecord], limit: usize) -> Vec<&HabitRecord> {
    let mut ranked: Vec<&HabitRecord> = habits.iter().collect();
    ranked.sort_by(|a, b| b.streak.cmp(&a.streak));
    ranked.truncate(limit);
    ranked
}

/// Dashboard summary across all habits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverallStats {
    pub longest_streak: u32,
    pub active_streaks: usize,
    pub total_habits: usize,
    /// Mean cached streak, rounded to one decimal.
    pub average_streak: f64,
    /// Achieved milestones summed over every habit.
    pub milestones_reached: usize,
    pub streak_percentage: f64,
}

impl OverallStats {
    pub fn compute(habits: &[HabitRecord], milestones: &[MilestoneRow]) -> Self {
        let total_habits = habits.len();
        let active_streaks = habits.iter().filter(|h| h.streak > 0).count();
        let longest_streak = habits.iter().map(|h| h.streak).max().unwrap_or(0);

        let (average_streak, streak_percentage) = if total_habits > 0 {
            let sum: u64 = habits.iter().map(|h| u64::from(h.streak)).sum();
            let average = sum as f64 / total_habits as f64;
            (
                (average * 10.0).round() / 10.0,
                active_streaks as f64 / total_habits as f64 * 100.0,
            )
        } else {
            (0.0, 0.0)
        };

        let milestones_reached = habits
            .iter()
            .map(|h| achieved_milestones(h.streak, milestones).len())
            .sum();

        Self {
            longest_streak,
            active_streaks,
            total_habits,
            average_streak,
            milestones_reached,
            streak_percentage,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::habit::Frequency;
    use crate::milestone::default_milestones;

    fn with_streak(id: &str, streak: u32) -> HabitRecord {
        let mut habit = HabitRecord::new(id, Frequency::Daily, 1);
        habit.streak = streak;
        habit
    }

    #[test]
    fn effective_streak_highest_and_all() {
        let habits = vec![with_streak("a", 3), with_streak("b", 12), with_streak("c", 8)];
        assert_eq!(effective_streak(&habits, StreakAggregation::Highest), 12);
        assert_eq!(effective_streak(&habits, StreakAggregation::All), 3);
        assert_eq!(effective_streak(&[], StreakAggregation::All), 0);
    }

    #[test]
    fn completion_rate_counts_window_ending_today() {
        let today = NaiveDate::from_ymd_opt(2025, 3, 30).unwrap();
        let mut habit = HabitRecord::new("a", Frequency::Daily, 1);
        for offset in [0, 1, 2, 9, 10] {
            habit.completed_dates.insert(today - Duration::days(offset));
        }
        assert_eq!(completion_rate(&habit, 10, today), 40.0);
        assert_eq!(completion_rate(&habit, 0, today), 0.0);
    }

    #[test]
    fn completion_rate_survives_huge_windows() {
        let today = NaiveDate::from_ymd_opt(2025, 3, 12).unwrap();
        let mut habit = HabitRecord::new("a", Frequency::Daily, 1);
        habit.completed_dates.insert(today);
        let rate = completion_rate(&habit, u32::MAX, today);
        assert!(rate > 0.0 && rate < 1e-6);
    }

    fn completed_on(today: NaiveDate, offsets: &[i64]) -> HabitRecord {
        let mut habit = HabitRecord::new("t", Frequency::Daily, 1);
        for offset in offsets {
            habit.completed_dates.insert(today - Duration::days(*offset));
        }
        habit
    }

    #[test]
    fn trend_compares_recent_and_earlier_windows() {
        let today = NaiveDate::from_ymd_opt(2025, 3, 12).unwrap();

        let rising = completed_on(today, &[0, 1, 2, 5]);
        assert_eq!(streak_trend(&rising, 3, today), StreakTrend::Up);

        let falling = completed_on(today, &[1, 3, 4, 5]);
        assert_eq!(streak_trend(&falling, 3, today), StreakTrend::Down);

        let steady = completed_on(today, &[0, 1, 3, 4]);
        assert_eq!(streak_trend(&steady, 3, today), StreakTrend::Stable);
    }

    #[test]
    fn trend_is_stable_with_little_history() {
        let today = NaiveDate::from_ymd_opt(2025, 3, 12).unwrap();
        let sparse = completed_on(today, &[0, 1]);
        assert_eq!(streak_trend(&sparse, 7, today), StreakTrend::Stable);
        assert_eq!(streak_trend(&sparse, 0, today), StreakTrend::Stable);
    }

    #[test]
    fn score_weights_streak_and_completions() {
        let mut habit = with_streak("a", 4);
        for day in 1..=6 {
            habit
                .completed_dates
                .insert(NaiveDate::from_ymd_opt(2025, 3, day).unwrap());
        }
        // 4 * 10 + 4 * 5 + 6 * 2
        assert_eq!(streak_score(&habit), 72);

        let mut idle = with_streak("b", 0);
        idle.completed_dates
            .insert(NaiveDate::from_ymd_opt(2025, 3, 1).unwrap());
        assert_eq!(streak_score(&idle), 2);
    }

    #[test]
    fn leaders_are_sorted_and_limited() {
        let habits = vec![
            with_streak("a", 3),
            with_streak("b", 12),
            with_streak("c", 8),
            with_streak("d", 12),
        ];
        let ids: Vec<&str> = streak_leaders(&habits, 3).iter().map(|h| h.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "d", "c"]);
        assert!(streak_leaders(&habits, 0).is_empty());
        assert_eq!(streak_leaders(&habits, 10).len(), 4);
    }

    #[test]
    fn overall_stats_summarize_habits() {
        let habits = vec![with_streak("a", 0), with_streak("b", 15), with_streak("c", 7)];
        let stats = OverallStats::compute(&habits, &default_milestones());

        assert_eq!(stats.longest_streak, 15);
        assert_eq!(stats.active_streaks, 2);
        assert_eq!(stats.total_habits, 3);
        assert_eq!(stats.average_streak, 7.3);
        // 15 reaches 7 and 14, 7 reaches 7.
        assert_eq!(stats.milestones_reached, 3);
        assert!((stats.streak_percentage - 66.666).abs() < 0.01);
    }

    #[test]
    fn overall_stats_on_empty_input() {
        let stats = OverallStats::compute(&[], &[]);
        assert_eq!(stats.total_habits, 0);
        assert_eq!(stats.average_streak, 0.0);
        assert_eq!(stats.streak_percentage, 0.0);
    }
}
