use clap::Subcommand;
use serde::Serialize;
use streakwheel_core::habit::{
    completion_rate, reset_stale_streaks, streak_leaders, streak_score, streak_trend,
};
use streakwheel_core::{OverallStats, StreakStats, StreakTrend};

use super::{print_json, Clock, Workspace};

#[derive(Subcommand)]
pub enum StatsAction {
    /// Totals across all habits
    Overall,
    /// Milestone progress for one habit
    Habit {
        id: String,
        /// Completion-rate window in days (defaults to streak.completion_rate_days)
        #[arg(long)]
        days: Option<u32>,
        /// Trend window in days
        #[arg(long, default_value_t = 7)]
        trend_days: u32,
    },
    /// Habits with the longest streaks
    Leaders {
        #[arg(long, default_value_t = 5)]
        limit: usize,
    },
}

#[derive(Serialize)]
struct HabitReport {
    #[serde(flatten)]
    streak: StreakStats,
    completion_rate: f64,
    completion_rate_days: u32,
    trend: StreakTrend,
    score: u64,
}

#[derive(Serialize)]
struct LeaderRow<'a> {
    id: &'a str,
    streak: u32,
    score: u64,
}

pub fn run(action: StatsAction, clock: Clock) -> Result<(), Box<dyn std::error::Error>> {
    let mut ws = Workspace::open()?;
    reset_stale_streaks(&mut ws.snapshot.habits, clock.today);
    ws.save()?;

    match action {
        StatsAction::Overall => {
            let stats = OverallStats::compute(&ws.snapshot.habits, ws.snapshot.milestones.rows());
            print_json(&stats)?;
        }
        StatsAction::Habit {
            id,
            days,
            trend_days,
        } => {
            let days = days.unwrap_or(ws.config.streak.completion_rate_days);
            let habit = ws.snapshot.habit(&id)?;
            let report = HabitReport {
                streak: ws.engine().streak_stats(habit),
                completion_rate: completion_rate(habit, days, clock.today),
                completion_rate_days: days,
                trend: streak_trend(habit, trend_days, clock.today),
                score: streak_score(habit),
            };
            print_json(&report)?;
        }
        StatsAction::Leaders { limit } => {
            let rows: Vec<LeaderRow> = streak_leaders(&ws.snapshot.habits, limit)
                .into_iter()
                .map(|habit| LeaderRow {
                    id: &habit.id,
                    streak: habit.streak,
                    score: streak_score(habit),
                })
                .collect();
            print_json(&rows)?;
        }
    }
    Ok(())
}
