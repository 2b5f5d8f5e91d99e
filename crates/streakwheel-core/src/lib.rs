//! # Streakwheel Core Library
//!
//! Streak tracking and reward-wheel logic for habit trackers. The CLI in
//! `streakwheel-cli` is a thin layer over the same library.
//!
//! ## Architecture
//!
//! - **Habits**: calendar windows, streak calculation and the reset policy,
//!   all computed from completion dates with `today` passed in explicitly
//! - **Milestones**: streak thresholds carrying reward-tier odds, normalized
//!   to 100 when edited
//! - **Rewards**: odds resolution and a weighted draw over an injected RNG
//! - **Spin gate**: cooldown and once-per-milestone eligibility over an
//!   explicit [`SpinState`]
//! - **Storage**: TOML configuration and a JSON snapshot of engine inputs
//!
//! ## Key Components
//!
//! - [`HabitRecord`]: completions plus the cached streak
//! - [`RewardEngine`]: facade for stats, odds and spins
//! - [`SpinGate`] / [`SharedSpinGate`]: spin eligibility
//! - [`Config`]: application configuration

pub mod engine;
pub mod error;
pub mod habit;
pub mod milestone;
pub mod reward;
pub mod spin;
pub mod storage;

pub use engine::{RewardEngine, SpinOutcome, StreakStats};
pub use error::{ConfigError, CoreError, ValidationError};
pub use habit::{
    CompletionValue, Frequency, HabitRecord, OverallStats, StreakAggregation, StreakTrend,
};
pub use milestone::{default_milestones, MilestoneRow, MilestoneTable};
pub use reward::{default_rewards, RewardProbabilities, RewardRecord, RewardStats, RewardTier, WheelSegment};
pub use spin::{GateSettings, SharedSpinGate, SpinGate, SpinMode, SpinState, SpinStatus};
pub use storage::{data_dir, Config, Snapshot, SnapshotStore};
