//! Spin eligibility gate.
//!
//! Two modes over one [`SpinState`]:
//!
//! - **Cooldown**: needs a minimum streak, optionally an achieved milestone,
//!   and a full cooldown since the last spin.
//! - **Once per milestone**: every achieved milestone threshold buys exactly
//!   one spin.
//!
//! Switching modes keeps both the last spin time and the consumed thresholds,
//! so switching back later picks up where it left off.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, ValidationError};
use crate::milestone::{achieved_milestones, next_milestone, MilestoneRow};

/// Which rule decides whether a spin is allowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpinMode {
    #[default]
    Cooldown,
    OncePerMilestone,
}

impl SpinMode {
    pub fn as_str(self) -> &'static str {
        match self {
            SpinMode::Cooldown => "cooldown",
            SpinMode::OncePerMilestone => "once_per_milestone",
        }
    }
}

impl fmt::Display for SpinMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SpinMode {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "cooldown" => Ok(SpinMode::Cooldown),
            "once_per_milestone" | "milestone" => Ok(SpinMode::OncePerMilestone),
            other => Err(ValidationError::InvalidValue {
                field: "mode".into(),
                message: format!("'{other}' is not one of cooldown, once_per_milestone"),
            }
            .into()),
        }
    }
}

/// Gate bookkeeping. Only a successful spin changes it.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SpinState {
    #[serde(default)]
    pub mode: SpinMode,
    #[serde(default)]
    pub last_spin_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub consumed_milestones: BTreeSet<u32>,
}

/// Cooldown-mode thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateSettings {
    pub min_streak_for_wheel: u32,
    /// Also require at least one achieved milestone.
    pub milestone_gated: bool,
    /// Zero disables the cooldown.
    pub cooldown_hours: u32,
}

impl Default for GateSettings {
    fn default() -> Self {
        Self {
            min_streak_for_wheel: 7,
            milestone_gated: true,
            cooldown_hours: 24,
        }
    }
}

impl GateSettings {
    pub fn cooldown(&self) -> Duration {
        Duration::hours(i64::from(self.cooldown_hours))
    }
}

/// Why a spin is or is not available right now.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SpinStatus {
    /// Cooldown mode, all conditions met.
    Ready,
    /// Once-per-milestone mode with unspent milestones.
    MilestonesAvailable { unconsumed: usize },
    BelowMinimumStreak { streak: u32, required: u32 },
    NoMilestoneReached,
    CoolingDown {
        ready_at: DateTime<Utc>,
        remaining_secs: i64,
    },
    /// Once-per-milestone mode with every achieved milestone spent.
    NeedNewMilestone { next: Option<u32> },
}

impl SpinStatus {
    pub fn is_ready(&self) -> bool {
        matches!(self, SpinStatus::Ready | SpinStatus::MilestonesAvailable { .. })
    }
}

impl fmt::Display for SpinStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpinStatus::Ready => write!(f, "ready to spin"),
            SpinStatus::MilestonesAvailable { unconsumed: 1 } => {
                write!(f, "1 milestone spin available")
            }
            SpinStatus::MilestonesAvailable { unconsumed } => {
                write!(f, "{unconsumed} milestone spins available")
            }
            SpinStatus::BelowMinimumStreak { streak, required } => {
                write!(f, "reach a {required}-day streak to unlock the wheel (currently {streak})")
            }
            SpinStatus::NoMilestoneReached => {
                write!(f, "reach your first milestone to unlock the wheel")
            }
            SpinStatus::CoolingDown { remaining_secs, .. } => write!(
                f,
                "cooldown: {} remaining",
                format_cooldown(Duration::seconds(*remaining_secs))
            ),
            SpinStatus::NeedNewMilestone { next: Some(days) } => {
                write!(f, "reach a new milestone ({days} days) to spin again")
            }
            SpinStatus::NeedNewMilestone { next: None } => {
                write!(f, "reach a new milestone to spin again")
            }
        }
    }
}

/// Render a remaining cooldown as `"3h 12m"`, or `"12m"` under an hour.
pub fn format_cooldown(remaining: Duration) -> String {
    let secs = remaining.num_seconds().max(0);
    let hours = secs / 3600;
    let minutes = (secs % 3600) / 60;
    if hours > 0 {
        format!("{hours}h {minutes}m")
    } else {
        format!("{minutes}m")
    }
}

/// Decides spin eligibility over an injected [`SpinState`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpinGate {
    settings: GateSettings,
    state: SpinState,
}

impl SpinGate {
    pub fn new(settings: GateSettings, state: SpinState) -> Self {
        Self { settings, state }
    }

    pub fn settings(&self) -> &GateSettings {
        &self.settings
    }

    pub fn state(&self) -> &SpinState {
        &self.state
    }

    pub fn into_state(self) -> SpinState {
        self.state
    }

    pub fn mode(&self) -> SpinMode {
        self.state.mode
    }

    /// Switch modes. Recorded spins and consumed milestones are kept.
    pub fn set_mode(&mut self, mode: SpinMode) {
        if self.state.mode != mode {
            tracing::debug!(from = %self.state.mode, to = %mode, "spin mode changed");
            self.state.mode = mode;
        }
    }

    pub fn set_settings(&mut self, settings: GateSettings) {
        self.settings = settings;
    }

    pub fn status(&self, streak: u32, milestones: &[MilestoneRow], now: DateTime<Utc>) -> SpinStatus {
        match self.state.mode {
            SpinMode::Cooldown => self.cooldown_status(streak, milestones, now),
            SpinMode::OncePerMilestone => {
                let unconsumed = self.unconsumed_milestones(streak, milestones).len();
                if unconsumed > 0 {
                    SpinStatus::MilestonesAvailable { unconsumed }
                } else {
                    SpinStatus::NeedNewMilestone {
                        next: next_milestone(streak, milestones).and_then(MilestoneRow::threshold),
                    }
                }
            }
        }
    }

    pub fn can_spin(&self, streak: u32, milestones: &[MilestoneRow], now: DateTime<Utc>) -> bool {
        self.status(streak, milestones, now).is_ready()
    }

    /// Book a successful spin.
    ///
    /// Cooldown mode stamps `now`. Once-per-milestone mode consumes the highest
    /// achieved threshold not yet consumed; with nothing left it is a no-op.
    pub fn record_spin(&mut self, streak: u32, milestones: &[MilestoneRow], now: DateTime<Utc>) {
        match self.state.mode {
            SpinMode::Cooldown => {
                self.state.last_spin_at = Some(now);
                tracing::info!(%now, "spin recorded, cooldown started");
            }
            SpinMode::OncePerMilestone => {
                if let Some(&threshold) = self.unconsumed_milestones(streak, milestones).last() {
                    self.state.consumed_milestones.insert(threshold);
                    tracing::info!(threshold, "milestone spin consumed");
                }
            }
        }
    }

    /// Check and record in one step, so a second caller holding the same gate
    /// cannot slip in between.
    pub fn try_spin(
        &mut self,
        streak: u32,
        milestones: &[MilestoneRow],
        now: DateTime<Utc>,
    ) -> Result<(), CoreError> {
        let status = self.status(streak, milestones, now);
        if !status.is_ready() {
            return Err(CoreError::SpinDenied(status));
        }
        self.record_spin(streak, milestones, now);
        Ok(())
    }

    /// Time until the cooldown lifts, or `None` if a spin is not being held
    /// back by it. Always `None` in once-per-milestone mode.
    pub fn time_remaining(&self, now: DateTime<Utc>) -> Option<Duration> {
        self.next_spin_at(now).map(|ready_at| ready_at - now)
    }

    /// Instant the cooldown lifts, while it is still running.
    pub fn next_spin_at(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        if self.state.mode != SpinMode::Cooldown || self.settings.cooldown_hours == 0 {
            return None;
        }
        let ready_at = self.state.last_spin_at? + self.settings.cooldown();
        (now < ready_at).then_some(ready_at)
    }

    /// Achieved thresholds that have not bought a spin yet, ascending.
    pub fn unconsumed_milestones(&self, streak: u32, milestones: &[MilestoneRow]) -> Vec<u32> {
        achieved_milestones(streak, milestones)
            .into_iter()
            .filter_map(MilestoneRow::threshold)
            .filter(|days| !self.state.consumed_milestones.contains(days))
            .collect()
    }

    fn cooldown_status(&self, streak: u32, milestones: &[MilestoneRow], now: DateTime<Utc>) -> SpinStatus {
        if streak < self.settings.min_streak_for_wheel {
            return SpinStatus::BelowMinimumStreak {
                streak,
                required: self.settings.min_streak_for_wheel,
            };
        }
        if self.settings.milestone_gated && achieved_milestones(streak, milestones).is_empty() {
            return SpinStatus::NoMilestoneReached;
        }
        match self.next_spin_at(now) {
            Some(ready_at) => SpinStatus::CoolingDown {
                ready_at,
                remaining_secs: (ready_at - now).num_seconds(),
            },
            None => SpinStatus::Ready,
        }
    }
}

impl Default for SpinGate {
    fn default() -> Self {
        Self::new(GateSettings::default(), SpinState::default())
    }
}
