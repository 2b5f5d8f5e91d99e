//! The reward engine: one facade over milestones, the reward pool and the
//! spin gate.
//!
//! Streak math and odds are recomputed on every call. The only state that
//! changes is the gate's [`SpinState`] and the `claimed` flags of the pool,
//! both handed back through [`RewardEngine::write_back`] for the caller to
//! persist.

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::habit::{effective_streak, HabitRecord, StreakAggregation};
use crate::milestone::{achieved_milestones, next_milestone, progress_to_next, MilestoneRow, MilestoneTable};
use crate::reward::{
    reward_probabilities, select_reward, wheel_segments, RewardProbabilities, RewardRecord,
    RewardStats, WheelSegment,
};
use crate::spin::{SharedSpinGate, SpinGate, SpinMode, SpinState, SpinStatus};
use crate::storage::{Config, Snapshot};

/// Milestone progress for one habit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreakStats {
    pub habit_id: String,
    pub current_streak: u32,
    pub next_milestone: Option<MilestoneRow>,
    /// Zero once every milestone is behind.
    pub days_to_next_milestone: u32,
    pub achieved_milestones: Vec<MilestoneRow>,
    pub progress_to_next: f64,
    /// At least one milestone achieved.
    pub milestone_reached: bool,
    pub reward_probabilities: RewardProbabilities,
}

/// Result of a wheel spin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpinOutcome {
    pub reward: RewardRecord,
    pub streak: u32,
    pub probabilities: RewardProbabilities,
    /// Demo spins skip the gate and never claim.
    pub demo: bool,
}

#[derive(Debug, Clone)]
pub struct RewardEngine {
    milestones: MilestoneTable,
    rewards: Vec<RewardRecord>,
    gate: SharedSpinGate,
    prefer_next: bool,
    aggregation: StreakAggregation,
}

impl RewardEngine {
    pub fn new(milestones: MilestoneTable, rewards: Vec<RewardRecord>, gate: SpinGate) -> Self {
        Self {
            milestones,
            rewards,
            gate: SharedSpinGate::new(gate),
            prefer_next: false,
            aggregation: StreakAggregation::default(),
        }
    }

    /// Build from stored inputs. The configured spin mode overrides the
    /// stored one; the rest of the spin state is kept as recorded.
    pub fn from_snapshot(snapshot: &Snapshot, config: &Config) -> Self {
        let mut gate = SpinGate::new(config.wheel.gate_settings(), snapshot.spin_state.clone());
        gate.set_mode(config.wheel.mode);
        Self::new(snapshot.milestones.clone(), snapshot.rewards.clone(), gate)
            .with_prefer_next(config.display.show_next_milestone_probabilities)
            .with_aggregation(config.streak.aggregation)
    }

    /// Show the upcoming milestone's odds in stats and wheel layout.
    pub fn with_prefer_next(mut self, prefer_next: bool) -> Self {
        self.prefer_next = prefer_next;
        self
    }

    pub fn with_aggregation(mut self, aggregation: StreakAggregation) -> Self {
        self.aggregation = aggregation;
        self
    }

    pub fn milestones(&self) -> &[MilestoneRow] {
        self.milestones.rows()
    }

    pub fn rewards(&self) -> &[RewardRecord] {
        &self.rewards
    }

    /// Handle to the gate, shareable with other threads.
    pub fn gate(&self) -> &SharedSpinGate {
        &self.gate
    }

    pub fn spin_state(&self) -> SpinState {
        self.gate.state()
    }

    pub fn set_mode(&self, mode: SpinMode) {
        self.gate.with_gate(|gate| gate.set_mode(mode));
    }

    /// Copy the mutable parts back into `snapshot` for persisting.
    pub fn write_back(&self, snapshot: &mut Snapshot) {
        snapshot.rewards = self.rewards.clone();
        snapshot.spin_state = self.spin_state();
    }

    pub fn streak_stats(&self, habit: &HabitRecord) -> StreakStats {
        let rows = self.milestones();
        let streak = habit.streak;
        let next = next_milestone(streak, rows).cloned();
        let achieved: Vec<MilestoneRow> = achieved_milestones(streak, rows).into_iter().cloned().collect();

        StreakStats {
            habit_id: habit.id.clone(),
            current_streak: streak,
            days_to_next_milestone: next
                .as_ref()
                .and_then(MilestoneRow::threshold)
                .map_or(0, |days| days.saturating_sub(streak)),
            next_milestone: next,
            milestone_reached: !achieved.is_empty(),
            achieved_milestones: achieved,
            progress_to_next: progress_to_next(streak, rows),
            reward_probabilities: reward_probabilities(streak, rows, self.prefer_next),
        }
    }

    /// The one streak the wheel runs on for this set of habits.
    pub fn effective_streak(&self, habits: &[HabitRecord]) -> u32 {
        effective_streak(habits, self.aggregation)
    }

    /// Odds as displayed, honoring the next-milestone display setting.
    pub fn probabilities(&self, streak: u32) -> RewardProbabilities {
        reward_probabilities(streak, self.milestones(), self.prefer_next)
    }

    pub fn spin_status(&self, streak: u32, now: DateTime<Utc>) -> SpinStatus {
        self.gate.status(streak, self.milestones(), now)
    }

    pub fn segments(&self, streak: u32) -> Vec<WheelSegment> {
        wheel_segments(&self.probabilities(streak), &self.rewards)
    }

    pub fn reward_stats(&self) -> RewardStats {
        RewardStats::compute(&self.rewards)
    }

    /// Spin the wheel.
    ///
    /// A real spin passes the gate (check and record in one step), draws from
    /// unclaimed rewards at the current milestone's odds and claims the winner.
    /// A demo spin skips the gate, may land on claimed rewards and changes
    /// nothing.
    ///
    /// # Errors
    ///
    /// [`CoreError::EmptyRewardPool`] when there is nothing to win, and
    /// [`CoreError::SpinDenied`] when the gate refuses a real spin.
    pub fn spin<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        streak: u32,
        demo: bool,
        now: DateTime<Utc>,
    ) -> Result<SpinOutcome, CoreError> {
        if self.rewards.is_empty() {
            return Err(CoreError::EmptyRewardPool);
        }
        if !demo {
            self.gate.try_spin(streak, self.milestones.rows(), now)?;
        }

        let rows = self.milestones.rows();
        let probabilities = reward_probabilities(streak, rows, false);
        let won = select_reward(rng, streak, rows, &self.rewards, false, !demo)
            .cloned()
            .ok_or(CoreError::EmptyRewardPool)?;

        let reward = if demo {
            won
        } else {
            match self.rewards.iter_mut().find(|r| r.id == won.id) {
                Some(stored) => {
                    stored.claim(now);
                    stored.clone()
                }
                None => won,
            }
        };

        tracing::info!(
            reward = %reward.id,
            tier = %reward.tier,
            streak,
            demo,
            "wheel spun"
        );
        Ok(SpinOutcome {
            reward,
            streak,
            probabilities,
            demo,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::habit::{CompletionValue, Frequency};
    use crate::milestone::default_milestones;
    use crate::reward::{default_rewards, RewardTier};
    use crate::spin::GateSettings;
    use chrono::{Duration, NaiveDate, TimeZone};
    use rand::SeedableRng;
    use rand_pcg::Mcg128Xsl64;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 12, 18, 0, 0).unwrap()
    }

    fn engine() -> RewardEngine {
        RewardEngine::new(
            MilestoneTable::from_rows(default_milestones()),
            default_rewards(),
            SpinGate::default(),
        )
    }

    fn habit_with_streak(id: &str, days: i64) -> HabitRecord {
        let today = NaiveDate::from_ymd_opt(2025, 3, 12).unwrap();
        let mut habit = HabitRecord::new(id, Frequency::Daily, 1);
        for offset in 0..days {
            habit.record_completion(today - Duration::days(offset), CompletionValue::default(), today);
        }
        habit
    }

    #[test]
    fn streak_stats_between_milestones() {
        let stats = engine().streak_stats(&habit_with_streak("read", 10));
        assert_eq!(stats.current_streak, 10);
        assert_eq!(stats.next_milestone.as_ref().map(|m| m.days), Some(14));
        assert_eq!(stats.days_to_next_milestone, 4);
        assert_eq!(stats.achieved_milestones.len(), 1);
        assert!(stats.milestone_reached);
        assert!((stats.progress_to_next - 300.0 / 7.0).abs() < 1e-9);
        assert_eq!(stats.reward_probabilities.small, 60.0);
    }

    #[test]
    fn streak_stats_past_last_milestone() {
        let stats = engine().streak_stats(&habit_with_streak("read", 120));
        assert!(stats.next_milestone.is_none());
        assert_eq!(stats.days_to_next_milestone, 0);
        assert_eq!(stats.progress_to_next, 100.0);
    }

    #[test]
    fn aggregation_picks_streak() {
        let habits = vec![habit_with_streak("a", 3), habit_with_streak("b", 9)];
        assert_eq!(engine().effective_streak(&habits), 9);
        assert_eq!(
            engine().with_aggregation(StreakAggregation::All).effective_streak(&habits),
            3
        );
        assert_eq!(engine().effective_streak(&[]), 0);
    }

    #[test]
    fn real_spin_claims_and_starts_cooldown() {
        let mut engine = engine();
        let mut rng = Mcg128Xsl64::seed_from_u64(42);

        let outcome = engine.spin(&mut rng, 10, false, now()).unwrap();
        assert!(outcome.reward.claimed);
        assert_eq!(outcome.reward.claimed_at, Some(now()));
        assert_eq!(engine.reward_stats().claimed, 1);
        assert_eq!(engine.spin_state().last_spin_at, Some(now()));

        let err = engine.spin(&mut rng, 10, false, now() + Duration::hours(1)).unwrap_err();
        assert!(matches!(err, CoreError::SpinDenied(SpinStatus::CoolingDown { .. })));
    }

    #[test]
    fn demo_spin_changes_nothing() {
        let mut engine = engine();
        let mut rng = Mcg128Xsl64::seed_from_u64(42);

        for _ in 0..20 {
            let outcome = engine.spin(&mut rng, 0, true, now()).unwrap();
            assert!(outcome.demo);
            assert!(!outcome.reward.claimed);
        }
        assert_eq!(engine.reward_stats().claimed, 0);
        assert_eq!(engine.spin_state(), SpinState::default());
    }

    #[test]
    fn denied_spin_claims_nothing() {
        let mut engine = engine();
        let mut rng = Mcg128Xsl64::seed_from_u64(1);
        assert!(engine.spin(&mut rng, 3, false, now()).is_err());
        assert_eq!(engine.reward_stats().claimed, 0);
    }

    #[test]
    fn empty_pool_is_an_error_even_for_demo() {
        let mut engine = RewardEngine::new(
            MilestoneTable::from_rows(default_milestones()),
            Vec::new(),
            SpinGate::default(),
        );
        let mut rng = Mcg128Xsl64::seed_from_u64(1);
        assert!(matches!(
            engine.spin(&mut rng, 10, true, now()),
            Err(CoreError::EmptyRewardPool)
        ));
        assert_eq!(engine.spin_state(), SpinState::default());
    }

    #[test]
    fn real_spins_never_repeat_a_claimed_reward() {
        let gate = SpinGate::new(
            GateSettings {
                cooldown_hours: 0,
                ..GateSettings::default()
            },
            SpinState::default(),
        );
        let pool = vec![
            RewardRecord::new("s1", "S1", RewardTier::Small),
            RewardRecord::new("s2", "S2", RewardTier::Small),
            RewardRecord::new("s3", "S3", RewardTier::Small),
        ];
        let table = vec![MilestoneRow::new(7, 100.0, 0.0, 0.0, "")];
        let mut engine = RewardEngine::new(MilestoneTable::from_rows(table), pool, gate);
        let mut rng = Mcg128Xsl64::seed_from_u64(9);

        let mut won: Vec<String> = (0..3)
            .map(|_| engine.spin(&mut rng, 7, false, now()).unwrap().reward.id)
            .collect();
        won.sort();
        assert_eq!(won, vec!["s1", "s2", "s3"]);
    }

    #[test]
    fn snapshot_round_trip_through_engine() {
        let mut snapshot = Snapshot::default();
        let mut config = Config::default();
        config.wheel.mode = SpinMode::OncePerMilestone;

        let mut engine = RewardEngine::from_snapshot(&snapshot, &config);
        let mut rng = Mcg128Xsl64::seed_from_u64(3);
        engine.spin(&mut rng, 7, false, now()).unwrap();
        engine.write_back(&mut snapshot);

        assert!(snapshot.spin_state.consumed_milestones.contains(&7));
        assert_eq!(snapshot.spin_state.mode, SpinMode::OncePerMilestone);
        assert_eq!(snapshot.rewards.iter().filter(|r| r.claimed).count(), 1);
    }

    #[test]
    fn segments_follow_display_setting() {
        let current = engine().segments(10);
        let upcoming = engine().with_prefer_next(true).segments(10);
        assert_ne!(current, upcoming);
    }
}
