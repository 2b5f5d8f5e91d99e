//! Streak to reward-tier odds.

use serde::{Deserialize, Serialize};

use super::RewardTier;
use crate::milestone::{achieved_milestones, next_milestone, sorted_milestones, MilestoneRow};

/// Tier odds as stored on a milestone row.
///
/// Values are nominally percentages summing to 100, but nothing here enforces
/// that; draws treat them as relative weights.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RewardProbabilities {
    pub small: f64,
    pub medium: f64,
    pub large: f64,
}

impl Default for RewardProbabilities {
    /// Used when the milestone table has no usable rows at all.
    fn default() -> Self {
        Self {
            small: 50.0,
            medium: 30.0,
            large: 20.0,
        }
    }
}

impl RewardProbabilities {
    pub fn weight(&self, tier: RewardTier) -> f64 {
        let raw = match tier {
            RewardTier::Small => self.small,
            RewardTier::Medium => self.medium,
            RewardTier::Large => self.large,
        };
        if raw.is_finite() {
            raw.max(0.0)
        } else {
            0.0
        }
    }

    /// Sum of the usable (finite, non-negative) weights.
    pub fn total_weight(&self) -> f64 {
        RewardTier::ALL.iter().map(|tier| self.weight(*tier)).sum()
    }

    /// Share of the wheel for `tier`, in percent of the actual weight sum.
    pub fn share(&self, tier: RewardTier) -> f64 {
        let total = self.total_weight();
        if total > 0.0 {
            self.weight(tier) / total * 100.0
        } else {
            0.0
        }
    }
}

impl From<&MilestoneRow> for RewardProbabilities {
    fn from(row: &MilestoneRow) -> Self {
        Self {
            small: row.small_chance,
            medium: row.medium_chance,
            large: row.large_chance,
        }
    }
}

/// Odds for a given streak.
///
/// With `prefer_next` the upcoming milestone's odds are shown (what the user
/// is working toward). Otherwise the highest achieved milestone applies; before
/// any is achieved the lowest row stands in, and an empty table yields the
/// default 50/30/20.
pub fn reward_probabilities(
    streak: u32,
    milestones: &[MilestoneRow],
    prefer_next: bool,
) -> RewardProbabilities {
    if prefer_next {
        if let Some(next) = next_milestone(streak, milestones) {
            return next.into();
        }
    }

    if let Some(current) = achieved_milestones(streak, milestones).last() {
        return (*current).into();
    }

    match sorted_milestones(milestones).first() {
        Some(lowest) => (*lowest).into(),
        None => {
            if !milestones.is_empty() {
                tracing::warn!(
                    rows = milestones.len(),
                    "milestone table has no usable rows; using default odds"
                );
            }
            RewardProbabilities::default()
        }
    }
}
