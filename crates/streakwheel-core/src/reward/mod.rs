//! Reward pool, tier odds and the weighted wheel draw.

mod probability;
mod wheel;

pub use probability::{reward_probabilities, RewardProbabilities};
pub use wheel::{draw_tier, landing_rotation, select_reward, wheel_segments, WheelSegment};

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, ValidationError};

/// Reward category, in ascending desirability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RewardTier {
    Small,
    Medium,
    Large,
}

impl RewardTier {
    /// Fixed draw order; cumulative thresholds are laid out in this order.
    pub const ALL: [RewardTier; 3] = [RewardTier::Small, RewardTier::Medium, RewardTier::Large];

    pub fn as_str(self) -> &'static str {
        match self {
            RewardTier::Small => "small",
            RewardTier::Medium => "medium",
            RewardTier::Large => "large",
        }
    }
}

impl fmt::Display for RewardTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RewardTier {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "small" => Ok(RewardTier::Small),
            "medium" => Ok(RewardTier::Medium),
            "large" => Ok(RewardTier::Large),
            other => Err(ValidationError::InvalidValue {
                field: "tier".into(),
                message: format!("'{other}' is not one of small, medium, large"),
            }
            .into()),
        }
    }
}

/// A reward as stored by the reward store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RewardRecord {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(alias = "category")]
    pub tier: RewardTier,
    #[serde(default)]
    pub claimed: bool,
    #[serde(default)]
    pub claimed_at: Option<DateTime<Utc>>,
}

impl RewardRecord {
    pub fn new(id: impl Into<String>, name: impl Into<String>, tier: RewardTier) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            tier,
            claimed: false,
            claimed_at: None,
        }
    }

    /// Mark as claimed. Returns false if it already was.
    pub fn claim(&mut self, at: DateTime<Utc>) -> bool {
        if self.claimed {
            return false;
        }
        self.claimed = true;
        self.claimed_at = Some(at);
        true
    }
}

pub fn rewards_by_tier(pool: &[RewardRecord], tier: RewardTier) -> Vec<&RewardRecord> {
    pool.iter().filter(|reward| reward.tier == tier).collect()
}

pub fn unclaimed_rewards(pool: &[RewardRecord]) -> Vec<&RewardRecord> {
    pool.iter().filter(|reward| !reward.claimed).collect()
}

/// Claimed/total counts for one tier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierCount {
    pub total: usize,
    pub claimed: usize,
}

/// Claim statistics over the whole pool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RewardStats {
    pub total: usize,
    pub claimed: usize,
    pub unclaimed: usize,
    pub claimed_percentage: f64,
    pub small: TierCount,
    pub medium: TierCount,
    pub large: TierCount,
}

impl RewardStats {
    pub fn compute(pool: &[RewardRecord]) -> Self {
        let tier_count = |tier| {
            let rewards = rewards_by_tier(pool, tier);
            TierCount {
                total: rewards.len(),
                claimed: rewards.iter().filter(|r| r.claimed).count(),
            }
        };
        let total = pool.len();
        let claimed = pool.iter().filter(|r| r.claimed).count();
        Self {
            total,
            claimed,
            unclaimed: total - claimed,
            claimed_percentage: if total > 0 {
                claimed as f64 / total as f64 * 100.0
            } else {
                0.0
            },
            small: tier_count(RewardTier::Small),
            medium: tier_count(RewardTier::Medium),
            large: tier_count(RewardTier::Large),
        }
    }
}

/// Starter pool: five rewards per tier.
pub fn default_rewards() -> Vec<RewardRecord> {
    const SMALL: [&str; 5] = [
        "15 minutes of a favourite show",
        "Favourite snack",
        "10 minute meditation",
        "Short walk",
        "Favourite song",
    ];
    const MEDIUM: [&str; 5] = [
        "Movie night",
        "Buy a new book",
        "Massage",
        "Restaurant visit",
        "Hobby gear",
    ];
    const LARGE: [&str; 5] = [
        "Weekend trip",
        "Big wish-list item",
        "Course or workshop",
        "Expensive hobby item",
        "Spa day",
    ];

    [
        (RewardTier::Small, SMALL),
        (RewardTier::Medium, MEDIUM),
        (RewardTier::Large, LARGE),
    ]
    .into_iter()
    .flat_map(|(tier, names)| {
        names
            .into_iter()
            .enumerate()
            .map(move |(i, name)| RewardRecord::new(format!("{tier}-{}", i + 1), name, tier))
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_parses_and_displays() {
        assert_eq!("Large".parse::<RewardTier>().unwrap(), RewardTier::Large);
        assert_eq!(RewardTier::Medium.to_string(), "medium");
        assert!("huge".parse::<RewardTier>().is_err());
    }

    #[test]
    fn claim_is_idempotent() {
        let mut reward = RewardRecord::new("r", "Snack", RewardTier::Small);
        let first = Utc::now();
        assert!(reward.claim(first));
        assert!(!reward.claim(first + chrono::Duration::hours(1)));
        assert_eq!(reward.claimed_at, Some(first));
    }

    #[test]
    fn default_pool_has_five_per_tier() {
        let pool = default_rewards();
        for tier in RewardTier::ALL {
            assert_eq!(rewards_by_tier(&pool, tier).len(), 5);
        }
        assert_eq!(pool[0].id, "small-1");
        assert_eq!(pool[14].id, "large-5");
    }

    #[test]
    fn stats_count_claims_per_tier() {
        let mut pool = default_rewards();
        let now = Utc::now();
        pool[0].claim(now);
        pool[10].claim(now);

        let stats = RewardStats::compute(&pool);
        assert_eq!(stats.total, 15);
        assert_eq!(stats.claimed, 2);
        assert_eq!(stats.unclaimed, 13);
        assert_eq!(stats.small, TierCount { total: 5, claimed: 1 });
        assert_eq!(stats.large, TierCount { total: 5, claimed: 1 });
        assert_eq!(unclaimed_rewards(&pool).len(), 13);
    }

    #[test]
    fn record_accepts_category_alias() {
        let json = r#"{ "id": "x", "category": "medium" }"#;
        let reward: RewardRecord = serde_json::from_str(json).unwrap();
        assert_eq!(reward.tier, RewardTier::Medium);
        assert!(!reward.claimed);
    }
}
