//! Weighted wheel draw and the segment layout shown to the user.
//!
//! The random source is always passed in so draws can be seeded in tests.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::{reward_probabilities, rewards_by_tier, RewardProbabilities, RewardRecord, RewardTier};
use crate::milestone::MilestoneRow;

/// Pick a tier with probability proportional to its weight.
///
/// Cumulative thresholds run small, medium, large; a roll landing exactly on a
/// boundary belongs to the later tier. Weights that sum to nothing fall back to
/// the default odds.
pub fn draw_tier<R: Rng + ?Sized>(rng: &mut R, probabilities: &RewardProbabilities) -> RewardTier {
    let weights = if probabilities.total_weight() > 0.0 {
        *probabilities
    } else {
        RewardProbabilities::default()
    };

    let roll = rng.gen_range(0.0..weights.total_weight());
    let mut threshold = 0.0;
    for tier in [RewardTier::Small, RewardTier::Medium] {
        threshold += weights.weight(tier);
        if roll < threshold {
            return tier;
        }
    }
    RewardTier::Large
}

/// Spin the wheel: draw a tier for `streak`, then a reward uniformly within it.
///
/// With `exclude_claimed` (real spins) already-claimed rewards are skipped;
/// demo spins pass false. If the drawn tier has nothing eligible the first
/// reward of the whole pool is returned, so the result is `None` only for an
/// empty pool.
pub fn select_reward<'a, R: Rng + ?Sized>(
    rng: &mut R,
    streak: u32,
    milestones: &[MilestoneRow],
    pool: &'a [RewardRecord],
    prefer_next: bool,
    exclude_claimed: bool,
) -> Option<&'a RewardRecord> {
    let fallback = pool.first()?;
    let probabilities = reward_probabilities(streak, milestones, prefer_next);
    let tier = draw_tier(rng, &probabilities);

    let candidates: Vec<&RewardRecord> = pool
        .iter()
        .filter(|reward| reward.tier == tier && !(exclude_claimed && reward.claimed))
        .collect();

    match candidates.choose(rng) {
        Some(reward) => Some(*reward),
        None => {
            tracing::warn!(%tier, fallback = %fallback.id, "no eligible reward in drawn tier");
            Some(fallback)
        }
    }
}

/// One slice of the rendered wheel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WheelSegment {
    pub id: String,
    pub reward_id: String,
    pub tier: RewardTier,
    /// Arc in degrees.
    pub angle: f64,
    /// Percent chance this slice represents.
    pub probability: f64,
}

/// Lay the pool out on the wheel.
///
/// Each tier's arc is its share of the weight sum. Weights are read as
/// percentages: a tier shows `ceil(count * weight / 100)` of its rewards (at
/// least one, at most all), splitting its arc evenly. Tiers without rewards get no slices.
pub fn wheel_segments(probabilities: &RewardProbabilities, pool: &[RewardRecord]) -> Vec<WheelSegment> {
    let mut segments = Vec::new();

    for tier in RewardTier::ALL {
        let rewards = rewards_by_tier(pool, tier);
        if rewards.is_empty() {
            continue;
        }
        let weight = probabilities.weight(tier);
        let share = probabilities.share(tier);
        let wanted = (rewards.len() as f64 * weight / 100.0).ceil() as usize;
        let shown = wanted.clamp(1, rewards.len());
        let angle = share * 3.6 / shown as f64;

        segments.extend(rewards.into_iter().take(shown).enumerate().map(|(i, reward)| {
            WheelSegment {
                id: format!("{tier}-{i}"),
                reward_id: reward.id.clone(),
                tier,
                angle,
                probability: share / shown as f64,
            }
        }));
    }

    segments
}

/// Rotation in degrees that brings the wheel to rest on `reward_id`: three
/// full turns plus the offset of its first segment. `None` when the reward
/// has no segment.
pub fn landing_rotation(segments: &[WheelSegment], reward_id: &str) -> Option<f64> {
    let index = segments.iter().position(|s| s.reward_id == reward_id)?;
    let offset: f64 = segments[..index].iter().map(|s| s.angle).sum();
    Some(3.0 * 360.0 + offset)
}
