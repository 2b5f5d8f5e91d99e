//! Write-time normalization of milestone odds.

use super::MilestoneRow;
use crate::reward::RewardProbabilities;

/// How far a row's odds may drift from 100 before they are rescaled.
pub const PROBABILITY_TOLERANCE: f64 = 0.1;

/// Rescale the row's three chances to sum to exactly 100.
///
/// Small and medium are scaled proportionally and rounded to one decimal;
/// large takes the remainder. Rows already within tolerance are left alone.
/// Negative or non-finite chances count as zero, and a row with nothing left
/// to scale takes the default odds. Returns whether the row changed.
pub fn normalize_chances(row: &mut MilestoneRow) -> bool {
    let sanitize = |value: f64| if value.is_finite() { value.max(0.0) } else { 0.0 };
    let small = sanitize(row.small_chance);
    let medium = sanitize(row.medium_chance);
    let large = sanitize(row.large_chance);
    let total = small + medium + large;

    let sanitized = small != row.small_chance
        || medium != row.medium_chance
        || large != row.large_chance;
    if !sanitized && (total - 100.0).abs() <= PROBABILITY_TOLERANCE {
        return false;
    }

    if total <= 0.0 {
        let fallback = RewardProbabilities::default();
        row.small_chance = fallback.small;
        row.medium_chance = fallback.medium;
        row.large_chance = fallback.large;
        return true;
    }

    let scale = 100.0 / total;
    let small = round_tenth(small * scale);
    let mut medium = round_tenth(medium * scale);
    let mut large = round_tenth(100.0 - small - medium);
    if large < 0.0 {
        // Both roundings went up; give the overshoot back from medium.
        large = 0.0;
        medium = round_tenth(100.0 - small);
    }

    row.small_chance = small;
    row.medium_chance = medium;
    row.large_chance = large;
    true
}

fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
