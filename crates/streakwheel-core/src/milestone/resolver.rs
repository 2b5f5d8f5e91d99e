//! Lookups over the milestone table for a given streak.

use super::MilestoneRow;

/// Usable rows sorted ascending by `days`. The first row wins when two share
/// the same threshold.
pub fn sorted_milestones(milestones: &[MilestoneRow]) -> Vec<&MilestoneRow> {
    let mut rows: Vec<&MilestoneRow> = milestones
        .iter()
        .filter(|row| row.threshold().is_some())
        .collect();
    rows.sort_by_key(|row| row.days);
    rows.dedup_by_key(|row| row.days);
    rows
}

/// Lowest milestone strictly above `streak`, or `None` once all are achieved.
pub fn next_milestone(streak: u32, milestones: &[MilestoneRow]) -> Option<&MilestoneRow> {
    sorted_milestones(milestones)
        .into_iter()
        .find(|row| row.threshold().is_some_and(|days| days > streak))
}

/// Every milestone with `days <= streak`, ascending.
pub fn achieved_milestones(streak: u32, milestones: &[MilestoneRow]) -> Vec<&MilestoneRow> {
    sorted_milestones(milestones)
        .into_iter()
        .filter(|row| row.threshold().is_some_and(|days| days <= streak))
        .collect()
}

/// Percent of the way from the last achieved milestone (or zero) to the next.
///
/// Always within `0..=100`, and exactly 100 when no next milestone exists.
pub fn progress_to_next(streak: u32, milestones: &[MilestoneRow]) -> f64 {
    let Some(next) = next_milestone(streak, milestones).and_then(MilestoneRow::threshold) else {
        return 100.0;
    };
    let start = achieved_milestones(streak, milestones)
        .last()
        .and_then(|row| row.threshold())
        .unwrap_or(0);

    let span = f64::from(next - start);
    let done = f64::from(streak.saturating_sub(start));
    (done / span * 100.0).clamp(0.0, 100.0)
}
