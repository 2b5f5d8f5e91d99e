//! Milestone table: streak thresholds and their reward-tier odds.
//!
//! Every query re-sorts the rows by `days`; callers never have to keep the
//! table ordered. Rows with a non-positive `days` are ignored.

mod editor;
mod resolver;

pub use editor::{normalize_chances, PROBABILITY_TOLERANCE};
pub use resolver::{
    achieved_milestones, next_milestone, progress_to_next, sorted_milestones,
};

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// One row of the milestone table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MilestoneRow {
    pub days: i32,
    pub small_chance: f64,
    pub medium_chance: f64,
    pub large_chance: f64,
    #[serde(default)]
    pub label: String,
}

impl MilestoneRow {
    pub fn new(days: i32, small: f64, medium: f64, large: f64, label: impl Into<String>) -> Self {
        Self {
            days,
            small_chance: small,
            medium_chance: medium,
            large_chance: large,
            label: label.into(),
        }
    }

    /// Streak length this row unlocks at, if the row is usable.
    pub fn threshold(&self) -> Option<u32> {
        u32::try_from(self.days).ok().filter(|days| *days > 0)
    }

    pub fn chance_sum(&self) -> f64 {
        self.small_chance + self.medium_chance + self.large_chance
    }
}

/// Milestone table as edited by the user.
///
/// Writes go through [`MilestoneTable::upsert`], which normalizes the odds so
/// each stored row sums to exactly 100.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MilestoneTable {
    rows: Vec<MilestoneRow>,
}

impl MilestoneTable {
    /// Wrap rows as stored. No normalization happens here; odds are only
    /// fixed up when a row is written.
    pub fn from_rows(rows: Vec<MilestoneRow>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[MilestoneRow] {
        &self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Create or replace the row for `row.days`, normalizing its odds first.
    pub fn upsert(&mut self, mut row: MilestoneRow) {
        if normalize_chances(&mut row) {
            tracing::info!(
                days = row.days,
                small = row.small_chance,
                medium = row.medium_chance,
                large = row.large_chance,
                "milestone odds rescaled to 100"
            );
        }
        match self.rows.iter_mut().find(|existing| existing.days == row.days) {
            Some(existing) => *existing = row,
            None => self.rows.push(row),
        }
    }

    /// Remove the row for `days`, returning it if present.
    pub fn remove(&mut self, days: i32) -> Option<MilestoneRow> {
        let index = self.rows.iter().position(|row| row.days == days)?;
        Some(self.rows.remove(index))
    }

    /// Reject a table that has rows but none the resolvers can use.
    ///
    /// Resolvers already treat such a table as empty; this lets the caller
    /// surface the problem instead.
    pub fn validate(&self) -> Result<(), CoreError> {
        if !self.rows.is_empty() && self.rows.iter().all(|row| row.threshold().is_none()) {
            return Err(CoreError::MalformedMilestoneTable {
                rows: self.rows.len(),
            });
        }
        Ok(())
    }
}

impl From<Vec<MilestoneRow>> for MilestoneTable {
    fn from(rows: Vec<MilestoneRow>) -> Self {
        Self::from_rows(rows)
    }
}

/// Out-of-the-box milestones: one week through one hundred days.
pub fn default_milestones() -> Vec<MilestoneRow> {
    vec![
        MilestoneRow::new(7, 60.0, 30.0, 10.0, "1 week"),
        MilestoneRow::new(14, 50.0, 35.0, 15.0, "2 weeks"),
        MilestoneRow::new(30, 40.0, 40.0, 20.0, "1 month"),
        MilestoneRow::new(60, 30.0, 45.0, 25.0, "2 months"),
        MilestoneRow::new(100, 20.0, 50.0, 30.0, "100 days"),
    ]
}
