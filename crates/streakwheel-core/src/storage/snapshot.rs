//! JSON snapshot of everything the engine reads: habits, milestones, the
//! reward pool and the spin gate state.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::data_dir;
use crate::error::CoreError;
use crate::habit::HabitRecord;
use crate::milestone::{default_milestones, MilestoneTable};
use crate::reward::{default_rewards, RewardRecord};
use crate::spin::SpinState;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub habits: Vec<HabitRecord>,
    #[serde(default = "default_table")]
    pub milestones: MilestoneTable,
    #[serde(default = "default_rewards")]
    pub rewards: Vec<RewardRecord>,
    #[serde(default)]
    pub spin_state: SpinState,
}

fn default_table() -> MilestoneTable {
    MilestoneTable::from_rows(default_milestones())
}

impl Default for Snapshot {
    fn default() -> Self {
        Self {
            habits: Vec::new(),
            milestones: default_table(),
            rewards: default_rewards(),
            spin_state: SpinState::default(),
        }
    }
}

impl Snapshot {
    pub fn habit(&self, id: &str) -> Result<&HabitRecord, CoreError> {
        self.habits
            .iter()
            .find(|h| h.id == id)
            .ok_or_else(|| CoreError::UnknownHabit(id.to_string()))
    }

    pub fn habit_mut(&mut self, id: &str) -> Result<&mut HabitRecord, CoreError> {
        self.habits
            .iter_mut()
            .find(|h| h.id == id)
            .ok_or_else(|| CoreError::UnknownHabit(id.to_string()))
    }
}

/// Reads and writes a [`Snapshot`] file.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    path: PathBuf,
}

impl SnapshotStore {
    /// Store at `<data dir>/state.json`.
    pub fn new() -> Result<Self, CoreError> {
        Ok(Self::new_with_path(data_dir()?.join("state.json")))
    }

    /// Store at a specific path (for testing).
    pub fn new_with_path(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the snapshot; a missing file yields the defaults.
    pub fn load(&self) -> Result<Snapshot, CoreError> {
        if !self.path.exists() {
            tracing::debug!(path = %self.path.display(), "no snapshot yet, using defaults");
            return Ok(Snapshot::default());
        }
        let content = std::fs::read_to_string(&self.path)?;
        let snapshot: Snapshot = serde_json::from_str(&content)?;
        if let Err(err) = snapshot.milestones.validate() {
            tracing::warn!(%err, "stored milestone table is unusable");
        }
        Ok(snapshot)
    }

    pub fn save(&self, snapshot: &Snapshot) -> Result<(), CoreError> {
        let data = serde_json::to_string_pretty(snapshot)?;
        std::fs::write(&self.path, data)?;
        tracing::debug!(path = %self.path.display(), habits = snapshot.habits.len(), "snapshot saved");
        Ok(())
    }
}
