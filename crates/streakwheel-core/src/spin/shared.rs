use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};

use super::{SpinGate, SpinState, SpinStatus};
use crate::error::CoreError;
use crate::milestone::MilestoneRow;

/// A [`SpinGate`] shared across threads.
///
/// Every check-and-record runs under one lock, so two concurrent spins can
/// never both pass the same eligibility check.
#[derive(Debug, Clone, Default)]
pub struct SharedSpinGate {
    inner: Arc<Mutex<SpinGate>>,
}

impl SharedSpinGate {
    pub fn new(gate: SpinGate) -> Self {
        Self {
            inner: Arc::new(Mutex::new(gate)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, SpinGate> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn try_spin(
        &self,
        streak: u32,
        milestones: &[MilestoneRow],
        now: DateTime<Utc>,
    ) -> Result<(), CoreError> {
        self.lock().try_spin(streak, milestones, now)
    }

    pub fn status(&self, streak: u32, milestones: &[MilestoneRow], now: DateTime<Utc>) -> SpinStatus {
        self.lock().status(streak, milestones, now)
    }

    /// Copy of the current state, for persisting.
    pub fn state(&self) -> SpinState {
        self.lock().state().clone()
    }

    pub fn with_gate<T>(&self, f: impl FnOnce(&mut SpinGate) -> T) -> T {
        f(&mut self.lock())
    }
}
