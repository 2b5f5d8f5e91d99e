pub mod config;
pub mod habit;
pub mod milestone;
pub mod reward;
pub mod stats;
pub mod wheel;

use chrono::{DateTime, Local, NaiveDate, Utc};
use streakwheel_core::habit::parse_date;
use streakwheel_core::{Config, CoreError, RewardEngine, Snapshot, SnapshotStore};

/// Dates every command works against. `--today` pins the calendar date;
/// spin timestamps always use the wall clock.
#[derive(Debug, Clone, Copy)]
pub struct Clock {
    pub today: NaiveDate,
    pub now: DateTime<Utc>,
}

impl Clock {
    pub fn new(today: Option<&str>) -> Result<Self, CoreError> {
        let today = match today {
            Some(date) => parse_date(date)?,
            None => Local::now().date_naive(),
        };
        Ok(Self {
            today,
            now: Utc::now(),
        })
    }
}

/// Loaded config and snapshot, written back together.
pub struct Workspace {
    pub store: SnapshotStore,
    pub snapshot: Snapshot,
    pub config: Config,
}

impl Workspace {
    pub fn open() -> Result<Self, CoreError> {
        let store = SnapshotStore::new()?;
        let snapshot = store.load()?;
        let config = Config::load()?;
        tracing::debug!(
            path = %store.path().display(),
            habits = snapshot.habits.len(),
            "workspace opened"
        );
        Ok(Self {
            store,
            snapshot,
            config,
        })
    }

    pub fn engine(&self) -> RewardEngine {
        RewardEngine::from_snapshot(&self.snapshot, &self.config)
    }

    pub fn save(&self) -> Result<(), CoreError> {
        self.store.save(&self.snapshot)
    }
}

pub fn print_json<T: serde::Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
