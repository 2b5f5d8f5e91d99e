mod config;
mod snapshot;

pub use config::{Config, DisplayConfig, StreakConfig, WheelConfig};
pub use snapshot::{Snapshot, SnapshotStore};

use std::path::PathBuf;

use crate::error::CoreError;

/// Returns the data directory, creating it if needed.
///
/// `STREAKWHEEL_HOME` wins when set. Otherwise `~/.config/streakwheel[-dev]/`,
/// with the `-dev` suffix selected by `STREAKWHEEL_ENV=dev`.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, CoreError> {
    let dir = match std::env::var_os("STREAKWHEEL_HOME") {
        Some(home) if !home.is_empty() => PathBuf::from(home),
        _ => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("STREAKWHEEL_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("streakwheel-dev")
            } else {
                base_dir.join("streakwheel")
            }
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
