//! Core error types for streakwheel-core.
//!
//! Streak, milestone and probability math never fails: bad inputs are
//! normalized instead of rejected. Errors only surface at parse boundaries,
//! storage, configuration and the gated spin flow.

use std::path::PathBuf;
use thiserror::Error;

use crate::spin::SpinStatus;

/// Core error type for streakwheel-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Frequency string outside daily/weekly/monthly/yearly
    #[error("Invalid frequency: '{0}' (expected daily, weekly, monthly or yearly)")]
    InvalidFrequency(String),

    /// The reward pool is empty across all tiers
    #[error("Reward pool is empty")]
    EmptyRewardPool,

    /// Milestone table has rows but none with a positive `days`
    #[error("Milestone table is malformed: none of its {rows} rows has a positive day count")]
    MalformedMilestoneTable { rows: usize },

    /// The spin gate refused a non-demo spin
    #[error("Spin not allowed: {0}")]
    SpinDenied(SpinStatus),

    /// Habit id not present in the completion store
    #[error("Unknown habit: {0}")]
    UnknownHabit(String),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Dot-path key that does not exist in the config
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),
}

/// Validation errors.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// Calendar date not in YYYY-MM-DD form
    #[error("Invalid date '{0}': expected YYYY-MM-DD")]
    InvalidDate(String),

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::ParseFailed(err.to_string())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
