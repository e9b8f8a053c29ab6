use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the ride simulator crates.
///
/// Session operations themselves never fail; these cover configuration
/// loading and the channels around a running driver.
#[derive(Error, Debug)]
pub enum RideError {
    /// A configuration file could not be opened or read from disk.
    #[error("Failed to read config {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A configuration document could not be parsed.
    #[error("Failed to parse config: {0}")]
    ConfigParse(#[from] serde_json::Error),

    /// A configuration value is out of range.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The driver task has exited and no longer accepts commands.
    #[error("Ride driver is no longer running")]
    DriverClosed,
}

/// Convenience alias used throughout the ride crates.
pub type Result<T> = std::result::Result<T, RideError>;
