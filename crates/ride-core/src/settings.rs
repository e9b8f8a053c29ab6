use clap::Parser;
use std::path::PathBuf;

use crate::config::RideConfig;
use crate::error::Result;

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Ride simulator: converts ride time into energy, points and CO₂ saved
#[derive(Parser, Debug, Clone)]
#[command(
    name = "ride-sim",
    about = "Ride simulator: converts ride time into energy, points and CO₂ saved",
    version
)]
pub struct Settings {
    /// JSON file with ride configuration overrides
    #[arg(long, env = "RIDE_SIM_CONFIG")]
    pub config: Option<PathBuf>,

    /// Ride ceiling in seconds (auto-stop)
    #[arg(long)]
    pub max_seconds: Option<u64>,

    /// Milliseconds between ticks
    #[arg(long)]
    pub tick_ms: Option<u64>,

    /// Print render events as JSON lines instead of drawing the TUI
    #[arg(long)]
    pub headless: bool,

    /// In headless mode, stop after this many ticks (defaults to the ceiling)
    #[arg(long, requires = "headless")]
    pub ride_seconds: Option<u64>,

    /// Display theme
    #[arg(long, default_value = "dark", value_parser = ["dark", "light"])]
    pub theme: String,

    /// Logging level
    #[arg(long, default_value = "info", value_parser = ["error", "warn", "info", "debug", "trace"])]
    pub log_level: String,

    /// Log file path (defaults to ~/.ride-sim/logs/ride-sim.log in TUI mode)
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

impl Settings {
    /// Build the effective ride configuration.
    ///
    /// Starts from the config file (or defaults), applies CLI overrides, then
    /// validates the result.
    pub fn ride_config(&self) -> Result<RideConfig> {
        let mut config = match &self.config {
            Some(path) => RideConfig::load_from(path)?,
            None => RideConfig::default(),
        };
        if let Some(max) = self.max_seconds {
            config.max_seconds = max;
        }
        if let Some(ms) = self.tick_ms {
            config.tick_interval_ms = ms;
        }
        config.validate()?;
        Ok(config)
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
