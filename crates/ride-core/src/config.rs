//! Ride configuration.
//!
//! [`RideConfig`] bundles the ceiling, the tick period and the metric rates.
//! It can be built from defaults, loaded from a JSON file (missing keys fall
//! back to defaults), and is validated before a session is constructed.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Result, RideError};
use crate::formulas::{self, MetricRates, DEFAULT_MAX_SECONDS};

/// Default tick period in milliseconds (one simulated second).
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 1_000;

/// Tunables for a [`RideSession`](crate::session::RideSession).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RideConfig {
    /// Ceiling in seconds; reaching it auto-stops the ride.
    pub max_seconds: u64,
    /// Wall-clock period between ticks, in milliseconds.
    pub tick_interval_ms: u64,
    /// Conversion rates for energy, points and CO₂.
    #[serde(flatten)]
    pub rates: MetricRates,
}

impl Default for RideConfig {
    fn default() -> Self {
        Self {
            max_seconds: DEFAULT_MAX_SECONDS,
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
            rates: MetricRates::DEFAULT,
        }
    }
}

impl RideConfig {
    /// Load a config from a JSON file and validate it.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| RideError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let config: RideConfig = serde_json::from_str(&content)?;
        config.validate()?;
        tracing::debug!(path = %path.display(), ?config, "loaded ride config");
        Ok(config)
    }

    /// Reject values that would make the session meaningless.
    pub fn validate(&self) -> Result<()> {
        if self.max_seconds == 0 {
            return Err(RideError::InvalidConfig(
                "max_seconds must be greater than zero".to_string(),
            ));
        }
        if self.tick_interval_ms == 0 {
            return Err(RideError::InvalidConfig(
                "tick_interval_ms must be greater than zero".to_string(),
            ));
        }
        let rates = [
            ("energy_per_minute", self.rates.energy_per_minute),
            ("points_per_energy_unit", self.rates.points_per_energy_unit),
            ("co2_grams_per_energy_unit", self.rates.co2_grams_per_energy_unit),
        ];
        for (name, value) in rates {
            if !value.is_finite() || value < 0.0 {
                return Err(RideError::InvalidConfig(format!(
                    "{name} must be a non-negative number, got {value}"
                )));
            }
        }
        Ok(())
    }

    /// Tick period as a [`Duration`].
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    /// Progress towards this config's ceiling, clamped to `[0, 100]`.
    pub fn progress_percent(&self, seconds: u64) -> f64 {
        formulas::progress_percent_of(seconds, self.max_seconds)
    }
}
