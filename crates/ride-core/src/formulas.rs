//! Pure metric derivations for a ride.
//!
//! Every function here is a total, deterministic function of the elapsed
//! seconds. The free functions use the default rates; [`MetricRates`] carries
//! overridden ones.

use serde::{Deserialize, Serialize};

/// Energy units earned per minute of riding.
pub const ENERGY_PER_MINUTE: f64 = 2.0;
/// Reward points per energy unit.
pub const POINTS_PER_ENERGY_UNIT: f64 = 5.0;
/// Grams of CO₂ saved per energy unit.
pub const CO2_GRAMS_PER_ENERGY_UNIT: f64 = 8.0;
/// Ride ceiling in seconds, used for auto-stop and progress normalisation.
pub const DEFAULT_MAX_SECONDS: u64 = 600;

// ── MetricRates ───────────────────────────────────────────────────────────────

/// Conversion rates from ride time to display metrics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricRates {
    /// Energy units per minute.
    pub energy_per_minute: f64,
    /// Points awarded per energy unit (result is floored).
    pub points_per_energy_unit: f64,
    /// CO₂ grams per energy unit.
    pub co2_grams_per_energy_unit: f64,
}

impl MetricRates {
    pub const DEFAULT: MetricRates = MetricRates {
        energy_per_minute: ENERGY_PER_MINUTE,
        points_per_energy_unit: POINTS_PER_ENERGY_UNIT,
        co2_grams_per_energy_unit: CO2_GRAMS_PER_ENERGY_UNIT,
    };

    /// `(seconds / 60) * energy_per_minute`.
    pub fn energy_units(&self, seconds: u64) -> f64 {
        (seconds as f64 / 60.0) * self.energy_per_minute
    }

    /// `floor(energy * points_per_energy_unit)`.
    pub fn points_for_energy(&self, energy: f64) -> u64 {
        (energy * self.points_per_energy_unit).floor().max(0.0) as u64
    }

    /// Points for a ride of `seconds`.
    pub fn points(&self, seconds: u64) -> u64 {
        self.points_for_energy(self.energy_units(seconds))
    }

    /// `energy * co2_grams_per_energy_unit`.
    pub fn co2_grams_for_energy(&self, energy: f64) -> f64 {
        energy * self.co2_grams_per_energy_unit
    }

    /// CO₂ grams saved for a ride of `seconds`.
    pub fn co2_grams(&self, seconds: u64) -> f64 {
        self.co2_grams_for_energy(self.energy_units(seconds))
    }
}

impl Default for MetricRates {
    fn default() -> Self {
        Self::DEFAULT
    }
}

// ── Default-rate helpers ──────────────────────────────────────────────────────

/// Energy units for `seconds` at the default rate (`seconds / 30`).
///
/// ```
/// use ride_core::formulas::energy_units;
///
/// assert_eq!(energy_units(150), 5.0);
/// assert_eq!(energy_units(600), 20.0);
/// ```
pub fn energy_units(seconds: u64) -> f64 {
    MetricRates::DEFAULT.energy_units(seconds)
}

/// Reward points for `seconds` at the default rates.
pub fn points(seconds: u64) -> u64 {
    MetricRates::DEFAULT.points(seconds)
}

/// CO₂ grams saved for `seconds` at the default rates.
pub fn co2_grams(seconds: u64) -> f64 {
    MetricRates::DEFAULT.co2_grams(seconds)
}

/// Render a CO₂ amount with one fractional digit and a `g` suffix.
///
/// ```
/// use ride_core::formulas::format_co2;
///
/// assert_eq!(format_co2(160.0), "160.0g");
/// assert_eq!(format_co2(0.0), "0.0g");
/// ```
pub fn format_co2(grams: f64) -> String {
    format!("{:.1}g", grams)
}

/// Render an energy amount with one fractional digit.
pub fn format_energy(energy: f64) -> String {
    format!("{:.1}", energy)
}

/// Progress towards the default ceiling, clamped to `[0, 100]`.
pub fn progress_percent(seconds: u64) -> f64 {
    progress_percent_of(seconds, DEFAULT_MAX_SECONDS)
}

/// `min((seconds / max_seconds) * 100, 100)`.
///
/// Returns `0.0` when `max_seconds` is zero to avoid division by zero.
///
/// ```
/// use ride_core::formulas::progress_percent_of;
///
/// assert_eq!(progress_percent_of(300, 600), 50.0);
/// assert_eq!(progress_percent_of(900, 600), 100.0);
/// assert_eq!(progress_percent_of(5, 0), 0.0);
/// ```
pub fn progress_percent_of(seconds: u64, max_seconds: u64) -> f64 {
    if max_seconds == 0 {
        return 0.0;
    }
    ((seconds as f64 / max_seconds as f64) * 100.0).min(100.0)
}

/// Format elapsed seconds as `m:ss`.
///
/// Minutes are not wrapped into hours.
///
/// ```
/// use ride_core::formulas::display_time;
///
/// assert_eq!(display_time(0), "0:00");
/// assert_eq!(display_time(65), "1:05");
/// assert_eq!(display_time(599), "9:59");
/// ```
pub fn display_time(seconds: u64) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}
