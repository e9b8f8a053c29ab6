//! Data types passed from a [`RideSession`](crate::session::RideSession) to
//! its renderer.

use serde::{Deserialize, Serialize};

use crate::config::RideConfig;
use crate::formulas;

// ── RideState ─────────────────────────────────────────────────────────────────

/// Lifecycle state of a ride session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RideState {
    /// No ride in progress; ready to start.
    #[default]
    Idle,
    /// A ride is in progress and a tick source is live.
    Riding,
    /// A ride has just ended and its summary is being emitted.
    Stopped,
}

impl RideState {
    pub fn is_riding(self) -> bool {
        self == RideState::Riding
    }
}

// ── ControlState ──────────────────────────────────────────────────────────────

/// Enablement of the widget's controls for a given state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlState {
    /// Whether the "riding" indicator is shown.
    pub riding_indicator: bool,
    /// Whether the start button accepts input.
    pub start_enabled: bool,
    /// Whether the stop button accepts input.
    pub stop_enabled: bool,
}

impl ControlState {
    pub fn for_state(state: RideState) -> Self {
        let riding = state.is_riding();
        Self {
            riding_indicator: riding,
            start_enabled: !riding,
            stop_enabled: riding,
        }
    }
}

impl Default for ControlState {
    fn default() -> Self {
        Self::for_state(RideState::Idle)
    }
}

// ── TickSnapshot ──────────────────────────────────────────────────────────────

/// Live display values for a given elapsed time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickSnapshot {
    pub elapsed_seconds: u64,
    /// `m:ss` clock string.
    pub display_time: String,
    pub energy_units: f64,
    /// `energy_units` with one fractional digit.
    pub energy: String,
    pub points: u64,
    /// Progress towards the ceiling, in `[0, 100]`.
    pub progress_percent: f64,
}

impl TickSnapshot {
    /// Derive all live values for `elapsed_seconds` under `config`.
    pub fn at(elapsed_seconds: u64, config: &RideConfig) -> Self {
        let energy_units = config.rates.energy_units(elapsed_seconds);
        Self {
            elapsed_seconds,
            display_time: formulas::display_time(elapsed_seconds),
            energy_units,
            energy: formulas::format_energy(energy_units),
            points: config.rates.points_for_energy(energy_units),
            progress_percent: config.progress_percent(elapsed_seconds),
        }
    }
}

// ── RideSummary ───────────────────────────────────────────────────────────────

/// Values frozen at the moment a ride stops.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RideSummary {
    /// Identifier of the ride this summary belongs to.
    pub ride_id: u64,
    /// Elapsed time at the moment of stopping (before the reset).
    pub elapsed_seconds: u64,
    pub energy_units: f64,
    /// `energy_units` with one fractional digit.
    pub energy: String,
    pub points: u64,
    pub co2_grams: f64,
    /// `co2_grams` with one fractional digit and a `g` suffix.
    pub co2: String,
    /// `true` when the ceiling triggered the stop.
    pub auto_stopped: bool,
}

impl RideSummary {
    pub fn new(
        ride_id: u64,
        elapsed_seconds: u64,
        auto_stopped: bool,
        config: &RideConfig,
    ) -> Self {
        let energy_units = config.rates.energy_units(elapsed_seconds);
        let co2_grams = config.rates.co2_grams_for_energy(energy_units);
        Self {
            ride_id,
            elapsed_seconds,
            energy_units,
            energy: formulas::format_energy(energy_units),
            points: config.rates.points_for_energy(energy_units),
            co2_grams,
            co2: formulas::format_co2(co2_grams),
            auto_stopped,
        }
    }
}

// ── RenderEvent ───────────────────────────────────────────────────────────────

/// A render signal emitted by the session after every lifecycle step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum RenderEvent {
    /// A ride started; values are at t = 0 and any prior summary is hidden.
    Started(TickSnapshot),
    /// One second elapsed.
    Tick(TickSnapshot),
    /// The ride stopped; values are frozen from the pre-reset elapsed time.
    Summary(RideSummary),
    /// Counters were zeroed after the summary.
    Reset(TickSnapshot),
}

impl RenderEvent {
    /// Control enablement the widget should show after this event.
    pub fn controls(&self) -> ControlState {
        match self {
            RenderEvent::Started(_) | RenderEvent::Tick(_) => {
                ControlState::for_state(RideState::Riding)
            }
            RenderEvent::Summary(_) | RenderEvent::Reset(_) => {
                ControlState::for_state(RideState::Idle)
            }
        }
    }
}
