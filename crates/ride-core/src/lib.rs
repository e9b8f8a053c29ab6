//! Core types for the ride simulator.
//!
//! Holds the metric formulas, configuration, render-event model and the
//! [`session::RideSession`] state machine. Nothing in this crate performs I/O
//! or spawns tasks; the tick source and the renderer are supplied by callers.

pub mod config;
pub mod error;
pub mod formulas;
pub mod models;
pub mod session;
pub mod settings;

pub use config::RideConfig;
pub use error::{Result, RideError};
pub use models::{ControlState, RenderEvent, RideState, RideSummary, TickSnapshot};
pub use session::{Renderer, RideSession, TickHandle, TickSource};
