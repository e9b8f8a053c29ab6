//! Terminal UI layer for the ride simulator.
//!
//! Folds the session's render events into a [`sim_view::SimView`] and draws
//! it with [`ratatui`]: clock, energy, points, progress bar, riding
//! indicator, start/stop controls and the post-ride summary card.

pub mod app;
pub mod components;
pub mod sim_view;
pub mod themes;
