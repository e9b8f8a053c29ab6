//! Reusable widgets for the simulator view.

pub mod progress_bar;
