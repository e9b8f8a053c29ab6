//! Runtime layer for the ride simulator.
//!
//! Supplies the tokio tick source and the background driver that owns a
//! ride session and streams its render events to the presentation layer.

pub mod driver;
pub mod ticker;
