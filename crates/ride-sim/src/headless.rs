use std::io::Write;

use anyhow::{bail, Context};
use ride_core::models::{RenderEvent, RideSummary};
use ride_runtime::driver::RideController;
use tokio::sync::mpsc;

/// Run one ride without a terminal UI, writing every render event to `out`
/// as a JSON line.
///
/// With `stop_after` the driver stops the ride on the tick that reaches that
/// many seconds; otherwise it runs until the ceiling auto-stops it. Returns
/// the summary.
pub async fn run_headless<W: Write>(
    controller: &RideController,
    rx: &mut mpsc::Receiver<RenderEvent>,
    stop_after: Option<u64>,
    out: &mut W,
) -> anyhow::Result<RideSummary> {
    match stop_after {
        Some(seconds) => controller.start_ride_for(seconds).await?,
        None => controller.start_ride().await?,
    }

    let mut summary = None;
    while let Some(event) = rx.recv().await {
        let line = serde_json::to_string(&event).context("serialising render event")?;
        writeln!(out, "{line}")?;

        match &event {
            RenderEvent::Summary(s) => summary = Some(s.clone()),
            RenderEvent::Reset(_) => break,
            _ => {}
        }
    }
    out.flush()?;

    match summary {
        Some(s) => Ok(s),
        None => bail!("ride driver closed before producing a summary"),
    }
}
