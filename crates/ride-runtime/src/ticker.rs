//! tokio-backed tick source.
//!
//! [`IntervalTicker`] implements [`TickSource`] by spawning one task per ride
//! that runs a [`tokio::time::interval`] and pushes a [`TickSignal`] into an
//! `mpsc` channel on every period. The returned [`IntervalHandle`] aborts the
//! task on [`cancel`](TickHandle::cancel) or when dropped.

use std::time::Duration;

use ride_core::session::{TickHandle, TickSource};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};

/// Default buffer for the tick channel.
pub const TICK_BUFFER: usize = 16;

/// One elapsed period for the ride identified by `ride_id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickSignal {
    pub ride_id: u64,
}

// ── IntervalTicker ────────────────────────────────────────────────────────────

/// Spawns repeating tick tasks on the current tokio runtime.
pub struct IntervalTicker {
    tx: mpsc::Sender<TickSignal>,
}

impl IntervalTicker {
    pub fn new(tx: mpsc::Sender<TickSignal>) -> Self {
        Self { tx }
    }

    /// Create a ticker together with the receiving end of its channel.
    pub fn channel(buffer: usize) -> (Self, mpsc::Receiver<TickSignal>) {
        let (tx, rx) = mpsc::channel(buffer);
        (Self::new(tx), rx)
    }
}

impl TickSource for IntervalTicker {
    type Handle = IntervalHandle;

    /// Must be called from within a tokio runtime.
    fn schedule(&mut self, period: Duration, ride_id: u64) -> IntervalHandle {
        let tx = self.tx.clone();

        let handle = tokio::spawn(async move {
            let mut interval = time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick completes immediately; a ride's first second
            // should only elapse after one full period.
            interval.tick().await;

            loop {
                interval.tick().await;
                if tx.send(TickSignal { ride_id }).await.is_err() {
                    tracing::debug!(ride_id, "tick channel closed; exiting ticker");
                    break;
                }
            }
        });

        tracing::debug!(ride_id, period_ms = period.as_millis() as u64, "ticker scheduled");
        IntervalHandle {
            handle: Some(handle),
        }
    }
}

// ── IntervalHandle ────────────────────────────────────────────────────────────

/// Owned handle to one repeating tick task.
pub struct IntervalHandle {
    handle: Option<JoinHandle<()>>,
}

impl TickHandle for IntervalHandle {
    fn cancel(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }

    fn is_active(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for IntervalHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_ticks_once_per_period() {
        let (mut ticker, mut rx) = IntervalTicker::channel(TICK_BUFFER);
        let mut handle = ticker.schedule(Duration::from_secs(1), 7);
        assert!(handle.is_active());

        let start = time::Instant::now();
        for _ in 0..3 {
            let signal = rx.recv().await.expect("tick");
            assert_eq!(signal, TickSignal { ride_id: 7 });
        }
        assert_eq!(start.elapsed(), Duration::from_secs(3));

        handle.cancel();
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_immediate_tick() {
        let (mut ticker, mut rx) = IntervalTicker::channel(TICK_BUFFER);
        let _handle = ticker.schedule(Duration::from_secs(1), 1);

        time::sleep(Duration::from_millis(500)).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_stops_ticks() {
        let (mut ticker, mut rx) = IntervalTicker::channel(TICK_BUFFER);
        let mut handle = ticker.schedule(Duration::from_secs(1), 1);

        rx.recv().await.expect("first tick");
        handle.cancel();
        assert!(!handle.is_active());

        time::sleep(Duration::from_secs(10)).await;
        assert!(rx.try_recv().is_err(), "no tick after cancel");
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_is_idempotent() {
        let (mut ticker, _rx) = IntervalTicker::channel(TICK_BUFFER);
        let mut handle = ticker.schedule(Duration::from_secs(1), 1);
        handle.cancel();
        handle.cancel();
        assert!(!handle.is_active());
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_cancels() {
        let (mut ticker, mut rx) = IntervalTicker::channel(TICK_BUFFER);
        let handle = ticker.schedule(Duration::from_secs(1), 1);
        drop(handle);

        time::sleep(Duration::from_secs(5)).await;
        assert!(rx.try_recv().is_err());
    }
}
