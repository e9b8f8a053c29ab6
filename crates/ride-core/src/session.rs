//! The ride session state machine.
//!
//! [`RideSession`] owns the elapsed-time counter and at most one live tick
//! handle. It is driven by three operations:
//!
//! * [`RideSession::start`] — enter `Riding`, zero the clock, acquire a tick
//!   source. A no-op while already riding.
//! * [`RideSession::tick`] — advance one second; reaching the ceiling stops
//!   the ride synchronously before returning.
//! * [`RideSession::stop`] — release the tick source, emit a summary of the
//!   pre-reset elapsed time, then return to `Idle`.
//!
//! The session never spawns anything itself. Where ticks come from is decided
//! by the [`TickSource`] it is built with, and what happens to render signals
//! is decided by its [`Renderer`].

use std::time::Duration;

use crate::config::RideConfig;
use crate::models::{RenderEvent, RideState, RideSummary, TickSnapshot};

// ── Seams ─────────────────────────────────────────────────────────────────────

/// An owned, cancelable handle to a repeating tick task.
pub trait TickHandle {
    /// Stop the repeating task. Cancelling twice is a no-op.
    fn cancel(&mut self);

    /// Whether the task may still produce ticks.
    fn is_active(&self) -> bool;
}

/// Factory for repeating tick tasks.
pub trait TickSource {
    type Handle: TickHandle;

    /// Begin ticking every `period` on behalf of ride `ride_id`.
    fn schedule(&mut self, period: Duration, ride_id: u64) -> Self::Handle;
}

/// Receives render signals from a session.
pub trait Renderer {
    fn render(&mut self, event: &RenderEvent);
}

impl<F> Renderer for F
where
    F: FnMut(&RenderEvent),
{
    fn render(&mut self, event: &RenderEvent) {
        self(event)
    }
}

// ── RideSession ───────────────────────────────────────────────────────────────

/// Timer-driven ride state machine.
pub struct RideSession<T: TickSource, R: Renderer> {
    config: RideConfig,
    state: RideState,
    elapsed_seconds: u64,
    /// Bumped on every start; zero until the first ride.
    ride_id: u64,
    ticks: T,
    handle: Option<T::Handle>,
    renderer: R,
    last_summary: Option<RideSummary>,
}

impl<T: TickSource, R: Renderer> RideSession<T, R> {
    /// Create an idle session.
    pub fn new(config: RideConfig, ticks: T, renderer: R) -> Self {
        Self {
            config,
            state: RideState::Idle,
            elapsed_seconds: 0,
            ride_id: 0,
            ticks,
            handle: None,
            renderer,
            last_summary: None,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────────────────

    /// Start a ride. Returns `false` when a ride is already in progress.
    pub fn start(&mut self) -> bool {
        if self.state.is_riding() {
            tracing::debug!(ride_id = self.ride_id, "start ignored; already riding");
            return false;
        }

        // A handle can only be present while riding, but never leak one.
        self.release_ticks();

        self.ride_id += 1;
        self.state = RideState::Riding;
        self.elapsed_seconds = 0;
        self.last_summary = None;

        tracing::info!(ride_id = self.ride_id, "ride started");
        let initial = self.snapshot();
        self.renderer.render(&RenderEvent::Started(initial));

        let handle = self
            .ticks
            .schedule(self.config.tick_interval(), self.ride_id);
        self.handle = Some(handle);
        true
    }

    /// Advance the ride by one second.
    ///
    /// Ignored unless riding. When the ceiling is reached the ride is stopped
    /// before this call returns.
    pub fn tick(&mut self) {
        if !self.state.is_riding() {
            tracing::debug!(ride_id = self.ride_id, "tick ignored; not riding");
            return;
        }

        self.elapsed_seconds += 1;
        tracing::debug!(
            ride_id = self.ride_id,
            elapsed_seconds = self.elapsed_seconds,
            "tick"
        );
        let snapshot = self.snapshot();
        self.renderer.render(&RenderEvent::Tick(snapshot));

        if self.elapsed_seconds >= self.config.max_seconds {
            tracing::info!(
                ride_id = self.ride_id,
                elapsed_seconds = self.elapsed_seconds,
                "ceiling reached; auto-stopping"
            );
            self.finish(true);
        }
    }

    /// Stop the current ride and emit its summary.
    ///
    /// Returns `None` (and emits nothing) when there is nothing to summarise.
    pub fn stop(&mut self) -> Option<RideSummary> {
        if !self.state.is_riding() && self.elapsed_seconds == 0 {
            tracing::debug!("stop ignored; no ride in progress");
            return None;
        }
        Some(self.finish(false))
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn state(&self) -> RideState {
        self.state
    }

    pub fn is_riding(&self) -> bool {
        self.state.is_riding()
    }

    pub fn elapsed_seconds(&self) -> u64 {
        self.elapsed_seconds
    }

    /// Identifier of the current (or most recent) ride.
    pub fn ride_id(&self) -> u64 {
        self.ride_id
    }

    /// Summary of the most recently finished ride, cleared on start.
    pub fn last_summary(&self) -> Option<&RideSummary> {
        self.last_summary.as_ref()
    }

    /// Live values for the current elapsed time.
    pub fn snapshot(&self) -> TickSnapshot {
        TickSnapshot::at(self.elapsed_seconds, &self.config)
    }

    /// Whether a tick handle is currently held.
    pub fn has_live_ticks(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| h.is_active())
    }

    pub fn tick_source(&self) -> &T {
        &self.ticks
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    // ── Private helpers ───────────────────────────────────────────────────

    fn release_ticks(&mut self) {
        if let Some(mut handle) = self.handle.take() {
            handle.cancel();
        }
    }

    /// Release the tick source, emit the summary, then reset to idle.
    fn finish(&mut self, auto_stopped: bool) -> RideSummary {
        self.release_ticks();
        self.state = RideState::Stopped;

        let summary = RideSummary::new(
            self.ride_id,
            self.elapsed_seconds,
            auto_stopped,
            &self.config,
        );
        tracing::info!(
            ride_id = summary.ride_id,
            elapsed_seconds = summary.elapsed_seconds,
            points = summary.points,
            auto_stopped,
            "ride stopped"
        );
        self.renderer.render(&RenderEvent::Summary(summary.clone()));

        self.elapsed_seconds = 0;
        self.state = RideState::Idle;
        let zeroed = self.snapshot();
        self.renderer.render(&RenderEvent::Reset(zeroed));

        self.last_summary = Some(summary.clone());
        summary
    }
}

impl<T: TickSource, R: Renderer> Drop for RideSession<T, R> {
    fn drop(&mut self) {
        self.release_ticks();
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    // ── helpers ───────────────────────────────────────────────────────────

    /// Tick source that records schedules and counts live handles.
    #[derive(Default)]
    struct CountingTicks {
        live: Rc<Cell<usize>>,
        scheduled: Vec<(Duration, u64)>,
    }

    struct CountingHandle {
        live: Rc<Cell<usize>>,
        active: bool,
    }

    impl TickHandle for CountingHandle {
        fn cancel(&mut self) {
            if self.active {
                self.active = false;
                self.live.set(self.live.get() - 1);
            }
        }

        fn is_active(&self) -> bool {
            self.active
        }
    }

    impl TickSource for CountingTicks {
        type Handle = CountingHandle;

        fn schedule(&mut self, period: Duration, ride_id: u64) -> CountingHandle {
            self.scheduled.push((period, ride_id));
            self.live.set(self.live.get() + 1);
            CountingHandle {
                live: Rc::clone(&self.live),
                active: true,
            }
        }
    }

    type Events = Rc<RefCell<Vec<RenderEvent>>>;

    fn session_with(
        config: RideConfig,
    ) -> (
        RideSession<CountingTicks, impl FnMut(&RenderEvent)>,
        Events,
        Rc<Cell<usize>>,
    ) {
        let events: Events = Rc::default();
        let sink = Rc::clone(&events);
        let ticks = CountingTicks::default();
        let live = Rc::clone(&ticks.live);
        let session = RideSession::new(config, ticks, move |e: &RenderEvent| {
            sink.borrow_mut().push(e.clone())
        });
        (session, events, live)
    }

    fn new_session() -> (
        RideSession<CountingTicks, impl FnMut(&RenderEvent)>,
        Events,
        Rc<Cell<usize>>,
    ) {
        session_with(RideConfig::default())
    }

    fn summaries(events: &Events) -> Vec<RideSummary> {
        events
            .borrow()
            .iter()
            .filter_map(|e| match e {
                RenderEvent::Summary(s) => Some(s.clone()),
                _ => None,
            })
            .collect()
    }

    // ── construction ──────────────────────────────────────────────────────

    #[test]
    fn test_new_session_is_idle() {
        let (session, events, live) = new_session();
        assert_eq!(session.state(), RideState::Idle);
        assert_eq!(session.elapsed_seconds(), 0);
        assert_eq!(session.ride_id(), 0);
        assert!(session.last_summary().is_none());
        assert!(!session.has_live_ticks());
        assert_eq!(live.get(), 0);
        assert!(events.borrow().is_empty());
    }

    // ── start ─────────────────────────────────────────────────────────────

    #[test]
    fn test_start_renders_initial_values_and_schedules() {
        let (mut session, events, live) = new_session();
        assert!(session.start());

        assert_eq!(session.state(), RideState::Riding);
        assert_eq!(live.get(), 1);
        assert_eq!(
            session.tick_source().scheduled,
            vec![(Duration::from_secs(1), 1)]
        );

        let events = events.borrow();
        assert_eq!(events.len(), 1);
        match &events[0] {
            RenderEvent::Started(snap) => {
                assert_eq!(snap.display_time, "0:00");
                assert_eq!(snap.points, 0);
                assert_eq!(snap.progress_percent, 0.0);
            }
            other => panic!("expected Started, got {other:?}"),
        }
    }

    #[test]
    fn test_double_start_keeps_single_tick_source() {
        let (mut session, events, live) = new_session();
        assert!(session.start());
        for _ in 0..7 {
            session.tick();
        }

        assert!(!session.start());
        assert_eq!(live.get(), 1);
        assert_eq!(session.tick_source().scheduled.len(), 1);
        assert_eq!(session.elapsed_seconds(), 7);
        assert_eq!(session.ride_id(), 1);
        // 1 Started + 7 Ticks, nothing from the second start.
        assert_eq!(events.borrow().len(), 8);
    }

    #[test]
    fn test_start_clears_previous_summary() {
        let (mut session, _events, _live) = new_session();
        session.start();
        session.tick();
        session.stop();
        assert!(session.last_summary().is_some());

        session.start();
        assert!(session.last_summary().is_none());
        assert_eq!(session.ride_id(), 2);
    }

    // ── tick ──────────────────────────────────────────────────────────────

    #[test]
    fn test_tick_advances_by_one() {
        let (mut session, events, _live) = new_session();
        session.start();
        session.tick();
        session.tick();
        assert_eq!(session.elapsed_seconds(), 2);

        let events = events.borrow();
        match events.last() {
            Some(RenderEvent::Tick(snap)) => {
                assert_eq!(snap.elapsed_seconds, 2);
                assert_eq!(snap.display_time, "0:02");
            }
            other => panic!("expected Tick, got {other:?}"),
        }
    }

    #[test]
    fn test_tick_while_idle_is_ignored() {
        let (mut session, events, _live) = new_session();
        session.tick();
        assert_eq!(session.elapsed_seconds(), 0);
        assert!(events.borrow().is_empty());
    }

    #[test]
    fn test_auto_stop_at_ceiling() {
        let (mut session, events, live) = new_session();
        session.start();
        for _ in 0..600 {
            session.tick();
        }

        let found = summaries(&events);
        assert_eq!(found.len(), 1, "exactly one auto-stop");
        let summary = &found[0];
        assert_eq!(summary.elapsed_seconds, 600);
        assert_eq!(summary.energy_units, 20.0);
        assert_eq!(summary.points, 100);
        assert_eq!(summary.co2, "160.0g");
        assert!(summary.auto_stopped);

        assert_eq!(session.state(), RideState::Idle);
        assert_eq!(session.elapsed_seconds(), 0);
        assert_eq!(live.get(), 0, "tick source released on auto-stop");
        assert!(!session.has_live_ticks());
    }

    #[test]
    fn test_ticks_after_auto_stop_do_nothing() {
        let (mut session, events, _live) = new_session();
        session.start();
        for _ in 0..650 {
            session.tick();
        }
        assert_eq!(summaries(&events).len(), 1);
        assert_eq!(session.elapsed_seconds(), 0);

        // The last event is the reset emitted by the auto-stop.
        let events = events.borrow();
        assert!(matches!(events.last(), Some(RenderEvent::Reset(_))));
        let ticks = events
            .iter()
            .filter(|e| matches!(e, RenderEvent::Tick(_)))
            .count();
        assert_eq!(ticks, 600);
    }

    #[test]
    fn test_auto_stop_with_small_ceiling() {
        let config = RideConfig {
            max_seconds: 3,
            ..RideConfig::default()
        };
        let (mut session, events, live) = session_with(config);
        session.start();
        session.tick();
        session.tick();
        assert!(summaries(&events).is_empty());
        session.tick();

        let found = summaries(&events);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].elapsed_seconds, 3);
        assert_eq!(live.get(), 0);
    }

    // ── stop ──────────────────────────────────────────────────────────────

    #[test]
    fn test_stop_on_fresh_session_is_noop() {
        let (mut session, events, live) = new_session();
        assert!(session.stop().is_none());
        assert!(events.borrow().is_empty());
        assert_eq!(session.state(), RideState::Idle);
        assert_eq!(live.get(), 0);
    }

    #[test]
    fn test_start_150_ticks_then_stop() {
        let (mut session, events, live) = new_session();
        session.start();
        for _ in 0..150 {
            session.tick();
        }
        let summary = session.stop().expect("summary");

        assert_eq!(summary.elapsed_seconds, 150);
        assert_eq!(summary.energy_units, 5.0);
        assert_eq!(summary.energy, "5.0");
        assert_eq!(summary.points, 25);
        assert_eq!(summary.co2, "40.0g");
        assert!(!summary.auto_stopped);

        assert_eq!(session.state(), RideState::Idle);
        assert_eq!(session.elapsed_seconds(), 0);
        assert_eq!(live.get(), 0);
        assert_eq!(session.last_summary(), Some(&summary));
        assert_eq!(summaries(&events), vec![summary]);
    }

    #[test]
    fn test_stop_emits_summary_then_reset() {
        let (mut session, events, _live) = new_session();
        session.start();
        session.tick();
        session.stop();

        let events = events.borrow();
        let tail: Vec<_> = events.iter().rev().take(2).collect();
        match (tail[1], tail[0]) {
            (RenderEvent::Summary(s), RenderEvent::Reset(r)) => {
                assert_eq!(s.elapsed_seconds, 1);
                assert_eq!(r.elapsed_seconds, 0);
                assert_eq!(r.display_time, "0:00");
            }
            other => panic!("unexpected tail {other:?}"),
        }
    }

    #[test]
    fn test_stop_immediately_after_start_produces_summary() {
        let (mut session, events, live) = new_session();
        session.start();
        let summary = session.stop().expect("ride in progress");
        assert_eq!(summary.elapsed_seconds, 0);
        assert_eq!(summary.points, 0);
        assert_eq!(summary.co2, "0.0g");
        assert_eq!(summaries(&events).len(), 1);
        assert_eq!(live.get(), 0);
    }

    #[test]
    fn test_second_stop_is_noop() {
        let (mut session, events, _live) = new_session();
        session.start();
        session.tick();
        assert!(session.stop().is_some());
        let before = events.borrow().len();
        assert!(session.stop().is_none());
        assert_eq!(events.borrow().len(), before);
    }

    #[test]
    fn test_restart_after_stop() {
        let (mut session, events, live) = new_session();
        session.start();
        for _ in 0..10 {
            session.tick();
        }
        session.stop();

        assert!(session.start());
        assert_eq!(live.get(), 1);
        session.tick();
        assert_eq!(session.elapsed_seconds(), 1);
        let summary = session.stop().unwrap();
        assert_eq!(summary.ride_id, 2);
        assert_eq!(summary.elapsed_seconds, 1);
        assert_eq!(summaries(&events).len(), 2);
        assert_eq!(live.get(), 0);
    }

    // ── resource release ──────────────────────────────────────────────────

    #[test]
    fn test_drop_releases_tick_source() {
        let (mut session, _events, live) = new_session();
        session.start();
        assert_eq!(live.get(), 1);
        drop(session);
        assert_eq!(live.get(), 0);
    }

    #[test]
    fn test_no_leak_across_many_rides() {
        let (mut session, _events, live) = new_session();
        for ride in 0..20u64 {
            session.start();
            session.start();
            for _ in 0..ride {
                session.tick();
            }
            assert_eq!(live.get(), 1);
            session.stop();
            assert_eq!(live.get(), 0);
        }
        assert_eq!(session.tick_source().scheduled.len(), 20);
    }

    #[test]
    fn test_custom_rates_flow_into_summary() {
        let mut config = RideConfig::default();
        config.rates.points_per_energy_unit = 10.0;
        let (mut session, _events, _live) = session_with(config);
        session.start();
        for _ in 0..60 {
            session.tick();
        }
        let summary = session.stop().unwrap();
        assert_eq!(summary.energy_units, 2.0);
        assert_eq!(summary.points, 20);
    }
}
