//! Application state and TUI event loop for the ride simulator.
//!
//! [`App`] owns the theme and the [`SimView`]. Key presses become
//! [`RideCommand`]s for the driver; render events coming back from the
//! driver are folded into the view before the next draw.

use std::io::{self, Write};
use std::time::Duration;

use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Frame, Terminal};
use tokio::sync::mpsc;

use ride_core::config::RideConfig;
use ride_core::models::RenderEvent;
use ride_runtime::driver::{RideCommand, RideController};

use crate::sim_view::{self, SimView};
use crate::themes::Theme;

/// How long to wait for a key press before redrawing.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

// ── TerminalGuard ─────────────────────────────────────────────────────────────

/// Raw mode plus alternate screen, restored on drop.
///
/// Dropping covers every way out of [`App::run`]: a clean quit, an I/O error
/// propagated with `?`, and the future being cancelled by a `select!`.
struct TerminalGuard<W: Write> {
    out: W,
}

impl<W: Write> TerminalGuard<W> {
    fn enter(mut out: W) -> io::Result<Self> {
        enable_raw_mode()?;
        if let Err(e) = execute!(out, EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(e);
        }
        Ok(Self { out })
    }
}

impl<W: Write> Drop for TerminalGuard<W> {
    fn drop(&mut self) {
        let raw = disable_raw_mode();
        let screen = execute!(self.out, LeaveAlternateScreen, cursor::Show);
        if let Err(e) = raw.and(screen) {
            tracing::warn!(error = %e, "failed to restore terminal");
        }
    }
}

// ── App ───────────────────────────────────────────────────────────────────────

/// Root application state for the simulator TUI.
pub struct App {
    pub theme: Theme,
    pub view: SimView,
    /// Set to `true` to break out of the event loop on the next iteration.
    pub should_quit: bool,
}

impl App {
    pub fn new(theme_name: &str, config: &RideConfig) -> Self {
        Self {
            theme: Theme::from_name(theme_name),
            view: SimView::new(config),
            should_quit: false,
        }
    }

    /// Run the interactive TUI until the user quits or the driver goes away.
    ///
    /// Uses `crossterm::event::poll` with a short timeout so the loop stays on
    /// the current thread while render events arrive on the async channel via
    /// `try_recv`.
    pub async fn run(
        mut self,
        controller: RideController,
        mut rx: mpsc::Receiver<RenderEvent>,
    ) -> io::Result<()> {
        let _guard = TerminalGuard::enter(io::stdout())?;
        let backend = CrosstermBackend::new(io::stdout());
        let mut terminal = Terminal::new(backend)?;

        loop {
            terminal.draw(|frame| self.render(frame))?;

            if event::poll(POLL_INTERVAL)? {
                if let Event::Key(key) = event::read()? {
                    if let Some(command) = self.handle_key(key) {
                        if controller.send(command).await.is_err() {
                            tracing::warn!(?command, "driver closed; quitting");
                            self.should_quit = true;
                        }
                    }
                }
            }

            // Drain any pending render events (non-blocking).
            loop {
                match rx.try_recv() {
                    Ok(event) => self.apply_event(&event),
                    Err(mpsc::error::TryRecvError::Empty) => break,
                    Err(mpsc::error::TryRecvError::Disconnected) => {
                        self.should_quit = true;
                        break;
                    }
                }
            }

            if self.should_quit {
                return Ok(());
            }
        }
    }

    /// Map a key press to a driver command.
    ///
    /// Quit keys set [`App::should_quit`] and return `None`. Start and stop
    /// are only issued when the matching control is enabled.
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<RideCommand> {
        if key.kind != KeyEventKind::Press {
            return None;
        }
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true;
                None
            }
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                self.should_quit = true;
                None
            }
            KeyCode::Char('s') | KeyCode::Char('S') | KeyCode::Enter
                if self.view.controls.start_enabled =>
            {
                Some(RideCommand::Start)
            }
            KeyCode::Char('x') | KeyCode::Char('X') | KeyCode::Char(' ')
                if self.view.controls.stop_enabled =>
            {
                Some(RideCommand::Stop)
            }
            _ => None,
        }
    }

    pub fn apply_event(&mut self, event: &RenderEvent) {
        self.view.apply(event);
    }

    fn render(&self, frame: &mut Frame) {
        let area = frame.area();
        sim_view::render_sim_view(frame, area, &self.view, &self.theme);
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
