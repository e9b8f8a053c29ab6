//! Simulator widget view.
//!
//! [`SimView`] is the display sink for a ride session: it holds the last
//! values each render event carried and nothing else. The `build_*` helpers
//! turn it into styled lines so layout can be tested without a terminal.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use ride_core::config::RideConfig;
use ride_core::formulas;
use ride_core::models::{ControlState, RenderEvent, RideSummary, TickSnapshot};

use crate::components::progress_bar::RideProgressBar;
use crate::themes::Theme;

/// Height of the summary card including borders.
const SUMMARY_HEIGHT: u16 = 6;

// ── SimView ───────────────────────────────────────────────────────────────────

/// Display state of the simulator widget.
#[derive(Debug, Clone, PartialEq)]
pub struct SimView {
    /// Live values shown in the counters and progress bar.
    pub snapshot: TickSnapshot,
    /// Indicator and button enablement.
    pub controls: ControlState,
    /// Summary card contents; `None` hides the card.
    pub summary: Option<RideSummary>,
    /// Ceiling shown next to the progress bar.
    pub max_seconds: u64,
}

impl SimView {
    pub fn new(config: &RideConfig) -> Self {
        Self {
            snapshot: TickSnapshot::at(0, config),
            controls: ControlState::default(),
            summary: None,
            max_seconds: config.max_seconds,
        }
    }

    /// Fold one render event into the view.
    pub fn apply(&mut self, event: &RenderEvent) {
        self.controls = event.controls();
        match event {
            RenderEvent::Started(snapshot) => {
                self.summary = None;
                self.snapshot = snapshot.clone();
            }
            RenderEvent::Tick(snapshot) | RenderEvent::Reset(snapshot) => {
                self.snapshot = snapshot.clone();
            }
            RenderEvent::Summary(summary) => {
                self.summary = Some(summary.clone());
            }
        }
    }
}

// ── Line builders ─────────────────────────────────────────────────────────────

fn metric_row<'a>(label: &'static str, value: String, theme: &'a Theme) -> Line<'a> {
    Line::from(vec![
        Span::styled(format!("{label:<10}"), theme.label),
        Span::styled(value, theme.value),
    ])
}

fn button<'a>(
    label: &'static str,
    key: &'static str,
    enabled: bool,
    theme: &'a Theme,
) -> Vec<Span<'a>> {
    vec![
        Span::styled(format!(" {label} "), theme.button_style(enabled)),
        Span::styled(format!(" ({key})"), theme.dim),
    ]
}

/// Build the main simulator lines (extracted for testability).
pub fn build_sim_lines<'a>(view: &SimView, theme: &'a Theme) -> Vec<Line<'a>> {
    let mut lines: Vec<Line<'a>> = Vec::with_capacity(12);

    lines.push(Line::from(Span::styled("🚴 RIDE SIMULATOR", theme.header)));
    lines.push(Line::from(Span::styled("=".repeat(48), theme.separator)));

    if view.controls.riding_indicator {
        lines.push(Line::from(Span::styled("● RIDING", theme.riding)));
    } else {
        lines.push(Line::from(Span::styled("○ idle", theme.dim)));
    }
    lines.push(Line::from(""));

    lines.push(metric_row("Time", view.snapshot.display_time.clone(), theme));
    lines.push(metric_row("Energy", view.snapshot.energy.clone(), theme));
    lines.push(metric_row("Points", view.snapshot.points.to_string(), theme));
    lines.push(Line::from(""));

    let mut bar = RideProgressBar::new(view.snapshot.progress_percent, theme).to_line();
    bar.spans.push(Span::styled(
        format!("  of {}", formulas::display_time(view.max_seconds)),
        theme.dim,
    ));
    lines.push(bar);
    lines.push(Line::from(""));

    let mut controls = button("Start", "s", view.controls.start_enabled, theme);
    controls.push(Span::raw("   "));
    controls.extend(button("Stop", "x", view.controls.stop_enabled, theme));
    controls.push(Span::styled("   q to quit", theme.dim));
    lines.push(Line::from(controls));

    lines
}

/// Build the summary card body.
pub fn build_summary_lines<'a>(summary: &RideSummary, theme: &'a Theme) -> Vec<Line<'a>> {
    let mut lines = vec![
        metric_row("Energy", summary.energy.clone(), theme),
        metric_row("Points", summary.points.to_string(), theme),
        metric_row("CO₂ saved", summary.co2.clone(), theme),
    ];
    if summary.auto_stopped {
        lines.push(Line::from(Span::styled(
            "Maximum ride time reached",
            theme.success,
        )));
    }
    lines
}

// ── Render ────────────────────────────────────────────────────────────────────

/// Render the simulator into `area`, with the summary card below when shown.
pub fn render_sim_view(frame: &mut Frame, area: Rect, view: &SimView, theme: &Theme) {
    let [main, card] =
        Layout::vertical([Constraint::Min(0), Constraint::Length(SUMMARY_HEIGHT)]).areas(area);

    let paragraph = Paragraph::new(Text::from(build_sim_lines(view, theme)));
    frame.render_widget(paragraph, main);

    if let Some(summary) = &view.summary {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(theme.summary_border)
            .title(Span::styled(" Ride Summary ", theme.summary_title));
        let body = Paragraph::new(Text::from(build_summary_lines(summary, theme))).block(block);
        frame.render_widget(body, card);
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
