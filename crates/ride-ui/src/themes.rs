use ratatui::style::{Color, Modifier, Style};

/// Styles used by the ride simulator view.
#[derive(Debug, Clone)]
pub struct Theme {
    // ── Header ───────────────────────────────────────────────────────────────
    pub header: Style,
    pub separator: Style,

    // ── Text ─────────────────────────────────────────────────────────────────
    pub dim: Style,
    pub label: Style,
    pub value: Style,

    // ── Status ───────────────────────────────────────────────────────────────
    pub riding: Style,
    pub success: Style,

    // ── Progress bars ────────────────────────────────────────────────────────
    /// Filled portion below 50 %.
    pub progress_low: Style,
    /// Filled portion between 50 % and 80 %.
    pub progress_medium: Style,
    /// Filled portion at or above 80 %.
    pub progress_high: Style,
    pub progress_empty: Style,
    pub progress_label: Style,

    // ── Controls ─────────────────────────────────────────────────────────────
    pub button_enabled: Style,
    pub button_disabled: Style,

    // ── Summary card ─────────────────────────────────────────────────────────
    pub summary_border: Style,
    pub summary_title: Style,
}

impl Theme {
    pub fn dark() -> Self {
        Self {
            header: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            separator: Style::default().fg(Color::DarkGray),

            dim: Style::default().fg(Color::DarkGray),
            label: Style::default().fg(Color::Gray),
            value: Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),

            riding: Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
            success: Style::default().fg(Color::Green),

            progress_low: Style::default().fg(Color::Green),
            progress_medium: Style::default().fg(Color::Yellow),
            progress_high: Style::default().fg(Color::Red),
            progress_empty: Style::default().fg(Color::DarkGray),
            progress_label: Style::default().fg(Color::Gray),

            button_enabled: Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            button_disabled: Style::default().fg(Color::DarkGray),

            summary_border: Style::default().fg(Color::Green),
            summary_title: Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        }
    }

    pub fn light() -> Self {
        Self {
            header: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            separator: Style::default().fg(Color::Gray),

            dim: Style::default().fg(Color::Gray),
            label: Style::default().fg(Color::DarkGray),
            value: Style::default()
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),

            riding: Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
            success: Style::default().fg(Color::Green),

            progress_low: Style::default().fg(Color::Green),
            progress_medium: Style::default().fg(Color::Yellow),
            progress_high: Style::default().fg(Color::Red),
            progress_empty: Style::default().fg(Color::Gray),
            progress_label: Style::default().fg(Color::DarkGray),

            button_enabled: Style::default()
                .fg(Color::White)
                .bg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            button_disabled: Style::default().fg(Color::Gray),

            summary_border: Style::default().fg(Color::Green),
            summary_title: Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        }
    }

    /// Resolve a theme by name; unknown names fall back to dark.
    pub fn from_name(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "light" => Self::light(),
            _ => Self::dark(),
        }
    }

    /// Fill style for a progress percentage.
    pub fn progress_style(&self, percentage: f64) -> Style {
        if percentage >= 80.0 {
            self.progress_high
        } else if percentage >= 50.0 {
            self.progress_medium
        } else {
            self.progress_low
        }
    }

    pub fn button_style(&self, enabled: bool) -> Style {
        if enabled {
            self.button_enabled
        } else {
            self.button_disabled
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}
