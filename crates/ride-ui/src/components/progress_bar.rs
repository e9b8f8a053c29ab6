use crate::themes::Theme;
use ratatui::text::{Line, Span};

/// Configuration controlling visual appearance of a progress bar.
pub struct ProgressBarConfig {
    /// Width in terminal columns of the bar portion (excluding label).
    pub width: u16,
    pub filled_char: char,
    pub empty_char: char,
    /// Whether to append a percentage figure after the bar.
    pub show_percentage: bool,
}

impl Default for ProgressBarConfig {
    fn default() -> Self {
        Self {
            width: 40,
            filled_char: '\u{2588}', // █  FULL BLOCK
            empty_char: '\u{2591}',  // ░  LIGHT SHADE
            show_percentage: true,
        }
    }
}

// ── RideProgressBar ──────────────────────────────────────────────────────────

/// Horizontal bar showing how far a ride is towards its ceiling.
pub struct RideProgressBar<'a> {
    /// Progress percentage, clamped to `[0.0, 100.0]`.
    pub percentage: f64,
    pub theme: &'a Theme,
    pub config: ProgressBarConfig,
}

impl<'a> RideProgressBar<'a> {
    pub fn new(percentage: f64, theme: &'a Theme) -> Self {
        Self {
            percentage: percentage.clamp(0.0, 100.0),
            theme,
            config: ProgressBarConfig::default(),
        }
    }

    pub fn with_width(mut self, width: u16) -> Self {
        self.config.width = width;
        self
    }

    /// Number of filled cells for the current percentage.
    pub fn filled_cells(&self) -> u16 {
        ((self.percentage / 100.0) * self.config.width as f64) as u16
    }

    pub fn to_line(&self) -> Line<'a> {
        let filled = self.filled_cells();
        let empty = self.config.width.saturating_sub(filled);

        let filled_str = self.config.filled_char.to_string().repeat(filled as usize);
        let empty_str = self.config.empty_char.to_string().repeat(empty as usize);

        let mut spans = vec![
            Span::styled(filled_str, self.theme.progress_style(self.percentage)),
            Span::styled(empty_str, self.theme.progress_empty),
        ];
        if self.config.show_percentage {
            spans.push(Span::styled(
                format!(" {:>5.1}%", self.percentage),
                self.theme.progress_label,
            ));
        }
        Line::from(spans)
    }
}
