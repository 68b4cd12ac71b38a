use crate::themes::Theme;
use dashboard_core::formatting::{format_count, format_percent};
use ratatui::style::Style;
use ratatui::text::{Line, Span};

/// Configuration controlling visual appearance of a bar.
pub struct ProgressBarConfig {
    /// Total width in terminal columns of the bar portion (excluding label).
    pub width: u16,
    pub filled_char: char,
    pub empty_char: char,
}

impl Default for ProgressBarConfig {
    fn default() -> Self {
        Self {
            width: 20,
            filled_char: '\u{2588}', // █  FULL BLOCK
            empty_char: '\u{2591}',  // ░  LIGHT SHADE
        }
    }
}

fn bar_spans(fraction: f64, config: &ProgressBarConfig, filled: Style, empty: Style) -> [Span<'static>; 2] {
    let fraction = if fraction.is_finite() { fraction.clamp(0.0, 1.0) } else { 0.0 };
    let cells = (fraction * f64::from(config.width)).round() as u16;
    let rest = config.width.saturating_sub(cells);
    [
        Span::styled(
            std::iter::repeat(config.filled_char).take(cells as usize).collect::<String>(),
            filled,
        ),
        Span::styled(
            std::iter::repeat(config.empty_char).take(rest as usize).collect::<String>(),
            empty,
        ),
    ]
}

// ── RateBar ──────────────────────────────────────────────────────────────────

/// Horizontal bar for a share such as the arrest rate, followed by the
/// percentage.
pub struct RateBar<'a> {
    /// Fraction in `[0, 1]`; values outside are clamped when drawn.
    pub rate: f64,
    pub theme: &'a Theme,
    pub config: ProgressBarConfig,
}

impl<'a> RateBar<'a> {
    pub fn new(rate: f64, theme: &'a Theme) -> Self {
        Self {
            rate,
            theme,
            config: ProgressBarConfig::default(),
        }
    }

    pub fn width(mut self, width: u16) -> Self {
        self.config.width = width;
        self
    }

    pub fn to_line(&self) -> Line<'a> {
        let [filled, empty] = bar_spans(
            self.rate,
            &self.config,
            self.theme.bar_filled,
            self.theme.bar_empty,
        );
        Line::from(vec![
            filled,
            empty,
            Span::styled(format!(" {}", format_percent(self.rate, 1)), self.theme.label),
        ])
    }
}

// ── CountBar ─────────────────────────────────────────────────────────────────

/// Bar for a count relative to the largest count in its chart, with a
/// caller-chosen style.
pub struct CountBar<'a> {
    pub count: usize,
    pub max: usize,
    pub style: Style,
    pub theme: &'a Theme,
    pub config: ProgressBarConfig,
}

impl<'a> CountBar<'a> {
    pub fn new(count: usize, max: usize, style: Style, theme: &'a Theme) -> Self {
        Self {
            count,
            max,
            style,
            theme,
            config: ProgressBarConfig::default(),
        }
    }

    pub fn width(mut self, width: u16) -> Self {
        self.config.width = width;
        self
    }

    pub fn fraction(&self) -> f64 {
        if self.max == 0 {
            0.0
        } else {
            self.count as f64 / self.max as f64
        }
    }

    pub fn to_line(&self, label: String) -> Line<'a> {
        let [filled, empty] = bar_spans(self.fraction(), &self.config, self.style, self.theme.bar_empty);
        Line::from(vec![
            Span::styled(label, self.theme.label),
            Span::raw(" "),
            filled,
            empty,
            Span::styled(format!(" {}", format_count(self.count)), self.theme.text),
        ])
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
