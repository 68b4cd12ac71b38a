use crate::themes::Theme;
use dashboard_core::models::ViewMode;
use ratatui::text::{Line, Span};

/// Marker placed either side of the application title.
pub const ACCENT: &str = "■ ■ ■";

/// Dashboard header rendering four lines:
///
/// 1. Application title between accent markers.
/// 2. A 60-column `=` separator.
/// 3. View mode and period label in `[ mode | period ]` format.
/// 4. Key hints.
pub struct Header<'a> {
    pub view_mode: ViewMode,
    /// Period label, e.g. `"March 15, 2024"`.
    pub period: &'a str,
    pub theme: &'a Theme,
}

impl<'a> Header<'a> {
    pub fn new(view_mode: ViewMode, period: &'a str, theme: &'a Theme) -> Self {
        Self {
            view_mode,
            period,
            theme,
        }
    }

    /// Number of terminal rows [`Header::to_lines`] produces.
    pub const HEIGHT: u16 = 4;

    pub fn to_lines(&self) -> Vec<Line<'a>> {
        let separator = "=".repeat(60);

        vec![
            Line::from(vec![
                Span::styled(ACCENT, self.theme.header_accent),
                Span::styled(" CHICAGO CRIME DASHBOARD ", self.theme.header),
                Span::styled(ACCENT, self.theme.header_accent),
            ]),
            Line::from(Span::styled(separator, self.theme.separator)),
            Line::from(vec![
                Span::styled("[ ", self.theme.label),
                Span::styled(self.view_mode.to_string(), self.theme.value),
                Span::styled(" | ", self.theme.label),
                Span::styled(self.period.to_string(), self.theme.value),
                Span::styled(" ]", self.theme.label),
            ]),
            Line::from(Span::styled(
                "d/w/m: view   ←/→: previous/next period   q: quit",
                self.theme.dim,
            )),
        ]
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_header_line_count_matches_height() {
        let theme = Theme::dark();
        let lines = Header::new(ViewMode::Daily, "March 15, 2024", &theme).to_lines();
        assert_eq!(lines.len(), Header::HEIGHT as usize);
    }

    #[test]
    fn test_header_title() {
        let theme = Theme::dark();
        let lines = Header::new(ViewMode::Daily, "March 15, 2024", &theme).to_lines();
        let title = text(&lines[0]);
        assert!(title.contains("CHICAGO CRIME DASHBOARD"), "got: {title}");
        assert!(title.starts_with(ACCENT));
    }

    #[test]
    fn test_header_info_line() {
        let theme = Theme::light();
        let lines = Header::new(ViewMode::Weekly, "Mar 11 - Mar 17, 2024", &theme).to_lines();
        assert_eq!(text(&lines[2]), "[ Weekly | Mar 11 - Mar 17, 2024 ]");
    }

    #[test]
    fn test_header_separator_width() {
        let theme = Theme::dark();
        let lines = Header::new(ViewMode::Monthly, "2024-03", &theme).to_lines();
        assert_eq!(text(&lines[1]).chars().count(), 60);
    }
}
