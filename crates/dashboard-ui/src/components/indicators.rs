use crate::themes::Theme;
use dashboard_core::formatting::{format_count, format_percent, truncate_label};
use dashboard_data::aggregator::PeriodReport;
use ratatui::style::Style;
use ratatui::text::{Line, Span};

/// Crime type labels this many columns or wider are shortened on the card.
pub const CRIME_TYPE_LABEL_LIMIT: usize = 15;

// ── KpiCard ──────────────────────────────────────────────────────────────────

/// A single headline metric: a title, a prominent value and an optional
/// detail line underneath.
#[derive(Debug, Clone, PartialEq)]
pub struct KpiCard {
    pub title: &'static str,
    pub value: String,
    pub detail: Option<String>,
}

impl KpiCard {
    pub fn new(title: &'static str, value: impl Into<String>) -> Self {
        Self {
            title,
            value: value.into(),
            detail: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// Value line followed by the detail line (blank when absent).
    pub fn to_lines<'a>(&self, value_style: Style, theme: &Theme) -> Vec<Line<'a>> {
        vec![
            Line::from(Span::styled(self.value.clone(), value_style)),
            Line::from(Span::styled(self.detail.clone().unwrap_or_default(), theme.dim)),
        ]
    }
}

/// The five headline cards for a period, left to right.
pub fn kpi_cards(report: &PeriodReport) -> Vec<KpiCard> {
    vec![
        KpiCard::new("Total Crimes", format_count(report.total_count)),
        KpiCard::new("Arrests Made", format_count(report.arrest_count))
            .with_detail(format!("{} arrest rate", format_percent(report.arrest_rate, 1))),
        KpiCard::new("Domestic Cases", format_count(report.domestic_count))
            .with_detail(format!("{} of total", format_percent(report.domestic_rate, 1))),
        KpiCard::new(
            "Top Crime Type",
            truncate_label(&report.top_crime_type, CRIME_TYPE_LABEL_LIMIT),
        ),
        KpiCard::new("Location Types", format_count(report.unique_location_type_count)),
    ]
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};
    use dashboard_core::models::{Dataset, IncidentRecord, PeriodSelection};
    use dashboard_data::aggregator::PeriodAggregator;
    use dashboard_data::period::resolve_period;

    fn report(crimes: &[(&str, bool)]) -> PeriodReport {
        let ts = NaiveDateTime::parse_from_str("2024-03-15 08:00", "%Y-%m-%d %H:%M").unwrap();
        let records = crimes
            .iter()
            .map(|(c, arrest)| IncidentRecord::new(ts, *c).with_flags(*arrest, false))
            .collect::<Vec<_>>();
        let ds = Dataset::new("t.csv", records.len(), records);
        let day = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        let filter = resolve_period(&PeriodSelection::Daily(day), &ds).unwrap();
        PeriodAggregator::default().aggregate(&ds, &filter)
    }

    #[test]
    fn test_five_cards_in_order() {
        let cards = kpi_cards(&report(&[("THEFT", true), ("THEFT", false)]));
        let titles: Vec<&str> = cards.iter().map(|c| c.title).collect();
        assert_eq!(
            titles,
            vec!["Total Crimes", "Arrests Made", "Domestic Cases", "Top Crime Type", "Location Types"]
        );
        assert_eq!(cards[0].value, "2");
        assert_eq!(cards[1].detail.as_deref(), Some("50.0% arrest rate"));
        assert_eq!(cards[3].value, "THEFT");
    }

    #[test]
    fn test_long_crime_type_is_truncated() {
        let cards = kpi_cards(&report(&[("DECEPTIVE PRACTICE", false)]));
        assert_eq!(cards[3].value, "DECEPTIVE PR...");
    }

    #[test]
    fn test_card_lines() {
        let theme = Theme::dark();
        let card = KpiCard::new("Total Crimes", "1,234");
        let lines = card.to_lines(theme.value, &theme);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].spans[0].content, "1,234");
        assert_eq!(lines[1].spans[0].content, "");
    }
}
