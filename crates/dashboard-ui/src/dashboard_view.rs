//! Period dashboard screen.
//!
//! Lays out the header, KPI cards, charts, ranking tables and dataset
//! summary for one [`PeriodReport`]. Every panel is a free function taking
//! the frame, its area and the theme so it can be rendered and tested alone.

use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    symbols::Marker,
    text::{Line, Span, Text},
    widgets::{
        canvas::{Canvas, Points},
        Bar, BarChart, BarGroup, Block, Borders, Cell, Paragraph, Row, Table,
    },
    Frame,
};

use dashboard_core::formatting::{format_count, format_percent, truncate_label};
use dashboard_core::time_utils::DayBand;
use dashboard_data::aggregator::{
    ArrestBreakdown, Bucket, GeoPoint, HourlyBucket, PeriodReport, RankedCount, TimeBucket,
};
use dashboard_data::analysis::DatasetSummary;

use crate::components::header::Header;
use crate::components::indicators::{kpi_cards, CRIME_TYPE_LABEL_LIMIT};
use crate::components::progress_bar::{CountBar, RateBar};
use crate::themes::Theme;

/// Shown in place of the period panels when the period has no incidents.
pub const NO_DATA_MESSAGE: &str = "No crime data available for the selected period.";

/// Degrees of padding around the plotted points on the map.
const MAP_MARGIN: f64 = 0.01;

// ── Screen ────────────────────────────────────────────────────────────────────

/// Render the full dashboard for `report` into `area`.
///
/// `status` is the most recent navigation error, if any; otherwise the
/// status line shows the point count of the map.
pub fn render_dashboard(
    frame: &mut Frame,
    area: Rect,
    report: &PeriodReport,
    summary: &DatasetSummary,
    status: Option<&str>,
    theme: &Theme,
) {
    let [header_area, body_area, summary_area, status_area] = Layout::vertical([
        Constraint::Length(Header::HEIGHT),
        Constraint::Min(8),
        Constraint::Length(3),
        Constraint::Length(1),
    ])
    .areas(area);

    let header = Header::new(report.filter.view_mode, &report.filter.label, theme);
    frame.render_widget(Paragraph::new(Text::from(header.to_lines())), header_area);

    if report.is_empty() {
        render_no_data(frame, body_area, theme);
    } else {
        render_period_panels(frame, body_area, report, theme);
    }

    render_summary(frame, summary_area, summary, theme);
    render_status(frame, status_area, report, status, theme);
}

fn render_period_panels(frame: &mut Frame, area: Rect, report: &PeriodReport, theme: &Theme) {
    let [kpi_area, charts_area, tables_area] = Layout::vertical([
        Constraint::Length(4),
        Constraint::Percentage(50),
        Constraint::Percentage(50),
    ])
    .areas(area);

    render_kpis(frame, kpi_area, report, theme);

    let [series_area, map_area] =
        Layout::horizontal([Constraint::Percentage(55), Constraint::Percentage(45)]).areas(charts_area);
    render_time_series(frame, series_area, &report.time_series, theme);
    render_geo_map(frame, map_area, &report.geo_points, theme);

    let [crimes_area, locations_area, arrests_area, hourly_area] = Layout::horizontal([
        Constraint::Percentage(25),
        Constraint::Percentage(25),
        Constraint::Percentage(25),
        Constraint::Percentage(25),
    ])
    .areas(tables_area);
    render_ranking(frame, crimes_area, " Top Crime Types ", &report.top_crime_types, theme);
    render_ranking(frame, locations_area, " Top Locations ", &report.top_location_types, theme);
    render_arrest_table(frame, arrests_area, &report.arrest_by_type, theme);
    render_hourly_pattern(frame, hourly_area, &report.hourly_pattern, theme);
}

// ── Panels ────────────────────────────────────────────────────────────────────

/// Five KPI cards side by side.
pub fn render_kpis(frame: &mut Frame, area: Rect, report: &PeriodReport, theme: &Theme) {
    let cards = kpi_cards(report);
    let slots = Layout::horizontal(cards.iter().map(|_| Constraint::Ratio(1, cards.len() as u32))).split(area);

    for (card, slot) in cards.iter().zip(slots.iter()) {
        let paragraph = Paragraph::new(Text::from(card.to_lines(theme.value, theme)))
            .alignment(Alignment::Center)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(theme.table_border)
                    .title(Span::styled(format!(" {} ", card.title), theme.label)),
            );
        frame.render_widget(paragraph, *slot);
    }
}

/// Vertical bars, one per observed bucket.
pub fn render_time_series(frame: &mut Frame, area: Rect, series: &[TimeBucket], theme: &Theme) {
    let bars: Vec<Bar> = series
        .iter()
        .map(|b| {
            Bar::default()
                .value(b.count as u64)
                .label(Line::from(axis_label(&b.bucket)))
                .style(theme.chart_bar)
        })
        .collect();

    let chart = BarChart::default()
        .block(panel(" Crime Trend ", theme))
        .bar_width(bar_width(area.width, bars.len()))
        .bar_gap(1)
        .value_style(theme.value)
        .data(BarGroup::default().bars(&bars));
    frame.render_widget(chart, area);
}

/// Scatter of sampled incident locations, longitude across and latitude up.
pub fn render_geo_map(frame: &mut Frame, area: Rect, points: &[GeoPoint], theme: &Theme) {
    let Some((lon_bounds, lat_bounds)) = map_bounds(points) else {
        let empty = Paragraph::new(Span::styled("No location data for this period.", theme.dim))
            .alignment(Alignment::Center)
            .block(panel(" Crime Density ", theme));
        frame.render_widget(empty, area);
        return;
    };

    let coords: Vec<(f64, f64)> = points.iter().map(|p| (p.longitude, p.latitude)).collect();
    let color = theme.map_point;
    let canvas = Canvas::default()
        .block(panel(" Crime Density ", theme))
        .marker(Marker::Braille)
        .x_bounds(lon_bounds)
        .y_bounds(lat_bounds)
        .paint(move |ctx| {
            ctx.draw(&Points {
                coords: &coords,
                color,
            });
        });
    frame.render_widget(canvas, area);
}

/// Horizontal bars for a ranked label list, widest bar first.
pub fn render_ranking(frame: &mut Frame, area: Rect, title: &str, ranked: &[RankedCount], theme: &Theme) {
    let max = ranked.first().map_or(0, |r| r.count);
    let bar_width = area.width.saturating_sub(CRIME_TYPE_LABEL_LIMIT as u16 + 10).max(1);

    let lines: Vec<Line> = ranked
        .iter()
        .map(|r| {
            let label = format!(
                "{:<width$}",
                truncate_label(&r.label, CRIME_TYPE_LABEL_LIMIT),
                width = CRIME_TYPE_LABEL_LIMIT
            );
            CountBar::new(r.count, max, theme.chart_bar, theme)
                .width(bar_width)
                .to_line(label)
        })
        .collect();

    frame.render_widget(Paragraph::new(Text::from(lines)).block(panel(title, theme)), area);
}

/// Arrest totals and rate per crime type.
pub fn render_arrest_table(frame: &mut Frame, area: Rect, rows: &[ArrestBreakdown], theme: &Theme) {
    let header = Row::new(
        ["Crime Type", "Total", "Arrests", "Rate"]
            .iter()
            .map(|h| Cell::from(*h).style(theme.table_header)),
    );

    let body: Vec<Row> = rows
        .iter()
        .enumerate()
        .map(|(i, row)| {
            Row::new(vec![
                Cell::from(truncate_label(&row.crime_type, CRIME_TYPE_LABEL_LIMIT)),
                Cell::from(format_count(row.total)),
                Cell::from(format_count(row.arrested)),
                Cell::from(RateBar::new(row.arrest_rate, theme).width(6).to_line()),
            ])
            .style(theme.row_style(i))
        })
        .collect();

    let widths = [
        Constraint::Length(CRIME_TYPE_LABEL_LIMIT as u16),
        Constraint::Length(7),
        Constraint::Length(7),
        Constraint::Min(13),
    ];
    let table = Table::new(body, widths)
        .header(header)
        .block(panel(" Arrests by Crime Type ", theme))
        .style(theme.text);
    frame.render_widget(table, area);
}

/// 24 hourly bars coloured by part of the day.
pub fn render_hourly_pattern(frame: &mut Frame, area: Rect, pattern: &[HourlyBucket], theme: &Theme) {
    let bars: Vec<Bar> = pattern
        .iter()
        .map(|h| {
            let label = if h.hour % 6 == 0 { format!("{:02}", h.hour) } else { String::new() };
            Bar::default()
                .value(h.count as u64)
                .text_value(String::new())
                .label(Line::from(label))
                .style(theme.band_style(h.band))
        })
        .collect();

    let legend = Line::from(
        [DayBand::Night, DayBand::Morning, DayBand::Afternoon, DayBand::Evening]
            .into_iter()
            .flat_map(|band| {
                [
                    Span::styled("■ ", theme.band_style(band)),
                    Span::styled(format!("{} ", band.label()), theme.dim),
                ]
            })
            .collect::<Vec<_>>(),
    );

    let chart = BarChart::default()
        .block(panel(" 24-Hour Pattern ", theme).title_bottom(legend))
        .bar_width(1)
        .bar_gap(0)
        .data(BarGroup::default().bars(&bars));
    frame.render_widget(chart, area);
}

/// Dataset-wide figures, independent of the selected period.
pub fn render_summary(frame: &mut Frame, area: Rect, summary: &DatasetSummary, theme: &Theme) {
    let range = match (summary.first_date, summary.last_date) {
        (Some(first), Some(last)) => format!("{first} to {last}"),
        _ => "no dates".to_string(),
    };
    let fields = [
        ("Records", format!("{} ({} dropped)", format_count(summary.total_records), format_count(summary.dropped_rows))),
        ("Range", range),
        ("Crime types", format_count(summary.unique_crime_types)),
        ("Locations", format_count(summary.unique_location_types)),
        ("Wards", format_count(summary.wards_covered)),
        ("Arrest", format_percent(summary.arrest_rate, 1)),
        ("Domestic", format_percent(summary.domestic_rate, 1)),
        ("With GPS", format_count(summary.records_with_gps)),
    ];

    let mut spans = Vec::with_capacity(fields.len() * 3);
    for (i, (name, value)) in fields.into_iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" | ", theme.separator));
        }
        spans.push(Span::styled(format!("{name}: "), theme.label));
        spans.push(Span::styled(value, theme.text));
    }

    frame.render_widget(
        Paragraph::new(Line::from(spans)).block(panel(" Data Summary ", theme)),
        area,
    );
}

/// Placeholder for a period without incidents.
pub fn render_no_data(frame: &mut Frame, area: Rect, theme: &Theme) {
    let text = vec![
        Line::from(""),
        Line::from(Span::styled(NO_DATA_MESSAGE, theme.warning)),
        Line::from(""),
        Line::from(Span::styled(
            "Step to another period with ←/→ or switch view with d/w/m.",
            theme.dim,
        )),
    ];
    frame.render_widget(
        Paragraph::new(Text::from(text))
            .alignment(Alignment::Center)
            .block(panel(" Crime Dashboard ", theme)),
        area,
    );
}

fn render_status(frame: &mut Frame, area: Rect, report: &PeriodReport, status: Option<&str>, theme: &Theme) {
    let line = match status {
        Some(message) => Line::from(Span::styled(message.to_string(), theme.error)),
        None => Line::from(Span::styled(
            format!(
                "Showing {} of {} geocoded incidents on the map",
                format_count(report.geo_points.len()),
                format_count(report.geo_eligible_count)
            ),
            theme.dim,
        )),
    };
    frame.render_widget(Paragraph::new(line), area);
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn panel<'a>(title: &'a str, theme: &Theme) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(theme.table_border)
        .title(Span::styled(title, theme.header))
}

/// Compact x-axis label for a bucket.
pub fn axis_label(bucket: &Bucket) -> String {
    match bucket {
        Bucket::Hour(h) => format!("{h:02}"),
        Bucket::Weekday(_) => bucket.label().chars().take(3).collect(),
        Bucket::Date(d) => d.format("%d").to_string(),
    }
}

/// Widest bar that still fits `count` bars (plus gaps) inside `width`.
fn bar_width(width: u16, count: usize) -> u16 {
    if count == 0 {
        return 1;
    }
    let inner = width.saturating_sub(2) as usize;
    let per_bar = inner / count;
    per_bar.saturating_sub(1).clamp(1, 9) as u16
}

/// `([min_lon, max_lon], [min_lat, max_lat])` with a small margin, or
/// `None` when there are no points.
pub fn map_bounds(points: &[GeoPoint]) -> Option<([f64; 2], [f64; 2])> {
    let first = points.first()?;
    let init = (first.longitude, first.longitude, first.latitude, first.latitude);
    let (min_lon, max_lon, min_lat, max_lat) = points.iter().fold(init, |(a, b, c, d), p| {
        (a.min(p.longitude), b.max(p.longitude), c.min(p.latitude), d.max(p.latitude))
    });
    Some((
        [min_lon - MAP_MARGIN, max_lon + MAP_MARGIN],
        [min_lat - MAP_MARGIN, max_lat + MAP_MARGIN],
    ))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
