//! Period resolution: turns a view-mode selection into a concrete date range.

use chrono::NaiveDate;
use dashboard_core::error::InvalidPeriodError;
use dashboard_core::models::{Dataset, PeriodFilter, PeriodSelection, ViewMode};
use dashboard_core::time_utils::{month_bounds, week_bounds};

/// Resolve `selection` against the dataset's bounds.
///
/// Daily and weekly anchors must fall inside the dataset's date range and
/// monthly tokens must name a month present in the data. Out-of-range values
/// are rejected, never clamped.
pub fn resolve_period(
    selection: &PeriodSelection,
    dataset: &Dataset,
) -> Result<PeriodFilter, InvalidPeriodError> {
    let (min, max) = dataset.date_range().ok_or(InvalidPeriodError::EmptyDataset)?;
    let check_anchor = |anchor: NaiveDate| {
        if anchor < min || anchor > max {
            Err(InvalidPeriodError::AnchorOutOfRange { anchor, min, max })
        } else {
            Ok(anchor)
        }
    };

    let filter = match *selection {
        PeriodSelection::Daily(anchor) => {
            let day = check_anchor(anchor)?;
            PeriodFilter {
                view_mode: ViewMode::Daily,
                start: day,
                end: day,
                grouping: ViewMode::Daily.grouping(),
                label: day.format("%B %d, %Y").to_string(),
            }
        }
        PeriodSelection::Weekly(anchor) => {
            let (start, end) = week_bounds(check_anchor(anchor)?);
            PeriodFilter {
                view_mode: ViewMode::Weekly,
                start,
                end,
                grouping: ViewMode::Weekly.grouping(),
                label: format!("{} - {}", start.format("%b %d"), end.format("%b %d, %Y")),
            }
        }
        PeriodSelection::Monthly(month) => {
            if !dataset.contains_month(month) {
                return Err(InvalidPeriodError::UnknownMonth(month));
            }
            let (start, end) = month_bounds(month);
            PeriodFilter {
                view_mode: ViewMode::Monthly,
                start,
                end,
                grouping: ViewMode::Monthly.grouping(),
                label: month.to_string(),
            }
        }
    };

    Ok(filter)
}

/// The period the dashboard opens on for `mode`: the latest date for daily
/// and weekly views, the newest month for the monthly view.
pub fn default_selection(mode: ViewMode, dataset: &Dataset) -> Option<PeriodSelection> {
    let (_, max) = dataset.date_range()?;
    Some(match mode {
        ViewMode::Daily => PeriodSelection::Daily(max),
        ViewMode::Weekly => PeriodSelection::Weekly(max),
        ViewMode::Monthly => PeriodSelection::Monthly(*dataset.months().first()?),
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, NaiveDateTime, Weekday};
    use dashboard_core::models::{IncidentRecord, TimeGrouping, YearMonth};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn dataset(stamps: &[&str]) -> Dataset {
        let records = stamps
            .iter()
            .map(|s| {
                let ts = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M").unwrap();
                IncidentRecord::new(ts, "THEFT")
            })
            .collect();
        Dataset::new("test.csv", stamps.len(), records)
    }

    #[test]
    fn test_daily_range_is_single_day() {
        let ds = dataset(&["2024-03-01 10:00", "2024-03-15 08:00", "2024-03-31 23:00"]);
        let filter = resolve_period(&PeriodSelection::Daily(date(2024, 3, 15)), &ds).unwrap();

        assert_eq!(filter.start, date(2024, 3, 15));
        assert_eq!(filter.end, date(2024, 3, 15));
        assert_eq!(filter.grouping, TimeGrouping::Hour);
        assert_eq!(filter.label, "March 15, 2024");
    }

    #[test]
    fn test_weekly_from_wednesday_starts_monday() {
        let ds = dataset(&["2024-03-01 10:00", "2024-03-31 23:00"]);
        // 2024-03-13 is a Wednesday.
        let filter = resolve_period(&PeriodSelection::Weekly(date(2024, 3, 13)), &ds).unwrap();

        assert_eq!(filter.start, date(2024, 3, 11));
        assert_eq!(filter.start.weekday(), Weekday::Mon);
        assert_eq!(filter.end, date(2024, 3, 17));
        assert_eq!(filter.day_count(), 7);
        assert_eq!(filter.grouping, TimeGrouping::DayOfWeek);
        assert_eq!(filter.label, "Mar 11 - Mar 17, 2024");
    }

    #[test]
    fn test_weekly_may_extend_past_dataset_bounds() {
        // Anchor is the first day of data, a Friday; the week reaches back.
        let ds = dataset(&["2024-03-01 10:00", "2024-03-31 23:00"]);
        let filter = resolve_period(&PeriodSelection::Weekly(date(2024, 3, 1)), &ds).unwrap();
        assert_eq!(filter.start, date(2024, 2, 26));
        assert_eq!(filter.end, date(2024, 3, 3));
    }

    #[test]
    fn test_monthly_covers_full_calendar_month() {
        let ds = dataset(&["2024-02-10 10:00", "2024-02-20 23:00"]);
        let month = YearMonth::new(2024, 2).unwrap();
        let filter = resolve_period(&PeriodSelection::Monthly(month), &ds).unwrap();

        assert_eq!(filter.start, date(2024, 2, 1));
        assert_eq!(filter.end, date(2024, 2, 29));
        assert_eq!(filter.grouping, TimeGrouping::Date);
        assert_eq!(filter.label, "2024-02");
    }

    #[test]
    fn test_monthly_unknown_token_rejected() {
        let ds = dataset(&["2024-03-01 10:00"]);
        let month = YearMonth::new(2023, 7).unwrap();
        let err = resolve_period(&PeriodSelection::Monthly(month), &ds).unwrap_err();
        assert_eq!(err, InvalidPeriodError::UnknownMonth(month));
    }

    #[test]
    fn test_anchor_boundaries() {
        let ds = dataset(&["2024-03-01 10:00", "2024-03-31 23:00"]);

        assert!(resolve_period(&PeriodSelection::Daily(date(2024, 3, 1)), &ds).is_ok());
        assert!(resolve_period(&PeriodSelection::Daily(date(2024, 3, 31)), &ds).is_ok());

        let before = resolve_period(&PeriodSelection::Daily(date(2024, 2, 29)), &ds).unwrap_err();
        assert_eq!(
            before,
            InvalidPeriodError::AnchorOutOfRange {
                anchor: date(2024, 2, 29),
                min: date(2024, 3, 1),
                max: date(2024, 3, 31),
            }
        );
        let after = resolve_period(&PeriodSelection::Weekly(date(2024, 4, 1)), &ds);
        assert!(matches!(after, Err(InvalidPeriodError::AnchorOutOfRange { .. })));
    }

    #[test]
    fn test_empty_dataset_rejected() {
        let ds = Dataset::new("empty.csv", 0, Vec::new());
        let err = resolve_period(&PeriodSelection::Daily(date(2024, 3, 1)), &ds).unwrap_err();
        assert_eq!(err, InvalidPeriodError::EmptyDataset);
        assert!(default_selection(ViewMode::Daily, &ds).is_none());
    }

    #[test]
    fn test_default_selection_uses_latest() {
        let ds = dataset(&["2024-01-05 10:00", "2024-03-15 08:00", "2024-02-01 00:00"]);
        assert_eq!(
            default_selection(ViewMode::Daily, &ds),
            Some(PeriodSelection::Daily(date(2024, 3, 15)))
        );
        assert_eq!(
            default_selection(ViewMode::Monthly, &ds),
            Some(PeriodSelection::Monthly(YearMonth::new(2024, 3).unwrap()))
        );
    }
}
