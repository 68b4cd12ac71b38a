//! Calendar helpers shared by the loader, the period resolver and the UI.

use chrono::{Datelike, Days, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::models::YearMonth;

// ── Weekdays ──────────────────────────────────────────────────────────────────

/// Canonical display order for weekday buckets. Weeks begin on Monday.
pub const WEEKDAY_ORDER: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Full English weekday name, e.g. `"Monday"`.
pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Position of `day` within [`WEEKDAY_ORDER`] (Monday = 0).
pub fn weekday_position(day: Weekday) -> usize {
    day.num_days_from_monday() as usize
}

/// Monday of the week containing `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    let offset = u64::from(date.weekday().num_days_from_monday());
    date.checked_sub_days(Days::new(offset)).unwrap_or(date)
}

/// Inclusive `(monday, sunday)` bounds of the week containing `date`.
pub fn week_bounds(date: NaiveDate) -> (NaiveDate, NaiveDate) {
    let start = week_start(date);
    let end = start.checked_add_days(Days::new(6)).unwrap_or(start);
    (start, end)
}

/// Inclusive `(first, last)` day of a calendar month.
pub fn month_bounds(month: YearMonth) -> (NaiveDate, NaiveDate) {
    (month.first_day(), month.last_day())
}

// ── Hour bands ────────────────────────────────────────────────────────────────

/// Coarse part of the day an hour falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DayBand {
    /// 00:00 – 05:59
    Night,
    /// 06:00 – 11:59
    Morning,
    /// 12:00 – 17:59
    Afternoon,
    /// 18:00 – 23:59
    Evening,
}

impl DayBand {
    /// Map an hour of day (0–23) to its band. Hours above 23 count as evening.
    pub fn for_hour(hour: u32) -> Self {
        match hour {
            0..=5 => DayBand::Night,
            6..=11 => DayBand::Morning,
            12..=17 => DayBand::Afternoon,
            _ => DayBand::Evening,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DayBand::Night => "Night",
            DayBand::Morning => "Morning",
            DayBand::Afternoon => "Afternoon",
            DayBand::Evening => "Evening",
        }
    }
}

/// `"08:00"` style label for an hour bucket.
pub fn hour_label(hour: u32) -> String {
    format!("{:02}:00", hour)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_weekday_order_starts_monday_ends_sunday() {
        assert_eq!(WEEKDAY_ORDER[0], Weekday::Mon);
        assert_eq!(WEEKDAY_ORDER[6], Weekday::Sun);
        for (i, day) in WEEKDAY_ORDER.iter().enumerate() {
            assert_eq!(weekday_position(*day), i);
        }
    }

    #[test]
    fn test_weekday_names() {
        let names: Vec<&str> = WEEKDAY_ORDER.iter().map(|d| weekday_name(*d)).collect();
        assert_eq!(
            names,
            vec!["Monday", "Tuesday", "Wednesday", "Thursday", "Friday", "Saturday", "Sunday"]
        );
    }

    #[test]
    fn test_week_start_from_wednesday() {
        // 2024-03-13 is a Wednesday.
        assert_eq!(week_start(date(2024, 3, 13)), date(2024, 3, 11));
    }

    #[test]
    fn test_week_start_monday_is_identity() {
        assert_eq!(week_start(date(2024, 3, 11)), date(2024, 3, 11));
    }

    #[test]
    fn test_week_bounds_from_sunday_crosses_month() {
        // 2024-03-03 is a Sunday; its week starts in February.
        let (start, end) = week_bounds(date(2024, 3, 3));
        assert_eq!(start, date(2024, 2, 26));
        assert_eq!(end, date(2024, 3, 3));
    }

    #[test]
    fn test_month_bounds_leap_february() {
        let (first, last) = month_bounds(YearMonth::new(2024, 2).unwrap());
        assert_eq!(first, date(2024, 2, 1));
        assert_eq!(last, date(2024, 2, 29));
    }

    #[test]
    fn test_day_band_edges() {
        assert_eq!(DayBand::for_hour(0), DayBand::Night);
        assert_eq!(DayBand::for_hour(5), DayBand::Night);
        assert_eq!(DayBand::for_hour(6), DayBand::Morning);
        assert_eq!(DayBand::for_hour(11), DayBand::Morning);
        assert_eq!(DayBand::for_hour(12), DayBand::Afternoon);
        assert_eq!(DayBand::for_hour(17), DayBand::Afternoon);
        assert_eq!(DayBand::for_hour(18), DayBand::Evening);
        assert_eq!(DayBand::for_hour(23), DayBand::Evening);
    }

    #[test]
    fn test_hour_label_zero_padded() {
        assert_eq!(hour_label(0), "00:00");
        assert_eq!(hour_label(8), "08:00");
        assert_eq!(hour_label(23), "23:00");
    }
}
