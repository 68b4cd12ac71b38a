use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike, Weekday};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::InvalidPeriodError;

// ── YearMonth ─────────────────────────────────────────────────────────────────

/// A calendar month bucket, displayed and parsed as `"YYYY-MM"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct YearMonth {
    year: i32,
    month: u32,
}

impl YearMonth {
    /// Returns `None` when `month` is not in `1..=12`.
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1)?;
        Some(Self { year, month })
    }

    /// The month containing `date`.
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// First calendar day of the month.
    pub fn first_day(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }

    /// Last calendar day of the month.
    pub fn last_day(&self) -> NaiveDate {
        let (next_year, next_month) = if self.month == 12 {
            (self.year + 1, 1)
        } else {
            (self.year, self.month + 1)
        };
        NaiveDate::from_ymd_opt(next_year, next_month, 1)
            .and_then(|d| d.pred_opt())
            .unwrap_or(NaiveDate::MAX)
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for YearMonth {
    type Err = InvalidPeriodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || InvalidPeriodError::MalformedMonth(s.to_string());
        let (year, month) = s.trim().split_once('-').ok_or_else(malformed)?;
        if year.len() != 4 || month.is_empty() || month.len() > 2 {
            return Err(malformed());
        }
        let year: i32 = year.parse().map_err(|_| malformed())?;
        let month: u32 = month.parse().map_err(|_| malformed())?;
        YearMonth::new(year, month).ok_or_else(malformed)
    }
}

impl Serialize for YearMonth {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for YearMonth {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

// ── IncidentRecord ────────────────────────────────────────────────────────────

/// Calendar fields derived from an occurrence timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CalendarFields {
    date: NaiveDate,
    hour: u32,
    day_of_week: Weekday,
    month: YearMonth,
}

impl CalendarFields {
    fn from_timestamp(ts: &NaiveDateTime) -> Self {
        let date = ts.date();
        Self {
            date,
            hour: ts.hour(),
            day_of_week: date.weekday(),
            month: YearMonth::of(date),
        }
    }
}

/// One crime report with a successfully parsed occurrence timestamp.
///
/// The timestamp and the calendar fields derived from it are fixed at
/// construction; only the descriptive columns are public.
#[derive(Debug, Clone, PartialEq)]
pub struct IncidentRecord {
    occurred_at: NaiveDateTime,
    calendar: CalendarFields,
    /// Crime type label.
    pub primary_description: String,
    /// Location category, e.g. `"STREET"`.
    pub location_description: Option<String>,
    pub arrest: bool,
    pub domestic: bool,
    /// Ward code as written in the source.
    pub ward: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl IncidentRecord {
    /// Create a record with no location, ward, coordinates or flags set.
    pub fn new(occurred_at: NaiveDateTime, primary_description: impl Into<String>) -> Self {
        Self {
            occurred_at,
            calendar: CalendarFields::from_timestamp(&occurred_at),
            primary_description: primary_description.into(),
            location_description: None,
            arrest: false,
            domestic: false,
            ward: None,
            latitude: None,
            longitude: None,
        }
    }

    pub fn with_location(mut self, location: Option<String>) -> Self {
        self.location_description = location;
        self
    }

    pub fn with_flags(mut self, arrest: bool, domestic: bool) -> Self {
        self.arrest = arrest;
        self.domestic = domestic;
        self
    }

    pub fn with_ward(mut self, ward: Option<String>) -> Self {
        self.ward = ward;
        self
    }

    pub fn with_coordinates(mut self, latitude: Option<f64>, longitude: Option<f64>) -> Self {
        self.latitude = latitude;
        self.longitude = longitude;
        self
    }

    pub fn occurred_at(&self) -> NaiveDateTime {
        self.occurred_at
    }

    pub fn date(&self) -> NaiveDate {
        self.calendar.date
    }

    /// Hour of day, 0–23.
    pub fn hour(&self) -> u32 {
        self.calendar.hour
    }

    pub fn day_of_week(&self) -> Weekday {
        self.calendar.day_of_week
    }

    pub fn month(&self) -> YearMonth {
        self.calendar.month
    }

    /// Crime type, or `None` when the source cell was blank.
    pub fn crime_type(&self) -> Option<&str> {
        Some(self.primary_description.as_str()).filter(|s| !s.is_empty())
    }

    /// `(latitude, longitude)` when both are present.
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        Some((self.latitude?, self.longitude?))
    }
}

// ── Dataset ───────────────────────────────────────────────────────────────────

/// The normalized incident table, in source-file order.
///
/// Immutable once built; shared between sessions behind an `Arc`.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    source: PathBuf,
    raw_row_count: usize,
    records: Vec<IncidentRecord>,
    date_range: Option<(NaiveDate, NaiveDate)>,
    months: BTreeSet<YearMonth>,
}

impl Dataset {
    /// `raw_row_count` is the number of data rows read before timestamp
    /// filtering; it is never smaller than `records.len()`.
    pub fn new(source: impl Into<PathBuf>, raw_row_count: usize, records: Vec<IncidentRecord>) -> Self {
        let date_range = records.iter().map(IncidentRecord::date).fold(None, |acc, d| match acc {
            None => Some((d, d)),
            Some((lo, hi)) => Some((lo.min(d), hi.max(d))),
        });
        let months = records.iter().map(IncidentRecord::month).collect();
        Self {
            source: source.into(),
            raw_row_count: raw_row_count.max(records.len()),
            records,
            date_range,
            months,
        }
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn records(&self) -> &[IncidentRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Data rows present in the file, including those dropped during load.
    pub fn raw_row_count(&self) -> usize {
        self.raw_row_count
    }

    /// Rows discarded because their timestamp did not parse.
    pub fn dropped_row_count(&self) -> usize {
        self.raw_row_count - self.records.len()
    }

    /// Earliest and latest incident dates, or `None` when empty.
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        self.date_range
    }

    /// Distinct months with at least one incident, newest first.
    pub fn months(&self) -> Vec<YearMonth> {
        self.months.iter().rev().copied().collect()
    }

    pub fn contains_month(&self, month: YearMonth) -> bool {
        self.months.contains(&month)
    }
}

// ── View modes & periods ──────────────────────────────────────────────────────

/// Reporting granularity chosen by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    Daily,
    Weekly,
    Monthly,
}

impl ViewMode {
    /// Which derived field the time series is grouped by in this mode.
    pub fn grouping(self) -> TimeGrouping {
        match self {
            ViewMode::Daily => TimeGrouping::Hour,
            ViewMode::Weekly => TimeGrouping::DayOfWeek,
            ViewMode::Monthly => TimeGrouping::Date,
        }
    }

    /// Lowercase identifier used on the command line and in saved settings.
    pub fn as_str(self) -> &'static str {
        match self {
            ViewMode::Daily => "daily",
            ViewMode::Weekly => "weekly",
            ViewMode::Monthly => "monthly",
        }
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ViewMode::Daily => "Daily",
            ViewMode::Weekly => "Weekly",
            ViewMode::Monthly => "Monthly",
        };
        f.write_str(name)
    }
}

impl FromStr for ViewMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "daily" | "day" => Ok(ViewMode::Daily),
            "weekly" | "week" => Ok(ViewMode::Weekly),
            "monthly" | "month" => Ok(ViewMode::Monthly),
            other => Err(format!("unknown view mode: {other}")),
        }
    }
}

/// Derived field that time-series buckets are keyed by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeGrouping {
    Hour,
    DayOfWeek,
    Date,
}

/// A period-selection request coming from the view layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "view_mode", content = "anchor", rename_all = "lowercase")]
pub enum PeriodSelection {
    /// A single day.
    Daily(NaiveDate),
    /// The Monday–Sunday week containing the anchor date.
    Weekly(NaiveDate),
    /// A whole calendar month.
    Monthly(YearMonth),
}

impl PeriodSelection {
    pub fn view_mode(&self) -> ViewMode {
        match self {
            PeriodSelection::Daily(_) => ViewMode::Daily,
            PeriodSelection::Weekly(_) => ViewMode::Weekly,
            PeriodSelection::Monthly(_) => ViewMode::Monthly,
        }
    }

    /// A representative date: the anchor, or the first of the month.
    pub fn anchor_date(&self) -> NaiveDate {
        match self {
            PeriodSelection::Daily(d) | PeriodSelection::Weekly(d) => *d,
            PeriodSelection::Monthly(m) => m.first_day(),
        }
    }
}

/// A resolved, inclusive date range plus its grouping key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodFilter {
    pub view_mode: ViewMode,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub grouping: TimeGrouping,
    /// Human-readable period label, e.g. `"Mar 11 - Mar 17, 2024"`.
    pub label: String,
}

impl PeriodFilter {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Number of calendar days covered, inclusive.
    pub fn day_count(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
