//! Per-period aggregation for the dashboard.
//!
//! Given a resolved [`PeriodFilter`], [`PeriodAggregator::aggregate`] filters
//! the dataset to that range and computes every KPI and breakdown the view
//! layer renders. All "most common" rankings order by count descending and
//! break ties by first occurrence in source order.

use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::{NaiveDate, Weekday};
use dashboard_core::models::{Dataset, IncidentRecord, PeriodFilter, TimeGrouping};
use dashboard_core::time_utils::{hour_label, weekday_name, weekday_position, DayBand, WEEKDAY_ORDER};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;

// ── Defaults ──────────────────────────────────────────────────────────────────

/// Placeholder crime type for a period with no incidents.
pub const NOT_AVAILABLE: &str = "N/A";

pub const DEFAULT_TOP_N: usize = 10;

/// Crime types included in the arrest breakdown.
pub const DEFAULT_ARREST_TOP_K: usize = 8;

/// Upper bound on geo points handed to the view layer.
pub const GEO_SAMPLE_CAP: usize = 5000;

/// Fixed seed so geo samples are reproducible.
pub const GEO_SAMPLE_SEED: u64 = 42;

/// Tunables for [`PeriodAggregator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AggregationOptions {
    pub top_n: usize,
    pub arrest_top_k: usize,
    pub geo_sample_cap: usize,
    pub geo_seed: u64,
}

impl Default for AggregationOptions {
    fn default() -> Self {
        Self {
            top_n: DEFAULT_TOP_N,
            arrest_top_k: DEFAULT_ARREST_TOP_K,
            geo_sample_cap: GEO_SAMPLE_CAP,
            geo_seed: GEO_SAMPLE_SEED,
        }
    }
}

// ── Report types ──────────────────────────────────────────────────────────────

/// A time-series grouping key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Bucket {
    Hour(u32),
    Weekday(Weekday),
    Date(NaiveDate),
}

impl Bucket {
    /// Display label: `"08:00"`, `"Monday"` or `"2024-03-15"`.
    pub fn label(&self) -> String {
        match self {
            Bucket::Hour(h) => hour_label(*h),
            Bucket::Weekday(d) => weekday_name(*d).to_string(),
            Bucket::Date(d) => d.format("%Y-%m-%d").to_string(),
        }
    }
}

/// One point of the period's time series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeBucket {
    pub bucket: Bucket,
    pub label: String,
    pub count: usize,
}

/// A label with its incident count, as used by the top-N tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankedCount {
    pub label: String,
    pub count: usize,
}

/// Arrest figures for one crime type.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArrestBreakdown {
    pub crime_type: String,
    pub total: usize,
    pub arrested: usize,
    pub arrest_rate: f64,
}

/// Incident count for one hour of the day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HourlyBucket {
    pub hour: u32,
    pub band: DayBand,
    pub count: usize,
}

/// A geocoded incident for the density map.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
    pub crime_type: String,
}

/// Everything the view layer renders for one period.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodReport {
    pub filter: PeriodFilter,
    pub total_count: usize,
    pub arrest_count: usize,
    /// `arrest_count / total_count`, or `0.0` for an empty period.
    pub arrest_rate: f64,
    pub domestic_count: usize,
    /// `domestic_count / total_count`, or `0.0` for an empty period.
    pub domestic_rate: f64,
    /// Most common crime type, or [`NOT_AVAILABLE`].
    pub top_crime_type: String,
    pub unique_location_type_count: usize,
    /// Observed buckets only, in canonical order for the grouping.
    pub time_series: Vec<TimeBucket>,
    pub top_crime_types: Vec<RankedCount>,
    pub top_location_types: Vec<RankedCount>,
    pub arrest_by_type: Vec<ArrestBreakdown>,
    /// Always 24 entries, hour 0 first.
    pub hourly_pattern: Vec<HourlyBucket>,
    /// Incidents in the period with both coordinates present.
    pub geo_eligible_count: usize,
    /// All eligible points, or a seeded sample when above the cap.
    pub geo_points: Vec<GeoPoint>,
}

impl PeriodReport {
    pub fn is_empty(&self) -> bool {
        self.total_count == 0
    }
}

// ── PeriodAggregator ──────────────────────────────────────────────────────────

/// Computes [`PeriodReport`]s. Pure: equal inputs give equal reports.
#[derive(Debug, Clone, Default)]
pub struct PeriodAggregator {
    options: AggregationOptions,
}

impl PeriodAggregator {
    pub fn new(options: AggregationOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &AggregationOptions {
        &self.options
    }

    /// Filter `dataset` to `filter`'s range and aggregate it.
    pub fn aggregate(&self, dataset: &Dataset, filter: &PeriodFilter) -> PeriodReport {
        let records = filter_records(dataset, filter);
        let opts = &self.options;

        let total_count = records.len();
        let arrest_count = records.iter().filter(|r| r.arrest).count();
        let domestic_count = records.iter().filter(|r| r.domestic).count();
        let unique_location_type_count = records
            .iter()
            .filter_map(|r| r.location_description.as_deref())
            .collect::<HashSet<_>>()
            .len();
        let (geo_eligible_count, geo_points) =
            sample_geo_points(&records, opts.geo_sample_cap, opts.geo_seed);

        tracing::debug!(
            period = %filter.label,
            total = total_count,
            geo_eligible = geo_eligible_count,
            "aggregated period"
        );

        PeriodReport {
            filter: filter.clone(),
            total_count,
            arrest_count,
            arrest_rate: rate(arrest_count, total_count),
            domestic_count,
            domestic_rate: rate(domestic_count, total_count),
            top_crime_type: most_common_crime_type(&records),
            unique_location_type_count,
            time_series: time_series(&records, filter.grouping),
            top_crime_types: top_crime_types(&records, opts.top_n),
            top_location_types: top_location_types(&records, opts.top_n),
            arrest_by_type: arrest_by_type(&records, opts.arrest_top_k),
            hourly_pattern: hourly_pattern(&records),
            geo_eligible_count,
            geo_points,
        }
    }
}

// ── Building blocks ───────────────────────────────────────────────────────────

/// `part / total`, defined as `0.0` when `total` is zero.
pub fn rate(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64
    }
}

/// Records whose date lies in the filter's inclusive range, in source order.
pub fn filter_records<'a>(dataset: &'a Dataset, filter: &PeriodFilter) -> Vec<&'a IncidentRecord> {
    dataset
        .records()
        .iter()
        .filter(|r| filter.contains(r.date()))
        .collect()
}

/// Count records per key and rank them by count descending.
///
/// Ties keep first-seen order (the sort is stable over first-seen order).
/// Records whose key is `None` are skipped.
pub fn rank_by<'a>(
    records: &[&'a IncidentRecord],
    key: impl Fn(&'a IncidentRecord) -> Option<&'a str>,
) -> Vec<RankedCount> {
    let mut slots: HashMap<&'a str, usize> = HashMap::new();
    let mut counts: Vec<(&'a str, usize)> = Vec::new();

    for record in records {
        let Some(label) = key(record) else { continue };
        match slots.get(label) {
            Some(&slot) => counts[slot].1 += 1,
            None => {
                slots.insert(label, counts.len());
                counts.push((label, 1));
            }
        }
    }

    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
        .into_iter()
        .map(|(label, count)| RankedCount {
            label: label.to_string(),
            count,
        })
        .collect()
}

/// The `n` most common crime types. Blank crime types are not ranked.
pub fn top_crime_types(records: &[&IncidentRecord], n: usize) -> Vec<RankedCount> {
    let mut ranked = rank_by(records, IncidentRecord::crime_type);
    ranked.truncate(n);
    ranked
}

/// The `n` most common non-null location types.
pub fn top_location_types(records: &[&IncidentRecord], n: usize) -> Vec<RankedCount> {
    let mut ranked = rank_by(records, |r| r.location_description.as_deref());
    ranked.truncate(n);
    ranked
}

/// Mode of the crime type, or [`NOT_AVAILABLE`] when `records` is empty.
pub fn most_common_crime_type(records: &[&IncidentRecord]) -> String {
    top_crime_types(records, 1)
        .into_iter()
        .next()
        .map(|r| r.label)
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

/// Arrest totals for the `k` most common crime types, in rank order.
pub fn arrest_by_type(records: &[&IncidentRecord], k: usize) -> Vec<ArrestBreakdown> {
    top_crime_types(records, k)
        .into_iter()
        .map(|ranked| {
            let arrested = records
                .iter()
                .filter(|r| r.arrest && r.crime_type() == Some(ranked.label.as_str()))
                .count();
            ArrestBreakdown {
                arrest_rate: rate(arrested, ranked.count),
                total: ranked.count,
                arrested,
                crime_type: ranked.label,
            }
        })
        .collect()
}

/// Counts per observed bucket for `grouping`.
///
/// Hours ascend, weekdays run Monday to Sunday, dates ascend.
pub fn time_series(records: &[&IncidentRecord], grouping: TimeGrouping) -> Vec<TimeBucket> {
    match grouping {
        TimeGrouping::Hour => count_into(records, |r| r.hour())
            .into_iter()
            .map(|(hour, count)| to_time_bucket(Bucket::Hour(hour), count))
            .collect(),
        TimeGrouping::Date => count_into(records, |r| r.date())
            .into_iter()
            .map(|(date, count)| to_time_bucket(Bucket::Date(date), count))
            .collect(),
        TimeGrouping::DayOfWeek => count_into(records, |r| weekday_position(r.day_of_week()))
            .into_iter()
            .map(|(pos, count)| to_time_bucket(Bucket::Weekday(WEEKDAY_ORDER[pos]), count))
            .collect(),
    }
}

/// Dense 24-hour incident counts, each hour tagged with its [`DayBand`].
pub fn hourly_pattern(records: &[&IncidentRecord]) -> Vec<HourlyBucket> {
    let mut per_hour = [0usize; 24];
    for record in records {
        if let Some(slot) = per_hour.get_mut(record.hour() as usize) {
            *slot += 1;
        }
    }
    (0u32..24)
        .zip(per_hour)
        .map(|(hour, count)| HourlyBucket {
            hour,
            band: DayBand::for_hour(hour),
            count,
        })
        .collect()
}

/// Records with both coordinates, capped at `cap` by a seeded sample.
///
/// Returns `(eligible_count, points)`. When sampling, exactly `cap` distinct
/// records are drawn with `StdRng::seed_from_u64(seed)` and returned in
/// source order.
pub fn sample_geo_points(records: &[&IncidentRecord], cap: usize, seed: u64) -> (usize, Vec<GeoPoint>) {
    let eligible: Vec<(&IncidentRecord, (f64, f64))> = records
        .iter()
        .filter_map(|r| r.coordinates().map(|c| (*r, c)))
        .collect();

    let to_point = |(record, (latitude, longitude)): &(&IncidentRecord, (f64, f64))| GeoPoint {
        latitude: *latitude,
        longitude: *longitude,
        crime_type: record.primary_description.clone(),
    };

    if eligible.len() <= cap {
        return (eligible.len(), eligible.iter().map(to_point).collect());
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut picked = rand::seq::index::sample(&mut rng, eligible.len(), cap).into_vec();
    picked.sort_unstable();

    let points = picked.iter().map(|&i| to_point(&eligible[i])).collect();
    (eligible.len(), points)
}

fn count_into<K: Ord>(
    records: &[&IncidentRecord],
    key: impl Fn(&IncidentRecord) -> K,
) -> BTreeMap<K, usize> {
    let mut map = BTreeMap::new();
    for record in records {
        *map.entry(key(record)).or_insert(0) += 1;
    }
    map
}

fn to_time_bucket(bucket: Bucket, count: usize) -> TimeBucket {
    TimeBucket {
        label: bucket.label(),
        bucket,
        count,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::period::resolve_period;
    use chrono::NaiveDateTime;
    use dashboard_core::models::{PeriodSelection, YearMonth};

    fn ts(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M").unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn incident(stamp: &str, crime: &str, location: Option<&str>, arrest: bool) -> IncidentRecord {
        IncidentRecord::new(ts(stamp), crime)
            .with_location(location.map(str::to_string))
            .with_flags(arrest, false)
    }

    fn report_for(dataset: &Dataset, selection: PeriodSelection) -> PeriodReport {
        let filter = resolve_period(&selection, dataset).unwrap();
        PeriodAggregator::default().aggregate(dataset, &filter)
    }

    // ── Scenarios ─────────────────────────────────────────────────────────────

    #[test]
    fn test_all_blank_crime_types_report_not_available() {
        let records = vec![
            incident("2024-03-15 08:00", "", Some("STREET"), true),
            incident("2024-03-15 09:00", "", None, false),
        ];
        let ds = Dataset::new("t.csv", 2, records);
        let report = report_for(&ds, PeriodSelection::Daily(date(2024, 3, 15)));

        assert_eq!(report.total_count, 2);
        assert_eq!(report.arrest_count, 1);
        assert_eq!(report.top_crime_type, NOT_AVAILABLE);
        assert!(report.top_crime_types.is_empty());
        assert!(report.arrest_by_type.is_empty());
    }

    #[test]
    fn test_single_theft_daily() {
        let ds = Dataset::new("t.csv", 1, vec![incident("2024-03-15 08:00", "THEFT", None, false)]);
        let report = report_for(&ds, PeriodSelection::Daily(date(2024, 3, 15)));

        assert_eq!(report.total_count, 1);
        assert_eq!(report.arrest_count, 0);
        assert_eq!(report.arrest_rate, 0.0);
        assert_eq!(report.top_crime_type, "THEFT");
        assert_eq!(report.time_series.len(), 1);
        assert_eq!(report.time_series[0].bucket, Bucket::Hour(8));
        assert_eq!(report.time_series[0].label, "08:00");
    }

    #[test]
    fn test_empty_period_is_zero_guarded() {
        let ds = Dataset::new(
            "t.csv",
            2,
            vec![
                incident("2024-03-01 08:00", "THEFT", Some("STREET"), true),
                incident("2024-03-20 08:00", "THEFT", Some("STREET"), true),
            ],
        );
        // 2024-03-10 is inside the dataset range but has no incidents.
        let report = report_for(&ds, PeriodSelection::Daily(date(2024, 3, 10)));

        assert!(report.is_empty());
        assert_eq!(report.total_count, 0);
        assert_eq!(report.arrest_rate, 0.0);
        assert_eq!(report.domestic_rate, 0.0);
        assert!(!report.arrest_rate.is_nan());
        assert_eq!(report.top_crime_type, NOT_AVAILABLE);
        assert_eq!(report.unique_location_type_count, 0);
        assert!(report.time_series.is_empty());
        assert!(report.top_crime_types.is_empty());
        assert!(report.arrest_by_type.is_empty());
        assert_eq!(report.hourly_pattern.len(), 24);
        assert!(report.hourly_pattern.iter().all(|h| h.count == 0));
        assert_eq!(report.geo_eligible_count, 0);
    }

    #[test]
    fn test_kpis_and_rates() {
        let ds = Dataset::new(
            "t.csv",
            4,
            vec![
                incident("2024-03-15 08:00", "THEFT", Some("STREET"), true),
                incident("2024-03-15 09:00", "THEFT", Some("STREET"), false),
                incident("2024-03-15 10:00", "BATTERY", Some("APARTMENT"), false)
                    .with_flags(false, true),
                incident("2024-03-15 11:00", "ASSAULT", None, true),
            ],
        );
        let report = report_for(&ds, PeriodSelection::Daily(date(2024, 3, 15)));

        assert_eq!(report.total_count, 4);
        assert_eq!(report.arrest_count, 2);
        assert_eq!(report.arrest_rate, 0.5);
        assert_eq!(report.domestic_count, 1);
        assert_eq!(report.domestic_rate, 0.25);
        assert_eq!(report.unique_location_type_count, 2);
    }

    #[test]
    fn test_monthly_time_series_by_date() {
        let ds = Dataset::new(
            "t.csv",
            4,
            vec![
                incident("2024-03-20 08:00", "THEFT", None, false),
                incident("2024-03-02 08:00", "THEFT", None, false),
                incident("2024-03-20 22:00", "THEFT", None, false),
                incident("2024-04-01 08:00", "THEFT", None, false),
            ],
        );
        let report = report_for(&ds, PeriodSelection::Monthly(YearMonth::new(2024, 3).unwrap()));

        assert_eq!(report.total_count, 3);
        let series: Vec<(String, usize)> =
            report.time_series.iter().map(|b| (b.label.clone(), b.count)).collect();
        assert_eq!(
            series,
            vec![("2024-03-02".to_string(), 1), ("2024-03-20".to_string(), 2)]
        );
    }

    // ── Ordering ──────────────────────────────────────────────────────────────

    #[test]
    fn test_weekly_series_ordered_monday_to_sunday() {
        // Week of 2024-03-11 (Mon) .. 2024-03-17 (Sun), rows inserted Sunday first.
        let ds = Dataset::new(
            "t.csv",
            4,
            vec![
                incident("2024-03-17 08:00", "THEFT", None, false),
                incident("2024-03-14 08:00", "THEFT", None, false),
                incident("2024-03-11 08:00", "THEFT", None, false),
                incident("2024-03-17 09:00", "THEFT", None, false),
            ],
        );
        let report = report_for(&ds, PeriodSelection::Weekly(date(2024, 3, 13)));

        let labels: Vec<&str> = report.time_series.iter().map(|b| b.label.as_str()).collect();
        assert_eq!(labels, vec!["Monday", "Thursday", "Sunday"]);
        assert_eq!(report.time_series[2].count, 2);
    }

    #[test]
    fn test_rank_ties_broken_by_first_seen() {
        let records = [
            incident("2024-03-15 08:00", "BATTERY", None, false),
            incident("2024-03-15 09:00", "THEFT", None, false),
            incident("2024-03-15 10:00", "THEFT", None, false),
            incident("2024-03-15 11:00", "BATTERY", None, false),
            incident("2024-03-15 12:00", "ASSAULT", None, false),
        ];
        let refs: Vec<&IncidentRecord> = records.iter().collect();

        let ranked = top_crime_types(&refs, 10);
        let labels: Vec<&str> = ranked.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(labels, vec!["BATTERY", "THEFT", "ASSAULT"]);
        assert_eq!(most_common_crime_type(&refs), "BATTERY");
    }

    #[test]
    fn test_top_n_truncates_and_skips_missing_locations() {
        let records = [
            incident("2024-03-15 08:00", "A", Some("STREET"), false),
            incident("2024-03-15 08:00", "B", None, false),
            incident("2024-03-15 08:00", "C", Some("ALLEY"), false),
            incident("2024-03-15 08:00", "C", Some("STREET"), false),
        ];
        let refs: Vec<&IncidentRecord> = records.iter().collect();

        assert_eq!(top_crime_types(&refs, 2).len(), 2);
        let locations = top_location_types(&refs, 10);
        assert_eq!(
            locations,
            vec![
                RankedCount { label: "STREET".to_string(), count: 2 },
                RankedCount { label: "ALLEY".to_string(), count: 1 },
            ]
        );
    }

    #[test]
    fn test_arrest_by_type() {
        let records = [
            incident("2024-03-15 08:00", "THEFT", None, true),
            incident("2024-03-15 08:00", "THEFT", None, false),
            incident("2024-03-15 08:00", "THEFT", None, false),
            incident("2024-03-15 08:00", "NARCOTICS", None, true),
            incident("2024-03-15 08:00", "ARSON", None, false),
        ];
        let refs: Vec<&IncidentRecord> = records.iter().collect();

        let breakdown = arrest_by_type(&refs, 2);
        assert_eq!(breakdown.len(), 2);
        assert_eq!(breakdown[0].crime_type, "THEFT");
        assert_eq!((breakdown[0].total, breakdown[0].arrested), (3, 1));
        assert!((breakdown[0].arrest_rate - 1.0 / 3.0).abs() < 1e-12);
        assert_eq!(breakdown[1].crime_type, "NARCOTICS");
        assert_eq!(breakdown[1].arrest_rate, 1.0);
    }

    #[test]
    fn test_hourly_pattern_dense_with_bands() {
        let records = [
            incident("2024-03-15 03:00", "A", None, false),
            incident("2024-03-15 07:00", "A", None, false),
            incident("2024-03-15 07:30", "A", None, false),
            incident("2024-03-15 19:00", "A", None, false),
        ];
        let refs: Vec<&IncidentRecord> = records.iter().collect();

        let pattern = hourly_pattern(&refs);
        assert_eq!(pattern.len(), 24);
        assert_eq!(pattern[3].count, 1);
        assert_eq!(pattern[3].band, DayBand::Night);
        assert_eq!(pattern[7].count, 2);
        assert_eq!(pattern[7].band, DayBand::Morning);
        assert_eq!(pattern[12].band, DayBand::Afternoon);
        assert_eq!(pattern[19].band, DayBand::Evening);
        assert_eq!(pattern.iter().map(|h| h.count).sum::<usize>(), 4);
    }

    // ── Geo sampling ──────────────────────────────────────────────────────────

    fn geo_records(n: usize) -> Vec<IncidentRecord> {
        (0..n)
            .map(|i| {
                incident("2024-03-15 08:00", "THEFT", None, false)
                    .with_coordinates(Some(41.0 + i as f64 * 1e-4), Some(-87.0))
            })
            .collect()
    }

    #[test]
    fn test_geo_points_below_cap_returned_in_full() {
        let mut records = geo_records(3);
        records.push(incident("2024-03-15 08:00", "THEFT", None, false).with_coordinates(Some(41.0), None));
        let refs: Vec<&IncidentRecord> = records.iter().collect();

        let (eligible, points) = sample_geo_points(&refs, GEO_SAMPLE_CAP, GEO_SAMPLE_SEED);
        assert_eq!(eligible, 3);
        assert_eq!(points.len(), 3);
    }

    #[test]
    fn test_geo_sample_capped_and_reproducible() {
        let records = geo_records(5_200);
        let refs: Vec<&IncidentRecord> = records.iter().collect();

        let (eligible, first) = sample_geo_points(&refs, GEO_SAMPLE_CAP, GEO_SAMPLE_SEED);
        let (_, second) = sample_geo_points(&refs, GEO_SAMPLE_CAP, GEO_SAMPLE_SEED);

        assert_eq!(eligible, 5_200);
        assert_eq!(first.len(), GEO_SAMPLE_CAP);
        assert_eq!(first, second);
        // Source order is kept and no point is drawn twice.
        assert!(first.windows(2).all(|w| w[0].latitude < w[1].latitude));
    }

    #[test]
    fn test_geo_sample_small_cap() {
        let records = geo_records(50);
        let refs: Vec<&IncidentRecord> = records.iter().collect();
        let (eligible, points) = sample_geo_points(&refs, 10, 7);
        assert_eq!(eligible, 50);
        assert_eq!(points.len(), 10);
    }

    // ── Purity ────────────────────────────────────────────────────────────────

    #[test]
    fn test_aggregate_is_deterministic() {
        let mut records = geo_records(40);
        records.push(incident("2024-03-16 22:00", "BATTERY", Some("STREET"), true));
        let ds = Dataset::new("t.csv", records.len(), records);
        let filter = resolve_period(&PeriodSelection::Weekly(date(2024, 3, 15)), &ds).unwrap();
        let aggregator = PeriodAggregator::new(AggregationOptions {
            geo_sample_cap: 5,
            ..AggregationOptions::default()
        });

        let a = aggregator.aggregate(&ds, &filter);
        let b = aggregator.aggregate(&ds, &filter);
        assert_eq!(a, b);
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
        assert_eq!(a.geo_points.len(), 5);
    }

    #[test]
    fn test_rate_zero_guard() {
        assert_eq!(rate(0, 0), 0.0);
        assert_eq!(rate(3, 0), 0.0);
        assert_eq!(rate(1, 4), 0.25);
    }
}
