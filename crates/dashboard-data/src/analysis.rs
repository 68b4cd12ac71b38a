//! Dataset-wide summary shown beneath the per-period panels.

use std::collections::HashSet;

use chrono::NaiveDate;
use dashboard_core::models::Dataset;
use serde::Serialize;

use crate::aggregator::rate;

/// Statistics over the whole loaded dataset, independent of any period.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetSummary {
    /// Records that survived normalization.
    pub total_records: usize,
    /// Data rows read from the file, before any were dropped.
    pub raw_rows: usize,
    pub dropped_rows: usize,
    pub first_date: Option<NaiveDate>,
    pub last_date: Option<NaiveDate>,
    pub unique_crime_types: usize,
    pub unique_location_types: usize,
    pub wards_covered: usize,
    pub arrest_rate: f64,
    pub domestic_rate: f64,
    /// Records with a latitude, whether or not longitude is present.
    pub records_with_gps: usize,
}

/// Summarize `dataset`.
pub fn summarize_dataset(dataset: &Dataset) -> DatasetSummary {
    let records = dataset.records();
    let total = records.len();

    let mut crime_types = HashSet::new();
    let mut location_types = HashSet::new();
    let mut wards = HashSet::new();
    let mut arrests = 0;
    let mut domestic = 0;
    let mut with_gps = 0;

    for record in records {
        if let Some(crime_type) = record.crime_type() {
            crime_types.insert(crime_type);
        }
        if let Some(location) = record.location_description.as_deref() {
            location_types.insert(location);
        }
        if let Some(ward) = record.ward.as_deref() {
            wards.insert(ward);
        }
        arrests += usize::from(record.arrest);
        domestic += usize::from(record.domestic);
        with_gps += usize::from(record.latitude.is_some());
    }

    let (first_date, last_date) = dataset.date_range().unzip();

    DatasetSummary {
        total_records: total,
        raw_rows: dataset.raw_row_count(),
        dropped_rows: dataset.dropped_row_count(),
        first_date,
        last_date,
        unique_crime_types: crime_types.len(),
        unique_location_types: location_types.len(),
        wards_covered: wards.len(),
        arrest_rate: rate(arrests, total),
        domestic_rate: rate(domestic, total),
        records_with_gps: with_gps,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
