//! CSV loading and normalization for incident exports.
//!
//! Reads the delimited file once, normalizes header names, parses the
//! occurrence timestamp of every row and builds an immutable [`Dataset`].
//! Rows whose timestamp does not parse are dropped; the caller can see how
//! many through [`Dataset::dropped_row_count`].

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;
use std::sync::OnceLock;

use csv::StringRecord;
use dashboard_core::data_processors::{non_empty, parse_coordinate, parse_flag, TimestampProcessor};
use dashboard_core::error::DataLoadError;
use dashboard_core::models::{Dataset, IncidentRecord};
use regex::Regex;
use tracing::{debug, info, warn};

// ── Column names ──────────────────────────────────────────────────────────────

/// Accepted (normalized) header spellings per logical column, in preference order.
pub const TIMESTAMP_COLUMNS: &[&str] = &["DATE OF OCCURRENCE", "DATE"];
pub const CRIME_TYPE_COLUMNS: &[&str] = &["PRIMARY DESCRIPTION", "PRIMARY TYPE"];
pub const ARREST_COLUMNS: &[&str] = &["ARREST"];
pub const DOMESTIC_COLUMNS: &[&str] = &["DOMESTIC"];
pub const LOCATION_COLUMNS: &[&str] = &["LOCATION DESCRIPTION"];
pub const WARD_COLUMNS: &[&str] = &["WARD"];
pub const LATITUDE_COLUMNS: &[&str] = &["LATITUDE"];
pub const LONGITUDE_COLUMNS: &[&str] = &["LONGITUDE"];

// ── Public API ────────────────────────────────────────────────────────────────

/// Normalize a raw header: trim, collapse whitespace runs to one space,
/// uppercase.
///
/// ```
/// use dashboard_data::reader::normalize_header;
///
/// assert_eq!(normalize_header("  Date   of\tOccurrence "), "DATE OF OCCURRENCE");
/// ```
pub fn normalize_header(raw: &str) -> String {
    static WHITESPACE: OnceLock<Regex> = OnceLock::new();
    let re = WHITESPACE.get_or_init(|| Regex::new(r"\s+").expect("regex is valid"));
    let trimmed = raw.trim_start_matches('\u{feff}').trim();
    re.replace_all(trimmed, " ").to_uppercase()
}

/// Load and normalize the incident file at `path`.
pub fn load_dataset(path: &Path) -> Result<Dataset, DataLoadError> {
    let file = std::fs::File::open(path).map_err(|source| DataLoadError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    read_dataset(path, std::io::BufReader::new(file))
}

/// Parse incident CSV from any reader. `source` is only used for the dataset
/// label and error messages.
pub fn read_dataset<R: Read>(source: &Path, input: R) -> Result<Dataset, DataLoadError> {
    let csv_err = |source_err: csv::Error| DataLoadError::Csv {
        path: source.to_path_buf(),
        source: source_err,
    };

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(input);

    let headers = reader.headers().map_err(csv_err)?.clone();
    let columns = ColumnIndex::resolve(source, &headers)?;

    let mut records: Vec<IncidentRecord> = Vec::new();
    let mut raw_rows = 0usize;
    let mut dropped = 0usize;

    for row in reader.records() {
        let row = row.map_err(csv_err)?;
        raw_rows += 1;

        match columns.to_incident(&row) {
            Some(incident) => records.push(incident),
            None => {
                dropped += 1;
                debug!(
                    "Row {} in {}: unparsable occurrence timestamp {:?}",
                    raw_rows,
                    source.display(),
                    row.get(columns.occurred_at).unwrap_or("")
                );
            }
        }
    }

    if records.is_empty() {
        return Err(DataLoadError::NoValidRows {
            path: source.to_path_buf(),
            raw_rows,
        });
    }

    if dropped > 0 {
        warn!(
            "Dropped {} of {} rows in {} with unparsable timestamps",
            dropped,
            raw_rows,
            source.display()
        );
    }
    info!(
        "Loaded {} incidents from {}",
        records.len(),
        source.display()
    );

    Ok(Dataset::new(source, raw_rows, records))
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Positions of the logical columns within a CSV row.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ColumnIndex {
    occurred_at: usize,
    primary_description: usize,
    arrest: usize,
    domestic: usize,
    location_description: Option<usize>,
    ward: Option<usize>,
    latitude: Option<usize>,
    longitude: Option<usize>,
}

impl ColumnIndex {
    fn resolve(source: &Path, headers: &StringRecord) -> Result<Self, DataLoadError> {
        let mut positions: HashMap<String, Vec<usize>> = HashMap::new();
        for (i, raw) in headers.iter().enumerate() {
            positions.entry(normalize_header(raw)).or_default().push(i);
        }

        let mut used: Vec<&str> = Vec::new();
        let mut find = |aliases: &[&'static str]| -> Result<Option<usize>, DataLoadError> {
            let Some(name) = aliases.iter().copied().find(|a| positions.contains_key(*a)) else {
                return Ok(None);
            };
            used.push(name);
            match positions[name].as_slice() {
                [only] => Ok(Some(*only)),
                _ => Err(DataLoadError::DuplicateColumn {
                    path: source.to_path_buf(),
                    column: name.to_string(),
                }),
            }
        };
        let required = |found: Option<usize>, aliases: &[&str]| {
            found.ok_or_else(|| DataLoadError::MissingColumn {
                path: source.to_path_buf(),
                column: aliases[0].to_string(),
            })
        };

        let occurred_at = required(find(TIMESTAMP_COLUMNS)?, TIMESTAMP_COLUMNS)?;
        let primary_description = required(find(CRIME_TYPE_COLUMNS)?, CRIME_TYPE_COLUMNS)?;
        let arrest = required(find(ARREST_COLUMNS)?, ARREST_COLUMNS)?;
        let domestic = required(find(DOMESTIC_COLUMNS)?, DOMESTIC_COLUMNS)?;
        let location_description = find(LOCATION_COLUMNS)?;
        let ward = find(WARD_COLUMNS)?;
        let latitude = find(LATITUDE_COLUMNS)?;
        let longitude = find(LONGITUDE_COLUMNS)?;

        for (name, idx) in &positions {
            if idx.len() > 1 && !used.contains(&name.as_str()) {
                warn!(
                    "Ignoring duplicated column {:?} in {} ({} occurrences)",
                    name,
                    source.display(),
                    idx.len()
                );
            }
        }
        for (label, found) in [
            (LOCATION_COLUMNS[0], location_description),
            (WARD_COLUMNS[0], ward),
            (LATITUDE_COLUMNS[0], latitude),
            (LONGITUDE_COLUMNS[0], longitude),
        ] {
            if found.is_none() {
                warn!("Column {} not found in {}; treating as empty", label, source.display());
            }
        }

        Ok(Self {
            occurred_at,
            primary_description,
            arrest,
            domestic,
            location_description,
            ward,
            latitude,
            longitude,
        })
    }

    /// Build a record from `row`, or `None` when the timestamp does not parse.
    fn to_incident(&self, row: &StringRecord) -> Option<IncidentRecord> {
        let cell = |idx: usize| row.get(idx).unwrap_or("");
        let optional = |idx: Option<usize>| idx.map(&cell).unwrap_or("");

        let occurred_at = TimestampProcessor::parse_str(cell(self.occurred_at))?;

        Some(
            IncidentRecord::new(occurred_at, cell(self.primary_description).trim())
                .with_location(non_empty(optional(self.location_description)))
                .with_flags(parse_flag(cell(self.arrest)), parse_flag(cell(self.domestic)))
                .with_ward(non_empty(optional(self.ward)))
                .with_coordinates(
                    parse_coordinate(optional(self.latitude)),
                    parse_coordinate(optional(self.longitude)),
                ),
        )
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
