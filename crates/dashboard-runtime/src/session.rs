//! Per-user dashboard state: the current view mode and period.
//!
//! A [`DashboardSession`] owns nothing but its selection; the dataset is a
//! shared read-only [`Arc`] so any number of sessions can sit on one load.
//! Every state change goes through [`resolve_period`], and a rejected change
//! leaves the previous selection in place.

use std::sync::Arc;

use chrono::{Days, Months, NaiveDate};
use dashboard_core::error::InvalidPeriodError;
use dashboard_core::models::{Dataset, PeriodFilter, PeriodSelection, ViewMode, YearMonth};
use dashboard_data::aggregator::{AggregationOptions, PeriodAggregator, PeriodReport};
use dashboard_data::analysis::{summarize_dataset, DatasetSummary};
use dashboard_data::period::{default_selection, resolve_period};

// ── DashboardSession ──────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct DashboardSession {
    dataset: Arc<Dataset>,
    aggregator: PeriodAggregator,
    selection: PeriodSelection,
    filter: PeriodFilter,
}

impl DashboardSession {
    /// Open a session in daily view on the latest date in the data.
    pub fn new(dataset: Arc<Dataset>) -> Result<Self, InvalidPeriodError> {
        Self::with_options(dataset, AggregationOptions::default())
    }

    pub fn with_options(
        dataset: Arc<Dataset>,
        options: AggregationOptions,
    ) -> Result<Self, InvalidPeriodError> {
        let selection =
            default_selection(ViewMode::Daily, &dataset).ok_or(InvalidPeriodError::EmptyDataset)?;
        let filter = resolve_period(&selection, &dataset)?;
        Ok(Self {
            dataset,
            aggregator: PeriodAggregator::new(options),
            selection,
            filter,
        })
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn dataset(&self) -> &Arc<Dataset> {
        &self.dataset
    }

    pub fn selection(&self) -> PeriodSelection {
        self.selection
    }

    pub fn filter(&self) -> &PeriodFilter {
        &self.filter
    }

    pub fn view_mode(&self) -> ViewMode {
        self.selection.view_mode()
    }

    // ── State changes ─────────────────────────────────────────────────────

    /// Replace the current selection if it resolves against the dataset.
    pub fn select(&mut self, selection: PeriodSelection) -> Result<&PeriodFilter, InvalidPeriodError> {
        let filter = resolve_period(&selection, &self.dataset)?;
        tracing::debug!(period = %filter.label, "period selected");
        self.selection = selection;
        self.filter = filter;
        Ok(&self.filter)
    }

    /// Change the view mode while keeping the current anchor.
    ///
    /// Leaving monthly view anchors on the selected month's first date that
    /// lies inside the data. Entering monthly view uses the anchor's month
    /// when it has incidents and the newest month otherwise.
    pub fn switch_mode(&mut self, mode: ViewMode) -> Result<&PeriodFilter, InvalidPeriodError> {
        if mode == self.view_mode() {
            return Ok(&self.filter);
        }
        let anchor = self.clamped_anchor();
        let selection = match mode {
            ViewMode::Daily => PeriodSelection::Daily(anchor),
            ViewMode::Weekly => PeriodSelection::Weekly(anchor),
            ViewMode::Monthly => {
                let month = YearMonth::of(anchor);
                if self.dataset.contains_month(month) {
                    PeriodSelection::Monthly(month)
                } else {
                    default_selection(ViewMode::Monthly, &self.dataset)
                        .ok_or(InvalidPeriodError::EmptyDataset)?
                }
            }
        };
        self.select(selection)
    }

    /// Move `delta` periods forward (positive) or backward (negative).
    ///
    /// Daily and weekly views move by whole days and weeks. Monthly view
    /// moves between months that have incidents, skipping empty ones.
    pub fn step(&mut self, delta: i32) -> Result<&PeriodFilter, InvalidPeriodError> {
        let selection = match self.selection {
            PeriodSelection::Daily(anchor) => PeriodSelection::Daily(shift_days(anchor, i64::from(delta))),
            PeriodSelection::Weekly(anchor) => {
                PeriodSelection::Weekly(shift_days(anchor, i64::from(delta) * 7))
            }
            PeriodSelection::Monthly(month) => PeriodSelection::Monthly(self.step_month(month, delta)?),
        };
        self.select(selection)
    }

    // ── Outputs ───────────────────────────────────────────────────────────

    /// Aggregate the current period.
    pub fn report(&self) -> PeriodReport {
        self.aggregator.aggregate(&self.dataset, &self.filter)
    }

    pub fn summary(&self) -> DatasetSummary {
        summarize_dataset(&self.dataset)
    }

    // ── Private helpers ───────────────────────────────────────────────────

    fn clamped_anchor(&self) -> NaiveDate {
        let anchor = self.selection.anchor_date();
        match self.dataset.date_range() {
            Some((min, max)) => anchor.clamp(min, max),
            None => anchor,
        }
    }

    fn step_month(&self, month: YearMonth, delta: i32) -> Result<YearMonth, InvalidPeriodError> {
        let (min, max) = self.dataset.date_range().ok_or(InvalidPeriodError::EmptyDataset)?;
        let mut months = self.dataset.months();
        months.reverse();

        let target = months
            .iter()
            .position(|m| *m == month)
            .and_then(|pos| pos.checked_add_signed(delta as isize))
            .and_then(|pos| months.get(pos).copied());

        target.ok_or_else(|| InvalidPeriodError::AnchorOutOfRange {
            anchor: shift_months(month.first_day(), delta),
            min,
            max,
        })
    }
}

fn shift_days(date: NaiveDate, delta: i64) -> NaiveDate {
    let days = Days::new(delta.unsigned_abs());
    let shifted = if delta >= 0 {
        date.checked_add_days(days)
    } else {
        date.checked_sub_days(days)
    };
    shifted.unwrap_or(date)
}

fn shift_months(date: NaiveDate, delta: i32) -> NaiveDate {
    let months = Months::new(delta.unsigned_abs());
    let shifted = if delta >= 0 {
        date.checked_add_months(months)
    } else {
        date.checked_sub_months(months)
    };
    shifted.unwrap_or(date)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
