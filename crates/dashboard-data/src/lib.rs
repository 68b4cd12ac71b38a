//! Data layer for the crime dashboard.
//!
//! Loads and normalizes incident CSV files, resolves period selections into
//! date ranges, and aggregates a period into the report the UI renders.

pub mod aggregator;
pub mod analysis;
pub mod period;
pub mod reader;

pub use dashboard_core as core;
