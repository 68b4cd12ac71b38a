//! Runtime layer for the crime dashboard.
//!
//! Owns the dataset cache shared across sessions and the per-session period
//! selection state the UI drives.

pub mod data_manager;
pub mod session;

pub use dashboard_core as core;
pub use dashboard_data as data;
