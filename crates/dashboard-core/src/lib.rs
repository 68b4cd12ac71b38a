//! Shared building blocks for the crime dashboard.
//!
//! Error types, the incident data model, timestamp and cell parsing,
//! calendar helpers, display formatting and command-line settings.

pub mod data_processors;
pub mod error;
pub mod formatting;
pub mod models;
pub mod settings;
pub mod time_utils;
