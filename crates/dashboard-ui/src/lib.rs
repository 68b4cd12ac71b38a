//! Terminal UI layer for the crime dashboard.
//!
//! Provides themes, line components, the period dashboard screen and the
//! application event loop built on top of [`ratatui`].

pub mod app;
pub mod components;
pub mod dashboard_view;
pub mod themes;

pub use dashboard_core as core;
