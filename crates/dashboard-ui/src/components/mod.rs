//! Small line-oriented building blocks shared by the dashboard panels.

pub mod header;
pub mod indicators;
pub mod progress_bar;
