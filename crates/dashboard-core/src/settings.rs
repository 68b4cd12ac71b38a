use chrono::NaiveDate;
use clap::{CommandFactory, Parser};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::DashboardError;
use crate::models::{PeriodSelection, ViewMode, YearMonth};

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Period analytics dashboard for crime-incident exports
#[derive(Parser, Debug, Clone)]
#[command(
    name = "crime-dashboard",
    about = "Period analytics dashboard for crime-incident exports",
    version
)]
pub struct Settings {
    /// Incident CSV file (auto-discovered if not specified)
    #[arg(long, env = "CRIME_DASHBOARD_DATA")]
    pub data_file: Option<PathBuf>,

    /// View mode
    #[arg(long, default_value = "daily", value_parser = ["daily", "weekly", "monthly"])]
    pub view: String,

    /// Anchor date for daily and weekly views (YYYY-MM-DD, defaults to the latest date)
    #[arg(long, value_parser = parse_date, conflicts_with = "month")]
    pub date: Option<NaiveDate>,

    /// Month for the monthly view (YYYY-MM, defaults to the latest month)
    #[arg(long)]
    pub month: Option<String>,

    /// Number of rows in the top crime type / location tables
    #[arg(long, default_value = "10", value_parser = clap::value_parser!(u32).range(1..=50))]
    pub top_n: u32,

    /// Output format
    #[arg(long, default_value = "tui", value_parser = ["tui", "json"])]
    pub output: String,

    /// Display theme
    #[arg(long, default_value = "auto", value_parser = ["light", "dark", "classic", "auto"])]
    pub theme: String,

    /// Logging level
    #[arg(long, default_value = "INFO", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR", "CRITICAL"])]
    pub log_level: String,

    /// Log file path
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Clear saved configuration
    #[arg(long)]
    pub clear: bool,
}

fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|e| format!("expected YYYY-MM-DD: {e}"))
}

// ── LastUsedParams ─────────────────────────────────────────────────────────────

/// Persisted last-used parameters saved to `~/.crime-dashboard/last_used.json`.
#[derive(Debug, Serialize, Deserialize, Default, Clone)]
pub struct LastUsedParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_file: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub view: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_n: Option<u32>,
}

impl LastUsedParams {
    /// Return the default path to the persisted config file.
    pub fn config_path() -> PathBuf {
        Self::config_path_in(&dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
    }

    /// Return the config path rooted at `base_dir`.
    pub fn config_path_in(base_dir: &std::path::Path) -> PathBuf {
        base_dir.join(".crime-dashboard").join("last_used.json")
    }

    /// Load persisted params from an explicit path.
    /// Returns `Default` when the file is absent or cannot be parsed.
    pub fn load_from(path: &std::path::Path) -> Self {
        let Ok(content) = std::fs::read_to_string(path) else {
            return Self::default();
        };
        serde_json::from_str(&content).unwrap_or_default()
    }

    /// Write params to `path` via a temp file and rename, creating parent
    /// directories if needed.
    pub fn save_to(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;

        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, &json)?;
        std::fs::rename(&tmp, path)?;

        Ok(())
    }

    /// Delete the config file at `path` if it exists.
    pub fn clear_at(path: &std::path::Path) -> Result<(), std::io::Error> {
        if path.exists() {
            std::fs::remove_file(path)?;
        }
        Ok(())
    }
}

// ── Settings impl ──────────────────────────────────────────────────────────────

impl Settings {
    /// Parse CLI arguments, fill unset values from the last run, and persist
    /// the result.
    pub fn load_with_last_used() -> Self {
        Self::load_with_last_used_impl(
            std::env::args_os().collect(),
            &LastUsedParams::config_path(),
        )
    }

    /// Same as [`Settings::load_with_last_used`] with explicit arguments and
    /// config path.
    pub fn load_with_last_used_impl(
        args: Vec<std::ffi::OsString>,
        config_path: &std::path::Path,
    ) -> Self {
        let matches = Settings::command().get_matches_from(args.clone());
        let mut settings = Settings::parse_from(args);

        if settings.clear {
            if let Err(e) = LastUsedParams::clear_at(config_path) {
                tracing::warn!(error = %e, "could not clear saved settings");
            }
            if !is_arg_explicitly_set(&matches, "view") {
                settings.align_view_with_anchor();
            }
            return Self::apply_debug(settings);
        }

        let last = LastUsedParams::load_from(config_path);

        // CLI always wins; the anchor date and month are never persisted.
        if !is_arg_explicitly_set(&matches, "data_file") && settings.data_file.is_none() {
            settings.data_file = last.data_file;
        }
        if !is_arg_explicitly_set(&matches, "view") {
            if let Some(v) = last.view {
                settings.view = v;
            }
            settings.align_view_with_anchor();
        }
        if !is_arg_explicitly_set(&matches, "theme") {
            if let Some(v) = last.theme {
                settings.theme = v;
            }
        }
        if !is_arg_explicitly_set(&matches, "top_n") {
            if let Some(v) = last.top_n {
                settings.top_n = v;
            }
        }

        settings = Self::apply_debug(settings);

        if let Err(e) = LastUsedParams::from(&settings).save_to(config_path) {
            tracing::warn!(error = %e, "could not persist settings");
        }

        settings
    }

    /// Parsed view mode; unrecognised persisted values fall back to daily.
    pub fn view_mode(&self) -> ViewMode {
        self.view.parse().unwrap_or(ViewMode::Daily)
    }

    /// The period requested on the command line, if any.
    ///
    /// `None` means "use the session default" (latest date or month). An
    /// anchor that does not belong to the view mode is a configuration error.
    pub fn requested_period(&self) -> Result<Option<PeriodSelection>, DashboardError> {
        let selection = match (self.view_mode(), self.date, self.month.as_deref()) {
            (ViewMode::Daily, date, None) => date.map(PeriodSelection::Daily),
            (ViewMode::Weekly, date, None) => date.map(PeriodSelection::Weekly),
            (ViewMode::Monthly, None, token) => match token {
                Some(token) => Some(PeriodSelection::Monthly(token.parse::<YearMonth>()?)),
                None => None,
            },
            (ViewMode::Monthly, Some(_), _) => {
                return Err(DashboardError::Config("--date needs --view daily or weekly".to_string()))
            }
            (_, _, Some(_)) => {
                return Err(DashboardError::Config("--month needs --view monthly".to_string()))
            }
        };
        Ok(selection)
    }

    /// Let an explicit `--date` or `--month` pick the view when `--view`
    /// was not given on the command line.
    fn align_view_with_anchor(&mut self) {
        if self.month.is_some() {
            self.view = "monthly".to_string();
        } else if self.date.is_some() && self.view_mode() == ViewMode::Monthly {
            self.view = "daily".to_string();
        }
    }

    fn apply_debug(mut settings: Settings) -> Settings {
        if settings.debug {
            settings.log_level = "DEBUG".to_string();
        }
        settings
    }
}

// ── Conversion ─────────────────────────────────────────────────────────────────

impl From<&Settings> for LastUsedParams {
    fn from(s: &Settings) -> Self {
        LastUsedParams {
            data_file: s.data_file.clone(),
            view: Some(s.view.clone()),
            theme: Some(s.theme.clone()),
            top_n: Some(s.top_n),
        }
    }
}

/// Returns `true` when `name` was supplied explicitly on the command line.
///
/// clap keys arguments by field name (underscores), not by flag spelling.
fn is_arg_explicitly_set(matches: &clap::ArgMatches, name: &str) -> bool {
    matches.value_source(name) == Some(clap::parser::ValueSource::CommandLine)
}

// ── Tests ──────────────────────────────────────────────────────────────────────
