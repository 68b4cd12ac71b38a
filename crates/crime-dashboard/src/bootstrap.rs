use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use dashboard_core::error::{DashboardError, Result};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// File name looked up when no `--data-file` is given.
pub const DEFAULT_DATA_FILE: &str = "chicagocrimes.csv";

/// Printed after a load failure to point the user at the fix.
pub const DATA_FILE_HINT: &str =
    "Place chicagocrimes.csv in the current directory or in ~/.crime-dashboard/, \
     or pass --data-file <PATH>.";

// ── Directory bootstrap ────────────────────────────────────────────────────────

/// Ensure `~/.crime-dashboard/` and its `logs/` subdirectory exist.
///
/// Returns the application directory.
pub fn ensure_directories() -> Result<PathBuf> {
    let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    ensure_directories_in(&home)
}

pub fn ensure_directories_in(home: &Path) -> Result<PathBuf> {
    let app_dir = home.join(".crime-dashboard");
    std::fs::create_dir_all(app_dir.join("logs"))?;
    Ok(app_dir)
}

/// Log file used by the terminal view when `--log-file` is not given, so
/// log lines never draw over the dashboard.
pub fn default_log_file(app_dir: &Path) -> PathBuf {
    app_dir.join("logs").join("crime-dashboard.log")
}

// ── Logging bootstrap ──────────────────────────────────────────────────────────

/// Map a `--log-level` value to an `EnvFilter` directive.
pub fn level_directive(log_level: &str) -> &'static str {
    match log_level.to_uppercase().as_str() {
        "DEBUG" => "debug",
        "INFO" => "info",
        "WARNING" => "warn",
        "ERROR" | "CRITICAL" => "error",
        _ => "info",
    }
}

/// Initialise the global `tracing` subscriber.
///
/// With `log_file` set, plain (non-ANSI) output is appended to that file;
/// otherwise it goes to stderr.
pub fn setup_logging(log_level: &str, log_file: Option<&PathBuf>) -> Result<()> {
    let filter = EnvFilter::try_new(level_directive(log_level)).unwrap_or_else(|_| EnvFilter::new("info"));

    let file_layer = match log_file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            Some(fmt::layer().with_writer(Arc::new(file)).with_ansi(false))
        }
        None => None,
    };
    let stderr_layer = file_layer
        .is_none()
        .then(|| fmt::layer().with_target(false).with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| DashboardError::Other(e.into()))?;

    Ok(())
}

// ── Data-path discovery ────────────────────────────────────────────────────────

/// Locate the incident file when none was given on the command line.
///
/// Checks the following paths in order and returns the first that exists:
/// 1. `./chicagocrimes.csv`
/// 2. `~/.crime-dashboard/chicagocrimes.csv`
pub fn discover_data_path() -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;
    discover_data_path_in(&cwd, dirs::home_dir().as_deref())
}

pub fn discover_data_path_in(cwd: &Path, home: Option<&Path>) -> Option<PathBuf> {
    let mut candidates = vec![cwd.join(DEFAULT_DATA_FILE)];
    if let Some(home) = home {
        candidates.push(home.join(".crime-dashboard").join(DEFAULT_DATA_FILE));
    }
    candidates.into_iter().find(|p| p.is_file())
}

// ── Tests ──────────────────────────────────────────────────────────────────────
