mod bootstrap;

use std::path::Path;

use anyhow::Result;
use dashboard_core::error::DashboardError;
use dashboard_core::settings::Settings;
use dashboard_data::aggregator::AggregationOptions;
use dashboard_runtime::data_manager::DatasetCache;
use dashboard_runtime::session::DashboardSession;
use dashboard_ui::app::{self, App};

#[tokio::main]
async fn main() -> Result<()> {
    let settings = Settings::load_with_last_used();

    let app_dir = bootstrap::ensure_directories()?;
    let log_file = match (&settings.log_file, settings.output.as_str()) {
        (Some(path), _) => Some(path.clone()),
        (None, "tui") => Some(bootstrap::default_log_file(&app_dir)),
        (None, _) => None,
    };
    bootstrap::setup_logging(&settings.log_level, log_file.as_ref())?;

    tracing::info!("Crime Dashboard v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        "View: {}, Output: {}, Theme: {}, Top N: {}",
        settings.view,
        settings.output,
        settings.theme,
        settings.top_n
    );

    let Some(data_path) = settings.data_file.clone().or_else(bootstrap::discover_data_path) else {
        eprintln!("Error loading data: no {} found", bootstrap::DEFAULT_DATA_FILE);
        eprintln!("{}", bootstrap::DATA_FILE_HINT);
        std::process::exit(1);
    };

    let mut cache = DatasetCache::new();
    let session = match open_session(&mut cache, &data_path, &settings) {
        Ok(session) => session,
        Err(DashboardError::DataLoad(e)) => {
            tracing::error!(error = %e, "dataset load failed");
            eprintln!("Error loading data: {e}");
            eprintln!("{}", bootstrap::DATA_FILE_HINT);
            std::process::exit(1);
        }
        Err(e) => return Err(e.into()),
    };

    match settings.output.as_str() {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&json_report(&session)?)?);
        }
        _ => {
            let dashboard = App::new(&settings.theme);
            tokio::select! {
                result = dashboard.run(session) => {
                    result?;
                }
                _ = tokio::signal::ctrl_c() => {
                    tracing::info!("Ctrl+C received; shutting down");
                    app::restore_terminal()?;
                }
            }
        }
    }

    Ok(())
}

/// Load the dataset through `cache` and position a session on the period
/// the command line asks for.
fn open_session(
    cache: &mut DatasetCache,
    data_path: &Path,
    settings: &Settings,
) -> Result<DashboardSession, DashboardError> {
    let dataset = cache.get_or_load(data_path)?;
    let options = AggregationOptions {
        top_n: settings.top_n as usize,
        ..AggregationOptions::default()
    };

    let mut session = DashboardSession::with_options(dataset, options)?;
    session.switch_mode(settings.view_mode())?;
    if let Some(selection) = settings.requested_period()? {
        session.select(selection)?;
    }
    Ok(session)
}

/// The current period report plus the dataset summary, as one JSON document.
fn json_report(session: &DashboardSession) -> Result<serde_json::Value, DashboardError> {
    Ok(serde_json::json!({
        "source": session.dataset().source().display().to_string(),
        "report": serde_json::to_value(session.report())?,
        "summary": serde_json::to_value(session.summary())?,
    }))
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use dashboard_core::error::InvalidPeriodError;
    use std::path::PathBuf;
    use tempfile::TempDir;

    const CSV: &str = "DATE OF OCCURRENCE,PRIMARY DESCRIPTION,LOCATION DESCRIPTION,ARREST,DOMESTIC,LATITUDE,LONGITUDE\n\
                       03/11/2024 08:00:00 AM,THEFT,STREET,N,N,41.88,-87.63\n\
                       03/13/2024 02:30:00 PM,BATTERY,APARTMENT,Y,Y,,\n\
                       03/15/2024 11:45:00 PM,THEFT,STREET,Y,N,41.80,-87.60\n";

    fn fixture() -> (TempDir, PathBuf) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("crimes.csv");
        std::fs::write(&path, CSV).unwrap();
        (dir, path)
    }

    fn settings(args: &[&str]) -> Settings {
        Settings::parse_from(std::iter::once("crime-dashboard").chain(args.iter().copied()))
    }

    #[test]
    fn test_open_session_defaults_to_latest_day() {
        let (_dir, path) = fixture();
        let mut cache = DatasetCache::new();
        let session = open_session(&mut cache, &path, &settings(&[])).unwrap();
        assert_eq!(session.report().total_count, 1);
        assert_eq!(session.filter().label, "March 15, 2024");
    }

    #[test]
    fn test_open_session_weekly_with_date() {
        let (_dir, path) = fixture();
        let mut cache = DatasetCache::new();
        let s = settings(&["--view", "weekly", "--date", "2024-03-13", "--top-n", "1"]);
        let session = open_session(&mut cache, &path, &s).unwrap();

        let report = session.report();
        assert_eq!(report.total_count, 3);
        assert_eq!(report.top_crime_types.len(), 1);
        assert_eq!(report.top_crime_type, "THEFT");
    }

    #[test]
    fn test_open_session_rejects_out_of_range_date() {
        let (_dir, path) = fixture();
        let mut cache = DatasetCache::new();
        let s = settings(&["--date", "2025-01-01"]);
        let err = open_session(&mut cache, &path, &s).unwrap_err();
        assert!(matches!(
            err,
            DashboardError::InvalidPeriod(InvalidPeriodError::AnchorOutOfRange { .. })
        ));
    }

    #[test]
    fn test_open_session_rejects_month_under_daily_view() {
        let (_dir, path) = fixture();
        let mut cache = DatasetCache::new();
        let s = settings(&["--view", "daily", "--month", "2024-03"]);
        let err = open_session(&mut cache, &path, &s).unwrap_err();
        assert!(matches!(err, DashboardError::Config(_)));
    }

    #[test]
    fn test_open_session_missing_file() {
        let dir = TempDir::new().unwrap();
        let mut cache = DatasetCache::new();
        let err = open_session(&mut cache, &dir.path().join("none.csv"), &settings(&[])).unwrap_err();
        assert!(matches!(err, DashboardError::DataLoad(_)));
    }

    #[test]
    fn test_json_report_shape() {
        let (_dir, path) = fixture();
        let mut cache = DatasetCache::new();
        let s = settings(&["--view", "monthly", "--month", "2024-03"]);
        let session = open_session(&mut cache, &path, &s).unwrap();

        let value = json_report(&session).unwrap();
        assert_eq!(value["report"]["total_count"], 3);
        assert_eq!(value["report"]["filter"]["label"], "2024-03");
        assert_eq!(value["report"]["hourly_pattern"].as_array().unwrap().len(), 24);
        assert_eq!(value["report"]["geo_eligible_count"], 2);
        assert_eq!(value["summary"]["total_records"], 3);
    }
}
