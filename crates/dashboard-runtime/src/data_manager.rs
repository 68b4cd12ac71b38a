//! Process-lifetime cache of loaded datasets.
//!
//! Parsing a multi-year incident file is the most expensive step of a
//! session, so [`DatasetCache::get_or_load`] loads each file once and hands
//! out shared [`Arc<Dataset>`] handles afterwards. Entries are never
//! invalidated: edits to the file on disk are picked up on restart.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use dashboard_core::error::DataLoadError;
use dashboard_core::models::Dataset;
use dashboard_data::reader::load_dataset;

// ── DatasetCache ──────────────────────────────────────────────────────────────

/// Loaded datasets keyed by canonical file path.
///
/// # Example
/// ```no_run
/// use std::path::Path;
/// use dashboard_runtime::data_manager::DatasetCache;
///
/// let mut cache = DatasetCache::new();
/// let dataset = cache.get_or_load(Path::new("chicagocrimes.csv")).unwrap();
/// println!("{} incidents", dataset.len());
/// ```
#[derive(Debug, Default)]
pub struct DatasetCache {
    datasets: HashMap<PathBuf, Arc<Dataset>>,
}

impl DatasetCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the dataset for `path`, loading it on first use.
    ///
    /// Paths are canonicalized first so `./data.csv` and its absolute form
    /// share one entry. Load failures are not cached.
    pub fn get_or_load(&mut self, path: &Path) -> Result<Arc<Dataset>, DataLoadError> {
        let key = path.canonicalize().map_err(|source| DataLoadError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;

        if let Some(dataset) = self.datasets.get(&key) {
            tracing::debug!(path = %key.display(), "returning cached dataset");
            return Ok(Arc::clone(dataset));
        }

        let dataset = Arc::new(load_dataset(&key)?);
        tracing::info!(
            path = %key.display(),
            records = dataset.len(),
            "dataset cached"
        );
        self.datasets.insert(key, Arc::clone(&dataset));
        Ok(dataset)
    }

    /// `true` when `path` has already been loaded.
    pub fn contains(&self, path: &Path) -> bool {
        path.canonicalize()
            .map(|key| self.datasets.contains_key(&key))
            .unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.datasets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.datasets.is_empty()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
