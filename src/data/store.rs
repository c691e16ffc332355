use std::path::Path;
use std::sync::Arc;

use super::loader::{self, TableFormat};
use super::model::Dataset;
use super::sample;
use crate::error::{AnalyticsError, Result};

/// Holds the session's current player table.
///
/// The dataset is never mutated in place: `replace` swaps in a freshly
/// parsed table, so snapshots handed out by `current` stay valid.
#[derive(Debug, Clone)]
pub struct DatasetStore {
    current: Arc<Dataset>,
    generation: u64,
}

impl DatasetStore {
    /// Start a session with the default-size synthetic table.
    pub fn initialize(seed: u64) -> Self {
        Self::with_sample_size(seed, sample::DEFAULT_PLAYERS)
    }

    pub fn with_sample_size(seed: u64, n_players: usize) -> Self {
        let dataset = sample::generate(seed, n_players);
        log::info!("Generated {} sample players (seed {seed})", dataset.len());
        Self::from_dataset(dataset)
    }

    pub fn from_dataset(dataset: Dataset) -> Self {
        Self {
            current: Arc::new(dataset),
            generation: 0,
        }
    }

    /// Parse `raw` as `format` and swap it in. On failure the current
    /// dataset is left untouched.
    pub fn replace(&mut self, raw: &[u8], format: TableFormat) -> Result<Arc<Dataset>> {
        let dataset = loader::parse_bytes(raw, format).map_err(|e| AnalyticsError::Parse {
            format: format.to_string(),
            message: format!("{e:#}"),
        })?;
        log::info!(
            "Loaded {} players from {format} upload with columns {:?}",
            dataset.len(),
            dataset.column_names
        );
        Ok(self.swap(dataset))
    }

    /// Read a file, detecting its format from the extension, and swap it in.
    pub fn replace_from_path(&mut self, path: &Path) -> Result<Arc<Dataset>> {
        let format = TableFormat::from_path(path)
            .ok_or_else(|| AnalyticsError::UnsupportedFormat(path.display().to_string()))?;
        let raw = std::fs::read(path)?;
        self.replace(&raw, format)
    }

    /// Install an already-built dataset.
    pub fn swap(&mut self, dataset: Dataset) -> Arc<Dataset> {
        self.current = Arc::new(dataset);
        self.generation += 1;
        Arc::clone(&self.current)
    }

    /// Snapshot of the active dataset.
    pub fn current(&self) -> Arc<Dataset> {
        Arc::clone(&self.current)
    }

    /// Borrow the active dataset without bumping the refcount.
    pub fn dataset(&self) -> &Dataset {
        &self.current
    }

    /// Incremented on every successful swap.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

impl Default for DatasetStore {
    fn default() -> Self {
        Self::initialize(sample::DEFAULT_SEED)
    }
}
