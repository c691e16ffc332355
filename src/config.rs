use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::data::sample::{DEFAULT_PLAYERS, DEFAULT_SEED};
use crate::error::{AnalyticsError, Result};

/// Settings read from an optional TOML file. Every field has a default, so
/// an empty file (or no file at all) is valid.
///
/// ```toml
/// seed = 7
/// sample_size = 250
/// top_n = 5
/// export_path = "out/players.parquet"
/// csv_delimiter = ";"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsConfig {
    /// Seed of the synthetic sample table.
    pub seed: u64,
    /// Number of synthetic players.
    pub sample_size: usize,
    /// Default length of rankings.
    pub top_n: usize,
    /// Where `export` writes when no path is given.
    pub export_path: PathBuf,
    /// Field separator for CSV export.
    pub csv_delimiter: char,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            sample_size: DEFAULT_PLAYERS,
            top_n: 10,
            export_path: PathBuf::from("player_data.csv"),
            csv_delimiter: ',',
        }
    }
}

impl AnalyticsConfig {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text).map_err(|e| AnalyticsError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Load `path` when given, otherwise use defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => {
                let config = Self::load(p)?;
                log::debug!("Loaded config from {}", p.display());
                Ok(config)
            }
            None => Ok(Self::default()),
        }
    }

    pub fn delimiter_byte(&self) -> u8 {
        // validate() guarantees ASCII
        self.csv_delimiter as u8
    }

    fn validate(&self) -> Result<()> {
        if !self.csv_delimiter.is_ascii() {
            return Err(AnalyticsError::Config(format!(
                "csv_delimiter must be a single ASCII character, got '{}'",
                self.csv_delimiter
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_is_defaults() {
        assert_eq!(AnalyticsConfig::from_toml_str("").unwrap(), AnalyticsConfig::default());
    }

    #[test]
    fn partial_override() {
        let cfg = AnalyticsConfig::from_toml_str("top_n = 3\ncsv_delimiter = \";\"\n").unwrap();
        assert_eq!(cfg.top_n, 3);
        assert_eq!(cfg.delimiter_byte(), b';');
        assert_eq!(cfg.seed, DEFAULT_SEED);
    }

    #[test]
    fn rejects_bad_values() {
        assert!(AnalyticsConfig::from_toml_str("csv_delimiter = \"é\"").is_err());
        assert!(AnalyticsConfig::from_toml_str("top_n = \"many\"").is_err());
    }
}
