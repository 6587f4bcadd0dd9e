//! Data file management for thai-address.
//!
//! The gazetteer, the two word tables and the geo overlay are plain JSON
//! files read from one data directory. Files are read with `tokio::fs` and
//! decoded with `serde_json`; nothing is written back.

use crate::decoder::CompressedWordTable;
use crate::error::{Error, Result};
use crate::expander::{GeoSlot, ProvinceNode};
use crate::types::Language;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};

/// Environment variable overriding the default data directory.
pub const DATA_DIR_ENV: &str = "THAI_ADDRESS_DATA_DIR";

/// Data file manager for thai-address.
#[derive(Debug, Clone)]
pub struct DataManager {
    data_dir: PathBuf,
    config: DataConfig,
}

impl DataManager {
    /// Create a new data manager with the default data directory.
    pub fn new() -> Self {
        Self::with_config(DataConfig::default())
    }

    /// Create a new data manager with a custom data directory.
    pub fn with_data_dir<P: AsRef<Path>>(data_dir: P) -> Self {
        Self::with_config(DataConfig {
            data_dir: data_dir.as_ref().to_path_buf(),
            ..DataConfig::default()
        })
    }

    /// Create a new data manager with custom configuration.
    pub fn with_config(config: DataConfig) -> Self {
        Self {
            data_dir: config.data_dir.clone(),
            config,
        }
    }

    /// Get the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Get the configuration.
    pub fn config(&self) -> &DataConfig {
        &self.config
    }

    /// Files needed to build generations, with the geo overlay only when
    /// `geo` is requested.
    pub fn required_files(&self, geo: bool) -> Vec<&str> {
        let mut files = vec![
            self.config.gazetteer_file.as_str(),
            self.config.thai_words_file.as_str(),
            self.config.english_words_file.as_str(),
        ];
        if geo {
            files.push(self.config.geo_file.as_str());
        }
        files
    }

    /// Check if required data files are present.
    pub fn is_data_available(&self) -> bool {
        self.data_dir.exists()
            && self
                .required_files(false)
                .iter()
                .all(|file| self.data_dir.join(file).exists())
    }

    /// Verify that every required file exists and is non-empty.
    pub fn verify_data(&self, geo: bool) -> Result<()> {
        if !self.data_dir.exists() {
            return Err(Error::data_error(format!(
                "Data directory not found: {}",
                self.data_dir.display()
            )));
        }

        for file in self.required_files(geo) {
            let path = self.data_dir.join(file);
            if !path.exists() {
                return Err(Error::data_error(format!("Missing data file: {file}")));
            }

            let metadata = std::fs::metadata(&path).map_err(|e| {
                Error::data_error(format!("Failed to read metadata for {file}: {e}"))
            })?;

            if metadata.len() == 0 {
                return Err(Error::data_error(format!("Empty data file: {file}")));
            }
        }

        Ok(())
    }

    /// Bytes a generation reads: the gazetteer, both word tables and, with
    /// `geo`, the overlay.
    pub async fn input_size(&self, geo: bool) -> Result<u64> {
        let mut total = 0;
        for file in self.required_files(geo) {
            let path = self.data_dir.join(file);
            let metadata = tokio::fs::metadata(&path)
                .await
                .map_err(|e| Error::data_error(format!("Failed to stat {}: {e}", path.display())))?;
            total += metadata.len();
        }
        Ok(total)
    }

    /// Load the province / district / sub-district hierarchy.
    pub async fn load_gazetteer(&self) -> Result<Vec<ProvinceNode>> {
        self.read_json(&self.config.gazetteer_file).await
    }

    /// Load the compressed word table for `language`.
    pub async fn load_words(&self, language: Language) -> Result<CompressedWordTable> {
        let file = match language {
            Language::Thai => &self.config.thai_words_file,
            Language::English => &self.config.english_words_file,
        };
        self.read_json(file).await
    }

    /// Load the geo overlay.
    pub async fn load_geo(&self) -> Result<Vec<GeoSlot>> {
        self.read_json(&self.config.geo_file).await
    }

    async fn read_json<T: DeserializeOwned>(&self, file: &str) -> Result<T> {
        let path = self.data_dir.join(file);
        log::debug!("Reading {}", path.display());

        let bytes = tokio::fs::read(&path)
            .await
            .map_err(|e| Error::data_error(format!("Failed to read {}: {e}", path.display())))?;

        Ok(serde_json::from_slice(&bytes)?)
    }
}

impl Default for DataManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Get the default data directory for thai-address.
pub fn default_data_dir() -> PathBuf {
    // Check for environment variable first
    if let Ok(env_data_dir) = std::env::var(DATA_DIR_ENV) {
        let path = PathBuf::from(env_data_dir);
        if path.exists() {
            return path;
        }
    }

    // Project-local data (development checkouts)
    let project_data_dir = PathBuf::from("data/thai-address");
    if project_data_dir.exists() {
        return project_data_dir;
    }

    if let Some(data_dir) = dirs::data_dir() {
        data_dir.join("thai-address")
    } else {
        PathBuf::from(".thai-address")
    }
}

/// Configuration for data management.
#[derive(Debug, Clone)]
pub struct DataConfig {
    /// Data directory path
    pub data_dir: PathBuf,
    /// Gazetteer file name
    pub gazetteer_file: String,
    /// Thai word table file name
    pub thai_words_file: String,
    /// English word table file name
    pub english_words_file: String,
    /// Geo overlay file name
    pub geo_file: String,
    /// Whether to verify data files before loading
    pub verify_integrity: bool,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            gazetteer_file: "db.json".to_string(),
            thai_words_file: "th_db.json".to_string(),
            english_words_file: "en_db.json".to_string(),
            geo_file: "geo.json".to_string(),
            verify_integrity: true,
        }
    }
}
