//! # thai-address
//!
//! Thai administrative address lookup, search and address splitting.
//!
//! The library expands a compact, code-compressed gazetteer of provinces,
//! districts, sub-districts and postal codes into flat records, and answers
//! queries against them in Thai or English.
//!
//! ## Features
//!
//! - **Hierarchy Lookup**: provinces, districts of a province, sub-districts
//!   of a district, postal codes of a sub-district
//! - **Search**: case-insensitive substring search on any field
//! - **Address Splitting**: split a free-text address ending in a postal
//!   code into province / district / sub-district and residual text
//! - **Bilingual**: Thai and romanized labels, with word translation
//! - **Geo Codes**: optional administrative codes on every record
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use thai_address::{Language, ThaiAddress, ThaiAddressConfig};
//!
//! # async fn run() -> thai_address::Result<()> {
//! let config = ThaiAddressConfig::builder()
//!     .language(Language::English)
//!     .data_dir("data/thai-address")
//!     .build();
//! let lookup = ThaiAddress::with_config(config).await?;
//!
//! let districts = lookup.list_districts("Nonthaburi");
//! let parts = lookup.split_address("126/548 Road Name Pak Kret Pak Kret Nonthaburi Thailand 11120");
//! println!("{districts:?} {parts:?}");
//! # Ok(())
//! # }
//! ```

#![deny(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod data;
pub mod decoder;
pub mod error;
pub mod expander;
pub mod factory;
pub mod splitter;
pub mod store;
pub mod translate;
pub mod types;

#[cfg(test)]
mod fixtures;

// Re-export main API
pub use error::{Error, Result};
pub use factory::{GenerationFactory, InMemoryData};
pub use splitter::AddressSplitter;
pub use store::{DEFAULT_SEARCH_LIMIT, Generation, GenerationKey};
pub use translate::Translator;
pub use types::*;

use std::sync::{Arc, PoisonError, RwLock};
use tokio::sync::{Mutex, OnceCell};

/// Main entry point for thai-address functionality.
///
/// Holds the active record store generation. Switching language or geo mode
/// builds the complete new generation first and then swaps it in; queries
/// running meanwhile keep using the previous generation.
///
/// # Examples
///
/// ```rust,no_run
/// use thai_address::ThaiAddress;
///
/// # async fn run() -> thai_address::Result<()> {
/// let lookup = ThaiAddress::new().await?;
/// for province in lookup.list_provinces() {
///     println!("{province}");
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct ThaiAddress {
    factory: GenerationFactory,
    current: RwLock<Arc<Generation>>,
    switch: Mutex<()>,
    translator: OnceCell<Translator>,
}

impl ThaiAddress {
    /// Initialize with default configuration (Thai labels, no geo codes,
    /// default data directory).
    ///
    /// # Errors
    ///
    /// Returns an error if the data files are missing or corrupt.
    pub async fn new() -> Result<Self> {
        Self::with_config(ThaiAddressConfig::default()).await
    }

    /// Initialize with custom configuration.
    ///
    /// # Arguments
    ///
    /// * `config` - Language, geo mode and data location
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use thai_address::{Language, ThaiAddress, ThaiAddressConfig};
    ///
    /// # async fn run() -> thai_address::Result<()> {
    /// let config = ThaiAddressConfig::builder()
    ///     .language(Language::English)
    ///     .geo_enabled(true)
    ///     .build();
    ///
    /// let lookup = ThaiAddress::with_config(config).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn with_config(config: ThaiAddressConfig) -> Result<Self> {
        let factory = GenerationFactory::new(data::DataManager::with_config(config.data_config));
        Self::with_factory(factory, config.language, config.geo_enabled).await
    }

    /// Initialize over an existing factory, e.g. one built from
    /// [`InMemoryData`].
    pub async fn with_factory(
        factory: GenerationFactory,
        language: Language,
        geo_enabled: bool,
    ) -> Result<Self> {
        let generation = factory
            .generation(GenerationKey {
                language,
                geo_enabled,
            })
            .await?;

        Ok(Self {
            factory,
            current: RwLock::new(generation),
            switch: Mutex::new(()),
            translator: OnceCell::new(),
        })
    }

    /// The active generation.
    pub fn generation(&self) -> Arc<Generation> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Snapshot of every record of the active generation.
    pub fn records(&self) -> Vec<ExpandedRecord> {
        self.generation().records().to_vec()
    }

    /// Label language of the active generation.
    pub fn language(&self) -> Language {
        self.generation().language()
    }

    /// Whether the active generation carries geo codes.
    pub fn geo_enabled(&self) -> bool {
        self.generation().geo_enabled()
    }

    /// Switch label language.
    ///
    /// # Errors
    ///
    /// Returns an error if the new generation cannot be built; the current
    /// one stays active in that case.
    pub async fn set_language(&self, language: Language) -> Result<()> {
        let _switch = self.switch.lock().await;
        let key = GenerationKey {
            language,
            ..self.generation().key()
        };
        self.activate(key).await
    }

    /// Attach or detach geo codes.
    ///
    /// # Errors
    ///
    /// Returns an error if the new generation cannot be built; the current
    /// one stays active in that case.
    pub async fn set_geo_enabled(&self, geo_enabled: bool) -> Result<()> {
        let _switch = self.switch.lock().await;
        let key = GenerationKey {
            geo_enabled,
            ..self.generation().key()
        };
        self.activate(key).await
    }

    // Callers hold `switch`, so the key they derived is still current here.
    async fn activate(&self, key: GenerationKey) -> Result<()> {
        if self.generation().key() == key {
            return Ok(());
        }

        let next = self.factory.generation(key).await?;
        next.clear_caches();

        let previous = std::mem::replace(
            &mut *self.current.write().unwrap_or_else(PoisonError::into_inner),
            Arc::clone(&next),
        );
        log::info!(
            "Switched generation {} ({}) -> {} ({})",
            previous.id(),
            previous.key(),
            next.id(),
            next.key()
        );
        Ok(())
    }

    /// All distinct provinces, in gazetteer order.
    pub fn list_provinces(&self) -> Vec<String> {
        self.generation().provinces()
    }

    /// Districts of `province` (exact name).
    pub fn list_districts(&self, province: &str) -> Vec<String> {
        self.generation()
            .distinct_by_parent(Field::Province, province, Field::District)
    }

    /// Sub-districts of `district` (exact name).
    pub fn list_sub_districts(&self, district: &str) -> Vec<String> {
        self.generation()
            .distinct_by_parent(Field::District, district, Field::SubDistrict)
    }

    /// Postal codes of `sub_district` (exact name).
    pub fn list_postal_codes(&self, sub_district: &str) -> Vec<String> {
        self.generation()
            .distinct_by_parent(Field::SubDistrict, sub_district, Field::PostalCode)
    }

    /// Records whose `field` contains `term`, case-insensitively.
    ///
    /// `limit` defaults to [`DEFAULT_SEARCH_LIMIT`].
    pub fn search(&self, field: Field, term: impl ToString, limit: Option<usize>) -> Vec<ExpandedRecord> {
        self.generation()
            .search(field, term, limit.unwrap_or(DEFAULT_SEARCH_LIMIT))
    }

    /// Search by province name.
    pub fn search_by_province(&self, term: &str, limit: Option<usize>) -> Vec<ExpandedRecord> {
        self.search(Field::Province, term, limit)
    }

    /// Search by district name.
    pub fn search_by_district(&self, term: &str, limit: Option<usize>) -> Vec<ExpandedRecord> {
        self.search(Field::District, term, limit)
    }

    /// Search by sub-district name.
    pub fn search_by_sub_district(&self, term: &str, limit: Option<usize>) -> Vec<ExpandedRecord> {
        self.search(Field::SubDistrict, term, limit)
    }

    /// Search by postal code, given as text or a number.
    pub fn search_by_postal_code(&self, term: impl ToString, limit: Option<usize>) -> Vec<ExpandedRecord> {
        self.search(Field::PostalCode, term, limit)
    }

    /// Address splitter bound to the active generation.
    pub fn splitter(&self) -> AddressSplitter {
        AddressSplitter::new(self.generation())
    }

    /// Split a free-text address into its administrative components.
    ///
    /// Returns `None` when the text has no postal code or no gazetteer entry
    /// matches district, sub-district and province.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use thai_address::ThaiAddress;
    ///
    /// # async fn run() -> thai_address::Result<()> {
    /// let lookup = ThaiAddress::new().await?;
    /// let parts = lookup.split_address("126/548 ถ.สุขาประชาสรรค์ ปากเกร็ด ปากเกร็ด นนทบุรี 11120");
    /// # Ok(())
    /// # }
    /// ```
    pub fn split_address(&self, address: &str) -> Option<SplitAddress> {
        self.splitter().split(address)
    }

    /// Split multiple addresses, keeping input order.
    pub fn split_addresses(&self, addresses: &[&str]) -> Vec<Option<SplitAddress>> {
        self.splitter().split_batch(addresses)
    }

    /// Split multiple addresses in parallel, keeping input order.
    #[cfg(feature = "parallel")]
    pub fn split_addresses_parallel(&self, addresses: &[&str]) -> Vec<Option<SplitAddress>> {
        self.splitter().split_batch_parallel(addresses)
    }

    /// Translate a label between Thai and English.
    ///
    /// Returns `text` unchanged when no label contains it.
    ///
    /// # Errors
    ///
    /// Returns an error if either word table cannot be loaded.
    pub async fn translate_word(&self, text: &str) -> Result<String> {
        let translator = self
            .translator
            .get_or_try_init(|| async {
                let thai = self.factory.words(Language::Thai).await?;
                let english = self.factory.words(Language::English).await?;
                Ok::<_, Error>(Translator::new(thai, english))
            })
            .await?;
        Ok(translator.translate(text))
    }
}

/// Configuration for ThaiAddress initialization.
#[derive(Debug, Clone)]
pub struct ThaiAddressConfig {
    /// Initial label language
    pub language: Language,

    /// Whether records carry geo codes
    pub geo_enabled: bool,

    /// Data management configuration
    pub data_config: data::DataConfig,
}

impl Default for ThaiAddressConfig {
    fn default() -> Self {
        Self {
            language: Language::Thai,
            geo_enabled: false,
            data_config: data::DataConfig::default(),
        }
    }
}

impl ThaiAddressConfig {
    /// Create a new configuration builder.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use thai_address::{Language, ThaiAddressConfig};
    ///
    /// let config = ThaiAddressConfig::builder()
    ///     .language(Language::English)
    ///     .verify_data_integrity(false)
    ///     .build();
    /// assert_eq!(config.language, Language::English);
    /// ```
    pub fn builder() -> ThaiAddressConfigBuilder {
        ThaiAddressConfigBuilder::new()
    }
}

/// Builder for ThaiAddressConfig.
#[derive(Debug, Clone)]
pub struct ThaiAddressConfigBuilder {
    language: Language,
    geo_enabled: bool,
    data_config: data::DataConfig,
}

impl ThaiAddressConfigBuilder {
    /// Create a new configuration builder with default values.
    pub fn new() -> Self {
        let defaults = ThaiAddressConfig::default();
        Self {
            language: defaults.language,
            geo_enabled: defaults.geo_enabled,
            data_config: defaults.data_config,
        }
    }

    /// Set the initial label language.
    pub fn language(mut self, language: Language) -> Self {
        self.language = language;
        self
    }

    /// Set whether records carry geo codes.
    pub fn geo_enabled(mut self, enabled: bool) -> Self {
        self.geo_enabled = enabled;
        self
    }

    /// Set whether to verify data files before loading.
    pub fn verify_data_integrity(mut self, enabled: bool) -> Self {
        self.data_config.verify_integrity = enabled;
        self
    }

    /// Set the data configuration.
    pub fn data_config(mut self, config: data::DataConfig) -> Self {
        self.data_config = config;
        self
    }

    /// Set a custom data directory.
    pub fn data_dir<P: Into<std::path::PathBuf>>(mut self, dir: P) -> Self {
        self.data_config.data_dir = dir.into();
        self
    }

    /// Build the configuration.
    pub fn build(self) -> ThaiAddressConfig {
        ThaiAddressConfig {
            language: self.language,
            geo_enabled: self.geo_enabled,
            data_config: self.data_config,
        }
    }
}

impl Default for ThaiAddressConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
