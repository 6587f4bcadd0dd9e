//! Generation factory.
//!
//! Loads the raw inputs once and builds at most one [`Generation`] per
//! `(language, geo)` pair. Builds are serialized behind an async mutex, so
//! two callers asking for the same configuration share one generation.

use crate::data::DataManager;
use crate::decoder::{self, CompressedWordTable};
use crate::error::{Error, Result};
use crate::expander::{GeoSlot, ProvinceNode};
use crate::store::{Generation, GenerationKey};
use crate::types::Language;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OnceCell};

/// Raw inputs held in memory, for embedders that bundle the data files.
#[derive(Debug, Clone)]
pub struct InMemoryData {
    /// Province / district / sub-district hierarchy
    pub gazetteer: Vec<ProvinceNode>,
    /// Thai word table
    pub thai_words: CompressedWordTable,
    /// English word table
    pub english_words: CompressedWordTable,
    /// Optional geo overlay
    pub geo: Option<Vec<GeoSlot>>,
}

#[derive(Debug)]
enum Source {
    Files(DataManager),
    Memory(InMemoryData),
}

/// Builds and memoizes record store generations.
#[derive(Debug)]
pub struct GenerationFactory {
    source: Source,
    gazetteer: OnceCell<Arc<Vec<ProvinceNode>>>,
    geo: OnceCell<Arc<Vec<GeoSlot>>>,
    words: Mutex<HashMap<Language, Arc<Vec<String>>>>,
    generations: Mutex<HashMap<GenerationKey, Arc<Generation>>>,
}

impl GenerationFactory {
    /// Factory reading its inputs from data files.
    pub fn new(data: DataManager) -> Self {
        Self::with_source(Source::Files(data))
    }

    /// Factory over inputs already in memory.
    pub fn from_memory(data: InMemoryData) -> Self {
        Self::with_source(Source::Memory(data))
    }

    fn with_source(source: Source) -> Self {
        Self {
            source,
            gazetteer: OnceCell::new(),
            geo: OnceCell::new(),
            words: Mutex::new(HashMap::new()),
            generations: Mutex::new(HashMap::new()),
        }
    }

    /// Generation for `key`, building it on first request.
    ///
    /// # Errors
    ///
    /// Fails when inputs cannot be loaded or are corrupt. Nothing is
    /// memoized for a failed build.
    pub async fn generation(&self, key: GenerationKey) -> Result<Arc<Generation>> {
        let mut generations = self.generations.lock().await;
        if let Some(generation) = generations.get(&key) {
            log::debug!("Reusing {key} generation {}", generation.id());
            return Ok(Arc::clone(generation));
        }

        self.verify(key.geo_enabled)?;
        if let Source::Files(data) = &self.source {
            let bytes = data.input_size(key.geo_enabled).await?;
            log::info!(
                "Building {key} generation from {} ({bytes} bytes)",
                data.data_dir().display()
            );
        }
        let gazetteer = self.gazetteer().await?;
        let words = self.words(key.language).await?;
        let geo = if key.geo_enabled {
            Some(self.geo().await?)
        } else {
            None
        };

        let generation = Arc::new(Generation::from_words(
            key.language,
            words.as_ref().clone(),
            &gazetteer,
            geo.as_deref().map(Vec::as_slice),
        )?);
        generations.insert(key, Arc::clone(&generation));
        Ok(generation)
    }

    /// Decoded labels for `language`.
    pub async fn words(&self, language: Language) -> Result<Arc<Vec<String>>> {
        let mut words = self.words.lock().await;
        if let Some(decoded) = words.get(&language) {
            return Ok(Arc::clone(decoded));
        }

        let table = match &self.source {
            Source::Files(data) => data.load_words(language).await?,
            Source::Memory(data) => match language {
                Language::Thai => data.thai_words.clone(),
                Language::English => data.english_words.clone(),
            },
        };
        let decoded = Arc::new(decoder::decode(&table, language)?);
        words.insert(language, Arc::clone(&decoded));
        Ok(decoded)
    }

    /// Forget every memoized generation. Loaded inputs are kept.
    pub async fn clear(&self) {
        self.generations.lock().await.clear();
    }

    #[cfg(test)]
    pub(crate) async fn lock_generations(
        &self,
    ) -> tokio::sync::MutexGuard<'_, HashMap<GenerationKey, Arc<Generation>>> {
        self.generations.lock().await
    }

    fn verify(&self, geo: bool) -> Result<()> {
        match &self.source {
            Source::Files(data) if data.config().verify_integrity => data.verify_data(geo),
            Source::Files(_) => Ok(()),
            Source::Memory(data) if geo && data.geo.is_none() => {
                Err(Error::data_error("Geo overlay not available"))
            }
            Source::Memory(_) => Ok(()),
        }
    }

    async fn gazetteer(&self) -> Result<Arc<Vec<ProvinceNode>>> {
        self.gazetteer
            .get_or_try_init(|| async {
                let gazetteer = match &self.source {
                    Source::Files(data) => data.load_gazetteer().await?,
                    Source::Memory(data) => data.gazetteer.clone(),
                };
                Ok::<_, Error>(Arc::new(gazetteer))
            })
            .await
            .cloned()
    }

    async fn geo(&self) -> Result<Arc<Vec<GeoSlot>>> {
        self.geo
            .get_or_try_init(|| async {
                let geo = match &self.source {
                    Source::Files(data) => data.load_geo().await?,
                    Source::Memory(data) => data
                        .geo
                        .clone()
                        .ok_or_else(|| Error::data_error("Geo overlay not available"))?,
                };
                Ok::<_, Error>(Arc::new(geo))
            })
            .await
            .cloned()
    }
}
