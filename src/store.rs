//! Record store generations and their memoized queries.
//!
//! A [`Generation`] owns the expanded records for one `(language, geo)`
//! configuration together with every cache derived from them. Nothing is
//! ever updated in place: a language or geo switch produces a different
//! generation, so caches can never outlive the records they were built from.

use crate::decoder::{self, CompressedWordTable};
use crate::error::Result;
use crate::expander::{self, GeoSlot, ProvinceNode};
use crate::types::{ExpandedRecord, Field, Language};
use std::collections::HashMap;
use std::fmt;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

/// Result limit used when a search does not specify one.
pub const DEFAULT_SEARCH_LIMIT: usize = 20;

static NEXT_GENERATION_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of a generation configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GenerationKey {
    /// Label language
    pub language: Language,
    /// Whether records carry geo codes
    pub geo_enabled: bool,
}

impl fmt::Display for GenerationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let geo = if self.geo_enabled { "geo" } else { "plain" };
        write!(f, "{}/{}", self.language, geo)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum ListKey {
    Provinces,
    Children {
        parent: Field,
        child: Field,
        value: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct SearchKey {
    field: Field,
    term: String,
    limit: usize,
}

#[derive(Debug, Default)]
struct QueryCache {
    lists: HashMap<ListKey, Vec<String>>,
    searches: HashMap<SearchKey, Vec<ExpandedRecord>>,
}

/// One fully built, immutable record set plus its query caches.
#[derive(Debug)]
pub struct Generation {
    id: u64,
    key: GenerationKey,
    records: Vec<ExpandedRecord>,
    words: Vec<String>,
    cache: Mutex<QueryCache>,
}

impl Generation {
    /// Build a generation from raw inputs: decode the word table for
    /// `language`, then expand the gazetteer, attaching geo codes when an
    /// overlay is given.
    ///
    /// # Errors
    ///
    /// Fails on a corrupt word table or gazetteer, or a misaligned overlay.
    /// A generation is never built from partially valid data.
    pub fn build(
        language: Language,
        table: &CompressedWordTable,
        hierarchy: &[ProvinceNode],
        geo: Option<&[GeoSlot]>,
    ) -> Result<Self> {
        let words = decoder::decode(table, language)?;
        Self::from_words(language, words, hierarchy, geo)
    }

    /// Build a generation from an already decoded word list.
    pub fn from_words(
        language: Language,
        words: Vec<String>,
        hierarchy: &[ProvinceNode],
        geo: Option<&[GeoSlot]>,
    ) -> Result<Self> {
        let records = expander::expand(hierarchy, &words, geo)?;
        let key = GenerationKey {
            language,
            geo_enabled: geo.is_some(),
        };
        log::info!(
            "Built {key} generation: {} records from {} labels",
            records.len(),
            words.len()
        );
        Ok(Self::from_parts(key, records, words))
    }

    /// Wrap records that were expanded elsewhere.
    pub fn from_parts(key: GenerationKey, records: Vec<ExpandedRecord>, words: Vec<String>) -> Self {
        Self {
            id: NEXT_GENERATION_ID.fetch_add(1, Ordering::Relaxed),
            key,
            records,
            words,
            cache: Mutex::new(QueryCache::default()),
        }
    }

    /// Process-unique generation id.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Configuration this generation was built for.
    pub fn key(&self) -> GenerationKey {
        self.key
    }

    /// Label language.
    pub fn language(&self) -> Language {
        self.key.language
    }

    /// Whether records carry geo codes.
    pub fn geo_enabled(&self) -> bool {
        self.key.geo_enabled
    }

    /// All records in canonical traversal order.
    pub fn records(&self) -> &[ExpandedRecord] {
        &self.records
    }

    /// Decoded labels, indexed like the gazetteer's label indices.
    pub fn words(&self) -> &[String] {
        &self.words
    }

    /// Drop every memoized query result.
    pub fn clear_caches(&self) {
        let mut cache = self
            .cache
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        cache.lists.clear();
        cache.searches.clear();
        log::debug!("Cleared query caches of generation {} ({})", self.id, self.key);
    }

    /// Distinct province names in first-seen order.
    pub fn provinces(&self) -> Vec<String> {
        self.memoized_list(ListKey::Provinces, || {
            distinct(self.records.iter().map(|record| record.province.as_str()))
        })
    }

    /// Distinct values of `child` among records whose `parent` equals
    /// `value` exactly, in first-seen order.
    pub fn distinct_by_parent(&self, parent: Field, value: &str, child: Field) -> Vec<String> {
        let key = ListKey::Children {
            parent,
            child,
            value: value.to_string(),
        };
        self.memoized_list(key, || {
            distinct(
                self.records
                    .iter()
                    .filter(|record| parent.value(record) == value)
                    .map(|record| child.value(record)),
            )
        })
    }

    /// Records whose `field` contains `term`, case-insensitively, capped at
    /// `limit` and kept in store order. A blank term matches nothing.
    pub fn search(&self, field: Field, term: impl ToString, limit: usize) -> Vec<ExpandedRecord> {
        let term = term.to_string().trim().to_lowercase();
        if term.is_empty() {
            return Vec::new();
        }

        let key = SearchKey { field, term, limit };
        let hit = match self.cache.lock() {
            Ok(cache) => cache.searches.get(&key).cloned(),
            Err(err) => {
                log::error!("Error during filtering {field} for {:?}: {err}", key.term);
                return Vec::new();
            }
        };
        if let Some(hit) = hit {
            log::debug!("Search cache hit: {field} {:?} limit {limit}", key.term);
            return hit;
        }

        // Filter unlocked; concurrent misses on one key compute the same result.
        let results = filter_records(&self.records, field, &key.term, limit);
        self.with_cache(|cache| {
            cache
                .searches
                .entry(key)
                .or_insert_with(|| results.clone())
                .clone()
        })
        .unwrap_or_default()
    }

    fn memoized_list(&self, key: ListKey, compute: impl FnOnce() -> Vec<String>) -> Vec<String> {
        let hit = match self.cache.lock() {
            Ok(cache) => cache.lists.get(&key).cloned(),
            Err(err) => {
                log::error!("Error while listing {key:?}: {err}");
                return Vec::new();
            }
        };
        if let Some(hit) = hit {
            return hit;
        }

        let values = compute();
        self.with_cache(|cache| cache.lists.entry(key).or_insert_with(|| values.clone()).clone())
            .unwrap_or_default()
    }

    fn with_cache<T>(&self, update: impl FnOnce(&mut QueryCache) -> T) -> Option<T> {
        match self.cache.lock() {
            Ok(mut cache) => Some(update(&mut cache)),
            Err(err) => {
                log::error!("Query cache of generation {} unavailable: {err}", self.id);
                None
            }
        }
    }

    #[cfg(test)]
    fn cached_searches(&self) -> usize {
        self.cache
            .lock()
            .map(|cache| cache.searches.len())
            .unwrap_or_default()
    }
}

fn filter_records(
    records: &[ExpandedRecord],
    field: Field,
    term: &str,
    limit: usize,
) -> Vec<ExpandedRecord> {
    records
        .iter()
        .filter(|record| field.value(record).trim().to_lowercase().contains(term))
        .take(limit)
        .cloned()
        .collect()
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    values
        .filter(|value| seen.insert(*value))
        .map(str::to_string)
        .collect()
}
