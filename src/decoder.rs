//! Word table decompression.
//!
//! A word table stores every distinct label once. Labels that occur more than
//! once are replaced by an index into `lookup`, and frequent words inside a
//! label are replaced by a single placeholder character pointing into
//! `words`. Thai labels use Latin letters as placeholders, romanized labels
//! use Thai consonants, so a placeholder never collides with literal text.

use crate::error::{Error, Result};
use crate::types::Language;
use serde::{Deserialize, Serialize};

/// First code point of the Thai consonant block (ก).
const THAI_BASE: u32 = 0x0E01;
/// Last Thai consonant usable as a placeholder (ฮ).
const THAI_LAST: u32 = 0x0E2E;

/// One element of [`CompressedWordTable::data`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WordEntry {
    /// Index into the `lookup` templates
    Index(usize),
    /// Template text used directly
    Literal(String),
}

/// Compressed label dictionary, one per language.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompressedWordTable {
    /// Label entries in label-index order
    pub data: Vec<WordEntry>,
    /// `|`-joined shared templates
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lookup: Option<String>,
    /// `|`-joined substitution words
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub words: Option<String>,
}

impl CompressedWordTable {
    /// Table whose entries are stored verbatim.
    pub fn uncompressed<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            data: labels
                .into_iter()
                .map(|label| WordEntry::Literal(label.into()))
                .collect(),
            lookup: None,
            words: None,
        }
    }

    fn is_compressed(&self) -> bool {
        matches!(
            (&self.lookup, &self.words),
            (Some(_), Some(words)) if !words.is_empty()
        )
    }
}

/// Decode a word table into literal labels for `target`.
///
/// The output has exactly one label per `data` entry. An index outside
/// `lookup`, or a placeholder outside `words`, means the table is corrupt
/// and is reported as [`Error::MalformedData`].
pub fn decode(table: &CompressedWordTable, target: Language) -> Result<Vec<String>> {
    if table.data.is_empty() {
        return Ok(Vec::new());
    }

    if !table.is_compressed() {
        return Ok(table
            .data
            .iter()
            .map(|entry| match entry {
                WordEntry::Index(index) => index.to_string(),
                WordEntry::Literal(text) => text.clone(),
            })
            .collect());
    }

    let lookup: Vec<&str> = table.lookup.as_deref().unwrap_or_default().split('|').collect();
    let words: Vec<&str> = table.words.as_deref().unwrap_or_default().split('|').collect();

    table
        .data
        .iter()
        .map(|entry| {
            let template = match entry {
                WordEntry::Index(index) => *lookup.get(*index).ok_or_else(|| {
                    Error::malformed(format!(
                        "lookup index {index} out of range ({} templates)",
                        lookup.len()
                    ))
                })?,
                WordEntry::Literal(text) => text.as_str(),
            };
            expand_template(template, &words, target)
        })
        .collect()
}

fn expand_template(template: &str, words: &[&str], target: Language) -> Result<String> {
    let mut label = String::with_capacity(template.len() * 2);

    for ch in template.chars() {
        match placeholder_offset(ch, target) {
            Some(offset) => {
                let word = words.get(offset).ok_or_else(|| {
                    Error::malformed(format!(
                        "placeholder {ch:?} maps to word {offset}, only {} words",
                        words.len()
                    ))
                })?;
                label.push_str(word);
            }
            None => label.push(ch),
        }
    }

    Ok(label)
}

/// Index into the substitution words for a placeholder character, or `None`
/// when `ch` is literal text for the target script.
fn placeholder_offset(ch: char, target: Language) -> Option<usize> {
    let code = ch as u32;
    if target.is_latin() {
        (THAI_BASE..=THAI_LAST)
            .contains(&code)
            .then(|| (code - THAI_BASE) as usize)
    } else if ch.is_ascii_uppercase() {
        Some((code - 'A' as u32) as usize)
    } else if ch.is_ascii_lowercase() {
        Some(26 + (code - 'a' as u32) as usize)
    } else {
        None
    }
}
