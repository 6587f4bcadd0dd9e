//! Splitting free-text addresses into their administrative components.
//!
//! The splitter relies on the Thai convention of ending an address with a
//! five digit postal code. The postal code narrows the gazetteer down to a
//! handful of candidates, and a candidate is accepted only when its district,
//! sub-district and province all appear in the remaining text.

use crate::store::{DEFAULT_SEARCH_LIMIT, Generation};
use crate::types::{ExpandedRecord, Field, SplitAddress};
use regex::Regex;
use regex::{Captures, Match};
use std::ops::Range;
use std::sync::{Arc, LazyLock};

/// Regex for a whitespace-delimited five digit postal code.
static POSTAL_CODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:^|\s)([0-9]{5})(?:\s|$)").expect("valid regex"));

static TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\S+").expect("valid regex"));

/// Administrative marker words stripped before scoring. Dotted forms come
/// before their bare forms so the dot goes with them.
static MARKERS: &[&str] = &[
    "Thailand",
    "ตำบล",
    "อำเภอ",
    "จังหวัด",
    "แขวง.",
    "เขต.",
    "แขวง",
    "เขต",
    "ต.",
    "อ.",
    "จ.",
];

/// Short forms of Bangkok written as a standalone word.
static BANGKOK_ABBREVIATIONS: &[&str] = &["กทม.", "กทม", "กรุงเทพฯ", "กรุงเทพ"];

/// Official Thai name of Bangkok as it appears in the gazetteer.
const BANGKOK: &str = "กรุงเทพมหานคร";

/// Score a candidate must reach to be accepted.
pub const FULL_MATCH: usize = 3;

/// Fields compared against the address text.
const SCORED_FIELDS: [Field; 3] = [Field::District, Field::SubDistrict, Field::Province];

/// First whitespace-delimited five digit number in `address`, with its
/// position.
pub fn find_postal_code(address: &str) -> Option<Match<'_>> {
    POSTAL_CODE_RE
        .captures(address)
        .and_then(|captures| captures.get(1))
}

/// First whitespace-delimited five digit number in `address`.
pub fn extract_postal_code(address: &str) -> Option<&str> {
    find_postal_code(address).map(|code| code.as_str())
}

/// Text used for scoring: the postal code at `postal_code` and marker words
/// removed, Bangkok short forms expanded, ends trimmed. Inner spacing is
/// left as written.
pub fn prepare_address(address: &str, postal_code: Range<usize>) -> String {
    let mut text = address.to_string();
    text.replace_range(postal_code, "");
    for marker in MARKERS {
        text = text.replacen(marker, "", 1);
    }

    TOKEN_RE
        .replace_all(&text, |token: &Captures<'_>| match &token[0] {
            abbreviation if BANGKOK_ABBREVIATIONS.contains(&abbreviation) => BANGKOK.to_string(),
            other => other.to_string(),
        })
        .trim()
        .to_string()
}

/// Number of district, sub-district and province names found in `address`.
pub fn match_score(record: &ExpandedRecord, address: &str) -> usize {
    SCORED_FIELDS
        .iter()
        .filter(|field| address.contains(field.value(record)))
        .count()
}

/// Highest scoring candidate, the earliest one on ties, provided it reaches
/// [`FULL_MATCH`].
pub fn best_match<'a>(candidates: &'a [ExpandedRecord], address: &str) -> Option<&'a ExpandedRecord> {
    let mut best: Option<(&ExpandedRecord, usize)> = None;
    for candidate in candidates {
        let score = match_score(candidate, address);
        if best.is_none_or(|(_, top)| score > top) {
            best = Some((candidate, score));
        }
    }

    best.filter(|(_, score)| *score == FULL_MATCH)
        .map(|(record, _)| record)
}

/// Remove every space-prefixed occurrence of the matched names, leaving the
/// street-level part of the address.
///
/// Longer names go first so a district that prefixes its sub-district
/// ("Khlong Thom" / "Khlong Thom Tai") cannot leave a stray suffix behind.
pub fn cleanup_address(address: &str, record: &ExpandedRecord) -> String {
    let mut names = SCORED_FIELDS.map(|field| field.value(record));
    names.sort_by_key(|name| std::cmp::Reverse(name.chars().count()));

    let mut text = format!(" {address}");
    for name in names {
        text = text.replace(&format!(" {name}"), "");
    }
    text.trim().to_string()
}

/// Split `address` against the records of `generation`.
///
/// Returns `None` when there is no postal code, or when no record with that
/// postal code matches all three names.
pub fn split(generation: &Generation, address: &str) -> Option<SplitAddress> {
    let postal = find_postal_code(address)?;
    let postal_code = postal.as_str();
    let prepared = prepare_address(address, postal.range());

    let candidates = generation.search(Field::PostalCode, postal_code, DEFAULT_SEARCH_LIMIT);
    let Some(best) = best_match(&candidates, &prepared) else {
        log::warn!(
            "No full match for postal code {postal_code} among {} candidates",
            candidates.len()
        );
        return None;
    };

    Some(SplitAddress {
        address: cleanup_address(&prepared, best),
        province: best.province.clone(),
        district: best.district.clone(),
        sub_district: best.sub_district.clone(),
        postal_code: postal_code.to_string(),
    })
}

/// Address splitter bound to one record store generation.
#[derive(Debug, Clone)]
pub struct AddressSplitter {
    generation: Arc<Generation>,
}

impl AddressSplitter {
    /// Create a splitter over `generation`.
    pub fn new(generation: Arc<Generation>) -> Self {
        Self { generation }
    }

    /// Split one address.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use thai_address::ThaiAddress;
    ///
    /// # async fn run() -> thai_address::Result<()> {
    /// let lookup = ThaiAddress::new().await?;
    /// let splitter = lookup.splitter();
    /// if let Some(parts) = splitter.split("126/548 ถ.สุขาประชาสรรค์ ปากเกร็ด ปากเกร็ด นนทบุรี 11120") {
    ///     println!("{} / {} / {}", parts.sub_district, parts.district, parts.province);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub fn split(&self, address: &str) -> Option<SplitAddress> {
        split(&self.generation, address)
    }

    /// Split multiple addresses, keeping input order.
    pub fn split_batch(&self, addresses: &[&str]) -> Vec<Option<SplitAddress>> {
        addresses.iter().map(|address| self.split(address)).collect()
    }

    /// Split multiple addresses in parallel, keeping input order.
    ///
    /// Generations are shared read-only between threads; their query caches
    /// are internally synchronized.
    #[cfg(feature = "parallel")]
    pub fn split_batch_parallel(&self, addresses: &[&str]) -> Vec<Option<SplitAddress>> {
        use rayon::prelude::*;

        addresses
            .par_iter()
            .map(|address| self.split(address))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use crate::types::Language;

    fn record(province: &str, district: &str, sub_district: &str, postal_code: &str) -> ExpandedRecord {
        ExpandedRecord {
            province: province.to_string(),
            district: district.to_string(),
            sub_district: sub_district.to_string(),
            postal_code: postal_code.to_string(),
            ..Default::default()
        }
    }

    fn english() -> AddressSplitter {
        AddressSplitter::new(Arc::new(fixtures::generation(Language::English, false)))
    }

    fn thai() -> AddressSplitter {
        AddressSplitter::new(Arc::new(fixtures::generation(Language::Thai, false)))
    }

    #[test]
    fn test_extract_postal_code() {
        assert_eq!(extract_postal_code("Road Name Nonthaburi 11120"), Some("11120"));
        assert_eq!(extract_postal_code("Road 11120 Nonthaburi"), Some("11120"));
        assert_eq!(extract_postal_code("Road Name"), None);
        assert_eq!(extract_postal_code("Road 111200"), None);
        assert_eq!(extract_postal_code("Road 1112"), None);
        assert_eq!(extract_postal_code("10330 first 11120"), Some("10330"));
    }

    fn prepare(address: &str) -> String {
        let postal = find_postal_code(address).unwrap();
        prepare_address(address, postal.range())
    }

    #[test]
    fn test_find_postal_code_position() {
        let postal = find_postal_code("11120/5 Road 11120").unwrap();
        assert_eq!(postal.as_str(), "11120");
        assert_eq!(postal.range(), 13..18);
    }

    #[test]
    fn test_prepare_removes_postal_code_and_markers() {
        let prepared = prepare("ต.ลุมพินี อ.ปทุมวัน จ.กรุงเทพ 10330");
        assert!(!prepared.contains("10330"));
        assert!(!prepared.contains("ต."));
        assert!(!prepared.contains("อ."));
        assert!(!prepared.contains("จ."));
        assert_eq!(prepared, "ลุมพินี ปทุมวัน กรุงเทพมหานคร");
    }

    #[test]
    fn test_prepare_expands_bangkok() {
        assert_eq!(prepare("กทม. 10330"), BANGKOK);
        assert_eq!(prepare("สีลม กทม 10500"), "สีลม กรุงเทพมหานคร");
        assert_eq!(prepare("กรุงเทพฯ 10500"), BANGKOK);
        // only whole tokens are expanded
        assert_eq!(prepare("กทม.x 10500"), "กทม.x");
    }

    #[test]
    fn test_prepare_strips_bangkok_markers() {
        assert_eq!(prepare("1 แขวงลุมพินี เขต.ปทุมวัน 10330"), "1 ลุมพินี ปทุมวัน");
    }

    #[test]
    fn test_prepare_removes_thailand_and_trims() {
        assert_eq!(prepare("  Bangkok  Thailand  10330  "), "Bangkok");
    }

    #[test]
    fn test_prepare_keeps_inner_spacing() {
        assert_eq!(prepare("126/548  Road   Name Nonthaburi 11120"), "126/548  Road   Name Nonthaburi");
    }

    #[test]
    fn test_prepare_removes_matched_postal_code_only() {
        assert_eq!(prepare("11120/5 Road Nonthaburi 11120"), "11120/5 Road Nonthaburi");
    }

    #[test]
    fn test_match_score() {
        let lumphini = record("Bangkok", "Pathum Wan", "Lumphini", "10330");
        assert_eq!(match_score(&lumphini, "Bangkok Pathum Wan Lumphini"), 3);
        assert_eq!(match_score(&lumphini, "Bangkok Pathum Wan"), 2);
        assert_eq!(match_score(&lumphini, "Bangkok"), 1);
        assert_eq!(match_score(&lumphini, "Non-existent location"), 0);
    }

    #[test]
    fn test_best_match_requires_full_score() {
        let candidates = vec![
            record("Bangkok", "Pathum Wan", "Lumphini", "10330"),
            record("Bangkok", "Sathon", "Thung Maha Mek", "10120"),
        ];
        assert_eq!(
            best_match(&candidates, "Bangkok Pathum Wan Lumphini"),
            Some(&candidates[0])
        );
        assert_eq!(best_match(&candidates, "Bangkok Pathum Wan"), None);
        assert_eq!(best_match(&[], "Bangkok"), None);
    }

    #[test]
    fn test_best_match_prefers_first_on_tie() {
        let candidates = vec![
            record("Bangkok", "Pathum Wan", "Lumphini", "10330"),
            record("Bangkok", "Pathum Wan", "Lumphini", "10331"),
        ];
        let best = best_match(&candidates, "Lumphini Pathum Wan Bangkok").unwrap();
        assert_eq!(best.postal_code, "10330");
    }

    #[test]
    fn test_cleanup_address() {
        let pak_kret = record("Nonthaburi", "Pak Kret", "Pak Kret", "11120");
        assert_eq!(
            cleanup_address("126/548 Road Name Pak Kret Pak Kret Nonthaburi", &pak_kret),
            "126/548 Road Name"
        );
        assert_eq!(cleanup_address("Pak Kret Pak Kret Nonthaburi", &pak_kret), "");

        let tai = record("Krabi", "Khlong Thom", "Khlong Thom Tai", "81120");
        assert_eq!(
            cleanup_address("5 Moo 2 Khlong Thom Tai Khlong Thom Krabi", &tai),
            "5 Moo 2"
        );
    }

    #[test]
    fn test_split_english_address() {
        let input = "126/548 Road Name Pak Kret Pak Kret Nonthaburi Thailand 11120";
        let original = input.to_string();

        let result = english().split(input).unwrap();
        assert_eq!(
            result,
            SplitAddress {
                address: "126/548 Road Name".to_string(),
                province: "Nonthaburi".to_string(),
                district: "Pak Kret".to_string(),
                sub_district: "Pak Kret".to_string(),
                postal_code: "11120".to_string(),
            }
        );
        assert_eq!(input, original);
    }

    #[test]
    fn test_split_picks_fully_matching_candidate() {
        let result = english()
            .split("5 Moo 2 Khlong Thom Tai Khlong Thom Krabi 81120")
            .unwrap();
        assert_eq!(result.sub_district, "Khlong Thom Tai");
        assert_eq!(result.district, "Khlong Thom");
        assert_eq!(result.address, "5 Moo 2");
    }

    #[test]
    fn test_split_tie_goes_to_store_order() {
        // "Pak Kret" sub-district comes first and also scores 3
        let result = english()
            .split("99 Moo 3 Bang Talat Pak Kret Nonthaburi 11120")
            .unwrap();
        assert_eq!(result.sub_district, "Pak Kret");
    }

    #[test]
    fn test_split_house_number_containing_postal_code() {
        let result = english()
            .split("11120/5 Road Pak Kret Pak Kret Nonthaburi 11120")
            .unwrap();
        assert_eq!(result.address, "11120/5 Road");
        assert_eq!(result.postal_code, "11120");
        assert_eq!(result.province, "Nonthaburi");
    }

    #[test]
    fn test_split_keeps_residual_spacing() {
        let result = english()
            .split("126/548  Road   Name Pak Kret Pak Kret Nonthaburi Thailand 11120")
            .unwrap();
        assert_eq!(result.address, "126/548  Road   Name");
    }

    #[test]
    fn test_split_without_postal_code() {
        assert_eq!(english().split("126/548 Road Name"), None);
    }

    #[test]
    fn test_split_missing_province() {
        assert_eq!(
            english().split("126/548 Road Name Pak Kret Pak Kret Thailand 11120"),
            None
        );
    }

    #[test]
    fn test_split_unknown_postal_code() {
        assert_eq!(
            english().split("1 Road Pak Kret Pak Kret Nonthaburi 99999"),
            None
        );
    }

    #[test]
    fn test_split_thai_address() {
        let result = thai()
            .split("126/548 ถ.สุขาประชาสรรค์ ม.การเคหะนนท์ ปากเกร็ด ปากเกร็ด นนทบุรี Thailand 11120")
            .unwrap();
        assert_eq!(result.address, "126/548 ถ.สุขาประชาสรรค์ ม.การเคหะนนท์");
        assert_eq!(result.sub_district, "ปากเกร็ด");
        assert_eq!(result.district, "ปากเกร็ด");
        assert_eq!(result.province, "นนทบุรี");
        assert_eq!(result.postal_code, "11120");
    }

    #[test]
    fn test_split_thai_bangkok_abbreviation() {
        let result = thai()
            .split("เลขที่ 1 แขวงลุมพินี เขตปทุมวัน กทม. 10330")
            .unwrap();
        assert_eq!(result.address, "เลขที่ 1");
        assert_eq!(result.sub_district, "ลุมพินี");
        assert_eq!(result.district, "ปทุมวัน");
        assert_eq!(result.province, BANGKOK);
    }

    #[test]
    fn test_split_batch_keeps_order() {
        let results = english().split_batch(&[
            "126/548 Road Name",
            "126/548 Road Name Pak Kret Pak Kret Nonthaburi Thailand 11120",
        ]);
        assert_eq!(results.len(), 2);
        assert!(results[0].is_none());
        assert_eq!(results[1].as_ref().unwrap().province, "Nonthaburi");
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn test_split_batch_parallel_matches_sequential() {
        let splitter = english();
        let addresses = [
            "126/548 Road Name Pak Kret Pak Kret Nonthaburi Thailand 11120",
            "no postal code",
            "5 Moo 2 Khlong Thom Tai Khlong Thom Krabi 81120",
        ];
        assert_eq!(
            splitter.split_batch_parallel(&addresses),
            splitter.split_batch(&addresses)
        );
    }
}
