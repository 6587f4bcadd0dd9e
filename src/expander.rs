//! Gazetteer expansion into flat records.
//!
//! The gazetteer is a three level tree of fixed-shape arrays:
//!
//! ```text
//! province      [label, [district, ...]]
//! district      [label, [sub_district, ...]]
//! sub_district  [label, postal_code]
//! ```
//!
//! Labels are indices into the decoded word table of the active language.
//! The optional geo overlay is a flat array holding one slot per node in
//! depth-first order, so it is consumed in lockstep with the traversal.

use crate::error::{Error, Result};
use crate::types::ExpandedRecord;
use serde::{Deserialize, Serialize};

/// Top level gazetteer node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvinceNode(pub usize, pub Vec<DistrictNode>);

/// Second level gazetteer node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistrictNode(pub usize, pub Vec<SubDistrictNode>);

/// Leaf gazetteer node: label index and numeric postal code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubDistrictNode(pub usize, pub u32);

/// One slot of the geo overlay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GeoSlot {
    /// Integer administrative code
    Code(u64),
    /// Non-integer numeric code
    Number(f64),
    /// `false` marks a node without a code
    Flag(bool),
    /// `null` is treated like `false`
    Absent,
}

impl GeoSlot {
    /// Decimal string form, or an empty string when no code is available.
    pub fn to_code(&self) -> String {
        match self {
            GeoSlot::Code(code) => code.to_string(),
            GeoSlot::Number(value) => value.to_string(),
            GeoSlot::Flag(_) | GeoSlot::Absent => String::new(),
        }
    }
}

/// Number of geo slots a gazetteer consumes: one per province, district
/// and sub-district node.
pub fn node_count(hierarchy: &[ProvinceNode]) -> usize {
    hierarchy
        .iter()
        .map(|ProvinceNode(_, districts)| {
            1 + districts
                .iter()
                .map(|DistrictNode(_, leaves)| 1 + leaves.len())
                .sum::<usize>()
        })
        .sum()
}

/// Number of sub-district leaves, which is the number of expanded records.
pub fn leaf_count(hierarchy: &[ProvinceNode]) -> usize {
    hierarchy
        .iter()
        .flat_map(|ProvinceNode(_, districts)| districts)
        .map(|DistrictNode(_, leaves)| leaves.len())
        .sum()
}

/// Flatten the gazetteer into one record per sub-district, in traversal
/// order.
///
/// An empty gazetteer or word list yields no records. Out-of-range label
/// indices, postal codes that are not five digits, and a geo overlay whose
/// length differs from [`node_count`] are reported as errors.
pub fn expand(
    hierarchy: &[ProvinceNode],
    words: &[String],
    geo: Option<&[GeoSlot]>,
) -> Result<Vec<ExpandedRecord>> {
    if hierarchy.is_empty() || words.is_empty() {
        return Ok(Vec::new());
    }

    if let Some(slots) = geo {
        let expected = node_count(hierarchy);
        if slots.len() != expected {
            return Err(Error::GeoMisaligned {
                expected,
                actual: slots.len(),
            });
        }
    }

    let label = |index: usize| -> Result<&str> {
        words.get(index).map(String::as_str).ok_or_else(|| {
            Error::malformed(format!(
                "label index {index} out of range ({} words)",
                words.len()
            ))
        })
    };

    // Length was checked above, so `next()` only runs dry without an overlay.
    let mut slots = geo.map(|slots| slots.iter());
    let mut next_code = || -> Option<String> {
        slots
            .as_mut()
            .and_then(Iterator::next)
            .map(GeoSlot::to_code)
    };

    let mut records = Vec::with_capacity(leaf_count(hierarchy));

    for ProvinceNode(province_index, districts) in hierarchy {
        let province = label(*province_index)?;
        let province_code = next_code();

        for DistrictNode(district_index, leaves) in districts {
            let district = label(*district_index)?;
            let district_code = next_code();

            for SubDistrictNode(sub_district_index, postal_code) in leaves {
                let sub_district = label(*sub_district_index)?;
                if !(10_000..100_000).contains(postal_code) {
                    return Err(Error::malformed(format!(
                        "postal code {postal_code} of {sub_district} is not five digits"
                    )));
                }

                records.push(ExpandedRecord {
                    province: province.to_string(),
                    district: district.to_string(),
                    sub_district: sub_district.to_string(),
                    postal_code: postal_code.to_string(),
                    province_code: province_code.clone(),
                    district_code: district_code.clone(),
                    sub_district_code: next_code(),
                });
            }
        }
    }

    Ok(records)
}
