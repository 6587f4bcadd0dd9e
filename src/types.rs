//! Common types and enums for thai-address.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Label language of a record store generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// Thai script labels
    #[default]
    Thai,
    /// Romanized labels
    #[serde(rename = "eng")]
    English,
}

impl Language {
    /// Selector string used by the data files ("thai" / "eng").
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Thai => "thai",
            Language::English => "eng",
        }
    }

    /// Whether labels in this language are written in Latin script.
    pub fn is_latin(&self) -> bool {
        matches!(self, Language::English)
    }
}

impl FromStr for Language {
    type Err = crate::Error;

    fn from_str(code: &str) -> Result<Self, Self::Err> {
        match code.trim().to_lowercase().as_str() {
            "thai" | "th" => Ok(Language::Thai),
            "eng" | "en" | "english" => Ok(Language::English),
            other => Err(crate::Error::data_error(format!(
                "Unknown language selector: {other}"
            ))),
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Queryable fields of an [`ExpandedRecord`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    /// Province (changwat)
    Province,
    /// District (amphoe / khet)
    District,
    /// Sub-district (tambon / khwaeng)
    SubDistrict,
    /// Five digit postal code
    PostalCode,
}

impl Field {
    /// All queryable fields.
    pub const ALL: [Field; 4] = [
        Field::Province,
        Field::District,
        Field::SubDistrict,
        Field::PostalCode,
    ];

    /// Read this field from a record.
    pub fn value<'a>(&self, record: &'a ExpandedRecord) -> &'a str {
        match self {
            Field::Province => &record.province,
            Field::District => &record.district,
            Field::SubDistrict => &record.sub_district,
            Field::PostalCode => &record.postal_code,
        }
    }

    /// Field name as it appears in serialized records.
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Province => "province",
            Field::District => "district",
            Field::SubDistrict => "sub_district",
            Field::PostalCode => "postal_code",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One flattened sub-district entry of the gazetteer.
///
/// Geo codes are `None` when the generation was built without a geo
/// overlay, and `Some("")` when the overlay has no code for that node.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ExpandedRecord {
    /// Province name
    pub province: String,
    /// District name
    pub district: String,
    /// Sub-district name
    pub sub_district: String,
    /// Postal code, always five digits
    pub postal_code: String,
    /// Province geo code
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub province_code: Option<String>,
    /// District geo code
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub district_code: Option<String>,
    /// Sub-district geo code
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_district_code: Option<String>,
}

/// Structured result of splitting a free-text address.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SplitAddress {
    /// Residual free text (house number, road, village ...), trimmed at
    /// both ends with its inner spacing kept as written
    pub address: String,
    /// Matched province
    pub province: String,
    /// Matched district
    pub district: String,
    /// Matched sub-district
    pub sub_district: String,
    /// Postal code exactly as it appeared in the input
    pub postal_code: String,
}
