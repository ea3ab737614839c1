//! Record types shared across the harvest pipeline
//!
//! # Components
//!
//! - `ListingSummary`: one card scraped from a district results page
//! - `ListingDetail`: the fixed attribute set from a listing's own page
//! - `CardRef`: the `(card_id, url)` input pair for detail fetching
//! - `District`: one collection scope (small integer id + short name)
//!
//! All record types derive serde so the CSV layer can write and reload them
//! without hand-rolled row mapping. Field order defines the column order.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// One listing card scraped from a results page
///
/// A record missing `url` or `card_id` never reaches this type: validation
/// drops it at extraction time. Once appended to a district's output set the
/// record is immutable; the set is rewritten wholesale on each save.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListingSummary {
    pub title: Option<String>,
    pub url: String,
    pub price_raw: Option<String>,
    pub price_value: Option<f64>,
    pub price_currency: Option<String>,
    pub location_text: Option<String>,
    pub posted_date_raw: Option<String>,
    pub posted_date: Option<NaiveDate>,
    pub time_raw: Option<String>,
    pub card_id: String,
    pub district_id: u32,
    pub district_name: String,
}

/// Attributes obtainable only from a listing's own page
///
/// Once a `card_id` appears in the persisted detail set it is treated as
/// permanently done and never re-fetched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListingDetail {
    pub card_id: String,
    pub area: Option<f64>,
    pub number_rooms: Option<String>,
    pub furniture: Option<Furniture>,
    #[serde(default)]
    pub condition: Condition,
    pub date: Option<NaiveDate>,
}

impl ListingDetail {
    /// An empty detail record for a card: every field absent or unspecified.
    pub fn empty(card_id: impl Into<String>) -> Self {
        Self {
            card_id: card_id.into(),
            area: None,
            number_rooms: None,
            furniture: None,
            condition: Condition::Unspecified,
            date: None,
        }
    }
}

/// Input pair consumed by the detail engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardRef {
    pub card_id: String,
    pub url: String,
}

/// Whether a listing is furnished, as stated by the seller
///
/// Tri-state through `Option<Furniture>`: the parameter block may omit the
/// label entirely. On the wire this is `1` / `0` / empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Furniture {
    Yes,
    No,
}

impl Serialize for Furniture {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(match self {
            Furniture::Yes => 1,
            Furniture::No => 0,
        })
    }
}

impl<'de> Deserialize<'de> for Furniture {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match u8::deserialize(deserializer)? {
            1 => Ok(Furniture::Yes),
            0 => Ok(Furniture::No),
            other => Err(serde::de::Error::custom(format!(
                "furniture flag must be 0 or 1, got {}",
                other
            ))),
        }
    }
}

/// Renovation state of a listing
///
/// A sum type rather than `Option<String>`: "the site said nothing" is a
/// value of its own, carried through persistence as the explicit
/// `"Not Specified"` sentinel instead of an empty cell.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Condition {
    Specified(String),
    #[default]
    Unspecified,
}

/// Sentinel written for `Condition::Unspecified`
const CONDITION_SENTINEL: &str = "Not Specified";

impl Condition {
    pub fn as_label(&self) -> &str {
        match self {
            Condition::Specified(label) => label,
            Condition::Unspecified => CONDITION_SENTINEL,
        }
    }
}

impl Serialize for Condition {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_label())
    }
}

impl<'de> Deserialize<'de> for Condition {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed == CONDITION_SENTINEL {
            Ok(Condition::Unspecified)
        } else {
            Ok(Condition::Specified(trimmed.to_string()))
        }
    }
}

/// One district-scoped collection unit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct District {
    pub id: u32,
    pub name: String,
}

impl District {
    /// Filesystem stem for this district's output files.
    ///
    /// Spaces become underscores and the name is lowercased, so
    /// "Mirzo Ulugbek" and "mirzo ulugbek" land in the same file.
    pub fn file_stem(&self) -> String {
        self.name.replace(' ', "_").to_lowercase()
    }
}
