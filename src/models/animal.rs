//! Animal record data structure.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{AppError, Result};

/// Listing identifier (`nid`), kept in whatever shape the source sent it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Number(i64),
    Text(String),
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Number(n) => write!(f, "{}", n),
            RecordId::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for RecordId {
    fn from(s: &str) -> Self {
        RecordId::Text(s.to_string())
    }
}

impl From<i64> for RecordId {
    fn from(n: i64) -> Self {
        RecordId::Number(n)
    }
}

/// One cat listing as served by the listing API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimalRecord {
    /// Unique key within a snapshot
    #[serde(rename = "nid")]
    pub id: RecordId,

    /// Display name
    #[serde(rename = "title", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Site-relative link to the listing page
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// Thumbnail image URL
    #[serde(
        rename = "field_animal_thumbnail",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub thumbnail: Option<String>,

    /// Birth date, `YYYY-MM-DD`
    #[serde(
        rename = "field_animal_age",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub birth_date: Option<String>,

    /// Empty when not reserved
    #[serde(
        rename = "field_animal_reserved",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub reserved: Option<String>,

    /// Empty when not rehomed
    #[serde(
        rename = "field_animal_rehomed",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub rehomed: Option<String>,

    #[serde(
        rename = "field_animal_sex",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub sex: Option<String>,

    /// Raw "can live with other cats" value
    #[serde(
        rename = "field_animal_cat_suitability",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub cat_suitability: Option<String>,

    /// Rescue centre holding the cat
    #[serde(
        rename = "field_animal_centre",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub centre: Option<String>,

    #[serde(
        rename = "field_animal_date_published",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub date_published: Option<String>,

    /// Human-readable age, filled in by the normalizer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<String>,

    /// Every other key the source sent, written back untouched
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl AnimalRecord {
    /// Create a record with only an identifier and empty statuses.
    pub fn new(id: impl Into<RecordId>) -> Self {
        Self {
            id: id.into(),
            name: None,
            path: None,
            thumbnail: None,
            birth_date: None,
            reserved: Some(String::new()),
            rehomed: Some(String::new()),
            sex: None,
            cat_suitability: None,
            centre: None,
            date_published: None,
            age: None,
            extra: Map::new(),
        }
    }

    /// Reservation status, failing if the source omitted the field.
    pub fn reserved_status(&self) -> Result<&str> {
        self.reserved
            .as_deref()
            .ok_or_else(|| AppError::malformed(&self.id, "missing field_animal_reserved"))
    }

    /// Rehomed status, failing if the source omitted the field.
    pub fn rehomed_status(&self) -> Result<&str> {
        self.rehomed
            .as_deref()
            .ok_or_else(|| AppError::malformed(&self.id, "missing field_animal_rehomed"))
    }

    pub fn is_reserved(&self) -> bool {
        self.reserved.as_deref().is_some_and(|s| !s.is_empty())
    }

    pub fn is_rehomed(&self) -> bool {
        self.rehomed.as_deref().is_some_and(|s| !s.is_empty())
    }

    /// Status shown in the digest: the reservation if any, else the rehoming.
    pub fn status_label(&self) -> &str {
        match self.reserved.as_deref() {
            Some(reserved) if !reserved.is_empty() => reserved,
            _ => self.rehomed.as_deref().unwrap_or_default(),
        }
    }
}
