//! Sort and filter options for catalog reads.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::media::{MediaId, MediaItem};

/// Accumulated catalog: every item ever ingested, keyed by id.
pub type CatalogIndex = HashMap<MediaId, MediaItem>;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("invalid sort direction {0}, expected 1 or -1")]
    InvalidSortDirection(i64),
}

/// Sort direction, written as `1` / `-1` on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    /// Apply the direction to an ascending comparison result.
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    }
}

impl TryFrom<i64> for SortDirection {
    type Error = CatalogError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(SortDirection::Ascending),
            -1 => Ok(SortDirection::Descending),
            other => Err(CatalogError::InvalidSortDirection(other)),
        }
    }
}

impl From<SortDirection> for i64 {
    fn from(direction: SortDirection) -> Self {
        match direction {
            SortDirection::Ascending => 1,
            SortDirection::Descending => -1,
        }
    }
}

/// Field and direction applied on every catalog read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortOptions {
    pub by: String,
    pub dir: SortDirection,
}

impl Default for SortOptions {
    fn default() -> Self {
        Self {
            by: "title".to_string(),
            dir: SortDirection::Ascending,
        }
    }
}

impl SortOptions {
    /// Compare two items on the configured field.
    pub fn compare(&self, a: &MediaItem, b: &MediaItem) -> Ordering {
        let left = SortValue::of(a, &self.by);
        let right = SortValue::of(b, &self.by);
        self.dir.apply(left.compare(&right))
    }
}

/// Value of a single item field, as seen by the comparator.
///
/// Mixed or missing values get a fixed ranking instead of being treated as
/// equal: missing < bool < number < text. Arrays and objects count as
/// missing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SortValue<'a> {
    Missing,
    Bool(bool),
    Number(f64),
    Text(&'a str),
}

impl<'a> SortValue<'a> {
    /// Extract `field` from `item`. Field names follow the wire format
    /// (`title`, `isLive`, `type`, `id`, or any extra field).
    pub fn of(item: &'a MediaItem, field: &str) -> Self {
        match field {
            "id" => match item.id.as_integer() {
                Some(n) => SortValue::Number(n as f64),
                None => SortValue::Text(item.id.as_str()),
            },
            "title" => SortValue::Text(&item.title),
            "isLive" => SortValue::Bool(item.is_live),
            "type" => item
                .media_type
                .as_ref()
                .map_or(SortValue::Missing, |t| SortValue::Text(t.as_str())),
            other => item
                .extra
                .get(other)
                .map_or(SortValue::Missing, SortValue::from_json),
        }
    }

    fn from_json(value: &'a Value) -> Self {
        match value {
            Value::Bool(b) => SortValue::Bool(*b),
            Value::Number(n) => n.as_f64().map_or(SortValue::Missing, SortValue::Number),
            Value::String(s) => SortValue::Text(s),
            Value::Null | Value::Array(_) | Value::Object(_) => SortValue::Missing,
        }
    }

    fn rank(&self) -> u8 {
        match self {
            SortValue::Missing => 0,
            SortValue::Bool(_) => 1,
            SortValue::Number(_) => 2,
            SortValue::Text(_) => 3,
        }
    }

    /// Ascending comparison.
    pub fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (SortValue::Bool(a), SortValue::Bool(b)) => a.cmp(b),
            (SortValue::Number(a), SortValue::Number(b)) => {
                a.partial_cmp(b).unwrap_or(Ordering::Equal)
            }
            (SortValue::Text(a), SortValue::Text(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

/// Catalog filter token.
///
/// Unknown tokens are accepted and behave like `*`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FilterBy {
    #[default]
    All,
    Live,
    Offline,
    Video,
}

impl FilterBy {
    /// Parse a filter token leniently.
    pub fn from_token(token: &str) -> Self {
        match token {
            "live" => FilterBy::Live,
            "offline" => FilterBy::Offline,
            "video" => FilterBy::Video,
            "*" => FilterBy::All,
            other => {
                tracing::debug!("Unknown filter token '{}', showing everything", other);
                FilterBy::All
            }
        }
    }

    pub fn token(&self) -> &'static str {
        match self {
            FilterBy::All => "*",
            FilterBy::Live => "live",
            FilterBy::Offline => "offline",
            FilterBy::Video => "video",
        }
    }

    pub fn matches(&self, item: &MediaItem) -> bool {
        match self {
            FilterBy::All => true,
            FilterBy::Live => item.is_live,
            FilterBy::Offline => !item.is_live,
            FilterBy::Video => item.is_recorded(),
        }
    }
}

impl From<&str> for FilterBy {
    fn from(token: &str) -> Self {
        FilterBy::from_token(token)
    }
}

impl From<String> for FilterBy {
    fn from(token: String) -> Self {
        FilterBy::from_token(&token)
    }
}

impl From<FilterBy> for String {
    fn from(filter: FilterBy) -> Self {
        filter.token().to_string()
    }
}

impl fmt::Display for FilterBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}
