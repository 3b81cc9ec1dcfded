//! Catalog item types.

use std::fmt;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

/// Identifier of a media item.
///
/// The catalog API sends ids either as JSON numbers or strings. Both
/// spellings of the same integer address the same item (`2 == "2"`), so the
/// id is kept in its canonical text form and written back as a number when it
/// is one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MediaId(String);

impl MediaId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The id as an integer, if its canonical text form is one.
    pub fn as_integer(&self) -> Option<i64> {
        self.0
            .parse::<i64>()
            .ok()
            .filter(|n| n.to_string() == self.0)
    }
}

impl fmt::Display for MediaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<i64> for MediaId {
    fn from(id: i64) -> Self {
        Self(id.to_string())
    }
}

impl From<i32> for MediaId {
    fn from(id: i32) -> Self {
        Self(id.to_string())
    }
}

impl From<u64> for MediaId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

impl From<&str> for MediaId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for MediaId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl Serialize for MediaId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.as_integer() {
            Some(n) => serializer.serialize_i64(n),
            None => serializer.serialize_str(&self.0),
        }
    }
}

impl<'de> Deserialize<'de> for MediaId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(MediaIdVisitor)
    }
}

struct MediaIdVisitor;

impl<'de> Visitor<'de> for MediaIdVisitor {
    type Value = MediaId;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a media id (string or integer)")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<MediaId, E> {
        Ok(MediaId(v.to_string()))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<MediaId, E> {
        Ok(MediaId(v.to_string()))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<MediaId, E> {
        if v.is_finite() && v.fract() == 0.0 && v.abs() < i64::MAX as f64 {
            Ok(MediaId((v as i64).to_string()))
        } else {
            Ok(MediaId(v.to_string()))
        }
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<MediaId, E> {
        Ok(MediaId(v.to_string()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<MediaId, E> {
        Ok(MediaId(v))
    }
}

/// Kind of media behind a catalog item.
///
/// Only `recorded` changes how an item is filtered. Kinds the client does not
/// know are kept verbatim so they survive a round trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MediaType {
    LiveStream,
    Recorded,
    Other(String),
}

impl MediaType {
    pub fn as_str(&self) -> &str {
        match self {
            MediaType::LiveStream => "live-stream",
            MediaType::Recorded => "recorded",
            MediaType::Other(kind) => kind,
        }
    }
}

impl From<&str> for MediaType {
    fn from(kind: &str) -> Self {
        match kind {
            "live-stream" => MediaType::LiveStream,
            "recorded" => MediaType::Recorded,
            other => MediaType::Other(other.to_string()),
        }
    }
}

impl From<String> for MediaType {
    fn from(kind: String) -> Self {
        match kind.as_str() {
            "live-stream" => MediaType::LiveStream,
            "recorded" => MediaType::Recorded,
            _ => MediaType::Other(kind),
        }
    }
}

impl From<MediaType> for String {
    fn from(kind: MediaType) -> Self {
        match kind {
            MediaType::Other(kind) => kind,
            known => known.as_str().to_string(),
        }
    }
}

/// Read a field that may be `null`, falling back to its default.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Read `type` leniently: any string is a kind, anything else is no kind.
fn lenient_media_type<'de, D>(deserializer: D) -> Result<Option<MediaType>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(kind)) => Ok(Some(MediaType::from(kind))),
        Some(Value::Null) | None => Ok(None),
        Some(other) => {
            tracing::debug!("Ignoring non-string media type {}", other);
            Ok(None)
        }
    }
}

/// A catalog entry as delivered by the remote API.
///
/// Fields the client does not interpret are kept in `extra` and written
/// back unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaItem {
    pub id: MediaId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_live: bool,
    #[serde(
        rename = "type",
        default,
        deserialize_with = "lenient_media_type",
        skip_serializing_if = "Option::is_none"
    )]
    pub media_type: Option<MediaType>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl MediaItem {
    pub fn new(id: impl Into<MediaId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            is_live: false,
            media_type: None,
            extra: Map::new(),
        }
    }

    pub fn with_live(mut self, is_live: bool) -> Self {
        self.is_live = is_live;
        self
    }

    pub fn with_type(mut self, media_type: MediaType) -> Self {
        self.media_type = Some(media_type);
        self
    }

    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(name.into(), value.into());
        self
    }

    pub fn is_recorded(&self) -> bool {
        matches!(self.media_type, Some(MediaType::Recorded))
    }
}
