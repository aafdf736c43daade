//! Domain types for the tracking core with strong typing.
//!
//! Newtype wrappers keep user and content identifiers from being mixed up
//! across service boundaries, and the enums here replace stringly-typed
//! kind/provenance values at every seam above the database.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a tracked account.
///
/// # Examples
///
/// ```rust
/// use trackarr::domain::UserId;
///
/// let id = UserId::new(42);
/// assert_eq!(id.value(), 42);
/// assert_eq!(id.to_string(), "42");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct UserId(i32);

impl UserId {
    /// Creates a new `UserId` from a raw i32 value.
    #[must_use]
    pub const fn new(id: i32) -> Self {
        debug_assert!(id >= 0, "UserId should be non-negative");
        Self(id)
    }

    /// Returns the underlying i32 value.
    #[must_use]
    pub const fn value(&self) -> i32 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<UserId> for i32 {
    fn from(id: UserId) -> Self {
        id.0
    }
}

impl From<i32> for UserId {
    fn from(id: i32) -> Self {
        Self::new(id)
    }
}

impl Serialize for UserId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_i32(self.0)
    }
}

impl<'de> Deserialize<'de> for UserId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let id = i32::deserialize(deserializer)?;
        Ok(Self::new(id))
    }
}

/// Unique identifier for a content row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct ContentId(i32);

impl ContentId {
    /// Creates a new `ContentId` from a raw i32 value.
    #[must_use]
    pub const fn new(id: i32) -> Self {
        debug_assert!(id >= 0, "ContentId should be non-negative");
        Self(id)
    }

    /// Returns the underlying i32 value.
    #[must_use]
    pub const fn value(&self) -> i32 {
        self.0
    }
}

impl fmt::Display for ContentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<ContentId> for i32 {
    fn from(id: ContentId) -> Self {
        id.0
    }
}

impl From<i32> for ContentId {
    fn from(id: i32) -> Self {
        Self::new(id)
    }
}

impl Serialize for ContentId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_i32(self.0)
    }
}

impl<'de> Deserialize<'de> for ContentId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let id = i32::deserialize(deserializer)?;
        Ok(Self::new(id))
    }
}

/// Kind of a tracked title.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    Movie,
    Series,
}

impl ContentKind {
    /// Strict parse for caller-supplied kind hints. Returns `None` for
    /// anything other than "movie" or "series" (case-insensitive).
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "movie" => Some(Self::Movie),
            "series" => Some(Self::Series),
            _ => None,
        }
    }

    /// Lenient mapping for provider `Type` fields: "series" maps to
    /// `Series`, everything else (including "episode") to `Movie`.
    #[must_use]
    pub fn from_provider_type(value: &str) -> Self {
        if value.eq_ignore_ascii_case("series") {
            Self::Series
        } else {
            Self::Movie
        }
    }

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Movie => "movie",
            Self::Series => "series",
        }
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a single search candidate came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provenance {
    Database,
    External,
}

/// Overall origin of a search outcome: which side(s) contributed
/// candidates, or `NotFound` when neither did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchSource {
    Database,
    External,
    Mixed,
    NotFound,
}

impl SearchSource {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Database => "database",
            Self::External => "external",
            Self::Mixed => "mixed",
            Self::NotFound => "not_found",
        }
    }
}

impl fmt::Display for SearchSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_id_conversions() {
        let id = UserId::new(42);
        assert_eq!(id.value(), 42);
        assert_eq!(id.to_string(), "42");
        assert_eq!(i32::from(id), 42);
        assert_eq!(UserId::from(42), id);
    }

    #[test]
    fn content_id_equality() {
        let id1 = ContentId::new(1);
        let id2 = ContentId::new(1);
        let id3 = ContentId::new(2);
        assert_eq!(id1, id2);
        assert_ne!(id1, id3);
    }

    #[test]
    fn content_kind_strict_parse() {
        assert_eq!(ContentKind::parse("movie"), Some(ContentKind::Movie));
        assert_eq!(ContentKind::parse(" Series "), Some(ContentKind::Series));
        assert_eq!(ContentKind::parse("documentary"), None);
        assert_eq!(ContentKind::parse(""), None);
    }

    #[test]
    fn content_kind_provider_mapping_defaults_to_movie() {
        assert_eq!(
            ContentKind::from_provider_type("series"),
            ContentKind::Series
        );
        assert_eq!(ContentKind::from_provider_type("movie"), ContentKind::Movie);
        assert_eq!(
            ContentKind::from_provider_type("episode"),
            ContentKind::Movie
        );
    }

    #[test]
    fn search_source_serializes_snake_case() {
        let json = serde_json::to_string(&SearchSource::NotFound).unwrap();
        assert_eq!(json, "\"not_found\"");
        let json = serde_json::to_string(&SearchSource::Mixed).unwrap();
        assert_eq!(json, "\"mixed\"");
    }

    #[test]
    fn provenance_serializes_lowercase() {
        let json = serde_json::to_string(&Provenance::Database).unwrap();
        assert_eq!(json, "\"database\"");
    }

    #[test]
    fn user_id_serialization() {
        let id = UserId::new(42);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "42");
        let deserialized: UserId = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, id);
    }
}
