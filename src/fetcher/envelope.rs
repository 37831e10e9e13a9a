//! Wire types for Flickr REST responses
//!
//! The JSON envelope carries numeric fields inconsistently (numbers in
//! recent responses, strings in older ones), so the pagination and stats
//! counters accept either representation.

use serde::{Deserialize, Deserializer};

use crate::PhotoStat;

fn u32_flexible<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Num(u32),
        Str(String),
    }
    match Raw::deserialize(deserializer)? {
        Raw::Num(n) => Ok(n),
        Raw::Str(s) => s.parse().map_err(serde::de::Error::custom),
    }
}

fn u64_flexible<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Num(u64),
        Str(String),
    }
    match Raw::deserialize(deserializer)? {
        Raw::Num(n) => Ok(n),
        Raw::Str(s) => s.parse().map_err(serde::de::Error::custom),
    }
}

/// Top-level status fields present on every REST response.
#[derive(Debug, Clone, Deserialize)]
pub struct RestStatus {
    /// `"ok"` on success, `"fail"` on an API error
    pub stat: String,
    /// Error code, present when `stat` is `"fail"`
    #[serde(default)]
    pub code: Option<i64>,
    /// Error message, present when `stat` is `"fail"`
    #[serde(default)]
    pub message: Option<String>,
}

/// Successful `flickr.stats.getPopularPhotos` response body.
#[derive(Debug, Clone, Deserialize)]
pub struct PopularPhotosResponse {
    /// Pagination envelope with the page's records
    pub photos: PhotosEnvelope,
}

/// One page of popular-photo results plus pagination metadata.
#[derive(Debug, Clone, Deserialize)]
pub struct PhotosEnvelope {
    /// Current page number (1-based)
    #[serde(deserialize_with = "u32_flexible")]
    pub page: u32,
    /// Total page count for the date
    #[serde(deserialize_with = "u32_flexible")]
    pub pages: u32,
    /// Page size the server applied
    #[serde(deserialize_with = "u32_flexible")]
    pub perpage: u32,
    /// Total record count for the date
    #[serde(deserialize_with = "u32_flexible")]
    pub total: u32,
    /// Records on this page
    #[serde(default, rename = "photo")]
    pub photos: Vec<PhotoEntry>,
}

/// One photo record as returned by the stats endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct PhotoEntry {
    /// Photo identifier
    pub id: String,
    /// Photo title
    #[serde(default)]
    pub title: String,
    /// Photo secret token
    #[serde(default)]
    pub secret: String,
    /// Server identifier
    #[serde(default)]
    pub server: String,
    /// Per-day view/favorite counters
    pub stats: PhotoStatCounts,
}

/// Nested per-day counters for one photo.
#[derive(Debug, Clone, Deserialize)]
pub struct PhotoStatCounts {
    /// Daily views
    #[serde(deserialize_with = "u64_flexible")]
    pub views: u64,
    /// Daily favorites
    #[serde(default, deserialize_with = "u64_flexible")]
    pub favorites: u64,
}

impl From<PhotoEntry> for PhotoStat {
    fn from(entry: PhotoEntry) -> Self {
        Self {
            id: entry.id,
            title: entry.title,
            views: entry.stats.views,
            favorites: entry.stats.favorites,
            secret: entry.secret,
            server: entry.server,
        }
    }
}

/// Successful `flickr.test.login` response body.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    /// Authenticated user
    pub user: LoginUser,
}

/// User block of a `flickr.test.login` response.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginUser {
    /// User NSID
    pub id: String,
    /// Username wrapper
    #[serde(default)]
    pub username: Option<ContentField>,
}

/// Flickr's `{ "_content": ... }` wrapper for text fields.
#[derive(Debug, Clone, Deserialize)]
pub struct ContentField {
    /// Wrapped text value
    #[serde(rename = "_content")]
    pub content: String,
}
