//! Flickr REST API Data Transfer Objects
//!
//! These types match EXACTLY what the REST endpoints return with
//! `format=json&nojsoncallback=1`.
//! DO NOT add fields that aren't in the API response.
//! DO NOT use these types outside the flickr module - convert to domain types.
//!
//! API Reference: https://www.flickr.com/services/api/
//!
//! Example photosets.getList response:
//! ```json
//! {
//!   "photosets": {
//!     "photoset": [{
//!       "id": "72157650000000001",
//!       "date_create": "1388534400",
//!       "title": { "_content": "Winter 2014" }
//!     }]
//!   },
//!   "stat": "ok"
//! }
//! ```

use serde::Deserialize;

/// Envelope for flickr.photosets.getList
#[derive(Debug, Clone, Deserialize)]
pub struct PhotosetsResponse {
    /// "ok" or "fail"
    pub stat: String,
    pub photosets: Option<PhotosetList>,
    /// Error info when stat is "fail"
    pub code: Option<i64>,
    pub message: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PhotosetList {
    #[serde(default)]
    pub photoset: Vec<Photoset>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Photoset {
    pub id: String,
    pub title: Content,
    /// Unix timestamp, sent as a string
    pub date_create: Option<String>,
}

/// Flickr wraps many scalar fields in a `{ "_content": ... }` object
#[derive(Debug, Clone, Deserialize)]
pub struct Content {
    #[serde(rename = "_content")]
    pub content: String,
}

/// Envelope for flickr.photosets.getPhotos and flickr.people.getPublicPhotos.
///
/// The photo list arrives under `photoset` for the former and `photos` for
/// the latter; only one of the two is present in any response.
#[derive(Debug, Clone, Deserialize)]
pub struct PhotosResponse {
    pub stat: String,
    pub photoset: Option<PhotoList>,
    pub photos: Option<PhotoList>,
    pub code: Option<i64>,
    pub message: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PhotoList {
    #[serde(default)]
    pub photo: Vec<Photo>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Photo {
    pub id: String,
    pub secret: Option<String>,
    pub server: Option<String>,
    /// Farm arrives as a bare number
    pub farm: Option<u32>,
}

// ============================================================================
// CONTRACT TESTS
// These verify our DTOs match what the real API returns.
// If these fail, the API has changed and we need to update our DTOs.
// ============================================================================
