//! Facebook Graph API Data Transfer Objects
//!
//! These types match EXACTLY what the Graph API returns.
//! DO NOT add fields that aren't in the API response.
//! DO NOT use these types outside the facebook module - convert to domain types.
//!
//! API Reference: https://developers.facebook.com/docs/graph-api
//!
//! Example albums response:
//! ```json
//! {
//!   "data": [
//!     { "id": "10101", "name": "Road Trip", "created_time": "2015-03-09T20:11:00+0000" }
//!   ],
//!   "paging": { "cursors": { "before": "...", "after": "..." } }
//! }
//! ```
//!
//! Paging is deliberately not modeled - this crate does not paginate.

use serde::Deserialize;

/// Envelope for `/{user}/albums`
#[derive(Debug, Clone, Deserialize)]
pub struct AlbumsResponse {
    #[serde(default)]
    pub data: Vec<AlbumEntry>,
    /// Present instead of `data` when the call failed
    pub error: Option<ApiError>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AlbumEntry {
    pub id: String,
    pub name: Option<String>,
    /// ISO 8601, e.g. "2015-03-09T20:11:00+0000"
    pub created_time: Option<String>,
}

/// Envelope for `/{album}/photos`
#[derive(Debug, Clone, Deserialize)]
pub struct PhotosResponse {
    #[serde(default)]
    pub data: Vec<PhotoEntry>,
    pub error: Option<ApiError>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PhotoEntry {
    pub id: String,
    /// URL of the full-size image; occasionally absent
    pub source: Option<String>,
}

/// Graph API error object
#[derive(Debug, Clone, Deserialize)]
pub struct ApiError {
    pub message: String,
    #[serde(rename = "type")]
    pub error_type: Option<String>,
    pub code: Option<i64>,
}

// ============================================================================
// CONTRACT TESTS
// These verify our DTOs match what the real API returns.
// If these fail, the API has changed and we need to update our DTOs.
// ============================================================================

#[cfg(test)]
mod contract_tests {
    use super::*;

    #[test]
    fn test_parse_albums_response() {
        let json = r#"{
            "data": [
                { "id": "10101", "name": "Road Trip", "created_time": "2015-03-09T20:11:00+0000" },
                { "id": "10102", "name": "Mobile Uploads" }
            ],
            "paging": { "cursors": { "before": "MTAxMDE=", "after": "MTAxMDI=" } }
        }"#;

        let response: AlbumsResponse =
            serde_json::from_str(json).expect("Should parse albums response");

        assert!(response.error.is_none());
        assert_eq!(response.data.len(), 2);
        assert_eq!(response.data[0].id, "10101");
        assert_eq!(response.data[0].name.as_deref(), Some("Road Trip"));
        assert_eq!(
            response.data[0].created_time.as_deref(),
            Some("2015-03-09T20:11:00+0000")
        );
        assert!(response.data[1].created_time.is_none());
    }

    #[test]
    fn test_parse_empty_data() {
        let json = r#"{ "data": [] }"#;

        let response: AlbumsResponse = serde_json::from_str(json).expect("Should parse empty data");
        assert!(response.data.is_empty());
    }

    #[test]
    fn test_parse_error_envelope() {
        let json = r#"{
            "error": {
                "message": "Invalid OAuth access token.",
                "type": "OAuthException",
                "code": 190
            }
        }"#;

        let response: AlbumsResponse =
            serde_json::from_str(json).expect("Should parse error envelope");

        let error = response.error.unwrap();
        assert_eq!(error.message, "Invalid OAuth access token.");
        assert_eq!(error.error_type.as_deref(), Some("OAuthException"));
        assert_eq!(error.code, Some(190));
        assert!(response.data.is_empty());
    }

    #[test]
    fn test_parse_photos_response() {
        let json = r#"{
            "data": [
                { "id": "2001", "source": "https://scontent.example.com/p/2001_o.jpg" },
                { "id": "2002" }
            ]
        }"#;

        let response: PhotosResponse =
            serde_json::from_str(json).expect("Should parse photos response");

        assert_eq!(response.data.len(), 2);
        assert_eq!(
            response.data[0].source.as_deref(),
            Some("https://scontent.example.com/p/2001_o.jpg")
        );
        assert!(response.data[1].source.is_none());
    }
}
