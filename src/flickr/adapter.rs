//! Flickr service adapter.
//!
//! Builds deferred REST requests and converts DTO responses into canonical
//! albums and images. This is the ONLY place Flickr DTOs become domain
//! types.
//!
//! Flickr's set listing cannot be filtered server-side, so filter hints are
//! applied here in the transform. Beyond the account's named photosets, the
//! photostream (photos not gathered into any set) is exposed as a synthetic
//! album; fetching its images uses a different endpoint than a photoset's,
//! which stays entirely internal to this adapter.

use chrono::{DateTime, Utc};

use super::dto;
use crate::adapter::{ServiceAdapter, ensure_owned};
use crate::credentials::Credential;
use crate::domain::{AggregateError, Album, FilterOptions, Image, Service};
use crate::executor::RequestDescriptor;
use crate::transport::HttpRequest;

/// Remote id of the synthetic album for the account's photostream.
const PHOTOSTREAM_ID: &str = "photostream";
const PHOTOSTREAM_TITLE: &str = "Photostream";

const DEFAULT_BASE_URL: &str = "https://api.flickr.com/services/rest";

/// Flickr adapter
///
/// Credentials: `token` carries the API key, `user_id` the account NSID.
pub struct FlickrAdapter {
    base_url: String,
}

impl FlickrAdapter {
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Create an adapter for testing with custom base URL
    #[cfg(test)]
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    fn method_url(&self, method: &str, api_key: &str, params: &[(&str, &str)]) -> String {
        let mut url = format!(
            "{}?method={}&api_key={}&format=json&nojsoncallback=1",
            self.base_url,
            method,
            urlencoding::encode(api_key)
        );
        for (name, value) in params {
            url.push_str(&format!("&{name}={}", urlencoding::encode(value)));
        }
        url
    }
}

impl Default for FlickrAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl ServiceAdapter for FlickrAdapter {
    fn service(&self) -> Service {
        Service::Flickr
    }

    fn find_albums(
        &self,
        credential: Option<&Credential>,
        filter: &FilterOptions,
    ) -> Result<RequestDescriptor<Album>, AggregateError> {
        let credential = credential.ok_or(AggregateError::MissingCredential(Service::Flickr))?;
        let (Some(api_key), Some(user_id)) =
            (credential.token.as_deref(), credential.user_id.as_deref())
        else {
            return Err(AggregateError::MissingCredential(Service::Flickr));
        };

        let url = self.method_url("flickr.photosets.getList", api_key, &[("user_id", user_id)]);

        let owner = credential.clone();
        let filter = filter.clone();
        Ok(RequestDescriptor::new(
            Service::Flickr,
            HttpRequest::get(url),
            move |body| to_albums(parse_json(body)?, &owner, &filter),
        ))
    }

    fn find_album_images(
        &self,
        album: &Album,
    ) -> Result<RequestDescriptor<Image>, AggregateError> {
        ensure_owned(Service::Flickr, album)?;
        let Some(api_key) = album.owner.token.as_deref() else {
            return Err(AggregateError::MissingCredential(Service::Flickr));
        };

        // The photostream is not a real photoset and has its own endpoint.
        let url = if album.remote_id == PHOTOSTREAM_ID {
            let Some(user_id) = album.owner.user_id.as_deref() else {
                return Err(AggregateError::MissingCredential(Service::Flickr));
            };
            self.method_url(
                "flickr.people.getPublicPhotos",
                api_key,
                &[("user_id", user_id)],
            )
        } else {
            self.method_url(
                "flickr.photosets.getPhotos",
                api_key,
                &[("photoset_id", &album.remote_id)],
            )
        };

        Ok(RequestDescriptor::new(
            Service::Flickr,
            HttpRequest::get(url),
            move |body| to_images(parse_json(body)?),
        ))
    }
}

fn parse_json<T: serde::de::DeserializeOwned>(body: &[u8]) -> Result<T, AggregateError> {
    serde_json::from_slice(body).map_err(|e| AggregateError::Parse(e.to_string()))
}

fn check_stat(stat: &str, code: Option<i64>, message: Option<&str>) -> Result<(), AggregateError> {
    if stat == "ok" {
        return Ok(());
    }
    Err(AggregateError::Api(format!(
        "{} (code {})",
        message.unwrap_or("unknown error"),
        code.unwrap_or(-1)
    )))
}

/// Convert a getList response into canonical albums, applying filter hints.
fn to_albums(
    response: dto::PhotosetsResponse,
    owner: &Credential,
    filter: &FilterOptions,
) -> Result<Vec<Album>, AggregateError> {
    check_stat(&response.stat, response.code, response.message.as_deref())?;

    let sets = response
        .photosets
        .map(|list| list.photoset)
        .unwrap_or_default();

    let mut albums = Vec::with_capacity(sets.len() + 1);
    for set in sets {
        let created = set.date_create.as_deref().and_then(parse_unix_timestamp);
        if !filter.matches_album(&set.id, &set.title.content, created) {
            continue;
        }
        albums.push(Album {
            title: set.title.content,
            remote_id: set.id,
            service: Service::Flickr,
            owner: owner.clone(),
        });
    }

    // The photostream has no creation date, so only the id/name hints apply.
    if filter.matches_album(PHOTOSTREAM_ID, PHOTOSTREAM_TITLE, None) {
        albums.push(Album {
            title: PHOTOSTREAM_TITLE.to_string(),
            remote_id: PHOTOSTREAM_ID.to_string(),
            service: Service::Flickr,
            owner: owner.clone(),
        });
    }

    Ok(albums)
}

/// Convert a photo-list response (either container) into canonical images.
fn to_images(response: dto::PhotosResponse) -> Result<Vec<Image>, AggregateError> {
    check_stat(&response.stat, response.code, response.message.as_deref())?;

    let photos = response
        .photoset
        .or(response.photos)
        .map(|list| list.photo)
        .unwrap_or_default();

    Ok(photos
        .into_iter()
        .filter_map(|photo| {
            let url = source_url(&photo)?;
            Some(Image {
                url,
                remote_id: Some(photo.id),
            })
        })
        .collect())
}

/// Synthesize the static-farm URL for a photo's largest representation.
///
/// A photo missing any addressing field cannot be resolved to a URL and is
/// dropped rather than emitted partially.
fn source_url(photo: &dto::Photo) -> Option<String> {
    let farm = photo.farm?;
    let server = photo.server.as_deref().filter(|s| !s.is_empty())?;
    let secret = photo.secret.as_deref().filter(|s| !s.is_empty())?;
    Some(format!(
        "https://farm{farm}.staticflickr.com/{server}/{id}_{secret}_b.jpg",
        id = photo.id
    ))
}

fn parse_unix_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    raw.parse::<i64>()
        .ok()
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
}
