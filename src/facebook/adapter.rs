//! Facebook Graph API adapter.
//!
//! Builds deferred Graph requests and converts DTO responses into canonical
//! albums and images. This is the ONLY place Graph DTOs become domain
//! types.
//!
//! Unlike Flickr, the Graph API filters listings server-side: a
//! `created_after` hint travels as the `since` query parameter. The
//! `id`/`name` hints are still applied in the transform.

use super::dto;
use crate::adapter::{ServiceAdapter, ensure_owned};
use crate::credentials::Credential;
use crate::domain::{AggregateError, Album, FilterOptions, Image, Service};
use crate::executor::RequestDescriptor;
use crate::transport::HttpRequest;

const DEFAULT_BASE_URL: &str = "https://graph.facebook.com/v19.0";

/// Facebook adapter
///
/// Credentials: `token` carries the OAuth access token; a missing `user_id`
/// means the token's own account ("me").
pub struct FacebookAdapter {
    base_url: String,
}

impl FacebookAdapter {
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
}

impl Default for FacebookAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl ServiceAdapter for FacebookAdapter {
    fn service(&self) -> Service {
        Service::Facebook
    }

    fn find_albums(
        &self,
        credential: Option<&Credential>,
        filter: &FilterOptions,
    ) -> Result<RequestDescriptor<Album>, AggregateError> {
        let credential =
            credential.ok_or(AggregateError::MissingCredential(Service::Facebook))?;
        let Some(token) = credential.token.as_deref() else {
            return Err(AggregateError::MissingCredential(Service::Facebook));
        };

        let user = credential.user_id.as_deref().unwrap_or("me");
        let mut url = format!(
            "{}/{}/albums?fields=id,name,created_time",
            self.base_url,
            urlencoding::encode(user)
        );
        if let Some(after) = filter.created_after {
            url.push_str(&format!("&since={}", after.timestamp()));
        }

        let owner = credential.clone();
        let filter = filter.clone();
        Ok(RequestDescriptor::new(
            Service::Facebook,
            HttpRequest::get(url).header("Authorization", format!("Bearer {token}")),
            move |body| to_albums(parse_json(body)?, &owner, &filter),
        ))
    }

    fn find_album_images(
        &self,
        album: &Album,
    ) -> Result<RequestDescriptor<Image>, AggregateError> {
        ensure_owned(Service::Facebook, album)?;
        let Some(token) = album.owner.token.as_deref() else {
            return Err(AggregateError::MissingCredential(Service::Facebook));
        };

        let url = format!(
            "{}/{}/photos?fields=id,source",
            self.base_url,
            urlencoding::encode(&album.remote_id)
        );

        Ok(RequestDescriptor::new(
            Service::Facebook,
            HttpRequest::get(url).header("Authorization", format!("Bearer {token}")),
            move |body| to_images(parse_json(body)?),
        ))
    }
}

fn parse_json<T: serde::de::DeserializeOwned>(body: &[u8]) -> Result<T, AggregateError> {
    serde_json::from_slice(body).map_err(|e| AggregateError::Parse(e.to_string()))
}

fn check_error(error: Option<dto::ApiError>) -> Result<(), AggregateError> {
    match error {
        Some(error) => Err(AggregateError::Api(format!(
            "{} (code {})",
            error.message,
            error.code.unwrap_or(-1)
        ))),
        None => Ok(()),
    }
}

/// Convert an albums response into canonical albums.
///
/// `created_after` was already pushed server-side via `since`; only the
/// id/name hints apply here.
fn to_albums(
    response: dto::AlbumsResponse,
    owner: &Credential,
    filter: &FilterOptions,
) -> Result<Vec<Album>, AggregateError> {
    check_error(response.error)?;

    Ok(response
        .data
        .into_iter()
        .filter_map(|entry| {
            let title = entry.name.unwrap_or_default();
            if !filter.matches_album(&entry.id, &title, None) {
                return None;
            }
            Some(Album {
                title,
                remote_id: entry.id,
                service: Service::Facebook,
                owner: owner.clone(),
            })
        })
        .collect())
}

/// Convert a photos response into canonical images. Entries without a
/// `source` URL cannot be resolved and are dropped.
fn to_images(response: dto::PhotosResponse) -> Result<Vec<Image>, AggregateError> {
    check_error(response.error)?;

    Ok(response
        .data
        .into_iter()
        .filter_map(|entry| {
            let url = entry.source.filter(|s| !s.is_empty())?;
            Some(Image {
                url,
                remote_id: Some(entry.id),
            })
        })
        .collect())
}
