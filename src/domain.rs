//! Canonical domain types shared by every service adapter.
//!
//! These types are OUR types - they don't change when a hosting service
//! changes its wire format. All raw responses get converted into these
//! types inside the adapters, and nothing outside a service module ever
//! sees a service's own shapes.

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::credentials::Credential;

/// Which hosting service a value came from.
///
/// Always populated at construction by the owning adapter; callers never
/// have to infer origin from side-channel state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Service {
    Flickr,
    Facebook,
}

impl Service {
    pub fn as_str(&self) -> &'static str {
        match self {
            Service::Flickr => "flickr",
            Service::Facebook => "facebook",
        }
    }
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named collection of images on some service.
///
/// `remote_id` is opaque and only meaningful together with `service`:
/// albums from different services may coincidentally share an id and are
/// never the same album. Albums are created only by adapter transforms and
/// not mutated afterwards.
#[derive(Debug, Clone)]
pub struct Album {
    pub title: String,
    /// Service-assigned identifier, unique within that service.
    pub remote_id: String,
    pub service: Service,
    /// Credential context the album was fetched with, kept so a follow-up
    /// image fetch can re-authenticate.
    pub owner: Credential,
}

impl PartialEq for Album {
    /// Identity is (service, remote_id); title and owner don't participate.
    fn eq(&self, other: &Self) -> bool {
        self.service == other.service && self.remote_id == other.remote_id
    }
}

impl Eq for Album {}

/// One photo.
///
/// `url` points at the full-size or largest available representation and is
/// always non-empty: an adapter that cannot resolve a usable URL drops the
/// item instead of emitting a partial image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    pub url: String,
    /// Service-scoped identifier; not every service exposes a stable one
    /// per photo.
    pub remote_id: Option<String>,
}

/// Advisory hints for an album search.
///
/// Adapters honor the keys they can and silently ignore the rest; a filter
/// is never a contract every service must satisfy. `services` distinguishes
/// "key absent" (`None`: search every registered service) from an
/// explicitly empty list (target nothing).
#[derive(Debug, Clone, Default)]
pub struct FilterOptions {
    /// Exact `remote_id` match.
    pub id: Option<String>,
    /// Case-insensitive substring match on the album title.
    pub name: Option<String>,
    /// Only albums created strictly after this instant.
    pub created_after: Option<DateTime<Utc>>,
    /// Which services to query; `None` means all registered.
    pub services: Option<Vec<Service>>,
}

impl FilterOptions {
    /// Client-side check for adapters whose service cannot filter listings
    /// server-side. Albums with no known creation date pass the
    /// `created_after` hint.
    pub(crate) fn matches_album(
        &self,
        remote_id: &str,
        title: &str,
        created: Option<DateTime<Utc>>,
    ) -> bool {
        if let Some(ref id) = self.id
            && id != remote_id
        {
            return false;
        }
        if let Some(ref name) = self.name
            && !title.to_lowercase().contains(&name.to_lowercase())
        {
            return false;
        }
        if let (Some(after), Some(created)) = (self.created_after, created)
            && created <= after
        {
            return false;
        }
        true
    }
}

/// A per-service failure surfaced alongside the merged result set.
#[derive(Debug, Clone)]
pub struct ServiceFailure {
    pub service: Service,
    pub error: AggregateError,
}

/// Errors produced while querying hosting services.
///
/// `Clone` so test doubles can hand out configured errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum AggregateError {
    /// The adapter variant does not support the requested capability.
    #[error("adapter does not implement {0}")]
    Unimplemented(&'static str),

    #[error("no usable credential for {0}")]
    MissingCredential(Service),

    #[error("network error: {0}")]
    Network(String),

    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("failed to parse response: {0}")]
    Parse(String),

    /// The service answered with a well-formed error envelope.
    #[error("service error: {0}")]
    Api(String),

    /// An album was handed to an adapter that did not produce it.
    #[error("album from {actual} passed to the {expected} adapter")]
    InvalidOwnership { expected: Service, actual: Service },

    /// The album's service tag has no registered adapter.
    #[error("no adapter registered for {0}")]
    UnknownService(Service),
}
