//! The service adapter seam.
//!
//! Each hosting service implements [`ServiceAdapter`] to translate a
//! canonical query into deferred requests, and raw responses into
//! canonical values. Trait objects let the aggregator drive any mix of
//! services through one code path; tests substitute stub adapters.

use std::sync::Arc;

use crate::credentials::Credential;
use crate::domain::{AggregateError, Album, FilterOptions, Image, Service};
use crate::executor::RequestDescriptor;
use crate::facebook::FacebookAdapter;
use crate::flickr::FlickrAdapter;

/// One third-party service's API shape, hidden behind two operations.
pub trait ServiceAdapter: Send + Sync {
    /// Tag stamped on every album this adapter produces.
    fn service(&self) -> Service;

    /// Describe the request that lists albums matching `filter`.
    ///
    /// Construction is synchronous and side-effect free; no network call
    /// happens until the executor drives the descriptor. Filter keys the
    /// service cannot honor are ignored. A missing required credential is
    /// an error and the request is never built.
    fn find_albums(
        &self,
        credential: Option<&Credential>,
        filter: &FilterOptions,
    ) -> Result<RequestDescriptor<Album>, AggregateError>;

    /// Describe the request that lists the photos inside `album`.
    ///
    /// The album must have been produced by this same adapter. Anything
    /// else is a programmer error and fails with `InvalidOwnership` before
    /// any request exists.
    fn find_album_images(
        &self,
        album: &Album,
    ) -> Result<RequestDescriptor<Image>, AggregateError>;
}

/// Ownership guard shared by the adapter impls.
pub(crate) fn ensure_owned(expected: Service, album: &Album) -> Result<(), AggregateError> {
    if album.service == expected {
        Ok(())
    } else {
        Err(AggregateError::InvalidOwnership {
            expected,
            actual: album.service,
        })
    }
}

/// Registration-ordered table of adapters.
///
/// Adapters are registered once at startup and looked up by their service
/// tag - no runtime type-name synthesis. Iteration order is registration
/// order, which fixes the merged-output order for every-service queries.
pub struct AdapterRegistry {
    adapters: Vec<Arc<dyn ServiceAdapter>>,
}

impl AdapterRegistry {
    /// Empty registry; callers register their own adapters.
    pub fn new() -> Self {
        Self {
            adapters: Vec::new(),
        }
    }

    /// Registry with the built-in adapters: Flickr, then Facebook.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(FlickrAdapter::new()));
        registry.register(Arc::new(FacebookAdapter::new()));
        registry
    }

    /// Append an adapter. Registering a second adapter for the same
    /// service replaces the first but keeps its position.
    pub fn register(&mut self, adapter: Arc<dyn ServiceAdapter>) {
        match self
            .adapters
            .iter_mut()
            .find(|existing| existing.service() == adapter.service())
        {
            Some(slot) => *slot = adapter,
            None => self.adapters.push(adapter),
        }
    }

    pub fn get(&self, service: Service) -> Option<&Arc<dyn ServiceAdapter>> {
        self.adapters
            .iter()
            .find(|adapter| adapter.service() == service)
    }

    /// Adapters in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn ServiceAdapter>> {
        self.adapters.iter()
    }

    pub fn len(&self) -> usize {
        self.adapters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adapters.is_empty()
    }
}

impl Default for AdapterRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Stub adapters for tests in other modules.
#[cfg(test)]
pub mod mocks {
    use super::*;
    use crate::transport::HttpRequest;

    /// Adapter that answers from canned data (or a canned error) without
    /// caring what the transport returns.
    pub struct StubAdapter {
        pub service: Service,
        /// Albums every find returns, regardless of response body.
        pub albums: Vec<Album>,
        /// Construction-time error (takes precedence over albums).
        pub fail_with: Option<AggregateError>,
    }

    impl StubAdapter {
        pub fn with_albums(service: Service, albums: Vec<Album>) -> Self {
            Self {
                service,
                albums,
                fail_with: None,
            }
        }

        pub fn failing(service: Service, error: AggregateError) -> Self {
            Self {
                service,
                albums: vec![],
                fail_with: Some(error),
            }
        }
    }

    impl ServiceAdapter for StubAdapter {
        fn service(&self) -> Service {
            self.service
        }

        fn find_albums(
            &self,
            _credential: Option<&Credential>,
            _filter: &FilterOptions,
        ) -> Result<RequestDescriptor<Album>, AggregateError> {
            if let Some(ref error) = self.fail_with {
                return Err(error.clone());
            }
            let albums = self.albums.clone();
            Ok(RequestDescriptor::new(
                self.service,
                HttpRequest::get(format!("https://stub.invalid/{}/albums", self.service)),
                move |_| Ok(albums),
            ))
        }

        fn find_album_images(
            &self,
            album: &Album,
        ) -> Result<RequestDescriptor<Image>, AggregateError> {
            ensure_owned(self.service, album)?;
            Ok(RequestDescriptor::new(
                self.service,
                HttpRequest::get(format!(
                    "https://stub.invalid/{}/albums/{}/images",
                    self.service, album.remote_id
                )),
                |_| Ok(vec![]),
            ))
        }
    }
}
