//! Query orchestration - one vocabulary over every registered service.
//!
//! The aggregator is the crate's entry point:
//! 1. Select target adapters from the filter's service list
//! 2. Ask each for a request descriptor (no I/O yet)
//! 3. Drive the whole batch through the fan-out executor
//! 4. Merge per-service results, reporting failures instead of throwing them

use std::sync::Arc;

use crate::adapter::{AdapterRegistry, ServiceAdapter};
use crate::config::Config;
use crate::credentials::CredentialProvider;
use crate::domain::{AggregateError, Album, FilterOptions, Image, ServiceFailure};
use crate::executor::{FanOutExecutor, RequestDescriptor};
use crate::transport::{ReqwestTransport, Transport};

/// Result of a multi-service album search.
///
/// Callers always receive whatever subset of services succeeded plus an
/// explicit entry for each service that failed; failures are never dropped
/// silently and never abort the merge.
#[derive(Debug, Clone)]
pub struct FindOutcome {
    /// Merged albums: adapter-submission order, then each adapter's own
    /// listing order. Not sorted by any album attribute.
    pub albums: Vec<Album>,
    pub failures: Vec<ServiceFailure>,
}

impl FindOutcome {
    /// True when every targeted service answered.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Drives album and image queries across the registered services.
///
/// Owns the executor for the duration of each call; there is no shared
/// mutable state between separate calls.
pub struct Aggregator {
    registry: AdapterRegistry,
    executor: FanOutExecutor,
}

impl Aggregator {
    /// Aggregator over the built-in adapters with a real HTTP transport.
    pub fn new(config: &Config) -> Self {
        Self::with_transport(config, Arc::new(ReqwestTransport::new()))
    }

    /// Inject a custom transport; adapters stay the built-in set.
    pub fn with_transport(config: &Config, transport: Arc<dyn Transport>) -> Self {
        Self::with_registry(config, transport, AdapterRegistry::with_defaults())
    }

    /// Full injection point: custom transport and adapter set.
    pub fn with_registry(
        config: &Config,
        transport: Arc<dyn Transport>,
        registry: AdapterRegistry,
    ) -> Self {
        let executor = FanOutExecutor::new(
            transport,
            config.network.request_timeout(),
            config.network.max_concurrent_requests,
        );
        Self { registry, executor }
    }

    /// Search the targeted services for albums.
    ///
    /// `filter.services` picks the targets: an absent key means every
    /// registered adapter, an explicitly empty list means none. A failed
    /// service contributes zero albums and exactly one failure entry;
    /// surviving services are unaffected.
    pub async fn find_albums(
        &self,
        credentials: &dyn CredentialProvider,
        filter: &FilterOptions,
    ) -> FindOutcome {
        let mut descriptors: Vec<RequestDescriptor<Album>> = Vec::new();
        let mut failures: Vec<ServiceFailure> = Vec::new();

        match &filter.services {
            None => {
                for adapter in self.registry.iter() {
                    match self.describe_find(adapter.as_ref(), credentials, filter) {
                        Ok(descriptor) => descriptors.push(descriptor),
                        Err(failure) => failures.push(failure),
                    }
                }
            }
            Some(wanted) => {
                for &service in wanted {
                    match self.registry.get(service) {
                        Some(adapter) => {
                            match self.describe_find(adapter.as_ref(), credentials, filter) {
                                Ok(descriptor) => descriptors.push(descriptor),
                                Err(failure) => failures.push(failure),
                            }
                        }
                        None => failures.push(ServiceFailure {
                            service,
                            error: AggregateError::UnknownService(service),
                        }),
                    }
                }
            }
        }

        let services: Vec<_> = descriptors.iter().map(|d| d.service()).collect();
        let results = self.executor.execute(descriptors).await;

        let mut albums = Vec::new();
        for (service, result) in services.into_iter().zip(results) {
            match result {
                Ok(mut list) => albums.append(&mut list),
                Err(error) => {
                    tracing::warn!(service = %service, error = %error, "service query failed");
                    failures.push(ServiceFailure { service, error });
                }
            }
        }

        tracing::debug!(
            albums = albums.len(),
            failures = failures.len(),
            "merged album search"
        );
        FindOutcome { albums, failures }
    }

    /// Fetch the images inside one album through its owning adapter,
    /// re-authenticating from the album's stored credential context.
    ///
    /// A single request still goes through the executor so one code path
    /// handles both the single- and multi-request cases; with one request
    /// there is no partial outcome, just the call's result.
    pub async fn album_images(&self, album: &Album) -> Result<Vec<Image>, AggregateError> {
        let adapter = self
            .registry
            .get(album.service)
            .ok_or(AggregateError::UnknownService(album.service))?;
        let descriptor = adapter.find_album_images(album)?;
        self.executor.execute_one(descriptor).await
    }

    /// Build one adapter's find descriptor, turning a construction error
    /// into that service's failure entry (the request is never sent).
    fn describe_find(
        &self,
        adapter: &dyn ServiceAdapter,
        credentials: &dyn CredentialProvider,
        filter: &FilterOptions,
    ) -> Result<RequestDescriptor<Album>, ServiceFailure> {
        let service = adapter.service();
        let credential = credentials.credential_for(service);
        adapter.find_albums(credential.as_ref(), filter).map_err(|error| {
            tracing::warn!(service = %service, error = %error, "skipping service");
            ServiceFailure { service, error }
        })
    }
}
