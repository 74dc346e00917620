//! Photofan - one vocabulary over many photo-hosting services.
//!
//! A caller asks for "albums" or "images"; the crate fans the query out to
//! each selected service's adapter concurrently, normalizes every raw
//! response into canonical domain types, and merges the results into one
//! ordered collection with an explicit per-service failure report.
//!
//! # Architecture
//!
//! - **Domain models** (`domain.rs`) - Canonical types every adapter produces
//! - **API DTOs** (`flickr/dto.rs`, `facebook/dto.rs`) - Exact API response shapes
//! - **Adapters** (`flickr/`, `facebook/`) - Build deferred requests, convert DTOs to domain types
//! - **Executor** (`executor.rs`) - Bounded concurrent dispatch, order-preserving join
//! - **Aggregator** (`aggregator.rs`) - Entry points: select, fan out, merge
//! - **Transport** (`transport.rs`) - Injected HTTP client seam
//!
//! This decoupling means:
//! 1. A service's API changes stop at its own dto/adapter pair
//! 2. Tests drive the whole stack with a canned transport
//! 3. New services slot into the registry without touching the core
//!
//! # Usage
//!
//! ```ignore
//! use photofan::{Aggregator, FilterOptions, config};
//!
//! let config = config::load();
//! let aggregator = Aggregator::new(&config);
//!
//! let outcome = aggregator
//!     .find_albums(&config.credentials, &FilterOptions::default())
//!     .await;
//! for failure in &outcome.failures {
//!     eprintln!("{}: {}", failure.service, failure.error);
//! }
//! for album in &outcome.albums {
//!     let images = aggregator.album_images(album).await?;
//!     println!("{} ({} images)", album.title, images.len());
//! }
//! ```

pub mod adapter;
pub mod aggregator;
pub mod config;
pub mod credentials;
pub mod domain;
pub mod executor;
pub mod facebook;
pub mod flickr;
pub mod transport;

pub use adapter::{AdapterRegistry, ServiceAdapter};
pub use aggregator::{Aggregator, FindOutcome};
pub use config::Config;
pub use credentials::{Credential, CredentialProvider};
pub use domain::{AggregateError, Album, FilterOptions, Image, Service, ServiceFailure};
pub use executor::{FanOutExecutor, RequestDescriptor};
pub use facebook::FacebookAdapter;
pub use flickr::FlickrAdapter;
pub use transport::{HttpRequest, HttpResponse, ReqwestTransport, Transport};
