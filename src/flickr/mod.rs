//! Flickr service integration.
//!
//! Split into:
//! - `dto.rs` - Exact REST API response shapes
//! - `adapter.rs` - Request building and DTO-to-domain conversion

pub mod adapter;
pub mod dto;

pub use adapter::FlickrAdapter;
