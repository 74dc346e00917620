//! Injected HTTP transport.
//!
//! Adapters describe requests as plain data; the executor hands them to a
//! [`Transport`] to run. Production code uses [`ReqwestTransport`]; tests
//! substitute canned, delayed, or misbehaving implementations. The crate
//! never opens a socket itself.

use async_trait::async_trait;
use bytes::Bytes;

pub use reqwest::Method;

use crate::domain::AggregateError;

/// A not-yet-executed HTTP request, as described by an adapter.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
}

impl HttpRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: Method::GET,
            url: url.into(),
            headers: Vec::new(),
        }
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

/// Raw response handed to a descriptor's transform.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Bytes,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// One-shot request execution.
///
/// Implementations report connect/read failures as
/// [`AggregateError::Network`]; status-code interpretation happens in the
/// executor so every adapter gets the same policy.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, AggregateError>;
}

/// Production transport backed by a shared reqwest client.
///
/// The client accepts gzip-compressed responses and identifies the crate
/// in its User-Agent header.
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .gzip(true)
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .build()
            .expect("Failed to build HTTP client");

        Self { client }
    }
}

impl Default for ReqwestTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, AggregateError> {
        let mut builder = self.client.request(request.method.clone(), &request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let response = builder
            .send()
            .await
            .map_err(|e| AggregateError::Network(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| AggregateError::Network(e.to_string()))?;

        Ok(HttpResponse { status, body })
    }
}
