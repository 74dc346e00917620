//! Deferred request descriptors and the fan-out executor that runs them.
//!
//! Adapters produce [`RequestDescriptor`]s - a network call paired with the
//! pure function that turns its raw body into canonical values. Nothing
//! touches the network until the [`FanOutExecutor`] drives a batch; callers
//! never manage tasks or threads themselves.

use std::sync::Arc;
use std::time::Duration;

use futures::{StreamExt, stream};
use tokio::time::timeout;

use crate::domain::{AggregateError, Service};
use crate::transport::{HttpRequest, Transport};

/// How much of an error body to keep when reporting a non-2xx status.
const BODY_SNIPPET_LEN: usize = 200;

/// A deferred unit of work: one network call plus its response transform.
///
/// Building a descriptor performs no I/O. The executor owns the descriptor
/// for the duration of its batch and consumes it when the transform runs;
/// transforms are pure and must not block on other descriptors.
pub struct RequestDescriptor<T> {
    service: Service,
    request: HttpRequest,
    transform: Box<dyn FnOnce(&[u8]) -> Result<Vec<T>, AggregateError> + Send>,
}

impl<T> std::fmt::Debug for RequestDescriptor<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestDescriptor")
            .field("service", &self.service)
            .field("request", &self.request)
            .finish_non_exhaustive()
    }
}

impl<T> RequestDescriptor<T> {
    pub fn new(
        service: Service,
        request: HttpRequest,
        transform: impl FnOnce(&[u8]) -> Result<Vec<T>, AggregateError> + Send + 'static,
    ) -> Self {
        Self {
            service,
            request,
            transform: Box::new(transform),
        }
    }

    /// Service this request targets; pairs a batch slot with its origin.
    pub fn service(&self) -> Service {
        self.service
    }

    pub fn request(&self) -> &HttpRequest {
        &self.request
    }
}

/// Runs batches of independently-built descriptors concurrently.
///
/// Output is positionally aligned with input: slot `i` of the result list
/// is descriptor `i`'s outcome no matter which request finished first. One
/// slot's failure never aborts its siblings. Dropping the future returned
/// by [`execute`](Self::execute) cancels every in-flight request; results
/// are only ever delivered for a completed batch.
pub struct FanOutExecutor {
    transport: Arc<dyn Transport>,
    request_timeout: Duration,
    max_concurrency: usize,
}

impl FanOutExecutor {
    pub fn new(
        transport: Arc<dyn Transport>,
        request_timeout: Duration,
        max_concurrency: usize,
    ) -> Self {
        Self {
            transport,
            request_timeout,
            max_concurrency: max_concurrency.max(1),
        }
    }

    /// Execute every descriptor, at most `max_concurrency` in flight.
    pub async fn execute<T>(
        &self,
        batch: Vec<RequestDescriptor<T>>,
    ) -> Vec<Result<Vec<T>, AggregateError>> {
        // buffered, not buffer_unordered: completion order is unspecified
        // but the output list must keep submission order.
        stream::iter(batch)
            .map(|descriptor| self.run_one(descriptor))
            .buffered(self.max_concurrency)
            .collect()
            .await
    }

    /// Single-request entry point; shares the whole per-request path
    /// (timeout, status policy, transform) with batch execution.
    pub async fn execute_one<T>(
        &self,
        descriptor: RequestDescriptor<T>,
    ) -> Result<Vec<T>, AggregateError> {
        self.run_one(descriptor).await
    }

    async fn run_one<T>(
        &self,
        descriptor: RequestDescriptor<T>,
    ) -> Result<Vec<T>, AggregateError> {
        let RequestDescriptor {
            service,
            request,
            transform,
        } = descriptor;

        tracing::debug!(service = %service, url = %request.url, "dispatching request");

        let response = match timeout(self.request_timeout, self.transport.execute(&request)).await
        {
            Ok(result) => result?,
            Err(_) => {
                tracing::warn!(service = %service, url = %request.url, "request timed out");
                return Err(AggregateError::Timeout(self.request_timeout));
            }
        };

        if !response.is_success() {
            let body: String = String::from_utf8_lossy(&response.body)
                .chars()
                .take(BODY_SNIPPET_LEN)
                .collect();
            return Err(AggregateError::Status {
                status: response.status,
                body,
            });
        }

        transform(response.body.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::HttpResponse;
    use async_trait::async_trait;
    use bytes::Bytes;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Serves canned responses keyed by URL substring, after an optional
    /// per-route delay. Unmatched URLs hang forever.
    struct RouteTransport {
        routes: Vec<(&'static str, Duration, u16, &'static str)>,
        in_flight: AtomicUsize,
        peak_in_flight: AtomicUsize,
    }

    impl RouteTransport {
        fn new(routes: Vec<(&'static str, Duration, u16, &'static str)>) -> Self {
            Self {
                routes,
                in_flight: AtomicUsize::new(0),
                peak_in_flight: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl Transport for RouteTransport {
        async fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, AggregateError> {
            let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak_in_flight.fetch_max(current, Ordering::SeqCst);

            let result = match self
                .routes
                .iter()
                .find(|(fragment, _, _, _)| request.url.contains(fragment))
            {
                Some((_, delay, status, body)) => {
                    tokio::time::sleep(*delay).await;
                    Ok(HttpResponse {
                        status: *status,
                        body: Bytes::from_static(body.as_bytes()),
                    })
                }
                None => futures::future::pending().await,
            };

            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            result
        }
    }

    fn body_descriptor(url: &str) -> RequestDescriptor<String> {
        RequestDescriptor::new(Service::Flickr, HttpRequest::get(url), |body| {
            Ok(vec![String::from_utf8_lossy(body).into_owned()])
        })
    }

    fn executor(transport: RouteTransport, timeout_ms: u64, concurrency: usize) -> FanOutExecutor {
        FanOutExecutor::new(
            Arc::new(transport),
            Duration::from_millis(timeout_ms),
            concurrency,
        )
    }

    #[tokio::test]
    async fn test_output_order_matches_submission_order() {
        // The first descriptor completes last; its result must still come
        // first in the output.
        let transport = RouteTransport::new(vec![
            ("slow", Duration::from_millis(80), 200, "slow-body"),
            ("fast", Duration::ZERO, 200, "fast-body"),
        ]);
        let executor = executor(transport, 1_000, 4);

        let results = executor
            .execute(vec![
                body_descriptor("https://example.com/slow"),
                body_descriptor("https://example.com/fast"),
            ])
            .await;

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].as_ref().unwrap(), &vec!["slow-body".to_string()]);
        assert_eq!(results[1].as_ref().unwrap(), &vec!["fast-body".to_string()]);
    }

    #[tokio::test]
    async fn test_timeout_fails_one_slot_without_blocking_batch() {
        let transport = RouteTransport::new(vec![(
            "ok",
            Duration::ZERO,
            200,
            "fine",
        )]);
        let executor = executor(transport, 50, 4);

        // Bound the whole batch: a hung request must not hang the executor.
        let results = timeout(
            Duration::from_secs(2),
            executor.execute(vec![
                body_descriptor("https://example.com/hangs-forever"),
                body_descriptor("https://example.com/ok"),
            ]),
        )
        .await
        .expect("batch must complete despite a hung request");

        assert!(matches!(results[0], Err(AggregateError::Timeout(_))));
        assert_eq!(results[1].as_ref().unwrap(), &vec!["fine".to_string()]);
    }

    #[tokio::test]
    async fn test_non_success_status_is_captured_per_slot() {
        let transport = RouteTransport::new(vec![
            ("bad", Duration::ZERO, 503, "service melting"),
            ("good", Duration::ZERO, 200, "payload"),
        ]);
        let executor = executor(transport, 1_000, 4);

        let results = executor
            .execute(vec![
                body_descriptor("https://example.com/bad"),
                body_descriptor("https://example.com/good"),
            ])
            .await;

        match &results[0] {
            Err(AggregateError::Status { status, body }) => {
                assert_eq!(*status, 503);
                assert_eq!(body, "service melting");
            }
            other => panic!("expected status error, got {other:?}"),
        }
        assert!(results[1].is_ok());
    }

    #[tokio::test]
    async fn test_transform_error_is_captured_per_slot() {
        let transport = RouteTransport::new(vec![("any", Duration::ZERO, 200, "not json")]);
        let executor = executor(transport, 1_000, 4);

        let failing: RequestDescriptor<String> = RequestDescriptor::new(
            Service::Facebook,
            HttpRequest::get("https://example.com/any"),
            |_| Err(AggregateError::Parse("bad shape".to_string())),
        );

        let results = executor.execute(vec![failing]).await;
        assert!(matches!(&results[0], Err(AggregateError::Parse(m)) if m == "bad shape"));
    }

    #[tokio::test]
    async fn test_concurrency_is_bounded() {
        let transport = RouteTransport::new(vec![(
            "example",
            Duration::from_millis(20),
            200,
            "x",
        )]);
        let peak_handle = Arc::new(transport);
        let executor = FanOutExecutor::new(peak_handle.clone(), Duration::from_secs(1), 2);

        let batch: Vec<_> = (0..6)
            .map(|i| body_descriptor(&format!("https://example.com/{i}")))
            .collect();
        let results = executor.execute(batch).await;

        assert_eq!(results.len(), 6);
        assert!(results.iter().all(Result::is_ok));
        assert!(peak_handle.peak_in_flight.load(Ordering::SeqCst) <= 2);
    }

    #[tokio::test]
    async fn test_empty_batch_completes_immediately() {
        let transport = RouteTransport::new(vec![]);
        let executor = executor(transport, 50, 4);

        let results: Vec<Result<Vec<String>, _>> = executor.execute(vec![]).await;
        assert!(results.is_empty());
    }
}
