//! Transport logging layer.
//!
//! Wraps the transport so every outgoing request and its outcome are reported
//! through `tracing`, inside an `http_request` span.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Instant;

use tower::{Layer, Service};
use tracing::{Instrument, Level, debug, info, span, warn};

use crate::{Error, Headers, Request, Response, Result};

/// Header names whose values never reach the logs.
const REDACTED_HEADERS: &[&str] = &["Authorization"];

/// Copy of `headers` with credential values masked.
fn redacted_headers(headers: &Headers) -> Headers {
    let mut redacted = headers.clone();
    for name in REDACTED_HEADERS {
        if redacted.contains(name) {
            redacted.insert(*name, "<redacted>");
        }
    }
    redacted
}

/// Layer that adds request/response logging.
///
/// # Example
///
/// ```ignore
/// use courier::HyperClient;
/// use courier::middleware::LoggingLayer;
///
/// let transport = HyperClient::builder()
///     .layer(LoggingLayer::debug())
///     .build();
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingLayer {
    level: LogLevel,
}

/// Verbosity of the logging layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogLevel {
    /// Request details, headers included.
    Debug,
    /// Summary only.
    #[default]
    Info,
}

impl LoggingLayer {
    /// Summary logging.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Logging with request headers.
    #[must_use]
    pub const fn debug() -> Self {
        Self::with_level(LogLevel::Debug)
    }

    /// Logging at the given level.
    #[must_use]
    pub const fn with_level(level: LogLevel) -> Self {
        Self { level }
    }

    /// Configured level.
    #[must_use]
    pub const fn level(&self) -> LogLevel {
        self.level
    }
}

impl<S> Layer<S> for LoggingLayer {
    type Service = Logging<S>;

    fn layer(&self, inner: S) -> Self::Service {
        Logging {
            inner,
            level: self.level,
        }
    }
}

/// Service that logs requests and responses.
#[derive(Debug, Clone)]
pub struct Logging<S> {
    inner: S,
    level: LogLevel,
}

impl<S> Service<Request> for Logging<S>
where
    S: Service<Request, Response = Response, Error = Error> + Clone + Send + 'static,
    S::Future: Send,
{
    type Response = Response;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<()>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: Request) -> Self::Future {
        let method = request.method();
        let url = request.url().to_string();
        let level = self.level;

        let span = span!(Level::INFO, "http_request", %method, %url);

        let mut inner = self.inner.clone();
        Box::pin(
            async move {
                let start = Instant::now();

                match level {
                    LogLevel::Debug => {
                        debug!(
                            headers = ?redacted_headers(request.headers()),
                            hints = ?request.hints(),
                            has_body = request.body().is_some(),
                            "sending request"
                        );
                    }
                    LogLevel::Info => info!("sending request"),
                }

                let result = inner.call(request).await;
                let elapsed_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);

                match &result {
                    Ok(response) if response.is_success() => {
                        info!(status = response.status(), elapsed_ms, "request completed");
                    }
                    Ok(response) => {
                        let status = response.status();
                        warn!(status, elapsed_ms, "request returned an error status");
                    }
                    Err(err) => warn!(error = %err, elapsed_ms, "request failed"),
                }

                result
            }
            .instrument(span),
        )
    }
}

#[cfg(test)]
mod tests {
    use courier_core::Method;
    use tower::ServiceExt;

    use super::*;

    #[test]
    fn layer_levels() {
        assert_eq!(LoggingLayer::new().level(), LogLevel::Info);
        assert_eq!(LoggingLayer::debug().level(), LogLevel::Debug);
    }

    #[test]
    fn authorization_is_redacted() {
        let headers: Headers = [("authorization", "Bearer secret"), ("Accept", "text/plain")]
            .into_iter()
            .collect();

        let redacted = redacted_headers(&headers);
        assert_eq!(redacted.get("Authorization"), Some("<redacted>"));
        assert_eq!(redacted.get("Accept"), Some("text/plain"));
        assert!(!format!("{redacted:?}").contains("secret"));
        assert_eq!(headers.get("Authorization"), Some("Bearer secret"));
    }

    #[test]
    fn redaction_leaves_missing_headers_absent() {
        let headers: Headers = [("Accept", "text/plain")].into_iter().collect();
        assert!(!redacted_headers(&headers).contains("Authorization"));
    }

    #[tokio::test]
    async fn passes_response_through() {
        let inner = tower::service_fn(|_request: Request| async {
            Ok::<_, Error>(Response::new(418, Headers::new(), "teapot"))
        });
        let service = LoggingLayer::debug().layer(inner);

        let url = url::Url::parse("https://api.test/tea").expect("url");
        let response = service
            .oneshot(Request::builder(Method::Get, url).build())
            .await
            .expect("response");

        assert_eq!(response.status(), 418);
        assert_eq!(response.text(), "teapot");
    }
}
