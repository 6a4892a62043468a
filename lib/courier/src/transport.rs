//! Network transport using hyper-util.

use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};

use bytes::Bytes;
use courier_core::Headers;
use http_body_util::{BodyExt, Full};
use hyper_rustls::HttpsConnector;
use hyper_util::{
    client::legacy::{Client, connect::HttpConnector},
    rt::TokioExecutor,
};
use tower::Layer;
use tower::util::BoxCloneService;
use tower_service::Service;

use crate::middleware::{LogLevel, LoggingLayer};
use crate::{Error, Request, Response, Result, connector::https_connector};

// ============================================================================
// Type-Erased Service for Layer Composition
// ============================================================================

/// Type-erased transport service that tower layers wrap.
pub type BoxedService = BoxCloneService<Request, Response, Error>;

/// Future type for the tower `Service` implementation.
pub type ServiceFuture = Pin<Box<dyn Future<Output = Result<Response>> + Send + 'static>>;

/// Makes a `BoxedService` shareable across tasks.
///
/// The service is cloned under the lock and called outside of it.
#[derive(Clone)]
struct SyncService {
    inner: Arc<Mutex<BoxedService>>,
}

impl SyncService {
    fn new(service: BoxedService) -> Self {
        Self {
            inner: Arc::new(Mutex::new(service)),
        }
    }

    fn call(&self, request: Request) -> ServiceFuture {
        let mut service = self
            .inner
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone();

        Box::pin(async move { service.call(request).await })
    }
}

// ============================================================================
// Raw hyper transport
// ============================================================================

#[derive(Clone)]
struct RawHyperClient {
    inner: Client<HttpsConnector<HttpConnector>, Full<Bytes>>,
}

impl RawHyperClient {
    fn new() -> Self {
        let inner = Client::builder(TokioExecutor::new()).build(https_connector());
        Self { inner }
    }

    fn build_hyper_request(request: Request) -> Result<http::Request<Full<Bytes>>> {
        let (method, url, headers, body, extensions) = request.into_parts();

        let mut builder = http::Request::builder()
            .method(http::Method::from(method))
            .uri(url.as_str());

        for (name, value) in headers.iter() {
            builder = builder.header(name, value);
        }

        let body = body.map_or_else(Full::default, Full::new);
        let mut http_request = builder
            .body(body)
            .map_err(|e| Error::invalid_request(e.to_string()))?;

        // transport hints stay visible to layers below
        *http_request.extensions_mut() = extensions;

        Ok(http_request)
    }

    /// Collects response headers; repeated names are comma-joined.
    fn extract_headers(headers: &http::HeaderMap) -> Headers {
        let mut extracted = Headers::new();
        for (name, value) in headers {
            let Ok(value) = value.to_str() else {
                continue;
            };
            let joined = match extracted.get(name.as_str()) {
                Some(previous) => format!("{previous}, {value}"),
                None => value.to_string(),
            };
            extracted.insert(name.as_str(), joined);
        }
        extracted
    }

    async fn execute(&self, request: Request) -> Result<Response> {
        let hyper_request = Self::build_hyper_request(request)?;

        let response = self
            .inner
            .request(hyper_request)
            .await
            .map_err(Self::map_hyper_error)?;

        let status = response.status().as_u16();
        let headers = Self::extract_headers(response.headers());

        let body = response
            .into_body()
            .collect()
            .await
            .map_err(|e| Error::connection(e.to_string()))?
            .to_bytes();

        Ok(Response::new(status, headers, body))
    }

    #[allow(clippy::needless_pass_by_value)]
    fn map_hyper_error(err: hyper_util::client::legacy::Error) -> Error {
        let msg = err.to_string();

        if err.is_connect() {
            return Error::connection(msg);
        }

        if msg.contains("ssl") || msg.contains("tls") || msg.contains("certificate") {
            return Error::tls(msg);
        }

        Error::connection(msg)
    }
}

impl Service<Request> for RawHyperClient {
    type Response = Response;
    type Error = Error;
    type Future = ServiceFuture;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, request: Request) -> Self::Future {
        let client = self.clone();
        Box::pin(async move { client.execute(request).await })
    }
}

// ============================================================================
// Public transport
// ============================================================================

/// HTTP transport over hyper-util with rustls, composable with tower layers.
///
/// # Example
///
/// ```ignore
/// use courier::HyperClient;
///
/// let transport = HyperClient::builder().with_logging().build();
/// ```
#[derive(Clone)]
pub struct HyperClient {
    service: SyncService,
    layer_count: usize,
}

impl std::fmt::Debug for HyperClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HyperClient")
            .field("layer_count", &self.layer_count)
            .finish_non_exhaustive()
    }
}

impl HyperClient {
    /// Transport without any layer.
    #[must_use]
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Create a new transport builder.
    #[must_use]
    pub fn builder() -> HyperClientBuilder {
        HyperClientBuilder::default()
    }

    /// Number of tower layers around the raw transport.
    #[must_use]
    pub const fn layer_count(&self) -> usize {
        self.layer_count
    }
}

impl Default for HyperClient {
    fn default() -> Self {
        Self::new()
    }
}

impl courier_core::HttpClient for HyperClient {
    async fn execute(&self, request: Request) -> Result<Response> {
        self.service.call(request).await
    }
}

impl Service<Request> for HyperClient {
    type Response = Response;
    type Error = Error;
    type Future = ServiceFuture;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, request: Request) -> Self::Future {
        self.service.call(request)
    }
}

type LayerFn = Arc<dyn Fn(BoxedService) -> BoxedService + Send + Sync>;

/// Builder for [`HyperClient`].
///
/// Layers are applied in order: first added = outermost.
#[derive(Default)]
pub struct HyperClientBuilder {
    layers: Vec<LayerFn>,
}

impl std::fmt::Debug for HyperClientBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HyperClientBuilder")
            .field("layers_count", &self.layers.len())
            .finish()
    }
}

impl HyperClientBuilder {
    /// Add a tower layer around the transport.
    #[must_use]
    pub fn layer<L>(mut self, layer: L) -> Self
    where
        L: Layer<BoxedService> + Send + Sync + 'static,
        L::Service: Service<Request, Response = Response, Error = Error> + Clone + Send + 'static,
        <L::Service as Service<Request>>::Future: Send,
    {
        self.layers.push(Arc::new(move |service| {
            BoxCloneService::new(layer.layer(service))
        }));
        self
    }

    /// Add request/response logging at the given level.
    #[must_use]
    pub fn with_logging_level(self, level: LogLevel) -> Self {
        self.layer(LoggingLayer::with_level(level))
    }

    /// Add summary request/response logging.
    #[must_use]
    pub fn with_logging(self) -> Self {
        self.with_logging_level(LogLevel::Info)
    }

    /// Add debug-level logging, including headers.
    #[must_use]
    pub fn with_debug_logging(self) -> Self {
        self.with_logging_level(LogLevel::Debug)
    }

    /// Build the transport.
    #[must_use]
    pub fn build(self) -> HyperClient {
        let layer_count = self.layers.len();
        let mut service: BoxedService = BoxCloneService::new(RawHyperClient::new());

        // first added = outermost, so wrap from the innermost outwards
        for layer_fn in self.layers.into_iter().rev() {
            service = layer_fn(service);
        }

        HyperClient {
            service: SyncService::new(service),
            layer_count,
        }
    }
}
