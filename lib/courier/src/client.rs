//! Stateful request client.

use std::sync::{Arc, PoisonError, RwLock};

use courier_core::{HttpClient, url_builder};
use tracing::debug;

use crate::dispatch::{DispatchSnapshot, Dispatcher};
use crate::download::SaveSink;
use crate::normalize::http_error;
use crate::pipeline::Middleware;
use crate::{ClientConfig, HyperClient, Method, Payload, Request, RequestOptions, Result};

/// HTTP request client.
///
/// Owns a base URL, an optional token sent verbatim as the `Authorization`
/// header, and an append-only list of middleware. Base URL and token can
/// change at any time; each request reads them when it starts.
///
/// Clones share the same state.
///
/// # Example
///
/// ```ignore
/// use courier::{Client, RequestOptions};
///
/// let client = Client::new("https://api.example.com", Some("Bearer abc"));
/// let user = client
///     .get("users", RequestOptions::new().param("42"))
///     .await?;
/// ```
pub struct Client<C = HyperClient> {
    inner: Arc<Inner<C>>,
}

struct Inner<C> {
    transport: C,
    state: RwLock<State>,
    middlewares: RwLock<Vec<Arc<dyn Middleware>>>,
}

#[derive(Debug, Clone)]
struct State {
    base_url: String,
    token: Option<String>,
}

impl<C> Clone for Client<C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<C> std::fmt::Debug for Client<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state();
        f.debug_struct("Client")
            .field("base_url", &state.base_url)
            .field("has_token", &state.token.is_some())
            .field("middlewares", &self.middleware_count())
            .finish_non_exhaustive()
    }
}

impl Client {
    /// Client over the default hyper transport.
    #[must_use]
    pub fn new(base_url: &str, token: Option<&str>) -> Self {
        let mut builder = ClientConfig::builder().base_url(base_url);
        if let Some(token) = token {
            builder = builder.token(token);
        }
        Self::with_config(builder.build())
    }

    /// Client built from a configuration.
    #[must_use]
    pub fn with_config(config: ClientConfig) -> Self {
        let transport = match config.logging {
            Some(level) => HyperClient::builder().with_logging_level(level).build(),
            None => HyperClient::new(),
        };
        Self::from_parts(transport, &config.base_url, config.token)
    }
}

impl<C> Client<C> {
    fn from_parts(transport: C, base_url: &str, token: Option<String>) -> Self {
        Self {
            inner: Arc::new(Inner {
                transport,
                state: RwLock::new(State {
                    base_url: url_builder::normalize_base(base_url),
                    token,
                }),
                middlewares: RwLock::new(Vec::new()),
            }),
        }
    }

    fn state(&self) -> State {
        self.inner
            .state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Current base URL, always ending with `/`.
    #[must_use]
    pub fn base_url(&self) -> String {
        self.state().base_url
    }

    /// Replace the base URL.
    pub fn set_base_url(&self, base_url: &str) {
        let mut state = self
            .inner
            .state
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        state.base_url = url_builder::normalize_base(base_url);
    }

    /// Current token.
    #[must_use]
    pub fn token(&self) -> Option<String> {
        self.state().token
    }

    /// Replace the token.
    pub fn set_token(&self, token: impl Into<String>) {
        let mut state = self
            .inner
            .state
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        state.token = Some(token.into());
    }

    /// Remove the token; later requests carry no `Authorization` header.
    pub fn clear_token(&self) {
        let mut state = self
            .inner
            .state
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        state.token = None;
    }

    /// Register a middleware after the ones already registered.
    ///
    /// Requests already in flight keep the list they started with.
    pub fn use_middleware(&self, middleware: impl Middleware + 'static) {
        self.inner
            .middlewares
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Arc::new(middleware));
    }

    /// Number of registered middleware.
    #[must_use]
    pub fn middleware_count(&self) -> usize {
        self.inner
            .middlewares
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Underlying transport.
    #[must_use]
    pub fn transport(&self) -> &C {
        &self.inner.transport
    }

    fn snapshot(&self) -> DispatchSnapshot {
        let State { base_url, token } = self.state();
        let middlewares = self
            .inner
            .middlewares
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        DispatchSnapshot {
            base_url,
            token,
            middlewares,
        }
    }
}

impl<C: HttpClient> Client<C> {
    /// Client over a custom transport.
    #[must_use]
    pub fn with_transport(transport: C, base_url: &str, token: Option<&str>) -> Self {
        Self::from_parts(transport, base_url, token.map(str::to_string))
    }

    /// Send a request with `method` on `path`.
    ///
    /// # Errors
    ///
    /// Middleware, transport, HTTP status and decoding errors.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        options: RequestOptions,
    ) -> Result<Payload> {
        Dispatcher::new(&self.inner.transport, self.snapshot())
            .dispatch(method, path, options)
            .await
    }

    /// `GET` request.
    ///
    /// # Errors
    ///
    /// See [`Client::request`].
    pub async fn get(&self, path: &str, options: RequestOptions) -> Result<Payload> {
        self.request(Method::Get, path, options).await
    }

    /// `POST` request.
    ///
    /// # Errors
    ///
    /// See [`Client::request`].
    pub async fn post(&self, path: &str, options: RequestOptions) -> Result<Payload> {
        self.request(Method::Post, path, options).await
    }

    /// `PUT` request.
    ///
    /// # Errors
    ///
    /// See [`Client::request`].
    pub async fn put(&self, path: &str, options: RequestOptions) -> Result<Payload> {
        self.request(Method::Put, path, options).await
    }

    /// `PATCH` request.
    ///
    /// # Errors
    ///
    /// See [`Client::request`].
    pub async fn patch(&self, path: &str, options: RequestOptions) -> Result<Payload> {
        self.request(Method::Patch, path, options).await
    }

    /// `DELETE` request.
    ///
    /// # Errors
    ///
    /// See [`Client::request`].
    pub async fn delete(&self, path: &str, options: RequestOptions) -> Result<Payload> {
        self.request(Method::Delete, path, options).await
    }

    /// Send a request and decode the payload into `T`.
    ///
    /// `Ok(None)` when the response had no content.
    ///
    /// # Errors
    ///
    /// See [`Client::request`], plus JSON errors when the payload does not
    /// match `T`.
    pub async fn fetch<T: serde::de::DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        options: RequestOptions,
    ) -> Result<Option<T>> {
        self.request(method, path, options).await?.decode()
    }

    /// Download `url` and hand the body to `sink` under `filename`.
    ///
    /// A relative `url` is joined onto the base URL. The token is sent; the
    /// middleware pipeline is not run.
    ///
    /// # Errors
    ///
    /// Transport errors, [`Error::Http`](crate::Error::Http) on a failure
    /// status, and sink errors.
    pub async fn download<S: SaveSink + ?Sized>(
        &self,
        url: &str,
        filename: &str,
        sink: &S,
    ) -> Result<()> {
        let State { base_url, token } = self.state();
        let url = match url::Url::parse(url) {
            Ok(url) => url,
            Err(_) => url::Url::parse(&url_builder::join(&base_url, url))?,
        };

        let mut builder = Request::builder(Method::Get, url);
        if let Some(token) = token {
            builder = builder.header("Authorization", token);
        }

        debug!(filename, "download started");
        let response = self.inner.transport.execute(builder.build()).await?;
        if !response.is_success() {
            return Err(http_error(response.status(), response.into_body()));
        }

        sink.save(filename, response.into_body()).await
    }
}
