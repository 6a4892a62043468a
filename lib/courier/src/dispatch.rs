//! Request dispatcher.
//!
//! Assembles the in-flight [`RequestOptions`] from the client defaults and the
//! caller's options, runs the middleware pipeline, resolves the URL, encodes
//! the body, performs one network call and normalizes the response.

use std::sync::Arc;

use courier_core::{APPLICATION_JSON, HttpClient, TransportHints, url_builder};
use tracing::{debug, error, warn};

use crate::normalize::normalize;
use crate::pipeline::{self, Middleware, RequestContext};
use crate::{Error, Headers, Method, Payload, Request, RequestOptions, Result};

/// Client state captured when a dispatch starts.
///
/// Middleware registered or tokens changed afterwards do not affect a
/// dispatch already holding a snapshot.
#[derive(Clone)]
pub struct DispatchSnapshot {
    /// Normalized base URL, ending with `/`.
    pub base_url: String,
    /// `Authorization` header value.
    pub token: Option<String>,
    /// Middleware stages, in registration order.
    pub middlewares: Vec<Arc<dyn Middleware>>,
}

impl std::fmt::Debug for DispatchSnapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DispatchSnapshot")
            .field("base_url", &self.base_url)
            .field("has_token", &self.token.is_some())
            .field("middlewares", &self.middlewares.len())
            .finish()
    }
}

/// Performs one request over a transport.
#[derive(Debug)]
pub struct Dispatcher<'a, C> {
    transport: &'a C,
    snapshot: DispatchSnapshot,
}

impl<'a, C: HttpClient> Dispatcher<'a, C> {
    /// Dispatcher over `transport` with the given client state.
    #[must_use]
    pub const fn new(transport: &'a C, snapshot: DispatchSnapshot) -> Self {
        Self {
            transport,
            snapshot,
        }
    }

    /// Default headers: JSON content type, plus the token when one is set.
    fn default_headers(&self) -> Headers {
        let mut headers = Headers::new();
        headers.insert("Content-Type", APPLICATION_JSON);
        if let Some(token) = &self.snapshot.token {
            headers.insert("Authorization", token.as_str());
        }
        headers
    }

    /// Options the first middleware receives.
    fn assemble(&self, method: Method, options: RequestOptions) -> RequestOptions {
        let parts = options.into_parts();

        let mut assembled = RequestOptions::new()
            .transport(parts.transport)
            .method(method)
            .headers(self.default_headers().merged(parts.headers))
            .params(parts.params)
            .with_query(parts.query)
            .expect_response(parts.expect_response);

        if let Some(url) = parts.url {
            assembled = assembled.url(url);
        }
        if let Some(body) = parts.body {
            assembled = assembled.body(body);
        }
        assembled
    }

    /// Run the request and normalize its response.
    ///
    /// # Errors
    ///
    /// - the first middleware error
    /// - [`Error::InvalidUrl`] when the resolved URL does not parse
    /// - body encoding and transport errors
    /// - normalization errors, see [`normalize`]
    pub async fn dispatch(
        &self,
        method: Method,
        path: &str,
        options: RequestOptions,
    ) -> Result<Payload> {
        debug!(%method, path, "dispatch started");

        let ctx = RequestContext::new(self.snapshot.base_url.as_str(), path, method);
        let assembled = self.assemble(method, options);
        let caller_url = assembled.url_override().map(str::to_string);

        let options = match pipeline::apply(assembled, &self.snapshot.middlewares, &ctx).await {
            Ok(options) => options,
            Err(err) => {
                error!(%method, path = ctx.path(), error = %err, "dispatch aborted by middleware");
                return Err(err);
            }
        };
        let parts = options.into_parts();

        let url = match parts.url.or(caller_url) {
            Some(url) => url,
            None => {
                let base_path = url_builder::join(&self.snapshot.base_url, path);
                url_builder::build(&base_path, &parts.params, &parts.query)
            }
        };

        let result = self
            .send(method, &url, parts.headers, parts.body, parts.transport)
            .await
            .and_then(|response| {
                if !response.is_success() {
                    warn!(status = response.status(), %url, "request failed with HTTP status");
                }
                normalize(response, parts.expect_response)
            });

        match &result {
            Ok(_) => debug!(%method, %url, "dispatch finished"),
            Err(Error::Http { .. }) => {}
            Err(err) => error!(%method, %url, error = %err, "dispatch failed"),
        }
        result
    }

    async fn send(
        &self,
        method: Method,
        url: &str,
        mut headers: Headers,
        body: Option<courier_core::Body>,
        transport: courier_core::TransportOptions,
    ) -> Result<crate::Response> {
        let url = url::Url::parse(url)?;
        let method = transport.method.unwrap_or(method);

        if let Some(cache) = transport.cache {
            for (name, value) in cache.request_directives() {
                if !headers.contains(name) {
                    headers.insert(*name, *value);
                }
            }
        }

        let mut builder = Request::builder(method, url);
        if let Some(body) = body {
            let encoded = body.encode()?;
            if let Some(content_type) = encoded.content_type {
                headers.insert("Content-Type", content_type);
            }
            builder = builder.body(encoded.bytes);
        }

        let request = builder
            .headers(headers)
            .hints(TransportHints {
                credentials: transport.credentials,
                extensions: transport.extensions,
            })
            .build();

        self.transport.execute(request).await
    }
}
