//! Request options flowing through the middleware pipeline.
//!
//! [`RequestOptions`] is an immutable value: every builder method consumes the
//! options and returns a new value, so each pipeline stage hands the next one
//! a fresh copy with its overrides applied.
//!
//! # Example
//!
//! ```
//! use courier_core::{CacheMode, RequestOptions};
//!
//! let options = RequestOptions::new()
//!     .param("42")
//!     .query("expand", vec!["owner", "tags"])
//!     .header("X-Request-Id", "r-1")
//!     .cache(CacheMode::NoStore);
//!
//! assert_eq!(options.params_slice(), ["42"]);
//! assert!(options.expects_response());
//! ```

use serde_json::{Map, Value};

use crate::{Body, Form, Headers, Method, Query, QueryValue, Result};

/// Credentials mode forwarded to the transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Credentials {
    /// Never send credentials.
    Omit,
    /// Send credentials to the same origin only.
    SameOrigin,
    /// Always send credentials.
    Include,
}

/// Cache mode forwarded to the transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CacheMode {
    /// Transport default.
    #[default]
    Default,
    /// Bypass caches entirely.
    NoStore,
    /// Revalidate with the origin, updating caches.
    Reload,
    /// Always revalidate.
    NoCache,
    /// Prefer cached data, even stale.
    ForceCache,
    /// Only serve from cache.
    OnlyIfCached,
}

impl CacheMode {
    /// Request directives implied by this mode, as `(header, value)` pairs.
    #[must_use]
    pub const fn request_directives(self) -> &'static [(&'static str, &'static str)] {
        match self {
            Self::NoStore => &[("Cache-Control", "no-store")],
            Self::NoCache | Self::Reload => {
                &[("Cache-Control", "no-cache"), ("Pragma", "no-cache")]
            }
            Self::Default | Self::ForceCache | Self::OnlyIfCached => &[],
        }
    }
}

/// Transport-level options passed through untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransportOptions {
    /// HTTP method.
    pub method: Option<Method>,
    /// Credentials mode.
    pub credentials: Option<Credentials>,
    /// Cache mode.
    pub cache: Option<CacheMode>,
    /// Protocol-specific extension fields.
    pub extensions: Map<String, Value>,
}

impl TransportOptions {
    /// Overlays `later` key by key: set fields and extension keys of `later` win.
    #[must_use]
    pub fn merged(self, later: Self) -> Self {
        let mut extensions = self.extensions;
        extensions.extend(later.extensions);
        Self {
            method: later.method.or(self.method),
            credentials: later.credentials.or(self.credentials),
            cache: later.cache.or(self.cache),
            extensions,
        }
    }
}

/// Options for a single request.
///
/// `expect_response` defaults to `true`. When it is `false` the response
/// body is never read.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    params: Vec<String>,
    query: Query,
    body: Option<Body>,
    headers: Headers,
    expect_response: Option<bool>,
    url: Option<String>,
    transport: TransportOptions,
}

impl RequestOptions {
    /// Empty options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // ========================================================================
    // Builders
    // ========================================================================

    /// Appends a path segment.
    #[must_use]
    pub fn param(mut self, segment: impl Into<String>) -> Self {
        self.params.push(segment.into());
        self
    }

    /// Replaces the path segments.
    #[must_use]
    pub fn params<S: Into<String>>(mut self, segments: impl IntoIterator<Item = S>) -> Self {
        self.params = segments.into_iter().map(Into::into).collect();
        self
    }

    /// Sets a query parameter.
    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl Into<QueryValue>) -> Self {
        self.query.insert(key, value);
        self
    }

    /// Replaces the whole query.
    #[must_use]
    pub fn with_query(mut self, query: Query) -> Self {
        self.query = query;
        self
    }

    /// Sets the body.
    #[must_use]
    pub fn body(mut self, body: impl Into<Body>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Sets a JSON body from a serializable value.
    pub fn json<T: serde::Serialize>(self, value: &T) -> Result<Self> {
        Ok(self.body(Body::json(value)?))
    }

    /// Sets a text body.
    #[must_use]
    pub fn text(self, text: impl Into<String>) -> Self {
        self.body(Body::Text(text.into()))
    }

    /// Sets a raw binary body.
    #[must_use]
    pub fn binary(self, bytes: impl Into<bytes::Bytes>) -> Self {
        self.body(Body::Binary(bytes.into()))
    }

    /// Sets a multipart form body.
    #[must_use]
    pub fn multipart(self, form: Form) -> Self {
        self.body(Body::Multipart(form))
    }

    /// Removes the body.
    #[must_use]
    pub fn without_body(mut self) -> Self {
        self.body = None;
        self
    }

    /// Sets a header; colliding names take this value.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Overlays several headers.
    #[must_use]
    pub fn headers(mut self, headers: Headers) -> Self {
        self.headers.extend(headers);
        self
    }

    /// Removes a header.
    #[must_use]
    pub fn without_header(mut self, name: &str) -> Self {
        self.headers.remove(name);
        self
    }

    /// Whether the response body should be decoded.
    #[must_use]
    pub fn expect_response(mut self, expect: bool) -> Self {
        self.expect_response = Some(expect);
        self
    }

    /// Full URL override; bypasses the URL builder.
    #[must_use]
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Clears the URL override.
    #[must_use]
    pub fn without_url(mut self) -> Self {
        self.url = None;
        self
    }

    /// Sets the HTTP method.
    #[must_use]
    pub fn method(mut self, method: Method) -> Self {
        self.transport.method = Some(method);
        self
    }

    /// Sets the credentials mode.
    #[must_use]
    pub fn credentials(mut self, credentials: Credentials) -> Self {
        self.transport.credentials = Some(credentials);
        self
    }

    /// Sets the cache mode.
    #[must_use]
    pub fn cache(mut self, cache: CacheMode) -> Self {
        self.transport.cache = Some(cache);
        self
    }

    /// Sets a protocol-specific extension field.
    #[must_use]
    pub fn extension(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.transport.extensions.insert(key.into(), value.into());
        self
    }

    /// Overlays transport options key by key.
    #[must_use]
    pub fn transport(mut self, transport: TransportOptions) -> Self {
        self.transport = self.transport.merged(transport);
        self
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Path segments, in order.
    #[must_use]
    pub fn params_slice(&self) -> &[String] {
        &self.params
    }

    /// Query mapping.
    #[must_use]
    pub fn query_map(&self) -> &Query {
        &self.query
    }

    /// Body, if any.
    #[must_use]
    pub const fn body_ref(&self) -> Option<&Body> {
        self.body.as_ref()
    }

    /// Headers.
    #[must_use]
    pub const fn header_map(&self) -> &Headers {
        &self.headers
    }

    /// Single header by name (case-insensitive).
    #[must_use]
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers.get(name)
    }

    /// Whether the response body should be decoded (default `true`).
    #[must_use]
    pub fn expects_response(&self) -> bool {
        self.expect_response.unwrap_or(true)
    }

    /// URL override, if any.
    #[must_use]
    pub fn url_override(&self) -> Option<&str> {
        self.url.as_deref()
    }

    /// Transport options.
    #[must_use]
    pub const fn transport_options(&self) -> &TransportOptions {
        &self.transport
    }

    /// Consumes the options into their parts.
    #[must_use]
    pub fn into_parts(self) -> RequestParts {
        RequestParts {
            params: self.params,
            query: self.query,
            body: self.body,
            headers: self.headers,
            expect_response: self.expect_response.unwrap_or(true),
            url: self.url,
            transport: self.transport,
        }
    }
}

/// Destructured [`RequestOptions`].
#[derive(Debug, Clone)]
pub struct RequestParts {
    /// Path segments.
    pub params: Vec<String>,
    /// Query mapping.
    pub query: Query,
    /// Body, not yet encoded.
    pub body: Option<Body>,
    /// Headers.
    pub headers: Headers,
    /// Whether the response body should be decoded.
    pub expect_response: bool,
    /// URL override.
    pub url: Option<String>,
    /// Remaining transport options.
    pub transport: TransportOptions,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn defaults() {
        let options = RequestOptions::new();
        assert!(options.expects_response());
        assert!(options.params_slice().is_empty());
        assert!(options.body_ref().is_none());
        assert!(options.url_override().is_none());
    }

    #[test]
    fn builders_copy_and_override() {
        let base = RequestOptions::new().header("X-Stage", "one").param("a");
        let next = base.clone().header("x-stage", "two").param("b");

        assert_eq!(base.header_value("X-Stage"), Some("one"));
        assert_eq!(next.header_value("X-Stage"), Some("two"));
        assert_eq!(next.params_slice(), ["a", "b"]);
        assert_eq!(base.params_slice(), ["a"]);
    }

    #[test]
    fn url_can_be_set_and_stripped() {
        let options = RequestOptions::new().url("https://other.test/x");
        assert_eq!(options.url_override(), Some("https://other.test/x"));
        assert!(options.without_url().url_override().is_none());
    }

    #[test]
    fn transport_merge_later_wins_per_key() {
        let earlier = TransportOptions {
            method: Some(Method::Get),
            cache: Some(CacheMode::NoStore),
            extensions: json!({"a": 1, "b": 2})
                .as_object()
                .cloned()
                .unwrap_or_default(),
            ..TransportOptions::default()
        };
        let later = TransportOptions {
            method: Some(Method::Post),
            extensions: json!({"b": 3}).as_object().cloned().unwrap_or_default(),
            ..TransportOptions::default()
        };

        let merged = earlier.merged(later);
        assert_eq!(merged.method, Some(Method::Post));
        assert_eq!(merged.cache, Some(CacheMode::NoStore));
        assert_eq!(merged.extensions.get("a"), Some(&json!(1)));
        assert_eq!(merged.extensions.get("b"), Some(&json!(3)));
    }

    #[test]
    fn cache_mode_directives() {
        assert_eq!(
            CacheMode::NoStore.request_directives(),
            &[("Cache-Control", "no-store")]
        );
        assert_eq!(CacheMode::Reload.request_directives().len(), 2);
        assert!(CacheMode::ForceCache.request_directives().is_empty());
    }

    #[test]
    fn into_parts_resolves_expect_response() {
        let parts = RequestOptions::new()
            .expect_response(false)
            .json(&json!({"name": "x"}))
            .expect("json")
            .into_parts();
        assert!(!parts.expect_response);
        assert!(matches!(parts.body, Some(Body::Json(_))));
    }
}
