//! Transport-level HTTP request.
//!
//! This is what the dispatcher hands to an [`HttpClient`](crate::HttpClient)
//! once middleware has run and the body has been encoded.
//!
//! # Example
//!
//! ```
//! use courier_core::{Method, Request};
//!
//! let request = Request::builder(Method::Get, "https://api.test/users".parse().unwrap())
//!     .header("Accept", "application/json")
//!     .build();
//!
//! assert_eq!(request.header("accept"), Some("application/json"));
//! ```

use bytes::Bytes;

use crate::{Credentials, Headers, Method};

/// Transport options that have no HTTP header form, attached to the
/// request extensions for transport layers to inspect.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransportHints {
    /// Credentials mode.
    pub credentials: Option<Credentials>,
    /// Protocol-specific extension fields.
    pub extensions: serde_json::Map<String, serde_json::Value>,
}

/// An HTTP request with method, URL, headers, and optional body.
#[derive(Debug, Clone)]
pub struct Request {
    method: Method,
    url: url::Url,
    headers: Headers,
    body: Option<Bytes>,
    extensions: http::Extensions,
}

impl Request {
    /// Creates a new [`RequestBuilder`].
    #[must_use]
    pub fn builder(method: Method, url: url::Url) -> RequestBuilder {
        RequestBuilder::new(method, url)
    }

    /// HTTP method.
    #[must_use]
    pub const fn method(&self) -> Method {
        self.method
    }

    /// Request URL.
    #[must_use]
    pub const fn url(&self) -> &url::Url {
        &self.url
    }

    /// Request headers.
    #[must_use]
    pub const fn headers(&self) -> &Headers {
        &self.headers
    }

    /// Mutable access to headers.
    pub fn headers_mut(&mut self) -> &mut Headers {
        &mut self.headers
    }

    /// Single header value by name (case-insensitive).
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)
    }

    /// Request body.
    #[must_use]
    pub const fn body(&self) -> Option<&Bytes> {
        self.body.as_ref()
    }

    /// Request extensions.
    #[must_use]
    pub const fn extensions(&self) -> &http::Extensions {
        &self.extensions
    }

    /// Transport hints, when the dispatcher attached some.
    #[must_use]
    pub fn hints(&self) -> Option<&TransportHints> {
        self.extensions.get::<TransportHints>()
    }

    /// Consume into (method, url, headers, body, extensions).
    #[must_use]
    pub fn into_parts(self) -> (Method, url::Url, Headers, Option<Bytes>, http::Extensions) {
        (
            self.method,
            self.url,
            self.headers,
            self.body,
            self.extensions,
        )
    }
}

/// Builder for [`Request`].
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    method: Method,
    url: url::Url,
    headers: Headers,
    body: Option<Bytes>,
    extensions: http::Extensions,
}

impl RequestBuilder {
    /// Creates a new builder.
    #[must_use]
    pub fn new(method: Method, url: url::Url) -> Self {
        Self {
            method,
            url,
            headers: Headers::new(),
            body: None,
            extensions: http::Extensions::new(),
        }
    }

    /// Sets a header.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Overlays multiple headers.
    #[must_use]
    pub fn headers(mut self, headers: Headers) -> Self {
        self.headers.extend(headers);
        self
    }

    /// Sets the request body.
    #[must_use]
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Attaches transport hints.
    #[must_use]
    pub fn hints(mut self, hints: TransportHints) -> Self {
        self.extensions.insert(hints);
        self
    }

    /// Builds the [`Request`].
    #[must_use]
    pub fn build(self) -> Request {
        Request {
            method: self.method,
            url: self.url,
            headers: self.headers,
            body: self.body,
            extensions: self.extensions,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url() -> url::Url {
        url::Url::parse("https://api.test/users").expect("valid URL")
    }

    #[test]
    fn builder_basic() {
        let request = Request::builder(Method::Post, url())
            .header("Content-Type", "application/json")
            .body(r#"{"name":"x"}"#)
            .build();

        assert_eq!(request.method(), Method::Post);
        assert_eq!(request.url().as_str(), "https://api.test/users");
        assert_eq!(request.header("content-type"), Some("application/json"));
        assert_eq!(
            request.body().map(Bytes::as_ref),
            Some(br#"{"name":"x"}"#.as_slice())
        );
    }

    #[test]
    fn hints_travel_in_extensions() {
        let request = Request::builder(Method::Get, url()).build();
        assert!(request.hints().is_none());

        let hints = TransportHints {
            credentials: Some(Credentials::Include),
            ..TransportHints::default()
        };
        let request = Request::builder(Method::Get, url()).hints(hints.clone()).build();
        assert_eq!(request.hints(), Some(&hints));
    }
}
