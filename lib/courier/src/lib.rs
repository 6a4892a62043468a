//! Client-side HTTP request helper.
//!
//! Compose a base URL with path segments and query parameters, attach default
//! and per-request headers, run an ordered chain of request-rewriting
//! middleware, send one request and get the body back as JSON, text or bytes
//! depending on its content type.
//!
//! # Example
//!
//! ```ignore
//! use courier::{Client, RequestOptions};
//!
//! let client = Client::new("https://api.example.com", Some("Bearer abc"));
//!
//! let created = client
//!     .post("users", RequestOptions::new().json(&serde_json::json!({"name": "x"}))?)
//!     .await?;
//! ```
//!
//! See the [tutorial][_tutorial] for a complete guide.

pub mod _tutorial;
mod client;
mod config;
mod connector;
pub mod dispatch;
pub mod download;
pub mod middleware;
pub mod normalize;
pub mod pipeline;
pub mod prelude;
mod transport;

pub use client::Client;
pub use config::{ClientConfig, ClientConfigBuilder, DEFAULT_BASE_URL};
pub use download::{FileSink, SaveSink};
pub use transport::{BoxedService, HyperClient, HyperClientBuilder, ServiceFuture};

// Re-export tower for layer composition
pub use tower;

// Re-export core types
pub use courier_core::{
    APPLICATION_JSON, Body, CacheMode, Credentials, EncodedBody, Error, Form, Headers, HttpClient,
    Method, Part, Payload, Query, QueryValue, Request, RequestBuilder, RequestOptions,
    RequestParts, Response, Result, Scalar, TransportHints, TransportOptions, from_json,
    from_json_value, to_json, url_builder,
};
