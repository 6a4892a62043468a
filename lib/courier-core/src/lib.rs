//! Core types for the courier HTTP request helper.
//!
//! This crate holds everything that does not touch the network:
//! - [`RequestOptions`] - immutable per-request options seen by middleware
//! - [`Query`], [`QueryValue`], [`Scalar`] - query parameter values
//! - [`Body`], [`Form`] - request bodies, including multipart forms
//! - [`url_builder`] - base + path + segments + query composition
//! - [`Request`], [`Response`] - transport-level request and buffered response
//! - [`HttpClient`] - the network transport capability
//! - [`Payload`] - decoded response body
//! - [`Error`] and [`Result`] - error handling

mod body;
mod client;
mod error;
mod headers;
mod method;
mod multipart;
mod options;
mod payload;
pub mod prelude;
mod query;
mod request;
mod response;
pub mod url_builder;

pub use body::{APPLICATION_JSON, Body, EncodedBody, from_json, from_json_value, to_json};
pub use client::HttpClient;
pub use error::{Error, Result};
pub use headers::Headers;
pub use method::Method;
pub use multipart::{Form, Part};
pub use options::{CacheMode, Credentials, RequestOptions, RequestParts, TransportOptions};
pub use payload::Payload;
pub use query::{Query, QueryValue, Scalar};
pub use request::{Request, RequestBuilder, TransportHints};
pub use response::Response;
