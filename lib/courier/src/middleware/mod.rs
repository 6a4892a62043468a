//! Ready-made middleware.
//!
//! Two kinds live here:
//!
//! - pipeline middleware, implementing [`Middleware`](crate::pipeline::Middleware),
//!   which rewrite request options: [`CacheTags`]
//! - tower layers wrapping the transport: [`LoggingLayer`]
//!
//! # Example
//!
//! ```ignore
//! use courier::middleware::{CacheTags, LoggingLayer};
//! use courier::{Client, HyperClient};
//!
//! let transport = HyperClient::builder().layer(LoggingLayer::debug()).build();
//! let client = Client::with_transport(transport, "https://api.example.com", None);
//! client.use_middleware(CacheTags::new());
//! ```

mod cache_tags;
mod logging;

pub use cache_tags::{CacheTags, NEXT_KEY, REVALIDATE_KEY, TAGS_KEY, cache_key, cyrb53};
pub use logging::{LogLevel, Logging, LoggingLayer};

// Re-export tower types for custom transport layers
pub use tower::{Layer, ServiceBuilder};
