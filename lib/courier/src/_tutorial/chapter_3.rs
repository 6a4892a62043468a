//! # Chapter 3: Middleware
//!
//! Middleware rewrite the request options before anything is sent. They run
//! in registration order, each one seeing what the previous one returned.
//!
//! ## Closures
//!
//! ```ignore
//! use courier::pipeline;
//!
//! client.use_middleware(pipeline::from_sync_fn(|options: RequestOptions| {
//!     Ok(options.header("X-Client", "courier"))
//! }));
//!
//! client.use_middleware(pipeline::from_fn(|options: RequestOptions| async move {
//!     let id = next_request_id().await;
//!     Ok(options.header("X-Request-Id", id))
//! }));
//! ```
//!
//! Return an error to abort the request; later middleware do not run:
//!
//! ```ignore
//! client.use_middleware(pipeline::from_sync_fn(|options: RequestOptions| {
//!     if options.header_value("Authorization").is_none() {
//!         return Err(courier::Error::middleware("not logged in"));
//!     }
//!     Ok(options)
//! }));
//! ```
//!
//! ## Implementing the Trait
//!
//! Implement [`Middleware`](crate::pipeline::Middleware) to read the
//! [`RequestContext`](crate::pipeline::RequestContext), for example to learn
//! the URL a request resolves to. [`CacheTags`](crate::middleware::CacheTags)
//! does this to derive a cache key.
//!
//! ## Transport Layers
//!
//! Tower layers wrap the network transport itself and see every request
//! after the pipeline:
//!
//! ```ignore
//! use courier::{Client, HyperClient};
//!
//! let transport = HyperClient::builder().with_debug_logging().build();
//! let client = Client::with_transport(transport, "https://api.example.com", None);
//! ```
