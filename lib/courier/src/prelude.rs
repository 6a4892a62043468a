//! Prelude module for convenient imports.
//!
//! ```ignore
//! use courier::prelude::*;
//! ```

pub use crate::middleware::CacheTags;
pub use crate::pipeline::{Middleware, RequestContext, from_fn, from_sync_fn};
pub use crate::{
    CacheMode, Client, ClientConfig, Credentials, Error, FileSink, Form, HttpClient, HyperClient,
    Method, Part, Payload, QueryValue, RequestOptions, Result, SaveSink,
};
pub use serde::{Deserialize, Serialize};
