//! Prelude module for convenient imports.
//!
//! ```ignore
//! use courier_core::prelude::*;
//! ```

pub use crate::{
    Body, CacheMode, Credentials, Error, Form, Headers, HttpClient, Method, Part, Payload, Query,
    QueryValue, Request, RequestOptions, Response, Result, Scalar,
};
