//! Network transport capability.
//!
//! The dispatcher only needs one thing from the network: given a fully
//! resolved [`Request`], perform it once and hand back a [`Response`].
//! Implement [`HttpClient`] to plug in another transport or a test double.

use std::future::Future;
use std::sync::Arc;

use crate::{Request, Response, Result};

/// Performs a single HTTP request.
///
/// # Example
///
/// ```
/// use courier_core::{Headers, HttpClient, Request, Response, Result};
///
/// #[derive(Clone)]
/// struct AlwaysNoContent;
///
/// impl HttpClient for AlwaysNoContent {
///     async fn execute(&self, _request: Request) -> Result<Response> {
///         Ok(Response::new(204, Headers::new(), ""))
///     }
/// }
/// ```
pub trait HttpClient: Send + Sync {
    /// Execute an HTTP request and return the buffered response.
    ///
    /// # Errors
    ///
    /// Returns an error when the request never produced a response:
    /// DNS failures, refused connections, TLS errors, broken bodies.
    /// Non-2xx statuses are *not* errors at this level.
    fn execute(&self, request: Request) -> impl Future<Output = Result<Response>> + Send;
}

impl<T: HttpClient> HttpClient for Arc<T> {
    fn execute(&self, request: Request) -> impl Future<Output = Result<Response>> + Send {
        T::execute(self, request)
    }
}
