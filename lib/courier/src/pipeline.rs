//! Middleware pipeline.
//!
//! A middleware receives the current [`RequestOptions`] and returns the
//! options the next stage will see. Stages run strictly one after another in
//! registration order; the first error aborts the dispatch and the remaining
//! stages never run.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use courier::pipeline::{self, Middleware, RequestContext};
//! use courier::{Method, RequestOptions};
//!
//! # async fn demo() -> courier::Result<()> {
//! let stages: Vec<Arc<dyn Middleware>> = vec![
//!     pipeline::from_sync_fn(|options: RequestOptions| Ok(options.header("X-Stage", "one"))),
//!     pipeline::from_fn(|options: RequestOptions| async move {
//!         Ok(options.header("X-Trace", "t-1"))
//!     }),
//! ];
//!
//! let ctx = RequestContext::new("https://api.test/", "users", Method::Get);
//! let options = pipeline::apply(RequestOptions::new(), &stages, &ctx).await?;
//! assert_eq!(options.header_value("x-stage"), Some("one"));
//! # Ok(())
//! # }
//! ```

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use courier_core::url_builder;
use tracing::debug;

use crate::{Method, RequestOptions, Result};

/// Future returned by [`Middleware::handle`].
pub type MiddlewareFuture<'a> = Pin<Box<dyn Future<Output = Result<RequestOptions>> + Send + 'a>>;

/// Read-only view of the dispatch a middleware runs in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    base_url: String,
    path: String,
    method: Method,
}

impl RequestContext {
    /// Context for a dispatch of `method` on `path`, relative to `base_url`.
    #[must_use]
    pub fn new(base_url: impl Into<String>, path: impl Into<String>, method: Method) -> Self {
        Self {
            base_url: base_url.into(),
            path: path.into(),
            method,
        }
    }

    /// Client base URL at dispatch start.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Relative path given to the verb.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Method chosen by the verb.
    #[must_use]
    pub const fn method(&self) -> Method {
        self.method
    }

    /// URL the options currently resolve to.
    ///
    /// An explicit URL in the options wins; otherwise the base, path, segments
    /// and query are composed.
    #[must_use]
    pub fn resolve_url(&self, options: &RequestOptions) -> String {
        if let Some(url) = options.url_override() {
            return url.to_string();
        }
        let base_path = url_builder::join(&self.base_url, &self.path);
        url_builder::build(&base_path, options.params_slice(), options.query_map())
    }
}

/// A stage of the request pipeline.
///
/// Return an error to abort the dispatch.
pub trait Middleware: Send + Sync {
    /// Transform the options for the next stage.
    fn handle<'a>(
        &'a self,
        options: RequestOptions,
        ctx: &'a RequestContext,
    ) -> MiddlewareFuture<'a>;
}

impl<M: Middleware + ?Sized> Middleware for Arc<M> {
    fn handle<'a>(
        &'a self,
        options: RequestOptions,
        ctx: &'a RequestContext,
    ) -> MiddlewareFuture<'a> {
        M::handle(self, options, ctx)
    }
}

/// Middleware backed by an async closure.
#[derive(Clone)]
pub struct FnMiddleware<F> {
    f: F,
}

impl<F, Fut> Middleware for FnMiddleware<F>
where
    F: Fn(RequestOptions) -> Fut + Send + Sync,
    Fut: Future<Output = Result<RequestOptions>> + Send + 'static,
{
    fn handle<'a>(
        &'a self,
        options: RequestOptions,
        _ctx: &'a RequestContext,
    ) -> MiddlewareFuture<'a> {
        Box::pin((self.f)(options))
    }
}

/// Middleware backed by a synchronous closure.
#[derive(Clone)]
pub struct SyncFnMiddleware<F> {
    f: F,
}

impl<F> Middleware for SyncFnMiddleware<F>
where
    F: Fn(RequestOptions) -> Result<RequestOptions> + Send + Sync,
{
    fn handle<'a>(
        &'a self,
        options: RequestOptions,
        _ctx: &'a RequestContext,
    ) -> MiddlewareFuture<'a> {
        let result = (self.f)(options);
        Box::pin(async move { result })
    }
}

/// Wrap an async closure as a middleware.
pub fn from_fn<F, Fut>(f: F) -> Arc<dyn Middleware>
where
    F: Fn(RequestOptions) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<RequestOptions>> + Send + 'static,
{
    Arc::new(FnMiddleware { f })
}

/// Wrap a synchronous closure as a middleware.
pub fn from_sync_fn<F>(f: F) -> Arc<dyn Middleware>
where
    F: Fn(RequestOptions) -> Result<RequestOptions> + Send + Sync + 'static,
{
    Arc::new(SyncFnMiddleware { f })
}

/// Run `options` through every stage in order.
///
/// Stage `i + 1` receives exactly what stage `i` returned. An empty list
/// returns the input unchanged.
///
/// # Errors
///
/// Returns the first stage error; later stages are skipped.
pub async fn apply(
    options: RequestOptions,
    middlewares: &[Arc<dyn Middleware>],
    ctx: &RequestContext,
) -> Result<RequestOptions> {
    let mut current = options;
    for (stage, middleware) in middlewares.iter().enumerate() {
        current = match middleware.handle(current, ctx).await {
            Ok(next) => next,
            Err(err) => {
                debug!(stage, error = %err, "middleware aborted dispatch");
                return Err(err);
            }
        };
    }
    Ok(current)
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use assert2::{check, let_assert};

    use super::*;
    use crate::Error;

    fn ctx() -> RequestContext {
        RequestContext::new("https://api.test/", "/users", Method::Get)
    }

    #[tokio::test]
    async fn empty_pipeline_is_identity() {
        let options = RequestOptions::new().param("a").header("X-Id", "1");
        let out = apply(options, &[], &ctx()).await.expect("apply");

        check!(out.params_slice() == ["a"]);
        check!(out.header_value("x-id") == Some("1"));
    }

    #[tokio::test]
    async fn each_stage_sees_previous_output() {
        let first = from_sync_fn(|options: RequestOptions| Ok(options.header("X-Stage", "one")));
        let second = from_fn(|options: RequestOptions| async move {
            let seen = options.header_value("X-Stage").unwrap_or_default().to_string();
            Ok(options.header("X-Seen", seen).header("X-Stage", "two"))
        });

        let out = apply(RequestOptions::new(), &[first, second], &ctx())
            .await
            .expect("apply");

        check!(out.header_value("x-seen") == Some("one"));
        check!(out.header_value("x-stage") == Some("two"));
    }

    #[tokio::test]
    async fn failing_stage_skips_the_rest() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counted = Arc::clone(&calls);

        let failing = from_sync_fn(|_options: RequestOptions| Err(Error::middleware("denied")));
        let never = from_sync_fn(move |options: RequestOptions| {
            counted.fetch_add(1, Ordering::SeqCst);
            Ok(options)
        });

        let result = apply(RequestOptions::new(), &[failing, never], &ctx()).await;

        let_assert!(Err(Error::Middleware(message)) = result);
        check!(message == "denied");
        check!(calls.load(Ordering::SeqCst) == 0);
    }

    #[test]
    fn context_resolves_built_url() {
        let options = RequestOptions::new()
            .param("42")
            .query("expand", "owner");
        check!(ctx().resolve_url(&options) == "https://api.test/users/42?expand=owner");
    }

    #[test]
    fn context_prefers_explicit_url() {
        let options = RequestOptions::new().param("42").url("https://other.test/x");
        check!(ctx().resolve_url(&options) == "https://other.test/x");
    }

    struct Tagger;

    impl Middleware for Tagger {
        fn handle<'a>(
            &'a self,
            options: RequestOptions,
            ctx: &'a RequestContext,
        ) -> MiddlewareFuture<'a> {
            Box::pin(async move { Ok(options.header("X-Path", ctx.path())) })
        }
    }

    #[tokio::test]
    async fn trait_middleware_reads_context() {
        let stages: Vec<Arc<dyn Middleware>> = vec![Arc::new(Tagger)];
        let out = apply(RequestOptions::new(), &stages, &ctx())
            .await
            .expect("apply");
        check!(out.header_value("X-Path") == Some("/users"));
    }
}
