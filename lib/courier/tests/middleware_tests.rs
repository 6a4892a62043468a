//! Middleware and transport layer tests using wiremock.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use assert2::{check, let_assert};
use courier::middleware::{CacheTags, LoggingLayer, cache_key};
use courier::pipeline::{self, Middleware, MiddlewareFuture, RequestContext};
use courier::{CacheMode, Client, Error, HyperClient, RequestOptions};
use serde_json::json;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_json, header, method, path},
};

async fn ok_server(route: &str) -> MockServer {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .mount(&mock_server)
        .await;
    mock_server
}

#[tokio::test]
async fn test_middleware_runs_in_order() {
    let mock_server = ok_server("/items").await;
    let client = Client::new(&mock_server.uri(), None);

    client.use_middleware(pipeline::from_sync_fn(|options: RequestOptions| {
        Ok(options.header("X-Trail", "first"))
    }));
    client.use_middleware(pipeline::from_fn(|options: RequestOptions| async move {
        let trail = format!("{},second", options.header_value("X-Trail").unwrap_or_default());
        Ok(options.header("X-Trail", trail))
    }));

    client.get("items", RequestOptions::new()).await.expect("get");

    let requests = mock_server.received_requests().await.expect("recording");
    check!(requests[0].headers.get("x-trail").map(|v| v.as_bytes()) == Some(b"first,second".as_slice()));
}

#[tokio::test]
async fn test_middleware_abort_skips_network() {
    let mock_server = ok_server("/items").await;
    let client = Client::new(&mock_server.uri(), None);
    let later_calls = Arc::new(AtomicUsize::new(0));

    client.use_middleware(pipeline::from_sync_fn(|_options: RequestOptions| {
        Err(Error::middleware("session expired"))
    }));
    let counter = Arc::clone(&later_calls);
    client.use_middleware(pipeline::from_sync_fn(move |options: RequestOptions| {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok(options)
    }));

    let result = client.get("items", RequestOptions::new()).await;

    let_assert!(Err(Error::Middleware(message)) = result);
    check!(message == "session expired");
    check!(later_calls.load(Ordering::SeqCst) == 0);
    check!(mock_server.received_requests().await.expect("recording").is_empty());
}

#[tokio::test]
async fn test_middleware_rewrites_body_and_url() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v2/users"))
        .and(body_json(json!({"name": "x", "source": "courier"})))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&mock_server)
        .await;

    let base = mock_server.uri();
    let client = Client::new(&base, None);
    client.use_middleware(pipeline::from_fn(move |options: RequestOptions| {
        let target = format!("{base}/v2/users");
        async move {
            let mut body = options
                .body_ref()
                .and_then(|body| match body {
                    courier::Body::Json(value) => Some(value.clone()),
                    _ => None,
                })
                .unwrap_or_default();
            body["source"] = json!("courier");
            Ok(options.body(body).url(target))
        }
    }));

    let options = RequestOptions::new().json(&json!({"name": "x"})).expect("json");
    client.post("users", options).await.expect("post");
}

struct RequireToken;

impl Middleware for RequireToken {
    fn handle<'a>(
        &'a self,
        options: RequestOptions,
        ctx: &'a RequestContext,
    ) -> MiddlewareFuture<'a> {
        Box::pin(async move {
            if options.header_value("Authorization").is_none() {
                return Err(Error::middleware(format!("{} needs a token", ctx.resolve_url(&options))));
            }
            Ok(options)
        })
    }
}

#[tokio::test]
async fn test_trait_middleware_sees_token_changes() {
    let mock_server = ok_server("/me").await;
    let client = Client::new(&mock_server.uri(), None);
    client.use_middleware(RequireToken);

    let err = client.get("me", RequestOptions::new()).await.expect_err("no token");
    check!(err.to_string().ends_with("/me needs a token"));

    client.set_token("Bearer t");
    client.get("me", RequestOptions::new()).await.expect("with token");

    let requests = mock_server.received_requests().await.expect("recording");
    check!(requests.len() == 1);
}

#[tokio::test]
async fn test_cache_tags_key_and_no_store() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/feed"))
        .and(header("Cache-Control", "no-store"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = Client::new(&mock_server.uri(), Some("abc"));
    let seen = Arc::new(std::sync::Mutex::new(None));
    client.use_middleware(CacheTags::new());

    let recorder = Arc::clone(&seen);
    client.use_middleware(pipeline::from_sync_fn(move |options: RequestOptions| {
        let next = options.transport_options().extensions.get("next").cloned();
        *recorder.lock().expect("lock") = next;
        Ok(options)
    }));

    let options = RequestOptions::new()
        .extension("tags", json!(["feed"]))
        .extension("revalidate", 0);
    client.get("feed", options).await.expect("get");

    let expected = cache_key(&format!("{}/feedabc", mock_server.uri()), 0);
    let_assert!(Some(next) = seen.lock().expect("lock").clone());
    check!(next == json!({"tags": ["feed", expected], "revalidate": 0}));
}

#[tokio::test]
async fn test_explicit_cache_mode_header() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/fresh"))
        .and(header("Cache-Control", "no-cache"))
        .and(header("Pragma", "no-cache"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = Client::new(&mock_server.uri(), None);
    client
        .get("fresh", RequestOptions::new().cache(CacheMode::Reload))
        .await
        .expect("get");
}

#[tokio::test]
async fn test_logging_layer_passes_through() {
    let mock_server = ok_server("/logged").await;

    let transport = HyperClient::builder()
        .layer(LoggingLayer::debug())
        .with_logging()
        .build();
    check!(transport.layer_count() == 2);

    let client = Client::with_transport(transport, &mock_server.uri(), Some("abc"));
    let payload = client.get("logged", RequestOptions::new()).await.expect("get");

    check!(payload.as_json() == Some(&json!({"ok": true})));
}
