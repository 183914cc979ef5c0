//! Relay key gate behavior at the HTTP surface.

use axum::{
    body::Body,
    http::{HeaderValue, Request, StatusCode},
    routing::{any, post},
    Json, Router,
};
use chat_relay::HttpServer;
use serde_json::{json, Value};
use tower::ServiceExt;

mod common;

fn gated_server(upstream: std::net::SocketAddr) -> HttpServer {
    let mut config = common::relay_config(upstream);
    config.relay_api_key = Some("relay-secret".to_string());
    HttpServer::new(config).unwrap()
}

async fn status_of(server: &HttpServer, method: &str, path: &str, auth: Option<&str>) -> StatusCode {
    let mut request = Request::builder().method(method).uri(path);
    if let Some(auth) = auth {
        request = request.header("authorization", auth);
    }
    let body = if method == "POST" { Body::from("{}") } else { Body::empty() };

    server
        .router()
        .oneshot(request.body(body).unwrap())
        .await
        .unwrap()
        .status()
}

#[tokio::test]
async fn test_gate_rejects_before_forwarding() {
    // Nothing listens upstream: a forwarded request would surface as 502.
    let server = gated_server(common::closed_port().await);

    for (method, path) in [
        ("POST", "/v1/chat/completions"),
        ("POST", "/chat/completions"),
        ("GET", "/v1/models"),
        ("GET", "/models"),
        ("GET", "/v1/files"),
        ("DELETE", "/foo/bar"),
    ] {
        assert_eq!(status_of(&server, method, path, None).await, StatusCode::UNAUTHORIZED, "{method} {path}");
        assert_eq!(
            status_of(&server, method, path, Some("Basic cmVsYXk=")).await,
            StatusCode::UNAUTHORIZED,
            "{method} {path}"
        );
        assert_eq!(
            status_of(&server, method, path, Some("Bearer wrong-key")).await,
            StatusCode::FORBIDDEN,
            "{method} {path}"
        );
        assert_eq!(
            status_of(&server, method, path, Some("Bearer relay-secret")).await,
            StatusCode::BAD_GATEWAY,
            "{method} {path}"
        );
    }
}

#[tokio::test]
async fn test_service_endpoints_are_open() {
    let server = gated_server(common::closed_port().await);

    assert_eq!(status_of(&server, "GET", "/", None).await, StatusCode::OK);
    assert_eq!(status_of(&server, "GET", "/health", None).await, StatusCode::OK);
}

#[tokio::test]
async fn test_no_key_configured_allows_all() {
    let server = HttpServer::new(common::relay_config(common::closed_port().await)).unwrap();

    for auth in [None, Some("Bearer anything"), Some("Basic cmVsYXk="), Some("garbage")] {
        assert_eq!(
            status_of(&server, "POST", "/v1/chat/completions", auth).await,
            StatusCode::BAD_GATEWAY,
            "{auth:?}"
        );
    }
}

#[tokio::test]
async fn test_accepted_key_reaches_upstream() {
    let upstream = common::start_mock_upstream(
        Router::new()
            .route(
                "/v1/chat/completions",
                post(|| async { Json(json!({ "choices": [{ "text": "ok" }] })) }),
            )
            .route("/v1/files", any(|| async { Json(json!({ "data": [] })) })),
    )
    .await;
    let relay = common::start_relay({
        let mut config = common::relay_config(upstream);
        config.relay_api_key = Some("relay-secret".to_string());
        config
    })
    .await;
    let client = common::client();

    let res = client
        .post(relay.url("/v1/chat/completions"))
        .bearer_auth("relay-secret")
        .json(&json!({ "model": "gpt-4o" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = client.get(relay.url("/v1/files")).bearer_auth("relay-secret").send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = client.get(relay.url("/v1/files")).bearer_auth("nope").send().await.unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["detail"], "invalid API key");
}

#[tokio::test]
async fn test_non_utf8_bearer_token_is_forbidden() {
    let server = gated_server(common::closed_port().await);

    let request = Request::builder()
        .method("GET")
        .uri("/v1/models")
        .header("authorization", HeaderValue::from_bytes(b"Bearer w\xe9rong").unwrap())
        .body(Body::empty())
        .unwrap();
    let res = server.router().oneshot(request).await.unwrap();

    assert_eq!(res.status(), StatusCode::FORBIDDEN);
}
