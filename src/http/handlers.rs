//! Route handlers.

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, Method, Uri},
    response::Response,
    Json,
};
use serde::Serialize;
use serde_json::Value;

use crate::http::error::RelayError;
use crate::http::request::{parse_json_object, request_id, wants_stream};
use crate::http::response::{relay_dedicated, relay_passthrough};
use crate::http::server::AppState;
use crate::routing::RouteKind;
use crate::security::{ContentTypePolicy, ForwardHeaders};
use crate::upstream::UpstreamRequest;

pub const SERVICE_NAME: &str = "AI API Relay";

#[derive(Debug, Serialize)]
pub struct ServiceInfo {
    pub service: &'static str,
    pub status: &'static str,
    pub target_api: String,
    pub version: &'static str,
}

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
}

pub async fn root(State(state): State<AppState>) -> Json<ServiceInfo> {
    Json(ServiceInfo {
        service: SERVICE_NAME,
        status: "running",
        target_api: state.config.target.chat_completions_url().to_string(),
        version: env!("CARGO_PKG_VERSION"),
    })
}

pub async fn health() -> Json<HealthStatus> {
    Json(HealthStatus { status: "healthy" })
}

/// `POST /v1/chat/completions` and `POST /chat/completions`.
pub async fn chat_completions(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, RelayError> {
    let payload = parse_json_object(&body)?;
    let stream = wants_stream(&payload);
    let model = payload.get("model").and_then(Value::as_str).unwrap_or("unknown");

    tracing::info!(
        request_id = %request_id(&headers),
        model = %model,
        stream,
        "Chat completion request received"
    );

    let forward = ForwardHeaders::resolve(
        &headers,
        state.config.target_api_key.as_deref(),
        ContentTypePolicy::Json,
    )?;

    let response = state
        .upstream
        .dispatch(UpstreamRequest {
            method: Method::POST,
            url: state.config.target.chat_completions_url().to_string(),
            headers: forward,
            body: Some(body),
        })
        .await?;

    relay_dedicated(RouteKind::ChatCompletions, response, stream).await
}

/// `GET /v1/models` and `GET /models`.
pub async fn list_models(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, RelayError> {
    let url = state.config.target.models_url();

    tracing::info!(
        request_id = %request_id(&headers),
        url = %url,
        "Listing models"
    );

    let forward = ForwardHeaders::resolve(
        &headers,
        state.config.target_api_key.as_deref(),
        ContentTypePolicy::Json,
    )?;

    let response = state
        .upstream
        .dispatch(UpstreamRequest {
            method: Method::GET,
            url,
            headers: forward,
            body: None,
        })
        .await?;

    relay_dedicated(RouteKind::Models, response, false).await
}

/// Every other path: forwarded under the upstream base URL.
pub async fn passthrough(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, RelayError> {
    let url = state.config.target.passthrough_url(uri.path(), uri.query());
    let body = matches!(method, Method::POST | Method::PUT | Method::PATCH).then_some(body);

    tracing::info!(
        request_id = %request_id(&headers),
        method = %method,
        path = %uri.path(),
        "Forwarding request"
    );

    let forward = ForwardHeaders::resolve(
        &headers,
        state.config.target_api_key.as_deref(),
        ContentTypePolicy::PassThrough,
    )?;

    let response = state
        .upstream
        .dispatch(UpstreamRequest {
            method,
            url,
            headers: forward,
            body,
        })
        .await?;

    relay_passthrough(response).await
}
