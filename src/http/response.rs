//! Response relay.
//!
//! # Responsibilities
//! - Stream upstream bodies through chunk by chunk for streaming chat calls
//! - Buffer and validate JSON bodies for everything else
//! - Wrap upstream non-2xx answers on the dedicated routes
//!
//! # Design Decisions
//! - Streaming responses never buffer the whole body; each chunk is handed
//!   to the client before the next one is read
//! - Dropping the outbound body drops the upstream stream, which closes the
//!   upstream connection on every exit path
//! - Validated JSON is re-emitted as the original bytes, so key order and
//!   formatting survive the relay
//! - A stream failure after headers were sent ends the body quietly

use axum::{
    body::{Body, Bytes},
    http::{
        header::{CACHE_CONTROL, CONNECTION, CONTENT_TYPE},
        HeaderValue, StatusCode,
    },
    response::{IntoResponse, Response},
    Json,
};
use futures_util::{future, StreamExt, TryStreamExt};
use serde::de::IgnoredAny;
use serde_json::json;

use crate::http::error::RelayError;
use crate::routing::RouteKind;

/// Relay an upstream answer on the chat-completions or models route.
pub async fn relay_dedicated(
    route: RouteKind,
    response: reqwest::Response,
    wants_stream: bool,
) -> Result<Response, RelayError> {
    let status = response.status();

    if !status.is_success() && route.wraps_upstream_errors() {
        let text = response.text().await?;
        tracing::error!(
            route = %route,
            status = status.as_u16(),
            body = %text,
            "Upstream returned an error"
        );
        return Err(RelayError::Upstream {
            status,
            message: format!("upstream returned {}: {}", status, text),
        });
    }

    if wants_stream {
        tracing::info!(route = %route, "Returning streaming response");
        return Ok(stream_body(status, response));
    }

    tracing::info!(route = %route, "Returning buffered response");
    let body = response.bytes().await?;
    validate_json(&body)?;
    Ok(json_bytes(status, body))
}

/// Relay an upstream answer on the catch-all route.
///
/// The status is kept verbatim; JSON bodies are validated and re-emitted,
/// anything else is wrapped as `{"data": "<text>"}`.
pub async fn relay_passthrough(response: reqwest::Response) -> Result<Response, RelayError> {
    let status = response.status();
    let is_json = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("application/json"));

    let body = response.bytes().await?;

    if is_json {
        validate_json(&body)?;
        return Ok(json_bytes(status, body));
    }

    let text = String::from_utf8_lossy(&body);
    Ok((status, Json(json!({ "data": text }))).into_response())
}

/// Forward the upstream byte stream as server-sent events.
fn stream_body(status: StatusCode, response: reqwest::Response) -> Response {
    let chunks = response
        .bytes_stream()
        .inspect_err(|e| {
            tracing::warn!(error = %e, "Upstream stream ended early");
        })
        .take_while(|chunk| future::ready(chunk.is_ok()))
        .try_filter(|chunk| future::ready(!chunk.is_empty()));

    (
        status,
        [
            (CONTENT_TYPE, HeaderValue::from_static("text/event-stream")),
            (CACHE_CONTROL, HeaderValue::from_static("no-cache")),
            (CONNECTION, HeaderValue::from_static("keep-alive")),
        ],
        Body::from_stream(chunks),
    )
        .into_response()
}

fn validate_json(body: &[u8]) -> Result<(), RelayError> {
    serde_json::from_slice::<IgnoredAny>(body)
        .map(|_| ())
        .map_err(|e| RelayError::Internal(format!("upstream returned invalid JSON: {}", e)))
}

fn json_bytes(status: StatusCode, body: Bytes) -> Response {
    (
        status,
        [(CONTENT_TYPE, HeaderValue::from_static("application/json"))],
        body,
    )
        .into_response()
}
