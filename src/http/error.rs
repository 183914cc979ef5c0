//! Relay error taxonomy and its HTTP mapping.
//!
//! Every failure is converted to a response here; nothing propagates past the
//! request boundary.

use std::error::Error as StdError;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::observability::metrics;

/// Errors produced while handling one relay request.
#[derive(Debug, Error)]
pub enum RelayError {
    /// Missing or malformed local credential (401).
    #[error("{0}")]
    Unauthorized(String),

    /// Wrong local credential (403).
    #[error("{0}")]
    Forbidden(String),

    /// Inbound body is not the JSON the route requires (400).
    #[error("{0}")]
    BadRequest(String),

    /// Upstream did not answer within the configured timeout (504).
    #[error("upstream request timed out")]
    Timeout,

    /// Connection, DNS or TLS failure reaching the upstream (502).
    #[error("failed to reach upstream: {0}")]
    Transport(String),

    /// Upstream answered with a non-2xx status; relayed with that status.
    #[error("{message}")]
    Upstream { status: StatusCode, message: String },

    /// Anything else, including undecodable upstream bodies (500).
    #[error("internal server error: {0}")]
    Internal(String),
}

impl RelayError {
    /// Status code the error is reported with.
    pub fn status_code(&self) -> StatusCode {
        match self {
            RelayError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            RelayError::Forbidden(_) => StatusCode::FORBIDDEN,
            RelayError::BadRequest(_) => StatusCode::BAD_REQUEST,
            RelayError::Timeout => StatusCode::GATEWAY_TIMEOUT,
            RelayError::Transport(_) => StatusCode::BAD_GATEWAY,
            RelayError::Upstream { status, .. } => *status,
            RelayError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Short label for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            RelayError::Unauthorized(_) => "unauthorized",
            RelayError::Forbidden(_) => "forbidden",
            RelayError::BadRequest(_) => "bad_request",
            RelayError::Timeout => "timeout",
            RelayError::Transport(_) => "transport",
            RelayError::Upstream { .. } => "upstream",
            RelayError::Internal(_) => "internal",
        }
    }
}

impl From<reqwest::Error> for RelayError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            RelayError::Timeout
        } else {
            RelayError::Transport(describe(&err))
        }
    }
}

/// Render an error together with its source chain.
///
/// reqwest's top-level message only names the URL; the cause (refused, DNS,
/// TLS) sits further down the chain.
pub fn describe(err: &(dyn StdError + 'static)) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let cause_text = cause.to_string();
        if !message.contains(&cause_text) {
            message.push_str(": ");
            message.push_str(&cause_text);
        }
        source = cause.source();
    }
    message
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        match &self {
            RelayError::Timeout | RelayError::Transport(_) => {
                metrics::record_upstream_error(self.kind());
                tracing::error!(kind = self.kind(), status = status.as_u16(), error = %self, "Upstream request failed");
            }
            RelayError::Internal(_) => {
                tracing::error!(kind = self.kind(), error = %self, "Request failed");
            }
            RelayError::Upstream { .. } => {}
            _ => {
                tracing::warn!(kind = self.kind(), status = status.as_u16(), error = %self, "Request rejected");
            }
        }

        let body = match self {
            RelayError::Upstream { message, .. } => json!({ "error": message }),
            other => json!({ "detail": other.to_string() }),
        };

        (status, Json(body)).into_response()
    }
}
