//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (clap handles syntactic)
//! - Check the target URL is absolute http(s) and carries the
//!   `/v1/chat/completions` suffix the route table strips against
//! - Validate value ranges (timeout > 0, non-empty host)
//! - Reject a target API key that cannot be sent as a header
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is a pure function over the parsed arguments
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use axum::http::HeaderValue;
use thiserror::Error;

use crate::config::loader::RelayArgs;
use crate::routing::UpstreamTarget;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("target URL `{url}` is not a valid URL: {reason}")]
    InvalidTargetUrl { url: String, reason: String },

    #[error("target URL `{url}` uses unsupported scheme `{scheme}` (expected http or https)")]
    UnsupportedScheme { url: String, scheme: String },

    #[error("target URL `{0}` does not contain the `/v1/chat/completions` suffix")]
    MissingChatCompletionsSuffix(String),

    #[error("target API key contains characters not allowed in an HTTP header")]
    InvalidTargetApiKey,

    #[error("timeout must be greater than zero seconds")]
    ZeroTimeout,

    #[error("max body size must be greater than zero bytes")]
    ZeroBodyLimit,

    #[error("listen host must not be empty")]
    EmptyHost,

    #[error("metrics address `{0}` is not a valid socket address")]
    InvalidMetricsAddress(String),
}

/// Validate parsed arguments, collecting every error found.
pub fn validate_args(args: &RelayArgs) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if let Err(e) = UpstreamTarget::parse(&args.target_api_url) {
        errors.push(e);
    }

    let target_api_key = args.target_api_key.trim();
    if !target_api_key.is_empty()
        && HeaderValue::from_str(&format!("Bearer {}", args.target_api_key)).is_err()
    {
        errors.push(ValidationError::InvalidTargetApiKey);
    }

    if args.timeout == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }

    if args.max_body_bytes == 0 {
        errors.push(ValidationError::ZeroBodyLimit);
    }

    if args.host.trim().is_empty() {
        errors.push(ValidationError::EmptyHost);
    }

    let metrics_address = args.metrics_address.trim();
    if !metrics_address.is_empty() && metrics_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidMetricsAddress(metrics_address.to_string()));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
