//! Relay key gate.
//!
//! Enforces the optional local relay key on inbound requests.

use axum::{
    body::Body,
    extract::State,
    http::{header::AUTHORIZATION, HeaderMap, Request},
    middleware::Next,
    response::Response,
};
use tracing::warn;

use crate::http::error::RelayError;
use crate::http::server::AppState;

const BEARER_PREFIX: &str = "Bearer ";

/// Characters of a rejected token kept in the audit log.
const AUDIT_PREFIX_CHARS: usize = 10;

/// Check the inbound `Authorization` header against the configured relay key.
///
/// With no key configured every request is allowed.
pub fn verify(relay_key: Option<&str>, headers: &HeaderMap) -> Result<(), RelayError> {
    let Some(expected) = relay_key else {
        return Ok(());
    };

    let header = match headers.get(AUTHORIZATION).filter(|v| !v.is_empty()) {
        Some(value) => value.as_bytes(),
        None => {
            return Err(RelayError::Unauthorized(
                "missing API key, send it as `Authorization: Bearer <key>`".to_string(),
            ))
        }
    };

    // Header values may carry non-UTF-8 bytes; the comparison stays on bytes.
    let Some(token) = header.strip_prefix(BEARER_PREFIX.as_bytes()) else {
        return Err(RelayError::Unauthorized(
            "invalid Authorization format, expected `Bearer <key>`".to_string(),
        ));
    };

    if token != expected.as_bytes() {
        warn!(token_prefix = %audit_prefix(token), "Rejected invalid relay key");
        return Err(RelayError::Forbidden("invalid API key".to_string()));
    }

    Ok(())
}

/// Leading characters of a token followed by `...`.
fn audit_prefix(token: &[u8]) -> String {
    let prefix: String = String::from_utf8_lossy(token)
        .chars()
        .take(AUDIT_PREFIX_CHARS)
        .collect();
    format!("{}...", prefix)
}

/// Middleware applying [`verify`] to every relayed route.
pub async fn relay_key_middleware(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Result<Response, RelayError> {
    verify(state.config.relay_api_key.as_deref(), request.headers())?;
    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(auth: Option<&'static str>) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if let Some(auth) = auth {
            headers.insert(AUTHORIZATION, HeaderValue::from_static(auth));
        }
        headers
    }

    #[test]
    fn test_no_key_allows_everything() {
        for auth in [None, Some(""), Some("Bearer anything"), Some("Basic Zm9vOmJhcg==")] {
            assert!(verify(None, &headers(auth)).is_ok());
        }
    }

    #[test]
    fn test_correct_key_allowed() {
        assert!(verify(Some("relay-secret"), &headers(Some("Bearer relay-secret"))).is_ok());
    }

    #[test]
    fn test_missing_header_unauthorized() {
        assert!(matches!(
            verify(Some("relay-secret"), &headers(None)),
            Err(RelayError::Unauthorized(_))
        ));
        assert!(matches!(
            verify(Some("relay-secret"), &headers(Some(""))),
            Err(RelayError::Unauthorized(_))
        ));
    }

    #[test]
    fn test_wrong_scheme_unauthorized() {
        for auth in ["Basic relay-secret", "bearer relay-secret", "relay-secret", "Bearer"] {
            assert!(
                matches!(verify(Some("relay-secret"), &headers(Some(auth))), Err(RelayError::Unauthorized(_))),
                "{auth} should be unauthorized"
            );
        }
    }

    #[test]
    fn test_wrong_key_forbidden() {
        for auth in ["Bearer wrong", "Bearer ", "Bearer relay-secret ", "Bearer RELAY-SECRET"] {
            assert!(
                matches!(verify(Some("relay-secret"), &headers(Some(auth))), Err(RelayError::Forbidden(_))),
                "{auth} should be forbidden"
            );
        }

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_bytes(b"Bearer w\xe9rong").unwrap());
        assert!(matches!(verify(Some("relay-secret"), &headers), Err(RelayError::Forbidden(_))));
    }

    #[test]
    fn test_audit_prefix_truncates() {
        assert_eq!(audit_prefix(b"sk-0123456789abcdef"), "sk-0123456...");
        assert_eq!(audit_prefix(b"short"), "short...");
        assert_eq!(audit_prefix(b"w\xe9rong"), "w\u{fffd}rong...");
    }
}
