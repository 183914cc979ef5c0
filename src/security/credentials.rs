//! Credential resolution for outbound requests.
//!
//! # Responsibilities
//! - Choose the `Authorization` value sent upstream
//! - Choose the outbound `Content-Type`
//!
//! # Design Decisions
//! - A caller-supplied Authorization always wins over the configured key
//! - At most one Authorization value is ever produced
//! - No configured key and no caller header means no Authorization at all

use axum::http::{
    header::{AUTHORIZATION, CONTENT_TYPE},
    HeaderMap, HeaderValue,
};

use crate::http::error::RelayError;

/// How the outbound `Content-Type` is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentTypePolicy {
    /// Always `application/json`.
    Json,
    /// The inbound `Content-Type`, or `application/json` when absent.
    PassThrough,
}

/// Headers attached to one outbound request.
#[derive(Debug, Clone)]
pub struct ForwardHeaders {
    content_type: HeaderValue,
    authorization: Option<HeaderValue>,
}

impl ForwardHeaders {
    /// Build the outbound headers from the inbound ones and the configured key.
    pub fn resolve(
        inbound: &HeaderMap,
        target_api_key: Option<&str>,
        policy: ContentTypePolicy,
    ) -> Result<Self, RelayError> {
        let json = HeaderValue::from_static("application/json");
        let content_type = match policy {
            ContentTypePolicy::Json => json,
            ContentTypePolicy::PassThrough => inbound.get(CONTENT_TYPE).cloned().unwrap_or(json),
        };

        let authorization = match (inbound.get(AUTHORIZATION), target_api_key) {
            (Some(client), _) => Some(client.clone()),
            (None, Some(key)) => {
                let mut value = HeaderValue::from_str(&format!("Bearer {}", key)).map_err(|_| {
                    RelayError::Internal("configured target API key is not a valid header value".to_string())
                })?;
                value.set_sensitive(true);
                Some(value)
            }
            (None, None) => None,
        };

        Ok(Self {
            content_type,
            authorization,
        })
    }

    pub fn content_type(&self) -> &HeaderValue {
        &self.content_type
    }

    pub fn authorization(&self) -> Option<&HeaderValue> {
        self.authorization.as_ref()
    }

    /// Convert into a header map for the outbound request.
    pub fn into_header_map(self) -> HeaderMap {
        let mut headers = HeaderMap::with_capacity(2);
        headers.insert(CONTENT_TYPE, self.content_type);
        if let Some(authorization) = self.authorization {
            headers.insert(AUTHORIZATION, authorization);
        }
        headers
    }
}
