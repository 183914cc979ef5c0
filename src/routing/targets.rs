//! Upstream URL derivation.
//!
//! # Responsibilities
//! - Validate the configured chat-completions URL
//! - Split off the base URL in front of `/v1/chat/completions`
//! - Build the models and passthrough URLs from that base
//!
//! # Design Decisions
//! - The suffix is split at its last occurrence; anything after it is dropped
//!   from the base
//! - Query strings are appended verbatim, never re-encoded

use url::Url;

use crate::config::validation::ValidationError;

/// Suffix the configured target URL must contain.
pub const CHAT_COMPLETIONS_SUFFIX: &str = "/v1/chat/completions";

/// Path appended to the base URL for model listing.
pub const MODELS_PATH: &str = "/v1/models";

/// The configured upstream and the base URL derived from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamTarget {
    chat_completions_url: String,
    base_url: String,
}

impl UpstreamTarget {
    /// Parse and validate a chat-completions URL.
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let url = Url::parse(raw).map_err(|e| ValidationError::InvalidTargetUrl {
            url: raw.to_string(),
            reason: e.to_string(),
        })?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(ValidationError::UnsupportedScheme {
                url: raw.to_string(),
                scheme: url.scheme().to_string(),
            });
        }

        let (base, _) = raw
            .rsplit_once(CHAT_COMPLETIONS_SUFFIX)
            .ok_or_else(|| ValidationError::MissingChatCompletionsSuffix(raw.to_string()))?;

        Ok(Self {
            chat_completions_url: raw.to_string(),
            base_url: base.to_string(),
        })
    }

    /// Target for the chat-completions routes, used as configured.
    pub fn chat_completions_url(&self) -> &str {
        &self.chat_completions_url
    }

    /// Everything in front of the `/v1/chat/completions` suffix.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Target for the model-listing routes.
    pub fn models_url(&self) -> String {
        format!("{}{}", self.base_url, MODELS_PATH)
    }

    /// Target for the catch-all route: base URL, then the inbound path and query.
    pub fn passthrough_url(&self, path: &str, query: Option<&str>) -> String {
        let mut url = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
        if let Some(query) = query.filter(|q| !q.is_empty()) {
            url.push('?');
            url.push_str(query);
        }
        url
    }
}
