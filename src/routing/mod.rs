//! Request routing subsystem.
//!
//! # Data Flow
//! ```text
//! Inbound path
//!     → RouteKind::for_path (fixed table: chat, models, service, passthrough)
//!     → targets.rs (derive upstream URL from the configured target)
//!     → handler forwards to upstream
//! ```
//!
//! # Design Decisions
//! - Only two derivation rules exist (verbatim target vs. strip-and-append),
//!   so routing is a table lookup rather than a matcher chain
//! - Base URL is derived once at startup; per-request derivation is string
//!   concatenation only

pub mod targets;

pub use targets::UpstreamTarget;

/// Which forwarding behavior an inbound path receives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RouteKind {
    /// Local endpoints (`/`, `/health`) that never reach the upstream.
    Service,
    /// `/v1/chat/completions` and `/chat/completions`.
    ChatCompletions,
    /// `/v1/models` and `/models`.
    Models,
    /// Any other path, forwarded under the upstream base URL.
    Passthrough,
}

impl RouteKind {
    /// Classify an inbound request path.
    pub fn for_path(path: &str) -> Self {
        match path {
            "/" | "/health" => RouteKind::Service,
            "/v1/chat/completions" | "/chat/completions" => RouteKind::ChatCompletions,
            "/v1/models" | "/models" => RouteKind::Models,
            _ => RouteKind::Passthrough,
        }
    }

    /// Label used in logs and metrics.
    pub fn as_str(&self) -> &'static str {
        match self {
            RouteKind::Service => "service",
            RouteKind::ChatCompletions => "chat_completions",
            RouteKind::Models => "models",
            RouteKind::Passthrough => "passthrough",
        }
    }

    /// Whether upstream non-2xx answers are wrapped in an error envelope.
    /// The passthrough route relays them untouched.
    pub fn wraps_upstream_errors(&self) -> bool {
        matches!(self, RouteKind::ChatCompletions | RouteKind::Models)
    }
}

impl std::fmt::Display for RouteKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
