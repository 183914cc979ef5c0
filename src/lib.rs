//! Chat-completion relay library.
//!
//! Forwards OpenAI-style requests to a single configured upstream and relays
//! the answer back, either as a byte stream or as a buffered JSON document.

pub mod config;
pub mod http;
pub mod routing;
pub mod security;
pub mod upstream;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;

pub use config::RelayConfig;
pub use http::{HttpServer, RelayError};
pub use lifecycle::Shutdown;
