//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the relay.

use std::net::SocketAddr;
use std::time::Duration;

use clap::ValueEnum;
use serde::Serialize;

use crate::config::validation::ValidationError;
use crate::routing::UpstreamTarget;

/// Default outbound timeout, covering the whole upstream exchange.
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Default cap on inbound request bodies.
pub const DEFAULT_MAX_BODY_BYTES: usize = 16 * 1024 * 1024;

/// Root configuration for the relay.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// Upstream chat-completions endpoint and the base URL derived from it.
    pub target: UpstreamTarget,

    /// Credential attached as `Bearer <key>` when the caller sends none.
    pub target_api_key: Option<String>,

    /// Local relay key. `None` disables the relay key gate.
    pub relay_api_key: Option<String>,

    /// Bound on the whole outbound call, streaming body included.
    pub timeout: Duration,

    /// Maximum accepted inbound body size in bytes.
    pub max_body_bytes: usize,

    /// Listener configuration.
    pub listener: ListenerConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl RelayConfig {
    /// Build a configuration for `target_url` with every other setting at its default.
    pub fn new(target_url: &str) -> Result<Self, ValidationError> {
        Ok(Self {
            target: UpstreamTarget::parse(target_url)?,
            target_api_key: None,
            relay_api_key: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            listener: ListenerConfig::default(),
            observability: ObservabilityConfig::default(),
        })
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Serialize)]
pub struct ListenerConfig {
    /// Host or IP to bind.
    pub host: String,

    /// TCP port to bind.
    pub port: u16,
}

impl ListenerConfig {
    /// Bind address in `host:port` form.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Pretty,
    /// One JSON object per line.
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Serialize)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,

    /// Prometheus exporter bind address. `None` disables the exporter.
    pub metrics_address: Option<SocketAddr>,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_address: None,
        }
    }
}
