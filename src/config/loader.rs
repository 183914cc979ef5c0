//! Configuration loading from flags and environment.

use std::time::Duration;

use clap::Parser;
use thiserror::Error;

use crate::config::schema::{
    ListenerConfig, LogFormat, ObservabilityConfig, RelayConfig, DEFAULT_MAX_BODY_BYTES,
};
use crate::config::validation::{validate_args, ValidationError};
use crate::routing::UpstreamTarget;

/// Upstream used when `TARGET_API_URL` is not set.
pub const DEFAULT_TARGET_API_URL: &str = "https://api.openai.com/v1/chat/completions";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Startup arguments. Every flag can also be supplied through its environment variable.
#[derive(Debug, Clone, Parser)]
#[command(name = "chat-relay", version)]
#[command(about = "Relay OpenAI-style chat completion requests to a single upstream", long_about = None)]
pub struct RelayArgs {
    /// Upstream chat-completions URL; must end in /v1/chat/completions
    #[arg(long, env = "TARGET_API_URL", default_value = DEFAULT_TARGET_API_URL)]
    pub target_api_url: String,

    /// Upstream API key used when the caller sends no Authorization header
    #[arg(long, env = "TARGET_API_KEY", default_value = "", hide_env_values = true)]
    pub target_api_key: String,

    /// Key callers must present as a Bearer token; empty disables the check
    #[arg(long, env = "RELAY_API_KEY", default_value = "", hide_env_values = true)]
    pub relay_api_key: String,

    /// Outbound timeout in seconds
    #[arg(long, env = "TIMEOUT", default_value_t = crate::config::schema::DEFAULT_TIMEOUT_SECS)]
    pub timeout: u64,

    /// Maximum inbound request body in bytes
    #[arg(long, env = "MAX_BODY_BYTES", default_value_t = DEFAULT_MAX_BODY_BYTES)]
    pub max_body_bytes: usize,

    /// Listen host
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Listen port
    #[arg(long, env = "PORT", default_value_t = 8000)]
    pub port: u16,

    /// Default log level when RUST_LOG is not set
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Log output format
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,

    /// Prometheus exporter address; empty disables it
    #[arg(long, env = "METRICS_ADDRESS", default_value = "")]
    pub metrics_address: String,
}

/// Validate arguments and build the immutable relay configuration.
pub fn load_config(args: RelayArgs) -> Result<RelayConfig, ConfigError> {
    validate_args(&args).map_err(ConfigError::Validation)?;

    let target = UpstreamTarget::parse(&args.target_api_url)
        .map_err(|e| ConfigError::Validation(vec![e]))?;

    let metrics_address = match args.metrics_address.trim() {
        "" => None,
        addr => Some(addr.parse().map_err(|_| {
            ConfigError::Validation(vec![ValidationError::InvalidMetricsAddress(addr.to_string())])
        })?),
    };

    Ok(RelayConfig {
        target,
        target_api_key: non_empty(args.target_api_key),
        relay_api_key: non_empty(args.relay_api_key),
        timeout: Duration::from_secs(args.timeout),
        max_body_bytes: args.max_body_bytes,
        listener: ListenerConfig {
            host: args.host,
            port: args.port,
        },
        observability: ObservabilityConfig {
            log_level: args.log_level,
            log_format: args.log_format,
            metrics_address,
        },
    })
}

fn non_empty(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(overrides: &[(&'static str, &'static str)]) -> RelayArgs {
        let mut values = vec![
            ("--target-api-url", "https://api.example.com/v1/chat/completions"),
            ("--target-api-key", ""),
            ("--relay-api-key", ""),
            ("--timeout", "45"),
            ("--host", "127.0.0.1"),
            ("--port", "9000"),
            ("--metrics-address", ""),
        ];
        for &(flag, value) in overrides {
            if let Some(slot) = values.iter_mut().find(|(f, _)| *f == flag) {
                slot.1 = value;
            }
        }

        let mut argv = vec!["chat-relay"];
        for (flag, value) in values {
            argv.push(flag);
            argv.push(value);
        }
        RelayArgs::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_load_config() {
        let config = load_config(parse(&[])).unwrap();

        assert_eq!(config.target.chat_completions_url(), "https://api.example.com/v1/chat/completions");
        assert_eq!(config.target.base_url(), "https://api.example.com");
        assert_eq!(config.timeout, Duration::from_secs(45));
        assert_eq!(config.listener.bind_address(), "127.0.0.1:9000");
        assert!(config.target_api_key.is_none());
        assert!(config.relay_api_key.is_none());
        assert!(config.observability.metrics_address.is_none());
    }

    #[test]
    fn test_keys_and_metrics_address() {
        let config = load_config(parse(&[
            ("--target-api-key", "sk-upstream"),
            ("--relay-api-key", "relay-secret"),
            ("--metrics-address", "127.0.0.1:9090"),
        ]))
        .unwrap();

        assert_eq!(config.target_api_key.as_deref(), Some("sk-upstream"));
        assert_eq!(config.relay_api_key.as_deref(), Some("relay-secret"));
        assert_eq!(
            config.observability.metrics_address,
            Some("127.0.0.1:9090".parse().unwrap())
        );
    }

    #[test]
    fn test_invalid_config_fails() {
        let err = load_config(parse(&[("--target-api-url", "https://api.example.com/chat"), ("--timeout", "0")]))
            .unwrap_err();
        let ConfigError::Validation(errors) = &err;
        assert_eq!(errors.len(), 2);
        assert!(err.to_string().starts_with("Validation failed: "));
    }
}
