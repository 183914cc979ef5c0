//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! .env file + process environment + command-line flags
//!     → loader.rs (clap parses RelayArgs)
//!     → validation.rs (semantic checks)
//!     → RelayConfig (validated, immutable)
//!     → shared via Arc to every handler
//! ```
//!
//! # Design Decisions
//! - Config is read once at startup and never mutated afterwards
//! - Empty key values mean "not configured"
//! - Validation reports every problem, not just the first

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError, RelayArgs};
pub use schema::{ListenerConfig, LogFormat, ObservabilityConfig, RelayConfig};
pub use validation::ValidationError;
