//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request:
//!     → relay_key.rs (local Bearer check, skipped when no key is configured)
//!     → Pass to routing
//!
//! Outgoing request:
//!     → credentials.rs (pick the Authorization forwarded upstream)
//! ```
//!
//! # Design Decisions
//! - Fail closed: reject on any gate failure before touching the upstream
//! - Secrets are never logged in full

pub mod credentials;
pub mod relay_key;

pub use credentials::{ContentTypePolicy, ForwardHeaders};
pub use relay_key::relay_key_middleware;
