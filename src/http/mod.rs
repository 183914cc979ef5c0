//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware, relay key gate)
//!     → handlers.rs (route table entry points)
//!     → request.rs (request ID, body parsing, stream flag)
//!     → [upstream dispatcher sends the call]
//!     → response.rs (stream or buffer the upstream answer)
//!     → error.rs (every failure mapped to a status code)
//!     → Send to client
//! ```

pub mod error;
pub mod handlers;
pub mod request;
pub mod response;
pub mod server;

pub use error::RelayError;
pub use request::{UuidRequestId, X_REQUEST_ID};
pub use server::{AppState, HttpServer};
