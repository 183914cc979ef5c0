//! Outbound calls to the upstream API.
//!
//! # Design Decisions
//! - One pooled client per process; requests share nothing else
//! - Non-2xx answers are successful dispatches; only transport failures and
//!   timeouts are errors here

pub mod dispatcher;

pub use dispatcher::{UpstreamClient, UpstreamRequest};
