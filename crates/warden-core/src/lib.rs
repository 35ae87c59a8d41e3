//! Shared service plumbing: error envelope, health, request id, tracing,
//! configuration and request-context extractors.

pub mod config;
pub mod error;
pub mod health;
pub mod locale;
pub mod middleware;
pub mod serde;
pub mod tracing;
