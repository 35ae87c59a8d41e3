//! Test utilities for Warden services.
//!
//! Token minting and bearer-header helpers. Import from dev-dependencies only.

pub mod auth;
