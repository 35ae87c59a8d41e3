//! Auth types shared across Warden crates.
//!
//! Provides session-token claims and validation, token issuance (feature
//! `issuer`) and the `Principal` extractor populated by the authorization gate.

pub mod identity;
pub mod token;
