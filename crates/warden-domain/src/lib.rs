//! Domain types shared across all Warden crates.
//!
//! This crate contains only pure types with no framework dependencies.
//! Import in `usecase/` and `domain/` layers; never in `infra/` or `handlers/`.

pub mod locale;
pub mod role;
pub mod user;
pub mod verification;
