//! sea-orm entities for the auth service database.

pub mod outbox_events;
pub mod roles;
pub mod user_roles;
pub mod users;
pub mod verification_codes;
