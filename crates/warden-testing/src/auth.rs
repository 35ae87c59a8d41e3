//! Session-token helpers for integration tests.
//!
//! Tokens are signed with [`TEST_JWT_SECRET`] so a service under test built
//! from [`test_tokens`] accepts them without a login round-trip.

use http::HeaderValue;
use uuid::Uuid;

use warden_auth_types::token::{SessionTokens, now_secs};

pub const TEST_JWT_SECRET: &str = "test-jwt-secret-for-unit-tests-only";

/// Token issuer/validator with default lifetimes and the test secret.
pub fn test_tokens() -> SessionTokens {
    SessionTokens::new(TEST_JWT_SECRET)
}

pub fn access_token(user_id: Uuid) -> String {
    test_tokens()
        .issue_access_token(user_id)
        .expect("issue test access token")
        .token
}

pub fn refresh_token(user_id: Uuid) -> String {
    test_tokens()
        .issue_refresh_token(user_id)
        .expect("issue test refresh token")
        .token
}

/// A token whose `exp` lies `secs_past_expiry` seconds in the past.
pub fn expired_token(user_id: Uuid, refresh: bool, secs_past_expiry: u64) -> String {
    let tokens = test_tokens().with_ttls(60, 60);
    tokens
        .issue_at(user_id, refresh, now_secs() - 60 - secs_past_expiry)
        .expect("issue expired test token")
        .token
}

/// `Authorization: Bearer <token>` header value.
pub fn bearer(token: &str) -> HeaderValue {
    HeaderValue::from_str(&format!("Bearer {token}")).expect("valid bearer header")
}
