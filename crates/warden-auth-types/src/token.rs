//! Session tokens: signed HS256 JWTs carrying a `refresh` flag.

use std::time::{SystemTime, UNIX_EPOCH};

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::Deserialize;
#[cfg(any(feature = "issuer", test))]
use serde::Serialize;
use uuid::Uuid;

/// Access-token lifetime in seconds (1 hour).
pub const ACCESS_TOKEN_TTL_SECS: u64 = 3600;

/// Refresh-token lifetime in seconds (14 days).
pub const REFRESH_TOKEN_TTL_SECS: u64 = 14 * 24 * 3600;

/// Tolerated clock skew when checking `exp`, in seconds.
pub const DEFAULT_LEEWAY_SECS: u64 = 30;

/// Errors returned by [`SessionTokens::parse_and_validate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error("authorization token not found")]
    Missing,
    #[error("token is invalid")]
    Invalid,
    #[error("token has expired")]
    Expired,
}

/// JWT claims payload.
///
/// | Field | JWT claim | Meaning |
/// |-------|-----------|---------|
/// | `sub` | `sub` | user ID (UUID string) |
/// | `iat` | `iat` | issued at, seconds since epoch |
/// | `exp` | `exp` | expiry, seconds since epoch |
/// | `jti` | `jti` | unique token id; makes every refresh token hash distinct |
/// | `refresh` | custom | `true` for refresh tokens, `false` for access tokens |
///
/// [`Serialize`] requires the `issuer` feature: only the token issuer encodes claims.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[cfg_attr(any(feature = "issuer", test), derive(Serialize))]
pub struct SessionClaims {
    pub sub: String,
    pub iat: u64,
    pub exp: u64,
    pub jti: String,
    pub refresh: bool,
}

impl SessionClaims {
    /// Parse the subject as a user ID. A non-UUID subject makes the token invalid.
    pub fn user_id(&self) -> Result<Uuid, TokenError> {
        self.sub.parse().map_err(|_| TokenError::Invalid)
    }
}

pub fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

/// Signing key plus token lifetimes. Cheap to clone; stored in service state.
#[derive(Clone)]
pub struct SessionTokens {
    secret: String,
    access_ttl_secs: u64,
    refresh_ttl_secs: u64,
    leeway_secs: u64,
}

impl std::fmt::Debug for SessionTokens {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionTokens")
            .field("access_ttl_secs", &self.access_ttl_secs)
            .field("refresh_ttl_secs", &self.refresh_ttl_secs)
            .field("leeway_secs", &self.leeway_secs)
            .finish_non_exhaustive()
    }
}

impl SessionTokens {
    /// Default lifetimes and leeway.
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            access_ttl_secs: ACCESS_TOKEN_TTL_SECS,
            refresh_ttl_secs: REFRESH_TOKEN_TTL_SECS,
            leeway_secs: DEFAULT_LEEWAY_SECS,
        }
    }

    pub fn with_ttls(mut self, access_ttl_secs: u64, refresh_ttl_secs: u64) -> Self {
        self.access_ttl_secs = access_ttl_secs;
        self.refresh_ttl_secs = refresh_ttl_secs;
        self
    }

    pub fn with_leeway(mut self, leeway_secs: u64) -> Self {
        self.leeway_secs = leeway_secs;
        self
    }

    pub fn access_ttl_secs(&self) -> u64 {
        self.access_ttl_secs
    }

    pub fn refresh_ttl_secs(&self) -> u64 {
        self.refresh_ttl_secs
    }

    /// Decode and validate a bearer token.
    ///
    /// HS256, `exp` checked with the configured leeway, `exp` and `sub` required.
    /// `None` or a blank token is [`TokenError::Missing`].
    pub fn parse_and_validate(&self, raw: Option<&str>) -> Result<SessionClaims, TokenError> {
        let raw = raw.map(str::trim).filter(|t| !t.is_empty());
        let Some(raw) = raw else {
            return Err(TokenError::Missing);
        };

        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = self.leeway_secs;
        validation.required_spec_claims.clear();
        validation.set_required_spec_claims(&["exp", "sub"]);

        let data = decode::<SessionClaims>(
            raw,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => TokenError::Expired,
            _ => TokenError::Invalid,
        })?;

        Ok(data.claims)
    }
}

/// A freshly minted token and the claims it encodes.
#[cfg(any(feature = "issuer", test))]
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub claims: SessionClaims,
}

#[cfg(any(feature = "issuer", test))]
impl SessionTokens {
    pub fn issue_access_token(
        &self,
        user_id: Uuid,
    ) -> Result<IssuedToken, jsonwebtoken::errors::Error> {
        self.issue_at(user_id, false, now_secs())
    }

    pub fn issue_refresh_token(
        &self,
        user_id: Uuid,
    ) -> Result<IssuedToken, jsonwebtoken::errors::Error> {
        self.issue_at(user_id, true, now_secs())
    }

    /// Mint a token as if it were issued at `issued_at` (seconds since epoch).
    pub fn issue_at(
        &self,
        user_id: Uuid,
        refresh: bool,
        issued_at: u64,
    ) -> Result<IssuedToken, jsonwebtoken::errors::Error> {
        let ttl = if refresh {
            self.refresh_ttl_secs
        } else {
            self.access_ttl_secs
        };
        let claims = SessionClaims {
            sub: user_id.to_string(),
            iat: issued_at,
            exp: issued_at + ttl,
            jti: Uuid::new_v4().to_string(),
            refresh,
        };
        let token = jsonwebtoken::encode(
            &jsonwebtoken::Header::new(Algorithm::HS256),
            &claims,
            &jsonwebtoken::EncodingKey::from_secret(self.secret.as_bytes()),
        )?;
        Ok(IssuedToken { token, claims })
    }
}
