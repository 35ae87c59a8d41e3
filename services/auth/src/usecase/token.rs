use anyhow::Context as _;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use warden_auth_types::identity::Principal;
use warden_auth_types::token::SessionTokens;
use warden_domain::user::normalize_email;

use crate::domain::repository::{RoleRepository, UserRepository};
use crate::error::AuthServiceError;
use crate::infra::password::{PasswordHasher, hash_refresh_token};
use crate::usecase::user::UserProfile;

pub const TOKEN_TYPE: &str = "Bearer";

/// Access + refresh pair handed to the client.
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    /// Access-token lifetime in seconds.
    pub expires_in: u64,
}

/// A minted pair plus what must be persisted for the refresh token.
struct IssuedPair {
    pair: TokenPair,
    refresh_hash: String,
    refresh_expires_at: DateTime<Utc>,
}

fn issue_pair(tokens: &SessionTokens, user_id: Uuid) -> Result<IssuedPair, AuthServiceError> {
    let access = tokens
        .issue_access_token(user_id)
        .context("issue access token")?;
    let refresh = tokens
        .issue_refresh_token(user_id)
        .context("issue refresh token")?;
    let exp = i64::try_from(refresh.claims.exp).context("refresh expiry out of range")?;
    let refresh_expires_at =
        DateTime::<Utc>::from_timestamp(exp, 0).context("refresh expiry out of range")?;

    Ok(IssuedPair {
        refresh_hash: hash_refresh_token(&refresh.token),
        refresh_expires_at,
        pair: TokenPair {
            access_token: access.token,
            refresh_token: refresh.token,
            expires_in: tokens.access_ttl_secs(),
        },
    })
}

// ── Login ────────────────────────────────────────────────────────────────────

pub struct LoginInput {
    pub email: String,
    pub password: String,
}

#[derive(Debug)]
pub struct LoginOutput {
    pub profile: UserProfile,
    pub tokens: TokenPair,
}

pub struct LoginUseCase<U, R>
where
    U: UserRepository,
    R: RoleRepository,
{
    pub users: U,
    pub roles: R,
    pub tokens: SessionTokens,
    pub hasher: PasswordHasher,
}

impl<U, R> LoginUseCase<U, R>
where
    U: UserRepository,
    R: RoleRepository,
{
    pub async fn execute(&self, input: LoginInput) -> Result<LoginOutput, AuthServiceError> {
        // Every failure below is reported identically.
        let email = normalize_email(&input.email);
        let user = self
            .users
            .find_by_email(&email)
            .await?
            .ok_or(AuthServiceError::InvalidCredentials)?;
        let Some(hash) = user.password_hash.as_deref() else {
            return Err(AuthServiceError::InvalidCredentials);
        };
        if !self.hasher.verify(&input.password, hash).await? {
            return Err(AuthServiceError::InvalidCredentials);
        }

        let issued = issue_pair(&self.tokens, user.id)?;
        self.users
            .set_refresh_token(user.id, &issued.refresh_hash, issued.refresh_expires_at)
            .await?;

        let roles = self.roles.names_for_user(user.id).await?;
        tracing::info!(user_id = %user.id, "user logged in");

        Ok(LoginOutput {
            profile: UserProfile { user, roles },
            tokens: issued.pair,
        })
    }
}

// ── Refresh ──────────────────────────────────────────────────────────────────

pub struct RefreshUseCase<U: UserRepository> {
    pub users: U,
    pub tokens: SessionTokens,
}

impl<U: UserRepository> RefreshUseCase<U> {
    /// `principal` was resolved by the gate from `raw_refresh_token`.
    pub async fn execute(
        &self,
        principal: &Principal,
        raw_refresh_token: &str,
    ) -> Result<TokenPair, AuthServiceError> {
        if !principal.refresh {
            return Err(AuthServiceError::TokenInvalid);
        }

        let issued = issue_pair(&self.tokens, principal.user_id)?;
        let rotated = self
            .users
            .rotate_refresh_token(
                principal.user_id,
                &hash_refresh_token(raw_refresh_token),
                &issued.refresh_hash,
                issued.refresh_expires_at,
            )
            .await?;
        if !rotated {
            tracing::warn!(user_id = %principal.user_id, "refresh token rejected: revoked or already rotated");
            return Err(AuthServiceError::TokenInvalid);
        }

        tracing::info!(user_id = %principal.user_id, "refresh token rotated");
        Ok(issued.pair)
    }
}

// ── Logout ───────────────────────────────────────────────────────────────────

pub struct LogoutUseCase<U: UserRepository> {
    pub users: U,
}

impl<U: UserRepository> LogoutUseCase<U> {
    pub async fn execute(&self, user_id: Uuid) -> Result<(), AuthServiceError> {
        self.users.clear_refresh_token(user_id).await?;
        tracing::info!(user_id = %user_id, "user logged out");
        Ok(())
    }
}
