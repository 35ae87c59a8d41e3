use chrono::Utc;
use uuid::Uuid;

use warden_domain::role::DEFAULT_ROLE;
use warden_domain::user::AuthProvider;
use warden_domain::verification::CodePurpose;

use crate::domain::repository::{RoleRepository, UserRepository, VerificationCodeRepository};
use crate::domain::types::{NewUser, User, VerificationCode};
use crate::error::AuthServiceError;
use crate::infra::password::PasswordHasher;
use crate::usecase::password::require_valid_password;
use crate::usecase::verification::{consume_code, require_valid_email};

/// A user together with its role names.
#[derive(Debug, Clone)]
pub struct UserProfile {
    pub user: User,
    pub roles: Vec<String>,
}

// ── Register ─────────────────────────────────────────────────────────────────

pub struct RegisterInput {
    pub email: String,
    pub code: String,
    pub password: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

pub struct RegisterUseCase<U, C>
where
    U: UserRepository,
    C: VerificationCodeRepository,
{
    pub users: U,
    pub codes: C,
    pub hasher: PasswordHasher,
}

impl<U, C> RegisterUseCase<U, C>
where
    U: UserRepository,
    C: VerificationCodeRepository,
{
    pub async fn execute(&self, input: RegisterInput) -> Result<UserProfile, AuthServiceError> {
        let email = require_valid_email(&input.email)?;
        require_valid_password(&input.password)?;

        // Checked before the code is redeemed so a taken email does not burn it.
        if self.users.find_by_email(&email).await?.is_some() {
            return Err(AuthServiceError::EmailTaken);
        }

        let code = self.redeem_code(&email, &input.code).await?;
        let password_hash = self.hasher.hash(&input.password).await?;

        let new_user = NewUser {
            id: Uuid::now_v7(),
            email,
            password_hash: Some(password_hash),
            first_name: input.first_name.or(code.first_name),
            last_name: input.last_name.or(code.last_name),
            provider: AuthProvider::Email,
            email_verified_at: Some(Utc::now()),
        };
        let user = self.users.create(&new_user, DEFAULT_ROLE).await?;
        tracing::info!(user_id = %user.id, "user registered");

        Ok(UserProfile {
            user,
            roles: vec![DEFAULT_ROLE.to_owned()],
        })
    }

    /// An unused registration code is consumed here. A code already verified
    /// through `/verification/verify` is accepted while it is unexpired.
    async fn redeem_code(
        &self,
        email: &str,
        code: &str,
    ) -> Result<VerificationCode, AuthServiceError> {
        match consume_code(&self.codes, email, code, CodePurpose::Registration).await {
            Ok(row) => Ok(row),
            Err(AuthServiceError::CodeAlreadyUsed) => self
                .codes
                .find_latest(email, code, CodePurpose::Registration)
                .await?
                .ok_or(AuthServiceError::CodeNotFound),
            Err(e) => Err(e),
        }
    }
}

// ── Profile ──────────────────────────────────────────────────────────────────

pub struct ProfileUseCase<U, R>
where
    U: UserRepository,
    R: RoleRepository,
{
    pub users: U,
    pub roles: R,
}

impl<U, R> ProfileUseCase<U, R>
where
    U: UserRepository,
    R: RoleRepository,
{
    pub async fn execute(&self, user_id: Uuid) -> Result<UserProfile, AuthServiceError> {
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(AuthServiceError::UserNotFound)?;
        let roles = self.roles.names_for_user(user.id).await?;
        Ok(UserProfile { user, roles })
    }
}

// ── DeleteAccount ────────────────────────────────────────────────────────────

pub struct DeleteAccountUseCase<U: UserRepository> {
    pub users: U,
}

impl<U: UserRepository> DeleteAccountUseCase<U> {
    pub async fn execute(&self, user_id: Uuid) -> Result<(), AuthServiceError> {
        if !self.users.soft_delete(user_id).await? {
            return Err(AuthServiceError::UserNotFound);
        }
        tracing::info!(user_id = %user_id, "account deleted");
        Ok(())
    }
}
