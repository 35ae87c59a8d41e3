use uuid::Uuid;

use warden_domain::user::{
    PASSWORD_MAX_BYTES, PASSWORD_MIN_LEN, normalize_email, validate_password,
};
use warden_domain::verification::CodePurpose;

use crate::domain::repository::{UserRepository, VerificationCodeRepository};
use crate::error::AuthServiceError;
use crate::infra::password::PasswordHasher;
use crate::usecase::verification::{check_code, consume_code};

pub(crate) fn require_valid_password(password: &str) -> Result<(), AuthServiceError> {
    if validate_password(password) {
        Ok(())
    } else {
        Err(AuthServiceError::InvalidInput(format!(
            "password must be at least {PASSWORD_MIN_LEN} characters and at most {PASSWORD_MAX_BYTES} bytes"
        )))
    }
}

// ── CheckResetCode ───────────────────────────────────────────────────────────

pub struct CheckResetCodeUseCase<C: VerificationCodeRepository> {
    pub codes: C,
}

impl<C: VerificationCodeRepository> CheckResetCodeUseCase<C> {
    pub async fn execute(&self, email: &str, code: &str) -> Result<(), AuthServiceError> {
        let email = normalize_email(email);
        check_code(&self.codes, &email, code, CodePurpose::PasswordReset).await?;
        Ok(())
    }
}

// ── ResetPassword ────────────────────────────────────────────────────────────

pub struct ResetPasswordInput {
    pub email: String,
    pub code: String,
    pub password: String,
}

pub struct ResetPasswordUseCase<U, C>
where
    U: UserRepository,
    C: VerificationCodeRepository,
{
    pub users: U,
    pub codes: C,
    pub hasher: PasswordHasher,
}

impl<U, C> ResetPasswordUseCase<U, C>
where
    U: UserRepository,
    C: VerificationCodeRepository,
{
    pub async fn execute(&self, input: ResetPasswordInput) -> Result<(), AuthServiceError> {
        require_valid_password(&input.password)?;
        let email = normalize_email(&input.email);

        let user = self
            .users
            .find_by_email(&email)
            .await?
            .ok_or(AuthServiceError::UserNotFound)?;

        consume_code(
            &self.codes,
            &email,
            &input.code,
            CodePurpose::PasswordReset,
        )
        .await?;

        let hash = self.hasher.hash(&input.password).await?;
        self.users.update_password(user.id, &hash).await?;
        tracing::info!(user_id = %user.id, "password reset");
        Ok(())
    }
}

// ── ChangePassword ───────────────────────────────────────────────────────────

pub struct ChangePasswordInput {
    pub user_id: Uuid,
    pub current_password: String,
    pub new_password: String,
}

pub struct ChangePasswordUseCase<U: UserRepository> {
    pub users: U,
    pub hasher: PasswordHasher,
}

impl<U: UserRepository> ChangePasswordUseCase<U> {
    pub async fn execute(&self, input: ChangePasswordInput) -> Result<(), AuthServiceError> {
        require_valid_password(&input.new_password)?;

        let user = self
            .users
            .find_by_id(input.user_id)
            .await?
            .ok_or(AuthServiceError::UserNotFound)?;

        let Some(current_hash) = user.password_hash.as_deref() else {
            return Err(AuthServiceError::InvalidCredentials);
        };
        if !self
            .hasher
            .verify(&input.current_password, current_hash)
            .await?
        {
            return Err(AuthServiceError::InvalidCredentials);
        }

        let hash = self.hasher.hash(&input.new_password).await?;
        self.users.update_password(user.id, &hash).await?;
        tracing::info!(user_id = %user.id, "password changed");
        Ok(())
    }
}
