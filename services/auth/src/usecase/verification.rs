use chrono::{DateTime, Duration, Utc};
use rand::RngExt;
use uuid::Uuid;

use warden_domain::locale::Locale;
use warden_domain::user::{normalize_email, validate_email};
use warden_domain::verification::{CODE_LEN, CodePurpose};

use crate::domain::repository::{
    NotificationDispatcher, UserRepository, VerificationCodeRepository,
};
use crate::domain::types::{EmailMessage, VerificationCode};
use crate::error::AuthServiceError;

/// Random numeric code of [`CODE_LEN`] digits.
pub fn generate_code() -> String {
    let mut rng = rand::rng();
    (0..CODE_LEN)
        .map(|_| char::from(b'0' + rng.random_range(0..10u8)))
        .collect()
}

/// Normalized form of `email`, or `InvalidInput` if it is not an address.
pub(crate) fn require_valid_email(email: &str) -> Result<String, AuthServiceError> {
    let email = normalize_email(email);
    if validate_email(&email) {
        Ok(email)
    } else {
        Err(AuthServiceError::InvalidInput(
            "email must be a valid address".to_owned(),
        ))
    }
}

/// Mark the latest matching code as verified.
///
/// Of several concurrent callers exactly one succeeds; the others re-read
/// the row and get its current classification (normally `CodeAlreadyUsed`).
pub async fn consume_code<C: VerificationCodeRepository>(
    codes: &C,
    email: &str,
    code: &str,
    purpose: CodePurpose,
) -> Result<VerificationCode, AuthServiceError> {
    let row = codes
        .find_latest(email, code, purpose)
        .await?
        .ok_or(AuthServiceError::CodeNotFound)?;

    let now = Utc::now();
    row.check(now)?;

    if codes.consume(row.id, now).await? {
        return Ok(VerificationCode {
            verified: true,
            updated_at: now,
            ..row
        });
    }

    let current = codes
        .find_by_id(row.id)
        .await?
        .ok_or(AuthServiceError::CodeNotFound)?;
    current.check(Utc::now())?;
    Err(AuthServiceError::CodeAlreadyUsed)
}

/// Classify the latest matching code without consuming it.
pub async fn check_code<C: VerificationCodeRepository>(
    codes: &C,
    email: &str,
    code: &str,
    purpose: CodePurpose,
) -> Result<VerificationCode, AuthServiceError> {
    let row = codes
        .find_latest(email, code, purpose)
        .await?
        .ok_or(AuthServiceError::CodeNotFound)?;
    row.check(Utc::now())?;
    Ok(row)
}

// ── SendCode ─────────────────────────────────────────────────────────────────

pub struct SendCodeInput {
    pub email: String,
    pub purpose: CodePurpose,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub locale: Locale,
}

#[derive(Debug)]
pub struct SendCodeOutput {
    pub expires_at: DateTime<Utc>,
}

pub struct SendCodeUseCase<U, C, N>
where
    U: UserRepository,
    C: VerificationCodeRepository,
    N: NotificationDispatcher,
{
    pub users: U,
    pub codes: C,
    pub notifier: N,
}

impl<U, C, N> SendCodeUseCase<U, C, N>
where
    U: UserRepository,
    C: VerificationCodeRepository,
    N: NotificationDispatcher,
{
    pub async fn execute(&self, input: SendCodeInput) -> Result<SendCodeOutput, AuthServiceError> {
        let email = require_valid_email(&input.email)?;

        let existing = self.users.find_by_email(&email).await?;
        match input.purpose {
            CodePurpose::Registration if existing.is_some() => {
                return Err(AuthServiceError::EmailTaken);
            }
            CodePurpose::PasswordReset if existing.is_none() => {
                return Err(AuthServiceError::UserNotFound);
            }
            _ => {}
        }

        let now = Utc::now();
        let code = VerificationCode {
            id: Uuid::now_v7(),
            first_name: input.first_name,
            last_name: input.last_name,
            email,
            code: generate_code(),
            purpose: input.purpose,
            expires_at: now + Duration::seconds(input.purpose.ttl_secs()),
            verified: false,
            created_at: now,
            updated_at: now,
        };

        // Supersede + insert is atomic; the email is queued afterwards so a
        // queue failure leaves a usable code behind.
        self.codes.create_superseding(&code).await?;
        tracing::info!(code_id = %code.id, purpose = %code.purpose, "verification code issued");

        let message = EmailMessage::verification_code(&code, input.locale);
        if let Err(e) = self.notifier.enqueue(&code.email, &message).await {
            tracing::warn!(code_id = %code.id, error = ?e, "verification email enqueue failed");
            return Err(AuthServiceError::DeliveryFailure);
        }

        Ok(SendCodeOutput {
            expires_at: code.expires_at,
        })
    }
}

// ── VerifyCode ───────────────────────────────────────────────────────────────

pub struct VerifyCodeInput {
    pub email: String,
    pub code: String,
    pub purpose: CodePurpose,
}

pub struct VerifyCodeUseCase<C: VerificationCodeRepository> {
    pub codes: C,
}

impl<C: VerificationCodeRepository> VerifyCodeUseCase<C> {
    pub async fn execute(&self, input: VerifyCodeInput) -> Result<(), AuthServiceError> {
        let email = normalize_email(&input.email);
        let row = consume_code(&self.codes, &email, &input.code, input.purpose).await?;
        tracing::info!(code_id = %row.id, purpose = %row.purpose, "verification code consumed");
        Ok(())
    }
}
