use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use warden_domain::locale::Locale;
use warden_domain::user::AuthProvider;
use warden_domain::verification::CodePurpose;

use crate::error::AuthServiceError;

/// Live (non-deleted) user record. Repositories never return soft-deleted rows.
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub password_hash: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub provider: AuthProvider,
    pub email_verified_at: Option<DateTime<Utc>>,
    pub refresh_token_hash: Option<String>,
    pub refresh_token_expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields for a user about to be inserted.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub id: Uuid,
    pub email: String,
    pub password_hash: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub provider: AuthProvider,
    pub email_verified_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Role {
    pub id: i32,
    pub name: String,
    pub display_name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone)]
pub struct VerificationCode {
    pub id: Uuid,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: String,
    pub code: String,
    pub purpose: CodePurpose,
    pub expires_at: DateTime<Utc>,
    pub verified: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl VerificationCode {
    /// Classify the code at `now`. Expiry wins over the verified flag.
    pub fn check(&self, now: DateTime<Utc>) -> Result<(), AuthServiceError> {
        if now >= self.expires_at {
            return Err(AuthServiceError::CodeExpired);
        }
        if self.verified {
            return Err(AuthServiceError::CodeAlreadyUsed);
        }
        Ok(())
    }
}

/// Outbox event for async delivery (verification and reset emails).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutboxEvent {
    pub id: Uuid,
    pub kind: String,
    pub payload: serde_json::Value,
    pub idempotency_key: String,
}

/// Email handed to the notification dispatcher.
#[derive(Debug, Clone, PartialEq)]
pub struct EmailMessage {
    pub kind: &'static str,
    pub locale: Locale,
    pub subject: &'static str,
    pub data: serde_json::Value,
    /// Stable per logical message so a re-enqueue never double-sends.
    pub idempotency_key: String,
}

impl EmailMessage {
    /// Email carrying a freshly issued verification code.
    pub fn verification_code(code: &VerificationCode, locale: Locale) -> Self {
        let (kind, subject) = match (code.purpose, locale) {
            (CodePurpose::Registration, Locale::En) => {
                ("verification_code", "Your verification code")
            }
            (CodePurpose::Registration, Locale::Ar) => ("verification_code", "رمز التحقق الخاص بك"),
            (CodePurpose::PasswordReset, Locale::En) => {
                ("password_reset_code", "Reset your password")
            }
            (CodePurpose::PasswordReset, Locale::Ar) => {
                ("password_reset_code", "إعادة تعيين كلمة المرور")
            }
        };
        Self {
            kind,
            locale,
            subject,
            data: serde_json::json!({
                "code": code.code,
                "first_name": code.first_name,
                "expires_at": code.expires_at.to_rfc3339(),
            }),
            idempotency_key: format!("{kind}:{}", code.id),
        }
    }
}
