#![allow(async_fn_in_trait)]

use chrono::{DateTime, Utc};
use uuid::Uuid;

use warden_domain::verification::CodePurpose;

use crate::domain::types::{EmailMessage, NewUser, Role, User, VerificationCode};
use crate::error::AuthServiceError;

/// Credential store. Every lookup ignores soft-deleted users.
pub trait UserRepository: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AuthServiceError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AuthServiceError>;

    /// Insert the user and its initial role in one transaction.
    /// A live user already owning the email yields `EmailTaken`.
    async fn create(&self, user: &NewUser, role: &str) -> Result<User, AuthServiceError>;

    /// Store a new password hash and revoke the outstanding refresh token.
    async fn update_password(&self, id: Uuid, password_hash: &str)
    -> Result<(), AuthServiceError>;

    async fn set_refresh_token(
        &self,
        id: Uuid,
        token_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), AuthServiceError>;

    /// Compare-and-set rotation: replaces the stored hash only while it still
    /// equals `current_hash` and has not expired. Returns `false` otherwise.
    async fn rotate_refresh_token(
        &self,
        id: Uuid,
        current_hash: &str,
        new_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<bool, AuthServiceError>;

    async fn clear_refresh_token(&self, id: Uuid) -> Result<(), AuthServiceError>;

    /// Set `deleted_at` and clear the refresh token. Returns `false` if no live user matched.
    async fn soft_delete(&self, id: Uuid) -> Result<bool, AuthServiceError>;
}

/// Role registry and membership.
pub trait RoleRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<Role>, AuthServiceError>;

    async fn names_for_user(&self, user_id: Uuid) -> Result<Vec<String>, AuthServiceError>;

    /// Replace the user's role set atomically. Unknown names yield `InvalidInput`.
    async fn replace_for_user(
        &self,
        user_id: Uuid,
        names: &[String],
    ) -> Result<(), AuthServiceError>;
}

/// Verification code store.
pub trait VerificationCodeRepository: Send + Sync {
    /// Expire every outstanding code for the same (email, purpose) and insert
    /// `code`, in one transaction.
    async fn create_superseding(&self, code: &VerificationCode) -> Result<(), AuthServiceError>;

    /// Most recently created row matching (email, code, purpose), in any state.
    async fn find_latest(
        &self,
        email: &str,
        code: &str,
        purpose: CodePurpose,
    ) -> Result<Option<VerificationCode>, AuthServiceError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<VerificationCode>, AuthServiceError>;

    /// Conditional update `verified = true WHERE verified = false AND expires_at > now`.
    /// Returns `true` only for the caller whose update affected the row.
    async fn consume(&self, id: Uuid, now: DateTime<Utc>) -> Result<bool, AuthServiceError>;
}

/// Queues emails for asynchronous delivery.
pub trait NotificationDispatcher: Send + Sync {
    async fn enqueue(&self, recipient: &str, message: &EmailMessage)
    -> Result<(), AuthServiceError>;
}
