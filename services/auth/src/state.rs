use sea_orm::DatabaseConnection;

use warden_auth_types::token::SessionTokens;

use crate::infra::db::{DbRoleRepository, DbUserRepository, DbVerificationCodeRepository};
use crate::infra::outbox::OutboxDispatcher;
use crate::infra::password::PasswordHasher;

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub tokens: SessionTokens,
    pub hasher: PasswordHasher,
}

impl AppState {
    pub fn user_repo(&self) -> DbUserRepository {
        DbUserRepository {
            db: self.db.clone(),
        }
    }

    pub fn role_repo(&self) -> DbRoleRepository {
        DbRoleRepository {
            db: self.db.clone(),
        }
    }

    pub fn code_repo(&self) -> DbVerificationCodeRepository {
        DbVerificationCodeRepository {
            db: self.db.clone(),
        }
    }

    pub fn notifier(&self) -> OutboxDispatcher {
        OutboxDispatcher {
            db: self.db.clone(),
        }
    }
}
