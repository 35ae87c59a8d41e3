use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use warden_auth::domain::repository::{
    NotificationDispatcher, RoleRepository, UserRepository, VerificationCodeRepository,
};
use warden_auth::domain::types::{EmailMessage, NewUser, Role, User, VerificationCode};
use warden_auth::error::AuthServiceError;
use warden_auth::infra::password::PasswordHasher;
use warden_domain::role::{ADMIN, CUSTOMER, SERVICE_PROVIDER};
use warden_domain::user::AuthProvider;
use warden_domain::verification::CodePurpose;

// ── MockStore ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct StoredUser {
    pub user: User,
    pub deleted_at: Option<DateTime<Utc>>,
}

#[derive(Default)]
pub struct StoreState {
    pub users: Vec<StoredUser>,
    pub roles: Vec<Role>,
    pub user_roles: Vec<(Uuid, i32)>,
    pub codes: Vec<VerificationCode>,
    pub outbox: Vec<(String, EmailMessage)>,
}

/// In-memory stand-in for every repository port. Clones share state.
#[derive(Clone, Default)]
pub struct MockStore {
    pub state: Arc<Mutex<StoreState>>,
    pub fail_enqueue: bool,
}

impl MockStore {
    /// Store with the three built-in roles.
    pub fn seeded() -> Self {
        let store = Self::default();
        {
            let mut state = store.state.lock().unwrap();
            for (id, name, display) in [
                (1, ADMIN, "Administrator"),
                (2, SERVICE_PROVIDER, "Service Provider"),
                (3, CUSTOMER, "Customer"),
            ] {
                state.roles.push(Role {
                    id,
                    name: name.to_owned(),
                    display_name: display.to_owned(),
                    description: None,
                });
            }
        }
        store
    }

    pub fn failing_notifier(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            fail_enqueue: true,
        }
    }

    pub fn add_user(&self, email: &str, password_hash: Option<String>, roles: &[&str]) -> User {
        let now = Utc::now();
        let user = User {
            id: Uuid::now_v7(),
            email: email.to_owned(),
            password_hash,
            first_name: None,
            last_name: None,
            provider: AuthProvider::Email,
            email_verified_at: Some(now),
            refresh_token_hash: None,
            refresh_token_expires_at: None,
            created_at: now,
            updated_at: now,
        };
        let mut state = self.state.lock().unwrap();
        for name in roles {
            let role_id = state.roles.iter().find(|r| r.name == *name).unwrap().id;
            state.user_roles.push((user.id, role_id));
        }
        state.users.push(StoredUser {
            user: user.clone(),
            deleted_at: None,
        });
        user
    }

    pub fn add_code(
        &self,
        email: &str,
        code: &str,
        purpose: CodePurpose,
        expires_in_secs: i64,
        verified: bool,
    ) -> VerificationCode {
        let now = Utc::now();
        let row = VerificationCode {
            id: Uuid::now_v7(),
            first_name: Some("Alice".to_owned()),
            last_name: Some("Liddell".to_owned()),
            email: email.to_owned(),
            code: code.to_owned(),
            purpose,
            expires_at: now + Duration::seconds(expires_in_secs),
            verified,
            created_at: now,
            updated_at: now,
        };
        self.state.lock().unwrap().codes.push(row.clone());
        row
    }

    pub fn stored_user(&self, id: Uuid) -> StoredUser {
        self.state
            .lock()
            .unwrap()
            .users
            .iter()
            .find(|u| u.user.id == id)
            .cloned()
            .unwrap()
    }

    pub fn user_by_email(&self, email: &str) -> Option<User> {
        self.state
            .lock()
            .unwrap()
            .users
            .iter()
            .find(|u| u.user.email == email && u.deleted_at.is_none())
            .map(|u| u.user.clone())
    }

    pub fn codes_for(&self, email: &str) -> Vec<VerificationCode> {
        self.state
            .lock()
            .unwrap()
            .codes
            .iter()
            .filter(|c| c.email == email)
            .cloned()
            .collect()
    }

    pub fn code(&self, id: Uuid) -> VerificationCode {
        self.state
            .lock()
            .unwrap()
            .codes
            .iter()
            .find(|c| c.id == id)
            .cloned()
            .unwrap()
    }

    pub fn outbox(&self) -> Vec<(String, EmailMessage)> {
        self.state.lock().unwrap().outbox.clone()
    }

    fn live_user_mut<'a>(state: &'a mut StoreState, id: Uuid) -> Option<&'a mut StoredUser> {
        state
            .users
            .iter_mut()
            .find(|u| u.user.id == id && u.deleted_at.is_none())
    }
}

impl UserRepository for MockStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AuthServiceError> {
        Ok(self.user_by_email(email))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AuthServiceError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .users
            .iter()
            .find(|u| u.user.id == id && u.deleted_at.is_none())
            .map(|u| u.user.clone()))
    }

    async fn create(&self, user: &NewUser, role: &str) -> Result<User, AuthServiceError> {
        let mut state = self.state.lock().unwrap();
        if state
            .users
            .iter()
            .any(|u| u.user.email == user.email && u.deleted_at.is_none())
        {
            return Err(AuthServiceError::EmailTaken);
        }
        let now = Utc::now();
        let created = User {
            id: user.id,
            email: user.email.clone(),
            password_hash: user.password_hash.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            provider: user.provider,
            email_verified_at: user.email_verified_at,
            refresh_token_hash: None,
            refresh_token_expires_at: None,
            created_at: now,
            updated_at: now,
        };
        let role_id = state.roles.iter().find(|r| r.name == role).unwrap().id;
        state.user_roles.push((created.id, role_id));
        state.users.push(StoredUser {
            user: created.clone(),
            deleted_at: None,
        });
        Ok(created)
    }

    async fn update_password(
        &self,
        id: Uuid,
        password_hash: &str,
    ) -> Result<(), AuthServiceError> {
        let mut state = self.state.lock().unwrap();
        let stored = Self::live_user_mut(&mut state, id).ok_or(AuthServiceError::UserNotFound)?;
        stored.user.password_hash = Some(password_hash.to_owned());
        stored.user.refresh_token_hash = None;
        stored.user.refresh_token_expires_at = None;
        Ok(())
    }

    async fn set_refresh_token(
        &self,
        id: Uuid,
        token_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), AuthServiceError> {
        let mut state = self.state.lock().unwrap();
        if let Some(stored) = Self::live_user_mut(&mut state, id) {
            stored.user.refresh_token_hash = Some(token_hash.to_owned());
            stored.user.refresh_token_expires_at = Some(expires_at);
        }
        Ok(())
    }

    async fn rotate_refresh_token(
        &self,
        id: Uuid,
        current_hash: &str,
        new_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<bool, AuthServiceError> {
        let mut state = self.state.lock().unwrap();
        let Some(stored) = Self::live_user_mut(&mut state, id) else {
            return Ok(false);
        };
        let matches = stored.user.refresh_token_hash.as_deref() == Some(current_hash)
            && stored
                .user
                .refresh_token_expires_at
                .is_some_and(|exp| exp > Utc::now());
        if !matches {
            return Ok(false);
        }
        stored.user.refresh_token_hash = Some(new_hash.to_owned());
        stored.user.refresh_token_expires_at = Some(expires_at);
        Ok(true)
    }

    async fn clear_refresh_token(&self, id: Uuid) -> Result<(), AuthServiceError> {
        let mut state = self.state.lock().unwrap();
        if let Some(stored) = state.users.iter_mut().find(|u| u.user.id == id) {
            stored.user.refresh_token_hash = None;
            stored.user.refresh_token_expires_at = None;
        }
        Ok(())
    }

    async fn soft_delete(&self, id: Uuid) -> Result<bool, AuthServiceError> {
        let mut state = self.state.lock().unwrap();
        let Some(stored) = Self::live_user_mut(&mut state, id) else {
            return Ok(false);
        };
        stored.deleted_at = Some(Utc::now());
        stored.user.refresh_token_hash = None;
        stored.user.refresh_token_expires_at = None;
        Ok(true)
    }
}

impl RoleRepository for MockStore {
    async fn list(&self) -> Result<Vec<Role>, AuthServiceError> {
        Ok(self.state.lock().unwrap().roles.clone())
    }

    async fn names_for_user(&self, user_id: Uuid) -> Result<Vec<String>, AuthServiceError> {
        let state = self.state.lock().unwrap();
        let mut names: Vec<String> = state
            .user_roles
            .iter()
            .filter(|(uid, _)| *uid == user_id)
            .filter_map(|(_, rid)| state.roles.iter().find(|r| r.id == *rid))
            .map(|r| r.name.clone())
            .collect();
        names.sort();
        Ok(names)
    }

    async fn replace_for_user(
        &self,
        user_id: Uuid,
        names: &[String],
    ) -> Result<(), AuthServiceError> {
        let mut state = self.state.lock().unwrap();
        let mut ids = Vec::with_capacity(names.len());
        for name in names {
            let role = state
                .roles
                .iter()
                .find(|r| &r.name == name)
                .ok_or_else(|| AuthServiceError::InvalidInput(format!("unknown role: {name}")))?;
            ids.push(role.id);
        }
        state.user_roles.retain(|(uid, _)| *uid != user_id);
        state
            .user_roles
            .extend(ids.into_iter().map(|rid| (user_id, rid)));
        Ok(())
    }
}

impl VerificationCodeRepository for MockStore {
    async fn create_superseding(&self, code: &VerificationCode) -> Result<(), AuthServiceError> {
        let mut state = self.state.lock().unwrap();
        for prior in state.codes.iter_mut().filter(|c| {
            c.email == code.email
                && c.purpose == code.purpose
                && !c.verified
                && c.expires_at > code.created_at
        }) {
            prior.expires_at = code.created_at;
        }
        state.codes.push(code.clone());
        Ok(())
    }

    async fn find_latest(
        &self,
        email: &str,
        code: &str,
        purpose: CodePurpose,
    ) -> Result<Option<VerificationCode>, AuthServiceError> {
        // Let concurrent callers interleave between read and conditional update.
        tokio::task::yield_now().await;
        let state = self.state.lock().unwrap();
        Ok(state
            .codes
            .iter()
            .filter(|c| c.email == email && c.code == code && c.purpose == purpose)
            .max_by_key(|c| c.created_at)
            .cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<VerificationCode>, AuthServiceError> {
        let state = self.state.lock().unwrap();
        Ok(state.codes.iter().find(|c| c.id == id).cloned())
    }

    async fn consume(&self, id: Uuid, now: DateTime<Utc>) -> Result<bool, AuthServiceError> {
        let mut state = self.state.lock().unwrap();
        match state
            .codes
            .iter_mut()
            .find(|c| c.id == id && !c.verified && c.expires_at > now)
        {
            Some(c) => {
                c.verified = true;
                c.updated_at = now;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

impl NotificationDispatcher for MockStore {
    async fn enqueue(
        &self,
        recipient: &str,
        message: &EmailMessage,
    ) -> Result<(), AuthServiceError> {
        if self.fail_enqueue {
            return Err(AuthServiceError::Internal(anyhow::anyhow!(
                "outbox unavailable"
            )));
        }
        self.state
            .lock()
            .unwrap()
            .outbox
            .push((recipient.to_owned(), message.clone()));
        Ok(())
    }
}

// ── Test fixture helpers ─────────────────────────────────────────────────────

pub const ALICE: &str = "alice@example.com";
pub const PASSWORD: &str = "correct horse battery";

pub fn test_hasher() -> PasswordHasher {
    PasswordHasher::new(4)
}

pub async fn hash(password: &str) -> String {
    test_hasher().hash(password).await.unwrap()
}
