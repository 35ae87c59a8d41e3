use axum::{Json, extract::State, http::StatusCode};
use axum_extra::extract::WithRejection;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use warden_auth_types::identity::Principal;
use warden_core::serde::{to_rfc3339_ms, to_rfc3339_ms_opt};
use warden_domain::role::{ADMIN, SERVICE_PROVIDER};
use warden_domain::user::AuthProvider;

use crate::error::AuthServiceError;
use crate::handlers::JsonBody;
use crate::state::AppState;
use crate::usecase::password::{ChangePasswordInput, ChangePasswordUseCase};
use crate::usecase::user::{DeleteAccountUseCase, ProfileUseCase, UserProfile};

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub provider: AuthProvider,
    pub roles: Vec<String>,
    #[serde(serialize_with = "to_rfc3339_ms_opt")]
    pub email_verified_at: Option<DateTime<Utc>>,
    #[serde(serialize_with = "to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
    #[serde(serialize_with = "to_rfc3339_ms")]
    pub updated_at: DateTime<Utc>,
}

impl From<UserProfile> for UserResponse {
    fn from(profile: UserProfile) -> Self {
        let user = profile.user;
        Self {
            id: user.id,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            provider: user.provider,
            roles: profile.roles,
            email_verified_at: user.email_verified_at,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

// ── GET /user ─────────────────────────────────────────────────────────────────

pub async fn get_me(
    State(state): State<AppState>,
    principal: Principal,
) -> Result<Json<UserResponse>, AuthServiceError> {
    let usecase = ProfileUseCase {
        users: state.user_repo(),
        roles: state.role_repo(),
    };
    let profile = usecase.execute(principal.user_id).await?;
    Ok(Json(profile.into()))
}

// ── PATCH /user/password ──────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

pub async fn change_password(
    State(state): State<AppState>,
    principal: Principal,
    WithRejection(Json(body), _): JsonBody<ChangePasswordRequest>,
) -> Result<StatusCode, AuthServiceError> {
    let usecase = ChangePasswordUseCase {
        users: state.user_repo(),
        hasher: state.hasher,
    };
    usecase
        .execute(ChangePasswordInput {
            user_id: principal.user_id,
            current_password: body.current_password,
            new_password: body.new_password,
        })
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── DELETE /user ──────────────────────────────────────────────────────────────

pub async fn delete_me(
    State(state): State<AppState>,
    principal: Principal,
) -> Result<StatusCode, AuthServiceError> {
    let usecase = DeleteAccountUseCase {
        users: state.user_repo(),
    };
    usecase.execute(principal.user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── GET /provider/me ──────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct ProviderProfileResponse {
    pub user: UserResponse,
    /// `service_provider`, or `admin` when admitted through the role hierarchy.
    pub acting_as: &'static str,
}

pub async fn provider_me(
    State(state): State<AppState>,
    principal: Principal,
) -> Result<Json<ProviderProfileResponse>, AuthServiceError> {
    let usecase = ProfileUseCase {
        users: state.user_repo(),
        roles: state.role_repo(),
    };
    let profile = usecase.execute(principal.user_id).await?;
    let acting_as = if profile.roles.iter().any(|r| r == SERVICE_PROVIDER) {
        SERVICE_PROVIDER
    } else {
        ADMIN
    };
    Ok(Json(ProviderProfileResponse {
        user: profile.into(),
        acting_as,
    }))
}
