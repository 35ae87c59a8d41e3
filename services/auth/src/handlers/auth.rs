use axum::{
    Json,
    extract::State,
    http::{HeaderMap, StatusCode},
};
use axum_extra::extract::WithRejection;
use axum_extra::headers::authorization::Bearer;
use axum_extra::headers::{Authorization, HeaderMapExt};
use serde::{Deserialize, Serialize};

use warden_auth_types::identity::Principal;

use crate::error::AuthServiceError;
use crate::handlers::JsonBody;
use crate::handlers::user::UserResponse;
use crate::state::AppState;
use crate::usecase::token::{
    LoginInput, LoginUseCase, LogoutUseCase, RefreshUseCase, TOKEN_TYPE, TokenPair,
};
use crate::usecase::user::{RegisterInput, RegisterUseCase};

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: &'static str,
    pub expires_in: u64,
}

impl From<TokenPair> for TokenResponse {
    fn from(pair: TokenPair) -> Self {
        Self {
            access_token: pair.access_token,
            refresh_token: pair.refresh_token,
            token_type: TOKEN_TYPE,
            expires_in: pair.expires_in,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

// ── POST /auth/register ───────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub code: String,
    pub password: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

pub async fn register(
    State(state): State<AppState>,
    WithRejection(Json(body), _): JsonBody<RegisterRequest>,
) -> Result<(StatusCode, Json<UserResponse>), AuthServiceError> {
    let usecase = RegisterUseCase {
        users: state.user_repo(),
        codes: state.code_repo(),
        hasher: state.hasher,
    };
    let profile = usecase
        .execute(RegisterInput {
            email: body.email,
            code: body.code,
            password: body.password,
            first_name: body.first_name,
            last_name: body.last_name,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(profile.into())))
}

// ── POST /auth/login ──────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    #[serde(flatten)]
    pub tokens: TokenResponse,
    pub user: UserResponse,
}

pub async fn login(
    State(state): State<AppState>,
    WithRejection(Json(body), _): JsonBody<LoginRequest>,
) -> Result<Json<LoginResponse>, AuthServiceError> {
    let usecase = LoginUseCase {
        users: state.user_repo(),
        roles: state.role_repo(),
        tokens: state.tokens.clone(),
        hasher: state.hasher,
    };
    let out = usecase
        .execute(LoginInput {
            email: body.email,
            password: body.password,
        })
        .await?;
    Ok(Json(LoginResponse {
        tokens: out.tokens.into(),
        user: out.profile.into(),
    }))
}

// ── POST /auth/refresh ────────────────────────────────────────────────────────

pub async fn refresh(
    State(state): State<AppState>,
    principal: Principal,
    headers: HeaderMap,
) -> Result<Json<TokenResponse>, AuthServiceError> {
    let bearer = headers
        .typed_get::<Authorization<Bearer>>()
        .ok_or(AuthServiceError::TokenMissing)?;
    let usecase = RefreshUseCase {
        users: state.user_repo(),
        tokens: state.tokens.clone(),
    };
    let pair = usecase.execute(&principal, bearer.token()).await?;
    Ok(Json(pair.into()))
}

// ── POST /auth/logout ─────────────────────────────────────────────────────────

pub async fn logout(
    State(state): State<AppState>,
    principal: Principal,
) -> Result<Json<MessageResponse>, AuthServiceError> {
    let usecase = LogoutUseCase {
        users: state.user_repo(),
    };
    usecase.execute(principal.user_id).await?;
    Ok(Json(MessageResponse {
        message: "logged out",
    }))
}
