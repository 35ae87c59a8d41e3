use axum::{Json, extract::State, http::StatusCode};
use axum_extra::extract::WithRejection;
use serde::{Deserialize, Serialize};

use warden_core::locale::RequestLocale;
use warden_domain::verification::CodePurpose;

use crate::error::AuthServiceError;
use crate::handlers::JsonBody;
use crate::handlers::auth::MessageResponse;
use crate::handlers::verification::CodeSentResponse;
use crate::state::AppState;
use crate::usecase::password::{CheckResetCodeUseCase, ResetPasswordInput, ResetPasswordUseCase};
use crate::usecase::verification::{SendCodeInput, SendCodeUseCase};

// ── POST /auth/forgot-password ────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

pub async fn forgot_password(
    State(state): State<AppState>,
    RequestLocale(locale): RequestLocale,
    WithRejection(Json(body), _): JsonBody<ForgotPasswordRequest>,
) -> Result<(StatusCode, Json<CodeSentResponse>), AuthServiceError> {
    let usecase = SendCodeUseCase {
        users: state.user_repo(),
        codes: state.code_repo(),
        notifier: state.notifier(),
    };
    let out = usecase
        .execute(SendCodeInput {
            email: body.email,
            purpose: CodePurpose::PasswordReset,
            first_name: None,
            last_name: None,
            locale,
        })
        .await?;
    Ok((StatusCode::ACCEPTED, Json(out.into())))
}

// ── POST /auth/verify-reset-code ──────────────────────────────────────────────

#[derive(Deserialize)]
pub struct VerifyResetCodeRequest {
    pub email: String,
    pub code: String,
}

#[derive(Debug, Serialize)]
pub struct ValidCodeResponse {
    pub valid: bool,
}

pub async fn verify_reset_code(
    State(state): State<AppState>,
    WithRejection(Json(body), _): JsonBody<VerifyResetCodeRequest>,
) -> Result<Json<ValidCodeResponse>, AuthServiceError> {
    let usecase = CheckResetCodeUseCase {
        codes: state.code_repo(),
    };
    usecase.execute(&body.email, &body.code).await?;
    Ok(Json(ValidCodeResponse { valid: true }))
}

// ── POST /auth/reset-password ─────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct ResetPasswordRequest {
    pub email: String,
    pub code: String,
    pub password: String,
}

pub async fn reset_password(
    State(state): State<AppState>,
    WithRejection(Json(body), _): JsonBody<ResetPasswordRequest>,
) -> Result<Json<MessageResponse>, AuthServiceError> {
    let usecase = ResetPasswordUseCase {
        users: state.user_repo(),
        codes: state.code_repo(),
        hasher: state.hasher,
    };
    usecase
        .execute(ResetPasswordInput {
            email: body.email,
            code: body.code,
            password: body.password,
        })
        .await?;
    Ok(Json(MessageResponse {
        message: "password has been reset",
    }))
}
