use axum::{Json, extract::State, http::StatusCode};
use axum_extra::extract::WithRejection;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use warden_core::locale::RequestLocale;
use warden_core::serde::to_rfc3339_ms;
use warden_domain::verification::CodePurpose;

use crate::error::AuthServiceError;
use crate::handlers::JsonBody;
use crate::state::AppState;
use crate::usecase::verification::{
    SendCodeInput, SendCodeOutput, SendCodeUseCase, VerifyCodeInput, VerifyCodeUseCase,
};

#[derive(Debug, Serialize)]
pub struct CodeSentResponse {
    pub message: &'static str,
    #[serde(serialize_with = "to_rfc3339_ms")]
    pub expires_at: DateTime<Utc>,
}

impl From<SendCodeOutput> for CodeSentResponse {
    fn from(out: SendCodeOutput) -> Self {
        Self {
            message: "verification code sent",
            expires_at: out.expires_at,
        }
    }
}

// ── POST /verification/send ───────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct SendCodeRequest {
    pub email: String,
    pub purpose: CodePurpose,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

pub async fn send_code(
    State(state): State<AppState>,
    RequestLocale(locale): RequestLocale,
    WithRejection(Json(body), _): JsonBody<SendCodeRequest>,
) -> Result<(StatusCode, Json<CodeSentResponse>), AuthServiceError> {
    let usecase = SendCodeUseCase {
        users: state.user_repo(),
        codes: state.code_repo(),
        notifier: state.notifier(),
    };
    let out = usecase
        .execute(SendCodeInput {
            email: body.email,
            purpose: body.purpose,
            first_name: body.first_name,
            last_name: body.last_name,
            locale,
        })
        .await?;
    Ok((StatusCode::ACCEPTED, Json(out.into())))
}

// ── POST /verification/verify ─────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct VerifyCodeRequest {
    pub email: String,
    pub code: String,
    pub purpose: CodePurpose,
}

#[derive(Debug, Serialize)]
pub struct VerifiedResponse {
    pub verified: bool,
}

pub async fn verify_code(
    State(state): State<AppState>,
    WithRejection(Json(body), _): JsonBody<VerifyCodeRequest>,
) -> Result<Json<VerifiedResponse>, AuthServiceError> {
    let usecase = VerifyCodeUseCase {
        codes: state.code_repo(),
    };
    usecase
        .execute(VerifyCodeInput {
            email: body.email,
            code: body.code,
            purpose: body.purpose,
        })
        .await?;
    Ok(Json(VerifiedResponse { verified: true }))
}
