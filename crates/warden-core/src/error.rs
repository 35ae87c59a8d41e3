use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Build the error envelope shared by every Warden error response.
///
/// ```
/// let body = warden_core::error::error_body("FORBIDDEN", "forbidden");
/// assert_eq!(body["status"], "error");
/// assert_eq!(body["kind"], "FORBIDDEN");
/// ```
pub fn error_body(kind: &str, message: &str) -> serde_json::Value {
    serde_json::json!({
        "status": "error",
        "kind": kind,
        "message": message,
    })
}

/// Render an error envelope with the given status.
pub fn error_response(status: StatusCode, kind: &str, message: &str) -> Response {
    (status, axum::Json(error_body(kind, message))).into_response()
}

/// Rejection for extractors that run outside a service's own error type.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// The request carries no authenticated principal.
    #[error("unauthenticated")]
    Unauthenticated,
}

impl AppError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Unauthenticated => "UNAUTHENTICATED",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Unauthenticated => StatusCode::UNAUTHORIZED,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        error_response(self.status(), self.kind(), &self.to_string())
    }
}
