use axum::http::StatusCode;

/// Handler for `GET /healthz`: the process is up and serving.
pub async fn healthz() -> StatusCode {
    StatusCode::OK
}

/// Map a dependency probe result to a readiness status.
///
/// Services implement `GET /readyz` by probing their dependencies and
/// passing the outcome here.
pub fn readiness(dependencies_ok: bool) -> StatusCode {
    if dependencies_ok {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}
