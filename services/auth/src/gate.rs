//! Authorization gate: bearer authentication followed by route-level role checks.

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use axum_extra::headers::authorization::Bearer;
use axum_extra::headers::{Authorization, HeaderMapExt};

use warden_auth_types::identity::Principal;
use warden_domain::role::RoleRequirement;

use crate::error::AuthServiceError;
use crate::state::AppState;
use crate::usecase::gate::AuthenticateUseCase;

/// Validates the bearer token, resolves the subject and its roles, and
/// attaches a [`Principal`] to the request.
pub async fn authenticate(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AuthServiceError> {
    let bearer = request.headers().typed_get::<Authorization<Bearer>>();
    let usecase = AuthenticateUseCase {
        users: state.user_repo(),
        roles: state.role_repo(),
        tokens: state.tokens.clone(),
    };
    let principal = usecase
        .execute(bearer.as_ref().map(|h| h.token()), request.uri().path())
        .await?;

    request.extensions_mut().insert(principal);
    Ok(next.run(request).await)
}

/// Rejects callers that do not satisfy `requirement`. Must run after [`authenticate`].
pub async fn role_gate(
    State(requirement): State<RoleRequirement>,
    request: Request,
    next: Next,
) -> Result<Response, AuthServiceError> {
    let Some(principal) = request.extensions().get::<Principal>() else {
        return Err(AuthServiceError::Unauthenticated);
    };
    if !principal.satisfies(&requirement) {
        return Err(AuthServiceError::Forbidden(requirement.denial_message()));
    }
    Ok(next.run(request).await)
}
