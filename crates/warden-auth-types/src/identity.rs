//! Authenticated caller attached to the request by the authorization gate.

use axum::extract::FromRequestParts;
use http::request::Parts;
use uuid::Uuid;

use warden_core::error::AppError;
use warden_domain::role::{self, RoleRequirement};

/// The authenticated subject of a request.
///
/// Inserted into request extensions by the gate once the bearer token is
/// valid and the subject resolves to a live user. Handlers extract it
/// directly; extraction fails with 401 when the gate did not run or rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub user_id: Uuid,
    pub email: String,
    pub roles: Vec<String>,
    /// `true` when the request was authenticated with a refresh token
    /// (only possible on the refresh route).
    pub refresh: bool,
}

impl Principal {
    /// Capability check shared by every gating decision, including the
    /// role hierarchy (`admin` implies `service_provider`).
    pub fn has_role(&self, required: &str) -> bool {
        role::holds(&self.roles, required)
    }

    pub fn satisfies(&self, requirement: &RoleRequirement) -> bool {
        requirement.is_satisfied_by(&self.roles)
    }
}

impl<S> FromRequestParts<S> for Principal
where
    S: Send + Sync,
{
    type Rejection = AppError;

    // Values are read synchronously and moved into a 'static future so the
    // returned future does not borrow `parts`.
    fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let principal = parts.extensions.get::<Principal>().cloned();
        async move { principal.ok_or(AppError::Unauthenticated) }
    }
}
