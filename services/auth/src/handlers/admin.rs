use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use axum_extra::extract::WithRejection;
use serde::Deserialize;
use uuid::Uuid;

use warden_auth_types::identity::Principal;

use crate::domain::types::Role;
use crate::error::AuthServiceError;
use crate::handlers::JsonBody;
use crate::state::AppState;
use crate::usecase::role::{AssignRolesInput, AssignRolesUseCase, ListRolesUseCase};

// ── GET /admin/roles ──────────────────────────────────────────────────────────

pub async fn list_roles(State(state): State<AppState>) -> Result<Json<Vec<Role>>, AuthServiceError> {
    let usecase = ListRolesUseCase {
        roles: state.role_repo(),
    };
    Ok(Json(usecase.execute().await?))
}

// ── PUT /admin/users/{user_id}/roles ──────────────────────────────────────────

#[derive(Deserialize)]
pub struct AssignRolesRequest {
    pub roles: Vec<String>,
}

pub async fn assign_roles(
    State(state): State<AppState>,
    principal: Principal,
    WithRejection(Path(user_id), _): WithRejection<Path<Uuid>, AuthServiceError>,
    WithRejection(Json(body), _): JsonBody<AssignRolesRequest>,
) -> Result<StatusCode, AuthServiceError> {
    let usecase = AssignRolesUseCase {
        users: state.user_repo(),
        roles: state.role_repo(),
    };
    usecase
        .execute(AssignRolesInput {
            actor_id: principal.user_id,
            user_id,
            roles: body.roles,
        })
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
