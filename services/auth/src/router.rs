use axum::{
    Router, middleware,
    routing::{delete, get, patch, post, put},
};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use warden_core::health::healthz;
use warden_core::middleware::{propagate_request_id_layer, request_id_layer};
use warden_domain::role::RoleRequirement;

use crate::gate::{authenticate, role_gate};
use crate::handlers::{
    admin::{assign_roles, list_roles},
    auth::{login, logout, refresh, register},
    health::readyz,
    password::{forgot_password, reset_password, verify_reset_code},
    user::{change_password, delete_me, get_me, provider_me},
    verification::{send_code, verify_code},
};
use crate::state::AppState;
use crate::usecase::gate::REFRESH_PATH;

pub fn build_router(state: AppState) -> Router {
    let public = Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Credentials
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        // Password reset
        .route("/auth/forgot-password", post(forgot_password))
        .route("/auth/verify-reset-code", post(verify_reset_code))
        .route("/auth/reset-password", post(reset_password))
        // Verification codes
        .route("/verification/send", post(send_code))
        .route("/verification/verify", post(verify_code));

    let provider = Router::new()
        .route("/provider/me", get(provider_me))
        .route_layer(middleware::from_fn_with_state(
            RoleRequirement::SERVICE_PROVIDER,
            role_gate,
        ));

    let admin = Router::new()
        .route("/admin/roles", get(list_roles))
        .route("/admin/users/{user_id}/roles", put(assign_roles))
        .route_layer(middleware::from_fn_with_state(
            RoleRequirement::ADMIN,
            role_gate,
        ));

    let protected = Router::new()
        .route(REFRESH_PATH, post(refresh))
        .route("/auth/logout", post(logout))
        .route("/user", get(get_me))
        .route("/user", delete(delete_me))
        .route("/user/password", patch(change_password))
        .merge(provider)
        .merge(admin)
        .route_layer(middleware::from_fn_with_state(state.clone(), authenticate));

    Router::new()
        .merge(public)
        .merge(protected)
        .layer(
            ServiceBuilder::new()
                .layer(request_id_layer())
                .layer(TraceLayer::new_for_http())
                .layer(propagate_request_id_layer()),
        )
        .with_state(state)
}
