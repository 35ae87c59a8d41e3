use sea_orm::Database;
use tracing::info;

use warden_auth::config::AuthConfig;
use warden_auth::infra::password::PasswordHasher;
use warden_auth::router::build_router;
use warden_auth::state::AppState;
use warden_auth_types::token::SessionTokens;
use warden_core::config::Config;
use warden_core::tracing::init_tracing;

#[tokio::main]
async fn main() {
    init_tracing();

    let config = AuthConfig::from_env();

    let db = Database::connect(&config.database_url)
        .await
        .expect("failed to connect to database");

    let tokens = SessionTokens::new(config.jwt_secret.clone())
        .with_ttls(config.access_token_ttl_secs, config.refresh_token_ttl_secs)
        .with_leeway(config.token_leeway_secs);

    let state = AppState {
        db,
        tokens,
        hasher: PasswordHasher::new(config.bcrypt_cost),
    };

    let router = build_router(state);
    let addr = format!("0.0.0.0:{}", config.auth_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind");

    info!(?config, "auth service listening on {addr}");
    axum::serve(listener, router).await.expect("server error");
}
