use axum::response::IntoResponse;
use axum::http::StatusCode;
use uuid::Uuid;

use warden_auth::error::AuthServiceError;
use warden_auth::usecase::gate::{AuthenticateUseCase, REFRESH_PATH};
use warden_domain::role::{ADMIN, CUSTOMER, RoleRequirement, SERVICE_PROVIDER};
use warden_testing::auth::{access_token, expired_token, refresh_token, test_tokens};

use crate::helpers::{ALICE, MockStore};

fn gate(store: &MockStore) -> AuthenticateUseCase<MockStore, MockStore> {
    AuthenticateUseCase {
        users: store.clone(),
        roles: store.clone(),
        tokens: test_tokens(),
    }
}

#[tokio::test]
async fn should_attach_principal_with_roles_for_access_token() {
    let store = MockStore::seeded();
    let user = store.add_user(ALICE, None, &[CUSTOMER]);

    let principal = gate(&store)
        .execute(Some(&access_token(user.id)), "/user")
        .await
        .unwrap();

    assert_eq!(principal.user_id, user.id);
    assert_eq!(principal.email, ALICE);
    assert_eq!(principal.roles, vec![CUSTOMER.to_owned()]);
    assert!(!principal.refresh);
}

#[tokio::test]
async fn should_reject_missing_token() {
    let store = MockStore::seeded();
    let result = gate(&store).execute(None, "/user").await;
    assert!(
        matches!(result, Err(AuthServiceError::TokenMissing)),
        "expected TokenMissing, got {result:?}"
    );
}

#[tokio::test]
async fn should_reject_malformed_token() {
    let store = MockStore::seeded();
    let result = gate(&store).execute(Some("not-a-jwt"), "/user").await;
    assert!(matches!(result, Err(AuthServiceError::TokenInvalid)));
}

#[tokio::test]
async fn should_reject_expired_access_token() {
    let store = MockStore::seeded();
    let user = store.add_user(ALICE, None, &[CUSTOMER]);
    let token = expired_token(user.id, false, 3600);

    let result = gate(&store).execute(Some(&token), "/user").await;
    assert!(matches!(result, Err(AuthServiceError::TokenExpired)));
}

#[tokio::test]
async fn should_reject_refresh_token_outside_refresh_route() {
    let store = MockStore::seeded();
    let user = store.add_user(ALICE, None, &[ADMIN]);
    let token = refresh_token(user.id);

    for path in ["/user", "/auth/logout", "/admin/roles", "/auth/refresh/"] {
        let result = gate(&store).execute(Some(&token), path).await;
        assert!(
            matches!(result, Err(AuthServiceError::RefreshTokenNotAllowed)),
            "path {path}: got {result:?}"
        );
    }
}

#[tokio::test]
async fn should_accept_refresh_token_on_refresh_route() {
    let store = MockStore::seeded();
    let user = store.add_user(ALICE, None, &[CUSTOMER]);

    let principal = gate(&store)
        .execute(Some(&refresh_token(user.id)), REFRESH_PATH)
        .await
        .unwrap();
    assert!(principal.refresh);
    assert_eq!(principal.user_id, user.id);
}

#[tokio::test]
async fn should_reject_expired_refresh_token_on_refresh_route() {
    let store = MockStore::seeded();
    let user = store.add_user(ALICE, None, &[CUSTOMER]);
    let token = expired_token(user.id, true, 3600);

    let result = gate(&store).execute(Some(&token), REFRESH_PATH).await;
    assert!(matches!(result, Err(AuthServiceError::TokenExpired)));
}

#[tokio::test]
async fn should_reject_unknown_subject_with_401() {
    let store = MockStore::seeded();
    let err = gate(&store)
        .execute(Some(&access_token(Uuid::new_v4())), "/user")
        .await
        .unwrap_err();

    assert!(matches!(err, AuthServiceError::UnknownSubject));
    assert_eq!(err.into_response().status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn should_reject_soft_deleted_subject() {
    use warden_auth::domain::repository::UserRepository;

    let store = MockStore::seeded();
    let user = store.add_user(ALICE, None, &[CUSTOMER]);
    store.soft_delete(user.id).await.unwrap();

    let result = gate(&store)
        .execute(Some(&access_token(user.id)), "/user")
        .await;
    assert!(matches!(result, Err(AuthServiceError::UnknownSubject)));
}

#[tokio::test]
async fn should_apply_role_hierarchy_to_resolved_principal() {
    let store = MockStore::seeded();
    let admin = store.add_user("admin@example.com", None, &[ADMIN]);
    let provider = store.add_user("provider@example.com", None, &[SERVICE_PROVIDER]);

    let admin = gate(&store)
        .execute(Some(&access_token(admin.id)), "/provider/me")
        .await
        .unwrap();
    assert!(admin.satisfies(&RoleRequirement::SERVICE_PROVIDER));
    assert!(admin.satisfies(&RoleRequirement::ADMIN));

    let provider = gate(&store)
        .execute(Some(&access_token(provider.id)), "/admin/roles")
        .await
        .unwrap();
    assert!(provider.satisfies(&RoleRequirement::SERVICE_PROVIDER));
    assert!(!provider.satisfies(&RoleRequirement::ADMIN));
}
