use chrono::Utc;
use futures::future::join_all;

use warden_auth::error::AuthServiceError;
use warden_auth::usecase::verification::{
    SendCodeInput, SendCodeUseCase, VerifyCodeInput, VerifyCodeUseCase,
};
use warden_domain::locale::Locale;
use warden_domain::role::CUSTOMER;
use warden_domain::verification::CodePurpose;

use crate::helpers::{ALICE, MockStore};

fn send_usecase(store: &MockStore) -> SendCodeUseCase<MockStore, MockStore, MockStore> {
    SendCodeUseCase {
        users: store.clone(),
        codes: store.clone(),
        notifier: store.clone(),
    }
}

fn send_input(purpose: CodePurpose) -> SendCodeInput {
    SendCodeInput {
        email: ALICE.to_owned(),
        purpose,
        first_name: Some("Alice".to_owned()),
        last_name: None,
        locale: Locale::En,
    }
}

async fn verify(
    store: &MockStore,
    code: &str,
    purpose: CodePurpose,
) -> Result<(), AuthServiceError> {
    VerifyCodeUseCase {
        codes: store.clone(),
    }
    .execute(VerifyCodeInput {
        email: ALICE.to_owned(),
        code: code.to_owned(),
        purpose,
    })
    .await
}

// ── SendCode ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_send_registration_code_then_verify_once() {
    let store = MockStore::seeded();
    let before = Utc::now();

    let out = send_usecase(&store)
        .execute(send_input(CodePurpose::Registration))
        .await
        .unwrap();

    let codes = store.codes_for(ALICE);
    assert_eq!(codes.len(), 1);
    let row = &codes[0];
    assert_eq!(row.purpose, CodePurpose::Registration);
    assert!(!row.verified);
    assert_eq!(row.code.len(), 6);
    assert_eq!(out.expires_at, row.expires_at);
    let ttl = (row.expires_at - before).num_seconds();
    assert!((599..=601).contains(&ttl), "ttl was {ttl}s");

    let outbox = store.outbox();
    assert_eq!(outbox.len(), 1);
    assert_eq!(outbox[0].0, ALICE);
    assert_eq!(outbox[0].1.kind, "verification_code");
    assert_eq!(outbox[0].1.data["code"], row.code.as_str());

    verify(&store, &row.code, CodePurpose::Registration)
        .await
        .unwrap();
    assert!(store.code(row.id).verified);

    let again = verify(&store, &row.code, CodePurpose::Registration).await;
    assert!(
        matches!(again, Err(AuthServiceError::CodeAlreadyUsed)),
        "expected CodeAlreadyUsed, got {again:?}"
    );
}

#[tokio::test]
async fn should_use_fifteen_minute_ttl_for_password_reset() {
    let store = MockStore::seeded();
    store.add_user(ALICE, None, &[CUSTOMER]);
    let before = Utc::now();

    send_usecase(&store)
        .execute(send_input(CodePurpose::PasswordReset))
        .await
        .unwrap();

    let row = &store.codes_for(ALICE)[0];
    let ttl = (row.expires_at - before).num_seconds();
    assert!((899..=901).contains(&ttl), "ttl was {ttl}s");
    assert_eq!(store.outbox()[0].1.kind, "password_reset_code");
}

#[tokio::test]
async fn should_reject_registration_code_for_taken_email() {
    let store = MockStore::seeded();
    store.add_user(ALICE, None, &[CUSTOMER]);

    let result = send_usecase(&store)
        .execute(send_input(CodePurpose::Registration))
        .await;
    assert!(matches!(result, Err(AuthServiceError::EmailTaken)));
    assert!(store.codes_for(ALICE).is_empty());
}

#[tokio::test]
async fn should_reject_reset_code_for_unknown_email() {
    let store = MockStore::seeded();
    let result = send_usecase(&store)
        .execute(send_input(CodePurpose::PasswordReset))
        .await;
    assert!(matches!(result, Err(AuthServiceError::UserNotFound)));
    assert!(store.outbox().is_empty());
}

#[tokio::test]
async fn should_reject_malformed_email() {
    let store = MockStore::seeded();
    let mut input = send_input(CodePurpose::Registration);
    input.email = "not-an-email".to_owned();

    let result = send_usecase(&store).execute(input).await;
    assert!(matches!(result, Err(AuthServiceError::InvalidInput(_))));
}

#[tokio::test]
async fn should_supersede_outstanding_code() {
    let store = MockStore::seeded();
    send_usecase(&store)
        .execute(send_input(CodePurpose::Registration))
        .await
        .unwrap();
    send_usecase(&store)
        .execute(send_input(CodePurpose::Registration))
        .await
        .unwrap();

    let mut codes = store.codes_for(ALICE);
    codes.sort_by_key(|c| c.created_at);
    assert_eq!(codes.len(), 2);

    let now = Utc::now();
    assert!(matches!(
        codes[0].check(now),
        Err(AuthServiceError::CodeExpired)
    ));
    assert!(codes[1].check(now).is_ok());
}

#[tokio::test]
async fn should_not_supersede_codes_of_other_purpose() {
    let store = MockStore::seeded();
    store.add_user("bob@example.com", None, &[CUSTOMER]);
    let reset = store.add_code(ALICE, "111111", CodePurpose::PasswordReset, 900, false);

    send_usecase(&store)
        .execute(send_input(CodePurpose::Registration))
        .await
        .unwrap();

    assert!(store.code(reset.id).check(Utc::now()).is_ok());
}

#[tokio::test]
async fn should_keep_code_valid_when_delivery_fails() {
    let store = MockStore::seeded();
    let result = send_usecase(&store.failing_notifier())
        .execute(send_input(CodePurpose::Registration))
        .await;
    assert!(
        matches!(result, Err(AuthServiceError::DeliveryFailure)),
        "expected DeliveryFailure, got {result:?}"
    );

    let codes = store.codes_for(ALICE);
    assert_eq!(codes.len(), 1);
    verify(&store, &codes[0].code, CodePurpose::Registration)
        .await
        .unwrap();
}

#[tokio::test]
async fn should_localize_queued_email() {
    let store = MockStore::seeded();
    let mut input = send_input(CodePurpose::Registration);
    input.locale = Locale::Ar;

    send_usecase(&store).execute(input).await.unwrap();

    let (_, message) = &store.outbox()[0];
    assert_eq!(message.locale, Locale::Ar);
    assert_ne!(message.subject, "Your verification code");
}

// ── VerifyCode ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_fail_expired_code_even_if_never_verified() {
    let store = MockStore::seeded();
    store.add_code(ALICE, "123456", CodePurpose::Registration, -1, false);

    let result = verify(&store, "123456", CodePurpose::Registration).await;
    assert!(matches!(result, Err(AuthServiceError::CodeExpired)));
}

#[tokio::test]
async fn should_report_expired_before_already_used() {
    let store = MockStore::seeded();
    store.add_code(ALICE, "123456", CodePurpose::Registration, -1, true);

    let result = verify(&store, "123456", CodePurpose::Registration).await;
    assert!(matches!(result, Err(AuthServiceError::CodeExpired)));
}

#[tokio::test]
async fn should_report_unknown_code() {
    let store = MockStore::seeded();
    store.add_code(ALICE, "123456", CodePurpose::Registration, 600, false);

    let wrong_code = verify(&store, "654321", CodePurpose::Registration).await;
    assert!(matches!(wrong_code, Err(AuthServiceError::CodeNotFound)));

    let wrong_purpose = verify(&store, "123456", CodePurpose::PasswordReset).await;
    assert!(matches!(wrong_purpose, Err(AuthServiceError::CodeNotFound)));
}

#[tokio::test]
async fn should_let_exactly_one_concurrent_verification_succeed() {
    let store = MockStore::seeded();
    let row = store.add_code(ALICE, "424242", CodePurpose::Registration, 600, false);

    let usecases: Vec<_> = (0..10)
        .map(|_| VerifyCodeUseCase {
            codes: store.clone(),
        })
        .collect();
    let results = join_all(usecases.iter().map(|u| {
        u.execute(VerifyCodeInput {
            email: ALICE.to_owned(),
            code: "424242".to_owned(),
            purpose: CodePurpose::Registration,
        })
    }))
    .await;

    let successes = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(successes, 1);
    assert!(
        results
            .iter()
            .filter(|r| r.is_err())
            .all(|r| matches!(r, Err(AuthServiceError::CodeAlreadyUsed)))
    );
    assert!(store.code(row.id).verified);
}
