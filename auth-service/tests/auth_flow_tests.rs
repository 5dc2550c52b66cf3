mod common;

use std::sync::Arc;

use auth::TokenCodec;
use auth::TokenError;
use auth_service::domain::identity::errors::AuthError;
use auth_service::domain::identity::models::UserId;
use auth_service::domain::identity::ports::AuthServicePort;
use chrono::Duration;
use common::TestContext;
use common::TEST_SECRET;

#[tokio::test]
async fn test_login_supersedes_previous_refresh_token() {
    let ctx = TestContext::new();
    let service = &ctx.service;

    service.register("alice", "pw1").await.unwrap();

    let wrong = service.login("alice", "wrong").await;
    assert!(matches!(wrong, Err(AuthError::InvalidCredentials)));

    let first = service.login("alice", "pw1").await.unwrap();
    let second = service.login("alice", "pw1").await.unwrap();
    assert_ne!(first.refresh_token, second.refresh_token);

    let stale = service.refresh_access_token(&first.refresh_token).await;
    assert!(matches!(stale, Err(AuthError::TokenMismatch)));

    // The latest refresh token is still the active one
    assert!(service
        .refresh_access_token(&second.refresh_token)
        .await
        .is_ok());
}

#[tokio::test]
async fn test_logout_revokes_refresh_token() {
    let ctx = TestContext::new();
    let service = &ctx.service;

    let user_id = service.register("alice", "pw1").await.unwrap();
    let tokens = service.login("alice", "pw1").await.unwrap();
    assert_eq!(
        ctx.token_store.stored(user_id).as_deref(),
        Some(tokens.refresh_token.as_str())
    );

    service.logout(&tokens.refresh_token).await.unwrap();
    assert_eq!(ctx.token_store.stored(user_id), None);

    let result = service.refresh_access_token(&tokens.refresh_token).await;
    assert!(matches!(result, Err(AuthError::TokenMismatch)));
}

#[tokio::test]
async fn test_logout_is_idempotent() {
    let ctx = TestContext::new();
    let service = &ctx.service;

    service.register("alice", "pw1").await.unwrap();
    let tokens = service.login("alice", "pw1").await.unwrap();

    service.logout(&tokens.refresh_token).await.unwrap();
    service.logout(&tokens.refresh_token).await.unwrap();
}

#[tokio::test]
async fn test_refresh_with_garbage_skips_store() {
    let ctx = TestContext::new();

    let result = ctx.service.refresh_access_token("garbage").await;

    assert!(matches!(
        result,
        Err(AuthError::InvalidToken(TokenError::Malformed(_)))
    ));
    assert_eq!(ctx.token_store.reads(), 0);
}

#[tokio::test]
async fn test_refresh_returns_new_access_token_without_rotation() {
    let ctx = TestContext::new();
    let service = &ctx.service;

    let user_id = service.register("alice", "pw1").await.unwrap();
    let tokens = service.login("alice", "pw1").await.unwrap();

    let access_token = service
        .refresh_access_token(&tokens.refresh_token)
        .await
        .unwrap();
    assert_ne!(access_token, tokens.access_token);

    let claims = TokenCodec::new(TEST_SECRET)
        .unwrap()
        .parse_and_verify(&access_token)
        .unwrap();
    assert_eq!(UserId(claims.user_id), user_id);

    // Refreshing again with the same token keeps working
    assert_eq!(
        ctx.token_store.stored(user_id).as_deref(),
        Some(tokens.refresh_token.as_str())
    );
    assert!(service
        .refresh_access_token(&tokens.refresh_token)
        .await
        .is_ok());
}

#[tokio::test]
async fn test_duplicate_registration() {
    let ctx = TestContext::new();

    ctx.service.register("alice", "pw1").await.unwrap();
    let result = ctx.service.register("alice", "pw2").await;

    assert!(matches!(result, Err(AuthError::DuplicateUsername(_))));

    // The first password still works
    assert!(ctx.service.login("alice", "pw1").await.is_ok());
    assert!(matches!(
        ctx.service.login("alice", "pw2").await,
        Err(AuthError::InvalidCredentials)
    ));
}

#[tokio::test]
async fn test_unknown_user_and_wrong_password_are_indistinguishable() {
    let ctx = TestContext::new();
    ctx.service.register("alice", "pw1").await.unwrap();

    let unknown = ctx.service.login("bob", "pw1").await.unwrap_err();
    let wrong = ctx.service.login("alice", "pw2").await.unwrap_err();

    assert_eq!(unknown.to_string(), wrong.to_string());
    assert!(matches!(unknown, AuthError::InvalidCredentials));
    assert!(matches!(wrong, AuthError::InvalidCredentials));
}

#[tokio::test]
async fn test_login_withholds_tokens_when_store_fails() {
    let ctx = TestContext::new();
    let user_id = ctx.service.register("alice", "pw1").await.unwrap();

    ctx.token_store.set_failing(true);
    let result = ctx.service.login("alice", "pw1").await;

    assert!(matches!(result, Err(AuthError::PersistenceFailure(_))));
    ctx.token_store.set_failing(false);
    assert_eq!(ctx.token_store.stored(user_id), None);
}

#[tokio::test]
async fn test_expired_refresh_token_rejected() {
    let codec = TokenCodec::with_lifetimes(TEST_SECRET, Duration::hours(1), Duration::seconds(-5))
        .unwrap();
    let ctx = TestContext::with_codec(codec);

    ctx.service.register("alice", "pw1").await.unwrap();
    let tokens = ctx.service.login("alice", "pw1").await.unwrap();

    let result = ctx.service.refresh_access_token(&tokens.refresh_token).await;
    assert!(matches!(
        result,
        Err(AuthError::InvalidToken(TokenError::Expired))
    ));

    let result = ctx.service.logout(&tokens.refresh_token).await;
    assert!(matches!(
        result,
        Err(AuthError::InvalidToken(TokenError::Expired))
    ));
}

#[tokio::test]
async fn test_token_from_foreign_secret_rejected() {
    let ctx = TestContext::new();
    let user_id = ctx.service.register("alice", "pw1").await.unwrap();
    ctx.service.login("alice", "pw1").await.unwrap();

    let forged = TokenCodec::new(b"attacker-controlled-secret-32-bytes!!")
        .unwrap()
        .issue(user_id.0)
        .unwrap();

    let result = ctx.service.logout(&forged.refresh_token).await;
    assert!(matches!(
        result,
        Err(AuthError::InvalidToken(TokenError::SignatureMismatch))
    ));
    assert!(ctx.token_store.stored(user_id).is_some());
}

#[tokio::test]
async fn test_users_are_isolated() {
    let ctx = TestContext::new();

    let alice = ctx.service.register("alice", "pw1").await.unwrap();
    let bob = ctx.service.register("bob", "pw2").await.unwrap();
    assert_ne!(alice, bob);

    let alice_tokens = ctx.service.login("alice", "pw1").await.unwrap();
    let bob_tokens = ctx.service.login("bob", "pw2").await.unwrap();

    ctx.service.logout(&alice_tokens.refresh_token).await.unwrap();

    assert!(ctx
        .service
        .refresh_access_token(&bob_tokens.refresh_token)
        .await
        .is_ok());
}

#[tokio::test]
async fn test_concurrent_logins_leave_one_active_token() {
    let ctx = TestContext::new();
    let user_id = ctx.service.register("alice", "pw1").await.unwrap();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let service = Arc::clone(&ctx.service);
            tokio::spawn(async move { service.login("alice", "pw1").await })
        })
        .collect();

    let mut issued = Vec::new();
    for handle in handles {
        issued.push(handle.await.unwrap().unwrap());
    }

    let active = ctx.token_store.stored(user_id).unwrap();
    let mut accepted = 0;
    for tokens in &issued {
        if ctx
            .service
            .refresh_access_token(&tokens.refresh_token)
            .await
            .is_ok()
        {
            accepted += 1;
            assert_eq!(tokens.refresh_token, active);
        }
    }

    assert_eq!(accepted, 1);
}
