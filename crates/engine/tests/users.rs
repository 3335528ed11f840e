mod common;

use engine::{EngineError, ProfileUpdateCmd, RegisterCmd};

use common::{engine_with_db, register};

#[tokio::test]
async fn register_then_login() {
    let engine = engine_with_db().await;
    let user = register(&engine, "Alice", "alice@example.com").await;

    let logged = engine.login("alice@example.com", "secret").await.unwrap();
    assert_eq!(logged, user);
    assert_eq!(engine.user(user.id).await.unwrap().name, "Alice");
}

#[tokio::test]
async fn duplicate_email_is_rejected() {
    let engine = engine_with_db().await;
    register(&engine, "Alice", "alice@example.com").await;

    let err = engine
        .register(RegisterCmd {
            name: "Other".to_string(),
            email: "alice@example.com".to_string(),
            password: "x".to_string(),
        })
        .await
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::ExistingKey("Email already registered".to_string())
    );
}

#[tokio::test]
async fn register_requires_every_field() {
    let engine = engine_with_db().await;
    let err = engine
        .register(RegisterCmd {
            name: "Alice".to_string(),
            email: "  ".to_string(),
            password: "secret".to_string(),
        })
        .await
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::Validation("Name, email and password are required".to_string())
    );
}

#[tokio::test]
async fn bad_credentials_are_indistinguishable() {
    let engine = engine_with_db().await;
    register(&engine, "Alice", "alice@example.com").await;

    let wrong_password = engine
        .login("alice@example.com", "nope")
        .await
        .unwrap_err();
    let unknown_email = engine.login("bob@example.com", "secret").await.unwrap_err();
    assert_eq!(wrong_password, EngineError::InvalidCredentials);
    assert_eq!(unknown_email, EngineError::InvalidCredentials);
}

#[tokio::test]
async fn profile_update_changes_password_and_keeps_blank_fields() {
    let engine = engine_with_db().await;
    let user = register(&engine, "Alice", "alice@example.com").await;

    let updated = engine
        .update_profile(ProfileUpdateCmd {
            user_id: user.id,
            name: Some(String::new()),
            email: Some("alice@new.example".to_string()),
            password: Some("changed".to_string()),
        })
        .await
        .unwrap();
    assert_eq!(updated.name, "Alice");
    assert_eq!(updated.email, "alice@new.example");

    assert!(engine.login("alice@new.example", "secret").await.is_err());
    engine.login("alice@new.example", "changed").await.unwrap();
}

#[tokio::test]
async fn profile_update_rejects_taken_email() {
    let engine = engine_with_db().await;
    let alice = register(&engine, "Alice", "alice@example.com").await;
    register(&engine, "Bob", "bob@example.com").await;

    let err = engine
        .update_profile(ProfileUpdateCmd {
            user_id: alice.id,
            email: Some("bob@example.com".to_string()),
            ..Default::default()
        })
        .await
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::ExistingKey("Email already in use".to_string())
    );

    // Keeping one's own email is not a conflict.
    engine
        .update_profile(ProfileUpdateCmd {
            user_id: alice.id,
            email: Some("alice@example.com".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
}
