use secrecy::Secret;
use warden_adapters::HashSetTokenBlacklist;
use warden_application::{AuthError, CredentialsUpdate};
use warden_core::{AuthContext, TfaStatus, User, UserStorage};

use crate::helpers::{
    PASSWORD, USERNAME, add_user, app, login, login_tokens, password, spawn_service,
};

fn secret(value: &str) -> Option<Secret<String>> {
    Some(Secret::new(value.to_string()))
}

#[tokio::test]
async fn password_change_takes_effect_on_next_login() {
    let service = spawn_service(HashSetTokenBlacklist::new()).await;
    let app = app(TfaStatus::Optional);
    let tokens = login_tokens(&service, &app, &["read"]).await;
    let context = AuthContext::with_token(app.clone(), tokens.access_token);

    let updated = service
        .orchestrator()
        .update_credentials(
            &context,
            CredentialsUpdate {
                old_password: secret(PASSWORD),
                new_password: secret("N3wPassword"),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.message(), "Password changed.");

    let old = login(&service, &app, USERNAME, PASSWORD, &["read"]).await;
    assert!(matches!(old, Err(AuthError::InvalidCredentials)));
    login(&service, &app, USERNAME, "N3wPassword", &["read"])
        .await
        .unwrap();
}

#[tokio::test]
async fn failed_checks_change_nothing() {
    let service = spawn_service(HashSetTokenBlacklist::new()).await;
    add_user(&service, "taken", "taken@example.com").await;
    let app = app(TfaStatus::Optional);
    let tokens = login_tokens(&service, &app, &["read"]).await;
    let context = AuthContext::with_token(app.clone(), tokens.access_token);

    let wrong_old = service
        .orchestrator()
        .update_credentials(
            &context,
            CredentialsUpdate {
                email: Some("fresh@example.com".to_string()),
                old_password: secret("Wr0ngPassword"),
                new_password: secret("N3wPassword"),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(wrong_old, Err(AuthError::InvalidCredentials)));

    let weak = service
        .orchestrator()
        .update_credentials(
            &context,
            CredentialsUpdate {
                old_password: secret(PASSWORD),
                new_password: secret("short"),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(weak, Err(AuthError::WeakPassword(_))));

    let taken_name = service
        .orchestrator()
        .update_credentials(
            &context,
            CredentialsUpdate {
                username: Some("taken".to_string()),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(taken_name, Err(AuthError::UsernameTaken)));

    let taken_email = service
        .orchestrator()
        .update_credentials(
            &context,
            CredentialsUpdate {
                email: Some("taken@example.com".to_string()),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(taken_email, Err(AuthError::EmailTaken)));

    let user = service
        .user_store()
        .user_by_name_password(USERNAME, &password(PASSWORD))
        .await
        .unwrap();
    assert_eq!(user.email(), "u1@example.com");
}

#[tokio::test]
async fn rename_and_attach_device_token() {
    let service = spawn_service(HashSetTokenBlacklist::new()).await;
    let app = app(TfaStatus::Optional);
    let tokens = login_tokens(&service, &app, &["read"]).await;
    let context = AuthContext::with_token(app.clone(), tokens.access_token);

    let updated = service
        .orchestrator()
        .update_credentials(
            &context,
            CredentialsUpdate {
                username: Some("u1-renamed".to_string()),
                email: Some("u1@example.com".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.message(), "Username changed.");

    service
        .orchestrator()
        .attach_device_token(&context, "  device-1  ")
        .await
        .unwrap();
    let blank = service.orchestrator().attach_device_token(&context, "   ").await;
    assert!(matches!(blank, Err(AuthError::InvalidInput(_))));

    let user = service
        .user_store()
        .user_by_name_password("u1-renamed", &password(PASSWORD))
        .await
        .unwrap();
    assert_eq!(
        service.user_store().device_tokens(user.id()).await.unwrap(),
        vec!["device-1"]
    );
    assert!(service.user_store().last_login(user.id()).await.unwrap().is_some());
}

#[tokio::test]
async fn email_case_change_is_not_a_conflict() {
    let service = spawn_service(HashSetTokenBlacklist::new()).await;
    let app = app(TfaStatus::Optional);
    let tokens = login_tokens(&service, &app, &["read"]).await;
    let context = AuthContext::with_token(app.clone(), tokens.access_token);

    let updated = service
        .orchestrator()
        .update_credentials(
            &context,
            CredentialsUpdate {
                email: Some("U1@Example.com".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.message(), "Email changed.");
}
