use warden_adapters::HashSetTokenBlacklist;
use warden_application::AuthError;
use warden_core::{App, AuthContext, TfaStatus, TfaType};

use crate::helpers::{app, login_tokens, scopes, spawn_service};

#[tokio::test]
async fn refresh_rotates_and_revokes_the_old_refresh_token() {
    let blacklist = HashSetTokenBlacklist::new();
    let service = spawn_service(blacklist.clone()).await;
    let app = app(TfaStatus::Optional);
    let tokens = login_tokens(&service, &app, &["read", "offline"]).await;
    let refresh = tokens.refresh_token.unwrap();
    let anonymous = AuthContext::anonymous(app.clone());

    let rotated = service
        .orchestrator()
        .refresh(&anonymous, &refresh, &scopes(&["read", "write", "offline"]))
        .await
        .unwrap();

    let new_refresh = rotated.refresh_token.unwrap();
    assert_ne!(new_refresh, refresh);
    assert!(blacklist.entry(&refresh).is_some());

    let replayed = service
        .orchestrator()
        .refresh(&anonymous, &refresh, &scopes(&["read"]))
        .await;
    assert!(matches!(replayed, Err(AuthError::RevokedToken)));

    service
        .orchestrator()
        .refresh(&anonymous, &new_refresh, &scopes(&["read"]))
        .await
        .unwrap();
}

#[tokio::test]
async fn tokens_are_bound_to_their_kind_and_app() {
    let service = spawn_service(HashSetTokenBlacklist::new()).await;
    let app = app(TfaStatus::Optional);
    let tokens = login_tokens(&service, &app, &["read", "offline"]).await;
    let refresh = tokens.refresh_token.unwrap();

    let as_bearer = AuthContext::with_token(app.clone(), refresh.clone());
    let result = service.orchestrator().attach_device_token(&as_bearer, "device-1").await;
    assert!(matches!(result, Err(AuthError::InvalidToken)));

    let access_as_refresh = service
        .orchestrator()
        .refresh(&AuthContext::anonymous(app.clone()), &tokens.access_token, &[])
        .await;
    assert!(matches!(access_as_refresh, Err(AuthError::InvalidToken)));

    let other_app = App::new("mobile", TfaStatus::Optional, TfaType::App).with_scopes(["read"]);
    let foreign = service
        .orchestrator()
        .refresh(&AuthContext::anonymous(other_app), &refresh, &[])
        .await;
    assert!(matches!(foreign, Err(AuthError::InvalidToken)));
}

#[tokio::test]
async fn refresh_token_requires_offline_scope() {
    let service = spawn_service(HashSetTokenBlacklist::new()).await;
    let tokens = login_tokens(&service, &app(TfaStatus::Optional), &["read"]).await;

    assert!(tokens.refresh_token.is_none());
    let body = serde_json::to_value(&tokens).unwrap();
    assert!(body.get("access_token").is_some());
    assert!(body.get("refresh_token").is_none());
}

#[tokio::test]
async fn logout_revokes_access_and_refresh_tokens() {
    let blacklist = HashSetTokenBlacklist::new();
    let service = spawn_service(blacklist.clone()).await;
    let app = app(TfaStatus::Optional);
    let tokens = login_tokens(&service, &app, &["read", "offline"]).await;
    let refresh = tokens.refresh_token.unwrap();
    let signed_in = AuthContext::with_token(app.clone(), tokens.access_token);

    let revoked = service
        .orchestrator()
        .logout(&signed_in, Some(&refresh))
        .await
        .unwrap();
    assert_eq!(revoked, 2);
    assert_eq!(blacklist.len(), 2);

    let after = service.orchestrator().attach_device_token(&signed_in, "device-1").await;
    assert!(matches!(after, Err(AuthError::RevokedToken)));

    let refreshed = service
        .orchestrator()
        .refresh(&AuthContext::anonymous(app), &refresh, &[])
        .await;
    assert!(matches!(refreshed, Err(AuthError::RevokedToken)));
}

#[tokio::test]
async fn login_rejects_bad_credentials_and_foreign_scopes() {
    let service = spawn_service(HashSetTokenBlacklist::new()).await;
    let app = app(TfaStatus::Optional);

    let wrong_password = crate::helpers::login(&service, &app, "u1", "Wr0ngPassword", &[]).await;
    let unknown_user = crate::helpers::login(&service, &app, "nobody", "Passw0rd1", &[]).await;
    assert!(matches!(wrong_password, Err(AuthError::InvalidCredentials)));
    assert!(matches!(unknown_user, Err(AuthError::InvalidCredentials)));

    let forbidden = crate::helpers::login(&service, &app, "u1", "Passw0rd1", &["admin"]).await;
    assert!(matches!(forbidden, Err(AuthError::ScopesForbidden)));
}
