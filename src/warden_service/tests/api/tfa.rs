use warden_adapters::HashSetTokenBlacklist;
use secrecy::Secret;
use warden_application::{AuthError, CredentialsUpdate, LoginResponse, SecretHandoff};
use warden_core::{App, AuthContext, TfaSecret, TfaStatus, TfaType, TokenBlacklist};

use crate::helpers::{
    FailingBlacklist, PASSWORD, TestService, USERNAME, app, current_code, login, login_tokens,
    scopes, spawn_service, wrong_code,
};

/// Logs in, enables TFA and returns the still valid login token with the secret.
async fn signed_in_with_tfa<B>(service: &TestService<B>) -> (AuthContext, TfaSecret)
where
    B: TokenBlacklist + Clone,
{
    let app = app(TfaStatus::Optional);
    let tokens = login_tokens(service, &app, &["read"]).await;
    let context = AuthContext::with_token(app, tokens.access_token);

    match service.orchestrator().enable_tfa(&context).await {
        Ok(SecretHandoff::Display {
            secret,
            provisioning_uri,
        }) => {
            assert!(provisioning_uri.starts_with("otpauth://totp/"));
            (context, secret)
        }
        other => panic!("expected the secret to be displayed, got {other:?}"),
    }
}

#[tokio::test]
async fn finalize_with_correct_code_rotates_tokens() {
    let blacklist = HashSetTokenBlacklist::new();
    let service = spawn_service(blacklist.clone()).await;
    let (context, secret) = signed_in_with_tfa(&service).await;
    let old_token = context.bearer_token.clone().unwrap();

    let tokens = service
        .orchestrator()
        .finalize_tfa(&context, &current_code(&service, &secret), &scopes(&["read", "offline"]))
        .await
        .unwrap();

    assert_ne!(tokens.access_token, old_token);
    assert!(tokens.refresh_token.is_some());
    assert!(blacklist.entry(&old_token).is_some());

    let reused = service.orchestrator().attach_device_token(&context, "device-1").await;
    assert!(matches!(reused, Err(AuthError::RevokedToken)));
}

#[tokio::test]
async fn finalize_still_succeeds_when_blacklist_write_fails() {
    let service = spawn_service(FailingBlacklist).await;
    let (context, secret) = signed_in_with_tfa(&service).await;

    let tokens = service
        .orchestrator()
        .finalize_tfa(&context, &current_code(&service, &secret), &scopes(&["read", "offline"]))
        .await
        .unwrap();

    assert!(tokens.refresh_token.is_some());
    // The old token could not be revoked.
    service
        .orchestrator()
        .attach_device_token(&context, "device-1")
        .await
        .unwrap();
}

#[tokio::test]
async fn finalize_with_wrong_code_keeps_old_token_usable() {
    let blacklist = HashSetTokenBlacklist::new();
    let service = spawn_service(blacklist.clone()).await;
    let (context, secret) = signed_in_with_tfa(&service).await;

    let result = service
        .orchestrator()
        .finalize_tfa(&context, &wrong_code(&service, &secret), &scopes(&["read"]))
        .await;

    assert!(matches!(result, Err(AuthError::InvalidTfaCode)));
    assert!(blacklist.is_empty());
    service
        .orchestrator()
        .attach_device_token(&context, "device-1")
        .await
        .unwrap();
}

#[tokio::test]
async fn login_after_enabling_requires_second_factor() {
    let service = spawn_service(HashSetTokenBlacklist::new()).await;
    let (_, secret) = signed_in_with_tfa(&service).await;
    let app = app(TfaStatus::Optional);

    let pending = match login(&service, &app, USERNAME, PASSWORD, &["read"]).await {
        Ok(LoginResponse::TfaRequired {
            access_token,
            enrollment: None,
        }) => AuthContext::with_token(app.clone(), access_token),
        other => panic!("expected a pending login, got {other:?}"),
    };

    let enable = service.orchestrator().enable_tfa(&pending).await;
    assert!(matches!(enable, Err(AuthError::InvalidToken)));

    service
        .orchestrator()
        .finalize_tfa(&pending, &current_code(&service, &secret), &scopes(&["read"]))
        .await
        .unwrap();
}

#[tokio::test]
async fn password_alone_cannot_act_on_the_account() {
    let service = spawn_service(HashSetTokenBlacklist::new()).await;
    signed_in_with_tfa(&service).await;
    let app = app(TfaStatus::Optional);

    let pending = match login(&service, &app, USERNAME, PASSWORD, &[]).await {
        Ok(LoginResponse::TfaRequired { access_token, .. }) => {
            AuthContext::with_token(app.clone(), access_token)
        }
        other => panic!("expected a pending login, got {other:?}"),
    };

    let takeover = service
        .orchestrator()
        .update_credentials(
            &pending,
            CredentialsUpdate {
                email: Some("someone-else@example.com".to_string()),
                old_password: Some(Secret::new(PASSWORD.to_string())),
                new_password: Some(Secret::new("N3wPassword".to_string())),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(takeover, Err(AuthError::InvalidToken)));

    let device = service.orchestrator().attach_device_token(&pending, "device-1").await;
    assert!(matches!(device, Err(AuthError::InvalidToken)));

    let disable = service.orchestrator().disable_tfa(&pending, "123456").await;
    assert!(matches!(disable, Err(AuthError::InvalidToken)));

    login(&service, &app, USERNAME, PASSWORD, &[]).await.unwrap();
}

#[tokio::test]
async fn mandatory_sms_app_without_provider_never_half_enrolls() {
    let service = spawn_service(HashSetTokenBlacklist::new()).await;
    let sms_app = App::new("kiosk", TfaStatus::Mandatory, TfaType::Sms).with_scopes(["read"]);

    for _ in 0..2 {
        let result = login(&service, &sms_app, USERNAME, PASSWORD, &["read"]).await;
        assert!(matches!(result, Err(AuthError::NotImplemented(TfaType::Sms))));
    }

    // Still not enrolled, so an optional app logs straight in.
    login_tokens(&service, &app(TfaStatus::Optional), &["read"]).await;
}

#[tokio::test]
async fn mandatory_app_enrolls_on_first_login() {
    let service = spawn_service(HashSetTokenBlacklist::new()).await;
    let app = app(TfaStatus::Mandatory);

    let (access_token, secret) = match login(&service, &app, USERNAME, PASSWORD, &["read"]).await {
        Ok(LoginResponse::TfaRequired {
            access_token,
            enrollment: Some(SecretHandoff::Display { secret, .. }),
        }) => (access_token, secret),
        other => panic!("expected enrollment, got {other:?}"),
    };
    let pending = AuthContext::with_token(app.clone(), access_token);

    let tokens = service
        .orchestrator()
        .finalize_tfa(&pending, &current_code(&service, &secret), &scopes(&["read"]))
        .await
        .unwrap();
    assert!(tokens.refresh_token.is_none());

    let signed_in = AuthContext::with_token(app.clone(), tokens.access_token);
    let result = service
        .orchestrator()
        .disable_tfa(&signed_in, &current_code(&service, &secret))
        .await;
    assert!(matches!(
        result,
        Err(AuthError::TfaNotApplicable(TfaStatus::Mandatory))
    ));

    let again = login(&service, &app, USERNAME, PASSWORD, &["read"]).await;
    assert!(matches!(
        again,
        Ok(LoginResponse::TfaRequired {
            enrollment: None,
            ..
        })
    ));
}

#[tokio::test]
async fn disabling_tfa_restores_single_step_login() {
    let service = spawn_service(HashSetTokenBlacklist::new()).await;
    let (context, secret) = signed_in_with_tfa(&service).await;

    let wrong = service
        .orchestrator()
        .disable_tfa(&context, &wrong_code(&service, &secret))
        .await;
    assert!(matches!(wrong, Err(AuthError::InvalidTfaCode)));

    service
        .orchestrator()
        .disable_tfa(&context, &current_code(&service, &secret))
        .await
        .unwrap();

    let again = service.orchestrator().disable_tfa(&context, "123456").await;
    assert!(matches!(again, Err(AuthError::TfaNotEnabled)));

    login_tokens(&service, &app(TfaStatus::Optional), &["read"]).await;
}
