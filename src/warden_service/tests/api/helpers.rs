use chrono::{Duration, Utc};
use warden_adapters::{AuthServiceSetting, HashMapUserStore, StubSecretDelivery};
use warden_application::{AuthError, AuthTokens, LoginRequest, LoginResponse};
use warden_core::{
    App, AuthContext, BasicUser, Password, Scope, TfaSecret, TfaStatus, TfaType, TokenBlacklist,
    TokenBlacklistError,
};
use warden_service::AuthService;

pub const USERNAME: &str = "u1";
pub const PASSWORD: &str = "Passw0rd1";

pub type TestService<B> = AuthService<HashMapUserStore, B, StubSecretDelivery>;

/// Accepts every token and refuses every write.
#[derive(Clone, Default)]
pub struct FailingBlacklist;

#[async_trait::async_trait]
impl TokenBlacklist for FailingBlacklist {
    async fn add(&self, _token: &str) -> Result<(), TokenBlacklistError> {
        Err(TokenBlacklistError::DatabaseError("connection refused".to_string()))
    }

    async fn contains(&self, _token: &str) -> Result<bool, TokenBlacklistError> {
        Ok(false)
    }
}

pub fn settings() -> AuthServiceSetting {
    AuthServiceSetting::from_json(
        r#"{
            "jwt": { "secret": "integration-test-secret" },
            "tfa": { "issuer": "Warden Test", "skew": 1 }
        }"#,
    )
    .expect("Failed to build test settings")
}

/// Service with `u1` already registered.
pub async fn spawn_service<B>(blacklist: B) -> TestService<B>
where
    B: TokenBlacklist + Clone,
{
    let service = AuthService::new(
        &settings(),
        HashMapUserStore::new(),
        blacklist,
        StubSecretDelivery::new(),
    )
    .expect("Failed to build auth service");

    add_user(&service, USERNAME, "u1@example.com").await;
    service
}

pub async fn add_user<B>(service: &TestService<B>, name: &str, email: &str)
where
    B: TokenBlacklist + Clone,
{
    service
        .user_store()
        .add_user(
            BasicUser::new(name, email).with_scopes(["read", "write", "offline"]),
            password(PASSWORD),
        )
        .await
        .expect("Failed to add user");
}

pub fn app(tfa_status: TfaStatus) -> App {
    App::new("web", tfa_status, TfaType::App).with_scopes(["read", "write", "offline"])
}

pub fn password(value: &str) -> Password {
    Password::try_from(value).expect("Invalid test password")
}

pub fn scopes(names: &[&str]) -> Vec<Scope> {
    names.iter().map(|s| Scope::from(*s)).collect()
}

pub async fn login<B>(
    service: &TestService<B>,
    app: &App,
    username: &str,
    secret: &str,
    requested: &[&str],
) -> Result<LoginResponse, AuthError>
where
    B: TokenBlacklist + Clone,
{
    service
        .orchestrator()
        .login(
            &AuthContext::anonymous(app.clone()),
            LoginRequest {
                username: username.to_string(),
                password: password(secret),
                scopes: scopes(requested),
            },
        )
        .await
}

/// Logs `u1` in and expects tokens straight away.
pub async fn login_tokens<B>(service: &TestService<B>, app: &App, requested: &[&str]) -> AuthTokens
where
    B: TokenBlacklist + Clone,
{
    match login(service, app, USERNAME, PASSWORD, requested).await {
        Ok(LoginResponse::Success(tokens)) => tokens,
        other => panic!("expected tokens, got {other:?}"),
    }
}

pub fn current_code<B>(service: &TestService<B>, secret: &TfaSecret) -> String
where
    B: TokenBlacklist + Clone,
{
    service
        .orchestrator()
        .tfa_manager()
        .generate_code(secret, Utc::now())
        .expect("Failed to generate code")
}

/// A code that is not valid anywhere near the current time.
pub fn wrong_code<B>(service: &TestService<B>, secret: &TfaSecret) -> String
where
    B: TokenBlacklist + Clone,
{
    let tfa = service.orchestrator().tfa_manager();
    let now = Utc::now();
    let valid: Vec<String> = (-3..=3)
        .map(|step| {
            tfa.generate_code(secret, now + Duration::seconds(30 * step))
                .expect("Failed to generate code")
        })
        .collect();

    (0..)
        .map(|n| format!("{n:06}"))
        .find(|code| !valid.contains(code))
        .expect("ran out of codes")
}
