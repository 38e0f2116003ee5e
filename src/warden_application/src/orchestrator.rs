use warden_core::{
    AuthContext, PasswordPolicy, Scope, SecretDelivery, TfaSettings, TokenBlacklist, TokenService,
    UserStorage,
};

use crate::{
    error::AuthError,
    services::{AccessGuard, TfaManager},
    use_cases::{
        AuthTokens, SecretHandoff,
        attach_device_token::AttachDeviceTokenUseCase,
        disable_tfa::DisableTfaUseCase,
        enable_tfa::EnableTfaUseCase,
        finalize_tfa::FinalizeTfaUseCase,
        login::{LoginRequest, LoginResponse, LoginUseCase},
        logout::LogoutUseCase,
        refresh_token::RefreshTokenUseCase,
        update_credentials::{CredentialsUpdate, CredentialsUpdated, UpdateCredentialsUseCase},
    },
};

/// Entry point a transport layer calls into.
///
/// Holds only cheap handles to the ports and immutable settings. Every flow
/// builds its use case on demand, so the orchestrator can be cloned into as
/// many concurrent request handlers as needed.
#[derive(Clone)]
pub struct AuthOrchestrator<U, B, T, D> {
    user_store: U,
    blacklist: B,
    token_service: T,
    delivery: D,
    tfa_settings: TfaSettings,
    password_policy: PasswordPolicy,
}

impl<U, B, T, D> AuthOrchestrator<U, B, T, D>
where
    U: UserStorage + Clone,
    B: TokenBlacklist + Clone,
    T: TokenService + Clone,
    D: SecretDelivery + Clone,
{
    pub fn new(user_store: U, blacklist: B, token_service: T, delivery: D) -> Self {
        Self {
            user_store,
            blacklist,
            token_service,
            delivery,
            tfa_settings: TfaSettings::default(),
            password_policy: PasswordPolicy::default(),
        }
    }

    pub fn with_tfa_settings(mut self, settings: TfaSettings) -> Self {
        self.tfa_settings = settings;
        self
    }

    pub fn with_password_policy(mut self, policy: PasswordPolicy) -> Self {
        self.password_policy = policy;
        self
    }

    pub fn tfa_manager(&self) -> TfaManager<U> {
        TfaManager::new(self.user_store.clone(), self.tfa_settings.clone())
    }

    fn guard(&self) -> AccessGuard<B, T> {
        AccessGuard::new(self.blacklist.clone(), self.token_service.clone())
    }

    pub async fn login(
        &self,
        context: &AuthContext,
        request: LoginRequest,
    ) -> Result<LoginResponse, AuthError> {
        LoginUseCase::new(
            self.user_store.clone(),
            self.token_service.clone(),
            self.tfa_manager(),
            self.delivery.clone(),
        )
        .execute(&context.app, request)
        .await
    }

    pub async fn enable_tfa(&self, context: &AuthContext) -> Result<SecretHandoff, AuthError> {
        EnableTfaUseCase::new(
            self.user_store.clone(),
            self.guard(),
            self.tfa_manager(),
            self.delivery.clone(),
        )
        .execute(context)
        .await
    }

    pub async fn finalize_tfa(
        &self,
        context: &AuthContext,
        code: &str,
        requested: &[Scope],
    ) -> Result<AuthTokens, AuthError> {
        FinalizeTfaUseCase::new(
            self.user_store.clone(),
            self.blacklist.clone(),
            self.token_service.clone(),
            self.tfa_manager(),
        )
        .execute(context, code, requested)
        .await
    }

    pub async fn disable_tfa(&self, context: &AuthContext, code: &str) -> Result<(), AuthError> {
        DisableTfaUseCase::new(self.user_store.clone(), self.guard(), self.tfa_manager())
            .execute(context, code)
            .await
    }

    pub async fn refresh(
        &self,
        context: &AuthContext,
        refresh_token: &str,
        requested: &[Scope],
    ) -> Result<AuthTokens, AuthError> {
        RefreshTokenUseCase::new(
            self.user_store.clone(),
            self.blacklist.clone(),
            self.token_service.clone(),
        )
        .execute(context, refresh_token, requested)
        .await
    }

    pub async fn logout(
        &self,
        context: &AuthContext,
        refresh_token: Option<&str>,
    ) -> Result<usize, AuthError> {
        LogoutUseCase::new(self.blacklist.clone(), self.token_service.clone())
            .execute(context, refresh_token)
            .await
    }

    pub async fn update_credentials(
        &self,
        context: &AuthContext,
        update: CredentialsUpdate,
    ) -> Result<CredentialsUpdated, AuthError> {
        UpdateCredentialsUseCase::new(
            self.user_store.clone(),
            self.guard(),
            self.password_policy.clone(),
        )
        .execute(context, update)
        .await
    }

    pub async fn attach_device_token(
        &self,
        context: &AuthContext,
        device_token: &str,
    ) -> Result<(), AuthError> {
        AttachDeviceTokenUseCase::new(self.user_store.clone(), self.guard())
            .execute(context, device_token)
            .await
    }
}
