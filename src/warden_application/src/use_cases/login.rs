use warden_core::{
    App, Password, Scope, SecretDelivery, TfaStatus, TokenKind, TokenService, User, UserStorage,
    UserStoreError,
};

use super::{AuthTokens, SecretHandoff, hand_off_secret, issue_tokens, record_login};
use crate::{
    error::AuthError,
    services::{ScopeNegotiator, TfaManager, generate_secret},
};

#[derive(Debug)]
pub struct LoginRequest {
    pub username: String,
    pub password: Password,
    pub scopes: Vec<Scope>,
}

/// Response from login use case
#[derive(Debug)]
pub enum LoginResponse {
    /// Credentials accepted and no second factor needed
    Success(AuthTokens),
    /// A second factor is needed. The token is of kind `TfaPending`, carries
    /// no scopes and is only good for finalizing TFA. `enrollment` is set when
    /// login just enrolled the user because the app makes TFA mandatory.
    TfaRequired {
        access_token: String,
        enrollment: Option<SecretHandoff>,
    },
}

/// Login use case - password authentication followed by TFA gating
pub struct LoginUseCase<U, T, D>
where
    U: UserStorage,
    T: TokenService,
    D: SecretDelivery,
{
    user_store: U,
    token_service: T,
    negotiator: ScopeNegotiator<U>,
    tfa: TfaManager<U>,
    delivery: D,
}

impl<U, T, D> LoginUseCase<U, T, D>
where
    U: UserStorage + Clone,
    T: TokenService,
    D: SecretDelivery,
{
    pub fn new(user_store: U, token_service: T, tfa: TfaManager<U>, delivery: D) -> Self {
        Self {
            negotiator: ScopeNegotiator::new(user_store.clone()),
            user_store,
            token_service,
            tfa,
            delivery,
        }
    }

    /// Execute the login use case
    ///
    /// Unknown user and wrong password are both `InvalidCredentials`.
    #[tracing::instrument(name = "LoginUseCase::execute", skip_all, fields(username = %request.username, app = %app.id))]
    pub async fn execute(&self, app: &App, request: LoginRequest) -> Result<LoginResponse, AuthError> {
        let user = self
            .user_store
            .user_by_name_password(&request.username, &request.password)
            .await
            .map_err(|e| match e {
                UserStoreError::UnexpectedError(e) => AuthError::Storage(e),
                _ => AuthError::InvalidCredentials,
            })?;

        if app.tfa_status != TfaStatus::Disabled {
            if user.tfa_info().is_active() {
                return self.pending(app, &user, None);
            }
            if app.tfa_status == TfaStatus::Mandatory {
                return self.enroll(app, user).await;
            }
        }

        let granted = self.negotiator.negotiate(&user, app, &request.scopes).await?;
        let tokens = issue_tokens(&self.token_service, user.id(), app, &granted)?;
        record_login(&self.user_store, user.id()).await;

        Ok(LoginResponse::Success(tokens))
    }

    /// Hands the secret off before storing it. A failed delivery leaves the
    /// user unenrolled, and the next login starts over with a fresh secret.
    async fn enroll(&self, app: &App, user: U::User) -> Result<LoginResponse, AuthError> {
        let secret = generate_secret();
        let handoff = hand_off_secret(&self.tfa, &self.delivery, app, &user, secret.clone()).await?;

        let (user, _) = self.tfa.enroll_with(user, secret).await?;
        tracing::info!(user_id = %user.id(), "Enrolled user in mandatory TFA");

        self.pending(app, &user, Some(handoff))
    }

    fn pending(
        &self,
        app: &App,
        user: &U::User,
        enrollment: Option<SecretHandoff>,
    ) -> Result<LoginResponse, AuthError> {
        let issued = self
            .token_service
            .issue(user.id(), app, &[], TokenKind::TfaPending)?;

        Ok(LoginResponse::TfaRequired {
            access_token: issued.signed,
            enrollment,
        })
    }
}
