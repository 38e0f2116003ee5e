use warden_core::{
    AuthContext, SecretDelivery, TfaStatus, TokenBlacklist, TokenService, UserStorage,
};

use super::{SecretHandoff, hand_off_secret};
use crate::{
    error::AuthError,
    services::{AccessGuard, TfaManager},
};

/// Opt-in TFA enrollment for apps where the second factor is optional
pub struct EnableTfaUseCase<U, B, T, D>
where
    U: UserStorage,
    B: TokenBlacklist,
    T: TokenService,
    D: SecretDelivery,
{
    user_store: U,
    guard: AccessGuard<B, T>,
    tfa: TfaManager<U>,
    delivery: D,
}

impl<U, B, T, D> EnableTfaUseCase<U, B, T, D>
where
    U: UserStorage,
    B: TokenBlacklist,
    T: TokenService,
    D: SecretDelivery,
{
    pub fn new(user_store: U, guard: AccessGuard<B, T>, tfa: TfaManager<U>, delivery: D) -> Self {
        Self {
            user_store,
            guard,
            tfa,
            delivery,
        }
    }

    /// The secret is persisted before it is handed off, so a failing delivery
    /// channel still leaves TFA enabled.
    #[tracing::instrument(name = "EnableTfaUseCase::execute", skip_all, fields(app = %context.app.id))]
    pub async fn execute(&self, context: &AuthContext) -> Result<SecretHandoff, AuthError> {
        let app = &context.app;
        if app.tfa_status != TfaStatus::Optional {
            return Err(AuthError::TfaNotApplicable(app.tfa_status));
        }

        let token = self.guard.authorize(context).await?;
        let user = self.user_store.user_by_id(&token.subject).await?;

        let (user, secret) = self.tfa.enable(user, app).await?;
        tracing::info!(user_id = %token.subject, channel = %app.tfa_type, "TFA enabled");

        hand_off_secret(&self.tfa, &self.delivery, app, &user, secret).await
    }
}
