use chrono::{DateTime, Utc};
use warden_core::{AuthContext, TfaStatus, TokenBlacklist, TokenService, User, UserStorage};

use crate::{
    error::AuthError,
    services::{AccessGuard, TfaManager},
};

/// Turns TFA off again. Proving possession of the current code is required.
pub struct DisableTfaUseCase<U, B, T>
where
    U: UserStorage,
    B: TokenBlacklist,
    T: TokenService,
{
    user_store: U,
    guard: AccessGuard<B, T>,
    tfa: TfaManager<U>,
}

impl<U, B, T> DisableTfaUseCase<U, B, T>
where
    U: UserStorage,
    B: TokenBlacklist,
    T: TokenService,
{
    pub fn new(user_store: U, guard: AccessGuard<B, T>, tfa: TfaManager<U>) -> Self {
        Self {
            user_store,
            guard,
            tfa,
        }
    }

    pub async fn execute(&self, context: &AuthContext, code: &str) -> Result<(), AuthError> {
        self.execute_at(context, code, Utc::now()).await
    }

    #[tracing::instrument(name = "DisableTfaUseCase::execute", skip(self, context, code), fields(app = %context.app.id))]
    pub async fn execute_at(
        &self,
        context: &AuthContext,
        code: &str,
        now: DateTime<Utc>,
    ) -> Result<(), AuthError> {
        if context.app.tfa_status == TfaStatus::Mandatory {
            return Err(AuthError::TfaNotApplicable(TfaStatus::Mandatory));
        }

        let token = self.guard.authorize(context).await?;
        let user = self.user_store.user_by_id(&token.subject).await?;

        if !user.tfa_info().is_enabled {
            return Err(AuthError::TfaNotEnabled);
        }
        if !self.tfa.verify(&user, code, now)? {
            return Err(AuthError::InvalidTfaCode);
        }

        self.tfa.disable(user).await?;
        tracing::info!(user_id = %token.subject, "TFA disabled");

        Ok(())
    }
}
