use chrono::{DateTime, Utc};
use warden_core::{
    AuthContext, Scope, TokenBlacklist, TokenKind, TokenService, UserStorage,
};

use super::{AuthTokens, issue_tokens, record_login, revoke_best_effort};
use crate::{
    error::AuthError,
    services::{AccessGuard, ScopeNegotiator, TfaManager},
};

/// Trades the TFA-pending token from login, or an access token from before
/// TFA was enabled, plus a valid code for a full token pair.
///
/// Attempts are evaluated independently; no retry counter is kept.
pub struct FinalizeTfaUseCase<U, B, T>
where
    U: UserStorage,
    B: TokenBlacklist,
    T: TokenService,
{
    user_store: U,
    blacklist: B,
    token_service: T,
    guard: AccessGuard<B, T>,
    negotiator: ScopeNegotiator<U>,
    tfa: TfaManager<U>,
}

impl<U, B, T> FinalizeTfaUseCase<U, B, T>
where
    U: UserStorage + Clone,
    B: TokenBlacklist + Clone,
    T: TokenService + Clone,
{
    pub fn new(user_store: U, blacklist: B, token_service: T, tfa: TfaManager<U>) -> Self {
        Self {
            guard: AccessGuard::new(blacklist.clone(), token_service.clone()),
            negotiator: ScopeNegotiator::new(user_store.clone()),
            user_store,
            blacklist,
            token_service,
            tfa,
        }
    }

    pub async fn execute(
        &self,
        context: &AuthContext,
        code: &str,
        requested: &[Scope],
    ) -> Result<AuthTokens, AuthError> {
        self.execute_at(context, code, requested, Utc::now()).await
    }

    #[tracing::instrument(name = "FinalizeTfaUseCase::execute", skip(self, context, code), fields(app = %context.app.id))]
    pub async fn execute_at(
        &self,
        context: &AuthContext,
        code: &str,
        requested: &[Scope],
        now: DateTime<Utc>,
    ) -> Result<AuthTokens, AuthError> {
        if code.trim().is_empty() {
            return Err(AuthError::InvalidInput("TFA code is required".to_string()));
        }
        let old_token = context
            .bearer_token
            .as_deref()
            .ok_or(AuthError::InvalidToken)?;

        let token = self
            .guard
            .check_any(
                context,
                old_token,
                &[TokenKind::TfaPending, TokenKind::Access],
                now,
            )
            .await?;
        let user = self.user_store.user_by_id(&token.subject).await?;

        if !self.tfa.verify(&user, code, now)? {
            tracing::info!(user_id = %token.subject, "Rejected TFA code");
            return Err(AuthError::InvalidTfaCode);
        }

        let granted = self.negotiator.negotiate(&user, &context.app, requested).await?;
        let tokens = issue_tokens(&self.token_service, &token.subject, &context.app, &granted)?;

        revoke_best_effort(&self.blacklist, old_token).await;
        record_login(&self.user_store, &token.subject).await;

        Ok(tokens)
    }
}
