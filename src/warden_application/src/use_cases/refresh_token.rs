use chrono::Utc;
use warden_core::{AuthContext, Scope, TokenBlacklist, TokenKind, TokenService, UserStorage};

use super::{AuthTokens, issue_tokens, revoke_best_effort};
use crate::{
    error::AuthError,
    services::{AccessGuard, ScopeNegotiator},
};

/// Refresh use case - exchanges a refresh token for new tokens
///
/// Scopes are renegotiated on every refresh, so a grant can shrink but never
/// grow past what the user and the app currently allow.
pub struct RefreshTokenUseCase<U, B, T>
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
}

impl<U, B, T> RefreshTokenUseCase<U, B, T>
where
    U: UserStorage + Clone,
    B: TokenBlacklist + Clone,
    T: TokenService + Clone,
{
    pub fn new(user_store: U, blacklist: B, token_service: T) -> Self {
        Self {
            guard: AccessGuard::new(blacklist.clone(), token_service.clone()),
            negotiator: ScopeNegotiator::new(user_store.clone()),
            user_store,
            blacklist,
            token_service,
        }
    }

    #[tracing::instrument(name = "RefreshTokenUseCase::execute", skip(self, context, refresh_token), fields(app = %context.app.id))]
    pub async fn execute(
        &self,
        context: &AuthContext,
        refresh_token: &str,
        requested: &[Scope],
    ) -> Result<AuthTokens, AuthError> {
        let token = self
            .guard
            .check(context, refresh_token, TokenKind::Refresh, Utc::now())
            .await?;
        let user = self.user_store.user_by_id(&token.subject).await?;

        let granted = self.negotiator.negotiate(&user, &context.app, requested).await?;
        let tokens = issue_tokens(&self.token_service, &token.subject, &context.app, &granted)?;

        revoke_best_effort(&self.blacklist, refresh_token).await;

        Ok(tokens)
    }
}
