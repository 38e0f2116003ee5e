use chrono::{DateTime, Utc};
use warden_core::{AuthContext, Token, TokenBlacklist, TokenKind, TokenService};

use crate::error::AuthError;

/// Admits a caller-supplied access token: not revoked, correctly signed,
/// unexpired, of kind `Access` and minted for the request's app.
///
/// `authorize` never admits a TFA-pending token; only finalizing TFA asks
/// for one through [`AccessGuard::check_any`].
#[derive(Clone)]
pub struct AccessGuard<B, T> {
    blacklist: B,
    token_service: T,
}

impl<B, T> AccessGuard<B, T>
where
    B: TokenBlacklist,
    T: TokenService,
{
    pub fn new(blacklist: B, token_service: T) -> Self {
        Self {
            blacklist,
            token_service,
        }
    }

    /// Checks the context's bearer token. A missing token is `InvalidToken`.
    pub async fn authorize(&self, context: &AuthContext) -> Result<Token, AuthError> {
        let signed = context
            .bearer_token
            .as_deref()
            .ok_or(AuthError::InvalidToken)?;
        self.check(context, signed, TokenKind::Access, Utc::now()).await
    }

    /// Blacklist first so a revoked token never gets as far as signature checks.
    /// A failing blacklist read rejects the token.
    pub async fn check(
        &self,
        context: &AuthContext,
        signed: &str,
        expected: TokenKind,
        now: DateTime<Utc>,
    ) -> Result<Token, AuthError> {
        self.check_any(context, signed, &[expected], now).await
    }

    /// Same as [`AccessGuard::check`], admitting any of the `expected` kinds.
    pub async fn check_any(
        &self,
        context: &AuthContext,
        signed: &str,
        expected: &[TokenKind],
        now: DateTime<Utc>,
    ) -> Result<Token, AuthError> {
        if self.blacklist.contains(signed).await? {
            return Err(AuthError::RevokedToken);
        }

        let token = self.token_service.validate_at(signed, now)?;
        if !expected.contains(&token.kind) || token.app_id != context.app.id {
            return Err(AuthError::InvalidToken);
        }

        Ok(token)
    }
}
