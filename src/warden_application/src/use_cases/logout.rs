use warden_core::{AuthContext, TokenBlacklist, TokenService};

use super::revoke_best_effort;
use crate::error::AuthError;

/// Logout use case - revokes the caller's tokens
pub struct LogoutUseCase<B, T>
where
    B: TokenBlacklist,
    T: TokenService,
{
    blacklist: B,
    token_service: T,
}

impl<B, T> LogoutUseCase<B, T>
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

    /// Blacklists the access token and, if given, the refresh token.
    ///
    /// Both tokens only need a valid signature, so logging out with an
    /// expired token is allowed. The refresh token must belong to the same
    /// user; nothing is revoked otherwise. Blacklist failures are logged, and
    /// the return value counts the tokens actually revoked.
    #[tracing::instrument(name = "LogoutUseCase::execute", skip_all, fields(app = %context.app.id))]
    pub async fn execute(
        &self,
        context: &AuthContext,
        refresh_token: Option<&str>,
    ) -> Result<usize, AuthError> {
        let access_token = context
            .bearer_token
            .as_deref()
            .ok_or(AuthError::InvalidToken)?;
        let subject = self.token_service.subject_of(access_token)?;
        if let Some(refresh_token) = refresh_token {
            if self.token_service.subject_of(refresh_token)? != subject {
                tracing::warn!(user_id = %subject, "Refresh token belongs to another user");
                return Err(AuthError::InvalidToken);
            }
        }

        let mut revoked = 0;
        for token in std::iter::once(access_token).chain(refresh_token) {
            if revoke_best_effort(&self.blacklist, token).await {
                revoked += 1;
            }
        }

        tracing::debug!(user_id = %subject, revoked, "Logged out");
        Ok(revoked)
    }
}
