use warden_core::{AuthContext, TokenBlacklist, TokenService, UserStorage};

use crate::{error::AuthError, services::AccessGuard};

/// Registers a push-notification device token for the signed-in user.
pub struct AttachDeviceTokenUseCase<U, B, T>
where
    U: UserStorage,
    B: TokenBlacklist,
    T: TokenService,
{
    user_store: U,
    guard: AccessGuard<B, T>,
}

impl<U, B, T> AttachDeviceTokenUseCase<U, B, T>
where
    U: UserStorage,
    B: TokenBlacklist,
    T: TokenService,
{
    pub fn new(user_store: U, guard: AccessGuard<B, T>) -> Self {
        Self { user_store, guard }
    }

    #[tracing::instrument(name = "AttachDeviceTokenUseCase::execute", skip_all, fields(app = %context.app.id))]
    pub async fn execute(&self, context: &AuthContext, device_token: &str) -> Result<(), AuthError> {
        let device_token = device_token.trim();
        if device_token.is_empty() {
            return Err(AuthError::InvalidInput("device token is required".to_string()));
        }

        let token = self.guard.authorize(context).await?;
        self.user_store
            .attach_device_token(&token.subject, device_token)
            .await?;

        Ok(())
    }
}
