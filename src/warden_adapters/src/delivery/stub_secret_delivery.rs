use warden_core::{DeliveryError, SecretDelivery, TfaSecret, TfaType, User};

/// Out-of-band delivery with no real channels behind it.
///
/// `App` secrets are shown to the user in the response, so handing one off
/// here only logs. SMS and email fail loudly until a provider is wired in.
#[derive(Debug, Clone, Default)]
pub struct StubSecretDelivery;

impl StubSecretDelivery {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait::async_trait]
impl SecretDelivery for StubSecretDelivery {
    #[tracing::instrument(name = "Deliver TFA secret", skip_all, fields(channel = %channel))]
    async fn deliver_secret(
        &self,
        channel: TfaType,
        user: &dyn User,
        _secret: &TfaSecret,
    ) -> Result<(), DeliveryError> {
        match channel {
            TfaType::App => {
                tracing::debug!(user_id = %user.id(), "TFA secret handed to the app");
                Ok(())
            }
            TfaType::Sms | TfaType::Email => {
                tracing::warn!(user_id = %user.id(), "No delivery provider configured");
                Err(DeliveryError::NotImplemented(channel))
            }
        }
    }
}
