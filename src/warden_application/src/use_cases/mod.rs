pub mod attach_device_token;
pub mod disable_tfa;
pub mod enable_tfa;
pub mod finalize_tfa;
pub mod login;
pub mod logout;
pub mod refresh_token;
pub mod update_credentials;

use serde::Serialize;
use warden_core::{
    App, Scope, SecretDelivery, TfaSecret, TfaType, TokenBlacklist, TokenKind, TokenService, User,
    UserId, UserStorage,
};

use crate::{error::AuthError, services::TfaManager};

/// Token pair returned by login, finalize-TFA and refresh.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuthTokens {
    pub access_token: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
}

/// How a freshly generated TFA secret reached the user.
#[derive(Debug, Clone)]
pub enum SecretHandoff {
    /// In-app channel: the caller shows the secret, e.g. as a QR code.
    Display {
        secret: TfaSecret,
        provisioning_uri: String,
    },
    /// Sent out of band over the given channel.
    Delivered(TfaType),
}

/// Access token for `scopes`, plus a refresh token iff `offline` was granted.
pub(crate) fn issue_tokens<T: TokenService>(
    token_service: &T,
    subject: &UserId,
    app: &App,
    scopes: &[Scope],
) -> Result<AuthTokens, AuthError> {
    let access = token_service.issue(subject, app, scopes, TokenKind::Access)?;

    let refresh_token = if scopes.iter().any(Scope::is_offline) {
        Some(token_service.issue(subject, app, &[], TokenKind::Refresh)?.signed)
    } else {
        None
    };

    Ok(AuthTokens {
        access_token: access.signed,
        refresh_token,
    })
}

/// Blacklists `token`, logging instead of failing. Returns whether it stuck.
pub(crate) async fn revoke_best_effort<B: TokenBlacklist>(blacklist: &B, token: &str) -> bool {
    match blacklist.add(token).await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to blacklist token");
            false
        }
    }
}

pub(crate) async fn record_login<U: UserStorage>(user_store: &U, id: &UserId) {
    if let Err(e) = user_store.update_login_metadata(id).await {
        tracing::warn!(error = %e, user_id = %id, "Failed to update login metadata");
    }
}

/// Routes the secret through the app's configured channel.
pub(crate) async fn hand_off_secret<U, D>(
    tfa: &TfaManager<U>,
    delivery: &D,
    app: &App,
    user: &U::User,
    secret: TfaSecret,
) -> Result<SecretHandoff, AuthError>
where
    U: UserStorage,
    D: SecretDelivery,
{
    match app.tfa_type {
        TfaType::App => {
            let provisioning_uri = tfa.provisioning_uri(user.name(), &secret)?;
            Ok(SecretHandoff::Display {
                secret,
                provisioning_uri,
            })
        }
        channel => {
            delivery.deliver_secret(channel, user, &secret).await?;
            Ok(SecretHandoff::Delivered(channel))
        }
    }
}
