use warden_core::{
    DeliveryError, TfaStatus, TfaType, TokenBlacklistError, TokenError, UserError,
    UserStoreError,
};

use crate::services::{scope_negotiator::NegotiationError, tfa_manager::TfaError};

/// Caller-facing error of every orchestrated flow.
///
/// Credential and TFA failures share one message so callers cannot tell which
/// check failed. Input problems on the caller's own account are specific.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("not authorized")]
    InvalidCredentials,
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("requested scopes are forbidden")]
    ScopesForbidden,
    #[error("TFA is already enabled for this user")]
    TfaAlreadyEnabled,
    #[error("TFA is not enabled for this user")]
    TfaNotEnabled,
    #[error("app TFA status is '{0}', not 'optional'")]
    TfaNotApplicable(TfaStatus),
    #[error("not authorized")]
    InvalidTfaCode,
    #[error("new password is not strong enough: {0}")]
    WeakPassword(String),
    #[error("username is occupied, try to choose another one")]
    UsernameTaken,
    #[error("email is occupied, try to choose another one")]
    EmailTaken,
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("token cannot be used for this request")]
    InvalidToken,
    #[error("token has been revoked")]
    RevokedToken,
    #[error("malformed token")]
    MalformedToken,
    #[error("token has expired")]
    ExpiredToken,
    #[error("unable to sign token: {0}")]
    SigningError(String),
    #[error("delivering TFA secrets via {0} is not implemented")]
    NotImplemented(TfaType),
    #[error("delivery error: {0}")]
    Delivery(String),
    #[error("storage error: {0}")]
    Storage(String),
}

impl AuthError {
    /// Stable machine-readable code for the transport layer.
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::InvalidCredentials => "invalid_credentials",
            AuthError::NotFound(_) => "not_found",
            AuthError::ScopesForbidden => "scopes_forbidden",
            AuthError::TfaAlreadyEnabled => "tfa_already_enabled",
            AuthError::TfaNotEnabled => "tfa_not_enabled",
            AuthError::TfaNotApplicable(_) => "tfa_not_applicable",
            AuthError::InvalidTfaCode => "invalid_tfa_code",
            AuthError::WeakPassword(_) => "weak_password",
            AuthError::UsernameTaken => "username_taken",
            AuthError::EmailTaken => "email_taken",
            AuthError::InvalidInput(_) => "invalid_input",
            AuthError::InvalidToken => "invalid_token",
            AuthError::RevokedToken => "revoked_token",
            AuthError::MalformedToken => "malformed_token",
            AuthError::ExpiredToken => "expired_token",
            AuthError::SigningError(_) => "signing_error",
            AuthError::NotImplemented(_) => "not_implemented",
            AuthError::Delivery(_) => "delivery_error",
            AuthError::Storage(_) => "storage_error",
        }
    }

    /// Infrastructure failures, as opposed to rejected input.
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            AuthError::SigningError(_) | AuthError::Delivery(_) | AuthError::Storage(_)
        )
    }
}

impl From<UserStoreError> for AuthError {
    fn from(error: UserStoreError) -> Self {
        match error {
            UserStoreError::UserAlreadyExists => AuthError::UsernameTaken,
            UserStoreError::UserNotFound => AuthError::NotFound("user"),
            UserStoreError::InvalidCredentials => AuthError::InvalidCredentials,
            UserStoreError::ScopesForbidden => AuthError::ScopesForbidden,
            UserStoreError::UnexpectedError(e) => AuthError::Storage(e),
        }
    }
}

impl From<TokenBlacklistError> for AuthError {
    fn from(error: TokenBlacklistError) -> Self {
        AuthError::Storage(error.to_string())
    }
}

impl From<TokenError> for AuthError {
    fn from(error: TokenError) -> Self {
        match error {
            TokenError::Signing(e) => AuthError::SigningError(e),
            TokenError::Malformed => AuthError::MalformedToken,
            TokenError::Expired => AuthError::ExpiredToken,
        }
    }
}

impl From<DeliveryError> for AuthError {
    fn from(error: DeliveryError) -> Self {
        match error {
            DeliveryError::NotImplemented(channel) => AuthError::NotImplemented(channel),
            DeliveryError::Failed(e) => AuthError::Delivery(e),
        }
    }
}

impl From<UserError> for AuthError {
    fn from(error: UserError) -> Self {
        match error {
            UserError::WeakPassword(reason) => AuthError::WeakPassword(reason),
            other => AuthError::InvalidInput(other.to_string()),
        }
    }
}

impl From<TfaError> for AuthError {
    fn from(error: TfaError) -> Self {
        match error {
            TfaError::AlreadyEnabled => AuthError::TfaAlreadyEnabled,
            TfaError::NotEnabled => AuthError::TfaNotEnabled,
            TfaError::NotApplicable(status) => AuthError::TfaNotApplicable(status),
            TfaError::InvalidSecret(e) => AuthError::Storage(format!("stored TFA secret: {e}")),
            TfaError::UserStoreError(e) => e.into(),
        }
    }
}

impl From<NegotiationError> for AuthError {
    fn from(error: NegotiationError) -> Self {
        match error {
            NegotiationError::Forbidden => AuthError::ScopesForbidden,
            NegotiationError::UserStoreError(e) => e.into(),
        }
    }
}
