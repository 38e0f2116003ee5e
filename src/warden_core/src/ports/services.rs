use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::domain::{
    app::{App, TfaType},
    scope::Scope,
    tfa::TfaSecret,
    token::{IssuedToken, Token, TokenKind},
    user::{User, UserId},
};

#[derive(Debug, Error, PartialEq)]
pub enum TokenError {
    #[error("Unable to sign token: {0}")]
    Signing(String),
    #[error("Malformed token")]
    Malformed,
    #[error("Token has expired")]
    Expired,
}

/// Mints and verifies signed tokens.
///
/// Signature verification and revocation are separate concerns: nothing here
/// consults the blacklist.
pub trait TokenService: Send + Sync {
    /// Embeds subject, app, scopes (access tokens only), issued-at and a
    /// kind-specific expiry.
    fn issue_at(
        &self,
        subject: &UserId,
        app: &App,
        scopes: &[Scope],
        kind: TokenKind,
        now: DateTime<Utc>,
    ) -> Result<IssuedToken, TokenError>;

    /// Verifies the signature and that `now` is before the expiry.
    fn validate_at(&self, signed: &str, now: DateTime<Utc>) -> Result<Token, TokenError>;

    /// Extracts the subject of a token whose expiry is irrelevant to the caller.
    /// Untrusted input yields `Malformed`, never a panic.
    fn subject_of(&self, signed: &str) -> Result<UserId, TokenError>;

    fn issue(
        &self,
        subject: &UserId,
        app: &App,
        scopes: &[Scope],
        kind: TokenKind,
    ) -> Result<IssuedToken, TokenError> {
        self.issue_at(subject, app, scopes, kind, Utc::now())
    }

    fn validate(&self, signed: &str) -> Result<Token, TokenError> {
        self.validate_at(signed, Utc::now())
    }
}

#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("Delivering TFA secrets via {0} is not implemented")]
    NotImplemented(TfaType),
    #[error("Failed to deliver TFA secret: {0}")]
    Failed(String),
}

/// Hands a freshly generated TFA secret to the user over an out-of-band channel.
#[async_trait]
pub trait SecretDelivery: Send + Sync {
    async fn deliver_secret(
        &self,
        channel: TfaType,
        user: &dyn User,
        secret: &TfaSecret,
    ) -> Result<(), DeliveryError>;
}
