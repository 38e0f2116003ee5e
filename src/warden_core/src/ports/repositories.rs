use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{
    email::Email,
    password::Password,
    scope::Scope,
    user::{User, UserId},
};

// UserStorage port trait and errors
#[derive(Debug, Error)]
pub enum UserStoreError {
    #[error("User already exists")]
    UserAlreadyExists,
    #[error("User not found")]
    UserNotFound,
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("Requested scopes are forbidden")]
    ScopesForbidden,
    #[error("Unexpected error {0}")]
    UnexpectedError(String),
}

impl PartialEq for UserStoreError {
    fn eq(&self, other: &Self) -> bool {
        matches!(
            (self, other),
            (Self::UserAlreadyExists, Self::UserAlreadyExists)
                | (Self::UserNotFound, Self::UserNotFound)
                | (Self::InvalidCredentials, Self::InvalidCredentials)
                | (Self::ScopesForbidden, Self::ScopesForbidden)
                | (Self::UnexpectedError(_), Self::UnexpectedError(_))
        )
    }
}

/// Lookup, update and credential checks over user records.
///
/// Every call is treated as a possibly remote, possibly failing operation.
/// Implementations own password hashing; hashes never cross this boundary.
#[async_trait]
pub trait UserStorage: Send + Sync {
    type User: User + Clone + 'static;

    async fn user_by_id(&self, id: &UserId) -> Result<Self::User, UserStoreError>;

    /// Fails with `InvalidCredentials` for both an unknown name and a wrong password.
    async fn user_by_name_password(
        &self,
        name: &str,
        password: &Password,
    ) -> Result<Self::User, UserStoreError>;

    async fn user_by_email(&self, email: &Email) -> Result<Self::User, UserStoreError>;

    async fn user_exists(&self, name: &str) -> Result<bool, UserStoreError>;

    async fn update_user(
        &self,
        id: &UserId,
        user: Self::User,
    ) -> Result<Self::User, UserStoreError>;

    async fn reset_password(
        &self,
        id: &UserId,
        new_password: &Password,
    ) -> Result<(), UserStoreError>;

    /// Returns the subset of `requested` the user may hold.
    async fn request_scopes(
        &self,
        id: &UserId,
        requested: &[Scope],
    ) -> Result<Vec<Scope>, UserStoreError>;

    async fn update_login_metadata(&self, id: &UserId) -> Result<(), UserStoreError>;

    async fn attach_device_token(&self, id: &UserId, token: &str) -> Result<(), UserStoreError>;
}

// TokenBlacklist port trait and errors
#[derive(Debug, Error)]
pub enum TokenBlacklistError {
    #[error("Database error: {0}")]
    DatabaseError(String),
}

/// Revocation set of signed tokens, consulted before trusting any token.
#[async_trait]
pub trait TokenBlacklist: Send + Sync {
    /// Adding a token that is already blacklisted is not an error.
    async fn add(&self, token: &str) -> Result<(), TokenBlacklistError>;
    async fn contains(&self, token: &str) -> Result<bool, TokenBlacklistError>;
}
