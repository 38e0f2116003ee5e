pub mod domain;
pub mod ports;

// Re-export commonly used types for convenience
pub use domain::{
    app::{App, AppId, TfaStatus, TfaType},
    context::AuthContext,
    email::Email,
    password::{Password, PasswordPolicy},
    scope::{OFFLINE_SCOPE, Scope, ScopesForbidden, intersect_scopes},
    tfa::{TfaInfo, TfaSecret, TfaSettings},
    token::{BlacklistEntry, IssuedToken, Token, TokenKind},
    user::{BasicUser, Profile, User, UserError, UserId},
};

pub use ports::{
    repositories::{TokenBlacklist, TokenBlacklistError, UserStorage, UserStoreError},
    services::{DeliveryError, SecretDelivery, TokenError, TokenService},
};
