use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{app::AppId, scope::Scope, user::UserId};

/// Access tokens authorize API calls; refresh tokens only mint new access tokens.
/// A TFA-pending token is what a password alone earns when a second factor is
/// still owed, and it is only good for finalizing TFA.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    Access,
    Refresh,
    TfaPending,
}

impl TokenKind {
    /// Only access tokens carry scopes.
    pub fn carries_scopes(self) -> bool {
        matches!(self, TokenKind::Access)
    }
}

/// Claims of a verified token.
///
/// Validation does not tell kinds apart; callers must check [`Token::kind`]
/// before trusting a token for a given purpose.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// Unique identifier, used for revocation bookkeeping.
    pub id: String,
    pub subject: UserId,
    pub app_id: AppId,
    /// Always empty unless `kind` is `Access`.
    pub scopes: Vec<Scope>,
    pub kind: TokenKind,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Token {
    pub fn has_scope(&self, scope: &str) -> bool {
        self.scopes.iter().any(|s| s.as_str() == scope)
    }
}

/// A freshly signed token together with its decoded claims.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: Token,
    pub signed: String,
}

/// A revoked token and when it was revoked. Written once, never updated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlacklistEntry {
    pub token: String,
    pub blacklisted_at: DateTime<Utc>,
}
