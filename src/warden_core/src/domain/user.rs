use std::collections::{BTreeSet, HashMap};
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::domain::{scope::Scope, tfa::TfaInfo};

/// Free-form profile attributes a storage backend attaches to a user.
pub type Profile = HashMap<String, serde_json::Value>;

#[derive(Debug, Error, PartialEq)]
pub enum UserError {
    #[error("Email is not valid")]
    InvalidEmail,
    #[error("Password must not be empty")]
    EmptyPassword,
    #[error("Password is not strong enough: {0}")]
    WeakPassword(String),
}

/// Immutable identifier of a user record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Capability set the auth layer needs from a user record.
///
/// Any storage backend can supply its own user shape as long as it exposes
/// these accessors. The password hash is deliberately absent: it never leaves
/// the [`UserStorage`](crate::UserStorage) implementation.
pub trait User: Send + Sync {
    fn id(&self) -> &UserId;
    fn name(&self) -> &str;
    fn email(&self) -> &str;
    fn tfa_info(&self) -> &TfaInfo;
    fn profile(&self) -> &Profile;

    fn set_name(&mut self, name: String);
    fn set_email(&mut self, email: String);
    fn set_tfa_info(&mut self, tfa_info: TfaInfo);
}

/// Struct-backed [`User`] used by the in-memory store and in tests.
#[derive(Debug, Clone)]
pub struct BasicUser {
    id: UserId,
    name: String,
    email: String,
    tfa_info: TfaInfo,
    profile: Profile,
    scopes: BTreeSet<Scope>,
}

impl BasicUser {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: UserId::generate(),
            name: name.into(),
            email: email.into(),
            tfa_info: TfaInfo::default(),
            profile: Profile::new(),
            scopes: BTreeSet::new(),
        }
    }

    pub fn with_id(mut self, id: UserId) -> Self {
        self.id = id;
        self
    }

    pub fn with_scopes<I, S>(mut self, scopes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Scope>,
    {
        self.scopes = scopes.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_profile_value(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.profile.insert(key.into(), value);
        self
    }

    pub fn with_tfa_info(mut self, tfa_info: TfaInfo) -> Self {
        self.tfa_info = tfa_info;
        self
    }

    /// Scopes this user may be granted.
    pub fn scopes(&self) -> &BTreeSet<Scope> {
        &self.scopes
    }
}

impl User for BasicUser {
    fn id(&self) -> &UserId {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn email(&self) -> &str {
        &self.email
    }

    fn tfa_info(&self) -> &TfaInfo {
        &self.tfa_info
    }

    fn profile(&self) -> &Profile {
        &self.profile
    }

    fn set_name(&mut self, name: String) {
        self.name = name;
    }

    fn set_email(&mut self, email: String) {
        self.email = email;
    }

    fn set_tfa_info(&mut self, tfa_info: TfaInfo) {
        self.tfa_info = tfa_info;
    }
}
