use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::scope::Scope;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AppId(String);

impl AppId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AppId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Whether an app requires, allows or forbids a second factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TfaStatus {
    Mandatory,
    Optional,
    Disabled,
}

impl fmt::Display for TfaStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = match self {
            TfaStatus::Mandatory => "mandatory",
            TfaStatus::Optional => "optional",
            TfaStatus::Disabled => "disabled",
        };
        f.write_str(status)
    }
}

/// Channel through which a freshly generated TFA secret reaches the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TfaType {
    App,
    Sms,
    Email,
}

impl fmt::Display for TfaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self {
            TfaType::App => "app",
            TfaType::Sms => "sms",
            TfaType::Email => "email",
        };
        f.write_str(kind)
    }
}

/// A registered client application, resolved by the transport layer and
/// immutable for the duration of a request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct App {
    pub id: AppId,
    pub tfa_status: TfaStatus,
    pub tfa_type: TfaType,
    #[serde(default)]
    pub scopes: BTreeSet<Scope>,
}

impl App {
    pub fn new(id: impl Into<String>, tfa_status: TfaStatus, tfa_type: TfaType) -> Self {
        Self {
            id: AppId::new(id),
            tfa_status,
            tfa_type,
            scopes: BTreeSet::new(),
        }
    }

    pub fn with_scopes<I, S>(mut self, scopes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Scope>,
    {
        self.scopes = scopes.into_iter().map(Into::into).collect();
        self
    }
}
