use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Scope that authorizes refresh-token issuance.
pub const OFFLINE_SCOPE: &str = "offline";

/// Opaque name of a capability carried by a token.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Scope(String);

impl Scope {
    pub fn new(scope: impl Into<String>) -> Self {
        Self(scope.into())
    }

    pub fn offline() -> Self {
        Self(OFFLINE_SCOPE.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_offline(&self) -> bool {
        self.0 == OFFLINE_SCOPE
    }
}

impl From<&str> for Scope {
    fn from(scope: &str) -> Self {
        Self(scope.to_string())
    }
}

impl From<String> for Scope {
    fn from(scope: String) -> Self {
        Self(scope)
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("requested scopes are forbidden")]
pub struct ScopesForbidden;

/// Grants `requested ∩ user_allowed ∩ app_allowed`.
///
/// An empty request yields an empty grant. A non-empty request whose
/// intersection is empty is rejected rather than silently granting nothing.
pub fn intersect_scopes<'a>(
    requested: impl IntoIterator<Item = &'a Scope>,
    user_allowed: &BTreeSet<Scope>,
    app_allowed: &BTreeSet<Scope>,
) -> Result<BTreeSet<Scope>, ScopesForbidden> {
    let requested: BTreeSet<&Scope> = requested.into_iter().collect();
    if requested.is_empty() {
        return Ok(BTreeSet::new());
    }

    let granted: BTreeSet<Scope> = requested
        .into_iter()
        .filter(|scope| user_allowed.contains(*scope) && app_allowed.contains(*scope))
        .cloned()
        .collect();

    if granted.is_empty() {
        return Err(ScopesForbidden);
    }

    Ok(granted)
}
