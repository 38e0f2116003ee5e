use std::collections::BTreeSet;

use warden_core::{App, Scope, User, UserStorage, UserStoreError, intersect_scopes};

#[derive(Debug, thiserror::Error)]
pub enum NegotiationError {
    #[error("Requested scopes are forbidden")]
    Forbidden,
    #[error("User store error: {0}")]
    UserStoreError(UserStoreError),
}

impl From<UserStoreError> for NegotiationError {
    fn from(error: UserStoreError) -> Self {
        match error {
            UserStoreError::ScopesForbidden => NegotiationError::Forbidden,
            other => NegotiationError::UserStoreError(other),
        }
    }
}

/// Narrows a client's requested scopes to what both the user and the app allow.
#[derive(Clone)]
pub struct ScopeNegotiator<U> {
    user_store: U,
}

impl<U> ScopeNegotiator<U>
where
    U: UserStorage,
{
    pub fn new(user_store: U) -> Self {
        Self { user_store }
    }

    /// Grants `requested ∩ user ∩ app`. The user's share is decided by the
    /// store; an empty request never reaches it.
    pub async fn negotiate(
        &self,
        user: &impl User,
        app: &App,
        requested: &[Scope],
    ) -> Result<Vec<Scope>, NegotiationError> {
        if requested.is_empty() {
            return Ok(Vec::new());
        }

        let user_allowed: BTreeSet<Scope> = self
            .user_store
            .request_scopes(user.id(), requested)
            .await?
            .into_iter()
            .collect();

        let granted = intersect_scopes(requested, &user_allowed, &app.scopes)
            .map_err(|_| NegotiationError::Forbidden)?;

        Ok(granted.into_iter().collect())
    }
}
