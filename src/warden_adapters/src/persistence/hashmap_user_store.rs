use std::collections::HashMap;
use std::sync::Arc;

use argon2::{
    Algorithm, Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier, Version,
    password_hash::SaltString,
};
use chrono::{DateTime, Utc};
use rand::Rng;
use secrecy::{ExposeSecret, Secret};
use tokio::sync::RwLock;
use warden_core::{
    BasicUser, Email, Password, Scope, User, UserId, UserStorage, UserStoreError,
};

#[derive(Clone)]
struct UserRecord {
    user: BasicUser,
    password_hash: Secret<String>,
    device_tokens: Vec<String>,
    last_login: Option<DateTime<Utc>>,
}

/// In-memory user store. Password hashes are Argon2id and never leave it.
#[derive(Default, Clone)]
pub struct HashMapUserStore {
    users: Arc<RwLock<HashMap<UserId, UserRecord>>>,
}

impl HashMapUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Names are unique across the store.
    pub async fn add_user(&self, user: BasicUser, password: Password) -> Result<(), UserStoreError> {
        if self.user_exists(user.name()).await? {
            return Err(UserStoreError::UserAlreadyExists);
        }
        let password_hash = compute_password_hash(password)
            .await
            .map_err(UserStoreError::UnexpectedError)?;

        let mut users = self.users.write().await;
        if users.values().any(|r| r.user.name() == user.name()) {
            return Err(UserStoreError::UserAlreadyExists);
        }
        users.insert(
            user.id().clone(),
            UserRecord {
                user,
                password_hash,
                device_tokens: Vec::new(),
                last_login: None,
            },
        );
        Ok(())
    }

    pub async fn device_tokens(&self, id: &UserId) -> Result<Vec<String>, UserStoreError> {
        let users = self.users.read().await;
        let record = users.get(id).ok_or(UserStoreError::UserNotFound)?;
        Ok(record.device_tokens.clone())
    }

    pub async fn last_login(&self, id: &UserId) -> Result<Option<DateTime<Utc>>, UserStoreError> {
        let users = self.users.read().await;
        let record = users.get(id).ok_or(UserStoreError::UserNotFound)?;
        Ok(record.last_login)
    }
}

#[async_trait::async_trait]
impl UserStorage for HashMapUserStore {
    type User = BasicUser;

    async fn user_by_id(&self, id: &UserId) -> Result<BasicUser, UserStoreError> {
        let users = self.users.read().await;
        users
            .get(id)
            .map(|r| r.user.clone())
            .ok_or(UserStoreError::UserNotFound)
    }

    async fn user_by_name_password(
        &self,
        name: &str,
        password: &Password,
    ) -> Result<BasicUser, UserStoreError> {
        // The lock is released before hashing.
        let (user, password_hash) = {
            let users = self.users.read().await;
            let record = users
                .values()
                .find(|r| r.user.name() == name)
                .ok_or(UserStoreError::InvalidCredentials)?;
            (record.user.clone(), record.password_hash.clone())
        };

        verify_password_hash(password_hash, password.clone())
            .await
            .map_err(|_| UserStoreError::InvalidCredentials)?;

        Ok(user)
    }

    async fn user_by_email(&self, email: &Email) -> Result<BasicUser, UserStoreError> {
        let users = self.users.read().await;
        users
            .values()
            .find(|r| r.user.email().eq_ignore_ascii_case(email.as_str()))
            .map(|r| r.user.clone())
            .ok_or(UserStoreError::UserNotFound)
    }

    async fn user_exists(&self, name: &str) -> Result<bool, UserStoreError> {
        let users = self.users.read().await;
        Ok(users.values().any(|r| r.user.name() == name))
    }

    async fn update_user(&self, id: &UserId, user: BasicUser) -> Result<BasicUser, UserStoreError> {
        if user.id() != id {
            return Err(UserStoreError::UnexpectedError(
                "user id cannot be changed".to_string(),
            ));
        }

        let mut users = self.users.write().await;
        let record = users.get_mut(id).ok_or(UserStoreError::UserNotFound)?;
        record.user = user.clone();
        Ok(user)
    }

    async fn reset_password(&self, id: &UserId, new_password: &Password) -> Result<(), UserStoreError> {
        let password_hash = compute_password_hash(new_password.clone())
            .await
            .map_err(UserStoreError::UnexpectedError)?;

        let mut users = self.users.write().await;
        let record = users.get_mut(id).ok_or(UserStoreError::UserNotFound)?;
        record.password_hash = password_hash;
        Ok(())
    }

    async fn request_scopes(&self, id: &UserId, requested: &[Scope]) -> Result<Vec<Scope>, UserStoreError> {
        let users = self.users.read().await;
        let record = users.get(id).ok_or(UserStoreError::UserNotFound)?;

        let granted: Vec<Scope> = requested
            .iter()
            .filter(|scope| record.user.scopes().contains(*scope))
            .cloned()
            .collect();

        if granted.is_empty() && !requested.is_empty() {
            return Err(UserStoreError::ScopesForbidden);
        }
        Ok(granted)
    }

    async fn update_login_metadata(&self, id: &UserId) -> Result<(), UserStoreError> {
        let mut users = self.users.write().await;
        let record = users.get_mut(id).ok_or(UserStoreError::UserNotFound)?;
        record.last_login = Some(Utc::now());
        Ok(())
    }

    async fn attach_device_token(&self, id: &UserId, token: &str) -> Result<(), UserStoreError> {
        let mut users = self.users.write().await;
        let record = users.get_mut(id).ok_or(UserStoreError::UserNotFound)?;
        if !record.device_tokens.iter().any(|t| t == token) {
            record.device_tokens.push(token.to_string());
        }
        Ok(())
    }
}

fn hasher() -> Result<Argon2<'static>, String> {
    Ok(Argon2::new(
        Algorithm::Argon2id,
        Version::V0x13,
        Params::new(15000, 2, 1, None).map_err(|e| e.to_string())?,
    ))
}

#[tracing::instrument(name = "Verify password hash", skip_all)]
async fn verify_password_hash(
    expected_password_hash: Secret<String>,
    password_candidate: Password,
) -> Result<(), String> {
    let current_span: tracing::Span = tracing::Span::current();
    tokio::task::spawn_blocking(move || {
        current_span.in_scope(|| {
            let expected_password_hash = PasswordHash::new(expected_password_hash.expose_secret())
                .map_err(|e| e.to_string())?;

            hasher()?
                .verify_password(
                    password_candidate.expose().as_bytes(),
                    &expected_password_hash,
                )
                .map_err(|e| e.to_string())
        })
    })
    .await
    .map_err(|e| e.to_string())?
}

#[tracing::instrument(name = "Computing password hash", skip_all)]
async fn compute_password_hash(password: Password) -> Result<Secret<String>, String> {
    let current_span: tracing::Span = tracing::Span::current();
    tokio::task::spawn_blocking(move || {
        current_span.in_scope(move || {
            let salt_bytes: [u8; 16] = rand::rng().random();
            let salt = SaltString::encode_b64(&salt_bytes).map_err(|e| e.to_string())?;

            hasher()?
                .hash_password(password.expose().as_bytes(), &salt)
                .map(|h| Secret::new(h.to_string()))
                .map_err(|e| e.to_string())
        })
    })
    .await
    .map_err(|e| e.to_string())?
}
