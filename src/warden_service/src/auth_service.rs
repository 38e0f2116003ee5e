use redis::RedisError;
use warden_adapters::{
    AuthServiceSetting, HashMapUserStore, HashSetTokenBlacklist, JwtTokenService,
    RedisTokenBlacklist, StubSecretDelivery,
};
use warden_application::AuthOrchestrator;
use warden_core::{SecretDelivery, TokenBlacklist, TokenError, UserStorage};

use crate::helpers::configure_redis;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("token service error: {0}")]
    Token(#[from] TokenError),
    #[error("redis error: {0}")]
    Redis(#[from] RedisError),
}

pub type InMemoryAuthService =
    AuthService<HashMapUserStore, HashSetTokenBlacklist, StubSecretDelivery>;

/// Authentication core assembled from settings and concrete adapters.
///
/// Stores are cheap to clone and share their state, so callers may keep their
/// own handle to the user store for administration.
#[derive(Clone)]
pub struct AuthService<U, B, D> {
    orchestrator: AuthOrchestrator<U, B, JwtTokenService, D>,
    user_store: U,
    blacklist: B,
}

impl<U, B, D> AuthService<U, B, D>
where
    U: UserStorage + Clone,
    B: TokenBlacklist + Clone,
    D: SecretDelivery + Clone,
{
    pub fn new(
        settings: &AuthServiceSetting,
        user_store: U,
        blacklist: B,
        delivery: D,
    ) -> Result<Self, ServiceError> {
        let token_service = JwtTokenService::new(&settings.jwt)?;

        let orchestrator = AuthOrchestrator::new(
            user_store.clone(),
            blacklist.clone(),
            token_service,
            delivery,
        )
        .with_tfa_settings(settings.tfa.clone())
        .with_password_policy(settings.password.clone());

        tracing::info!(issuer = %settings.jwt.issuer, "Auth service configured");

        Ok(Self {
            orchestrator,
            user_store,
            blacklist,
        })
    }

    pub fn orchestrator(&self) -> &AuthOrchestrator<U, B, JwtTokenService, D> {
        &self.orchestrator
    }

    pub fn user_store(&self) -> &U {
        &self.user_store
    }

    pub fn blacklist(&self) -> &B {
        &self.blacklist
    }
}

impl InMemoryAuthService {
    /// Everything in process memory. State is lost on drop.
    pub fn in_memory(settings: &AuthServiceSetting) -> Result<Self, ServiceError> {
        Self::new(
            settings,
            HashMapUserStore::new(),
            HashSetTokenBlacklist::new(),
            StubSecretDelivery::new(),
        )
    }
}

impl<U> AuthService<U, RedisTokenBlacklist, StubSecretDelivery>
where
    U: UserStorage + Clone,
{
    /// Revocations go to Redis so they are shared between instances.
    pub async fn with_redis(settings: &AuthServiceSetting, user_store: U) -> Result<Self, ServiceError> {
        let conn = configure_redis(&settings.redis).await?;
        let blacklist = RedisTokenBlacklist::new(conn, settings.blacklist_ttl_secs());

        Self::new(settings, user_store, blacklist, StubSecretDelivery::new())
    }
}
