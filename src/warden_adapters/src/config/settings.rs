use config::{Config, ConfigError, Environment, File, FileFormat};
use secrecy::Secret;
use serde::Deserialize;
use warden_core::{PasswordPolicy, TfaSettings};

use crate::config::constants::{defaults, env};

#[derive(Debug, Clone, Deserialize)]
pub struct AuthServiceSetting {
    pub jwt: JwtSettings,
    #[serde(default)]
    pub tfa: TfaSettings,
    #[serde(default)]
    pub password: PasswordPolicy,
    #[serde(default)]
    pub redis: RedisSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JwtSettings {
    #[serde(default = "default_issuer")]
    pub issuer: String,
    /// HMAC signing key.
    pub secret: Secret<String>,
    #[serde(default = "default_access_ttl")]
    pub access_token_ttl_secs: i64,
    #[serde(default = "default_refresh_ttl")]
    pub refresh_token_ttl_secs: i64,
}

impl JwtSettings {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            issuer: default_issuer(),
            secret: Secret::new(secret.into()),
            access_token_ttl_secs: default_access_ttl(),
            refresh_token_ttl_secs: default_refresh_ttl(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RedisSettings {
    #[serde(default = "default_redis_host")]
    pub host_name: String,
    /// Defaults to the refresh token lifetime, the longest a revoked token
    /// could still verify.
    pub blacklist_ttl_secs: Option<u64>,
}

impl Default for RedisSettings {
    fn default() -> Self {
        Self {
            host_name: default_redis_host(),
            blacklist_ttl_secs: None,
        }
    }
}

impl AuthServiceSetting {
    /// Loads `.env`, the optional configuration file and `WARDEN__*`
    /// environment variables, later sources overriding earlier ones.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Config::builder()
            .add_source(File::with_name(env::CONFIG_FILE_NAME).required(false))
            .add_source(
                Environment::with_prefix(env::CONFIG_ENV_PREFIX)
                    .prefix_separator(env::CONFIG_ENV_SEPARATOR)
                    .separator(env::CONFIG_ENV_SEPARATOR)
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::from_str(json, FileFormat::Json))
            .build()?
            .try_deserialize()
    }

    pub fn blacklist_ttl_secs(&self) -> u64 {
        self.redis
            .blacklist_ttl_secs
            .unwrap_or_else(|| u64::try_from(self.jwt.refresh_token_ttl_secs).unwrap_or(0))
    }
}

fn default_issuer() -> String {
    defaults::JWT_ISSUER.to_string()
}

fn default_access_ttl() -> i64 {
    defaults::ACCESS_TOKEN_TTL_SECS
}

fn default_refresh_ttl() -> i64 {
    defaults::REFRESH_TOKEN_TTL_SECS
}

fn default_redis_host() -> String {
    defaults::REDIS_HOST_NAME.to_string()
}
