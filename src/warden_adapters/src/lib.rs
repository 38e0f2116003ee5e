pub mod config;
pub mod delivery;
pub mod persistence;
pub mod tokens;

pub use config::{AuthServiceSetting, JwtSettings, RedisSettings};
pub use delivery::StubSecretDelivery;
pub use persistence::{HashMapUserStore, HashSetTokenBlacklist, RedisTokenBlacklist};
pub use tokens::JwtTokenService;
