pub mod env {
    pub const CONFIG_ENV_PREFIX: &str = "WARDEN";
    pub const CONFIG_ENV_SEPARATOR: &str = "__";
    /// Read from the working directory; any format the `config` crate knows.
    pub const CONFIG_FILE_NAME: &str = "configuration";
}

pub mod defaults {
    pub const JWT_ISSUER: &str = "warden";
    pub const ACCESS_TOKEN_TTL_SECS: i64 = 15 * 60;
    pub const REFRESH_TOKEN_TTL_SECS: i64 = 30 * 24 * 60 * 60;
    pub const REDIS_HOST_NAME: &str = "127.0.0.1";
}

pub mod redis_keys {
    pub const BLACKLISTED_TOKEN_KEY_PREFIX: &str = "blacklisted_token:";
}
