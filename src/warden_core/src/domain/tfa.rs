use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;

/// Base32-encoded shared secret for time-based one-time codes.
#[derive(Debug, Clone)]
pub struct TfaSecret(Secret<String>);

impl TfaSecret {
    pub fn new(encoded: impl Into<String>) -> Self {
        Self(Secret::new(encoded.into()))
    }

    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

impl PartialEq for TfaSecret {
    fn eq(&self, other: &Self) -> bool {
        self.expose() == other.expose()
    }
}

/// Per-user second-factor state.
///
/// Enabling writes the secret immediately; there is no pending state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TfaInfo {
    pub is_enabled: bool,
    pub secret: Option<TfaSecret>,
}

impl TfaInfo {
    pub fn enabled(secret: TfaSecret) -> Self {
        Self {
            is_enabled: true,
            secret: Some(secret),
        }
    }

    /// Matches the check used to reject a second enrollment.
    pub fn is_active(&self) -> bool {
        self.is_enabled
            && self
                .secret
                .as_ref()
                .is_some_and(|secret| !secret.expose().is_empty())
    }
}

/// One-time code parameters shared by enrollment and verification.
#[derive(Debug, Clone, Deserialize)]
pub struct TfaSettings {
    #[serde(default = "default_issuer")]
    pub issuer: String,
    #[serde(default = "default_digits")]
    pub digits: usize,
    #[serde(default = "default_step")]
    pub step_secs: u64,
    /// Number of neighbouring windows also accepted.
    #[serde(default)]
    pub skew: u8,
}

impl Default for TfaSettings {
    fn default() -> Self {
        Self {
            issuer: default_issuer(),
            digits: default_digits(),
            step_secs: default_step(),
            skew: 0,
        }
    }
}

fn default_issuer() -> String {
    "warden".to_string()
}

fn default_digits() -> usize {
    6
}

fn default_step() -> u64 {
    30
}
