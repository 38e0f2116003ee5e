use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;

use crate::domain::user::UserError;

#[derive(Debug, Clone)]
pub struct Password(Secret<String>);

impl Password {
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

impl TryFrom<Secret<String>> for Password {
    type Error = UserError;

    fn try_from(value: Secret<String>) -> Result<Self, Self::Error> {
        if value.expose_secret().is_empty() {
            return Err(UserError::EmptyPassword);
        }
        Ok(Self(value))
    }
}

impl TryFrom<&str> for Password {
    type Error = UserError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::try_from(Secret::new(value.to_string()))
    }
}

impl AsRef<Secret<String>> for Password {
    fn as_ref(&self) -> &Secret<String> {
        &self.0
    }
}

impl PartialEq for Password {
    fn eq(&self, other: &Self) -> bool {
        self.expose() == other.expose()
    }
}

/// Strength predicate applied to every new password.
#[derive(Debug, Clone, Deserialize)]
pub struct PasswordPolicy {
    #[serde(default = "default_min_length")]
    pub min_length: usize,
    #[serde(default = "enabled")]
    pub require_digit: bool,
    #[serde(default = "enabled")]
    pub require_uppercase: bool,
    #[serde(default = "enabled")]
    pub require_lowercase: bool,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self {
            min_length: default_min_length(),
            require_digit: true,
            require_uppercase: true,
            require_lowercase: true,
        }
    }
}

impl PasswordPolicy {
    pub fn check(&self, password: &Password) -> Result<(), UserError> {
        let password = password.expose();

        if password.chars().count() < self.min_length {
            return Err(UserError::WeakPassword(format!(
                "must be at least {} characters long",
                self.min_length
            )));
        }
        if self.require_digit && !password.chars().any(|c| c.is_ascii_digit()) {
            return Err(UserError::WeakPassword("must contain a digit".to_string()));
        }
        if self.require_uppercase && !password.chars().any(char::is_uppercase) {
            return Err(UserError::WeakPassword(
                "must contain an uppercase letter".to_string(),
            ));
        }
        if self.require_lowercase && !password.chars().any(char::is_lowercase) {
            return Err(UserError::WeakPassword(
                "must contain a lowercase letter".to_string(),
            ));
        }
        Ok(())
    }
}

fn default_min_length() -> usize {
    7
}

fn enabled() -> bool {
    true
}
