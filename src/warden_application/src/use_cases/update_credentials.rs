use secrecy::{ExposeSecret, Secret};
use warden_core::{
    AuthContext, Email, Password, PasswordPolicy, TokenBlacklist, TokenService, User, UserStorage,
    UserStoreError,
};

use crate::{error::AuthError, services::AccessGuard};

/// Requested changes. Absent or empty fields are left alone.
#[derive(Debug, Default)]
pub struct CredentialsUpdate {
    pub username: Option<String>,
    pub email: Option<String>,
    pub old_password: Option<Secret<String>>,
    pub new_password: Option<Secret<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialsUpdated {
    pub username: bool,
    pub email: bool,
    pub password: bool,
}

impl CredentialsUpdated {
    /// Client-facing summary, e.g. "Username, password changed."
    pub fn message(&self) -> String {
        let changed: Vec<&str> = [
            (self.username, "username"),
            (self.email, "email"),
            (self.password, "password"),
        ]
        .into_iter()
        .filter_map(|(changed, field)| changed.then_some(field))
        .collect();

        if changed.is_empty() {
            return "Nothing changed.".to_string();
        }

        let list = changed.join(", ");
        let mut chars = list.chars();
        match chars.next() {
            Some(first) => format!("{}{} changed.", first.to_uppercase(), chars.as_str()),
            None => "Nothing changed.".to_string(),
        }
    }

    fn any(&self) -> bool {
        self.username || self.email || self.password
    }
}

/// Changes username, email and password of the signed-in user.
///
/// Every check runs before the first write. A password change always
/// re-authenticates with the old password.
pub struct UpdateCredentialsUseCase<U, B, T>
where
    U: UserStorage,
    B: TokenBlacklist,
    T: TokenService,
{
    user_store: U,
    guard: AccessGuard<B, T>,
    policy: PasswordPolicy,
}

impl<U, B, T> UpdateCredentialsUseCase<U, B, T>
where
    U: UserStorage,
    B: TokenBlacklist,
    T: TokenService,
{
    pub fn new(user_store: U, guard: AccessGuard<B, T>, policy: PasswordPolicy) -> Self {
        Self {
            user_store,
            guard,
            policy,
        }
    }

    #[tracing::instrument(name = "UpdateCredentialsUseCase::execute", skip_all, fields(app = %context.app.id))]
    pub async fn execute(
        &self,
        context: &AuthContext,
        update: CredentialsUpdate,
    ) -> Result<CredentialsUpdated, AuthError> {
        let token = self.guard.authorize(context).await?;
        let mut user = self.user_store.user_by_id(&token.subject).await?;

        let new_name = update
            .username
            .filter(|name| !name.is_empty() && name != user.name());
        let new_email = update
            .email
            .filter(|email| !email.is_empty() && email != user.email())
            .map(Email::parse)
            .transpose()?;
        let new_password = self.password_change(&user, update.old_password, update.new_password)?;

        if let Some(name) = &new_name {
            if self.user_store.user_exists(name).await? {
                return Err(AuthError::UsernameTaken);
            }
        }
        if let Some(email) = &new_email {
            // Stores may match emails case-insensitively, so the hit can be the caller.
            match self.user_store.user_by_email(email).await {
                Ok(owner) if owner.id() != user.id() => return Err(AuthError::EmailTaken),
                Ok(_) | Err(UserStoreError::UserNotFound) => {}
                Err(e) => return Err(e.into()),
            }
        }
        if let Some((old, _)) = &new_password {
            self.user_store
                .user_by_name_password(user.name(), old)
                .await
                .map_err(|e| match e {
                    UserStoreError::UnexpectedError(e) => AuthError::Storage(e),
                    _ => AuthError::InvalidCredentials,
                })?;
        }

        let updated = CredentialsUpdated {
            username: new_name.is_some(),
            email: new_email.is_some(),
            password: new_password.is_some(),
        };
        if !updated.any() {
            return Ok(updated);
        }

        if let Some((_, new)) = &new_password {
            self.user_store.reset_password(&token.subject, new).await?;
        }
        if new_name.is_some() || new_email.is_some() {
            if let Some(name) = new_name {
                user.set_name(name);
            }
            if let Some(email) = new_email {
                user.set_email(email.into_inner());
            }
            self.user_store.update_user(&token.subject, user).await?;
        }

        tracing::info!(user_id = %token.subject, summary = %updated.message(), "Credentials updated");
        Ok(updated)
    }

    /// `Some((old, new))` when the password really changes.
    fn password_change(
        &self,
        user: &U::User,
        old_password: Option<Secret<String>>,
        new_password: Option<Secret<String>>,
    ) -> Result<Option<(Password, Password)>, AuthError> {
        let Some(new) = new_password.filter(|p| !p.expose_secret().is_empty()) else {
            return Ok(None);
        };
        let old = old_password
            .filter(|p| !p.expose_secret().is_empty())
            .ok_or_else(|| AuthError::InvalidInput("old password is required".to_string()))?;

        if old.expose_secret() == new.expose_secret() {
            return Ok(None);
        }

        let new = Password::try_from(new)?;
        self.policy.check(&new)?;
        tracing::debug!(user_id = %user.id(), "Password change requested");

        Ok(Some((Password::try_from(old)?, new)))
    }
}
