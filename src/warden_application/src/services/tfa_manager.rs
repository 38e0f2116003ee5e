use chrono::{DateTime, Utc};
use rand::Rng;
use totp_rs::{Algorithm, Secret, TOTP};
use warden_core::{
    App, TfaInfo, TfaSecret, TfaSettings, TfaStatus, User, UserStorage, UserStoreError,
};

/// Raw secret size; 160 bits as recommended for HMAC-SHA1 TOTP.
const SECRET_LEN: usize = 20;

#[derive(Debug, thiserror::Error)]
pub enum TfaError {
    #[error("TFA is already enabled")]
    AlreadyEnabled,
    #[error("TFA is not enabled")]
    NotEnabled,
    #[error("App TFA status is '{0}'")]
    NotApplicable(TfaStatus),
    #[error("Invalid TFA secret: {0}")]
    InvalidSecret(String),
    #[error("User store error: {0}")]
    UserStoreError(#[from] UserStoreError),
}

/// Generates, stores and verifies time-based one-time code secrets.
///
/// Per user the state is either disabled or enabled; enabling writes the
/// secret right away and trusts the caller without a proof of possession.
#[derive(Clone)]
pub struct TfaManager<U> {
    user_store: U,
    settings: TfaSettings,
}

impl<U> TfaManager<U>
where
    U: UserStorage,
{
    pub fn new(user_store: U, settings: TfaSettings) -> Self {
        Self {
            user_store,
            settings,
        }
    }

    /// Opt-in enrollment. Only apps with an `Optional` TFA status accept it;
    /// mandatory apps enroll during login through [`TfaManager::enroll`].
    pub async fn enable(
        &self,
        user: U::User,
        app: &App,
    ) -> Result<(U::User, TfaSecret), TfaError> {
        if app.tfa_status != TfaStatus::Optional {
            return Err(TfaError::NotApplicable(app.tfa_status));
        }
        self.enroll(user).await
    }

    /// Generates a secret, marks TFA enabled and persists the user.
    pub async fn enroll(&self, user: U::User) -> Result<(U::User, TfaSecret), TfaError> {
        self.enroll_with(user, generate_secret()).await
    }

    /// Like [`TfaManager::enroll`] with a secret the caller already generated.
    pub async fn enroll_with(
        &self,
        mut user: U::User,
        secret: TfaSecret,
    ) -> Result<(U::User, TfaSecret), TfaError> {
        if user.tfa_info().is_active() {
            return Err(TfaError::AlreadyEnabled);
        }

        user.set_tfa_info(TfaInfo::enabled(secret.clone()));

        let id = user.id().clone();
        let user = self.user_store.update_user(&id, user).await?;
        Ok((user, secret))
    }

    /// Clears the secret and the enabled flag.
    pub async fn disable(&self, mut user: U::User) -> Result<U::User, TfaError> {
        if !user.tfa_info().is_enabled {
            return Err(TfaError::NotEnabled);
        }

        user.set_tfa_info(TfaInfo::default());

        let id = user.id().clone();
        Ok(self.user_store.update_user(&id, user).await?)
    }

    /// Checks `code` against the window containing `at`.
    ///
    /// A wrong code, a missing secret or a pre-epoch timestamp yield `false`;
    /// only a secret that is not valid base32 is an error.
    pub fn verify(&self, user: &impl User, code: &str, at: DateTime<Utc>) -> Result<bool, TfaError> {
        let info = user.tfa_info();
        let Some(secret) = info.secret.as_ref().filter(|_| info.is_active()) else {
            return Ok(false);
        };

        let code = code.trim();
        if code.is_empty() {
            return Ok(false);
        }

        let Ok(time) = u64::try_from(at.timestamp()) else {
            return Ok(false);
        };

        let totp = self.totp(secret, user.name().to_string())?;
        Ok(totp.check(code, time))
    }

    /// Code for the window containing `at`.
    pub fn generate_code(&self, secret: &TfaSecret, at: DateTime<Utc>) -> Result<String, TfaError> {
        let time = u64::try_from(at.timestamp())
            .map_err(|_| TfaError::InvalidSecret("timestamp precedes the epoch".to_string()))?;
        Ok(self.totp(secret, String::new())?.generate(time))
    }

    /// `otpauth://` URI for authenticator apps.
    pub fn provisioning_uri(&self, account: &str, secret: &TfaSecret) -> Result<String, TfaError> {
        let totp = TOTP::new(
            Algorithm::SHA1,
            self.settings.digits,
            self.settings.skew,
            self.settings.step_secs,
            decode_secret(secret)?,
            Some(self.settings.issuer.clone()),
            account.to_string(),
        )
        .map_err(|e| TfaError::InvalidSecret(format!("{e:?}")))?;

        Ok(totp.get_url())
    }

    // Unchecked so secrets shorter than 128 bits issued by older deployments
    // still verify.
    fn totp(&self, secret: &TfaSecret, account: String) -> Result<TOTP, TfaError> {
        Ok(TOTP::new_unchecked(
            Algorithm::SHA1,
            self.settings.digits,
            self.settings.skew,
            self.settings.step_secs,
            decode_secret(secret)?,
            Some(self.settings.issuer.clone()),
            account,
        ))
    }
}

/// Random base32 secret with enough entropy for TOTP.
pub fn generate_secret() -> TfaSecret {
    let bytes: [u8; SECRET_LEN] = rand::rng().random();
    TfaSecret::new(Secret::Raw(bytes.to_vec()).to_encoded().to_string())
}

fn decode_secret(secret: &TfaSecret) -> Result<Vec<u8>, TfaError> {
    Secret::Encoded(secret.expose().to_string())
        .to_bytes()
        .map_err(|e| TfaError::InvalidSecret(format!("{e:?}")))
}
