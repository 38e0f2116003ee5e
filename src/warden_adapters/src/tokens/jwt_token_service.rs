use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, TokenData, Validation, decode, encode,
};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use warden_core::{App, AppId, IssuedToken, Scope, Token, TokenError, TokenKind, TokenService, UserId};

use crate::config::JwtSettings;

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    jti: String,
    sub: String,
    app_id: String,
    iss: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    scopes: Vec<Scope>,
    kind: TokenKind,
    iat: i64,
    exp: i64,
}

struct Keys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    issuer: String,
    access_ttl_secs: i64,
    refresh_ttl_secs: i64,
}

/// HS256 JWTs. The key material is fixed at construction and shared by all clones.
#[derive(Clone)]
pub struct JwtTokenService {
    keys: Arc<Keys>,
}

impl JwtTokenService {
    pub fn new(settings: &JwtSettings) -> Result<Self, TokenError> {
        let secret = settings.secret.expose_secret().as_bytes();
        if secret.is_empty() {
            return Err(TokenError::Signing("signing key is empty".to_string()));
        }
        for (name, ttl) in [
            ("access", settings.access_token_ttl_secs),
            ("refresh", settings.refresh_token_ttl_secs),
        ] {
            if ttl <= 0 {
                return Err(TokenError::Signing(format!("{name} token TTL must be positive")));
            }
        }

        Ok(Self {
            keys: Arc::new(Keys {
                encoding: EncodingKey::from_secret(secret),
                decoding: DecodingKey::from_secret(secret),
                issuer: settings.issuer.clone(),
                access_ttl_secs: settings.access_token_ttl_secs,
                refresh_ttl_secs: settings.refresh_token_ttl_secs,
            }),
        })
    }

    // Expiry is checked by the caller against an explicit instant.
    fn validation(&self) -> Validation {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.set_issuer(&[&self.keys.issuer]);
        validation.required_spec_claims =
            HashSet::from(["exp", "sub", "iss"].map(str::to_string));
        validation
    }

    fn decode_claims(&self, signed: &str) -> Result<Claims, TokenError> {
        decode(signed, &self.keys.decoding, &self.validation())
            .map(|data: TokenData<Claims>| data.claims)
            .map_err(|e| {
                tracing::debug!(error = %e, "Rejected token");
                TokenError::Malformed
            })
    }
}

impl TokenService for JwtTokenService {
    fn issue_at(
        &self,
        subject: &UserId,
        app: &App,
        scopes: &[Scope],
        kind: TokenKind,
        now: DateTime<Utc>,
    ) -> Result<IssuedToken, TokenError> {
        let ttl = match kind {
            TokenKind::Access | TokenKind::TfaPending => self.keys.access_ttl_secs,
            TokenKind::Refresh => self.keys.refresh_ttl_secs,
        };
        let iat = now.timestamp();
        let exp = iat
            .checked_add(ttl)
            .ok_or_else(|| TokenError::Signing("expiry out of range".to_string()))?;

        let claims = Claims {
            jti: Uuid::new_v4().to_string(),
            sub: subject.to_string(),
            app_id: app.id.to_string(),
            iss: self.keys.issuer.clone(),
            scopes: if kind.carries_scopes() {
                scopes.to_vec()
            } else {
                Vec::new()
            },
            kind,
            iat,
            exp,
        };

        let signed = encode(&Header::new(Algorithm::HS256), &claims, &self.keys.encoding)
            .map_err(|e| TokenError::Signing(e.to_string()))?;

        Ok(IssuedToken {
            token: claims.try_into()?,
            signed,
        })
    }

    fn validate_at(&self, signed: &str, now: DateTime<Utc>) -> Result<Token, TokenError> {
        let claims = self.decode_claims(signed)?;
        if now.timestamp() >= claims.exp {
            return Err(TokenError::Expired);
        }
        claims.try_into()
    }

    fn subject_of(&self, signed: &str) -> Result<UserId, TokenError> {
        Ok(UserId::new(self.decode_claims(signed)?.sub))
    }
}

impl TryFrom<Claims> for Token {
    type Error = TokenError;

    fn try_from(claims: Claims) -> Result<Self, Self::Error> {
        let timestamp = |secs| DateTime::from_timestamp(secs, 0).ok_or(TokenError::Malformed);

        Ok(Token {
            id: claims.jti,
            subject: UserId::new(claims.sub),
            app_id: AppId::new(claims.app_id),
            scopes: claims.scopes,
            kind: claims.kind,
            issued_at: timestamp(claims.iat)?,
            expires_at: timestamp(claims.exp)?,
        })
    }
}
