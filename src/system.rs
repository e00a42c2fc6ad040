use std::future::Future;
use std::sync::Mutex;

use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config;
use crate::context::{Credential, CredentialContext};
use crate::error::TokenError;

/// Claims carried by a service-to-service token.
#[derive(Debug, Serialize, Deserialize)]
pub struct SystemClaims {
    pub sub: String,
    pub scope: String,
    pub jti: String,
    pub iat: i64,
    pub exp: i64,
}

impl SystemClaims {
    pub fn new(service: &str, ttl_secs: u64) -> Self {
        let now = Utc::now();
        Self {
            sub: service.to_string(),
            scope: "internal".to_string(),
            jti: Uuid::new_v4().to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::seconds(ttl_secs as i64)).timestamp(),
        }
    }
}

struct CachedToken {
    credential: Credential,
    exp: i64,
}

/// Mints short-lived service tokens for units of work with no inbound
/// request (scheduled jobs, event consumers). A user credential is never
/// forwarded into such work; this is the system credential that replaces it.
pub struct SystemTokenIssuer {
    service: String,
    secret: String,
    ttl_secs: u64,
    cached: Mutex<Option<CachedToken>>,
}

const REFRESH_MARGIN_SECS: i64 = 30;

impl SystemTokenIssuer {
    pub fn from_config() -> Self {
        let cfg = config::config();
        Self::new(
            &cfg.service.name,
            &cfg.security.internal_token_secret,
            cfg.security.system_token_ttl_secs,
        )
    }

    pub fn new(service: &str, secret: &str, ttl_secs: u64) -> Self {
        Self {
            service: service.to_string(),
            secret: secret.to_string(),
            ttl_secs,
            cached: Mutex::new(None),
        }
    }

    /// Return a valid system credential, minting a fresh one when the
    /// cached token is missing or close to expiry.
    pub fn issue(&self) -> Result<Credential, TokenError> {
        if self.secret.is_empty() {
            return Err(TokenError::MissingSecret);
        }

        let mut cached = self.cached.lock().unwrap_or_else(|e| e.into_inner());

        let now = Utc::now().timestamp();
        if let Some(token) = cached.as_ref() {
            if token.exp - REFRESH_MARGIN_SECS > now {
                return Ok(token.credential.clone());
            }
        }

        let claims = SystemClaims::new(&self.service, self.ttl_secs);
        let exp = claims.exp;
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )?;
        let credential = Credential::from(token);
        *cached = Some(CachedToken {
            credential: credential.clone(),
            exp,
        });

        Ok(credential)
    }
}

/// Run a background unit of work authenticated as this service.
///
/// Issues a system credential and installs it as the unit of work's scope;
/// every outbound call made inside `fut` carries it.
pub async fn run_as_system<F>(issuer: &SystemTokenIssuer, fut: F) -> Result<F::Output, TokenError>
where
    F: Future,
{
    let credential = issuer.issue()?;
    Ok(CredentialContext::scope_with(credential, fut).await)
}
