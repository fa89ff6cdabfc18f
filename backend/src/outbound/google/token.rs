//! OAuth 2.0 JWT-bearer token exchange for a Google service account.
//!
//! The service account signs an RS256 assertion that impersonates the
//! workspace administrator (`sub`) and trades it at the token endpoint for a
//! short-lived access token. Tokens are cached until shortly before expiry.

use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use mockable::Clock;
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::debug;
use zeroize::Zeroizing;

use super::credentials::ServiceAccountKey;
use super::http_provider::{body_preview, map_transport_error};
use crate::domain::ports::DirectoryProviderError;

/// Scope needed to insert directory users.
pub const DIRECTORY_USER_SCOPE: &str = "https://www.googleapis.com/auth/admin.directory.user";

const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const ASSERTION_LIFETIME_SECS: i64 = 3600;
const REFRESH_MARGIN_SECS: i64 = 60;

/// Errors raised while preparing the assertion signer.
#[derive(Debug, Error)]
pub enum TokenError {
    #[error("service-account private key is not a valid RSA PEM: {0}")]
    InvalidKey(#[source] jsonwebtoken::errors::Error),
    #[error("failed to sign service-account assertion: {0}")]
    Signing(#[source] jsonwebtoken::errors::Error),
}

/// Claims of the JWT-bearer assertion.
#[derive(Debug, Serialize, Deserialize)]
pub struct AssertionClaims {
    pub iss: String,
    pub sub: String,
    pub scope: String,
    pub aud: String,
    pub iat: i64,
    pub exp: i64,
}

/// Signs assertions for one service account and impersonated subject.
pub struct AssertionSigner {
    key: EncodingKey,
    key_id: Option<String>,
    issuer: String,
    subject: String,
    audience: String,
}

impl AssertionSigner {
    /// Parse the key and fix the claims that do not change between calls.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::InvalidKey`] when the PEM cannot be parsed.
    pub fn new(
        key: &ServiceAccountKey,
        subject: impl Into<String>,
        audience: impl Into<String>,
    ) -> Result<Self, TokenError> {
        let encoding_key =
            EncodingKey::from_rsa_pem(key.private_key.as_bytes()).map_err(TokenError::InvalidKey)?;
        Ok(Self {
            key: encoding_key,
            key_id: key.private_key_id.clone(),
            issuer: key.client_email.clone(),
            subject: subject.into(),
            audience: audience.into(),
        })
    }

    /// Produce a signed assertion valid for one hour from `now`.
    pub fn sign(&self, now: DateTime<Utc>) -> Result<String, TokenError> {
        let iat = now.timestamp();
        let claims = AssertionClaims {
            iss: self.issuer.clone(),
            sub: self.subject.clone(),
            scope: DIRECTORY_USER_SCOPE.to_owned(),
            aud: self.audience.clone(),
            iat,
            exp: iat + ASSERTION_LIFETIME_SECS,
        };
        let mut header = Header::new(Algorithm::RS256);
        header.kid = self.key_id.clone();
        encode(&header, &claims, &self.key).map_err(TokenError::Signing)
    }
}

#[derive(Deserialize)]
struct TokenResponseDto {
    access_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
}

#[derive(Deserialize)]
struct TokenErrorDto {
    error: String,
    #[serde(default)]
    error_description: Option<String>,
}

struct CachedToken {
    value: Zeroizing<String>,
    refresh_at: DateTime<Utc>,
}

/// Caching access-token source.
pub struct ServiceAccountTokenSource {
    client: Client,
    token_uri: Url,
    signer: AssertionSigner,
    clock: Arc<dyn Clock + Send + Sync>,
    cache: Mutex<Option<CachedToken>>,
}

impl ServiceAccountTokenSource {
    pub fn new(
        client: Client,
        token_uri: Url,
        signer: AssertionSigner,
        clock: Arc<dyn Clock + Send + Sync>,
    ) -> Self {
        Self {
            client,
            token_uri,
            signer,
            clock,
            cache: Mutex::new(None),
        }
    }

    /// Return a cached token or exchange a fresh assertion.
    ///
    /// The cache lock is held across the exchange so concurrent callers share
    /// one refresh.
    pub async fn access_token(&self) -> Result<Zeroizing<String>, DirectoryProviderError> {
        let mut cache = self.cache.lock().await;
        let now = self.clock.utc();
        if let Some(token) = cache.as_ref().filter(|token| now < token.refresh_at) {
            return Ok(token.value.clone());
        }
        let fresh = self.exchange(now).await?;
        let value = fresh.value.clone();
        *cache = Some(fresh);
        Ok(value)
    }

    async fn exchange(&self, now: DateTime<Utc>) -> Result<CachedToken, DirectoryProviderError> {
        let assertion = self
            .signer
            .sign(now)
            .map_err(|error| DirectoryProviderError::unauthenticated(error.to_string()))?;
        let response = self
            .client
            .post(self.token_uri.clone())
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_token_error(status, body.as_ref()));
        }

        let decoded: TokenResponseDto = serde_json::from_slice(&body).map_err(|error| {
            DirectoryProviderError::decode(format!("invalid token response: {error}"))
        })?;
        // Google never issues tokens outliving the assertion.
        let lifetime = decoded
            .expires_in
            .unwrap_or(ASSERTION_LIFETIME_SECS)
            .clamp(1, ASSERTION_LIFETIME_SECS);
        let refresh_at = now
            .checked_add_signed(TimeDelta::seconds(lifetime - REFRESH_MARGIN_SECS))
            .unwrap_or(now);
        debug!(expires_in = lifetime, "exchanged service-account assertion");
        Ok(CachedToken {
            value: Zeroizing::new(decoded.access_token),
            refresh_at,
        })
    }
}

fn map_token_error(status: reqwest::StatusCode, body: &[u8]) -> DirectoryProviderError {
    if status.is_server_error() || status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        return DirectoryProviderError::transport(format!(
            "token endpoint status {}: {}",
            status.as_u16(),
            body_preview(body)
        ));
    }
    let message = match serde_json::from_slice::<TokenErrorDto>(body) {
        Ok(TokenErrorDto {
            error,
            error_description: Some(description),
        }) => format!("{error}: {description}"),
        Ok(TokenErrorDto { error, .. }) => error,
        Err(_) => format!("status {}: {}", status.as_u16(), body_preview(body)),
    };
    DirectoryProviderError::unauthenticated(message)
}
