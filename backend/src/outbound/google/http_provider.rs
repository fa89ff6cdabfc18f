//! Reqwest-backed Google Workspace Directory adapter.
//!
//! This adapter owns transport details only: bearer authentication, request
//! serialisation, status mapping and response decoding. Deciding what a
//! failure means to the registrant happens in the domain.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use mockable::Clock;
use reqwest::{Client, StatusCode, Url};
use tracing::{debug, warn};

use super::credentials::ServiceAccountKey;
use super::dto::{ErrorEnvelopeDto, InsertUserDto, InsertedUserDto};
use super::token::{AssertionSigner, ServiceAccountTokenSource, TokenError};
use crate::domain::ProvisionedAccount;
use crate::domain::ports::{CreatedDirectoryAccount, DirectoryProvider, DirectoryProviderError};

const USERS_PATH: &str = "admin/directory/v1/users";
const USER_AGENT: &str = concat!("enrolment/", env!("CARGO_PKG_VERSION"));

/// Errors raised while building the adapter.
#[derive(Debug, thiserror::Error)]
pub enum DirectoryClientError {
    #[error(transparent)]
    Token(#[from] TokenError),
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
    #[error("invalid directory URL {url}: {source}")]
    Url {
        url: String,
        #[source]
        source: url::ParseError,
    },
}

/// Connection settings for [`GoogleDirectoryProvider`].
pub struct GoogleDirectoryConfig {
    /// Workspace administrator the service account impersonates.
    pub admin_email: String,
    /// API root, normally `https://admin.googleapis.com`.
    pub base_url: String,
    /// Token endpoint; `None` uses the key file's `token_uri`.
    pub token_uri: Option<String>,
    pub timeout: Duration,
}

/// Directory provider that creates users through the Admin SDK REST API.
pub struct GoogleDirectoryProvider {
    client: Client,
    users_endpoint: Url,
    tokens: ServiceAccountTokenSource,
}

impl GoogleDirectoryProvider {
    /// Build the adapter from a loaded key.
    ///
    /// # Errors
    ///
    /// Fails when the private key is not RSA PEM, a URL does not parse, or the
    /// reqwest client cannot be constructed.
    pub fn new(
        key: &ServiceAccountKey,
        config: GoogleDirectoryConfig,
        clock: Arc<dyn Clock + Send + Sync>,
    ) -> Result<Self, DirectoryClientError> {
        let token_uri = config
            .token_uri
            .filter(|uri| !uri.trim().is_empty())
            .unwrap_or_else(|| key.token_uri().to_owned());
        let token_url = parse_url(&token_uri)?;
        let users_endpoint = users_endpoint(&config.base_url)?;
        let signer = AssertionSigner::new(key, config.admin_email, token_uri)?;
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(USER_AGENT)
            .build()?;
        let tokens = ServiceAccountTokenSource::new(client.clone(), token_url, signer, clock);
        Ok(Self {
            client,
            users_endpoint,
            tokens,
        })
    }
}

#[async_trait]
impl DirectoryProvider for GoogleDirectoryProvider {
    async fn create_account(
        &self,
        account: &ProvisionedAccount,
    ) -> Result<CreatedDirectoryAccount, DirectoryProviderError> {
        let token = self.tokens.access_token().await?;
        let response = self
            .client
            .post(self.users_endpoint.clone())
            .bearer_auth(token.as_str())
            .json(&InsertUserDto::from(account))
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        debug!(status = status.as_u16(), "directory users.insert answered");
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }
        Ok(parse_inserted_user(body.as_ref()))
    }
}

fn parse_url(raw: &str) -> Result<Url, DirectoryClientError> {
    Url::parse(raw).map_err(|source| DirectoryClientError::Url {
        url: raw.to_owned(),
        source,
    })
}

fn users_endpoint(base_url: &str) -> Result<Url, DirectoryClientError> {
    let root = format!("{}/", base_url.trim_end_matches('/'));
    parse_url(&root)?
        .join(USERS_PATH)
        .map_err(|source| DirectoryClientError::Url {
            url: base_url.to_owned(),
            source,
        })
}

/// A 2xx means the user exists, so an unreadable echo only loses the
/// confirmed address.
fn parse_inserted_user(body: &[u8]) -> CreatedDirectoryAccount {
    if body.iter().all(u8::is_ascii_whitespace) {
        return CreatedDirectoryAccount {
            primary_email: None,
        };
    }
    match serde_json::from_slice::<InsertedUserDto>(body) {
        Ok(decoded) => CreatedDirectoryAccount {
            primary_email: decoded.primary_email,
        },
        Err(error) => {
            warn!(
                %error,
                body = %body_preview(body),
                "undecodable users.insert payload after success"
            );
            CreatedDirectoryAccount {
                primary_email: None,
            }
        }
    }
}

pub(super) fn map_transport_error(error: reqwest::Error) -> DirectoryProviderError {
    if error.is_timeout() {
        DirectoryProviderError::timeout(error.to_string())
    } else {
        DirectoryProviderError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> DirectoryProviderError {
    let detail = serde_json::from_slice::<ErrorEnvelopeDto>(body)
        .ok()
        .and_then(|envelope| envelope.error.message)
        .filter(|message| !message.trim().is_empty());
    if detail.is_none() {
        debug!(
            status = status.as_u16(),
            body = %body_preview(body),
            "directory error without a structured message"
        );
    }
    DirectoryProviderError::rejected(status.as_u16(), detail)
}

pub(super) fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}

#[cfg(test)]
mod tests;
