//! Runtime configuration loaded via OrthoConfig.
//!
//! Directory access is configured under the `GOOGLE_` prefix so the usual
//! `GOOGLE_APPLICATION_CREDENTIALS` variable works unchanged. Listener
//! settings use `ENROL_`, with the platform `PORT` variable as a fallback.

use std::time::Duration;

use mockable::Env;
use ortho_config::OrthoConfig;
use serde::Deserialize;
use thiserror::Error;

use crate::domain::{AccountValidationError, OrganisationDomain};
use crate::outbound::google::GoogleDirectoryConfig;

/// Directory API root used when no override is configured.
pub const DEFAULT_DIRECTORY_BASE_URL: &str = "https://admin.googleapis.com";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
const DEFAULT_HOST: &str = "0.0.0.0";
/// Listener port used when neither `ENROL_PORT` nor `PORT` is set.
pub const DEFAULT_PORT: u16 = 3000;
const PLATFORM_PORT_ENV: &str = "PORT";

/// Problems with the loaded configuration.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to load configuration: {0}")]
    Load(String),
    #[error("{name} must be set")]
    Missing { name: &'static str },
    #[error("{name} is invalid: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// Google Workspace Directory settings.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "GOOGLE")]
pub struct DirectorySettings {
    /// Service-account key JSON, or a path to the key file.
    pub application_credentials: Option<String>,
    /// Administrator impersonated by the service account.
    pub admin_email: Option<String>,
    /// Domain appended to every chosen username.
    pub workspace_domain: Option<String>,
    /// Directory API root override.
    pub directory_base_url: Option<String>,
    /// Token endpoint override.
    pub token_uri: Option<String>,
    /// Per-request timeout for Google calls.
    #[ortho_config(default = DEFAULT_REQUEST_TIMEOUT_SECS)]
    pub request_timeout_secs: Option<u64>,
}

impl DirectorySettings {
    /// Raw credential value: inline JSON or a key-file path.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Missing`] when unset or blank.
    pub fn credentials(&self) -> Result<&str, SettingsError> {
        required(
            self.application_credentials.as_deref(),
            "GOOGLE_APPLICATION_CREDENTIALS",
        )
    }

    /// Organisation domain for constructed addresses.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Missing`] when unset, or
    /// [`SettingsError::Invalid`] when it is not a plausible domain.
    pub fn workspace_domain(&self) -> Result<OrganisationDomain, SettingsError> {
        let raw = required(self.workspace_domain.as_deref(), "GOOGLE_WORKSPACE_DOMAIN")?;
        OrganisationDomain::new(raw).map_err(|error: AccountValidationError| {
            SettingsError::Invalid {
                name: "GOOGLE_WORKSPACE_DOMAIN",
                reason: error.to_string(),
            }
        })
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(
            self.request_timeout_secs
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
        )
    }

    /// Adapter configuration derived from these settings.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Missing`] when the administrator is unset.
    pub fn directory_config(&self) -> Result<GoogleDirectoryConfig, SettingsError> {
        let admin_email = required(self.admin_email.as_deref(), "GOOGLE_ADMIN_EMAIL")?;
        Ok(GoogleDirectoryConfig {
            admin_email: admin_email.to_owned(),
            base_url: self
                .directory_base_url
                .clone()
                .filter(|url| !url.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_DIRECTORY_BASE_URL.to_owned()),
            token_uri: self.token_uri.clone(),
            timeout: self.request_timeout(),
        })
    }
}

/// HTTP listener settings.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "ENROL")]
pub struct ServerSettings {
    #[ortho_config(default = DEFAULT_HOST.to_owned())]
    pub host: Option<String>,
    pub port: Option<u16>,
}

impl ServerSettings {
    pub fn host(&self) -> &str {
        self.host
            .as_deref()
            .filter(|host| !host.trim().is_empty())
            .unwrap_or(DEFAULT_HOST)
    }

    /// Resolve the listener port: `ENROL_PORT`, then `PORT`, then 3000.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Invalid`] when `PORT` is set but is not a
    /// valid port number.
    ///
    /// # Examples
    ///
    /// ```
    /// use enrolment::settings::ServerSettings;
    /// use mockable::MockEnv;
    ///
    /// let mut env = MockEnv::new();
    /// env.expect_string()
    ///     .returning(|name| (name == "PORT").then(|| "8080".to_owned()));
    ///
    /// let settings = ServerSettings { host: None, port: None };
    /// assert_eq!(settings.port(&env).expect("valid port"), 8080);
    /// ```
    pub fn port<E: Env>(&self, env: &E) -> Result<u16, SettingsError> {
        if let Some(port) = self.port {
            return Ok(port);
        }
        match env.string(PLATFORM_PORT_ENV) {
            Some(raw) if !raw.trim().is_empty() => {
                raw.trim()
                    .parse::<u16>()
                    .map_err(|error| SettingsError::Invalid {
                        name: PLATFORM_PORT_ENV,
                        reason: error.to_string(),
                    })
            }
            _ => Ok(DEFAULT_PORT),
        }
    }
}

fn required<'a>(value: Option<&'a str>, name: &'static str) -> Result<&'a str, SettingsError> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or(SettingsError::Missing { name })
}
