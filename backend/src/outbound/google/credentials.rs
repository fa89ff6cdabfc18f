//! Service-account key loading.
//!
//! `GOOGLE_APPLICATION_CREDENTIALS` holds either the key JSON itself or a path
//! to the key file. A value starting with `{` is parsed as JSON first; if that
//! fails the value is retried as a path, so a mangled inline key surfaces as a
//! "file not found" error with a warning in the log.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use cap_std::{ambient_authority, fs::Dir};
use serde::Deserialize;
use thiserror::Error;
use tracing::{info, warn};

/// Google's OAuth token endpoint.
pub const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// Errors raised while loading the service-account key.
#[derive(Debug, Error)]
pub enum CredentialsError {
    #[error("credentials path {} must name a file", path.display())]
    InvalidPath { path: PathBuf },
    #[error("failed to read credentials file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("credentials file {} is not a service-account key: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("service-account key is missing {field}")]
    MissingField { field: &'static str },
}

/// The fields of a Google service-account key this service needs.
#[derive(Clone, Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: String,
    #[serde(default)]
    pub private_key_id: Option<String>,
    #[serde(default)]
    pub token_uri: Option<String>,
}

impl ServiceAccountKey {
    fn validated(self) -> Result<Self, CredentialsError> {
        if self.client_email.trim().is_empty() {
            return Err(CredentialsError::MissingField {
                field: "client_email",
            });
        }
        if self.private_key.trim().is_empty() {
            return Err(CredentialsError::MissingField {
                field: "private_key",
            });
        }
        Ok(self)
    }

    /// Token endpoint named by the key, or Google's default.
    pub fn token_uri(&self) -> &str {
        self.token_uri
            .as_deref()
            .filter(|uri| !uri.trim().is_empty())
            .unwrap_or(DEFAULT_TOKEN_URI)
    }
}

impl fmt::Debug for ServiceAccountKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceAccountKey")
            .field("client_email", &self.client_email)
            .field("private_key", &"<redacted>")
            .field("private_key_id", &self.private_key_id)
            .field("token_uri", &self.token_uri)
            .finish()
    }
}

/// Resolve the credential setting into a key.
///
/// # Examples
/// ```
/// use enrolment::outbound::google::load_service_account_key;
///
/// let key = load_service_account_key(
///     r#"{"client_email":"svc@project.iam.gserviceaccount.com","private_key":"pem"}"#,
/// )
/// .expect("inline key");
/// assert_eq!(key.token_uri(), "https://oauth2.googleapis.com/token");
/// ```
pub fn load_service_account_key(raw: &str) -> Result<ServiceAccountKey, CredentialsError> {
    let trimmed = raw.trim();
    if trimmed.starts_with('{') {
        match serde_json::from_str::<ServiceAccountKey>(trimmed) {
            Ok(key) => {
                info!("using inline service-account credentials");
                return key.validated();
            }
            Err(error) => {
                warn!(%error, "credentials look like JSON but failed to parse; treating as a path");
            }
        }
    }
    read_key_file(Path::new(trimmed))
}

fn read_key_file(path: &Path) -> Result<ServiceAccountKey, CredentialsError> {
    let parent = path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let file_name = path.file_name().ok_or_else(|| CredentialsError::InvalidPath {
        path: path.to_path_buf(),
    })?;
    let read_error = |source| CredentialsError::Read {
        path: path.to_path_buf(),
        source,
    };
    let directory = Dir::open_ambient_dir(parent, ambient_authority()).map_err(read_error)?;
    let contents = directory
        .read_to_string(Path::new(file_name))
        .map_err(read_error)?;
    info!(path = %path.display(), "using service-account key file");
    serde_json::from_str::<ServiceAccountKey>(&contents)
        .map_err(|source| CredentialsError::Parse {
            path: path.to_path_buf(),
            source,
        })?
        .validated()
}
