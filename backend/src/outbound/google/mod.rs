//! Google Workspace Directory adapter.
//!
//! Authenticates as a service account with domain-wide delegation and creates
//! users through `POST /admin/directory/v1/users`.

mod credentials;
mod dto;
mod http_provider;
mod token;

#[cfg(test)]
mod test_keys;

pub use credentials::{
    CredentialsError, DEFAULT_TOKEN_URI, ServiceAccountKey, load_service_account_key,
};
pub use http_provider::{DirectoryClientError, GoogleDirectoryConfig, GoogleDirectoryProvider};
pub use token::{
    AssertionClaims, AssertionSigner, DIRECTORY_USER_SCOPE, ServiceAccountTokenSource, TokenError,
};
