//! Driven port for the external directory that owns provisioned accounts.
//!
//! The domain hands the adapter a fully built [`ProvisionedAccount`] and gets
//! back either the address the directory confirmed or a transport-level
//! error. Turning that error into a user-facing outcome is the job of
//! [`crate::domain::ProvisioningFailure::classify`]; adapters only report
//! what the directory said.

use async_trait::async_trait;

use super::define_port_error;
use crate::domain::ProvisionedAccount;

/// Account as acknowledged by the directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedDirectoryAccount {
    /// Primary address echoed by the directory, when it returned one.
    pub primary_email: Option<String>,
}

define_port_error! {
    /// Errors surfaced while creating a directory account.
    ///
    /// None of these guarantee the account was not created: a timeout or a
    /// dropped connection can follow a successful insert.
    pub enum DirectoryProviderError {
        /// The directory answered with a non-success status.
        Rejected { status: u16, detail: Option<String> } =>
            "directory rejected account creation with status {status}",
        /// The service-account assertion was refused by the token endpoint.
        Unauthenticated { message: String } =>
            "directory credentials were rejected: {message}",
        /// Network transport failed before a response arrived.
        Transport { message: String } =>
            "directory transport failed: {message}",
        /// The call exceeded the client timeout.
        Timeout { message: String } =>
            "directory request timed out: {message}",
        /// A success response could not be decoded.
        Decode { message: String } =>
            "directory response decode failed: {message}",
    }
}

impl DirectoryProviderError {
    /// HTTP status reported by the directory, if it answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Rejected { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Port for creating accounts in the organisation directory.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DirectoryProvider: Send + Sync {
    /// Create one account. Called exactly once per accepted registration.
    async fn create_account(
        &self,
        account: &ProvisionedAccount,
    ) -> Result<CreatedDirectoryAccount, DirectoryProviderError>;
}
