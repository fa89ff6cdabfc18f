//! Driving port for the registration use-case.
//!
//! Inbound adapters call this port with the raw submission. The
//! implementation owns validation, identifier allocation, the directory call
//! and error classification, so HTTP handler tests can substitute a double
//! without wiring the outbound adapter.

use async_trait::async_trait;

use crate::domain::{RegistrationError, RegistrationReceipt, RegistrationRequest};

/// Domain use-case port for self-service registration.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountRegistration: Send + Sync {
    /// Validate the submission and provision the account.
    ///
    /// Not idempotent: a retry after a provisioning failure can hit a
    /// conflict if the first attempt reached the directory.
    async fn register(
        &self,
        request: RegistrationRequest,
    ) -> Result<RegistrationReceipt, RegistrationError>;
}
