//! Registration orchestration.
//!
//! [`AccountProvisioningService`] is the only implementation of the
//! [`AccountRegistration`] driving port. It validates the submission, draws a
//! student identifier, hands one [`ProvisionedAccount`] to the directory and
//! classifies whatever comes back. Nothing is retried.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{error, info};

use crate::domain::ports::{AccountRegistration, DirectoryProvider, StudentIdAllocator};
use crate::domain::{
    AccountAddress, OrganisationDomain, ProvisionedAccount, ProvisioningFailure,
    RegistrationError, RegistrationReceipt, RegistrationRequest, TraceId, validate_registration,
};

/// Registration use-case backed by a directory provider.
pub struct AccountProvisioningService<P, A> {
    directory: Arc<P>,
    allocator: Arc<A>,
    domain: OrganisationDomain,
}

impl<P, A> AccountProvisioningService<P, A>
where
    P: DirectoryProvider,
    A: StudentIdAllocator,
{
    /// Create a service that provisions accounts under `domain`.
    pub fn new(directory: Arc<P>, allocator: Arc<A>, domain: OrganisationDomain) -> Self {
        Self {
            directory,
            allocator,
            domain,
        }
    }

    /// Organisation domain appended to every handle.
    pub fn domain(&self) -> &OrganisationDomain {
        &self.domain
    }

    async fn provision(
        &self,
        request: RegistrationRequest,
    ) -> Result<RegistrationReceipt, RegistrationError> {
        let trace_id = TraceId::current();
        let accepted = validate_registration(&request).map_err(|error| {
            info!(
                trace_id = ?trace_id,
                code = error.code(),
                field = %error.field(),
                "registration rejected by validation"
            );
            RegistrationError::Invalid(error)
        })?;

        let student_id = self.allocator.allocate().await.map_err(|error| {
            error!(trace_id = ?trace_id, %error, "student id allocation failed");
            RegistrationError::Provisioning(ProvisioningFailure::unclassified())
        })?;

        let (name, handle, password, recovery_email) = accepted.into_parts();
        let address = AccountAddress::for_handle(&handle, &self.domain);
        let account = ProvisionedAccount::new(
            student_id,
            address.clone(),
            name,
            password,
            Some(recovery_email),
        );
        info!(
            trace_id = ?trace_id,
            address = %address,
            student_id = %student_id,
            "creating directory account"
        );

        match self.directory.create_account(&account).await {
            Ok(created) => {
                let confirmed = created
                    .primary_email
                    .filter(|email| !email.trim().is_empty())
                    .unwrap_or_else(|| address.to_string());
                info!(
                    trace_id = ?trace_id,
                    address = %confirmed,
                    student_id = %student_id,
                    "directory account created"
                );
                Ok(RegistrationReceipt {
                    address: confirmed,
                    student_id,
                })
            }
            Err(error) => {
                let failure = ProvisioningFailure::classify(&error, &address);
                error!(
                    trace_id = ?trace_id,
                    address = %address,
                    status = ?error.status(),
                    kind = failure.kind().as_str(),
                    %error,
                    "directory account creation failed"
                );
                Err(RegistrationError::Provisioning(failure))
            }
        }
    }
}

#[async_trait]
impl<P, A> AccountRegistration for AccountProvisioningService<P, A>
where
    P: DirectoryProvider,
    A: StudentIdAllocator,
{
    async fn register(
        &self,
        request: RegistrationRequest,
    ) -> Result<RegistrationReceipt, RegistrationError> {
        self.provision(request).await
    }
}
