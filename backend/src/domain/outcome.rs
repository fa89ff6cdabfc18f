//! Registration outcomes and provisioning failure classification.
//!
//! Every registration ends in exactly one of:
//! - [`RegistrationReceipt`]: the directory accepted the account,
//! - [`RegistrationError::Invalid`]: the submission failed validation and no
//!   external call was made,
//! - [`RegistrationError::Provisioning`]: the directory call was issued and
//!   failed. The account may still exist; callers must not assume otherwise.

use std::fmt;

use crate::domain::ports::DirectoryProviderError;
use crate::domain::{AccountAddress, RegistrationValidationError, StudentId};

const FORBIDDEN_MESSAGE: &str = "Insufficient permission to create the account. Check the service account permissions and domain-wide delegation.";
const UNCLASSIFIED_MESSAGE: &str = "Registration failed. Please try again later.";

/// Successful registration, reduced to what the caller may see.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationReceipt {
    /// Address confirmed by the directory.
    pub address: String,
    /// Identifier generated for this registration.
    pub student_id: StudentId,
}

/// Stable category of a provisioning failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProvisioningFailureKind {
    /// The address is already taken.
    Conflict,
    /// The service identity lacks privilege; an operator must investigate.
    Forbidden,
    /// The directory explained the rejection itself.
    ProviderDetailed,
    /// Anything else. Details stay in the server log.
    Unclassified,
}

impl ProvisioningFailureKind {
    /// Machine-readable kind for logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Conflict => "conflict",
            Self::Forbidden => "forbidden",
            Self::ProviderDetailed => "provider_detailed",
            Self::Unclassified => "unclassified",
        }
    }
}

/// Classified provisioning failure with a message safe to show the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisioningFailure {
    kind: ProvisioningFailureKind,
    message: String,
}

impl ProvisioningFailure {
    /// Map a directory error onto the user-facing taxonomy.
    ///
    /// `address` is the address this service constructed; conflict messages
    /// quote it rather than anything the directory echoed.
    ///
    /// # Examples
    /// ```
    /// use enrolment::domain::ports::DirectoryProviderError;
    /// use enrolment::domain::{
    ///     AccountAddress, AccountHandle, OrganisationDomain, ProvisioningFailure,
    ///     ProvisioningFailureKind,
    /// };
    ///
    /// let handle = AccountHandle::new("anna.lee").expect("valid handle");
    /// let domain = OrganisationDomain::new("org.example").expect("valid domain");
    /// let address = AccountAddress::for_handle(&handle, &domain);
    ///
    /// let error = DirectoryProviderError::rejected(409_u16, None::<String>);
    /// let failure = ProvisioningFailure::classify(&error, &address);
    /// assert_eq!(failure.kind(), ProvisioningFailureKind::Conflict);
    /// assert!(failure.message().contains("anna.lee@org.example"));
    /// ```
    pub fn classify(error: &DirectoryProviderError, address: &AccountAddress) -> Self {
        match error {
            DirectoryProviderError::Rejected { status: 409, .. } => Self {
                kind: ProvisioningFailureKind::Conflict,
                message: format!("Username {address} already exists."),
            },
            DirectoryProviderError::Rejected {
                status: 401 | 403, ..
            }
            | DirectoryProviderError::Unauthenticated { .. } => Self::forbidden(),
            DirectoryProviderError::Rejected {
                detail: Some(detail),
                ..
            } if !detail.trim().is_empty() => Self {
                kind: ProvisioningFailureKind::ProviderDetailed,
                message: format!("Directory API error: {}", detail.trim()),
            },
            DirectoryProviderError::Rejected { .. }
            | DirectoryProviderError::Transport { .. }
            | DirectoryProviderError::Timeout { .. }
            | DirectoryProviderError::Decode { .. } => Self::unclassified(),
        }
    }

    /// Permission or configuration failure.
    pub fn forbidden() -> Self {
        Self {
            kind: ProvisioningFailureKind::Forbidden,
            message: FORBIDDEN_MESSAGE.to_owned(),
        }
    }

    /// Generic failure that reveals nothing about the cause.
    pub fn unclassified() -> Self {
        Self {
            kind: ProvisioningFailureKind::Unclassified,
            message: UNCLASSIFIED_MESSAGE.to_owned(),
        }
    }

    pub fn kind(&self) -> ProvisioningFailureKind {
        self.kind
    }

    /// Message safe to return to the caller.
    pub fn message(&self) -> &str {
        self.message.as_str()
    }
}

impl fmt::Display for ProvisioningFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ProvisioningFailure {}

/// Terminal failure of one registration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistrationError {
    /// Client-correctable input error; nothing was sent to the directory.
    #[error(transparent)]
    Invalid(#[from] RegistrationValidationError),
    /// The directory call was issued and did not succeed.
    #[error(transparent)]
    Provisioning(#[from] ProvisioningFailure),
}

impl RegistrationError {
    /// Message safe to return to the caller.
    pub fn public_message(&self) -> String {
        self.to_string()
    }
}
