//! Registration domain.
//!
//! Purpose: own the rules for turning a self-service submission into exactly
//! one directory account. Inbound adapters hand raw input to the
//! [`ports::AccountRegistration`] port; outbound adapters implement
//! [`ports::DirectoryProvider`] and never see unvalidated data.
//!
//! Public surface:
//! - `RegistrationRequest` and `validate_submission`: shared ordered validator.
//! - `ProvisionedAccount`: the account handed to the directory.
//! - `ProvisioningFailure`: classification of directory errors.
//! - `AccountProvisioningService`: the registration use-case.

pub mod account;
pub mod outcome;
pub mod ports;
pub mod provisioning;
pub mod registration;
pub mod student_id;
pub mod trace_id;

pub use self::account::{
    AccountAddress, AccountHandle, AccountValidationError, ExternalId, InitialPassword,
    ORGANIZATION_EXTERNAL_ID_TYPE, OrganisationDomain, PASSWORD_MIN_CHARS, PersonName,
    ProvisionedAccount,
};
pub use self::outcome::{
    ProvisioningFailure, ProvisioningFailureKind, RegistrationError, RegistrationReceipt,
};
pub use self::provisioning::AccountProvisioningService;
pub use self::registration::{
    RegistrationField, RegistrationRequest, RegistrationValidationError, ValidatedRegistration,
    validate_registration, validate_submission,
};
pub use self::student_id::{StudentId, StudentIdParseError};
pub use self::trace_id::TraceId;
