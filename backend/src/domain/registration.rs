//! Registration submissions and the shared validator.
//!
//! The same [`validate_submission`] routine backs the pre-submission check in
//! the `enrol` client and the authoritative server-side check, so the two can
//! never drift. Checks run in a fixed priority order and stop at the first
//! violation:
//!
//! 1. a required field is empty once trimmed (scanned in form order),
//! 2. the handle is not `^[a-z0-9.-]+$`,
//! 3. the password is shorter than
//!    [`PASSWORD_MIN_CHARS`](crate::domain::PASSWORD_MIN_CHARS),
//! 4. the confirmation differs from the password (pre-submission only).

use std::fmt;

use crate::domain::account::{
    AccountHandle, AccountValidationError, InitialPassword, PersonName,
};

/// Form fields in the order the validator scans them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegistrationField {
    FamilyName,
    GivenName,
    Handle,
    Password,
    PasswordConfirmation,
    RecoveryEmail,
}

impl RegistrationField {
    /// JSON key used by the HTTP contract and the web form.
    #[must_use]
    pub const fn wire_name(self) -> &'static str {
        match self {
            Self::FamilyName => "lastName",
            Self::GivenName => "firstName",
            Self::Handle => "username",
            Self::Password => "password",
            Self::PasswordConfirmation => "confirmPassword",
            Self::RecoveryEmail => "recoveryEmail",
        }
    }
}

impl fmt::Display for RegistrationField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

/// First violated registration invariant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationValidationError {
    MissingField(RegistrationField),
    InvalidHandle,
    PasswordTooShort { min: usize },
    PasswordMismatch,
}

impl RegistrationValidationError {
    /// Machine-readable failure code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::MissingField(_) => "missing_field",
            Self::InvalidHandle => "invalid_username",
            Self::PasswordTooShort { .. } => "password_too_short",
            Self::PasswordMismatch => "password_mismatch",
        }
    }

    /// Field the failure refers to.
    #[must_use]
    pub const fn field(&self) -> RegistrationField {
        match self {
            Self::MissingField(field) => *field,
            Self::InvalidHandle => RegistrationField::Handle,
            Self::PasswordTooShort { .. } => RegistrationField::Password,
            Self::PasswordMismatch => RegistrationField::PasswordConfirmation,
        }
    }
}

impl fmt::Display for RegistrationValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingField(field) => write!(f, "Missing required field: {field}."),
            Self::InvalidHandle => write!(
                f,
                "Invalid username format. Use only lowercase letters, numbers, dots, or hyphens.",
            ),
            Self::PasswordTooShort { min } => {
                write!(f, "Password must be at least {min} characters.")
            }
            Self::PasswordMismatch => write!(f, "Passwords do not match."),
        }
    }
}

impl std::error::Error for RegistrationValidationError {}

/// Raw registration submission exactly as received.
///
/// Nothing here is trusted: the server re-validates every submission even if
/// the client already ran [`validate_submission`].
#[derive(Clone, Default, PartialEq, Eq)]
pub struct RegistrationRequest {
    pub family_name: String,
    pub given_name: String,
    pub handle: String,
    pub password: String,
    pub recovery_email: String,
}

impl fmt::Debug for RegistrationRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistrationRequest")
            .field("family_name", &self.family_name)
            .field("given_name", &self.given_name)
            .field("handle", &self.handle)
            .field("password", &"<redacted>")
            .field("recovery_email", &self.recovery_email)
            .finish()
    }
}

/// Submission that passed every check, with fields normalised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedRegistration {
    name: PersonName,
    handle: AccountHandle,
    password: InitialPassword,
    recovery_email: String,
}

impl ValidatedRegistration {
    pub fn name(&self) -> &PersonName {
        &self.name
    }

    pub fn handle(&self) -> &AccountHandle {
        &self.handle
    }

    pub fn password(&self) -> &InitialPassword {
        &self.password
    }

    pub fn recovery_email(&self) -> &str {
        self.recovery_email.as_str()
    }

    /// Split into parts for account construction.
    pub fn into_parts(self) -> (PersonName, AccountHandle, InitialPassword, String) {
        (self.name, self.handle, self.password, self.recovery_email)
    }
}

/// Authoritative server-side check.
///
/// # Examples
/// ```
/// use enrolment::domain::{RegistrationRequest, validate_registration};
///
/// let request = RegistrationRequest {
///     family_name: "Lee".into(),
///     given_name: "Anna".into(),
///     handle: "anna.lee".into(),
///     password: "Secret123".into(),
///     recovery_email: "a@x.com".into(),
/// };
/// let accepted = validate_registration(&request).expect("valid request");
/// assert_eq!(accepted.handle().as_ref(), "anna.lee");
/// ```
pub fn validate_registration(
    request: &RegistrationRequest,
) -> Result<ValidatedRegistration, RegistrationValidationError> {
    validate_submission(request, None)
}

/// Run the ordered checks, including the confirmation when one is supplied.
///
/// Pass `Some(confirmation)` for the pre-submission check; the confirmation
/// never reaches the server, which passes `None`.
pub fn validate_submission(
    request: &RegistrationRequest,
    confirmation: Option<&str>,
) -> Result<ValidatedRegistration, RegistrationValidationError> {
    let family_name = request.family_name.trim();
    let given_name = request.given_name.trim();
    let handle = request.handle.trim();
    let recovery_email = request.recovery_email.trim();

    let scan = [
        (RegistrationField::FamilyName, Some(family_name)),
        (RegistrationField::GivenName, Some(given_name)),
        (RegistrationField::Handle, Some(handle)),
        (RegistrationField::Password, Some(request.password.as_str())),
        (RegistrationField::PasswordConfirmation, confirmation),
        (RegistrationField::RecoveryEmail, Some(recovery_email)),
    ];
    if let Some((field, _)) = scan
        .iter()
        .find(|(_, value)| value.is_some_and(|v| v.trim().is_empty()))
    {
        return Err(RegistrationValidationError::MissingField(*field));
    }

    let handle = AccountHandle::new(handle).map_err(map_account_error)?;
    let password = InitialPassword::new(request.password.as_str()).map_err(map_account_error)?;

    if confirmation.is_some_and(|confirmation| confirmation != password.expose()) {
        return Err(RegistrationValidationError::PasswordMismatch);
    }

    Ok(ValidatedRegistration {
        name: PersonName {
            given_name: given_name.to_owned(),
            family_name: family_name.to_owned(),
        },
        handle,
        password,
        recovery_email: recovery_email.to_owned(),
    })
}

fn map_account_error(error: AccountValidationError) -> RegistrationValidationError {
    match error {
        AccountValidationError::EmptyHandle => {
            RegistrationValidationError::MissingField(RegistrationField::Handle)
        }
        AccountValidationError::EmptyPassword => {
            RegistrationValidationError::MissingField(RegistrationField::Password)
        }
        AccountValidationError::PasswordTooShort { min } => {
            RegistrationValidationError::PasswordTooShort { min }
        }
        AccountValidationError::InvalidHandle
        | AccountValidationError::EmptyDomain
        | AccountValidationError::InvalidDomain => RegistrationValidationError::InvalidHandle,
    }
}

#[cfg(test)]
mod tests;
