//! Directory account model.
//!
//! Purpose: describe the account this service asks the directory provider to
//! create. Every type here is built fresh for one registration and dropped once
//! the provider call resolves; nothing is persisted.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use zeroize::Zeroizing;

use crate::domain::student_id::StudentId;

/// Minimum number of characters accepted for an initial password.
pub const PASSWORD_MIN_CHARS: usize = 8;

/// External ID type the directory uses for organisation-issued identifiers.
pub const ORGANIZATION_EXTERNAL_ID_TYPE: &str = "organization";

static HANDLE_RE: OnceLock<Regex> = OnceLock::new();

fn handle_regex() -> &'static Regex {
    HANDLE_RE.get_or_init(|| {
        Regex::new("^[a-z0-9.-]+$")
            .unwrap_or_else(|error| panic!("account handle regex failed to compile: {error}"))
    })
}

/// Validation errors raised by the account value constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountValidationError {
    EmptyHandle,
    InvalidHandle,
    EmptyPassword,
    PasswordTooShort { min: usize },
    EmptyDomain,
    InvalidDomain,
}

impl fmt::Display for AccountValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyHandle => write!(f, "account handle must not be empty"),
            Self::InvalidHandle => write!(
                f,
                "account handle may only contain lowercase letters, digits, dots, or hyphens",
            ),
            Self::EmptyPassword => write!(f, "password must not be empty"),
            Self::PasswordTooShort { min } => {
                write!(f, "password must be at least {min} characters")
            }
            Self::EmptyDomain => write!(f, "organisation domain must not be empty"),
            Self::InvalidDomain => {
                write!(f, "organisation domain must not contain '@' or whitespace")
            }
        }
    }
}

impl std::error::Error for AccountValidationError {}

/// Local part of the directory address chosen by the registrant.
///
/// ## Invariants
/// - Matches `^[a-z0-9.-]+$`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AccountHandle(String);

impl AccountHandle {
    /// Validate and construct an [`AccountHandle`].
    ///
    /// # Examples
    /// ```
    /// use enrolment::domain::AccountHandle;
    ///
    /// assert!(AccountHandle::new("anna.lee").is_ok());
    /// assert!(AccountHandle::new("Anna Lee").is_err());
    /// ```
    pub fn new(handle: impl Into<String>) -> Result<Self, AccountValidationError> {
        let handle = handle.into();
        if handle.is_empty() {
            return Err(AccountValidationError::EmptyHandle);
        }
        if !handle_regex().is_match(&handle) {
            return Err(AccountValidationError::InvalidHandle);
        }
        Ok(Self(handle))
    }
}

impl AsRef<str> for AccountHandle {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for AccountHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

/// Initial credential handed to the directory.
///
/// The buffer is wiped on drop and never rendered by `Debug`.
#[derive(Clone, PartialEq, Eq)]
pub struct InitialPassword(Zeroizing<String>);

impl InitialPassword {
    /// Validate and construct an [`InitialPassword`].
    ///
    /// The value is stored exactly as given; surrounding whitespace is part of
    /// the credential.
    pub fn new(password: impl Into<String>) -> Result<Self, AccountValidationError> {
        let password = Zeroizing::new(password.into());
        if password.trim().is_empty() {
            return Err(AccountValidationError::EmptyPassword);
        }
        if password.chars().count() < PASSWORD_MIN_CHARS {
            return Err(AccountValidationError::PasswordTooShort {
                min: PASSWORD_MIN_CHARS,
            });
        }
        Ok(Self(password))
    }

    /// Expose the credential for the outbound call.
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for InitialPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("InitialPassword(<redacted>)")
    }
}

/// Organisation domain that owns every provisioned address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrganisationDomain(String);

impl OrganisationDomain {
    /// Validate and construct an [`OrganisationDomain`].
    pub fn new(domain: impl Into<String>) -> Result<Self, AccountValidationError> {
        let domain = domain.into().trim().to_owned();
        if domain.is_empty() {
            return Err(AccountValidationError::EmptyDomain);
        }
        if domain.contains('@') || domain.chars().any(char::is_whitespace) {
            return Err(AccountValidationError::InvalidDomain);
        }
        Ok(Self(domain))
    }
}

impl AsRef<str> for OrganisationDomain {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for OrganisationDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

/// Fully qualified directory address, `handle@domain`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AccountAddress(String);

impl AccountAddress {
    /// Join a handle and the organisation domain.
    ///
    /// # Examples
    /// ```
    /// use enrolment::domain::{AccountAddress, AccountHandle, OrganisationDomain};
    ///
    /// let handle = AccountHandle::new("anna.lee").expect("valid handle");
    /// let domain = OrganisationDomain::new("org.example").expect("valid domain");
    /// assert_eq!(
    ///     AccountAddress::for_handle(&handle, &domain).as_ref(),
    ///     "anna.lee@org.example"
    /// );
    /// ```
    pub fn for_handle(handle: &AccountHandle, domain: &OrganisationDomain) -> Self {
        Self(format!("{handle}@{domain}"))
    }
}

impl AsRef<str> for AccountAddress {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for AccountAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<AccountAddress> for String {
    fn from(value: AccountAddress) -> Self {
        value.0
    }
}

/// Structured person name as the directory stores it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonName {
    pub given_name: String,
    pub family_name: String,
}

impl PersonName {
    /// Display form, given name first.
    pub fn display_name(&self) -> String {
        format!("{} {}", self.given_name, self.family_name)
    }
}

/// Identifier stored on the directory record for later lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalId {
    pub kind: String,
    pub value: String,
}

impl ExternalId {
    /// Organisation-typed external ID carrying a student identifier.
    pub fn organization(student_id: &StudentId) -> Self {
        Self {
            kind: ORGANIZATION_EXTERNAL_ID_TYPE.to_owned(),
            value: student_id.to_string(),
        }
    }
}

/// Account representation handed once to the directory provider.
///
/// ## Invariants
/// - `change_password_at_next_login` is always `true`.
/// - `recovery_email` is `None` rather than an empty string.
/// - `external_ids` contains the organisation-typed student identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionedAccount {
    student_id: StudentId,
    primary_email: AccountAddress,
    name: PersonName,
    password: InitialPassword,
    recovery_email: Option<String>,
    external_ids: Vec<ExternalId>,
}

impl ProvisionedAccount {
    /// Assemble the provider representation for one registration.
    pub fn new(
        student_id: StudentId,
        primary_email: AccountAddress,
        name: PersonName,
        password: InitialPassword,
        recovery_email: Option<String>,
    ) -> Self {
        let recovery_email = recovery_email
            .map(|email| email.trim().to_owned())
            .filter(|email| !email.is_empty());
        let external_ids = vec![ExternalId::organization(&student_id)];
        Self {
            student_id,
            primary_email,
            name,
            password,
            recovery_email,
            external_ids,
        }
    }

    pub fn student_id(&self) -> &StudentId {
        &self.student_id
    }

    pub fn primary_email(&self) -> &AccountAddress {
        &self.primary_email
    }

    pub fn name(&self) -> &PersonName {
        &self.name
    }

    /// Display name derived from the structured name.
    pub fn display_name(&self) -> String {
        self.name.display_name()
    }

    pub fn password(&self) -> &InitialPassword {
        &self.password
    }

    /// Whether the directory must force a credential change on first login.
    pub const fn change_password_at_next_login(&self) -> bool {
        true
    }

    pub fn recovery_email(&self) -> Option<&str> {
        self.recovery_email.as_deref()
    }

    pub fn external_ids(&self) -> &[ExternalId] {
        &self.external_ids
    }
}
