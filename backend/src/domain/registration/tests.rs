//! Tests for the ordered registration validator.

use super::*;
use rstest::{fixture, rstest};
use rstest_bdd_macros::{given, then, when};

#[fixture]
fn valid_request() -> RegistrationRequest {
    RegistrationRequest {
        family_name: "Lee".to_owned(),
        given_name: "Anna".to_owned(),
        handle: "anna.lee".to_owned(),
        password: "Secret123".to_owned(),
        recovery_email: "a@x.com".to_owned(),
    }
}

fn with_field(
    mut request: RegistrationRequest,
    field: RegistrationField,
    value: &str,
) -> RegistrationRequest {
    let slot = match field {
        RegistrationField::FamilyName => &mut request.family_name,
        RegistrationField::GivenName => &mut request.given_name,
        RegistrationField::Handle => &mut request.handle,
        RegistrationField::Password => &mut request.password,
        RegistrationField::RecoveryEmail => &mut request.recovery_email,
        RegistrationField::PasswordConfirmation => {
            panic!("confirmation is not part of the transmitted request")
        }
    };
    *slot = value.to_owned();
    request
}

#[given("a submission with every field blank")]
fn a_submission_with_every_field_blank() -> RegistrationRequest {
    RegistrationRequest::default()
}

#[when("the server validates it")]
fn the_server_validates_it(
    request: RegistrationRequest,
) -> Result<ValidatedRegistration, RegistrationValidationError> {
    validate_registration(&request)
}

#[then("the family name is reported first")]
fn the_family_name_is_reported_first(
    result: Result<ValidatedRegistration, RegistrationValidationError>,
) {
    assert_eq!(
        result,
        Err(RegistrationValidationError::MissingField(
            RegistrationField::FamilyName
        ))
    );
}

#[rstest]
fn blank_submission_reports_family_name() {
    let request = a_submission_with_every_field_blank();
    let result = the_server_validates_it(request);
    the_family_name_is_reported_first(result);
}

#[rstest]
fn accepts_and_normalises_a_valid_request(valid_request: RegistrationRequest) {
    let mut request = valid_request;
    request.family_name = "  Lee ".to_owned();
    request.handle = " anna.lee\t".to_owned();
    request.recovery_email = " a@x.com ".to_owned();

    let accepted = validate_registration(&request).expect("request should be accepted");
    assert_eq!(accepted.name().family_name, "Lee");
    assert_eq!(accepted.name().given_name, "Anna");
    assert_eq!(accepted.handle().as_ref(), "anna.lee");
    assert_eq!(accepted.password().expose(), "Secret123");
    assert_eq!(accepted.recovery_email(), "a@x.com");
}

#[rstest]
#[case(RegistrationField::FamilyName)]
#[case(RegistrationField::GivenName)]
#[case(RegistrationField::Handle)]
#[case(RegistrationField::Password)]
#[case(RegistrationField::RecoveryEmail)]
fn reports_each_missing_field(
    valid_request: RegistrationRequest,
    #[case] field: RegistrationField,
    #[values("", "   ", "\t\n")] blank: &str,
) {
    let request = with_field(valid_request, field, blank);
    assert_eq!(
        validate_registration(&request),
        Err(RegistrationValidationError::MissingField(field))
    );
}

#[rstest]
#[case(
    &[RegistrationField::Handle, RegistrationField::RecoveryEmail],
    RegistrationField::Handle
)]
#[case(
    &[RegistrationField::RecoveryEmail, RegistrationField::GivenName],
    RegistrationField::GivenName
)]
#[case(
    &[RegistrationField::Password, RegistrationField::RecoveryEmail],
    RegistrationField::Password
)]
#[case(
    &[RegistrationField::RecoveryEmail, RegistrationField::FamilyName, RegistrationField::Handle],
    RegistrationField::FamilyName
)]
fn first_missing_field_wins(
    valid_request: RegistrationRequest,
    #[case] blanks: &[RegistrationField],
    #[case] expected: RegistrationField,
) {
    let request = blanks
        .iter()
        .fold(valid_request, |request, field| with_field(request, *field, ""));
    assert_eq!(
        validate_registration(&request),
        Err(RegistrationValidationError::MissingField(expected))
    );
}

#[rstest]
#[case("Anna.Lee")]
#[case("anna_lee")]
#[case("anna lee")]
#[case("anna@org.example")]
#[case("anna+tag")]
#[case("アンナ")]
fn rejects_malformed_handles_regardless_of_other_fields(
    valid_request: RegistrationRequest,
    #[case] handle: &str,
    #[values("Secret123", "short")] password: &str,
) {
    let request = with_field(
        with_field(valid_request, RegistrationField::Handle, handle),
        RegistrationField::Password,
        password,
    );
    let error = validate_registration(&request).expect_err("handle must be rejected");
    assert_eq!(error, RegistrationValidationError::InvalidHandle);
    assert_eq!(error.code(), "invalid_username");
    assert_eq!(error.field(), RegistrationField::Handle);
}

#[rstest]
#[case("1")]
#[case("Secret1")]
#[case("ab cd e")]
fn rejects_short_passwords(valid_request: RegistrationRequest, #[case] password: &str) {
    let request = with_field(valid_request, RegistrationField::Password, password);
    assert_eq!(
        validate_registration(&request),
        Err(RegistrationValidationError::PasswordTooShort { min: 8 })
    );
}

#[rstest]
fn password_length_includes_inner_and_surrounding_spaces(valid_request: RegistrationRequest) {
    let request = with_field(valid_request, RegistrationField::Password, "       x");
    let accepted = validate_registration(&request).expect("eight characters are enough");
    assert_eq!(accepted.password().expose(), "       x");
}

#[rstest]
fn missing_field_outranks_handle_and_password_checks(valid_request: RegistrationRequest) {
    let request = RegistrationRequest {
        handle: "Not Valid".to_owned(),
        password: "short".to_owned(),
        recovery_email: String::new(),
        ..valid_request
    };
    assert_eq!(
        validate_registration(&request),
        Err(RegistrationValidationError::MissingField(
            RegistrationField::RecoveryEmail
        ))
    );
}

#[rstest]
fn handle_check_outranks_password_length(valid_request: RegistrationRequest) {
    let request = RegistrationRequest {
        handle: "Bad".to_owned(),
        password: "short".to_owned(),
        ..valid_request
    };
    assert_eq!(
        validate_registration(&request),
        Err(RegistrationValidationError::InvalidHandle)
    );
}

#[rstest]
fn pre_submission_reports_blank_confirmation_before_recovery_email(
    valid_request: RegistrationRequest,
) {
    let request = with_field(valid_request, RegistrationField::RecoveryEmail, "");
    assert_eq!(
        validate_submission(&request, Some("")),
        Err(RegistrationValidationError::MissingField(
            RegistrationField::PasswordConfirmation
        ))
    );
}

#[rstest]
fn pre_submission_checks_confirmation_last(valid_request: RegistrationRequest) {
    assert_eq!(
        validate_submission(&valid_request, Some("Secret124")),
        Err(RegistrationValidationError::PasswordMismatch)
    );

    let short = with_field(valid_request.clone(), RegistrationField::Password, "short");
    assert_eq!(
        validate_submission(&short, Some("different")),
        Err(RegistrationValidationError::PasswordTooShort { min: 8 })
    );

    assert!(validate_submission(&valid_request, Some("Secret123")).is_ok());
}

#[rstest]
#[case(
    RegistrationValidationError::MissingField(RegistrationField::GivenName),
    "missing_field",
    "Missing required field: firstName."
)]
#[case(
    RegistrationValidationError::InvalidHandle,
    "invalid_username",
    "Invalid username format. Use only lowercase letters, numbers, dots, or hyphens."
)]
#[case(
    RegistrationValidationError::PasswordTooShort { min: 8 },
    "password_too_short",
    "Password must be at least 8 characters."
)]
#[case(
    RegistrationValidationError::PasswordMismatch,
    "password_mismatch",
    "Passwords do not match."
)]
fn failures_render_stable_codes_and_messages(
    #[case] error: RegistrationValidationError,
    #[case] code: &str,
    #[case] message: &str,
) {
    assert_eq!(error.code(), code);
    assert_eq!(error.to_string(), message);
}

#[test]
fn debug_output_redacts_password() {
    let rendered = format!("{:?}", valid_request());
    assert!(!rendered.contains("Secret123"));
    assert!(rendered.contains("anna.lee"));
}
