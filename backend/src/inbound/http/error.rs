//! HTTP mapping for registration failures.
//!
//! Every failure is rendered as `{"success":false,"message":...}`. Input
//! errors are 400; provisioning failures are 500 whatever their kind, so
//! clients only branch on `success`.

use actix_web::error::{InternalError, JsonPayloadError};
use actix_web::{HttpRequest, HttpResponse, ResponseError, http::StatusCode};
use tracing::debug;

use crate::domain::{RegistrationError, TraceId};
use crate::inbound::http::register::RegisterFailureBody;

/// Message returned when the body cannot be read as the registration object.
pub const MALFORMED_BODY_MESSAGE: &str =
    "Request body must be a JSON object with string fields.";

fn status_for(error: &RegistrationError) -> StatusCode {
    match error {
        RegistrationError::Invalid(_) => StatusCode::BAD_REQUEST,
        RegistrationError::Provisioning(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl ResponseError for RegistrationError {
    fn status_code(&self) -> StatusCode {
        status_for(self)
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(RegisterFailureBody::new(self.public_message()))
    }
}

/// `JsonConfig` error handler producing the registration failure shape.
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    debug!(
        trace_id = ?TraceId::current(),
        error = %err,
        "registration body rejected"
    );
    let response =
        HttpResponse::BadRequest().json(RegisterFailureBody::new(MALFORMED_BODY_MESSAGE));
    InternalError::from_response(err, response).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ProvisioningFailure, RegistrationField, RegistrationValidationError};
    use actix_web::body::to_bytes;
    use rstest::rstest;
    use rstest_bdd_macros::{given, then, when};
    use serde_json::Value;

    #[given("a registration refused for lack of privilege")]
    fn a_registration_refused_for_lack_of_privilege() -> RegistrationError {
        RegistrationError::Provisioning(ProvisioningFailure::forbidden())
    }

    #[when("the adapter maps the failure to an HTTP status")]
    fn the_adapter_maps_the_failure(error: RegistrationError) -> StatusCode {
        status_for(&error)
    }

    #[then("the status is 500 Internal Server Error")]
    fn the_status_is_500(status: StatusCode) {
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[rstest]
    fn provisioning_failures_are_server_errors() {
        let error = a_registration_refused_for_lack_of_privilege();
        let status = the_adapter_maps_the_failure(error);
        the_status_is_500(status);
    }

    #[rstest]
    #[case(RegistrationValidationError::MissingField(RegistrationField::RecoveryEmail))]
    #[case(RegistrationValidationError::InvalidHandle)]
    #[case(RegistrationValidationError::PasswordTooShort { min: 8 })]
    #[actix_web::test]
    async fn input_errors_render_bad_request_bodies(#[case] cause: RegistrationValidationError) {
        let error = RegistrationError::Invalid(cause);
        let response = error.error_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let bytes = to_bytes(response.into_body()).await.expect("body");
        let body: Value = serde_json::from_slice(&bytes).expect("json body");
        assert_eq!(body["success"], Value::Bool(false));
        assert_eq!(body["message"], Value::String(cause.to_string()));
    }
}
