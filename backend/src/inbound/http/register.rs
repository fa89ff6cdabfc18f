//! Registration endpoint.
//!
//! ```text
//! POST /register {"lastName":"Lee","firstName":"Anna","username":"anna.lee",
//!                 "password":"Secret123","recoveryEmail":"a@x.com"}
//! ```

use std::fmt;

use actix_web::{HttpResponse, post, web};
use serde::de::value::MapAccessDeserializer;
use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

use crate::domain::{RegistrationError, RegistrationReceipt, RegistrationRequest};
use crate::inbound::http::error::json_error_handler;
use crate::inbound::http::state::HttpState;

/// Message returned with every successful registration.
pub const SUCCESS_MESSAGE: &str =
    "Registration successful. The account has been created in the organisation directory.";

/// Request body for `POST /register`.
///
/// Absent or `null` keys are read as empty strings so validation can name the
/// missing field.
#[derive(Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct RegisterRequestBody {
    #[schema(example = "Lee")]
    pub last_name: Option<String>,
    #[schema(example = "Anna")]
    pub first_name: Option<String>,
    #[schema(example = "anna.lee")]
    pub username: Option<String>,
    #[schema(example = "Secret123")]
    pub password: Option<String>,
    #[schema(example = "a@x.com")]
    pub recovery_email: Option<String>,
}

impl From<RegisterRequestBody> for RegistrationRequest {
    fn from(body: RegisterRequestBody) -> Self {
        Self {
            family_name: body.last_name.unwrap_or_default(),
            given_name: body.first_name.unwrap_or_default(),
            handle: body.username.unwrap_or_default(),
            password: body.password.unwrap_or_default(),
            recovery_email: body.recovery_email.unwrap_or_default(),
        }
    }
}

/// Extractor target that accepts [`RegisterRequestBody`] only as a JSON
/// object. Derived struct deserialisers also take arrays, which would turn
/// `[]` into an all-blank submission.
pub struct RegisterPayload(pub RegisterRequestBody);

impl<'de> Deserialize<'de> for RegisterPayload {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ObjectVisitor;

        impl<'de> Visitor<'de> for ObjectVisitor {
            type Value = RegisterPayload;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a registration object")
            }

            fn visit_map<A: MapAccess<'de>>(self, map: A) -> Result<Self::Value, A::Error> {
                RegisterRequestBody::deserialize(MapAccessDeserializer::new(map)).map(RegisterPayload)
            }
        }

        deserializer.deserialize_map(ObjectVisitor)
    }
}

/// Body returned with HTTP 201.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterSuccessBody {
    pub success: bool,
    pub message: String,
    /// Address confirmed by the directory.
    #[schema(example = "anna.lee@org.example")]
    pub username: String,
    #[schema(example = "S123456")]
    pub student_id: String,
}

impl From<RegistrationReceipt> for RegisterSuccessBody {
    fn from(receipt: RegistrationReceipt) -> Self {
        Self {
            success: true,
            message: SUCCESS_MESSAGE.to_owned(),
            username: receipt.address,
            student_id: receipt.student_id.to_string(),
        }
    }
}

/// Body returned with HTTP 400 and 500.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct RegisterFailureBody {
    pub success: bool,
    pub message: String,
}

impl RegisterFailureBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

/// JSON extractor settings for the registration route.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(json_error_handler)
}

/// Create a directory account for a self-service registrant.
#[utoipa::path(
    post,
    path = "/register",
    request_body = RegisterRequestBody,
    responses(
        (status = 201, description = "Account created", body = RegisterSuccessBody),
        (status = 400, description = "Invalid submission", body = RegisterFailureBody),
        (status = 500, description = "Directory refused or failed", body = RegisterFailureBody)
    ),
    tags = ["registration"],
    operation_id = "register",
    security([])
)]
#[post("/register")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<RegisterPayload>,
) -> Result<HttpResponse, RegistrationError> {
    let RegisterPayload(body) = payload.into_inner();
    let receipt = state.registration.register(body.into()).await?;
    Ok(HttpResponse::Created().json(RegisterSuccessBody::from(receipt)))
}
