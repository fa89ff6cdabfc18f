//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers the registration endpoint, its request and response
//! bodies, and the health probes. Swagger UI serves it in debug builds and
//! `openapi-dump` prints it for external tooling.

use crate::inbound::http::register::{RegisterFailureBody, RegisterRequestBody, RegisterSuccessBody};
use utoipa::OpenApi;

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Enrolment API",
        description = "Self-service creation of organisation directory accounts."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::register::register,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(RegisterRequestBody, RegisterSuccessBody, RegisterFailureBody)),
    tags(
        (name = "registration", description = "Account self-registration"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
