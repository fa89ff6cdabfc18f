//! HTTP inbound adapter exposing the registration endpoint.

pub mod error;
pub mod health;
pub mod register;
pub mod state;

use actix_web::web;

/// Register every HTTP route served by the application.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(register::json_config())
        .service(register::register)
        .service(health::ready)
        .service(health::live);
}
