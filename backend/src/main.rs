//! Enrolment server entry-point: loads settings, builds the Google Directory
//! adapter and serves `POST /register`.

mod server;

use std::env;
use std::ffi::OsString;
use std::io;
use std::net::{SocketAddr, ToSocketAddrs};
use std::sync::Arc;

use actix_web::web;
use mockable::{DefaultClock, DefaultEnv};
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use enrolment::domain::AccountProvisioningService;
use enrolment::domain::ports::RandomStudentIdAllocator;
use enrolment::inbound::http::health::HealthState;
use enrolment::outbound::google::{GoogleDirectoryProvider, load_service_account_key};
use enrolment::settings::{DirectorySettings, ServerSettings, SettingsError};
use server::{ServerConfig, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let directory_settings = DirectorySettings::load_from_iter(program_name())
        .map_err(|error| startup_error(SettingsError::Load(error.to_string())))?;
    let server_settings = ServerSettings::load_from_iter(program_name())
        .map_err(|error| startup_error(SettingsError::Load(error.to_string())))?;

    let domain = directory_settings.workspace_domain().map_err(startup_error)?;
    let directory_config = directory_settings
        .directory_config()
        .map_err(startup_error)?;
    let credentials = directory_settings.credentials().map_err(startup_error)?;
    let key = load_service_account_key(credentials).map_err(startup_error)?;
    let provider =
        GoogleDirectoryProvider::new(&key, directory_config, Arc::new(DefaultClock))
            .map_err(startup_error)?;

    let registration = AccountProvisioningService::new(
        Arc::new(provider),
        Arc::new(RandomStudentIdAllocator),
        domain,
    );

    let bind_addr = resolve_bind_addr(&server_settings)?;
    info!(
        %bind_addr,
        domain = %registration.domain(),
        service_account = %key.client_email,
        "starting enrolment server"
    );

    let health_state = web::Data::new(HealthState::new());
    let config = ServerConfig::new(bind_addr, Arc::new(registration));
    create_server(health_state, config)?.await
}

/// Settings are read from the environment and config files; command-line
/// flags are not forwarded.
fn program_name() -> impl Iterator<Item = OsString> {
    env::args_os().take(1)
}

fn resolve_bind_addr(settings: &ServerSettings) -> io::Result<SocketAddr> {
    let port = settings.port(&DefaultEnv::new()).map_err(startup_error)?;
    (settings.host(), port)
        .to_socket_addrs()?
        .next()
        .ok_or_else(|| io::Error::other(format!("no address for {}:{port}", settings.host())))
}

fn startup_error(error: impl std::error::Error) -> io::Error {
    io::Error::other(error.to_string())
}
