//! Terminal registration client: checks a submission locally, then posts it
//! to a running enrolment server.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::env;
use std::io;
use std::time::Duration;

use clap::Parser;
use reqwest::{Client, StatusCode, Url};
use tokio::runtime::Builder;

use enrolment::domain::{RegistrationRequest, ValidatedRegistration, validate_submission};
use enrolment::inbound::http::register::{
    RegisterFailureBody, RegisterRequestBody, RegisterSuccessBody,
};

const PASSWORD_ENV: &str = "ENROL_PASSWORD";
const CONFIRMATION_ENV: &str = "ENROL_PASSWORD_CONFIRM";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// `enrol` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "enrol",
    about = "Request an organisation account from an enrolment server",
    version
)]
struct CliArgs {
    #[arg(long = "last-name", value_name = "name", default_value = "")]
    last_name: String,
    #[arg(long = "first-name", value_name = "name", default_value = "")]
    first_name: String,
    /// Desired account name: lowercase letters, digits, dots and hyphens.
    #[arg(long, value_name = "handle", default_value = "")]
    username: String,
    #[arg(long = "recovery-email", value_name = "address", default_value = "")]
    recovery_email: String,
    /// Password. Falls back to `ENROL_PASSWORD` when omitted.
    #[arg(long, value_name = "password")]
    password: Option<String>,
    /// Password confirmation. Falls back to `ENROL_PASSWORD_CONFIRM`.
    #[arg(long = "confirm-password", value_name = "password")]
    confirm_password: Option<String>,
    /// Enrolment server base URL.
    #[arg(long, value_name = "url", default_value = "http://localhost:3000")]
    server: String,
}

/// Failures reported to the terminal.
#[derive(Debug, thiserror::Error)]
enum EnrolError {
    #[error("{0}")]
    Refused(String),
    #[error("registration failed with status {0}")]
    UnexpectedStatus(StatusCode),
    #[error("invalid server URL: {0}")]
    Url(#[from] url::ParseError),
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

fn main() -> io::Result<()> {
    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|error| io::Error::other(format!("create Tokio runtime: {error}")))?;
    runtime.block_on(async_main())
}

async fn async_main() -> io::Result<()> {
    let args = CliArgs::try_parse().map_err(io::Error::other)?;
    let password = resolve_secret(args.password.clone(), PASSWORD_ENV);
    let confirmation = resolve_secret(args.confirm_password.clone(), CONFIRMATION_ENV);
    let request = RegistrationRequest {
        family_name: args.last_name,
        given_name: args.first_name,
        handle: args.username,
        password,
        recovery_email: args.recovery_email,
    };

    let accepted = validate_submission(&request, Some(confirmation.as_str()))
        .map_err(|error| io::Error::new(io::ErrorKind::InvalidInput, error.to_string()))?;

    let client = Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()
        .map_err(|error| io::Error::other(EnrolError::from(error).to_string()))?;
    let created = submit(&client, &args.server, request_body(&accepted))
        .await
        .map_err(|error| io::Error::other(error.to_string()))?;

    println!("{}", created.message);
    println!("username={}", created.username);
    println!("student_id={}", created.student_id);
    Ok(())
}

fn resolve_secret(explicit: Option<String>, env_name: &str) -> String {
    explicit
        .or_else(|| env::var(env_name).ok())
        .unwrap_or_default()
}

/// Body sent to the server: the trimmed values the local check accepted.
fn request_body(accepted: &ValidatedRegistration) -> RegisterRequestBody {
    RegisterRequestBody {
        last_name: Some(accepted.name().family_name.clone()),
        first_name: Some(accepted.name().given_name.clone()),
        username: Some(accepted.handle().as_ref().to_owned()),
        password: Some(accepted.password().expose().to_owned()),
        recovery_email: Some(accepted.recovery_email().to_owned()),
    }
}

async fn submit(
    client: &Client,
    server: &str,
    body: RegisterRequestBody,
) -> Result<RegisterSuccessBody, EnrolError> {
    let endpoint = Url::parse(&format!("{}/", server.trim_end_matches('/')))?.join("register")?;
    let response = client.post(endpoint).json(&body).send().await?;
    let status = response.status();
    if status == StatusCode::CREATED {
        return Ok(response.json::<RegisterSuccessBody>().await?);
    }
    match response.json::<RegisterFailureBody>().await {
        Ok(failure) => Err(EnrolError::Refused(failure.message)),
        Err(_) => Err(EnrolError::UnexpectedStatus(status)),
    }
}
