//! Directory adapter behaviour against a wiremock Google stand-in.

use std::sync::Arc;
use std::time::Duration;

use chrono::{TimeZone, Utc};
use rstest::rstest;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::*;
use crate::domain::ports::AccountRegistration;
use crate::domain::{
    AccountAddress, AccountHandle, AccountProvisioningService, InitialPassword,
    OrganisationDomain, PersonName, RegistrationRequest, StudentId,
};
use crate::outbound::google::test_keys::service_account_key;
use crate::test_support::clock::MutableClock;
use crate::test_support::directory::FixedStudentIdAllocator;

const USERS: &str = "/admin/directory/v1/users";

fn account() -> ProvisionedAccount {
    let handle = AccountHandle::new("anna.lee").expect("valid handle");
    let domain = OrganisationDomain::new("org.example").expect("valid domain");
    ProvisionedAccount::new(
        StudentId::parse("S123456").expect("valid id"),
        AccountAddress::for_handle(&handle, &domain),
        PersonName {
            given_name: "Anna".to_owned(),
            family_name: "Lee".to_owned(),
        },
        InitialPassword::new("Secret123").expect("valid password"),
        Some("a@x.com".to_owned()),
    )
}

fn provider(server: &MockServer, timeout: Duration) -> GoogleDirectoryProvider {
    let clock = Utc
        .with_ymd_and_hms(2024, 9, 1, 8, 0, 0)
        .single()
        .expect("valid timestamp");
    GoogleDirectoryProvider::new(
        &service_account_key(None),
        GoogleDirectoryConfig {
            admin_email: "admin@org.example".to_owned(),
            base_url: server.uri(),
            token_uri: Some(format!("{}/token", server.uri())),
            timeout,
        },
        Arc::new(MutableClock::new(clock)),
    )
    .expect("provider builds")
}

async fn mount_token(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "ya29.directory",
            "expires_in": 3599,
            "token_type": "Bearer"
        })))
        .mount(server)
        .await;
}

async fn mount_users(server: &MockServer, response: ResponseTemplate) {
    Mock::given(method("POST"))
        .and(path(USERS))
        .respond_with(response)
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn inserts_the_user_with_a_bearer_token() {
    let server = MockServer::start().await;
    mount_token(&server).await;
    Mock::given(method("POST"))
        .and(path(USERS))
        .and(header("authorization", "Bearer ya29.directory"))
        .and(body_json(json!({
            "primaryEmail": "anna.lee@org.example",
            "name": { "givenName": "Anna", "familyName": "Lee" },
            "password": "Secret123",
            "changePasswordAtNextLogin": true,
            "recoveryEmail": "a@x.com",
            "externalIds": [{ "type": "organization", "value": "S123456" }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "kind": "admin#directory#user",
            "id": "1045",
            "primaryEmail": "anna.lee@org.example"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let created = provider(&server, Duration::from_secs(5))
        .create_account(&account())
        .await
        .expect("account created");
    assert_eq!(created.primary_email.as_deref(), Some("anna.lee@org.example"));
}

#[rstest]
#[case(ResponseTemplate::new(200), None)]
#[case(ResponseTemplate::new(200).set_body_json(json!({ "id": "1045" })), None)]
#[case(
    ResponseTemplate::new(201).set_body_json(json!({ "primaryEmail": "anna.lee@alias.example" })),
    Some("anna.lee@alias.example")
)]
#[tokio::test]
async fn reports_the_confirmed_address_when_present(
    #[case] response: ResponseTemplate,
    #[case] expected: Option<&str>,
) {
    let server = MockServer::start().await;
    mount_token(&server).await;
    mount_users(&server, response).await;

    let created = provider(&server, Duration::from_secs(5))
        .create_account(&account())
        .await
        .expect("account created");
    assert_eq!(created.primary_email.as_deref(), expected);
}

#[rstest]
#[case(
    ResponseTemplate::new(409).set_body_json(json!({
        "error": { "code": 409, "message": "Entity already exists." }
    })),
    DirectoryProviderError::rejected(409_u16, Some("Entity already exists.".to_owned()))
)]
#[case(
    ResponseTemplate::new(403).set_body_json(json!({
        "error": { "code": 403, "message": "Not Authorized to access this resource/api" }
    })),
    DirectoryProviderError::rejected(
        403_u16,
        Some("Not Authorized to access this resource/api".to_owned()),
    )
)]
#[case(
    ResponseTemplate::new(400).set_body_json(json!({
        "error": { "code": 400, "message": "   " }
    })),
    DirectoryProviderError::rejected(400_u16, None::<String>)
)]
#[case(
    ResponseTemplate::new(500).set_body_string("<html>backend error</html>"),
    DirectoryProviderError::rejected(500_u16, None::<String>)
)]
#[tokio::test]
async fn maps_refusals_to_rejections(
    #[case] response: ResponseTemplate,
    #[case] expected: DirectoryProviderError,
) {
    let server = MockServer::start().await;
    mount_token(&server).await;
    mount_users(&server, response).await;

    let error = provider(&server, Duration::from_secs(5))
        .create_account(&account())
        .await
        .expect_err("directory refused");
    assert_eq!(error, expected);
}

#[rstest]
#[case(ResponseTemplate::new(200).set_body_string("{\"primaryEmail\": 42"))]
#[case(ResponseTemplate::new(201).set_body_string("created"))]
#[tokio::test]
async fn undecodable_success_bodies_still_count_as_created(#[case] response: ResponseTemplate) {
    let server = MockServer::start().await;
    mount_token(&server).await;
    mount_users(&server, response).await;

    let created = provider(&server, Duration::from_secs(5))
        .create_account(&account())
        .await
        .expect("account created");
    assert_eq!(created.primary_email, None);
}

#[tokio::test]
async fn registration_succeeds_when_the_created_user_echo_is_unreadable() {
    let server = MockServer::start().await;
    mount_token(&server).await;
    mount_users(&server, ResponseTemplate::new(201).set_body_string("created")).await;
    let service = AccountProvisioningService::new(
        Arc::new(provider(&server, Duration::from_secs(5))),
        Arc::new(FixedStudentIdAllocator(
            StudentId::parse("S123456").expect("valid id"),
        )),
        OrganisationDomain::new("org.example").expect("valid domain"),
    );

    let receipt = service
        .register(RegistrationRequest {
            family_name: "Lee".to_owned(),
            given_name: "Anna".to_owned(),
            handle: "anna.lee".to_owned(),
            password: "Secret123".to_owned(),
            recovery_email: "a@x.com".to_owned(),
        })
        .await
        .expect("registration succeeds");
    assert_eq!(receipt.address, "anna.lee@org.example");
    assert_eq!(receipt.student_id.to_string(), "S123456");
}

#[tokio::test]
async fn slow_directories_time_out() {
    let server = MockServer::start().await;
    mount_token(&server).await;
    mount_users(
        &server,
        ResponseTemplate::new(200)
            .set_delay(Duration::from_millis(500))
            .set_body_json(json!({ "primaryEmail": "anna.lee@org.example" })),
    )
    .await;

    let error = provider(&server, Duration::from_millis(100))
        .create_account(&account())
        .await
        .expect_err("request timed out");
    assert!(matches!(error, DirectoryProviderError::Timeout { .. }));
}

#[tokio::test]
async fn token_refusal_skips_the_users_call() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "invalid_grant",
            "error_description": "Invalid JWT Signature."
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(USERS))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let error = provider(&server, Duration::from_secs(5))
        .create_account(&account())
        .await
        .expect_err("token refused");
    assert_eq!(
        error,
        DirectoryProviderError::unauthenticated("invalid_grant: Invalid JWT Signature.")
    );
}

#[rstest]
#[case("https://admin.googleapis.com")]
#[case("https://admin.googleapis.com/")]
fn users_endpoint_ignores_trailing_slashes(#[case] base: &str) {
    let endpoint = users_endpoint(base).expect("valid base");
    assert_eq!(
        endpoint.as_str(),
        "https://admin.googleapis.com/admin/directory/v1/users"
    );
}

#[test]
fn rejects_unparseable_base_urls() {
    assert!(matches!(
        users_endpoint("not a url"),
        Err(DirectoryClientError::Url { .. })
    ));
}

#[rstest]
#[case(b"  short\n body ".as_slice(), "short body")]
#[case(&[b'x'; 200], "")]
fn previews_are_compact_and_bounded(#[case] body: &[u8], #[case] expected_prefix: &str) {
    let preview = body_preview(body);
    assert!(preview.starts_with(expected_prefix));
    assert!(preview.chars().count() <= 163);
}
