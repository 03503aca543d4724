mod common;

use std::path::Path;

use serde_json::json;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use azkaban_jobs::deploy::{DeployOptions, SessionDeployer, SessionId};
use azkaban_jobs::errors::AzkabanError;
use azkaban_jobs::fs::mock::MockFileSystem;

use common::{init_tracing, with_timeout};

fn deployer() -> SessionDeployer<MockFileSystem> {
    let fs = MockFileSystem::new();
    fs.add_file("jobs.zip", b"PK\x03\x04 fake archive".to_vec());
    SessionDeployer::with_fs(&DeployOptions::default(), fs).unwrap()
}

async fn mount_login(server: &MockServer, response: ResponseTemplate) {
    Mock::given(method("POST"))
        .and(path("/manager"))
        .and(body_string_contains("action=login"))
        .and(body_string_contains("username=alice"))
        .and(body_string_contains("password=s3cret"))
        .respond_with(response)
        .expect(1)
        .mount(server)
        .await;
}

#[test]
fn test_session_id_is_redacted_in_debug_output() {
    let id = SessionId::new("abc-123");
    assert_eq!(id.as_str(), "abc-123");
    assert!(!format!("{id:?}").contains("abc-123"));
}

#[tokio::test]
async fn test_login_returns_session_id() {
    init_tracing();
    with_timeout(async {
        let server = MockServer::start().await;
        mount_login(
            &server,
            ResponseTemplate::new(200)
                .set_body_json(json!({ "status": "success", "session.id": "abc-123" })),
        )
        .await;

        let endpoint = format!("{}/manager", server.uri());
        let session = deployer()
            .authenticate(&endpoint, "alice", "s3cret")
            .await
            .unwrap();
        assert_eq!(session, SessionId::new("abc-123"));
    })
    .await;
}

#[tokio::test]
async fn test_login_error_message_is_reported() {
    with_timeout(async {
        let server = MockServer::start().await;
        mount_login(
            &server,
            ResponseTemplate::new(200).set_body_json(json!({ "error": "Incorrect Login." })),
        )
        .await;

        let endpoint = format!("{}/manager", server.uri());
        match deployer().authenticate(&endpoint, "alice", "s3cret").await {
            Err(AzkabanError::Authentication(msg)) => assert_eq!(msg, "Incorrect Login."),
            other => panic!("Expected Authentication error, got: {:?}", other),
        }
    })
    .await;
}

#[tokio::test]
async fn test_login_without_session_id_fails() {
    with_timeout(async {
        let server = MockServer::start().await;
        mount_login(
            &server,
            ResponseTemplate::new(200).set_body_json(json!({ "status": "success" })),
        )
        .await;

        let endpoint = format!("{}/manager", server.uri());
        let result = deployer().authenticate(&endpoint, "alice", "s3cret").await;
        assert!(matches!(result, Err(AzkabanError::Authentication(_))));
    })
    .await;
}

#[tokio::test]
async fn test_login_with_unreadable_body_fails() {
    with_timeout(async {
        let server = MockServer::start().await;
        mount_login(
            &server,
            ResponseTemplate::new(200).set_body_string("<html>login</html>"),
        )
        .await;

        let endpoint = format!("{}/manager", server.uri());
        let result = deployer().authenticate(&endpoint, "alice", "s3cret").await;
        assert!(matches!(result, Err(AzkabanError::Authentication(_))));
    })
    .await;
}

#[tokio::test]
async fn test_login_server_error_is_transport_error() {
    with_timeout(async {
        let server = MockServer::start().await;
        mount_login(&server, ResponseTemplate::new(500)).await;

        let endpoint = format!("{}/manager", server.uri());
        let result = deployer().authenticate(&endpoint, "alice", "s3cret").await;
        assert!(matches!(result, Err(AzkabanError::DeploymentTransport(_))));
    })
    .await;
}

async fn mount_upload(server: &MockServer, response: ResponseTemplate) {
    Mock::given(method("POST"))
        .and(path("/manager"))
        .and(body_string_contains("name=\"action\""))
        .and(body_string_contains("upload"))
        .and(body_string_contains("name=\"session.id\""))
        .and(body_string_contains("abc-123"))
        .and(body_string_contains("name=\"project\""))
        .and(body_string_contains("filename=\"jobs.zip\""))
        .respond_with(response)
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_upload_without_failure_cookie_succeeds() {
    with_timeout(async {
        let server = MockServer::start().await;
        mount_upload(
            &server,
            ResponseTemplate::new(302).insert_header("Location", "/manager?project=etl"),
        )
        .await;

        let endpoint = format!("{}/manager", server.uri());
        deployer()
            .deploy_with_session(
                &endpoint,
                "etl",
                Path::new("jobs.zip"),
                &SessionId::new("abc-123"),
            )
            .await
            .unwrap();
    })
    .await;
}

#[tokio::test]
async fn test_failure_cookie_means_rejected() {
    with_timeout(async {
        let server = MockServer::start().await;
        mount_upload(
            &server,
            ResponseTemplate::new(302)
                .insert_header("Set-Cookie", "azkaban.failure.message=Project+not+found; Path=/")
                .insert_header("Location", "/manager?project=etl"),
        )
        .await;

        let endpoint = format!("{}/manager", server.uri());
        let result = deployer()
            .deploy_with_session(
                &endpoint,
                "etl",
                Path::new("jobs.zip"),
                &SessionId::new("abc-123"),
            )
            .await;
        match result {
            Err(AzkabanError::DeploymentRejected(msg)) => assert!(msg.contains("'etl'")),
            other => panic!("Expected DeploymentRejected, got: {:?}", other),
        }
    })
    .await;
}

#[tokio::test]
async fn test_upload_server_error_is_transport_error() {
    with_timeout(async {
        let server = MockServer::start().await;
        mount_upload(&server, ResponseTemplate::new(503)).await;

        let endpoint = format!("{}/manager", server.uri());
        let result = deployer()
            .deploy_with_session(
                &endpoint,
                "etl",
                Path::new("jobs.zip"),
                &SessionId::new("abc-123"),
            )
            .await;
        assert!(matches!(result, Err(AzkabanError::DeploymentTransport(_))));
    })
    .await;
}
