//! Tests the HTTP transport against a local mock webhook.

use deploy_notify::{HttpTransport, InvocationInput, NotificationDispatcher};
use serde_json::json;
use wiremock::matchers::{body_string, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn fixed_input() -> InvocationInput {
    InvocationInput {
        env_name: Some("pr-123".into()),
        pr_number: Some("123".into()),
        branch_name: Some("feature/x".into()),
        genu_url: Some("https://genu.example".into()),
        pr_url: Some("https://github.com/x/y/pull/123".into()),
        deploy_status: Some("✅ 成功".into()),
        deploy_timestamp: Some("2025-07-08 12:00:00 JST".into()),
    }
}

/// The blocking client cannot run on a runtime worker thread.
async fn dispatch_blocking(url: String, input: InvocationInput) -> deploy_notify::InvocationResult {
    tokio::task::spawn_blocking(move || {
        let dispatcher = NotificationDispatcher::new(Some(url), HttpTransport::new().unwrap());
        dispatcher.dispatch(input)
    })
    .await
    .unwrap()
}

#[tokio::test(flavor = "multi_thread")]
async fn test_posts_json_with_content_type_and_ordered_keys() {
    // Arrange
    let server = MockServer::start().await;
    let expected = r#"{"ENV_NAME":"pr-123","PR_NUMBER":"123","BRANCH_NAME":"feature/x","GENU_URL":"https://genu.example","PR_URL":"https://github.com/x/y/pull/123","DEPLOY_STATUS":"✅ 成功","DEPLOY_TIMESTAMP":"2025-07-08 12:00:00 JST"}"#;

    Mock::given(method("POST"))
        .and(path("/webhook"))
        .and(header("content-type", "application/json"))
        .and(body_string(expected))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .expect(1)
        .mount(&server)
        .await;

    // Act
    let result = dispatch_blocking(format!("{}/webhook", server.uri()), fixed_input()).await;

    // Assert
    assert_eq!(result.status_code, 200);
    let body = result.body_json().unwrap();
    assert_eq!(body["payload"]["PR_URL"], "https://github.com/x/y/pull/123");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_non_200_status_is_passed_through() {
    // Arrange
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/webhook"))
        .respond_with(ResponseTemplate::new(503).set_body_string("service unavailable"))
        .expect(1)
        .mount(&server)
        .await;

    // Act
    let result = dispatch_blocking(format!("{}/webhook", server.uri()), fixed_input()).await;

    // Assert
    assert_eq!(result.status_code, 503);
    assert_eq!(
        result.body_json().unwrap(),
        json!({ "error": "Slack API returned status 503", "response": "service unavailable" })
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn test_other_success_codes_are_not_treated_as_success() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let result = dispatch_blocking(server.uri(), fixed_input()).await;

    assert_eq!(result.status_code, 204);
    assert_eq!(result.body_json().unwrap()["response"], "");
}

#[test]
fn test_connection_refused_is_a_transport_failure() {
    // Grab a free port, then close it so nothing is listening.
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let dispatcher = NotificationDispatcher::new(
        Some(format!("http://127.0.0.1:{}/webhook", port)),
        HttpTransport::new().unwrap(),
    );

    let result = dispatcher.dispatch(fixed_input());

    assert_eq!(result.status_code, 500);
    let error = result.body_json().unwrap()["error"].as_str().unwrap().to_string();
    assert!(error.starts_with("Failed to send Slack notification: "), "{}", error);
}

#[test]
fn test_invalid_url_is_a_transport_failure() {
    let dispatcher = NotificationDispatcher::new(Some("not a url".into()), HttpTransport::new().unwrap());

    let result = dispatcher.dispatch(fixed_input());

    assert_eq!(result.status_code, 500);
}
