use parley::backend::{BackendError, ChatBackend, HttpBackend};
use serde_json::json;
use tokio_test::{assert_err, assert_ok};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_json, header, method, path},
};

// ============================================================================
// POST /chat
// ============================================================================

#[tokio::test]
async fn test_chat_sends_message_and_returns_reply() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({ "message": "Hello there" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "response": "Hi! <b>Welcome</b>",
            "user_message": "Hello there"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let backend = HttpBackend::new(mock_server.uri());
    let reply = assert_ok!(backend.send_message("Hello there").await);
    assert_eq!(reply, "Hi! <b>Welcome</b>");
}

#[tokio::test]
async fn test_chat_sends_message_verbatim() {
    let mock_server = MockServer::start().await;
    let message = "line one\nline two <script>x</script>";

    Mock::given(method("POST"))
        .and(path("/chat"))
        .and(body_json(json!({ "message": message })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "response": "ok" })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let backend = HttpBackend::new(format!("{}/", mock_server.uri()));
    assert_ok!(backend.send_message(message).await);
}

#[tokio::test]
async fn test_chat_server_error_is_status() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "error": "Internal server error"
        })))
        .mount(&mock_server)
        .await;

    let backend = HttpBackend::new(mock_server.uri());
    let err = assert_err!(backend.send_message("Hello").await);
    match err {
        BackendError::Status { status, body } => {
            assert_eq!(status, 500);
            assert!(body.contains("Internal server error"));
        }
        other => panic!("expected Status error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_chat_bad_request_is_status() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "No message provided"
        })))
        .mount(&mock_server)
        .await;

    let backend = HttpBackend::new(mock_server.uri());
    let err = assert_err!(backend.send_message("x").await);
    assert!(matches!(err, BackendError::Status { status: 400, .. }));
    assert!(!err.is_retryable());
}

#[tokio::test]
async fn test_chat_invalid_json_is_parse_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&mock_server)
        .await;

    let backend = HttpBackend::new(mock_server.uri());
    let err = assert_err!(backend.send_message("Hello").await);
    assert!(matches!(err, BackendError::Parse(_)), "got {:?}", err);
}

#[tokio::test]
async fn test_chat_missing_response_field_is_parse_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "reply": "wrong key" })))
        .mount(&mock_server)
        .await;

    let backend = HttpBackend::new(mock_server.uri());
    let err = assert_err!(backend.send_message("Hello").await);
    assert!(matches!(err, BackendError::Parse(_)), "got {:?}", err);
}

#[tokio::test]
async fn test_chat_unreachable_server_is_network_error() {
    // Start and drop a server to get a port nobody is listening on
    let uri = {
        let mock_server = MockServer::start().await;
        mock_server.uri()
    };

    let backend = HttpBackend::new(uri);
    let err = assert_err!(backend.send_message("Hello").await);
    assert!(matches!(err, BackendError::Network(_)), "got {:?}", err);
    assert!(err.is_retryable());
}

// ============================================================================
// GET /config and GET /health
// ============================================================================

#[tokio::test]
async fn test_fetch_profile() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/config"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "bot_name": "Helper",
            "greeting_message": "Hello! How can I help you today?"
        })))
        .mount(&mock_server)
        .await;

    let backend = HttpBackend::new(mock_server.uri());
    let profile = assert_ok!(backend.fetch_profile().await);
    assert_eq!(profile.bot_name.as_deref(), Some("Helper"));
    assert_eq!(
        profile.greeting_message.as_deref(),
        Some("Hello! How can I help you today?")
    );
}

#[tokio::test]
async fn test_fetch_profile_missing_endpoint() {
    let mock_server = MockServer::start().await;

    let backend = HttpBackend::new(mock_server.uri());
    let err = assert_err!(backend.fetch_profile().await);
    assert!(matches!(err, BackendError::Status { status: 404, .. }));
}

#[tokio::test]
async fn test_health_reports_status_and_details() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "healthy",
            "openai_configured": true
        })))
        .mount(&mock_server)
        .await;

    let backend = HttpBackend::new(mock_server.uri());
    let health = assert_ok!(backend.health().await);
    assert!(health.is_healthy());
    assert_eq!(health.details.get("openai_configured"), Some(&json!(true)));
}
