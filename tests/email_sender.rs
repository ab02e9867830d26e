use base64::{Engine as _, engine::general_purpose::STANDARD};
use serde_json::{Value, json};
use std::fs;
use tempfile::tempdir;
use tilfetch::facts::FactRecord;
use tilfetch::output::{EmailConfig, EmailSender, OutputError};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_partial_json, header, method, path},
};

fn sender(server: &MockServer) -> EmailSender {
    EmailSender::new(EmailConfig {
        server_token: "pm-token".to_string(),
        sender: "facts@example.com".to_string(),
        api_url: server.uri(),
    })
    .unwrap()
}

fn accepted() -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "To": "reader@example.com",
        "ErrorCode": 0,
        "Message": "OK"
    }))
}

#[tokio::test]
async fn test_send_digest() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/email"))
        .and(header("X-Postmark-Server-Token", "pm-token"))
        .and(body_partial_json(json!({
            "From": "facts@example.com",
            "To": "reader@example.com",
            "Subject": "Today's Interesting Facts",
            "TextBody": "Today's Interesting Facts:\n\n1. The moon has moonquakes.\n   Source: http://x\n\n"
        })))
        .respond_with(accepted())
        .expect(1)
        .mount(&mock_server)
        .await;

    let facts = vec![FactRecord {
        text: "The moon has moonquakes.".to_string(),
        source_url: Some("http://x".to_string()),
        score: Some(50),
    }];

    sender(&mock_server)
        .send_digest("  reader@example.com ", &facts)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_send_file_attaches_contents() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/email"))
        .respond_with(accepted())
        .expect(1)
        .mount(&mock_server)
        .await;

    let dir = tempdir().unwrap();
    let file = dir.path().join("til_facts_2.txt");
    fs::write(&file, "1. Bees can count.\n").unwrap();

    sender(&mock_server)
        .send_file("reader@example.com", &file)
        .await
        .unwrap();

    let requests = mock_server.received_requests().await.unwrap();
    let body: Value = requests[0].body_json().unwrap();
    let attachment = &body["Attachments"][0];

    assert_eq!(attachment["Name"], "til_facts_2.txt");
    assert_eq!(attachment["ContentType"], "text/plain");
    let decoded = STANDARD
        .decode(attachment["Content"].as_str().unwrap())
        .unwrap();
    assert_eq!(decoded, b"1. Bees can count.\n");
}

#[tokio::test]
async fn test_rejected_by_postmark() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/email"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "ErrorCode": 300,
            "Message": "Invalid 'From' address"
        })))
        .mount(&mock_server)
        .await;

    let result = sender(&mock_server)
        .send_digest("reader@example.com", &[])
        .await;

    match result {
        Err(OutputError::EmailRejected { status, message }) => {
            assert_eq!(status.as_u16(), 422);
            assert_eq!(message, "Invalid 'From' address");
        }
        other => panic!("Expected EmailRejected error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_invalid_recipient_sends_nothing() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(accepted())
        .expect(0)
        .mount(&mock_server)
        .await;

    let result = sender(&mock_server).send_digest("not-an-address", &[]).await;

    assert!(matches!(result, Err(OutputError::InvalidRecipient(_))));
}

#[tokio::test]
async fn test_missing_attachment() {
    let mock_server = MockServer::start().await;
    let dir = tempdir().unwrap();

    let result = sender(&mock_server)
        .send_file("reader@example.com", &dir.path().join("missing.txt"))
        .await;

    assert!(matches!(result, Err(OutputError::Io { .. })));
}
