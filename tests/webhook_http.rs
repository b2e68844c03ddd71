use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use webhook_relay::config::RelayConfig;
use webhook_relay::conversation::{ConversationOrchestrator, SessionFinalizer};
use webhook_relay::core::WebhookError;
use webhook_relay::session::SessionStore;
use webhook_relay::webhook::{WebhookClient, WebhookResult, WebhookTransport};

/// A request as seen by the test responder
#[derive(Debug)]
struct CapturedRequest {
    head: String,
    body: String,
}

impl CapturedRequest {
    fn header(&self, name: &str) -> Option<&str> {
        self.head.lines().skip(1).find_map(|line| {
            let (key, value) = line.split_once(':')?;
            key.trim()
                .eq_ignore_ascii_case(name)
                .then(|| value.trim())
        })
    }

    fn request_line(&self) -> &str {
        self.head.lines().next().unwrap_or_default()
    }

    fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).unwrap()
    }
}

/// Serve one canned response per connection, in order
async fn respond_with(
    responses: Vec<(u16, &'static str, String)>,
) -> (String, JoinHandle<Vec<CapturedRequest>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base_url = format!("http://{}/webhook", listener.local_addr().unwrap());

    let handle = tokio::spawn(async move {
        let mut captured = Vec::new();
        for (status, reason, body) in responses {
            let (mut socket, _) = listener.accept().await.unwrap();
            captured.push(read_request(&mut socket).await);

            let response = format!(
                "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                reason,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
        }
        captured
    });

    (base_url, handle)
}

async fn read_request(socket: &mut tokio::net::TcpStream) -> CapturedRequest {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    loop {
        let n = socket.read(&mut chunk).await.unwrap();
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);

        let text = String::from_utf8_lossy(&buf);
        if let Some(end) = text.find("\r\n\r\n") {
            let head = text[..end].to_string();
            let content_length = head
                .lines()
                .find_map(|line| {
                    let (key, value) = line.split_once(':')?;
                    key.eq_ignore_ascii_case("content-length")
                        .then(|| value.trim().parse::<usize>().ok())
                        .flatten()
                })
                .unwrap_or(0);
            if buf.len() >= end + 4 + content_length {
                let body = String::from_utf8_lossy(&buf[end + 4..end + 4 + content_length]).to_string();
                return CapturedRequest { head, body };
            }
        }
    }

    panic!("connection closed before a full request arrived");
}

fn client(base_url: &str) -> WebhookClient {
    let config = RelayConfig::new(base_url).with_request_timeout(Duration::from_secs(5));
    WebhookClient::new(&config).unwrap()
}

#[tokio::test]
async fn test_posts_json_to_tool_path() {
    let (base_url, server) = respond_with(vec![(200, "OK", r#"{"masked":"[회사명]"}"#.into())]).await;
    let client = client(&base_url);

    let result = client
        .invoke("maskSensitive", &json!({"content": "메이아이"}))
        .await;

    assert_eq!(result, WebhookResult::Success(json!({"masked": "[회사명]"})));

    let requests = server.await.unwrap();
    let request = &requests[0];
    assert_eq!(request.request_line(), "POST /webhook/mask-sensitive HTTP/1.1");
    assert_eq!(request.header("content-type"), Some("application/json"));
    assert!(request
        .header("user-agent")
        .unwrap()
        .starts_with("webhook-relay/"));
    assert_eq!(request.json(), json!({"content": "메이아이"}));
}

#[tokio::test]
async fn test_http_error_status() {
    let (base_url, server) =
        respond_with(vec![(500, "Internal Server Error", r#"{"message":"boom"}"#.into())]).await;
    let client = client(&base_url);

    let result = client.invoke("writeDraft", &json!({"title": "t"})).await;

    let err = result.error().unwrap();
    assert_eq!(err.status(), Some(500));
    assert!(err.to_string().contains("500"));
    server.await.unwrap();
}

#[tokio::test]
async fn test_non_json_body_is_text() {
    let (base_url, server) = respond_with(vec![(200, "OK", "Workflow was started".into())]).await;
    let client = client(&base_url);

    let result = client.invoke("writeDraft", &json!({})).await;

    assert_eq!(result, WebhookResult::Success(json!("Workflow was started")));
    server.await.unwrap();
}

#[tokio::test]
async fn test_connection_refused_is_network_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base_url = format!("http://{}/webhook", listener.local_addr().unwrap());
    drop(listener);

    let result = client(&base_url).invoke("maskSensitive", &json!({})).await;

    assert!(matches!(result.error(), Some(WebhookError::Network(_))));
}

#[tokio::test]
async fn test_timeout_is_network_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base_url = format!("http://{}/webhook", listener.local_addr().unwrap());

    // Accept and hold the connection without ever answering.
    let server = tokio::spawn(async move {
        let (socket, _) = listener.accept().await.unwrap();
        tokio::time::sleep(Duration::from_secs(5)).await;
        drop(socket);
    });

    let config = RelayConfig::new(base_url.as_str()).with_request_timeout(Duration::from_secs(1));
    let client = WebhookClient::new(&config).unwrap();

    let result = client.invoke("writeDraft", &json!({"title": "t"})).await;

    match result.error() {
        Some(WebhookError::Network(msg)) => assert!(msg.contains("timed out"), "{}", msg),
        other => panic!("expected a network error, got {:?}", other),
    }
    server.abort();
}

#[tokio::test]
async fn test_conversation_over_http() {
    let (base_url, server) = respond_with(vec![
        (
            200,
            "OK",
            json!({"reply": "Keywords?", "done": false, "missing": ["keywords"], "state": {"topic": "X"}})
                .to_string(),
        ),
        (
            200,
            "OK",
            json!({"reply": "Done.", "done": true, "missing": [], "state": {"topic": "X", "keywords": ["ai", "vision"]}})
                .to_string(),
        ),
        (200, "OK", r#"{"stored":true}"#.into()),
    ])
    .await;

    let store = SessionStore::new();
    let transport: Arc<dyn WebhookTransport> = Arc::new(client(&base_url));
    let orchestrator = ConversationOrchestrator::new(store.clone(), transport.clone());
    let finalizer = SessionFinalizer::new(store.clone(), transport);

    let first = orchestrator
        .start_or_advance("classifyIdea", "draft a post about X", None)
        .await
        .unwrap();
    assert!(!first.current_response.done);

    let second = orchestrator
        .continue_session(&first.session_id, "keywords: ai, vision")
        .await
        .unwrap();
    assert!(second.final_result.is_some());

    let completed = finalizer.complete(&first.session_id).await.unwrap();
    assert_eq!(completed.formatted, "topic: X\nkeywords: ai, vision");
    assert!(completed.webhook_result.is_success());

    let requests = server.await.unwrap();
    assert_eq!(requests.len(), 3);
    for request in &requests {
        assert_eq!(request.request_line(), "POST /webhook/classify-idea HTTP/1.1");
    }

    let turn = requests[1].json();
    assert_eq!(turn["status"], "classify-idea");
    assert_eq!(turn["text"], "keywords: ai, vision");
    assert_eq!(turn["state"], json!({"topic": "X"}));
    assert_eq!(turn["conversationContext"]["totalResponses"], 1);

    let completion = requests[2].json();
    assert_eq!(completion["status"], "classifyIdea-completed");
    assert_eq!(completion["conversationHistory"].as_array().unwrap().len(), 2);
}
