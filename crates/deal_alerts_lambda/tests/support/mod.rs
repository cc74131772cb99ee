#![allow(dead_code)]

use std::sync::Mutex;

use deal_alerts_core::config::{DealStoreConfig, NotifierConfig};
use deal_alerts_lambda::adapters::messenger::{MessageSender, SendMessageRequest};
use serde_json::{json, Value};

/// Sender that records every request and replies with a fixed result.
pub struct RecordingSender {
    reply: Result<Value, String>,
    requests: Mutex<Vec<SendMessageRequest>>,
}

impl RecordingSender {
    pub fn accepting(message_id: i64) -> Self {
        Self::replying(Ok(json!({
            "ok": true,
            "result": {"message_id": message_id, "chat": {"id": -100500}}
        })))
    }

    pub fn replying(reply: Result<Value, String>) -> Self {
        Self {
            reply,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<SendMessageRequest> {
        self.requests.lock().expect("poisoned mutex").clone()
    }
}

impl MessageSender for RecordingSender {
    fn send_message(&self, request: &SendMessageRequest) -> Result<Value, String> {
        self.requests
            .lock()
            .expect("poisoned mutex")
            .push(request.clone());
        self.reply.clone()
    }
}

pub fn configured_notifier() -> NotifierConfig {
    NotifierConfig::new(Some("123456:ABC-DEF".to_string()), Some("-100500".to_string()))
}

pub fn configured_store() -> DealStoreConfig {
    DealStoreConfig::new(Some("postgres://deals@localhost/deals".to_string()))
}

/// REST API proxy event with a string body, as API Gateway delivers it.
pub fn rest_event(method: &str, body: Option<Value>) -> Value {
    json!({
        "resource": "/",
        "path": "/",
        "httpMethod": method,
        "headers": {"Content-Type": "application/json", "X-User-Id": "user-1"},
        "requestContext": {"requestId": "req-1"},
        "body": body.map(|value| value.to_string()),
        "isBase64Encoded": false
    })
}

/// HTTP API (payload v2) event.
pub fn http_api_event(method: &str, body: Option<Value>) -> Value {
    json!({
        "version": "2.0",
        "rawPath": "/",
        "requestContext": {"http": {"method": method, "path": "/"}},
        "body": body.map(|value| value.to_string()),
        "isBase64Encoded": false
    })
}

pub fn assert_preflight(response: &deal_alerts_lambda::handlers::http::ApiGatewayResponse) {
    assert_eq!(response.status_code, 200);
    assert!(response.body.is_empty());
    assert_eq!(response.header("Access-Control-Allow-Origin"), Some("*"));
    assert_eq!(
        response.header("Access-Control-Allow-Methods"),
        Some("GET, POST, OPTIONS")
    );
    assert_eq!(
        response.header("Access-Control-Allow-Headers"),
        Some("Content-Type, X-User-Id")
    );
    assert_eq!(response.header("Access-Control-Max-Age"), Some("86400"));
}
