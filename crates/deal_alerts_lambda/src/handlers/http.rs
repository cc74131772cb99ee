//! API Gateway proxy event parsing and response envelopes shared by both handlers.

use deal_alerts_core::contract::ErrorBody;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

pub const ALLOWED_METHODS: &str = "GET, POST, OPTIONS";
pub const ALLOWED_HEADERS: &str = "Content-Type, X-User-Id";
pub const PREFLIGHT_MAX_AGE_SECS: &str = "86400";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiGatewayResponse {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub headers: Value,
    #[serde(rename = "isBase64Encoded", default)]
    pub is_base64_encoded: bool,
    pub body: String,
}

impl ApiGatewayResponse {
    /// Parses the body back into JSON; an empty body yields `Value::Null`.
    pub fn json_body(&self) -> Result<Value, serde_json::Error> {
        if self.body.is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&self.body)
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(Value::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HttpMethod {
    Options,
    Get,
    Post,
    Other(String),
}

impl HttpMethod {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_uppercase().as_str() {
            "OPTIONS" => Self::Options,
            "GET" => Self::Get,
            "POST" => Self::Post,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Options => "OPTIONS",
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Other(method) => method,
        }
    }
}

/// Reads the request method from a REST (`httpMethod`) or HTTP API
/// (`requestContext.http.method`) event. Events without either are `GET`.
pub fn request_method(event: &Value) -> HttpMethod {
    event
        .get("httpMethod")
        .and_then(Value::as_str)
        .or_else(|| {
            event
                .pointer("/requestContext/http/method")
                .and_then(Value::as_str)
        })
        .map(HttpMethod::parse)
        .unwrap_or(HttpMethod::Get)
}

/// Extracts the JSON body of a proxy event. Missing or null bodies become `{}`.
pub fn request_body(event: &Value) -> Result<Value, String> {
    let Some(object) = event.as_object() else {
        return Err("Request payload must be a JSON object".to_string());
    };

    let Some(body) = object.get("body") else {
        return Ok(json!({}));
    };

    match body {
        Value::Null => Ok(json!({})),
        Value::Object(_) => Ok(body.clone()),
        Value::String(text) if text.trim().is_empty() => Ok(json!({})),
        Value::String(text) => {
            let parsed: Value = serde_json::from_str(text)
                .map_err(|error| format!("Malformed JSON body: {error}"))?;
            if parsed.is_object() {
                Ok(parsed)
            } else {
                Err("Request body must be a JSON object".to_string())
            }
        }
        _ => Err("Request body must be a JSON object".to_string()),
    }
}

pub fn preflight_response() -> ApiGatewayResponse {
    ApiGatewayResponse {
        status_code: 200,
        headers: json!({
            "Access-Control-Allow-Origin": "*",
            "Access-Control-Allow-Methods": ALLOWED_METHODS,
            "Access-Control-Allow-Headers": ALLOWED_HEADERS,
            "Access-Control-Max-Age": PREFLIGHT_MAX_AGE_SECS,
        }),
        is_base64_encoded: false,
        body: String::new(),
    }
}

pub fn json_response(status_code: u16, payload: impl Serialize) -> ApiGatewayResponse {
    match serde_json::to_string(&payload) {
        Ok(body) => ApiGatewayResponse {
            status_code,
            headers: json_headers(),
            is_base64_encoded: false,
            body,
        },
        Err(error) => error_response(
            500,
            ErrorBody::with_details("serialization_error", error.to_string()),
        ),
    }
}

pub fn error_response(status_code: u16, payload: ErrorBody) -> ApiGatewayResponse {
    ApiGatewayResponse {
        status_code,
        headers: json_headers(),
        is_base64_encoded: false,
        body: json!(payload).to_string(),
    }
}

pub fn method_not_allowed_response() -> ApiGatewayResponse {
    error_response(405, ErrorBody::new("Method not allowed"))
}

pub fn validation_error_response(message: &str) -> ApiGatewayResponse {
    ApiGatewayResponse {
        status_code: 400,
        headers: json_headers(),
        is_base64_encoded: false,
        body: json!({
            "error": "validation_error",
            "message": message,
        })
        .to_string(),
    }
}

fn json_headers() -> Value {
    json!({
        "Content-Type": "application/json",
        "Access-Control-Allow-Origin": "*",
    })
}
