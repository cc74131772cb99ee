use deal_alerts_core::config::NotifierConfig;
use deal_alerts_core::contract::{
    ErrorBody, NotifierStatus, NotifyRequest, NotifySuccess, BOT_RUNNING_STATUS,
    DEAL_SENT_MESSAGE,
};
use deal_alerts_core::message::render_deal_message;
use serde_json::Value;

use super::http::{
    error_response, json_response, method_not_allowed_response, preflight_response,
    request_body, request_method, validation_error_response, ApiGatewayResponse, HttpMethod,
};
use crate::adapters::messenger::{MessageSender, SendMessageRequest};

pub fn handle_notifier_event(
    event: Value,
    config: &NotifierConfig,
    sender: &dyn MessageSender,
) -> ApiGatewayResponse {
    let method = request_method(&event);
    let response = match method {
        HttpMethod::Options => preflight_response(),
        HttpMethod::Get => status_response(config),
        HttpMethod::Post => send_deal(&event, config, sender),
        HttpMethod::Other(_) => method_not_allowed_response(),
    };
    tracing::info!(
        component = "notifier",
        event = "request_completed",
        method = method.as_str(),
        status_code = response.status_code
    );
    response
}

fn status_response(config: &NotifierConfig) -> ApiGatewayResponse {
    json_response(
        200,
        NotifierStatus {
            status: BOT_RUNNING_STATUS.to_string(),
            configured: config.is_configured(),
        },
    )
}

fn send_deal(
    event: &Value,
    config: &NotifierConfig,
    sender: &dyn MessageSender,
) -> ApiGatewayResponse {
    let credentials = match config.credentials() {
        Ok(value) => value,
        Err(error) => {
            tracing::warn!(component = "notifier", event = "misconfiguration", error = %error);
            return error_response(500, ErrorBody::new(error.to_string()));
        }
    };

    let body = match request_body(event) {
        Ok(value) => value,
        Err(message) => return validation_error_response(&message),
    };
    let request = match serde_json::from_value::<NotifyRequest>(body) {
        Ok(value) => value,
        Err(error) => return validation_error_response(&format!("Malformed deal: {error}")),
    };
    let deal = request.deal.unwrap_or_default();

    let message = SendMessageRequest::html(credentials, render_deal_message(&deal));
    let envelope = match sender.send_message(&message) {
        Ok(value) => value,
        Err(error) => {
            tracing::warn!(component = "notifier", event = "send_failed", error = %error);
            return error_response(500, ErrorBody::with_details("Failed to send message", error));
        }
    };

    if envelope.get("ok").and_then(Value::as_bool).unwrap_or(false) {
        let message_id = envelope
            .pointer("/result/message_id")
            .and_then(Value::as_i64);
        tracing::info!(
            component = "notifier",
            event = "deal_sent",
            message_id = message_id,
            url = deal.url()
        );
        json_response(
            200,
            NotifySuccess {
                success: true,
                message: DEAL_SENT_MESSAGE.to_string(),
                message_id,
            },
        )
    } else {
        let description = envelope.get("description").and_then(Value::as_str);
        tracing::warn!(
            component = "notifier",
            event = "provider_rejected",
            description = description
        );
        error_response(
            500,
            ErrorBody::with_details("Telegram API error", envelope),
        )
    }
}
