use deal_alerts_core::config::NotifierConfig;
use deal_alerts_lambda::adapters::telegram::TelegramClient;
use deal_alerts_lambda::handlers::http::ApiGatewayResponse;
use deal_alerts_lambda::handlers::notifier::handle_notifier_event;
use deal_alerts_lambda::telemetry::init_tracing;
use lambda_runtime::{service_fn, Error, LambdaEvent};
use serde_json::Value;

struct RuntimeDependencies {
    config: NotifierConfig,
    telegram: TelegramClient,
}

async fn handle_request(
    event: LambdaEvent<Value>,
    deps: &RuntimeDependencies,
) -> Result<ApiGatewayResponse, Error> {
    Ok(handle_notifier_event(
        event.payload,
        &deps.config,
        &deps.telegram,
    ))
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    init_tracing();

    let config = NotifierConfig::from_env();
    tracing::info!(
        component = "notifier",
        event = "cold_start",
        configured = config.is_configured()
    );
    let deps = RuntimeDependencies {
        telegram: TelegramClient::new(&config.api_base_url),
        config,
    };

    let deps = &deps;
    lambda_runtime::run(service_fn(move |event: LambdaEvent<Value>| async move {
        handle_request(event, deps).await
    }))
    .await
}
