use deal_alerts_core::config::DealStoreConfig;
use deal_alerts_lambda::adapters::postgres::PostgresDealRepository;
use deal_alerts_lambda::handlers::deal_store::handle_deal_store_event;
use deal_alerts_lambda::handlers::http::ApiGatewayResponse;
use deal_alerts_lambda::telemetry::init_tracing;
use lambda_runtime::{service_fn, Error, LambdaEvent};
use serde_json::Value;

async fn handle_request(
    event: LambdaEvent<Value>,
    config: &DealStoreConfig,
) -> Result<ApiGatewayResponse, Error> {
    Ok(handle_deal_store_event(
        event.payload,
        config,
        &PostgresDealRepository,
    ))
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    init_tracing();

    let config = DealStoreConfig::from_env();
    if config.ensure_schema {
        if let Ok(database_url) = config.database_url() {
            PostgresDealRepository
                .ensure_schema(database_url)
                .await
                .map_err(|error| Error::from(format!("failed to apply schema: {error}")))?;
            tracing::info!(component = "deal_store", event = "schema_ensured");
        }
    }

    let config = &config;
    lambda_runtime::run(service_fn(move |event: LambdaEvent<Value>| async move {
        handle_request(event, config).await
    }))
    .await
}
