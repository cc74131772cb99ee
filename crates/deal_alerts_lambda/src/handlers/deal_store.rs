use deal_alerts_core::config::DealStoreConfig;
use deal_alerts_core::contract::{
    DealListResponse, DealView, ErrorBody, HotDealQuery, NewDeal, SeedResponse,
    SEED_COMPLETED_MESSAGE,
};
use deal_alerts_core::samples::sample_deals;
use serde_json::Value;

use super::http::{
    error_response, json_response, method_not_allowed_response, preflight_response,
    request_method, ApiGatewayResponse, HttpMethod,
};
use crate::adapters::deal_repository::{DealRepository, StoreError};

pub fn handle_deal_store_event(
    event: Value,
    config: &DealStoreConfig,
    repository: &dyn DealRepository,
) -> ApiGatewayResponse {
    let method = request_method(&event);
    let response = match method {
        HttpMethod::Options => preflight_response(),
        HttpMethod::Get => list_deals(config, repository),
        HttpMethod::Post => seed_deals(config, repository, &sample_deals()),
        HttpMethod::Other(_) => method_not_allowed_response(),
    };
    tracing::info!(
        component = "deal_store",
        event = "request_completed",
        method = method.as_str(),
        status_code = response.status_code
    );
    response
}

fn list_deals(config: &DealStoreConfig, repository: &dyn DealRepository) -> ApiGatewayResponse {
    let database_url = match config.database_url() {
        Ok(value) => value,
        Err(error) => return misconfiguration_response(error),
    };

    match repository.list_hot_deals(database_url, &HotDealQuery::default()) {
        Ok(records) => {
            let deals: Vec<DealView> = records.iter().map(DealView::from).collect();
            tracing::info!(component = "deal_store", event = "deals_listed", count = deals.len());
            json_response(
                200,
                DealListResponse {
                    count: deals.len(),
                    deals,
                },
            )
        }
        Err(error) => store_error_response("list_failed", &error),
    }
}

/// Upserts `deals` in one batch. The sample list is the only caller today; a
/// scraper would feed its results through the same path.
pub fn seed_deals(
    config: &DealStoreConfig,
    repository: &dyn DealRepository,
    deals: &[NewDeal],
) -> ApiGatewayResponse {
    let database_url = match config.database_url() {
        Ok(value) => value,
        Err(error) => return misconfiguration_response(error),
    };

    match repository.upsert_deals(database_url, deals) {
        Ok(new_deals) => {
            tracing::info!(component = "deal_store", event = "deals_upserted", count = new_deals.len());
            json_response(
                200,
                SeedResponse {
                    message: SEED_COMPLETED_MESSAGE.to_string(),
                    count: new_deals.len(),
                    new_deals,
                },
            )
        }
        Err(error) => store_error_response("upsert_failed", &error),
    }
}

fn misconfiguration_response(error: deal_alerts_core::config::ConfigError) -> ApiGatewayResponse {
    tracing::warn!(component = "deal_store", event = "misconfiguration", error = %error);
    error_response(500, ErrorBody::new(error.to_string()))
}

fn store_error_response(event: &str, error: &StoreError) -> ApiGatewayResponse {
    tracing::warn!(component = "deal_store", event = event, error = %error);
    error_response(
        500,
        ErrorBody::with_details("Database error", error.to_string()),
    )
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use deal_alerts_core::contract::DealRecord;
    use serde_json::json;

    use super::*;
    use crate::adapters::memory::InMemoryDealRepository;

    fn configured() -> DealStoreConfig {
        DealStoreConfig::new(Some("postgres://deals@localhost/deals".to_string()))
    }

    fn record(id: i32, discount: i32, hour: u32) -> DealRecord {
        DealRecord {
            id,
            destination: format!("destination-{id}"),
            image_url: Some(format!("https://images.example/{id}.jpg")),
            current_price: 500,
            original_price: 1000,
            discount,
            url: format!("https://travelata.ru/deal/{id}"),
            found_at: Some(
                Utc.with_ymd_and_hms(2026, 5, 1, hour, 0, 0)
                    .single()
                    .expect("valid timestamp"),
            ),
        }
    }

    #[test]
    fn lists_hot_deals_newest_first() {
        let repository = InMemoryDealRepository::with_rows(vec![
            record(1, 50, 8),
            record(2, 40, 12),
            record(3, 70, 10),
        ]);
        let response =
            handle_deal_store_event(json!({"httpMethod": "GET"}), &configured(), &repository);

        assert_eq!(response.status_code, 200);
        let body = response.json_body().expect("json body");
        assert_eq!(body["count"], json!(2));
        assert_eq!(body["deals"][0]["id"], json!(3));
        assert_eq!(body["deals"][1]["id"], json!(1));
        assert_eq!(body["deals"][0]["imageUrl"], json!("https://images.example/3.jpg"));
        assert_eq!(body["deals"][0]["foundAt"], json!("2026-05-01T10:00:00+00:00"));
    }

    #[test]
    fn seeding_returns_all_sample_deals() {
        let repository = InMemoryDealRepository::new();
        let response =
            handle_deal_store_event(json!({"httpMethod": "POST"}), &configured(), &repository);

        assert_eq!(response.status_code, 200);
        let body = response.json_body().expect("json body");
        assert_eq!(body["message"], json!("Parsing completed"));
        assert_eq!(body["count"], json!(3));
        assert_eq!(body["newDeals"][1]["destination"], json!("Турция, Анталия"));
        assert_eq!(body["newDeals"][1]["currentPrice"], json!(899));
        assert_eq!(body["newDeals"][1]["discount"], json!(53));
        assert_eq!(body["newDeals"][1]["url"], json!("https://travelata.ru/deal/turkey"));
    }

    #[test]
    fn missing_database_url_fails_for_reads_and_writes() {
        let repository = InMemoryDealRepository::new();
        let config = DealStoreConfig::new(None);

        for method in ["GET", "POST"] {
            let response =
                handle_deal_store_event(json!({"httpMethod": method}), &config, &repository);
            assert_eq!(response.status_code, 500);
            assert_eq!(
                response.json_body().expect("json body"),
                json!({"error": "Database URL not configured"})
            );
        }
        assert!(repository.rows().expect("rows").is_empty());
    }

    #[test]
    fn failed_seed_reports_database_error_and_commits_nothing() {
        let repository =
            InMemoryDealRepository::new().failing_on("https://travelata.ru/deal/dubai");
        let response =
            handle_deal_store_event(json!({"httpMethod": "POST"}), &configured(), &repository);

        assert_eq!(response.status_code, 500);
        let body = response.json_body().expect("json body");
        assert_eq!(body["error"], json!("Database error"));
        assert!(body["details"]
            .as_str()
            .expect("details text")
            .contains("dubai"));
        assert!(repository.rows().expect("rows").is_empty());
    }

    #[test]
    fn preflight_ignores_configuration() {
        let repository = InMemoryDealRepository::new();
        let response = handle_deal_store_event(
            json!({"httpMethod": "OPTIONS"}),
            &DealStoreConfig::new(None),
            &repository,
        );

        assert_eq!(response.status_code, 200);
        assert!(response.body.is_empty());
    }

    #[test]
    fn unsupported_method_is_rejected() {
        let repository = InMemoryDealRepository::new();
        let response =
            handle_deal_store_event(json!({"httpMethod": "PATCH"}), &configured(), &repository);
        assert_eq!(response.status_code, 405);
    }
}
