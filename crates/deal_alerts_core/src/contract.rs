use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

pub const DEFAULT_DESTINATION: &str = "Неизвестно";
pub const HOT_DEAL_MIN_DISCOUNT: i32 = 50;
pub const HOT_DEAL_LIMIT: i64 = 50;
pub const BOT_RUNNING_STATUS: &str = "Bot is running";
pub const DEAL_SENT_MESSAGE: &str = "Deal sent to Telegram";
pub const SEED_COMPLETED_MESSAGE: &str = "Parsing completed";

/// Deal as posted to the notifier. Every field is optional on the wire.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct IncomingDeal {
    #[serde(default)]
    pub destination: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub current_price: Option<Number>,
    #[serde(default)]
    pub original_price: Option<Number>,
    #[serde(default)]
    pub discount: Option<Number>,
    #[serde(default)]
    pub url: Option<String>,
}

impl IncomingDeal {
    pub fn destination(&self) -> &str {
        self.destination.as_deref().unwrap_or(DEFAULT_DESTINATION)
    }

    pub fn current_price(&self) -> Number {
        self.current_price.clone().unwrap_or_else(zero)
    }

    pub fn original_price(&self) -> Number {
        self.original_price.clone().unwrap_or_else(zero)
    }

    pub fn discount(&self) -> Number {
        self.discount.clone().unwrap_or_else(zero)
    }

    pub fn url(&self) -> &str {
        self.url.as_deref().unwrap_or("")
    }
}

fn zero() -> Number {
    Number::from(0)
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct NotifyRequest {
    #[serde(default)]
    pub deal: Option<IncomingDeal>,
}

/// A persisted `tour_deals` row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DealRecord {
    pub id: i32,
    pub destination: String,
    pub image_url: Option<String>,
    pub current_price: i32,
    pub original_price: i32,
    pub discount: i32,
    pub url: String,
    pub found_at: Option<DateTime<Utc>>,
}

/// Wire form of a [`DealRecord`] returned by the deal list endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DealView {
    pub id: i32,
    pub destination: String,
    pub image_url: Option<String>,
    pub current_price: i32,
    pub original_price: i32,
    pub discount: i32,
    pub url: String,
    pub found_at: Option<String>,
}

impl From<&DealRecord> for DealView {
    fn from(record: &DealRecord) -> Self {
        Self {
            id: record.id,
            destination: record.destination.clone(),
            image_url: record.image_url.clone(),
            current_price: record.current_price,
            original_price: record.original_price,
            discount: record.discount,
            url: record.url.clone(),
            found_at: record.found_at.map(|found_at| found_at.to_rfc3339()),
        }
    }
}

/// Deal to insert or refresh, keyed by `url`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDeal {
    pub destination: String,
    pub image_url: Option<String>,
    pub current_price: i32,
    pub original_price: i32,
    pub discount: i32,
    pub url: String,
}

/// Identifying fields of a row after an upsert.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UpsertedDeal {
    pub id: i32,
    pub destination: String,
    pub current_price: i32,
    pub discount: i32,
    pub url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HotDealQuery {
    pub min_discount: i32,
    pub limit: i64,
}

impl Default for HotDealQuery {
    fn default() -> Self {
        Self {
            min_discount: HOT_DEAL_MIN_DISCOUNT,
            limit: HOT_DEAL_LIMIT,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NotifierStatus {
    pub status: String,
    pub configured: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NotifySuccess {
    pub success: bool,
    pub message: String,
    #[serde(rename = "messageId")]
    pub message_id: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DealListResponse {
    pub deals: Vec<DealView>,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SeedResponse {
    pub message: String,
    #[serde(rename = "newDeals")]
    pub new_deals: Vec<UpsertedDeal>,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: None,
        }
    }

    pub fn with_details(error: impl Into<String>, details: impl Into<Value>) -> Self {
        Self {
            error: error.into(),
            details: Some(details.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use serde_json::json;

    use super::*;

    #[test]
    fn incoming_deal_applies_defaults_for_missing_fields() {
        let request: NotifyRequest =
            serde_json::from_value(json!({"deal": {}})).expect("empty deal should parse");
        let deal = request.deal.expect("deal should be present");

        assert_eq!(deal.destination(), DEFAULT_DESTINATION);
        assert_eq!(deal.current_price(), Number::from(0));
        assert_eq!(deal.original_price(), Number::from(0));
        assert_eq!(deal.discount(), Number::from(0));
        assert_eq!(deal.url(), "");
    }

    #[test]
    fn incoming_deal_treats_null_destination_as_missing() {
        let deal: IncomingDeal = serde_json::from_value(json!({"destination": null}))
            .expect("null destination should parse");
        assert_eq!(deal.destination(), DEFAULT_DESTINATION);
    }

    #[test]
    fn incoming_deal_keeps_decimal_prices_verbatim() {
        let deal: IncomingDeal = serde_json::from_value(json!({
            "currentPrice": 899.5,
            "originalPrice": 1899,
            "discount": 53
        }))
        .expect("numeric deal should parse");

        assert_eq!(deal.current_price().to_string(), "899.5");
        assert_eq!(deal.original_price().to_string(), "1899");
        assert_eq!(deal.discount().to_string(), "53");
    }

    #[test]
    fn deal_view_uses_camel_case_and_offset_timestamp() {
        let record = DealRecord {
            id: 7,
            destination: "Мальдивы".to_string(),
            image_url: None,
            current_price: 1299,
            original_price: 2599,
            discount: 50,
            url: "https://travelata.ru/deal/maldives".to_string(),
            found_at: Some(
                Utc.with_ymd_and_hms(2026, 3, 1, 12, 30, 0)
                    .single()
                    .expect("valid timestamp"),
            ),
        };

        let value = serde_json::to_value(DealView::from(&record)).expect("view should serialize");
        assert_eq!(value["imageUrl"], Value::Null);
        assert_eq!(value["currentPrice"], json!(1299));
        assert_eq!(value["originalPrice"], json!(2599));
        assert_eq!(value["foundAt"], json!("2026-03-01T12:30:00+00:00"));
    }

    #[test]
    fn deal_view_maps_missing_timestamp_to_null() {
        let record = DealRecord {
            id: 1,
            destination: "ОАЭ, Дубай".to_string(),
            image_url: Some("https://example.com/a.jpg".to_string()),
            current_price: 1599,
            original_price: 3299,
            discount: 52,
            url: "https://travelata.ru/deal/dubai".to_string(),
            found_at: None,
        };

        let value = serde_json::to_value(DealView::from(&record)).expect("view should serialize");
        assert_eq!(value["foundAt"], Value::Null);
    }

    #[test]
    fn error_body_omits_absent_details() {
        let value = serde_json::to_value(ErrorBody::new("Method not allowed"))
            .expect("error body should serialize");
        assert_eq!(value, json!({"error": "Method not allowed"}));
    }
}
