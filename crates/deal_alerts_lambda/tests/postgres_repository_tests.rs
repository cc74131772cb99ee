//! Runs against a real database only when `DEAL_STORE_TEST_DATABASE_URL` is set
//! (see `cargo run -p xtask -- db-test`). The schema is created if missing and
//! every test works on its own URLs.

use deal_alerts_core::contract::{HotDealQuery, NewDeal};
use deal_alerts_lambda::adapters::deal_repository::DealRepository;
use deal_alerts_lambda::adapters::postgres::PostgresDealRepository;

const DATABASE_URL_VAR: &str = "DEAL_STORE_TEST_DATABASE_URL";

async fn database_url() -> Option<String> {
    let url = std::env::var(DATABASE_URL_VAR).ok()?;
    PostgresDealRepository
        .ensure_schema(&url)
        .await
        .expect("schema should apply");
    Some(url)
}

fn unique_url(label: &str) -> String {
    let nanos = chrono::Utc::now()
        .timestamp_nanos_opt()
        .expect("timestamp in range");
    format!("https://travelata.ru/deal/test-{label}-{nanos}")
}

fn deal(url: &str, current_price: i32, discount: i32) -> NewDeal {
    NewDeal {
        destination: "Тест".to_string(),
        image_url: None,
        current_price,
        original_price: 5000,
        discount,
        url: url.to_string(),
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn upsert_keeps_single_row_per_url() {
    let Some(database_url) = database_url().await else {
        return;
    };
    let repository = PostgresDealRepository;
    let url = unique_url("upsert");

    let first = repository
        .upsert_deals(&database_url, &[deal(&url, 2000, 55)])
        .expect("insert should pass");
    let second = repository
        .upsert_deals(&database_url, &[deal(&url, 1500, 70)])
        .expect("update should pass");

    assert_eq!(first[0].id, second[0].id);
    assert_eq!(second[0].current_price, 1500);
    assert_eq!(second[0].discount, 70);

    let (client, connection) = tokio_postgres::connect(&database_url, tokio_postgres::NoTls)
        .await
        .expect("connect");
    let driver = tokio::spawn(connection);
    let row = client
        .query_one(
            "SELECT COUNT(*), MAX(original_price) FROM tour_deals WHERE url = $1",
            &[&url],
        )
        .await
        .expect("count query");
    let count: i64 = row.get(0);
    let original_price: Option<i32> = row.get(1);
    assert_eq!(count, 1);
    assert_eq!(original_price, Some(5000));
    drop(client);
    let _ = driver.await;
}

#[tokio::test(flavor = "multi_thread")]
async fn listing_applies_threshold_and_recency() {
    let Some(database_url) = database_url().await else {
        return;
    };
    let repository = PostgresDealRepository;
    let cold = unique_url("cold");
    let hot = unique_url("hot");

    repository
        .upsert_deals(&database_url, &[deal(&cold, 900, 20)])
        .expect("cold upsert");
    repository
        .upsert_deals(&database_url, &[deal(&hot, 900, 90)])
        .expect("hot upsert");

    let deals = repository
        .list_hot_deals(&database_url, &HotDealQuery::default())
        .expect("list should pass");

    assert!(deals.len() <= 50);
    assert!(deals.iter().all(|deal| deal.discount >= 50));
    assert!(deals.iter().any(|deal| deal.url == hot));
    assert!(!deals.iter().any(|deal| deal.url == cold));
    assert!(deals
        .windows(2)
        .all(|pair| pair[0].found_at >= pair[1].found_at));
}

#[tokio::test(flavor = "multi_thread")]
async fn failed_batch_rolls_back_earlier_upserts() {
    let Some(database_url) = database_url().await else {
        return;
    };
    let repository = PostgresDealRepository;
    let committed_url = unique_url("rollback");

    let mut invalid = deal(&unique_url("invalid"), 0, 60);
    invalid.destination = "\0".to_string();
    let result = repository.upsert_deals(
        &database_url,
        &[deal(&committed_url, 100, 60), invalid],
    );
    assert!(result.is_err());

    let deals = repository
        .list_hot_deals(
            &database_url,
            &HotDealQuery {
                min_discount: 60,
                limit: 10_000,
            },
        )
        .expect("list should pass");
    assert!(!deals.iter().any(|deal| deal.url == committed_url));
}
