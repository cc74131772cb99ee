use deal_alerts_core::contract::{DealRecord, HotDealQuery, NewDeal, UpsertedDeal};
use tokio_postgres::{Client, NoTls, Row};

use super::deal_repository::{DealRepository, StoreError};

pub const SCHEMA_SQL: &str = include_str!("../../migrations/001_create_tour_deals.sql");

const LIST_HOT_DEALS_SQL: &str = "\
    SELECT id, destination, image_url, current_price, original_price, discount, url, found_at \
    FROM tour_deals \
    WHERE discount >= $1 \
    ORDER BY found_at DESC \
    LIMIT $2";

const UPSERT_DEAL_SQL: &str = "\
    INSERT INTO tour_deals (destination, image_url, current_price, original_price, discount, url, found_at) \
    VALUES ($1, $2, $3, $4, $5, $6, NOW()) \
    ON CONFLICT (url) DO UPDATE \
    SET current_price = EXCLUDED.current_price, \
        discount = EXCLUDED.discount, \
        found_at = NOW() \
    RETURNING id, destination, current_price, discount, url";

/// `tour_deals` access over a fresh connection per call.
#[derive(Debug, Clone, Copy, Default)]
pub struct PostgresDealRepository;

/// A client plus the task driving its connection. Dropping the client ends the task.
struct Session {
    client: Client,
    driver: tokio::task::JoinHandle<()>,
}

impl Session {
    async fn open(database_url: &str) -> Result<Self, StoreError> {
        let (client, connection) = tokio_postgres::connect(database_url, NoTls).await?;
        let driver = tokio::spawn(async move {
            if let Err(error) = connection.await {
                tracing::warn!(component = "deal_store", event = "connection_error", error = %error);
            }
        });
        Ok(Self { client, driver })
    }

    async fn close(self) {
        drop(self.client);
        let _ = self.driver.await;
    }
}

impl PostgresDealRepository {
    pub async fn ensure_schema(&self, database_url: &str) -> Result<(), StoreError> {
        let session = Session::open(database_url).await?;
        let result = session.client.batch_execute(SCHEMA_SQL).await;
        session.close().await;
        result.map_err(StoreError::from)
    }

    pub async fn fetch_hot_deals(
        &self,
        database_url: &str,
        query: &HotDealQuery,
    ) -> Result<Vec<DealRecord>, StoreError> {
        let session = Session::open(database_url).await?;
        let result = session
            .client
            .query(LIST_HOT_DEALS_SQL, &[&query.min_discount, &query.limit])
            .await;
        session.close().await;
        result?.iter().map(deal_record_from_row).collect()
    }

    pub async fn write_deals(
        &self,
        database_url: &str,
        deals: &[NewDeal],
    ) -> Result<Vec<UpsertedDeal>, StoreError> {
        let mut session = Session::open(database_url).await?;
        let result = upsert_in_transaction(&mut session.client, deals).await;
        session.close().await;
        result
    }
}

async fn upsert_in_transaction(
    client: &mut Client,
    deals: &[NewDeal],
) -> Result<Vec<UpsertedDeal>, StoreError> {
    let transaction = client.transaction().await?;
    let mut upserted = Vec::with_capacity(deals.len());
    for deal in deals {
        let row = transaction
            .query_one(
                UPSERT_DEAL_SQL,
                &[
                    &deal.destination,
                    &deal.image_url,
                    &deal.current_price,
                    &deal.original_price,
                    &deal.discount,
                    &deal.url,
                ],
            )
            .await?;
        upserted.push(upserted_deal_from_row(&row)?);
    }
    transaction.commit().await?;
    Ok(upserted)
}

fn deal_record_from_row(row: &Row) -> Result<DealRecord, StoreError> {
    Ok(DealRecord {
        id: row.try_get("id")?,
        destination: row.try_get("destination")?,
        image_url: row.try_get("image_url")?,
        current_price: row.try_get("current_price")?,
        original_price: row.try_get("original_price")?,
        discount: row.try_get("discount")?,
        url: row.try_get("url")?,
        found_at: row.try_get("found_at")?,
    })
}

fn upserted_deal_from_row(row: &Row) -> Result<UpsertedDeal, StoreError> {
    Ok(UpsertedDeal {
        id: row.try_get("id")?,
        destination: row.try_get("destination")?,
        current_price: row.try_get("current_price")?,
        discount: row.try_get("discount")?,
        url: row.try_get("url")?,
    })
}

impl DealRepository for PostgresDealRepository {
    fn list_hot_deals(
        &self,
        database_url: &str,
        query: &HotDealQuery,
    ) -> Result<Vec<DealRecord>, StoreError> {
        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current()
                .block_on(async { self.fetch_hot_deals(database_url, query).await })
        })
    }

    fn upsert_deals(
        &self,
        database_url: &str,
        deals: &[NewDeal],
    ) -> Result<Vec<UpsertedDeal>, StoreError> {
        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current()
                .block_on(async { self.write_deals(database_url, deals).await })
        })
    }
}
