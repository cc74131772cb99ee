use deal_alerts_core::contract::{DealRecord, HotDealQuery, NewDeal, UpsertedDeal};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0}")]
    Postgres(#[from] tokio_postgres::Error),
    #[error("{0}")]
    Unavailable(String),
}

/// Storage for `tour_deals` rows.
///
/// Each call is self-contained: implementations open whatever connection they
/// need for `database_url` and release it before returning.
pub trait DealRepository {
    /// Deals with `discount >= query.min_discount`, newest `found_at` first,
    /// at most `query.limit` rows.
    fn list_hot_deals(
        &self,
        database_url: &str,
        query: &HotDealQuery,
    ) -> Result<Vec<DealRecord>, StoreError>;

    /// Inserts each deal or, when its `url` already exists, refreshes
    /// `current_price`, `discount` and `found_at` in place. All deals are
    /// applied in one transaction; nothing is committed if any upsert fails.
    fn upsert_deals(
        &self,
        database_url: &str,
        deals: &[NewDeal],
    ) -> Result<Vec<UpsertedDeal>, StoreError>;
}
