//! Process-local [`DealRepository`] with the same upsert and query semantics
//! as the Postgres table.

use std::sync::Mutex;

use chrono::{DateTime, Duration, Utc};
use deal_alerts_core::contract::{DealRecord, HotDealQuery, NewDeal, UpsertedDeal};

use super::deal_repository::{DealRepository, StoreError};

#[derive(Debug, Default)]
struct TableState {
    rows: Vec<DealRecord>,
    next_id: i32,
    last_found_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Default)]
pub struct InMemoryDealRepository {
    state: Mutex<TableState>,
    #[cfg(test)]
    failing_url: Option<String>,
}

impl InMemoryDealRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rows(rows: Vec<DealRecord>) -> Self {
        let next_id = rows.iter().map(|row| row.id).max().unwrap_or(0);
        let last_found_at = rows.iter().filter_map(|row| row.found_at).max();
        Self {
            state: Mutex::new(TableState {
                rows,
                next_id,
                last_found_at,
            }),
            ..Self::default()
        }
    }

    /// Makes any upsert touching `url` fail, rolling back the whole batch.
    #[cfg(test)]
    pub(crate) fn failing_on(mut self, url: impl Into<String>) -> Self {
        self.failing_url = Some(url.into());
        self
    }

    pub fn rows(&self) -> Result<Vec<DealRecord>, StoreError> {
        Ok(self.lock()?.rows.clone())
    }

    #[cfg(test)]
    fn check_writable(&self, url: &str) -> Result<(), StoreError> {
        if self.failing_url.as_deref() == Some(url) {
            return Err(StoreError::Unavailable(format!("upsert rejected for {url}")));
        }
        Ok(())
    }

    #[cfg(not(test))]
    fn check_writable(&self, _url: &str) -> Result<(), StoreError> {
        Ok(())
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, TableState>, StoreError> {
        self.state
            .lock()
            .map_err(|_| StoreError::Unavailable("deal table lock poisoned".to_string()))
    }
}

/// Strictly increasing clock so rows written in one batch stay ordered.
fn next_found_at(last: Option<DateTime<Utc>>) -> DateTime<Utc> {
    let now = Utc::now();
    match last {
        Some(previous) if now <= previous => previous + Duration::microseconds(1),
        _ => now,
    }
}

impl DealRepository for InMemoryDealRepository {
    fn list_hot_deals(
        &self,
        _database_url: &str,
        query: &HotDealQuery,
    ) -> Result<Vec<DealRecord>, StoreError> {
        let state = self.lock()?;
        let mut hot: Vec<DealRecord> = state
            .rows
            .iter()
            .filter(|row| row.discount >= query.min_discount)
            .cloned()
            .collect();
        // Postgres sorts NULLs first under DESC.
        hot.sort_by(|left, right| match (left.found_at, right.found_at) {
            (None, None) => std::cmp::Ordering::Equal,
            (None, Some(_)) => std::cmp::Ordering::Less,
            (Some(_), None) => std::cmp::Ordering::Greater,
            (Some(left), Some(right)) => right.cmp(&left),
        });
        hot.truncate(usize::try_from(query.limit.max(0)).unwrap_or(usize::MAX));
        Ok(hot)
    }

    fn upsert_deals(
        &self,
        _database_url: &str,
        deals: &[NewDeal],
    ) -> Result<Vec<UpsertedDeal>, StoreError> {
        let mut state = self.lock()?;
        let mut staged_rows = state.rows.clone();
        let mut next_id = state.next_id;
        let mut last_found_at = state.last_found_at;
        let mut upserted = Vec::with_capacity(deals.len());

        for deal in deals {
            self.check_writable(&deal.url)?;

            let found_at = next_found_at(last_found_at);
            last_found_at = Some(found_at);

            let row = match staged_rows.iter_mut().find(|row| row.url == deal.url) {
                Some(existing) => {
                    existing.current_price = deal.current_price;
                    existing.discount = deal.discount;
                    existing.found_at = Some(found_at);
                    existing.clone()
                }
                None => {
                    next_id += 1;
                    let row = DealRecord {
                        id: next_id,
                        destination: deal.destination.clone(),
                        image_url: deal.image_url.clone(),
                        current_price: deal.current_price,
                        original_price: deal.original_price,
                        discount: deal.discount,
                        url: deal.url.clone(),
                        found_at: Some(found_at),
                    };
                    staged_rows.push(row.clone());
                    row
                }
            };

            upserted.push(UpsertedDeal {
                id: row.id,
                destination: row.destination,
                current_price: row.current_price,
                discount: row.discount,
                url: row.url,
            });
        }

        state.rows = staged_rows;
        state.next_id = next_id;
        state.last_found_at = last_found_at;
        Ok(upserted)
    }
}
