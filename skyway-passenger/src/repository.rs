use async_trait::async_trait;
use chrono::Utc;
use skyway_core::{BoxError, DuplicateKey};
use skyway_shared::{PageQuery, PagedResult, SortOrder};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

use crate::models::{NewPassenger, Passenger};

/// Columns a passenger listing can be ordered by.
pub const SORTABLE_FIELDS: &[&str] = &["id", "name", "passportNumber"];

/// Repository trait for passenger data access
#[async_trait]
pub trait PassengerRepository: Send + Sync {
    /// Insert a passenger; fails with [`DuplicateKey`] when the user already has one.
    async fn create_passenger(&self, passenger: NewPassenger) -> Result<Passenger, BoxError>;

    async fn find_passenger_by_id(&self, id: i64) -> Result<Option<Passenger>, BoxError>;

    async fn find_passenger_by_user_id(&self, user_id: i64) -> Result<Option<Passenger>, BoxError>;

    async fn find_passengers(&self, query: &PageQuery) -> Result<PagedResult<Passenger>, BoxError>;
}

#[derive(Default)]
struct PassengerTable {
    rows: BTreeMap<i64, Passenger>,
    last_id: i64,
}

/// Process-local passenger store, used when no database is configured.
#[derive(Default)]
pub struct InMemoryPassengerRepository {
    table: RwLock<PassengerTable>,
}

impl InMemoryPassengerRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn count(&self) -> usize {
        self.table.read().await.rows.len()
    }
}

fn compare(a: &Passenger, b: &Passenger, order_by: &str) -> Ordering {
    match order_by {
        "name" => a.name.cmp(&b.name),
        "passportNumber" => a.passport_number.cmp(&b.passport_number),
        _ => a.id.cmp(&b.id),
    }
}

#[async_trait]
impl PassengerRepository for InMemoryPassengerRepository {
    async fn create_passenger(&self, passenger: NewPassenger) -> Result<Passenger, BoxError> {
        let mut table = self.table.write().await;
        if table.rows.values().any(|p| p.user_id == passenger.user_id) {
            return Err(DuplicateKey(format!("user_id={}", passenger.user_id)).into());
        }

        table.last_id += 1;
        let id = table.last_id;
        let passenger = passenger.into_passenger(id, Utc::now());
        table.rows.insert(id, passenger.clone());
        Ok(passenger)
    }

    async fn find_passenger_by_id(&self, id: i64) -> Result<Option<Passenger>, BoxError> {
        Ok(self.table.read().await.rows.get(&id).cloned())
    }

    async fn find_passenger_by_user_id(&self, user_id: i64) -> Result<Option<Passenger>, BoxError> {
        let table = self.table.read().await;
        Ok(table.rows.values().find(|p| p.user_id == user_id).cloned())
    }

    async fn find_passengers(&self, query: &PageQuery) -> Result<PagedResult<Passenger>, BoxError> {
        let table = self.table.read().await;
        let term = query.search_term.as_deref().map(str::to_lowercase);
        let mut passengers: Vec<Passenger> = table
            .rows
            .values()
            .filter(|p| match &term {
                Some(term) => p.name.to_lowercase().contains(term.as_str()),
                None => true,
            })
            .cloned()
            .collect();

        passengers.sort_by(|a, b| {
            let ord = compare(a, b, &query.order_by);
            match query.order {
                SortOrder::Asc => ord,
                SortOrder::Desc => ord.reverse(),
            }
        });

        Ok(query.slice(passengers))
    }
}
