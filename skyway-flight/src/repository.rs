use async_trait::async_trait;
use chrono::Utc;
use skyway_core::{BoxError, DuplicateKey};
use skyway_shared::{PageQuery, PagedResult, SortOrder};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

use crate::models::{Flight, NewFlight};

/// Columns a flight listing can be ordered by.
pub const SORTABLE_FIELDS: &[&str] = &["id", "flightNumber", "price", "flightDate"];

/// Repository trait for flight data access
#[async_trait]
pub trait FlightRepository: Send + Sync {
    /// Insert a flight; fails with [`DuplicateKey`] when the flight number exists.
    async fn create_flight(&self, flight: NewFlight) -> Result<Flight, BoxError>;

    async fn find_flight_by_number(&self, flight_number: &str) -> Result<Option<Flight>, BoxError>;

    async fn find_flight_by_id(&self, id: i64) -> Result<Option<Flight>, BoxError>;

    async fn find_flights(&self, query: &PageQuery) -> Result<PagedResult<Flight>, BoxError>;
}

#[derive(Default)]
struct FlightTable {
    rows: BTreeMap<i64, Flight>,
    last_id: i64,
}

/// Process-local flight store, used when no database is configured.
#[derive(Default)]
pub struct InMemoryFlightRepository {
    table: RwLock<FlightTable>,
}

impl InMemoryFlightRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn count(&self) -> usize {
        self.table.read().await.rows.len()
    }
}

fn compare(a: &Flight, b: &Flight, order_by: &str) -> Ordering {
    match order_by {
        "flightNumber" => a.flight_number.cmp(&b.flight_number),
        "price" => a.price.partial_cmp(&b.price).unwrap_or(Ordering::Equal),
        "flightDate" => a.flight_date.cmp(&b.flight_date),
        _ => a.id.cmp(&b.id),
    }
}

#[async_trait]
impl FlightRepository for InMemoryFlightRepository {
    async fn create_flight(&self, flight: NewFlight) -> Result<Flight, BoxError> {
        let mut table = self.table.write().await;
        if table.rows.values().any(|f| f.flight_number == flight.flight_number) {
            return Err(DuplicateKey(flight.flight_number).into());
        }

        table.last_id += 1;
        let flight = flight.into_flight(table.last_id, Utc::now());
        table.rows.insert(flight.id, flight.clone());
        Ok(flight)
    }

    async fn find_flight_by_number(&self, flight_number: &str) -> Result<Option<Flight>, BoxError> {
        let table = self.table.read().await;
        Ok(table.rows.values().find(|f| f.flight_number == flight_number).cloned())
    }

    async fn find_flight_by_id(&self, id: i64) -> Result<Option<Flight>, BoxError> {
        Ok(self.table.read().await.rows.get(&id).cloned())
    }

    async fn find_flights(&self, query: &PageQuery) -> Result<PagedResult<Flight>, BoxError> {
        let table = self.table.read().await;
        let mut flights: Vec<Flight> = table
            .rows
            .values()
            .filter(|f| match &query.search_term {
                Some(term) => f.flight_number.to_lowercase().contains(&term.to_lowercase()),
                None => true,
            })
            .cloned()
            .collect();

        flights.sort_by(|a, b| {
            let ord = compare(a, b, &query.order_by);
            match query.order {
                SortOrder::Asc => ord,
                SortOrder::Desc => ord.reverse(),
            }
        });

        Ok(query.slice(flights))
    }
}
