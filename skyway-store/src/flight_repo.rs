use async_trait::async_trait;
use chrono::{DateTime, Utc};
use skyway_core::BoxError;
use skyway_flight::models::{Flight, NewFlight};
use skyway_flight::repository::FlightRepository;
use skyway_shared::{PageQuery, PagedResult};
use sqlx::PgPool;

use crate::sql::{like_pattern, page_clause, unique_as_duplicate};

const COLUMNS: &str = "id, flight_number, price, flight_status, flight_date, departure_date, \
    departure_airport_id, aircraft_id, arrive_date, arrive_airport_id, duration_minutes, created_at";

const SEARCH: &str = "($1::text IS NULL OR flight_number ILIKE $1)";

pub struct PostgresFlightRepository {
    pool: PgPool,
}

impl PostgresFlightRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct FlightRow {
    id: i64,
    flight_number: String,
    price: f64,
    flight_status: String,
    flight_date: DateTime<Utc>,
    departure_date: DateTime<Utc>,
    departure_airport_id: i64,
    aircraft_id: i64,
    arrive_date: DateTime<Utc>,
    arrive_airport_id: i64,
    duration_minutes: i32,
    created_at: DateTime<Utc>,
}

impl TryFrom<FlightRow> for Flight {
    type Error = BoxError;

    fn try_from(row: FlightRow) -> Result<Self, Self::Error> {
        Ok(Flight {
            id: row.id,
            flight_number: row.flight_number,
            price: row.price,
            flight_status: row.flight_status.parse()?,
            flight_date: row.flight_date,
            departure_date: row.departure_date,
            departure_airport_id: row.departure_airport_id,
            aircraft_id: row.aircraft_id,
            arrive_date: row.arrive_date,
            arrive_airport_id: row.arrive_airport_id,
            duration_minutes: row.duration_minutes,
            created_at: row.created_at,
        })
    }
}

fn sort_column(order_by: &str) -> &'static str {
    match order_by {
        "flightNumber" => "flight_number",
        "price" => "price",
        "flightDate" => "flight_date",
        _ => "id",
    }
}

#[async_trait]
impl FlightRepository for PostgresFlightRepository {
    async fn create_flight(&self, flight: NewFlight) -> Result<Flight, BoxError> {
        let sql = format!(
            "INSERT INTO flights (flight_number, price, flight_status, flight_date, departure_date, \
             departure_airport_id, aircraft_id, arrive_date, arrive_airport_id, duration_minutes) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, FlightRow>(&sql)
            .bind(&flight.flight_number)
            .bind(flight.price)
            .bind(flight.flight_status.as_str())
            .bind(flight.flight_date)
            .bind(flight.departure_date)
            .bind(flight.departure_airport_id)
            .bind(flight.aircraft_id)
            .bind(flight.arrive_date)
            .bind(flight.arrive_airport_id)
            .bind(flight.duration_minutes)
            .fetch_one(&self.pool)
            .await
            .map_err(unique_as_duplicate(flight.flight_number.clone()))?;

        row.try_into()
    }

    async fn find_flight_by_number(&self, flight_number: &str) -> Result<Option<Flight>, BoxError> {
        let sql = format!("SELECT {COLUMNS} FROM flights WHERE flight_number = $1");
        let row = sqlx::query_as::<_, FlightRow>(&sql)
            .bind(flight_number)
            .fetch_optional(&self.pool)
            .await?;
        row.map(Flight::try_from).transpose()
    }

    async fn find_flight_by_id(&self, id: i64) -> Result<Option<Flight>, BoxError> {
        let sql = format!("SELECT {COLUMNS} FROM flights WHERE id = $1");
        let row = sqlx::query_as::<_, FlightRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(Flight::try_from).transpose()
    }

    async fn find_flights(&self, query: &PageQuery) -> Result<PagedResult<Flight>, BoxError> {
        let pattern = like_pattern(query);

        let total: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM flights WHERE {SEARCH}"))
            .bind(&pattern)
            .fetch_one(&self.pool)
            .await?;

        let sql = format!(
            "SELECT {COLUMNS} FROM flights WHERE {SEARCH} {}",
            page_clause(sort_column(&query.order_by), query)
        );
        let rows = sqlx::query_as::<_, FlightRow>(&sql)
            .bind(&pattern)
            .fetch_all(&self.pool)
            .await?;

        Ok(PagedResult {
            items: rows.into_iter().map(Flight::try_from).collect::<Result<_, _>>()?,
            total: total as u64,
        })
    }
}
