use async_trait::async_trait;
use chrono::{DateTime, Utc};
use skyway_core::BoxError;
use skyway_passenger::models::{NewPassenger, Passenger};
use skyway_passenger::repository::PassengerRepository;
use skyway_shared::{PageQuery, PagedResult};
use sqlx::PgPool;

use crate::sql::{like_pattern, page_clause, unique_as_duplicate};

const COLUMNS: &str = "id, user_id, name, passport_number, age, passenger_type, created_at";

const SEARCH: &str = "($1::text IS NULL OR name ILIKE $1)";

pub struct PostgresPassengerRepository {
    pool: PgPool,
}

impl PostgresPassengerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct PassengerRow {
    id: i64,
    user_id: i64,
    name: String,
    passport_number: String,
    age: i32,
    passenger_type: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<PassengerRow> for Passenger {
    type Error = BoxError;

    fn try_from(row: PassengerRow) -> Result<Self, Self::Error> {
        Ok(Passenger {
            id: row.id,
            user_id: row.user_id,
            name: row.name,
            passport_number: row.passport_number,
            age: row.age,
            passenger_type: row.passenger_type.parse()?,
            created_at: row.created_at,
        })
    }
}

fn sort_column(order_by: &str) -> &'static str {
    match order_by {
        "name" => "name",
        "passportNumber" => "passport_number",
        _ => "id",
    }
}

#[async_trait]
impl PassengerRepository for PostgresPassengerRepository {
    async fn create_passenger(&self, passenger: NewPassenger) -> Result<Passenger, BoxError> {
        let sql = format!(
            "INSERT INTO passengers (user_id, name, passport_number, age, passenger_type) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, PassengerRow>(&sql)
            .bind(passenger.user_id)
            .bind(&passenger.name)
            .bind(&passenger.passport_number)
            .bind(passenger.age)
            .bind(passenger.passenger_type.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(unique_as_duplicate(format!("user_id={}", passenger.user_id)))?;

        row.try_into()
    }

    async fn find_passenger_by_id(&self, id: i64) -> Result<Option<Passenger>, BoxError> {
        let sql = format!("SELECT {COLUMNS} FROM passengers WHERE id = $1");
        let row = sqlx::query_as::<_, PassengerRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(Passenger::try_from).transpose()
    }

    async fn find_passenger_by_user_id(&self, user_id: i64) -> Result<Option<Passenger>, BoxError> {
        let sql = format!("SELECT {COLUMNS} FROM passengers WHERE user_id = $1");
        let row = sqlx::query_as::<_, PassengerRow>(&sql)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(Passenger::try_from).transpose()
    }

    async fn find_passengers(&self, query: &PageQuery) -> Result<PagedResult<Passenger>, BoxError> {
        let pattern = like_pattern(query);

        let total: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM passengers WHERE {SEARCH}"))
            .bind(&pattern)
            .fetch_one(&self.pool)
            .await?;

        let sql = format!(
            "SELECT {COLUMNS} FROM passengers WHERE {SEARCH} {}",
            page_clause(sort_column(&query.order_by), query)
        );
        let rows = sqlx::query_as::<_, PassengerRow>(&sql)
            .bind(&pattern)
            .fetch_all(&self.pool)
            .await?;

        Ok(PagedResult {
            items: rows.into_iter().map(Passenger::try_from).collect::<Result<_, _>>()?,
            total: total as u64,
        })
    }
}
