use async_trait::async_trait;
use chrono::{DateTime, Utc};
use skyway_core::BoxError;
use skyway_identity::models::{NewUser, User};
use skyway_identity::repository::UserRepository;
use skyway_shared::{PageQuery, PagedResult};
use sqlx::PgPool;

use crate::sql::{like_pattern, page_clause, unique_as_duplicate};

const COLUMNS: &str = "id, email, name, password_hash, role, passport_number, is_email_verified, \
    created_at, updated_at";

const SEARCH: &str = "($1::text IS NULL OR name ILIKE $1)";

pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id: i64,
    email: String,
    name: String,
    password_hash: String,
    role: String,
    passport_number: String,
    is_email_verified: bool,
    created_at: DateTime<Utc>,
    updated_at: Option<DateTime<Utc>>,
}

impl TryFrom<UserRow> for User {
    type Error = BoxError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(User {
            id: row.id,
            email: row.email,
            name: row.name,
            password_hash: row.password_hash,
            role: row.role.parse()?,
            passport_number: row.passport_number,
            is_email_verified: row.is_email_verified,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn sort_column(order_by: &str) -> &'static str {
    match order_by {
        "name" => "name",
        "email" => "email",
        _ => "id",
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn create_user(&self, user: NewUser) -> Result<User, BoxError> {
        let sql = format!(
            "INSERT INTO users (email, name, password_hash, role, passport_number) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(&user.email)
            .bind(&user.name)
            .bind(&user.password_hash)
            .bind(user.role.as_str())
            .bind(&user.passport_number)
            .fetch_one(&self.pool)
            .await
            .map_err(unique_as_duplicate(user.email.clone()))?;

        row.try_into()
    }

    async fn update_user(&self, user: User) -> Result<User, BoxError> {
        let sql = format!(
            "UPDATE users SET email = $2, name = $3, password_hash = $4, role = $5, \
             passport_number = $6, is_email_verified = $7, updated_at = NOW() \
             WHERE id = $1 RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(user.id)
            .bind(&user.email)
            .bind(&user.name)
            .bind(&user.password_hash)
            .bind(user.role.as_str())
            .bind(&user.passport_number)
            .bind(user.is_email_verified)
            .fetch_optional(&self.pool)
            .await
            .map_err(unique_as_duplicate(user.email.clone()))?
            .ok_or_else(|| format!("user {} does not exist", user.id))?;

        row.try_into()
    }

    async fn find_user_by_id(&self, id: i64) -> Result<Option<User>, BoxError> {
        let sql = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(User::try_from).transpose()
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, BoxError> {
        let sql = format!("SELECT {COLUMNS} FROM users WHERE email = $1");
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        row.map(User::try_from).transpose()
    }

    async fn find_users(&self, query: &PageQuery) -> Result<PagedResult<User>, BoxError> {
        let pattern = like_pattern(query);

        let total: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM users WHERE {SEARCH}"))
            .bind(&pattern)
            .fetch_one(&self.pool)
            .await?;

        let sql = format!(
            "SELECT {COLUMNS} FROM users WHERE {SEARCH} {}",
            page_clause(sort_column(&query.order_by), query)
        );
        let rows = sqlx::query_as::<_, UserRow>(&sql)
            .bind(&pattern)
            .fetch_all(&self.pool)
            .await?;

        Ok(PagedResult {
            items: rows.into_iter().map(User::try_from).collect::<Result<_, _>>()?,
            total: total as u64,
        })
    }

    async fn remove_user(&self, id: i64) -> Result<bool, BoxError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
