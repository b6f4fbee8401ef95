use async_trait::async_trait;
use chrono::{DateTime, Utc};
use skyway_core::BoxError;
use skyway_identity::models::{NewToken, Token};
use skyway_identity::repository::AuthRepository;
use skyway_shared::auth::TokenType;
use sqlx::PgPool;

use crate::sql::unique_as_duplicate;

const COLUMNS: &str = "id, token, token_type, expires, blacklisted, user_id, created_at";

pub struct PostgresAuthRepository {
    pool: PgPool,
}

impl PostgresAuthRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct TokenRow {
    id: i64,
    token: String,
    token_type: String,
    expires: DateTime<Utc>,
    blacklisted: bool,
    user_id: i64,
    created_at: DateTime<Utc>,
}

impl TryFrom<TokenRow> for Token {
    type Error = BoxError;

    fn try_from(row: TokenRow) -> Result<Self, Self::Error> {
        Ok(Token {
            id: row.id,
            token: row.token,
            token_type: row.token_type.parse()?,
            expires: row.expires,
            blacklisted: row.blacklisted,
            user_id: row.user_id,
            created_at: row.created_at,
        })
    }
}

#[async_trait]
impl AuthRepository for PostgresAuthRepository {
    async fn create_token(&self, token: NewToken) -> Result<Token, BoxError> {
        let sql = format!(
            "INSERT INTO tokens (token, token_type, expires, user_id) \
             VALUES ($1, $2, $3, $4) RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, TokenRow>(&sql)
            .bind(&token.token)
            .bind(token.token_type.to_string())
            .bind(token.expires)
            .bind(token.user_id)
            .fetch_one(&self.pool)
            .await
            .map_err(unique_as_duplicate("token".to_string()))?;

        row.try_into()
    }

    async fn find_token(&self, token: &str, token_type: TokenType) -> Result<Option<Token>, BoxError> {
        let sql = format!(
            "SELECT {COLUMNS} FROM tokens WHERE token = $1 AND token_type = $2 AND NOT blacklisted"
        );
        let row = sqlx::query_as::<_, TokenRow>(&sql)
            .bind(token)
            .bind(token_type.to_string())
            .fetch_optional(&self.pool)
            .await?;
        row.map(Token::try_from).transpose()
    }

    async fn remove_token(&self, id: i64) -> Result<bool, BoxError> {
        let result = sqlx::query("DELETE FROM tokens WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn remove_user_tokens(&self, user_id: i64) -> Result<u64, BoxError> {
        let result = sqlx::query("DELETE FROM tokens WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
