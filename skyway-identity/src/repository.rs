use async_trait::async_trait;
use chrono::Utc;
use skyway_core::{BoxError, DuplicateKey};
use skyway_shared::auth::TokenType;
use skyway_shared::{PageQuery, PagedResult, SortOrder};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

use crate::models::{NewToken, NewUser, Token, User};

/// Columns a user listing can be ordered by.
pub const SORTABLE_FIELDS: &[&str] = &["id", "name", "email"];

/// Repository trait for user data access
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a user; fails with [`DuplicateKey`] when the email is taken.
    async fn create_user(&self, user: NewUser) -> Result<User, BoxError>;

    /// Overwrite a stored user; fails with [`DuplicateKey`] when the email is taken.
    async fn update_user(&self, user: User) -> Result<User, BoxError>;

    async fn find_user_by_id(&self, id: i64) -> Result<Option<User>, BoxError>;

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, BoxError>;

    async fn find_users(&self, query: &PageQuery) -> Result<PagedResult<User>, BoxError>;

    /// Returns whether a row was removed.
    async fn remove_user(&self, id: i64) -> Result<bool, BoxError>;
}

/// Repository trait for issued tokens
#[async_trait]
pub trait AuthRepository: Send + Sync {
    async fn create_token(&self, token: NewToken) -> Result<Token, BoxError>;

    /// Find a non-blacklisted token of the given type.
    async fn find_token(&self, token: &str, token_type: TokenType) -> Result<Option<Token>, BoxError>;

    /// Returns whether a row was removed.
    async fn remove_token(&self, id: i64) -> Result<bool, BoxError>;

    async fn remove_user_tokens(&self, user_id: i64) -> Result<u64, BoxError>;
}

struct Table<T> {
    rows: BTreeMap<i64, T>,
    last_id: i64,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
            last_id: 0,
        }
    }
}

impl<T> Table<T> {
    fn next_id(&mut self) -> i64 {
        self.last_id += 1;
        self.last_id
    }
}

/// Process-local user store, used when no database is configured.
#[derive(Default)]
pub struct InMemoryUserRepository {
    table: RwLock<Table<User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn count(&self) -> usize {
        self.table.read().await.rows.len()
    }
}

fn compare(a: &User, b: &User, order_by: &str) -> Ordering {
    match order_by {
        "name" => a.name.cmp(&b.name),
        "email" => a.email.cmp(&b.email),
        _ => a.id.cmp(&b.id),
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create_user(&self, user: NewUser) -> Result<User, BoxError> {
        let mut table = self.table.write().await;
        if table.rows.values().any(|u| u.email == user.email) {
            return Err(DuplicateKey(user.email).into());
        }

        let id = table.next_id();
        let user = user.into_user(id, Utc::now());
        table.rows.insert(id, user.clone());
        Ok(user)
    }

    async fn update_user(&self, user: User) -> Result<User, BoxError> {
        let mut table = self.table.write().await;
        if table.rows.values().any(|u| u.email == user.email && u.id != user.id) {
            return Err(DuplicateKey(user.email).into());
        }
        if !table.rows.contains_key(&user.id) {
            return Err(format!("user {} does not exist", user.id).into());
        }

        let user = User {
            updated_at: Some(Utc::now()),
            ..user
        };
        table.rows.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_user_by_id(&self, id: i64) -> Result<Option<User>, BoxError> {
        Ok(self.table.read().await.rows.get(&id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, BoxError> {
        let table = self.table.read().await;
        Ok(table.rows.values().find(|u| u.email == email).cloned())
    }

    async fn find_users(&self, query: &PageQuery) -> Result<PagedResult<User>, BoxError> {
        let table = self.table.read().await;
        let mut users: Vec<User> = table
            .rows
            .values()
            .filter(|u| match &query.search_term {
                Some(term) => u.name.to_lowercase().contains(&term.to_lowercase()),
                None => true,
            })
            .cloned()
            .collect();

        users.sort_by(|a, b| {
            let ord = compare(a, b, &query.order_by);
            match query.order {
                SortOrder::Asc => ord,
                SortOrder::Desc => ord.reverse(),
            }
        });

        Ok(query.slice(users))
    }

    async fn remove_user(&self, id: i64) -> Result<bool, BoxError> {
        Ok(self.table.write().await.rows.remove(&id).is_some())
    }
}

/// Process-local token store, used when no database is configured.
#[derive(Default)]
pub struct InMemoryAuthRepository {
    table: RwLock<Table<Token>>,
}

impl InMemoryAuthRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn count(&self) -> usize {
        self.table.read().await.rows.len()
    }

    pub async fn count_for(&self, user_id: i64, token_type: TokenType) -> usize {
        let table = self.table.read().await;
        table
            .rows
            .values()
            .filter(|t| t.user_id == user_id && t.token_type == token_type)
            .count()
    }
}

#[async_trait]
impl AuthRepository for InMemoryAuthRepository {
    async fn create_token(&self, token: NewToken) -> Result<Token, BoxError> {
        let mut table = self.table.write().await;
        if table.rows.values().any(|t| t.token == token.token) {
            return Err(DuplicateKey("token".into()).into());
        }

        let id = table.next_id();
        let token = token.into_token(id, Utc::now());
        table.rows.insert(id, token.clone());
        Ok(token)
    }

    async fn find_token(&self, token: &str, token_type: TokenType) -> Result<Option<Token>, BoxError> {
        let table = self.table.read().await;
        Ok(table
            .rows
            .values()
            .find(|t| t.token == token && t.token_type == token_type && !t.blacklisted)
            .cloned())
    }

    async fn remove_token(&self, id: i64) -> Result<bool, BoxError> {
        Ok(self.table.write().await.rows.remove(&id).is_some())
    }

    async fn remove_user_tokens(&self, user_id: i64) -> Result<u64, BoxError> {
        let mut table = self.table.write().await;
        let before = table.rows.len();
        table.rows.retain(|_, t| t.user_id != user_id);
        Ok((before - table.rows.len()) as u64)
    }
}
