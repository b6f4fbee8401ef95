use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use skyway_shared::auth::TokenType;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

impl Role {
    pub const NAMES: &'static [&'static str] = &["user", "admin"];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Role::User),
            "admin" => Ok(Role::Admin),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub name: String,
    /// Salted SHA-256 digest, see [`crate::password`].
    pub password_hash: String,
    pub role: Role,
    pub passport_number: String,
    pub is_email_verified: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub email: String,
    pub name: String,
    pub password_hash: String,
    pub role: Role,
    pub passport_number: String,
}

impl NewUser {
    pub fn into_user(self, id: i64, created_at: DateTime<Utc>) -> User {
        User {
            id,
            email: self.email,
            name: self.name,
            password_hash: self.password_hash,
            role: self.role,
            passport_number: self.passport_number,
            is_email_verified: false,
            created_at,
            updated_at: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    pub id: i64,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub passport_number: String,
    pub is_email_verified: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
            role: user.role,
            passport_number: user.passport_number,
            is_email_verified: user.is_email_verified,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// A stored access or refresh token
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub id: i64,
    pub token: String,
    pub token_type: TokenType,
    pub expires: DateTime<Utc>,
    pub blacklisted: bool,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
}

impl Token {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires <= now
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewToken {
    pub token: String,
    pub token_type: TokenType,
    pub expires: DateTime<Utc>,
    pub user_id: i64,
}

impl NewToken {
    pub fn into_token(self, id: i64, created_at: DateTime<Utc>) -> Token {
        Token {
            id,
            token: self.token,
            token_type: self.token_type,
            expires: self.expires,
            blacklisted: false,
            user_id: self.user_id,
            created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthTokenDto {
    pub token: String,
    pub expires: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthDto {
    pub access: AuthTokenDto,
    pub refresh: AuthTokenDto,
}
