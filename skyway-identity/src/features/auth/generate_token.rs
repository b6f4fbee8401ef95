use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use skyway_core::{take, CoreError, CoreResult, Request, RequestHandler, ValidationErrors, Validator};
use skyway_shared::auth::{encode_token, TokenClaims, TokenType};
use std::sync::Arc;

use crate::models::{AuthDto, AuthTokenDto, NewToken};
use crate::repository::{AuthRepository, UserRepository};

/// Signing key and lifetimes for issued tokens.
#[derive(Debug, Clone)]
pub struct TokenSettings {
    pub secret: String,
    pub access_expiration_minutes: i64,
    pub refresh_expiration_days: i64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateToken {
    pub user_id: Option<i64>,
}

impl Request for GenerateToken {
    const NAME: &'static str = "identity.generate_token";
    type Response = AuthDto;
}

pub struct GenerateTokenHandler {
    users: Arc<dyn UserRepository>,
    tokens: Arc<dyn AuthRepository>,
    settings: TokenSettings,
}

impl GenerateTokenHandler {
    pub fn new(
        users: Arc<dyn UserRepository>,
        tokens: Arc<dyn AuthRepository>,
        settings: TokenSettings,
    ) -> Self {
        Self {
            users,
            tokens,
            settings,
        }
    }

    async fn issue(
        &self,
        user_id: i64,
        token_type: TokenType,
        now: DateTime<Utc>,
        expires: DateTime<Utc>,
    ) -> CoreResult<AuthTokenDto> {
        let claims = TokenClaims::new(user_id, token_type, now, expires);
        let token = encode_token(&self.settings.secret, &claims).map_err(CoreError::internal)?;

        self.tokens
            .create_token(NewToken {
                token: token.clone(),
                token_type,
                expires,
                user_id,
            })
            .await?;

        Ok(AuthTokenDto { token, expires })
    }
}

#[async_trait]
impl RequestHandler<GenerateToken> for GenerateTokenHandler {
    fn validate(&self, request: &GenerateToken) -> Result<(), ValidationErrors> {
        Validator::new().required("userId", &request.user_id).finish()
    }

    async fn handle(&self, request: GenerateToken) -> CoreResult<AuthDto> {
        let user_id = take("userId", request.user_id)?;
        if self.users.find_user_by_id(user_id).await?.is_none() {
            return Err(CoreError::not_found("User not found"));
        }

        let now = Utc::now();
        let access = self
            .issue(
                user_id,
                TokenType::Access,
                now,
                now + Duration::minutes(self.settings.access_expiration_minutes),
            )
            .await?;
        let refresh = self
            .issue(
                user_id,
                TokenType::Refresh,
                now,
                now + Duration::days(self.settings.refresh_expiration_days),
            )
            .await?;

        tracing::debug!("Issued token pair for user {}", user_id);
        Ok(AuthDto { access, refresh })
    }
}
