use async_trait::async_trait;
use skyway_core::{take, CoreError, CoreResult, Request, RequestHandler, ValidationErrors, Validator};
use skyway_shared::auth::{decode_token, TokenType};
use std::sync::Arc;

use super::generate_token::TokenSettings;
use crate::models::Token;
use crate::repository::AuthRepository;

/// Check a presented token and return its stored record.
#[derive(Debug, Clone)]
pub struct ValidateToken {
    pub token: Option<String>,
    pub token_type: TokenType,
}

impl Request for ValidateToken {
    const NAME: &'static str = "identity.validate_token";
    type Response = Token;
}

pub struct ValidateTokenHandler {
    tokens: Arc<dyn AuthRepository>,
    settings: TokenSettings,
}

impl ValidateTokenHandler {
    pub fn new(tokens: Arc<dyn AuthRepository>, settings: TokenSettings) -> Self {
        Self { tokens, settings }
    }
}

#[async_trait]
impl RequestHandler<ValidateToken> for ValidateTokenHandler {
    fn validate(&self, request: &ValidateToken) -> Result<(), ValidationErrors> {
        Validator::new().required("token", &request.token).finish()
    }

    async fn handle(&self, request: ValidateToken) -> CoreResult<Token> {
        let token = take("token", request.token)?;

        let claims = decode_token(&self.settings.secret, &token).map_err(|e| {
            tracing::debug!("Rejected {} token: {}", request.token_type, e);
            CoreError::unauthorized("Invalid token")
        })?;
        if claims.token_type != request.token_type {
            return Err(CoreError::unauthorized("Invalid token type"));
        }

        let stored = self
            .tokens
            .find_token(&token, request.token_type)
            .await?
            .ok_or_else(|| CoreError::unauthorized("Token not found"))?;
        if claims.user_id() != Some(stored.user_id) {
            return Err(CoreError::unauthorized("Invalid token"));
        }

        Ok(stored)
    }
}
