use async_trait::async_trait;
use serde::Deserialize;
use skyway_core::{take, CoreError, CoreResult, Mediator, Request, RequestHandler, ValidationErrors, Validator};
use skyway_shared::auth::TokenType;
use std::sync::Arc;

use super::generate_token::GenerateToken;
use super::validate_token::ValidateToken;
use crate::models::AuthDto;
use crate::repository::AuthRepository;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshToken {
    pub refresh_token: Option<String>,
}

impl Request for RefreshToken {
    const NAME: &'static str = "identity.refresh_token";
    type Response = AuthDto;
}

/// Rotates a refresh token: the presented one is consumed and a new pair
/// is issued. Any failure along the way surfaces as `Unauthorized`.
pub struct RefreshTokenHandler {
    tokens: Arc<dyn AuthRepository>,
    mediator: Mediator,
}

impl RefreshTokenHandler {
    pub fn new(tokens: Arc<dyn AuthRepository>, mediator: Mediator) -> Self {
        Self { tokens, mediator }
    }

    async fn rotate(&self, refresh_token: String) -> CoreResult<AuthDto> {
        let stored = self
            .mediator
            .send(ValidateToken {
                token: Some(refresh_token),
                token_type: TokenType::Refresh,
            })
            .await?;

        // A concurrent refresh may have consumed it between validate and remove.
        if !self.tokens.remove_token(stored.id).await? {
            return Err(CoreError::unauthorized("Refresh token already used"));
        }

        self.mediator
            .send(GenerateToken {
                user_id: Some(stored.user_id),
            })
            .await
    }
}

#[async_trait]
impl RequestHandler<RefreshToken> for RefreshTokenHandler {
    fn validate(&self, request: &RefreshToken) -> Result<(), ValidationErrors> {
        Validator::new()
            .required("refreshToken", &request.refresh_token)
            .finish()
    }

    async fn handle(&self, request: RefreshToken) -> CoreResult<AuthDto> {
        let refresh_token = take("refreshToken", request.refresh_token)?;

        self.rotate(refresh_token).await.map_err(|e| {
            tracing::warn!("Token refresh failed: {}", e);
            CoreError::unauthorized("Please authenticate")
        })
    }
}
