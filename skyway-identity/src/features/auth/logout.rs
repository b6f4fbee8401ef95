use async_trait::async_trait;
use skyway_core::{take, CoreError, CoreResult, Request, RequestHandler, ValidationErrors, Validator};
use skyway_shared::auth::TokenType;
use std::sync::Arc;

use crate::repository::AuthRepository;

/// Revoke the presented access token.
#[derive(Debug, Clone, Default)]
pub struct Logout {
    pub access_token: Option<String>,
}

impl Request for Logout {
    const NAME: &'static str = "identity.logout";
    type Response = ();
}

pub struct LogoutHandler {
    tokens: Arc<dyn AuthRepository>,
}

impl LogoutHandler {
    pub fn new(tokens: Arc<dyn AuthRepository>) -> Self {
        Self { tokens }
    }
}

#[async_trait]
impl RequestHandler<Logout> for LogoutHandler {
    fn validate(&self, request: &Logout) -> Result<(), ValidationErrors> {
        Validator::new()
            .required("accessToken", &request.access_token)
            .finish()
    }

    async fn handle(&self, request: Logout) -> CoreResult<()> {
        let access_token = take("accessToken", request.access_token)?;

        let stored = self
            .tokens
            .find_token(&access_token, TokenType::Access)
            .await?
            .ok_or_else(|| CoreError::not_found("Access token not found"))?;

        if !self.tokens.remove_token(stored.id).await? {
            return Err(CoreError::not_found("Access token not found"));
        }
        tracing::info!("User {} logged out", stored.user_id);
        Ok(())
    }
}
