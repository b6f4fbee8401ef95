use async_trait::async_trait;
use serde::Deserialize;
use skyway_core::{take, CoreError, CoreResult, Mediator, Request, RequestHandler, ValidationErrors, Validator};
use skyway_shared::Masked;
use std::sync::Arc;

use super::generate_token::GenerateToken;
use crate::models::AuthDto;
use crate::password;
use crate::repository::UserRepository;

const BAD_CREDENTIALS: &str = "Incorrect email or password";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Login {
    pub email: Option<String>,
    pub password: Option<Masked<String>>,
}

impl Request for Login {
    const NAME: &'static str = "identity.login";
    type Response = AuthDto;
}

pub struct LoginHandler {
    users: Arc<dyn UserRepository>,
    mediator: Mediator,
}

impl LoginHandler {
    pub fn new(users: Arc<dyn UserRepository>, mediator: Mediator) -> Self {
        Self { users, mediator }
    }
}

#[async_trait]
impl RequestHandler<Login> for LoginHandler {
    fn validate(&self, request: &Login) -> Result<(), ValidationErrors> {
        Validator::new()
            .required("email", &request.email)
            .required("password", &request.password)
            .finish()
    }

    async fn handle(&self, request: Login) -> CoreResult<AuthDto> {
        let email = take("email", request.email)?;
        let secret = take("password", request.password)?;

        let user = match self.users.find_user_by_email(&email).await? {
            Some(user) if password::verify_password(secret.expose(), &user.password_hash) => user,
            _ => {
                tracing::warn!("Failed login for {}", email);
                return Err(CoreError::unauthorized(BAD_CREDENTIALS));
            }
        };

        self.mediator
            .send(GenerateToken {
                user_id: Some(user.id),
            })
            .await
    }
}
