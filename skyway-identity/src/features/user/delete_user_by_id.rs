use async_trait::async_trait;
use serde::Deserialize;
use skyway_core::{take, CoreError, CoreResult, Request, RequestHandler, ValidationErrors, Validator};
use std::sync::Arc;

use crate::models::UserDto;
use crate::repository::{AuthRepository, UserRepository};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DeleteUserById {
    pub id: Option<i64>,
}

impl Request for DeleteUserById {
    const NAME: &'static str = "identity.delete_user_by_id";
    type Response = UserDto;
}

/// Removes the user together with every token issued to them.
pub struct DeleteUserByIdHandler {
    users: Arc<dyn UserRepository>,
    tokens: Arc<dyn AuthRepository>,
}

impl DeleteUserByIdHandler {
    pub fn new(users: Arc<dyn UserRepository>, tokens: Arc<dyn AuthRepository>) -> Self {
        Self { users, tokens }
    }
}

#[async_trait]
impl RequestHandler<DeleteUserById> for DeleteUserByIdHandler {
    fn validate(&self, request: &DeleteUserById) -> Result<(), ValidationErrors> {
        Validator::new().required("id", &request.id).finish()
    }

    async fn handle(&self, request: DeleteUserById) -> CoreResult<UserDto> {
        let id = take("id", request.id)?;
        let user = self
            .users
            .find_user_by_id(id)
            .await?
            .ok_or_else(|| CoreError::not_found("User not found"))?;

        let revoked = self.tokens.remove_user_tokens(id).await?;
        if !self.users.remove_user(id).await? {
            return Err(CoreError::not_found("User not found"));
        }
        tracing::info!("Deleted user {} and revoked {} tokens", id, revoked);

        Ok(UserDto::from(user))
    }
}
