use async_trait::async_trait;
use serde::Deserialize;
use skyway_core::{take, CoreError, CoreResult, Request, RequestHandler, ValidationErrors, Validator};
use std::sync::Arc;

use crate::models::UserDto;
use crate::repository::UserRepository;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GetUserById {
    pub id: Option<i64>,
}

impl Request for GetUserById {
    const NAME: &'static str = "identity.get_user_by_id";
    type Response = UserDto;
}

pub struct GetUserByIdHandler {
    users: Arc<dyn UserRepository>,
}

impl GetUserByIdHandler {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }
}

#[async_trait]
impl RequestHandler<GetUserById> for GetUserByIdHandler {
    fn validate(&self, request: &GetUserById) -> Result<(), ValidationErrors> {
        Validator::new().required("id", &request.id).finish()
    }

    async fn handle(&self, request: GetUserById) -> CoreResult<UserDto> {
        let id = take("id", request.id)?;

        self.users
            .find_user_by_id(id)
            .await?
            .map(UserDto::from)
            .ok_or_else(|| CoreError::not_found("User not found"))
    }
}
