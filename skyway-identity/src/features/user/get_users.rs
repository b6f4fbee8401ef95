use async_trait::async_trait;
use skyway_core::{CoreResult, Request, RequestHandler, ValidationErrors};
use skyway_shared::{PageParams, PagedResult};
use std::sync::Arc;

use crate::models::UserDto;
use crate::repository::{UserRepository, SORTABLE_FIELDS};

/// Paged user listing; the search term matches the user name.
#[derive(Debug, Clone, Default)]
pub struct GetUsers {
    pub params: PageParams,
}

impl Request for GetUsers {
    const NAME: &'static str = "identity.get_users";
    type Response = PagedResult<UserDto>;
}

pub struct GetUsersHandler {
    users: Arc<dyn UserRepository>,
}

impl GetUsersHandler {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }
}

#[async_trait]
impl RequestHandler<GetUsers> for GetUsersHandler {
    fn validate(&self, request: &GetUsers) -> Result<(), ValidationErrors> {
        request.params.rules(SORTABLE_FIELDS).finish()
    }

    async fn handle(&self, request: GetUsers) -> CoreResult<PagedResult<UserDto>> {
        let page = self.users.find_users(&request.params.to_query()).await?;
        Ok(page.map(UserDto::from))
    }
}
