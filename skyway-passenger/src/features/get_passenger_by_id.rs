use async_trait::async_trait;
use serde::Deserialize;
use skyway_core::{take, CoreError, CoreResult, Request, RequestHandler, ValidationErrors, Validator};
use std::sync::Arc;

use crate::models::PassengerDto;
use crate::repository::PassengerRepository;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GetPassengerById {
    pub id: Option<i64>,
}

impl Request for GetPassengerById {
    const NAME: &'static str = "passenger.get_passenger_by_id";
    type Response = PassengerDto;
}

pub struct GetPassengerByIdHandler {
    repository: Arc<dyn PassengerRepository>,
}

impl GetPassengerByIdHandler {
    pub fn new(repository: Arc<dyn PassengerRepository>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl RequestHandler<GetPassengerById> for GetPassengerByIdHandler {
    fn validate(&self, request: &GetPassengerById) -> Result<(), ValidationErrors> {
        Validator::new().required("id", &request.id).finish()
    }

    async fn handle(&self, request: GetPassengerById) -> CoreResult<PassengerDto> {
        let id = take("id", request.id)?;

        self.repository
            .find_passenger_by_id(id)
            .await?
            .map(PassengerDto::from)
            .ok_or_else(|| CoreError::not_found("Passenger not found"))
    }
}
