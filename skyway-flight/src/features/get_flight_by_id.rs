use async_trait::async_trait;
use serde::Deserialize;
use skyway_core::{take, CoreError, CoreResult, Request, RequestHandler, ValidationErrors, Validator};
use std::sync::Arc;

use crate::models::FlightDto;
use crate::repository::FlightRepository;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GetFlightById {
    pub id: Option<i64>,
}

impl Request for GetFlightById {
    const NAME: &'static str = "flight.get_flight_by_id";
    type Response = FlightDto;
}

pub struct GetFlightByIdHandler {
    repository: Arc<dyn FlightRepository>,
}

impl GetFlightByIdHandler {
    pub fn new(repository: Arc<dyn FlightRepository>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl RequestHandler<GetFlightById> for GetFlightByIdHandler {
    fn validate(&self, request: &GetFlightById) -> Result<(), ValidationErrors> {
        Validator::new().required("id", &request.id).finish()
    }

    async fn handle(&self, request: GetFlightById) -> CoreResult<FlightDto> {
        let id = take("id", request.id)?;

        self.repository
            .find_flight_by_id(id)
            .await?
            .map(FlightDto::from)
            .ok_or_else(|| CoreError::not_found("Flight not found"))
    }
}
