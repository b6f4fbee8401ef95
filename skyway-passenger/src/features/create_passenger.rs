use async_trait::async_trait;
use serde::Deserialize;
use skyway_core::{
    conflict_on_duplicate, take, CoreError, CoreResult, Request, RequestHandler, ValidationErrors,
    Validator,
};
use std::sync::Arc;

use crate::models::{NewPassenger, PassengerDto, PassengerType};
use crate::repository::PassengerRepository;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePassenger {
    pub user_id: Option<i64>,
    pub name: Option<String>,
    pub passport_number: Option<String>,
    /// Defaults to 0 when unknown.
    pub age: Option<i32>,
    /// Defaults to `UNKNOWN`.
    pub passenger_type: Option<String>,
}

impl Request for CreatePassenger {
    const NAME: &'static str = "passenger.create_passenger";
    type Response = PassengerDto;
}

pub struct CreatePassengerHandler {
    repository: Arc<dyn PassengerRepository>,
}

impl CreatePassengerHandler {
    pub fn new(repository: Arc<dyn PassengerRepository>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl RequestHandler<CreatePassenger> for CreatePassengerHandler {
    fn validate(&self, request: &CreatePassenger) -> Result<(), ValidationErrors> {
        Validator::new()
            .required("userId", &request.user_id)
            .required("name", &request.name)
            .required("passportNumber", &request.passport_number)
            .min("age", request.age, 0)
            .one_of("passengerType", request.passenger_type.as_deref(), PassengerType::NAMES)
            .finish()
    }

    async fn handle(&self, request: CreatePassenger) -> CoreResult<PassengerDto> {
        let user_id = take("userId", request.user_id)?;
        let passenger_type = match request.passenger_type {
            Some(value) => value
                .parse()
                .map_err(|e| CoreError::invalid("passengerType", e))?,
            None => PassengerType::Unknown,
        };

        if self.repository.find_passenger_by_user_id(user_id).await?.is_some() {
            return Err(CoreError::conflict("Passenger already exists"));
        }

        let passenger = self
            .repository
            .create_passenger(NewPassenger {
                user_id,
                name: take("name", request.name)?,
                passport_number: take("passportNumber", request.passport_number)?,
                age: request.age.unwrap_or(0),
                passenger_type,
            })
            .await
            .map_err(conflict_on_duplicate("Passenger already exists"))?;
        tracing::info!("Created passenger {} for user {}", passenger.id, user_id);

        Ok(PassengerDto::from(passenger))
    }
}
