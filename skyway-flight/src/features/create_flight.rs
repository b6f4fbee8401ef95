use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use skyway_core::{
    conflict_on_duplicate, publish, take, CoreError, CoreResult, EventPublisher, Request,
    RequestHandler, ValidationErrors, Validator,
};
use skyway_shared::contracts::FlightCreated;
use std::sync::Arc;

use crate::models::{FlightDto, FlightStatus, NewFlight};
use crate::repository::FlightRepository;

/// Schedule a new flight.
///
/// Every field is optional on the wire so that missing input is reported by
/// the validation gate rather than rejected by the transport.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFlight {
    pub flight_number: Option<String>,
    pub price: Option<f64>,
    pub flight_status: Option<String>,
    pub flight_date: Option<DateTime<Utc>>,
    pub departure_date: Option<DateTime<Utc>>,
    pub departure_airport_id: Option<i64>,
    pub aircraft_id: Option<i64>,
    pub arrive_date: Option<DateTime<Utc>>,
    pub arrive_airport_id: Option<i64>,
    pub duration_minutes: Option<i32>,
}

impl Request for CreateFlight {
    const NAME: &'static str = "flight.create_flight";
    type Response = FlightDto;
}

impl TryFrom<CreateFlight> for NewFlight {
    type Error = CoreError;

    fn try_from(request: CreateFlight) -> CoreResult<Self> {
        let status = take("flightStatus", request.flight_status)?;
        Ok(NewFlight {
            flight_number: take("flightNumber", request.flight_number)?,
            price: take("price", request.price)?,
            flight_status: status
                .parse::<FlightStatus>()
                .map_err(|e| CoreError::invalid("flightStatus", e))?,
            flight_date: take("flightDate", request.flight_date)?,
            departure_date: take("departureDate", request.departure_date)?,
            departure_airport_id: take("departureAirportId", request.departure_airport_id)?,
            aircraft_id: take("aircraftId", request.aircraft_id)?,
            arrive_date: take("arriveDate", request.arrive_date)?,
            arrive_airport_id: take("arriveAirportId", request.arrive_airport_id)?,
            duration_minutes: take("durationMinutes", request.duration_minutes)?,
        })
    }
}

pub struct CreateFlightHandler {
    repository: Arc<dyn FlightRepository>,
    publisher: Arc<dyn EventPublisher>,
}

impl CreateFlightHandler {
    pub fn new(repository: Arc<dyn FlightRepository>, publisher: Arc<dyn EventPublisher>) -> Self {
        Self { repository, publisher }
    }
}

#[async_trait]
impl RequestHandler<CreateFlight> for CreateFlightHandler {
    fn validate(&self, request: &CreateFlight) -> Result<(), ValidationErrors> {
        let arrives_after_departure = match (request.departure_date, request.arrive_date) {
            (Some(departure), Some(arrival)) => arrival > departure,
            _ => true,
        };

        Validator::new()
            .required("flightNumber", &request.flight_number)
            .required("price", &request.price)
            .min("price", request.price, 0.0)
            .required("flightStatus", &request.flight_status)
            .one_of("flightStatus", request.flight_status.as_deref(), FlightStatus::NAMES)
            .required("flightDate", &request.flight_date)
            .required("departureDate", &request.departure_date)
            .required("departureAirportId", &request.departure_airport_id)
            .required("aircraftId", &request.aircraft_id)
            .required("arriveDate", &request.arrive_date)
            .required("arriveAirportId", &request.arrive_airport_id)
            .required("durationMinutes", &request.duration_minutes)
            .min("durationMinutes", request.duration_minutes, 0)
            .check("arriveDate", arrives_after_departure, "must be after departureDate")
            .finish()
    }

    async fn handle(&self, request: CreateFlight) -> CoreResult<FlightDto> {
        let flight = NewFlight::try_from(request)?;

        if self
            .repository
            .find_flight_by_number(&flight.flight_number)
            .await?
            .is_some()
        {
            return Err(CoreError::conflict("Flight already taken"));
        }

        let flight = self
            .repository
            .create_flight(flight)
            .await
            .map_err(conflict_on_duplicate("Flight already taken"))?;
        tracing::info!("Created flight {} ({})", flight.flight_number, flight.id);

        publish(self.publisher.as_ref(), &FlightCreated::from(&flight)).await?;

        Ok(FlightDto::from(flight))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{create_flight, Harness};
    use skyway_core::IntegrationEvent;

    #[tokio::test]
    async fn test_create_flight_stores_and_publishes_once() {
        let harness = Harness::new();

        let flight = harness.mediator.send(create_flight("SK100")).await.unwrap();

        assert_eq!(flight.flight_number, "SK100");
        assert_eq!(flight.flight_status, FlightStatus::Flying);
        assert_eq!(harness.repository.count().await, 1);

        let events = harness.publisher.published_on(FlightCreated::TOPIC);
        assert_eq!(events.len(), 1);
        let event: FlightCreated = events[0].open().unwrap().unwrap();
        assert_eq!(event.id, flight.id);
        assert_eq!(event.flight_status, "FLYING");
    }

    #[tokio::test]
    async fn test_duplicate_flight_number_conflicts_without_side_effects() {
        let harness = Harness::new();
        harness.mediator.send(create_flight("SK100")).await.unwrap();

        let err = harness.mediator.send(create_flight("SK100")).await.unwrap_err();

        assert!(matches!(err, CoreError::Conflict(ref msg) if msg == "Flight already taken"));
        assert_eq!(harness.repository.count().await, 1);
        assert_eq!(harness.publisher.published().len(), 1);
    }

    #[tokio::test]
    async fn test_missing_flight_number_is_rejected_before_any_write() {
        let harness = Harness::new();
        let request = CreateFlight {
            flight_number: None,
            ..create_flight("ignored")
        };

        let err = harness.mediator.send(request).await.unwrap_err();

        match err {
            CoreError::ValidationFailed(errors) => assert_eq!(errors.fields(), vec!["flightNumber"]),
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(harness.repository.count().await, 0);
        assert!(harness.publisher.published().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_status_and_inverted_dates_are_reported_together() {
        let harness = Harness::new();
        let valid = create_flight("SK200");
        let request = CreateFlight {
            flight_status: Some("BOARDING".into()),
            arrive_date: valid.departure_date,
            ..valid
        };

        let err = harness.mediator.send(request).await.unwrap_err();

        match err {
            CoreError::ValidationFailed(errors) => {
                assert_eq!(errors.fields(), vec!["flightStatus", "arriveDate"])
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
