pub mod features;
pub mod models;
pub mod repository;

use skyway_core::{EventPublisher, MediatorBuilder, RegistryError};
use std::sync::Arc;

pub use features::{CreateFlight, GetFlightById, GetFlights};
pub use models::{Flight, FlightDto, FlightStatus, NewFlight};
pub use repository::{FlightRepository, InMemoryFlightRepository};

/// Collaborators the flight handlers are built from.
#[derive(Clone)]
pub struct FlightDependencies {
    pub repository: Arc<dyn FlightRepository>,
    pub publisher: Arc<dyn EventPublisher>,
}

/// Register every flight request handler.
pub fn register_handlers(
    builder: &mut MediatorBuilder,
    deps: &FlightDependencies,
) -> Result<(), RegistryError> {
    builder
        .register::<CreateFlight, _>(features::CreateFlightHandler::new(
            deps.repository.clone(),
            deps.publisher.clone(),
        ))?
        .register::<GetFlightById, _>(features::GetFlightByIdHandler::new(deps.repository.clone()))?
        .register::<GetFlights, _>(features::GetFlightsHandler::new(deps.repository.clone()))?;
    Ok(())
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use skyway_core::{InMemoryPublisher, Mediator};

    pub struct Harness {
        pub mediator: Mediator,
        pub repository: Arc<InMemoryFlightRepository>,
        pub publisher: Arc<InMemoryPublisher>,
    }

    impl Harness {
        pub fn new() -> Self {
            let repository = Arc::new(InMemoryFlightRepository::new());
            let publisher = Arc::new(InMemoryPublisher::new());
            let deps = FlightDependencies {
                repository: repository.clone(),
                publisher: publisher.clone(),
            };
            let mut builder = MediatorBuilder::new();
            register_handlers(&mut builder, &deps).unwrap();
            Self {
                mediator: builder.build(),
                repository,
                publisher,
            }
        }
    }

    pub fn create_flight(flight_number: &str) -> CreateFlight {
        let departure = Utc.with_ymd_and_hms(2026, 11, 2, 8, 30, 0).unwrap();
        CreateFlight {
            flight_number: Some(flight_number.to_string()),
            price: Some(420.0),
            flight_status: Some("FLYING".into()),
            flight_date: Some(departure),
            departure_date: Some(departure),
            departure_airport_id: Some(1),
            aircraft_id: Some(7),
            arrive_date: Some(departure + Duration::minutes(95)),
            arrive_airport_id: Some(2),
            duration_minutes: Some(95),
        }
    }

    #[tokio::test]
    async fn test_all_flight_requests_are_routed() {
        let harness = Harness::new();
        for name in [
            <CreateFlight as skyway_core::Request>::NAME,
            <GetFlightById as skyway_core::Request>::NAME,
            <GetFlights as skyway_core::Request>::NAME,
        ] {
            assert!(harness.mediator.is_registered(name), "{name} not registered");
        }
    }
}
