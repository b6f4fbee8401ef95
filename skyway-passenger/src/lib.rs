pub mod consumers;
pub mod features;
pub mod models;
pub mod repository;

use skyway_core::{MediatorBuilder, RegistryError};
use std::sync::Arc;

pub use features::{CreatePassenger, GetPassengerById, GetPassengers};
pub use models::{Passenger, PassengerDto, PassengerType};
pub use repository::{InMemoryPassengerRepository, PassengerRepository};

/// Collaborators the passenger handlers are built from.
#[derive(Clone)]
pub struct PassengerDependencies {
    pub repository: Arc<dyn PassengerRepository>,
}

/// Register every passenger request handler.
pub fn register_handlers(
    builder: &mut MediatorBuilder,
    deps: &PassengerDependencies,
) -> Result<(), RegistryError> {
    builder
        .register::<CreatePassenger, _>(features::CreatePassengerHandler::new(deps.repository.clone()))?
        .register::<GetPassengerById, _>(features::GetPassengerByIdHandler::new(deps.repository.clone()))?
        .register::<GetPassengers, _>(features::GetPassengersHandler::new(deps.repository.clone()))?;
    Ok(())
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use skyway_core::Mediator;

    pub struct Harness {
        pub mediator: Mediator,
        pub repository: Arc<InMemoryPassengerRepository>,
    }

    impl Harness {
        pub fn new() -> Self {
            let repository = Arc::new(InMemoryPassengerRepository::new());
            let deps = PassengerDependencies {
                repository: repository.clone(),
            };
            let mut builder = MediatorBuilder::new();
            register_handlers(&mut builder, &deps).unwrap();
            Self {
                mediator: builder.build(),
                repository,
            }
        }
    }

    pub fn create_passenger(user_id: i64) -> CreatePassenger {
        CreatePassenger {
            user_id: Some(user_id),
            name: Some(format!("Passenger {user_id}")),
            passport_number: Some(format!("P{user_id:07}")),
            age: None,
            passenger_type: None,
        }
    }
}
