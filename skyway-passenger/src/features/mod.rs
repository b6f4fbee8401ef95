pub mod create_passenger;
pub mod get_passenger_by_id;
pub mod get_passengers;

pub use create_passenger::{CreatePassenger, CreatePassengerHandler};
pub use get_passenger_by_id::{GetPassengerById, GetPassengerByIdHandler};
pub use get_passengers::{GetPassengers, GetPassengersHandler};
