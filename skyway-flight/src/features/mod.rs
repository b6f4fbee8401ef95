pub mod create_flight;
pub mod get_flight_by_id;
pub mod get_flights;

pub use create_flight::{CreateFlight, CreateFlightHandler};
pub use get_flight_by_id::{GetFlightById, GetFlightByIdHandler};
pub use get_flights::{GetFlights, GetFlightsHandler};
