pub mod app_config;
pub mod consumer;
pub mod database;
pub mod events;
pub mod flight_repo;
pub mod passenger_repo;
mod sql;
pub mod token_repo;
pub mod user_repo;

pub use app_config::Config;
pub use consumer::EventConsumer;
pub use database::{DbClient, Schema};
pub use events::EventProducer;
pub use flight_repo::PostgresFlightRepository;
pub use passenger_repo::PostgresPassengerRepository;
pub use token_repo::PostgresAuthRepository;
pub use user_repo::PostgresUserRepository;
