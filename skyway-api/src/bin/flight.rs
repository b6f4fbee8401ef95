use skyway_api::{app, bootstrap, flight, AppState};
use skyway_flight::{FlightDependencies, FlightRepository, InMemoryFlightRepository};
use skyway_store::{Config, PostgresFlightRepository, Schema};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    bootstrap::init_tracing();

    let config = Config::load("flight")?;
    tracing::info!("Starting flight service on port {}", config.server.port);

    let repository: Arc<dyn FlightRepository> = match bootstrap::database(&config, Schema::Flight).await? {
        Some(db) => Arc::new(PostgresFlightRepository::new(db.pool)),
        None => Arc::new(InMemoryFlightRepository::new()),
    };
    let deps = FlightDependencies {
        repository,
        publisher: bootstrap::event_publisher(&config)?,
    };

    let state = AppState::new(flight::build_mediator(&deps)?, config.auth.jwt_secret.clone());
    let router = app(state.clone(), flight::routes(&state));
    bootstrap::serve(config.server.port, router).await
}
