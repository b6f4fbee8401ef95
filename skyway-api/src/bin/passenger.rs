use skyway_api::{app, bootstrap, passenger, AppState};
use skyway_passenger::{consumers, InMemoryPassengerRepository, PassengerDependencies, PassengerRepository};
use skyway_store::{Config, EventConsumer, PostgresPassengerRepository, Schema};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    bootstrap::init_tracing();

    let config = Config::load("passenger")?;
    tracing::info!("Starting passenger service on port {}", config.server.port);

    let repository: Arc<dyn PassengerRepository> =
        match bootstrap::database(&config, Schema::Passenger).await? {
            Some(db) => Arc::new(PostgresPassengerRepository::new(db.pool)),
            None => Arc::new(InMemoryPassengerRepository::new()),
        };
    let mediator = passenger::build_mediator(&PassengerDependencies { repository })?;

    match &config.kafka.brokers {
        Some(brokers) => {
            let consumer = EventConsumer::new(brokers, &config.kafka.group_id, consumers::TOPICS)?;
            let mediator = mediator.clone();
            tokio::spawn(async move {
                consumer
                    .run(move |envelope| {
                        let mediator = mediator.clone();
                        async move { consumers::handle_envelope(&mediator, &envelope).await }
                    })
                    .await
            });
        }
        None => tracing::warn!("kafka.brokers not set, passengers are not created from new users"),
    }

    let state = AppState::new(mediator, config.auth.jwt_secret.clone());
    let router = app(state.clone(), passenger::routes(&state));
    bootstrap::serve(config.server.port, router).await
}
