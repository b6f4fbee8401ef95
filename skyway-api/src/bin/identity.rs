use skyway_api::{app, bootstrap, identity, AppState};
use skyway_identity::{
    AuthRepository, IdentityDependencies, InMemoryAuthRepository, InMemoryUserRepository,
    TokenSettings, UserRepository,
};
use skyway_store::{Config, PostgresAuthRepository, PostgresUserRepository, Schema};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    bootstrap::init_tracing();

    let config = Config::load("identity")?;
    tracing::info!("Starting identity service on port {}", config.server.port);

    let (users, tokens): (Arc<dyn UserRepository>, Arc<dyn AuthRepository>) =
        match bootstrap::database(&config, Schema::Identity).await? {
            Some(db) => (
                Arc::new(PostgresUserRepository::new(db.pool.clone())),
                Arc::new(PostgresAuthRepository::new(db.pool)),
            ),
            None => (
                Arc::new(InMemoryUserRepository::new()),
                Arc::new(InMemoryAuthRepository::new()),
            ),
        };
    let deps = IdentityDependencies {
        users,
        tokens,
        publisher: bootstrap::event_publisher(&config)?,
        settings: TokenSettings {
            secret: config.auth.jwt_secret.clone(),
            access_expiration_minutes: config.auth.access_expiration_minutes,
            refresh_expiration_days: config.auth.refresh_expiration_days,
        },
    };

    let state = AppState::new(identity::build_mediator(&deps)?, config.auth.jwt_secret.clone());
    let router = app(state.clone(), identity::routes(&state));
    bootstrap::serve(config.server.port, router).await
}
