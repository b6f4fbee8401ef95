//! Process wiring shared by the service binaries.

use axum::Router;
use skyway_core::{EventPublisher, InMemoryPublisher};
use skyway_store::{Config, DbClient, EventProducer, Schema};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "skyway_api=debug,skyway_core=debug,skyway_flight=debug,skyway_identity=debug,\
                 skyway_passenger=debug,skyway_store=debug,tower_http=debug,axum::rejection=trace"
                    .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Connect and migrate when a database url is configured.
pub async fn database(config: &Config, schema: Schema) -> anyhow::Result<Option<DbClient>> {
    let Some(url) = &config.database.url else {
        warn!("database.url not set, {:?} data is kept in memory", schema);
        return Ok(None);
    };

    let db = DbClient::new(url, config.database.max_connections).await?;
    db.migrate(schema).await?;
    Ok(Some(db))
}

pub fn event_publisher(config: &Config) -> anyhow::Result<Arc<dyn EventPublisher>> {
    match &config.kafka.brokers {
        Some(brokers) => Ok(Arc::new(EventProducer::new(brokers)?)),
        None => {
            warn!("kafka.brokers not set, integration events are only logged");
            Ok(Arc::new(InMemoryPublisher::new()))
        }
    }
}

pub async fn serve(port: u16, app: Router) -> anyhow::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
