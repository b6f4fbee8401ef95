use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;
use sqlx::{Pool, Postgres};
use std::time::Duration;
use tracing::info;

/// Each service owns its database and migration set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Schema {
    Flight,
    Identity,
    Passenger,
}

static FLIGHT_MIGRATIONS: Migrator = sqlx::migrate!("../migrations/flight");
static IDENTITY_MIGRATIONS: Migrator = sqlx::migrate!("../migrations/identity");
static PASSENGER_MIGRATIONS: Migrator = sqlx::migrate!("../migrations/passenger");

impl Schema {
    fn migrator(&self) -> &'static Migrator {
        match self {
            Schema::Flight => &FLIGHT_MIGRATIONS,
            Schema::Identity => &IDENTITY_MIGRATIONS,
            Schema::Passenger => &PASSENGER_MIGRATIONS,
        }
    }
}

#[derive(Clone)]
pub struct DbClient {
    pub pool: Pool<Postgres>,
}

impl DbClient {
    pub async fn new(connection_string: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(Duration::from_secs(3))
            .connect(connection_string)
            .await?;

        Ok(Self { pool })
    }

    pub async fn migrate(&self, schema: Schema) -> Result<(), sqlx::migrate::MigrateError> {
        info!("Running {:?} database migrations...", schema);
        schema.migrator().run(&self.pool).await?;
        info!("Migrations completed successfully.");
        Ok(())
    }
}
