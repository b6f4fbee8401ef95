use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub kafka: KafkaConfig,
    pub auth: AuthConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    /// Without a url the service keeps its data in memory.
    pub url: Option<String>,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_max_connections() -> u32 {
    5
}

#[derive(Debug, Deserialize, Clone)]
pub struct KafkaConfig {
    /// Without brokers events are only logged and nothing is consumed.
    pub brokers: Option<String>,
    pub group_id: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub access_expiration_minutes: i64,
    pub refresh_expiration_days: i64,
}

impl Config {
    /// Load the settings of `service` from `config/` in the working directory.
    pub fn load(service: &str) -> Result<Self, config::ConfigError> {
        Self::load_from("config", service)
    }

    pub fn load_from(dir: &str, service: &str) -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            // Shared defaults
            .add_source(config::File::with_name(&format!("{dir}/default")))
            // Per-service overrides (port, database, consumer group)
            .add_source(config::File::with_name(&format!("{dir}/{service}")).required(false))
            .add_source(config::File::with_name(&format!("{dir}/{run_mode}")).required(false))
            // Not checked in
            .add_source(config::File::with_name(&format!("{dir}/local")).required(false))
            // Eg. `SKYWAY_DATABASE__URL=postgres://...`
            .add_source(
                config::Environment::with_prefix("SKYWAY")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        s.try_deserialize()
    }
}
