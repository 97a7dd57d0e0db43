use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub upstream: UpstreamConfig,
    pub booking_rules: BookingRules,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

/// The remote REST services the workflow fronts. When a base URL is
/// absent the in-memory provider is used instead, so the engine runs
/// standalone in development.
#[derive(Debug, Deserialize, Clone)]
pub struct UpstreamConfig {
    pub search_base_url: Option<String>,
    pub booking_base_url: Option<String>,
    #[serde(default = "default_timeout_seconds")]
    pub request_timeout_seconds: u64,
}

fn default_timeout_seconds() -> u64 {
    10
}

#[derive(Debug, Deserialize, Clone)]
pub struct BookingRules {
    #[serde(default = "default_max_seats")]
    pub max_seats_per_booking: usize,
}

fn default_max_seats() -> usize {
    4
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            // Start off by merging in the "default" configuration file
            .add_source(config::File::with_name("config/default"))
            // Add in the current environment file, optional
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Local overrides, not checked in
            .add_source(config::File::with_name("config/local").required(false))
            // Environment variables with a prefix of RUTA
            // Eg. `RUTA__SERVER__PORT=8080` sets `server.port`
            .add_source(config::Environment::with_prefix("RUTA").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
