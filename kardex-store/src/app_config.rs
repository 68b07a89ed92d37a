use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub business_rules: BusinessRules,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub jwt_expiration_seconds: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BusinessRules {
    /// Default low-stock threshold when an item is created without one.
    #[serde(default = "default_low_stock")]
    pub low_stock_default: i32,
    #[serde(default = "default_items_per_page")]
    pub items_per_page: u32,
    /// How often the reservation sweeper looks for expired holds.
    #[serde(default = "default_sweep_seconds")]
    pub reservation_sweep_seconds: u64,
    /// Window for the dashboard's recent-transaction count.
    #[serde(default = "default_recent_days")]
    pub recent_transactions_days: i64,
}

fn default_low_stock() -> i32 {
    5
}

fn default_items_per_page() -> u32 {
    20
}

fn default_sweep_seconds() -> u64 {
    300
}

fn default_recent_days() -> i64 {
    7
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            // Environment-specific file, optional.
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Local overrides, not checked in.
            .add_source(config::File::with_name("config/local").required(false))
            // Eg. `KARDEX__SERVER__PORT=8080`.
            .add_source(config::Environment::with_prefix("KARDEX").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
