use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub booking_rules: BookingRules,
}

/// Business rules for the booking lifecycle. Defaults come from the config
/// files; operators can override single rules in the `booking_rules` table.
#[derive(Debug, Deserialize, Clone)]
pub struct BookingRules {
    pub reservation_lead_hours: i64,
    pub ticket_cancel_cutoff_hours: i64,
    pub reservation_cancel_cutoff_hours: i64,
    pub pending_ttl_hours: i64,
    #[serde(default = "default_deposit_percent")]
    pub default_deposit_percent: u8,
    #[serde(default = "default_sweep_seconds")]
    pub expiry_sweep_seconds: u64,
}

fn default_deposit_percent() -> u8 {
    20
}

fn default_sweep_seconds() -> u64 {
    60
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub jwt_expiration_seconds: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            // Start off by merging in the "default" configuration file
            .add_source(config::File::with_name("config/default"))
            // Add in the current environment file
            // Default to 'development' env
            // Note that this file is _optional_
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Add in a local configuration file
            // This file shouldn't be checked in to git
            .add_source(config::File::with_name("config/local").required(false))
            // Add in settings from the environment (with a prefix of WAVELINE)
            // Eg. `WAVELINE__SERVER__PORT=8080` would set the server port
            .add_source(config::Environment::with_prefix("WAVELINE").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
