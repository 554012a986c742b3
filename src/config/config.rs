use config::{Config as ConfigBuilder, Environment};
use once_cell::sync::Lazy;
use serde::Deserialize;

pub static CONFIG: Lazy<Config> = Lazy::new(|| Config::from_env());

#[derive(Debug, Deserialize)]
pub struct Config {
    pub database_url: String,
    pub server: ServerConfig,
}

#[derive(Debug, Deserialize)]
pub struct ServerConfig {
    pub address: String,
    pub port: u16,
}

impl Config {
    fn from_env() -> Self {
        let builder = ConfigBuilder::builder()
            .set_default("database_url", "postgres://localhost/dragquiz")
            .expect("Failed to set default database_url")
            .set_default("server.address", "0.0.0.0")
            .expect("Failed to set default server.address")
            .set_default("server.port", 8080)
            .expect("Failed to set default server.port")
            .add_source(Environment::with_prefix("DRAGQUIZ").separator("__"))
            .build()
            .expect("Failed to build configuration");

        builder
            .try_deserialize()
            .expect("Failed to deserialize configuration")
    }
}
