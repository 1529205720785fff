//! # configs
//!
//! Layered configuration: built-in defaults, then an optional TOML file,
//! then `AGORA__<SECTION>__<KEY>` environment variables (a `.env` file is
//! loaded into the environment first).

use ag_engine::EngineConfig;
use ag_sim::SimulationConfig;
use config::builder::DefaultState;
use config::{ConfigBuilder, Environment, File};
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub engine: EngineConfig,
    pub simulation: SimulationConfig,
    pub log: LogConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

impl ServerConfig {
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// `tracing_subscriber::EnvFilter` directives; `RUST_LOG` wins when set
    pub filter: String,
    pub json: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            json: false,
        }
    }
}

/// Loads the configuration. Without an explicit path, `agora.toml` in the
/// working directory is used when present.
pub fn load(path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();

    let builder = config::Config::builder();
    let builder = match path {
        Some(path) => builder.add_source(File::from(path)),
        None => builder.add_source(File::with_name("agora").required(false)),
    };
    build(builder.add_source(environment()))
}

/// `AGORA__ENGINE__ORPHAN_THREADS=detach` sets `engine.orphan_threads`.
fn environment() -> Environment {
    Environment::with_prefix("AGORA")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}

fn build(builder: ConfigBuilder<DefaultState>) -> Result<AppConfig, ConfigError> {
    Ok(builder.build()?.try_deserialize()?)
}
