use figment::providers::Env;
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::domain::error::{AppError, Result};

/// Process configuration, read from `APP_*` environment variables after
/// loading a `.env` file when one is present.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// Bind address for the HTTP server
    #[serde(default = "default_host")]
    pub host: String,

    /// Bind port for the HTTP server
    #[serde(default = "default_port")]
    pub port: u16,

    /// sqlx connection string for the users database
    #[serde(default = "default_database_url")]
    pub database_url: String,

    /// Path of the CSV file loaded by the ingestion trigger
    #[serde(default)]
    pub csv_file_path: String,

    /// Number of accepted records per bulk insert
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_database_url() -> String {
    "sqlite:users.db".to_string()
}

fn default_batch_size() -> usize {
    1000
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            database_url: default_database_url(),
            csv_file_path: String::new(),
            batch_size: default_batch_size(),
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();

        Figment::new()
            .merge(Env::prefixed("APP_"))
            .extract()
            .map_err(|e| AppError::Internal(format!("Failed to load configuration: {}", e)))
    }
}
