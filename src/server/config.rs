//! Server configuration types
//!
//! Loaded from `vitrin.toml` when present, then overridden by environment
//! variables (`PORT`, `DATABASE_URL`, `VITRIN_ADMIN_TOKEN`) and CLI flags.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;

use crate::cli::Cli;

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub stream: StreamConfig,
    #[serde(default)]
    pub admin: AdminConfig,
}

/// HTTP listener settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Database settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_database_url")]
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_database_url() -> String {
    "sqlite://vitrin.db".to_string()
}

fn default_max_connections() -> u32 {
    5
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_database_url(),
            max_connections: default_max_connections(),
        }
    }
}

/// SSE stream settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamConfig {
    /// Reconnect hint sent to clients as the first SSE frame, in milliseconds
    #[serde(default = "default_retry_ms")]
    pub retry_ms: u64,
    /// Interval between keep-alive comments on idle streams, in seconds
    #[serde(default = "default_keep_alive_secs")]
    pub keep_alive_secs: u64,
}

fn default_retry_ms() -> u64 {
    3000
}

fn default_keep_alive_secs() -> u64 {
    15
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            retry_ms: default_retry_ms(),
            keep_alive_secs: default_keep_alive_secs(),
        }
    }
}

/// Placeholder admin gate settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminConfig {
    #[serde(default = "default_admin_token")]
    pub token: String,
}

fn default_admin_token() -> String {
    "admin123".to_string()
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            token: default_admin_token(),
        }
    }
}

impl AppConfig {
    /// Load configuration: file, then env, then CLI flags.
    pub fn load(cli: &Cli) -> Result<Self> {
        let mut config = if cli.config.exists() {
            let content = fs::read_to_string(&cli.config)
                .with_context(|| format!("Failed to read {}", cli.config.display()))?;
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse {}", cli.config.display()))?
        } else {
            Self::default()
        };

        if let Ok(port) = std::env::var("PORT") {
            config.server.port = port
                .parse()
                .with_context(|| format!("Invalid PORT value: {port}"))?;
        }
        if let Ok(url) = std::env::var("DATABASE_URL") {
            config.database.url = url;
        }
        if let Ok(token) = std::env::var("VITRIN_ADMIN_TOKEN") {
            config.admin.token = token;
        }

        if let Some(host) = &cli.host {
            config.server.host = host.clone();
        }
        if let Some(port) = cli.port {
            config.server.port = port;
        }
        if let Some(url) = &cli.database_url {
            config.database.url = url.clone();
        }

        Ok(config)
    }
}
