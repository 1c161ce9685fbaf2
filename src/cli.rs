//! Command-line arguments for the Vitrin server.

use clap::Parser;
use std::path::PathBuf;

/// Vitrin storefront backend
#[derive(Debug, Parser)]
#[command(name = "vitrin", version, about)]
pub struct Cli {
    /// Path to the TOML config file
    #[arg(long, default_value = "vitrin.toml")]
    pub config: PathBuf,

    /// Bind address (overrides config and env)
    #[arg(long)]
    pub host: Option<String>,

    /// Listen port (overrides config and env)
    #[arg(long)]
    pub port: Option<u16>,

    /// SQLite database URL (overrides config and env)
    #[arg(long)]
    pub database_url: Option<String>,
}
