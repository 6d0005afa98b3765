//! Meridian API Server
//!
//! Run with: cargo run
//!
//! # Configuration
//!
//! Loaded from a TOML file (see `--config` or the default search paths),
//! then overridden by environment variables:
//! - `MERIDIAN_DATABASE_PATH`: SQLite database file
//! - `MERIDIAN_API_HOST`: Host to bind to (default: 0.0.0.0)
//! - `MERIDIAN_API_PORT`: Port to listen on (default: 8086)
//! - `MERIDIAN_LOG_LEVEL` / `MERIDIAN_LOG_FORMAT`: Logging
//! - `RUST_LOG`: Full tracing filter (takes precedence)
//!
//! Command-line flags override both.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use meridian::api::{serve, AppState};
use meridian::config::{generate_default_config, Config};
use meridian::store::{MemoryStore, SqliteStore, Store};

#[derive(Debug, Parser)]
#[command(name = "meridian", version, about = "Meridian health journaling API server")]
struct Cli {
    /// Path to a TOML config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Host to bind to (overrides config)
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on (overrides config)
    #[arg(long)]
    port: Option<u16>,

    /// SQLite database path (overrides config)
    #[arg(long)]
    database: Option<String>,

    /// Use the volatile in-memory store (data lost on exit)
    #[arg(long)]
    memory: bool,

    /// Print a default config file to stdout and exit
    #[arg(long)]
    print_default_config: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.print_default_config {
        print!("{}", generate_default_config());
        return Ok(());
    }

    let mut config = match &cli.config {
        Some(path) => Config::load_with_env(path)
            .with_context(|| format!("loading config from {:?}", path))?,
        None => Config::load_default(),
    };
    if let Some(host) = cli.host {
        config.api.host = host;
    }
    if let Some(port) = cli.port {
        config.api.port = port;
    }
    if let Some(database) = cli.database {
        config.storage.database_path = database;
    }
    if cli.memory {
        config.storage.in_memory = true;
    }

    init_tracing(&config);

    tracing::info!("Starting Meridian API server v{}", env!("CARGO_PKG_VERSION"));

    let store: Arc<dyn Store> = if config.storage.in_memory {
        tracing::info!("Using in-memory store (data will not persist)");
        Arc::new(MemoryStore::new())
    } else {
        let path = PathBuf::from(&config.storage.database_path);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating data directory {:?}", parent))?;
        }
        tracing::info!("Database: {:?}", path);
        Arc::new(SqliteStore::open(&path).context("opening SQLite database")?)
    };

    let state = AppState::new(store, config.analysis.clone());
    serve(state, &config.api).await?;

    tracing::info!("Meridian API server stopped");
    Ok(())
}

/// Initialize tracing from the logging config
fn init_tracing(config: &Config) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("meridian={},tower_http=info", config.logging.level).into()
    });

    let registry = tracing_subscriber::registry().with(filter);
    if config.logging.format == "json" {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}
