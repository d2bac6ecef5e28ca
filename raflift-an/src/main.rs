//! raflift-an (Analyze) - HCC risk-adjustment microservice
//!
//! POST /v28/analyze, GET /v28/audit/:audit_uuid, GET /health.
//! Default listen address 127.0.0.1:5728.

use anyhow::{bail, Context, Result};
use clap::Parser;
use raflift_common::config::ConfigResolver;
use raflift_common::db::{init_database, load_coefficients};
use std::path::PathBuf;
use tracing::{error, info, warn};
use raflift_an::logging::init_tracing;
use raflift_an::{build_router, AppState};

#[derive(Debug, Parser)]
#[command(name = "raflift-an", version, about = "HCC risk-adjustment analyze service")]
struct Cli {
    /// SQLite database path (env: RAFLIFT_DATABASE)
    #[arg(long)]
    database: Option<PathBuf>,

    /// Listen address, e.g. 127.0.0.1:5728 (env: RAFLIFT_BIND)
    #[arg(long)]
    bind: Option<String>,

    /// TOML config file (default: <config_dir>/raflift/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Tracing first, so config warnings are visible
    let log_level = init_tracing();

    info!(
        "Starting raflift Analyze (raflift-an) v{}",
        env!("CARGO_PKG_VERSION")
    );

    let config = ConfigResolver::new()
        .with_database(cli.database)
        .with_bind(cli.bind)
        .with_config_file(cli.config)
        .resolve()?;

    // RUST_LOG wins over the configured level
    if let Err(e) = log_level.apply_config_level(&config.log_level) {
        warn!("Invalid log level '{}' in config: {} (keeping info)", config.log_level, e);
    }
    info!("Database path: {}", config.database.display());

    let pool = match init_database(&config.database).await {
        Ok(pool) => {
            info!("✓ Database ready");
            pool
        }
        Err(e) => {
            error!("Failed to initialize database: {}", e);
            return Err(e.into());
        }
    };

    let coefficients = load_coefficients(&pool)
        .await
        .context("Failed to load HCC coefficients")?;
    if coefficients.is_empty() {
        bail!("hcc_coefficients is empty; refusing to serve");
    }
    info!("✓ Loaded {} HCC coefficient(s)", coefficients.len());

    let state = AppState::new(pool, coefficients);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind))?;
    let local_addr = listener.local_addr()?;
    info!("raflift-an listening on http://{}", local_addr);
    info!("Health check: http://{}/health", local_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
