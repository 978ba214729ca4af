//! mesalpha-dash - manufacturing dashboard server
//!
//! Opens the plant database read-only, primes both dashboard views and
//! serves them over HTTP.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use mesalpha_common::config::{RootFolderInitializer, RootFolderResolver, TomlConfig};
use mesalpha_dash::pipeline::FilterContext;
use mesalpha_dash::service::DashboardService;
use mesalpha_dash::store::SqliteRecordStore;
use mesalpha_dash::{build_router, AppState, MODULE_NAME};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "mesalpha-dash", version, about = "Manufacturing dashboard server")]
struct Args {
    /// Config file (defaults to <config_dir>/mesalpha/mesalpha-dash.toml)
    #[arg(long, env = "MESALPHA_CONFIG")]
    config: Option<PathBuf>,

    /// Root folder holding mesalpha.db
    #[arg(long)]
    root_folder: Option<PathBuf>,

    /// Database file, overrides the root folder default
    #[arg(long)]
    database: Option<PathBuf>,

    /// HTTP port
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let resolver = RootFolderResolver::new(MODULE_NAME);
    let config_path = args.config.clone().or_else(|| resolver.config_file_path());
    let config = TomlConfig::load_or_default(config_path.as_deref());

    // RUST_LOG wins over the config file level
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("Starting mesalpha-dash v{}", env!("CARGO_PKG_VERSION"));

    let root_folder = resolver
        .with_cli_arg(args.root_folder)
        .with_config(&config)
        .resolve();
    info!("Root folder: {}", root_folder.display());

    let initializer = RootFolderInitializer::new(root_folder.clone());
    initializer.ensure_directory_exists()?;

    let db_path = config.database_path(args.database.as_deref(), &root_folder);
    info!("Database path: {}", db_path.display());

    let store = match SqliteRecordStore::connect_readonly(&db_path).await {
        Ok(store) => {
            info!("✓ Connected to database (read-only)");
            store
        }
        Err(e) => {
            error!("Failed to connect to database: {}", e);
            return Err(e.into());
        }
    };

    let service = Arc::new(DashboardService::new(Arc::new(store)));

    // First render: unfiltered production plus the full maintenance batch
    if let Err(e) = service.refresh_production(FilterContext::ALL).await {
        warn!("Initial production refresh failed: {}", e);
    }
    if let Err(e) = service.refresh_maintenance().await {
        warn!("Initial maintenance refresh failed: {}", e);
    }

    let app = build_router(AppState::new(service));

    let port = args.port.unwrap_or(config.port);
    let addr = format!("{}:{}", config.bind_address, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("mesalpha-dash listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
