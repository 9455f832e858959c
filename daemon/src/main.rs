mod cli;

use std::path::PathBuf;
use std::sync::Arc;

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use shelf_registry::RegistryClient;
use shelf_server::{start_server, AppState, ServerConfig};
use shelf_store::{seed_if_empty, CatalogStore};

use cli::Cli;

/// Resolve the database path: explicit flag, else catalog.db under the
/// platform data directory, creating it as needed.
fn resolve_db_path(flag: Option<PathBuf>) -> anyhow::Result<PathBuf> {
    if let Some(path) = flag {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        return Ok(path);
    }

    let data_dir = dirs::data_dir()
        .ok_or_else(|| anyhow::anyhow!("Could not determine platform data directory"))?
        .join("modelshelf");
    std::fs::create_dir_all(&data_dir)?;
    Ok(data_dir.join("catalog.db"))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "modelshelf=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse_args();

    info!("Starting ModelShelf...");

    let db_path = resolve_db_path(cli.db)?;
    info!("Catalog database: {}", db_path.display());

    let store = Arc::new(CatalogStore::open(&db_path)?);

    if cli.skip_seed {
        info!("Demo seed disabled");
    } else {
        let seeded = seed_if_empty(&store)?;
        if seeded > 0 {
            info!("Seeded {} demo models into the empty catalog", seeded);
        }
    }

    let state = AppState::new(store, RegistryClient::default());
    let config = ServerConfig {
        host: cli.host,
        port: cli.port,
        enable_cors: !cli.no_cors,
    };

    let (handle, port) = start_server(config, state).await?;
    info!("ModelShelf ready on port {}", port);

    handle.await?;
    Ok(())
}
