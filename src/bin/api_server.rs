use std::sync::Arc;

use urbex_hud::api::{create_router, AppState};
use urbex_hud::logging::init_logging;
use urbex_hud::store::{seed_if_empty, MemoryStore, SpotStore};
use urbex_hud::ServerConfig;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();

    let config = ServerConfig::from_env();
    tracing::info!(?config, "starting URBEX HUD API server");

    tokio::fs::create_dir_all(&config.uploads_dir).await?;

    let store = match &config.data_file {
        Some(path) => MemoryStore::open(path)?,
        None => MemoryStore::new(),
    };
    tracing::info!(backend = %store.backend(), "spot store ready");

    if config.seed_sample_data {
        let inserted = seed_if_empty(&store)?;
        if inserted > 0 {
            tracing::info!(inserted, "sample spots inserted");
        }
    }

    let app = create_router(AppState::new(&config, Arc::new(store)));

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!("listening on http://{addr}");
    tracing::info!("  GET    /api/spots, /api/spots/:id, /api/spots-minimal");
    tracing::info!("  POST   /api/spots, /api/upload, /api/parse-coordinates");
    tracing::info!("  PUT    /api/spots/:id");
    tracing::info!("  DELETE /api/spots/:id");
    tracing::info!("  GET    /api/health, /api/test, /api");
    tracing::info!("  static {} (uploads under /uploads)", config.static_dir.display());

    axum::serve(listener, app).await?;
    Ok(())
}
