use std::sync::Arc;

use catalog_bench::config::Config;
use catalog_bench::error::Result;
use catalog_bench::handlers::api_router;
use catalog_bench::observability::init_tracing;
use catalog_bench::repository::{MemoryStore, PgCategoryRepository, PgItemRepository};
use catalog_bench::server::Server;
use catalog_bench::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::load()?;
    init_tracing(&config);

    tracing::info!(
        use_join_fetch = config.fetch.use_join_fetch,
        "Starting {} (fetch strategy: {})",
        config.service.name,
        if config.fetch.use_join_fetch {
            "join"
        } else {
            "per-row lookup"
        }
    );

    match config.database.clone() {
        Some(db) => {
            let pool = catalog_bench::database::create_pool(&db).await?;
            let items = Arc::new(PgItemRepository::new(pool.clone()));
            let categories = Arc::new(PgCategoryRepository::new(pool.clone()));
            let state = AppState::new(items, categories, config.fetch.use_join_fetch);
            Server::new(config).serve(api_router(state)).await?;
            // The listener has stopped; now release persistence.
            pool.close().await;
        }
        None => {
            tracing::warn!("No database configured, serving from in-memory repositories");
            let store = MemoryStore::new();
            let state = AppState::new(
                Arc::new(store.clone()),
                Arc::new(store),
                config.fetch.use_join_fetch,
            );
            Server::new(config).serve(api_router(state)).await?;
        }
    }

    tracing::info!("Shutdown complete");
    Ok(())
}
