//! Sandwich shop API server.
//!
//! Settings come from the environment (and `.env`): `STORE=memory|postgres`, `DATABASE_URL`,
//! `BIND_ADDR`, `CATALOG_PATH`, `BODY_LIMIT_BYTES`, `DB_MAX_CONNECTIONS`, `RUST_LOG`.

use sandwich_api::{
    build_router, ensure_database_exists, ensure_tables, load_catalog, AppState, Catalog, MemoryStore, PgStore,
    RecordStore, Settings, StoreKind,
};
use std::sync::Arc;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("sandwich_api=info,sandwich_server=info")),
        )
        .init();

    let settings = Settings::from_env()?;
    let catalog = match &settings.catalog_path {
        Some(path) => load_catalog(path).await?,
        None => Catalog::builtin(),
    };

    let store: Arc<dyn RecordStore> = match settings.store {
        StoreKind::Memory => {
            tracing::info!("using in-memory store");
            Arc::new(MemoryStore::new(&catalog))
        }
        StoreKind::Postgres => {
            ensure_database_exists(&settings.database_url).await?;
            let pool = sqlx::postgres::PgPoolOptions::new()
                .max_connections(settings.max_connections)
                .connect(&settings.database_url)
                .await?;
            ensure_tables(&pool, &catalog).await?;
            tracing::info!("using postgres store");
            Arc::new(PgStore::new(pool))
        }
    };

    let state = AppState::new(store, Arc::new(catalog));
    let app = build_router(state, settings.body_limit_bytes);

    let listener = TcpListener::bind(settings.bind_addr).await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}
