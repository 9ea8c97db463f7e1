mod client;
mod config;
mod db;
mod envelope;
mod errors;
mod jobs;
mod models;
mod routes;
mod state;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{Config, StoreBackend};
use crate::db::{create_pool, ensure_schema};
use crate::jobs::memory_store::MemoryJobStore;
use crate::jobs::pg_store::PgJobStore;
use crate::jobs::store::JobStore;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={},tower_http={}",
                env!("CARGO_PKG_NAME"),
                &config.rust_log,
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting HunterSite API v{}", env!("CARGO_PKG_VERSION"));

    // The store must be reachable before anything is served; an error here exits the process.
    let pg = match config.store_backend {
        StoreBackend::Postgres => {
            let url = config
                .database_url
                .as_deref()
                .context("DATABASE_URL is required for the postgres backend")?;
            let pool = create_pool(url, config.max_connections).await?;
            ensure_schema(&pool).await?;
            Some(PgJobStore::new(pool))
        }
        StoreBackend::Memory => None,
    };
    let store: Arc<dyn JobStore> = match &pg {
        Some(pg) => Arc::new(pg.clone()),
        None => {
            info!("Using in-memory job store; data is lost on exit");
            Arc::new(MemoryJobStore::new())
        }
    };

    if std::env::args().nth(1).as_deref() == Some("seed") {
        let inserted = jobs::seed::run(store.as_ref()).await?;
        info!("Seeded {inserted} jobs");
        if let Some(pg) = pg {
            pg.pool().close().await;
        }
        return Ok(());
    }

    let app = build_router(AppState::new(store))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}, API at http://{addr}/api/jobs");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(pg) = pg {
        pg.pool().close().await;
        info!("PostgreSQL pool closed");
    }
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
