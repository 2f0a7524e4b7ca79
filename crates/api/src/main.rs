//! synthd API server binary entrypoint.

use std::net::SocketAddr;

use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use synthd_common::config::AppConfig;

use synthd_api::routes::create_router;
use synthd_api::sandbox;
use synthd_api::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new("synthd_api=debug,synthd_engine=debug,tower_http=debug")
        }))
        .init();

    tracing::info!("Starting synthd API server...");

    // Load configuration
    let config = AppConfig::from_env()?;

    // Wire the engine to the in-memory sandbox
    let (engine, bank) = sandbox::build(&config)?;
    tracing::info!(
        assets = config.collateral.len(),
        "Engine ready over configured collateral roster"
    );

    // Build application state
    let state = AppState::new(engine, bank, config.clone());

    // Build router
    let app = create_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    // Start server
    let addr: SocketAddr = config.bind_addr.parse()?;
    tracing::info!("API server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
