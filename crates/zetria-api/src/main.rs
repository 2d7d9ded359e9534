//! zetria-api binary.

use std::net::SocketAddr;
use std::time::Duration;

use tracing::{info, warn};

use zetria_api::{
    app, config::ServerConfig, middleware::build_rate_limiter, services::GraphEventPublisher,
    AppState,
};
use zetria_core::SessionRepository;
use zetria_db::{log_pool_metrics, Database, PoolConfig};

/// How often expired sessions are deleted and pool health is logged.
const MAINTENANCE_INTERVAL: Duration = Duration::from_secs(3600);

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => warn!(error = %e, "Failed to listen for shutdown signal"),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    // Guard must live until main returns so buffered lines are flushed.
    let _log_guard = zetria_core::logging::init("zetria_api=debug,tower_http=debug", "zetria-api.log");

    let config = ServerConfig::from_env();

    info!("Connecting to database...");
    let pool_config = PoolConfig::new().max_connections(config.db_max_connections);
    let db = Database::connect_with_config(&config.database_url, pool_config).await?;
    info!("Database connected");

    info!("Running database migrations...");
    db.migrate().await?;
    info!("Database migrations complete");

    match config.rate_limit {
        Some(limit) => info!(
            requests = limit.requests,
            period_secs = limit.period.as_secs(),
            "Rate limiting enabled"
        ),
        None => info!("Rate limiting disabled"),
    }

    let state = AppState {
        db: db.clone(),
        session: config.session.clone(),
        rate_limiter: build_rate_limiter(config.rate_limit),
        graph_events: GraphEventPublisher::from_settings(&config.graph_events).await,
    };

    // Periodic cleanup of expired sessions
    let purge_db = db.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(MAINTENANCE_INTERVAL);
        loop {
            interval.tick().await;
            log_pool_metrics(&purge_db.pool);
            match purge_db.sessions.purge_expired().await {
                Ok(0) => {}
                Ok(n) => info!(subsystem = "auth", purged = n, "Expired sessions purged"),
                Err(e) => warn!(subsystem = "auth", error = %e, "Session purge failed"),
            }
        }
    });

    let router = app(state, &config.allowed_origins);

    let addr: SocketAddr = config.bind_addr().parse()?;
    info!("Starting server on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}
