//! zetria-consumer binary.

use tracing::{info, warn};

use zetria_consumer::{ConsumerConfig, GraphConsumer, RedisQueue};

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let _log_guard = zetria_core::logging::init("zetria_consumer=info", "zetria-consumer.log");

    let config = ConsumerConfig::from_env();
    info!(queue = %config.queue, "Starting graph event consumer");

    let queue = RedisQueue::connect(&config).await?;
    let consumer = GraphConsumer::new(queue, config.block_timeout);
    let stats = consumer.run(shutdown_signal()).await?;

    info!(processed = stats.processed(), "Exiting");
    Ok(())
}
