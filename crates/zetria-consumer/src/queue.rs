//! Reliable queue abstraction and its Redis implementation.
//!
//! A received message is atomically moved to an in-flight list and stays
//! there until acknowledged, so a crash between receive and ack leaves it
//! recoverable instead of lost.

use std::time::Duration;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use tracing::{debug, info, warn};

use zetria_core::Result;

use crate::config::ConsumerConfig;

/// Queue with manual acknowledgment.
#[async_trait]
pub trait MessageQueue: Send + Sync {
    /// Move messages stranded in flight by a previous run back onto the queue.
    async fn recover_in_flight(&self) -> Result<usize>;

    /// Wait up to `timeout` for the next message and mark it in flight.
    async fn receive(&self, timeout: Duration) -> Result<Option<String>>;

    /// Remove a handled message from the in-flight list.
    async fn ack(&self, body: &str) -> Result<()>;
}

/// Redis list pair: producers `LPUSH` onto `queue`, the consumer `BLMOVE`s
/// from its right end onto `queue:processing` and `LREM`s on ack.
#[derive(Clone)]
pub struct RedisQueue {
    connection: ConnectionManager,
    queue: String,
    processing: String,
}

impl RedisQueue {
    pub async fn connect(config: &ConsumerConfig) -> Result<Self> {
        let client = redis::Client::open(config.redis_url.as_str())?;
        let connection = ConnectionManager::new(client).await?;
        info!(queue = %config.queue, "Connected to Redis");
        Ok(Self {
            connection,
            queue: config.queue.clone(),
            processing: config.processing_queue(),
        })
    }
}

#[async_trait]
impl MessageQueue for RedisQueue {
    async fn recover_in_flight(&self) -> Result<usize> {
        let mut conn = self.connection.clone();
        let mut recovered = 0;
        loop {
            // In-flight list is newest-left. Taking from its left and pushing
            // onto the consuming end leaves the oldest message to be read first.
            let moved: Option<String> = redis::cmd("LMOVE")
                .arg(&self.processing)
                .arg(&self.queue)
                .arg("LEFT")
                .arg("RIGHT")
                .query_async(&mut conn)
                .await?;
            let Some(body) = moved else { break };
            warn!(
                queue = %self.queue,
                body = %zetria_core::truncate_with_ellipsis(&body, 200),
                "Re-queued message left in flight by a previous run"
            );
            recovered += 1;
        }
        Ok(recovered)
    }

    async fn receive(&self, timeout: Duration) -> Result<Option<String>> {
        let mut conn = self.connection.clone();
        let body: Option<String> = redis::cmd("BLMOVE")
            .arg(&self.queue)
            .arg(&self.processing)
            .arg("RIGHT")
            .arg("LEFT")
            .arg(timeout.as_secs_f64())
            .query_async(&mut conn)
            .await?;
        if body.is_some() {
            debug!(queue = %self.queue, "Message received");
        }
        Ok(body)
    }

    async fn ack(&self, body: &str) -> Result<()> {
        let mut conn = self.connection.clone();
        let removed: i64 = conn.lrem(&self.processing, 1, body).await?;
        if removed == 0 {
            warn!(queue = %self.queue, "Acknowledged message was not in flight");
        }
        Ok(())
    }
}
