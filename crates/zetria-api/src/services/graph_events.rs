//! Redis-backed publisher for graph events.
//!
//! Events are `LPUSH`ed onto the configured queue and consumed from the other
//! end by `zetria-consumer`. Publishing is best effort: a missing connection
//! or a failed push is logged and never reaches the HTTP response.
//!
//! ## Configuration
//!
//! - `GRAPH_EVENTS_ENABLED`: publish events (default: false)
//! - `REDIS_URL`: Redis connection URL (default: redis://localhost:6379)
//! - `GRAPH_QUEUE`: queue name (default: grafos_queue)

use std::sync::Arc;

use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use zetria_core::{defaults, GraphEvent};

use crate::config::GraphEventSettings;

/// Graph event publisher.
#[derive(Clone)]
pub struct GraphEventPublisher {
    inner: Arc<PublisherInner>,
}

struct PublisherInner {
    /// Redis connection manager (None if disabled or unreachable).
    connection: RwLock<Option<ConnectionManager>>,
    queue: String,
}

impl GraphEventPublisher {
    /// Connect according to the settings. Never fails; an unreachable broker
    /// yields a publisher that drops events.
    pub async fn from_settings(settings: &GraphEventSettings) -> Self {
        let connection = if settings.enabled {
            match redis::Client::open(settings.redis_url.as_str()) {
                Ok(client) => match ConnectionManager::new(client).await {
                    Ok(conn) => {
                        info!(
                            subsystem = "graph_events",
                            queue = %settings.queue,
                            "Graph event publishing enabled"
                        );
                        Some(conn)
                    }
                    Err(e) => {
                        warn!(
                            subsystem = "graph_events",
                            error = %e,
                            "Failed to connect to Redis, graph events disabled"
                        );
                        None
                    }
                },
                Err(e) => {
                    warn!(
                        subsystem = "graph_events",
                        error = %e,
                        "Invalid Redis URL, graph events disabled"
                    );
                    None
                }
            }
        } else {
            info!(subsystem = "graph_events", "Graph event publishing disabled");
            None
        };

        Self::with_connection(connection, settings.queue.clone())
    }

    /// A publisher that drops every event.
    pub fn disabled() -> Self {
        Self::with_connection(None, defaults::GRAPH_QUEUE.to_string())
    }

    fn with_connection(connection: Option<ConnectionManager>, queue: String) -> Self {
        Self {
            inner: Arc::new(PublisherInner {
                connection: RwLock::new(connection),
                queue,
            }),
        }
    }

    /// Whether events are actually sent anywhere.
    pub async fn is_connected(&self) -> bool {
        self.inner.connection.read().await.is_some()
    }

    pub fn queue(&self) -> &str {
        &self.inner.queue
    }

    /// Push an event onto the queue. Returns whether it was sent.
    pub async fn publish(&self, event: &GraphEvent) -> bool {
        // ConnectionManager clones share one multiplexed connection, so the
        // lock is released before the round trip.
        let Some(mut conn) = self.inner.connection.read().await.clone() else {
            return false;
        };

        let payload = match event.to_json() {
            Ok(p) => p,
            Err(e) => {
                warn!(subsystem = "graph_events", error = %e, "Failed to serialize graph event");
                return false;
            }
        };

        match conn.lpush::<_, _, ()>(&self.inner.queue, payload).await {
            Ok(()) => {
                debug!(
                    queue = %self.inner.queue,
                    event = event.name(),
                    user_id = %event.user_id(),
                    "Graph event published"
                );
                true
            }
            Err(e) => {
                warn!(
                    queue = %self.inner.queue,
                    event = event.name(),
                    error = %e,
                    "Failed to publish graph event"
                );
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use uuid::Uuid;

    #[tokio::test]
    async fn test_disabled_publisher_drops_events() {
        let publisher = GraphEventPublisher::disabled();
        assert!(!publisher.is_connected().await);
        assert_eq!(publisher.queue(), "grafos_queue");
        assert!(!publisher.publish(&GraphEvent::nodes_retrieved(Uuid::nil(), 3)).await);
    }

    #[tokio::test]
    async fn test_settings_disabled_never_connects() {
        let settings = GraphEventSettings {
            enabled: false,
            redis_url: "redis://localhost:6379".to_string(),
            queue: "custom_queue".to_string(),
        };
        let publisher = GraphEventPublisher::from_settings(&settings).await;
        assert!(!publisher.is_connected().await);
        assert_eq!(publisher.queue(), "custom_queue");
    }

    #[tokio::test]
    async fn test_invalid_url_falls_back_to_disabled() {
        let settings = GraphEventSettings {
            enabled: true,
            redis_url: "not a url".to_string(),
            queue: "grafos_queue".to_string(),
        };
        let publisher = GraphEventPublisher::from_settings(&settings).await;
        assert!(!publisher.is_connected().await);
    }

    #[tokio::test]
    async fn test_publish_only_takes_shared_lock() {
        let publisher = GraphEventPublisher::disabled();
        let _reader = publisher.inner.connection.read().await;

        let event = GraphEvent::edges_retrieved(Uuid::nil(), 2);
        let published = tokio::time::timeout(Duration::from_secs(1), async {
            tokio::join!(publisher.publish(&event), publisher.publish(&event))
        })
        .await
        .expect("publish must not wait for exclusive access");
        assert_eq!(published, (false, false));
    }
}
