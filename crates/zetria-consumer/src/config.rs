//! Consumer configuration from environment variables.

use std::time::Duration;

use zetria_core::defaults;

/// Configuration of the queue consumer.
///
/// | Variable | Default |
/// |----------|---------|
/// | `REDIS_URL` | `redis://localhost:6379` |
/// | `GRAPH_QUEUE` | `grafos_queue` |
/// | `CONSUMER_BLOCK_TIMEOUT_SECS` | `5` |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsumerConfig {
    pub redis_url: String,
    pub queue: String,
    /// How long one blocking receive waits before the loop re-checks shutdown.
    pub block_timeout: Duration,
}

impl Default for ConsumerConfig {
    fn default() -> Self {
        Self {
            redis_url: defaults::REDIS_URL.to_string(),
            queue: defaults::GRAPH_QUEUE.to_string(),
            block_timeout: Duration::from_secs(defaults::CONSUMER_BLOCK_TIMEOUT_SECS),
        }
    }
}

impl ConsumerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Self {
        let block_timeout_secs = get("CONSUMER_BLOCK_TIMEOUT_SECS")
            .and_then(|v| v.trim().parse::<u64>().ok())
            .unwrap_or(defaults::CONSUMER_BLOCK_TIMEOUT_SECS)
            .max(1);

        Self {
            redis_url: get("REDIS_URL").unwrap_or_else(|| defaults::REDIS_URL.to_string()),
            queue: get("GRAPH_QUEUE")
                .filter(|q| !q.trim().is_empty())
                .unwrap_or_else(|| defaults::GRAPH_QUEUE.to_string()),
            block_timeout: Duration::from_secs(block_timeout_secs),
        }
    }

    /// Name of the in-flight list paired with the queue.
    pub fn processing_queue(&self) -> String {
        format!("{}{}", self.queue, defaults::PROCESSING_SUFFIX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> ConsumerConfig {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ConsumerConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]);
        assert_eq!(config, ConsumerConfig::default());
        assert_eq!(config.processing_queue(), "grafos_queue:processing");
        assert_eq!(config.block_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("REDIS_URL", "redis://queue:6380"),
            ("GRAPH_QUEUE", "graph_events"),
            ("CONSUMER_BLOCK_TIMEOUT_SECS", "2"),
        ]);
        assert_eq!(config.redis_url, "redis://queue:6380");
        assert_eq!(config.processing_queue(), "graph_events:processing");
        assert_eq!(config.block_timeout, Duration::from_secs(2));
    }

    #[test]
    fn test_zero_timeout_is_raised() {
        // A zero BLMOVE timeout blocks forever and would ignore shutdown.
        let config = config_from(&[("CONSUMER_BLOCK_TIMEOUT_SECS", "0")]);
        assert_eq!(config.block_timeout, Duration::from_secs(1));
    }

    #[test]
    fn test_blank_queue_falls_back() {
        let config = config_from(&[("GRAPH_QUEUE", "  ")]);
        assert_eq!(config.queue, "grafos_queue");
    }
}
