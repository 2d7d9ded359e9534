//! The consume loop.

use std::future::Future;
use std::time::Duration;

use tokio::time::sleep;
use tracing::{error, info, instrument};

use zetria_core::Result;

use crate::message::{process_message, ProcessOutcome};
use crate::queue::MessageQueue;

/// Pause after a failed receive before trying again.
const RECEIVE_ERROR_BACKOFF: Duration = Duration::from_secs(1);

/// Counters reported when the consumer stops.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConsumerStats {
    pub recovered: usize,
    pub graph_events: u64,
    pub unknown: u64,
    pub invalid: u64,
    pub ack_failures: u64,
}

impl ConsumerStats {
    pub fn processed(&self) -> u64 {
        self.graph_events + self.unknown + self.invalid
    }

    fn record(&mut self, outcome: &ProcessOutcome) {
        match outcome {
            ProcessOutcome::Graph(_) => self.graph_events += 1,
            ProcessOutcome::Unknown(_) => self.unknown += 1,
            ProcessOutcome::Invalid => self.invalid += 1,
        }
    }
}

/// Consumes graph events one at a time until shut down.
pub struct GraphConsumer<Q> {
    queue: Q,
    block_timeout: Duration,
}

impl<Q: MessageQueue> GraphConsumer<Q> {
    pub fn new(queue: Q, block_timeout: Duration) -> Self {
        Self {
            queue,
            block_timeout,
        }
    }

    /// Handle and acknowledge one message.
    async fn handle(&self, body: &str, stats: &mut ConsumerStats) {
        info!("Message received");
        let outcome = process_message(body);
        stats.record(&outcome);
        if let Err(e) = self.queue.ack(body).await {
            stats.ack_failures += 1;
            error!(error = %e, "Failed to acknowledge message");
        }
    }

    /// Recover in-flight messages, then consume until `shutdown` resolves.
    ///
    /// A message received while shutdown fires is left in flight and
    /// recovered by the next run.
    #[instrument(skip_all)]
    pub async fn run<F>(&self, shutdown: F) -> Result<ConsumerStats>
    where
        F: Future<Output = ()>,
    {
        let mut stats = ConsumerStats {
            recovered: self.queue.recover_in_flight().await?,
            ..Default::default()
        };
        if stats.recovered > 0 {
            info!(recovered = stats.recovered, "Recovered in-flight messages");
        }

        info!(
            block_timeout_secs = self.block_timeout.as_secs(),
            "Waiting for messages. Press Ctrl+C to exit"
        );

        tokio::pin!(shutdown);
        loop {
            let received = tokio::select! {
                _ = &mut shutdown => {
                    info!("Consumer received shutdown signal");
                    break;
                }
                received = self.queue.receive(self.block_timeout) => received,
            };

            match received {
                Ok(Some(body)) => self.handle(&body, &mut stats).await,
                Ok(None) => {}
                Err(e) => {
                    error!(error = %e, "Failed to receive message");
                    let stop = tokio::select! {
                        _ = &mut shutdown => true,
                        _ = sleep(RECEIVE_ERROR_BACKOFF) => false,
                    };
                    if stop {
                        info!("Consumer received shutdown signal");
                        break;
                    }
                }
            }
        }

        info!(
            processed = stats.processed(),
            graph_events = stats.graph_events,
            unknown = stats.unknown,
            invalid = stats.invalid,
            "Consumer stopped"
        );
        Ok(stats)
    }
}
