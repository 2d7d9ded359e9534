//! # zetria-consumer
//!
//! Consumes graph events published by `zetria-api` from a Redis list.
//!
//! Messages are moved to an in-flight list on receipt and removed once
//! handled, so nothing is lost if the process dies mid-message. Every message
//! is acknowledged after handling, including unknown and malformed ones;
//! there is no retry and no dead-letter list.

pub mod config;
pub mod consumer;
pub mod message;
pub mod queue;

pub use config::ConsumerConfig;
pub use consumer::{ConsumerStats, GraphConsumer};
pub use message::{process_message, ProcessOutcome};
pub use queue::{MessageQueue, RedisQueue};
