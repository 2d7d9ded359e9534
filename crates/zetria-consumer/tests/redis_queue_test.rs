//! RedisQueue tests against a live server.
//!
//! Run with `cargo test -p zetria-consumer -- --ignored` and `REDIS_URL`
//! pointing at a disposable Redis (6.2+ for `LMOVE`/`BLMOVE`).

use std::time::Duration;

use redis::AsyncCommands;
use uuid::Uuid;

use zetria_consumer::{ConsumerConfig, MessageQueue, RedisQueue};

const RECEIVE_TIMEOUT: Duration = Duration::from_secs(1);

fn test_config() -> ConsumerConfig {
    ConsumerConfig {
        redis_url: std::env::var("REDIS_URL")
            .unwrap_or_else(|_| "redis://localhost:6379".to_string()),
        queue: format!("zetria_test_{}", Uuid::now_v7().simple()),
        block_timeout: RECEIVE_TIMEOUT,
    }
}

async fn raw_connection(config: &ConsumerConfig) -> redis::aio::MultiplexedConnection {
    redis::Client::open(config.redis_url.as_str())
        .unwrap()
        .get_multiplexed_async_connection()
        .await
        .unwrap()
}

async fn receive_all(queue: &RedisQueue, count: usize) -> Vec<String> {
    let mut bodies = Vec::new();
    for _ in 0..count {
        bodies.push(queue.receive(RECEIVE_TIMEOUT).await.unwrap().expect("message"));
    }
    bodies
}

#[tokio::test]
#[ignore] // requires REDIS_URL
async fn test_receive_is_fifo_and_ack_clears_in_flight() {
    let config = test_config();
    let mut conn = raw_connection(&config).await;
    for body in ["m1", "m2", "m3"] {
        let _: i64 = conn.lpush(&config.queue, body).await.unwrap();
    }

    let queue = RedisQueue::connect(&config).await.unwrap();
    let received = receive_all(&queue, 3).await;
    assert_eq!(received, vec!["m1", "m2", "m3"]);

    let in_flight: i64 = conn.llen(config.processing_queue()).await.unwrap();
    assert_eq!(in_flight, 3);

    for body in &received {
        queue.ack(body).await.unwrap();
    }
    let in_flight: i64 = conn.llen(config.processing_queue()).await.unwrap();
    assert_eq!(in_flight, 0);
    assert_eq!(queue.receive(RECEIVE_TIMEOUT).await.unwrap(), None);

    let _: i64 = conn.del(&[&config.queue, &config.processing_queue()]).await.unwrap();
}

#[tokio::test]
#[ignore] // requires REDIS_URL
async fn test_recovered_messages_are_read_oldest_first() {
    let config = test_config();
    let mut conn = raw_connection(&config).await;
    for body in ["m1", "m2", "m3"] {
        let _: i64 = conn.lpush(&config.queue, body).await.unwrap();
    }

    // A run that dies after receiving everything, before any ack.
    let crashed = RedisQueue::connect(&config).await.unwrap();
    receive_all(&crashed, 3).await;

    // Newer message published while the consumer was down.
    let _: i64 = conn.lpush(&config.queue, "m4").await.unwrap();

    let restarted = RedisQueue::connect(&config).await.unwrap();
    assert_eq!(restarted.recover_in_flight().await.unwrap(), 3);
    assert_eq!(
        receive_all(&restarted, 4).await,
        vec!["m1", "m2", "m3", "m4"]
    );

    let _: i64 = conn.del(&[&config.queue, &config.processing_queue()]).await.unwrap();
}
