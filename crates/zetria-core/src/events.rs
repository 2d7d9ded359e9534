//! Graph events exchanged over the message queue.
//!
//! The API optionally publishes these when the graph view is read; the
//! consumer decodes and logs them. Bodies are JSON objects discriminated by
//! their `event` field.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Result;

/// Typed graph event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum GraphEvent {
    /// The nodes of a user's graph were read.
    NodesRetrieved {
        user_id: Uuid,
        node_count: usize,
        timestamp: DateTime<Utc>,
    },
    /// The edges of a user's graph were read.
    EdgesRetrieved {
        user_id: Uuid,
        edge_count: usize,
        timestamp: DateTime<Utc>,
    },
}

impl GraphEvent {
    pub fn nodes_retrieved(user_id: Uuid, node_count: usize) -> Self {
        GraphEvent::NodesRetrieved {
            user_id,
            node_count,
            timestamp: Utc::now(),
        }
    }

    pub fn edges_retrieved(user_id: Uuid, edge_count: usize) -> Self {
        GraphEvent::EdgesRetrieved {
            user_id,
            edge_count,
            timestamp: Utc::now(),
        }
    }

    /// Wire name of the event, as found in the `event` field.
    pub fn name(&self) -> &'static str {
        match self {
            GraphEvent::NodesRetrieved { .. } => "nodes_retrieved",
            GraphEvent::EdgesRetrieved { .. } => "edges_retrieved",
        }
    }

    pub fn user_id(&self) -> Uuid {
        match self {
            GraphEvent::NodesRetrieved { user_id, .. } | GraphEvent::EdgesRetrieved { user_id, .. } => {
                *user_id
            }
        }
    }

    /// Serialize for publishing.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// A decoded queue message body.
#[derive(Debug, Clone, PartialEq)]
pub enum QueueMessage {
    /// A graph event this version understands.
    Graph(GraphEvent),
    /// Valid JSON that is not a known graph event.
    Unknown(serde_json::Value),
}

impl QueueMessage {
    /// Decode a raw message body. Fails only when the body is not JSON.
    pub fn parse(body: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(body)?;
        match serde_json::from_value::<GraphEvent>(value.clone()) {
            Ok(event) => Ok(QueueMessage::Graph(event)),
            Err(_) => Ok(QueueMessage::Unknown(value)),
        }
    }
}
