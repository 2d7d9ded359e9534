//! Decoding and handling of a single queue message.

use tracing::{error, info, warn};

use zetria_core::{GraphEvent, QueueMessage};

/// What happened to a message. Every outcome is acknowledged.
#[derive(Debug, Clone, PartialEq)]
pub enum ProcessOutcome {
    /// A known graph event.
    Graph(GraphEvent),
    /// Valid JSON that is not a known event; carries the `event` field if any.
    Unknown(Option<String>),
    /// The body was not JSON.
    Invalid,
}

const BODY_PREVIEW_CHARS: usize = 200;

fn preview(body: &str) -> String {
    zetria_core::truncate_with_ellipsis(body, BODY_PREVIEW_CHARS)
}

/// Decode a message body and log it.
pub fn process_message(body: &str) -> ProcessOutcome {
    match QueueMessage::parse(body) {
        Ok(QueueMessage::Graph(event)) => {
            match &event {
                GraphEvent::NodesRetrieved {
                    user_id,
                    node_count,
                    timestamp,
                } => info!(
                    event = event.name(),
                    user_id = %user_id,
                    node_count,
                    timestamp = %timestamp,
                    "Processing graph data"
                ),
                GraphEvent::EdgesRetrieved {
                    user_id,
                    edge_count,
                    timestamp,
                } => info!(
                    event = event.name(),
                    user_id = %user_id,
                    edge_count,
                    timestamp = %timestamp,
                    "Processing graph data"
                ),
            }
            ProcessOutcome::Graph(event)
        }
        Ok(QueueMessage::Unknown(value)) => {
            let name = value
                .get("event")
                .and_then(|v| v.as_str())
                .map(str::to_string);
            warn!(
                event = name.as_deref().unwrap_or("(none)"),
                body = %preview(body),
                "Unknown graph message"
            );
            ProcessOutcome::Unknown(name)
        }
        Err(e) => {
            error!(error = %e, body = %preview(body), "Discarding message that is not JSON");
            ProcessOutcome::Invalid
        }
    }
}
