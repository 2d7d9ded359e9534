//! Notes/tags graph.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use zetria_core::{
    GraphEdge, GraphEvent, GraphNode, LinkRepository, NoteRepository, TagRepository,
};

use crate::{auth::CurrentUser, error::ApiError, AppState};

#[derive(Debug, Default, Deserialize)]
pub struct EdgesQuery {
    pub include_links: Option<String>,
}

impl EdgesQuery {
    fn include_links(&self) -> bool {
        matches!(self.include_links.as_deref(), Some("true") | Some("1"))
    }
}

/// Publish without holding up the response.
fn publish_in_background(state: &AppState, event: GraphEvent) {
    let publisher = state.graph_events.clone();
    tokio::spawn(async move {
        publisher.publish(&event).await;
    });
}

/// `GET /api/grafos/nodes`
pub async fn graph_nodes(
    user: CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<Value>, ApiError> {
    let notes = state.db.notes.graph_rows(user.user_id).await?;
    let tags = state.db.tags.list_for_user(user.user_id).await?;

    let nodes: Vec<GraphNode> = notes
        .iter()
        .map(GraphNode::from_note)
        .chain(tags.iter().map(GraphNode::from_tag))
        .collect();

    debug!(
        subsystem = "graph",
        user_id = %user.user_id,
        note_count = notes.len(),
        tag_count = tags.len(),
        "Graph nodes built"
    );
    publish_in_background(&state, GraphEvent::nodes_retrieved(user.user_id, nodes.len()));

    Ok(Json(json!({ "nodes": nodes, "success": true })))
}

/// `GET /api/grafos/edges`
pub async fn graph_edges(
    user: CurrentUser,
    State(state): State<AppState>,
    Query(query): Query<EdgesQuery>,
) -> Result<Json<Value>, ApiError> {
    let mut edges: Vec<GraphEdge> = state
        .db
        .tags
        .pairs_for_user(user.user_id)
        .await?
        .iter()
        .map(GraphEdge::note_tag)
        .collect();

    if query.include_links() {
        let links = state.db.links.pairs_for_user(user.user_id).await?;
        edges.extend(links.iter().map(GraphEdge::note_link));
    }

    debug!(
        subsystem = "graph",
        user_id = %user.user_id,
        edge_count = edges.len(),
        include_links = query.include_links(),
        "Graph edges built"
    );
    publish_in_background(&state, GraphEvent::edges_retrieved(user.user_id, edges.len()));

    Ok(Json(json!({ "edges": edges, "success": true })))
}
