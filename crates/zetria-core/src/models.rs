//! Core data models for Zetria.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::defaults::{GRAPH_CONTENT_MAX_CHARS, GRAPH_LABEL_MAX_CHARS};

// =============================================================================
// USERS & SESSIONS
// =============================================================================

/// A registered user (never carries the password hash).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub created_at: DateTime<Utc>,
}

/// Stored login credentials, used only while verifying a password.
#[derive(Debug, Clone)]
pub struct UserCredentials {
    pub id: Uuid,
    pub username: String,
    pub password_hash: String,
}

/// The identity carried by an active session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub user_id: Uuid,
    pub username: String,
}

// =============================================================================
// NOTES
// =============================================================================

/// A note with its tag names.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Note {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// How a link between two notes came to exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkSource {
    /// Resolved from `[[Title]]` syntax in the source note's content.
    Inline,
    /// Created explicitly through the API.
    Manual,
}

impl LinkSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            LinkSource::Inline => "inline",
            LinkSource::Manual => "manual",
        }
    }

    /// Parse the stored column value, treating anything unknown as manual.
    pub fn from_db(value: &str) -> Self {
        match value {
            "inline" => LinkSource::Inline,
            _ => LinkSource::Manual,
        }
    }
}

/// One side of a note link, as shown to the user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoteLinkRef {
    pub note_id: Uuid,
    pub title: String,
    pub source: LinkSource,
}

/// Outgoing links and backlinks of a single note.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NoteLinks {
    pub links: Vec<NoteLinkRef>,
    pub backlinks: Vec<NoteLinkRef>,
}

// =============================================================================
// FLASHCARDS
// =============================================================================

/// A study card derived from a note.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Flashcard {
    pub id: Uuid,
    #[serde(rename = "nota_id")]
    pub note_id: Uuid,
    #[serde(rename = "nota_title")]
    pub note_title: String,
    pub front_content: String,
    pub back_content: String,
    pub audio_path: Option<String>,
    pub created_at: DateTime<Utc>,
    pub review_at: Option<DateTime<Utc>>,
}

// =============================================================================
// TASKS
// =============================================================================

/// A to-do or calendar item. The recurrence rule is stored verbatim.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub due_date: Option<DateTime<Utc>>,
    pub recurring: bool,
    pub recurrence_rule: String,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// GRAPH
// =============================================================================

/// Note row as needed by the graph view.
#[derive(Debug, Clone)]
pub struct GraphNoteRow {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// A tag and how many of the caller's notes use it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagUsage {
    pub id: Uuid,
    pub name: String,
    pub usage_count: i64,
}

/// One note–tag association.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoteTagPair {
    pub note_id: Uuid,
    pub tag_id: Uuid,
}

/// One directed note–note link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoteLinkPair {
    pub source_note_id: Uuid,
    pub target_note_id: Uuid,
}

/// Kind of graph node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GraphNodeType {
    Nota,
    Tag,
}

/// Payload attached to a graph node.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GraphNodeData {
    Note {
        id: Uuid,
        title: String,
        content: String,
        created_at: DateTime<Utc>,
    },
    Tag {
        id: Uuid,
        name: String,
        usage_count: i64,
    },
}

/// A node of the notes/tags graph.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: String,
    pub label: String,
    #[serde(rename = "type")]
    pub node_type: GraphNodeType,
    pub data: GraphNodeData,
}

impl GraphNode {
    /// Build the node for a note, truncating the label and content preview.
    pub fn from_note(note: &GraphNoteRow) -> Self {
        Self {
            id: note_node_id(note.id),
            label: truncate_with_ellipsis(&note.title, GRAPH_LABEL_MAX_CHARS),
            node_type: GraphNodeType::Nota,
            data: GraphNodeData::Note {
                id: note.id,
                title: note.title.clone(),
                content: truncate_with_ellipsis(&note.content, GRAPH_CONTENT_MAX_CHARS),
                created_at: note.created_at,
            },
        }
    }

    /// Build the node for a tag.
    pub fn from_tag(tag: &TagUsage) -> Self {
        Self {
            id: tag_node_id(tag.id),
            label: format!("#{}", tag.name),
            node_type: GraphNodeType::Tag,
            data: GraphNodeData::Tag {
                id: tag.id,
                name: tag.name.clone(),
                usage_count: tag.usage_count,
            },
        }
    }
}

/// Kind of graph edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GraphEdgeType {
    NotaTag,
    NotaLink,
}

/// A directed edge of the notes/tags graph.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphEdge {
    pub from: String,
    pub to: String,
    #[serde(rename = "type")]
    pub edge_type: GraphEdgeType,
}

impl GraphEdge {
    pub fn note_tag(pair: &NoteTagPair) -> Self {
        Self {
            from: note_node_id(pair.note_id),
            to: tag_node_id(pair.tag_id),
            edge_type: GraphEdgeType::NotaTag,
        }
    }

    pub fn note_link(pair: &NoteLinkPair) -> Self {
        Self {
            from: note_node_id(pair.source_note_id),
            to: note_node_id(pair.target_note_id),
            edge_type: GraphEdgeType::NotaLink,
        }
    }
}

/// Graph node id of a note.
pub fn note_node_id(id: Uuid) -> String {
    format!("nota_{}", id)
}

/// Graph node id of a tag.
pub fn tag_node_id(id: Uuid) -> String {
    format!("tag_{}", id)
}

/// Keep the first `max_chars` characters, appending `...` when anything was cut.
pub fn truncate_with_ellipsis(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => format!("{}...", &text[..byte_idx]),
        None => text.to_string(),
    }
}
