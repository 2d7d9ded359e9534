//! Repository traits for Zetria.
//!
//! Every method that touches user content takes the caller's `user_id` and
//! scopes its statements by it; ownership is never checked anywhere else.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::Result;
use crate::models::*;

// =============================================================================
// REQUEST TYPES
// =============================================================================

/// Request for creating or replacing a note's title and content.
#[derive(Debug, Clone)]
pub struct SaveNoteRequest {
    pub title: String,
    pub content: String,
}

/// Request for creating a flashcard.
#[derive(Debug, Clone)]
pub struct CreateFlashcardRequest {
    pub note_id: Uuid,
    pub front_content: String,
    pub back_content: String,
}

/// Request for updating a flashcard. `review_at: None` leaves it unchanged.
#[derive(Debug, Clone)]
pub struct UpdateFlashcardRequest {
    pub front_content: String,
    pub back_content: String,
    pub review_at: Option<DateTime<Utc>>,
}

/// Request for creating or fully replacing a task.
#[derive(Debug, Clone, Default)]
pub struct SaveTaskRequest {
    pub title: String,
    pub description: String,
    pub due_date: Option<DateTime<Utc>>,
    pub recurring: bool,
    pub recurrence_rule: String,
    /// Ignored on create; new tasks always start incomplete.
    pub completed: bool,
}

// =============================================================================
// USER & SESSION REPOSITORY TRAITS
// =============================================================================

/// Repository for user accounts.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Create a user. Fails with `Error::Conflict` when the username is taken.
    async fn create(&self, username: &str, password_hash: &str) -> Result<User>;

    /// Look up stored credentials by username.
    async fn find_credentials(&self, username: &str) -> Result<Option<UserCredentials>>;

    /// Check whether a username is already registered.
    async fn username_exists(&self, username: &str) -> Result<bool>;
}

/// Repository for server-side login sessions.
///
/// Only the SHA-256 hex digest of a session token is ever stored.
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Store a new session.
    async fn create(
        &self,
        token_hash: &str,
        user: &SessionUser,
        expires_at: DateTime<Utc>,
    ) -> Result<()>;

    /// Resolve an unexpired session.
    async fn find_active(&self, token_hash: &str) -> Result<Option<SessionUser>>;

    /// Delete a session (logout). Deleting an unknown session is not an error.
    async fn delete(&self, token_hash: &str) -> Result<()>;

    /// Remove expired sessions, returning how many were deleted.
    async fn purge_expired(&self) -> Result<u64>;
}

// =============================================================================
// NOTE, TAG & LINK REPOSITORY TRAITS
// =============================================================================

/// Repository for note CRUD.
///
/// Writes keep tags and inline links in sync with the content: the tag set
/// becomes exactly the extracted `#tokens`, and inline links are replaced by
/// the resolved `[[targets]]`.
#[async_trait]
pub trait NoteRepository: Send + Sync {
    /// List the user's notes, most recently updated first.
    async fn list(&self, user_id: Uuid) -> Result<Vec<Note>>;

    /// Fetch one of the user's notes.
    async fn fetch(&self, user_id: Uuid, id: Uuid) -> Result<Note>;

    /// Insert a note and derive its tags and inline links.
    async fn insert(&self, user_id: Uuid, req: SaveNoteRequest) -> Result<Note>;

    /// Replace title and content, then fully replace tags and inline links.
    async fn update(&self, user_id: Uuid, id: Uuid, req: SaveNoteRequest) -> Result<()>;

    /// Delete a note with its tag associations, links and flashcards.
    async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<()>;

    /// Check whether the note exists and belongs to the user.
    async fn exists(&self, user_id: Uuid, id: Uuid) -> Result<bool>;

    /// Every note of the user in the shape the graph view needs.
    async fn graph_rows(&self, user_id: Uuid) -> Result<Vec<GraphNoteRow>>;
}

/// Repository for tags and note–tag associations.
#[async_trait]
pub trait TagRepository: Send + Sync {
    /// Tag names associated with a note, sorted.
    async fn get_for_note(&self, note_id: Uuid) -> Result<Vec<String>>;

    /// Distinct tags used by the user's notes, with usage counts.
    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<TagUsage>>;

    /// Every note–tag association of the user's notes.
    async fn pairs_for_user(&self, user_id: Uuid) -> Result<Vec<NoteTagPair>>;
}

/// Repository for note–note links.
#[async_trait]
pub trait LinkRepository: Send + Sync {
    /// Create a manual link between two of the user's notes (idempotent).
    async fn create(&self, user_id: Uuid, source_id: Uuid, target_id: Uuid) -> Result<()>;

    /// Outgoing links and backlinks of one of the user's notes.
    async fn for_note(&self, user_id: Uuid, note_id: Uuid) -> Result<NoteLinks>;

    /// Every link between the user's notes.
    async fn pairs_for_user(&self, user_id: Uuid) -> Result<Vec<NoteLinkPair>>;
}

// =============================================================================
// FLASHCARD & TASK REPOSITORY TRAITS
// =============================================================================

/// Repository for flashcards. Ownership goes through the card's note.
#[async_trait]
pub trait FlashcardRepository: Send + Sync {
    /// List the user's flashcards, newest first.
    async fn list(&self, user_id: Uuid) -> Result<Vec<Flashcard>>;

    /// Fetch one of the user's flashcards.
    async fn fetch(&self, user_id: Uuid, id: Uuid) -> Result<Flashcard>;

    /// Create a flashcard on one of the user's notes.
    async fn insert(&self, user_id: Uuid, req: CreateFlashcardRequest) -> Result<Flashcard>;

    /// Update front/back (and optionally the next review time).
    async fn update(&self, user_id: Uuid, id: Uuid, req: UpdateFlashcardRequest) -> Result<()>;

    /// Delete one of the user's flashcards.
    async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<()>;
}

/// Repository for tasks.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// List the user's tasks by due date (undated first), newest first within a date.
    async fn list(&self, user_id: Uuid) -> Result<Vec<Task>>;

    /// Tasks due on a calendar day (UTC).
    async fn list_for_date(&self, user_id: Uuid, date: chrono::NaiveDate) -> Result<Vec<Task>>;

    /// Create a task.
    async fn insert(&self, user_id: Uuid, req: SaveTaskRequest) -> Result<Task>;

    /// Fully replace a task's fields.
    async fn update(&self, user_id: Uuid, id: Uuid, req: SaveTaskRequest) -> Result<()>;

    /// Delete one of the user's tasks.
    async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<()>;
}
