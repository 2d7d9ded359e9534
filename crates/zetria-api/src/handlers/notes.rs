//! Note CRUD.
//!
//! Tags and inline links are derived from the content by the repository on
//! every write; handlers only validate and scope by the session user.

use axum::{
    extract::{rejection::JsonRejection, rejection::PathRejection, Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;
use uuid::Uuid;

use zetria_core::{NoteRepository, SaveNoteRequest};

use crate::{
    auth::CurrentUser,
    error::{ApiError, OrNotFound},
    AppState,
};

use super::{json_body, message, path_id, required};

pub const MSG_NOTE_NOT_FOUND: &str = "Nota não encontrada";
pub const MSG_NOTE_FIELDS_REQUIRED: &str = "Título e conteúdo são obrigatórios";
pub const MSG_NOTE_UPDATED: &str = "Nota atualizada com sucesso";
pub const MSG_NOTE_DELETED: &str = "Nota deletada com sucesso";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct NoteInput {
    pub title: Option<String>,
    pub content: Option<String>,
}

impl NoteInput {
    /// Both fields trimmed and non-empty.
    pub fn validate(self) -> Result<SaveNoteRequest, ApiError> {
        match (required(self.title), required(self.content)) {
            (Some(title), Some(content)) => Ok(SaveNoteRequest { title, content }),
            _ => Err(ApiError::BadRequest(MSG_NOTE_FIELDS_REQUIRED.to_string())),
        }
    }
}

/// `GET /api/notas`
pub async fn list_notes(
    user: CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<Value>, ApiError> {
    let notes = state.db.notes.list(user.user_id).await?;
    Ok(Json(json!({ "notas": notes, "success": true })))
}

/// `POST /api/notas`
pub async fn create_note(
    user: CurrentUser,
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let req = json_body::<NoteInput>(payload)?.validate()?;
    let note = state.db.notes.insert(user.user_id, req).await?;

    info!(
        subsystem = "notes",
        user_id = %user.user_id,
        note_id = %note.id,
        tag_count = note.tags.len(),
        "Note created"
    );

    Ok((
        StatusCode::CREATED,
        Json(json!({ "nota": note, "success": true })),
    ))
}

/// `GET /api/notas/:id`
pub async fn get_note(
    user: CurrentUser,
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<Value>, ApiError> {
    let id = path_id(path, MSG_NOTE_NOT_FOUND)?;
    let note = state
        .db
        .notes
        .fetch(user.user_id, id)
        .await
        .or_not_found(MSG_NOTE_NOT_FOUND)?;
    Ok(Json(json!({ "nota": note, "success": true })))
}

/// `PUT /api/notas/:id`
pub async fn update_note(
    user: CurrentUser,
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let id = path_id(path, MSG_NOTE_NOT_FOUND)?;
    let req = json_body::<NoteInput>(payload)?.validate()?;
    state
        .db
        .notes
        .update(user.user_id, id, req)
        .await
        .or_not_found(MSG_NOTE_NOT_FOUND)?;

    info!(subsystem = "notes", user_id = %user.user_id, note_id = %id, "Note updated");
    Ok(message(MSG_NOTE_UPDATED))
}

/// `DELETE /api/notas/:id`
pub async fn delete_note(
    user: CurrentUser,
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<Value>, ApiError> {
    let id = path_id(path, MSG_NOTE_NOT_FOUND)?;
    state
        .db
        .notes
        .delete(user.user_id, id)
        .await
        .or_not_found(MSG_NOTE_NOT_FOUND)?;

    info!(subsystem = "notes", user_id = %user.user_id, note_id = %id, "Note deleted");
    Ok(message(MSG_NOTE_DELETED))
}
