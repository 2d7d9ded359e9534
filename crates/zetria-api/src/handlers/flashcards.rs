//! Flashcard CRUD. A card belongs to the user who owns its note.

use axum::{
    extract::{rejection::JsonRejection, rejection::PathRejection, Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;
use uuid::Uuid;

use zetria_core::{CreateFlashcardRequest, FlashcardRepository, UpdateFlashcardRequest};

use crate::{
    auth::CurrentUser,
    dates::parse_optional_due_date,
    error::{ApiError, OrNotFound},
    AppState,
};

use super::{json_body, message, notes::MSG_NOTE_NOT_FOUND, path_id, required};

pub const MSG_FLASHCARD_NOT_FOUND: &str = "Flashcard não encontrado";
pub const MSG_CREATE_FIELDS_REQUIRED: &str = "Nota ID, frente e verso são obrigatórios";
pub const MSG_UPDATE_FIELDS_REQUIRED: &str = "Frente e verso são obrigatórios";
pub const MSG_FLASHCARD_UPDATED: &str = "Flashcard atualizado com sucesso";
pub const MSG_FLASHCARD_DELETED: &str = "Flashcard deletado com sucesso";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CreateFlashcardInput {
    pub nota_id: Option<String>,
    pub front_content: Option<String>,
    pub back_content: Option<String>,
}

impl CreateFlashcardInput {
    pub fn validate(self) -> Result<CreateFlashcardRequest, ApiError> {
        let (Some(nota_id), Some(front_content), Some(back_content)) = (
            required(self.nota_id),
            required(self.front_content),
            required(self.back_content),
        ) else {
            return Err(ApiError::BadRequest(MSG_CREATE_FIELDS_REQUIRED.to_string()));
        };
        let note_id = Uuid::parse_str(&nota_id)
            .map_err(|_| ApiError::NotFound(MSG_NOTE_NOT_FOUND.to_string()))?;
        Ok(CreateFlashcardRequest {
            note_id,
            front_content,
            back_content,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UpdateFlashcardInput {
    pub front_content: Option<String>,
    pub back_content: Option<String>,
    pub review_at: Option<String>,
}

impl UpdateFlashcardInput {
    pub fn validate(self) -> Result<UpdateFlashcardRequest, ApiError> {
        let (Some(front_content), Some(back_content)) =
            (required(self.front_content), required(self.back_content))
        else {
            return Err(ApiError::BadRequest(MSG_UPDATE_FIELDS_REQUIRED.to_string()));
        };
        Ok(UpdateFlashcardRequest {
            front_content,
            back_content,
            review_at: parse_optional_due_date(self.review_at.as_deref())?,
        })
    }
}

/// `GET /api/flashcards`
pub async fn list_flashcards(
    user: CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<Value>, ApiError> {
    let flashcards = state.db.flashcards.list(user.user_id).await?;
    Ok(Json(json!({ "flashcards": flashcards, "success": true })))
}

/// `POST /api/flashcards`
pub async fn create_flashcard(
    user: CurrentUser,
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let req = json_body::<CreateFlashcardInput>(payload)?.validate()?;
    let flashcard = state
        .db
        .flashcards
        .insert(user.user_id, req)
        .await
        .or_not_found(MSG_NOTE_NOT_FOUND)?;

    info!(
        subsystem = "flashcards",
        user_id = %user.user_id,
        note_id = %flashcard.note_id,
        flashcard_id = %flashcard.id,
        "Flashcard created"
    );

    Ok((
        StatusCode::CREATED,
        Json(json!({ "flashcard": flashcard, "success": true })),
    ))
}

/// `GET /api/flashcards/:id`
pub async fn get_flashcard(
    user: CurrentUser,
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<Value>, ApiError> {
    let id = path_id(path, MSG_FLASHCARD_NOT_FOUND)?;
    let flashcard = state
        .db
        .flashcards
        .fetch(user.user_id, id)
        .await
        .or_not_found(MSG_FLASHCARD_NOT_FOUND)?;
    Ok(Json(json!({ "flashcard": flashcard, "success": true })))
}

/// `PUT /api/flashcards/:id`
pub async fn update_flashcard(
    user: CurrentUser,
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let id = path_id(path, MSG_FLASHCARD_NOT_FOUND)?;
    let req = json_body::<UpdateFlashcardInput>(payload)?.validate()?;
    state
        .db
        .flashcards
        .update(user.user_id, id, req)
        .await
        .or_not_found(MSG_FLASHCARD_NOT_FOUND)?;
    Ok(message(MSG_FLASHCARD_UPDATED))
}

/// `DELETE /api/flashcards/:id`
pub async fn delete_flashcard(
    user: CurrentUser,
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<Value>, ApiError> {
    let id = path_id(path, MSG_FLASHCARD_NOT_FOUND)?;
    state
        .db
        .flashcards
        .delete(user.user_id, id)
        .await
        .or_not_found(MSG_FLASHCARD_NOT_FOUND)?;
    Ok(message(MSG_FLASHCARD_DELETED))
}
