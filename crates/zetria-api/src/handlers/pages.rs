//! Page routes.
//!
//! The server does not render HTML; each page route returns the context a
//! front end needs to render it.

use axum::{
    extract::{rejection::PathRejection, Path},
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::{auth::CurrentUser, error::ApiError};

use super::{notes::MSG_NOTE_NOT_FOUND, path_id};

/// Context of a page, with the logged-in username when there is one.
pub fn page_context(page: &str, user: Option<&CurrentUser>, nota_id: Option<Uuid>) -> Json<Value> {
    let mut context = json!({
        "page": page,
        "username": user.map(|u| u.username.as_str()),
        "success": true,
    });
    if let Some(id) = nota_id {
        context["nota_id"] = json!(id);
    }
    Json(context)
}

pub async fn login_page() -> Json<Value> {
    page_context("login", None, None)
}

pub async fn signup_page() -> Json<Value> {
    page_context("cadastro", None, None)
}

pub async fn dashboard(user: CurrentUser) -> Json<Value> {
    page_context("dashboard", Some(&user), None)
}

pub async fn notes(user: CurrentUser) -> Json<Value> {
    page_context("notas", Some(&user), None)
}

pub async fn new_note(user: CurrentUser) -> Json<Value> {
    page_context("nota", Some(&user), None)
}

pub async fn edit_note(
    user: CurrentUser,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<Value>, ApiError> {
    let id = path_id(path, MSG_NOTE_NOT_FOUND)?;
    Ok(page_context("nota", Some(&user), Some(id)))
}

pub async fn flashcards(user: CurrentUser) -> Json<Value> {
    page_context("flashcards", Some(&user), None)
}

pub async fn new_flashcard(user: CurrentUser) -> Json<Value> {
    page_context("flashcards_novo", Some(&user), None)
}

pub async fn study_flashcards(user: CurrentUser) -> Json<Value> {
    page_context("flashcards_estudar", Some(&user), None)
}

pub async fn calendar(user: CurrentUser) -> Json<Value> {
    page_context("calendario", Some(&user), None)
}

pub async fn graph(user: CurrentUser) -> Json<Value> {
    page_context("grafos", Some(&user), None)
}
