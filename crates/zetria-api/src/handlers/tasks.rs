//! Task CRUD and the calendar day view.

use axum::{
    extract::{rejection::JsonRejection, rejection::PathRejection, Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;
use uuid::Uuid;

use zetria_core::{SaveTaskRequest, TaskRepository};

use crate::{
    auth::CurrentUser,
    dates::{parse_calendar_date, parse_optional_due_date},
    error::{ApiError, OrNotFound},
    AppState,
};

use super::{json_body, message, path_id, required};

pub const MSG_TASK_NOT_FOUND: &str = "Tarefa não encontrada";
pub const MSG_TASK_TITLE_REQUIRED: &str = "Título é obrigatório";
pub const MSG_TASK_UPDATED: &str = "Tarefa atualizada com sucesso";
pub const MSG_TASK_DELETED: &str = "Tarefa deletada com sucesso";

/// Task body for both create and full replace. Absent fields take defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct TaskInput {
    pub title: Option<String>,
    pub description: Option<String>,
    pub due_date: Option<String>,
    pub recurring: Option<bool>,
    pub recurrence_rule: Option<String>,
    pub completed: Option<bool>,
}

impl TaskInput {
    pub fn validate(self) -> Result<SaveTaskRequest, ApiError> {
        let title = required(self.title)
            .ok_or_else(|| ApiError::BadRequest(MSG_TASK_TITLE_REQUIRED.to_string()))?;
        Ok(SaveTaskRequest {
            title,
            description: self
                .description
                .map(|d| d.trim().to_string())
                .unwrap_or_default(),
            due_date: parse_optional_due_date(self.due_date.as_deref())?,
            recurring: self.recurring.unwrap_or(false),
            recurrence_rule: self.recurrence_rule.unwrap_or_default(),
            completed: self.completed.unwrap_or(false),
        })
    }
}

/// `GET /api/tasks`
pub async fn list_tasks(
    user: CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<Value>, ApiError> {
    let tasks = state.db.tasks.list(user.user_id).await?;
    Ok(Json(json!({ "tasks": tasks, "success": true })))
}

/// `POST /api/tasks`
pub async fn create_task(
    user: CurrentUser,
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let req = json_body::<TaskInput>(payload)?.validate()?;
    let task = state.db.tasks.insert(user.user_id, req).await?;

    info!(subsystem = "tasks", user_id = %user.user_id, task_id = %task.id, "Task created");

    Ok((
        StatusCode::CREATED,
        Json(json!({ "task": task, "success": true })),
    ))
}

/// `PUT /api/tasks/:id`
pub async fn update_task(
    user: CurrentUser,
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let id = path_id(path, MSG_TASK_NOT_FOUND)?;
    let req = json_body::<TaskInput>(payload)?.validate()?;
    state
        .db
        .tasks
        .update(user.user_id, id, req)
        .await
        .or_not_found(MSG_TASK_NOT_FOUND)?;
    Ok(message(MSG_TASK_UPDATED))
}

/// `DELETE /api/tasks/:id`
pub async fn delete_task(
    user: CurrentUser,
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<Value>, ApiError> {
    let id = path_id(path, MSG_TASK_NOT_FOUND)?;
    state
        .db
        .tasks
        .delete(user.user_id, id)
        .await
        .or_not_found(MSG_TASK_NOT_FOUND)?;
    Ok(message(MSG_TASK_DELETED))
}

/// `GET /api/tasks/date/:date`
pub async fn tasks_for_date(
    user: CurrentUser,
    State(state): State<AppState>,
    Path(date_str): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let date = parse_calendar_date(&date_str)?;
    let tasks = state.db.tasks.list_for_date(user.user_id, date).await?;
    Ok(Json(json!({ "tasks": tasks, "date": date_str, "success": true })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dates::MSG_INVALID_DATE;

    #[test]
    fn test_task_input_defaults() {
        let req = TaskInput {
            title: Some(" Estudar ".into()),
            ..Default::default()
        }
        .validate()
        .unwrap();
        assert_eq!(req.title, "Estudar");
        assert_eq!(req.description, "");
        assert!(req.due_date.is_none());
        assert!(!req.recurring);
        assert!(!req.completed);
        assert_eq!(req.recurrence_rule, "");
    }

    #[test]
    fn test_task_input_keeps_rule_verbatim() {
        let req = TaskInput {
            title: Some("Gym".into()),
            description: Some("  legs  ".into()),
            due_date: Some("2026-04-10".into()),
            recurring: Some(true),
            recurrence_rule: Some(" FREQ=WEEKLY ".into()),
            completed: Some(true),
        }
        .validate()
        .unwrap();
        assert_eq!(req.description, "legs");
        assert_eq!(req.recurrence_rule, " FREQ=WEEKLY ");
        assert!(req.recurring && req.completed);
        assert!(req.due_date.is_some());
    }

    #[test]
    fn test_task_input_requires_title() {
        match TaskInput::default().validate() {
            Err(ApiError::BadRequest(msg)) => assert_eq!(msg, MSG_TASK_TITLE_REQUIRED),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_task_input_rejects_bad_date() {
        let input = TaskInput {
            title: Some("t".into()),
            due_date: Some("10/04/2026".into()),
            ..Default::default()
        };
        match input.validate() {
            Err(ApiError::BadRequest(msg)) => assert_eq!(msg, MSG_INVALID_DATE),
            other => panic!("unexpected {:?}", other),
        }
    }
}
