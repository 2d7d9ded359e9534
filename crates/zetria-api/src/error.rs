//! HTTP error type.
//!
//! Every failure renders as `{"success": false, "error": "<message>"}`.
//! Internal errors are logged and surface only a generic message.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Json,
};
use serde_json::json;

pub const MSG_INTERNAL: &str = "Erro interno do servidor";
pub const MSG_UNAUTHORIZED: &str = "Acesso não autorizado";
pub const MSG_NO_DATA: &str = "Dados não fornecidos";
pub const MSG_TOO_MANY_REQUESTS: &str = "Muitas requisições, tente novamente mais tarde";

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// No valid session. JSON clients get 401, browsers a redirect to `/login`.
    #[error("login required")]
    LoginRequired { json: bool },

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("rate limit exceeded")]
    TooManyRequests,

    #[error(transparent)]
    Internal(zetria_core::Error),
}

impl From<zetria_core::Error> for ApiError {
    fn from(err: zetria_core::Error) -> Self {
        match err {
            zetria_core::Error::NotFound(msg) => ApiError::NotFound(msg),
            zetria_core::Error::InvalidInput(msg) => ApiError::BadRequest(msg),
            zetria_core::Error::Conflict(msg) => ApiError::Conflict(msg),
            zetria_core::Error::Unauthorized(msg) => ApiError::Unauthorized(msg),
            other => ApiError::Internal(other),
        }
    }
}

/// Replace the message of a not-found error with a user-facing one.
pub trait OrNotFound<T> {
    fn or_not_found(self, message: &str) -> Result<T, ApiError>;
}

impl<T> OrNotFound<T> for zetria_core::Result<T> {
    fn or_not_found(self, message: &str) -> Result<T, ApiError> {
        self.map_err(|err| match err {
            zetria_core::Error::NotFound(_) => ApiError::NotFound(message.to_string()),
            other => ApiError::from(other),
        })
    }
}

/// JSON body of a failed request.
pub fn error_body(message: &str) -> Json<serde_json::Value> {
    Json(json!({ "success": false, "error": message }))
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::LoginRequired { json: false } => {
                return Redirect::to("/login").into_response();
            }
            ApiError::LoginRequired { json: true } => {
                (StatusCode::UNAUTHORIZED, MSG_UNAUTHORIZED.to_string())
            }
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            ApiError::TooManyRequests => (
                StatusCode::TOO_MANY_REQUESTS,
                MSG_TOO_MANY_REQUESTS.to_string(),
            ),
            ApiError::Internal(err) => {
                tracing::error!(subsystem = "api", error = %err, "Request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, MSG_INTERNAL.to_string())
            }
        };

        (status, error_body(&message)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::header;

    #[test]
    fn test_core_errors_map_to_status() {
        let cases = [
            (zetria_core::Error::NotFound("x".into()), StatusCode::NOT_FOUND),
            (zetria_core::Error::InvalidInput("x".into()), StatusCode::BAD_REQUEST),
            (zetria_core::Error::Conflict("x".into()), StatusCode::CONFLICT),
            (zetria_core::Error::Internal("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
            (zetria_core::Error::Queue("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError::from(err).into_response().status(), status);
        }
    }

    #[test]
    fn test_login_required_redirects_browsers() {
        let response = ApiError::LoginRequired { json: false }.into_response();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/login");
    }

    #[test]
    fn test_login_required_json_is_401() {
        let response = ApiError::LoginRequired { json: true }.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_or_not_found_rewrites_message() {
        let result: zetria_core::Result<()> = Err(zetria_core::Error::NotFound("note 1".into()));
        match result.or_not_found("Nota não encontrada") {
            Err(ApiError::NotFound(msg)) => assert_eq!(msg, "Nota não encontrada"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_or_not_found_keeps_other_errors() {
        let result: zetria_core::Result<()> = Err(zetria_core::Error::Internal("boom".into()));
        assert!(matches!(
            result.or_not_found("Nota não encontrada"),
            Err(ApiError::Internal(_))
        ));
    }
}
