//! Login, registration and logout.

use axum::{
    extract::{rejection::FormRejection, State},
    http::{header, StatusCode},
    response::{IntoResponse, Redirect, Response},
    Form, Json,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use zetria_core::{defaults, Error, SessionRepository, SessionUser, UserRepository};

use crate::{
    auth::{self, CurrentUser},
    error::ApiError,
    AppState,
};

pub const MSG_FILL_ALL_FIELDS: &str = "Por favor, preencha todos os campos";
pub const MSG_BAD_CREDENTIALS: &str = "Usuário ou senha incorretos";
pub const MSG_LOGIN_OK: &str = "Login realizado com sucesso!";
pub const MSG_USERNAME_TOO_SHORT: &str = "O nome de usuário deve ter pelo menos 3 caracteres";
pub const MSG_PASSWORD_TOO_SHORT: &str = "A senha deve ter pelo menos 6 caracteres";
pub const MSG_PASSWORD_MISMATCH: &str = "As senhas não coincidem";
pub const MSG_USERNAME_TAKEN: &str = "Este nome de usuário já está em uso";
pub const MSG_SIGNUP_OK: &str = "Conta criada com sucesso! Faça login para continuar.";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SignupForm {
    pub username: String,
    pub password: String,
    pub confirm_password: String,
}

/// Validated registration input.
#[derive(Debug, PartialEq, Eq)]
pub struct Signup {
    pub username: String,
    pub password: String,
}

/// Validate a registration form. Only the username is trimmed.
pub fn validate_signup(form: SignupForm) -> Result<Signup, ApiError> {
    let username = form.username.trim().to_string();
    if username.is_empty() || form.password.is_empty() || form.confirm_password.is_empty() {
        return Err(ApiError::BadRequest(MSG_FILL_ALL_FIELDS.to_string()));
    }
    if username.chars().count() < defaults::USERNAME_MIN_LEN {
        return Err(ApiError::BadRequest(MSG_USERNAME_TOO_SHORT.to_string()));
    }
    if form.password.chars().count() < defaults::PASSWORD_MIN_LEN {
        return Err(ApiError::BadRequest(MSG_PASSWORD_TOO_SHORT.to_string()));
    }
    if form.password != form.confirm_password {
        return Err(ApiError::BadRequest(MSG_PASSWORD_MISMATCH.to_string()));
    }
    Ok(Signup {
        username,
        password: form.password,
    })
}

/// `POST /login`
pub async fn login(
    State(state): State<AppState>,
    form: Result<Form<LoginForm>, FormRejection>,
) -> Result<Response, ApiError> {
    let form = form.map(|Form(f)| f).unwrap_or_default();
    let username = form.username.trim().to_string();
    if username.is_empty() || form.password.is_empty() {
        return Err(ApiError::BadRequest(MSG_FILL_ALL_FIELDS.to_string()));
    }

    let bad_credentials = || ApiError::Unauthorized(MSG_BAD_CREDENTIALS.to_string());
    let Some(credentials) = state.db.users.find_credentials(&username).await? else {
        info!(subsystem = "auth", username = %username, "Login failed: unknown user");
        return Err(bad_credentials());
    };
    if !auth::verify_password(form.password, credentials.password_hash).await? {
        info!(subsystem = "auth", user_id = %credentials.id, "Login failed: wrong password");
        return Err(bad_credentials());
    }

    let user = SessionUser {
        user_id: credentials.id,
        username: credentials.username,
    };
    let token = auth::generate_session_token();
    let ttl = state.session.ttl;
    let expires_at = Utc::now()
        + chrono::Duration::from_std(ttl).map_err(|e| Error::Internal(e.to_string()))?;
    state
        .db
        .sessions
        .create(&auth::hash_token(&token), &user, expires_at)
        .await?;

    info!(subsystem = "auth", user_id = %user.user_id, "Login succeeded");

    let cookie = auth::session_cookie(&token, ttl, state.session.cookie_secure);
    Ok((
        [(header::SET_COOKIE, cookie)],
        Json(json!({
            "success": true,
            "message": MSG_LOGIN_OK,
            "user": { "id": user.user_id, "username": user.username },
        })),
    )
        .into_response())
}

/// `POST /cadastro`
pub async fn signup(
    State(state): State<AppState>,
    form: Result<Form<SignupForm>, FormRejection>,
) -> Result<Response, ApiError> {
    let signup = validate_signup(form.map(|Form(f)| f).unwrap_or_default())?;

    if state.db.users.username_exists(&signup.username).await? {
        return Err(ApiError::Conflict(MSG_USERNAME_TAKEN.to_string()));
    }

    let password_hash = auth::hash_password(signup.password).await?;
    let user = match state.db.users.create(&signup.username, &password_hash).await {
        Ok(user) => user,
        Err(Error::Conflict(_)) => return Err(ApiError::Conflict(MSG_USERNAME_TAKEN.to_string())),
        Err(e) => return Err(e.into()),
    };

    info!(subsystem = "auth", user_id = %user.id, "User registered");

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": MSG_SIGNUP_OK,
            "user": { "id": user.id, "username": user.username },
        })),
    )
        .into_response())
}

/// `GET /logout`
pub async fn logout(
    State(state): State<AppState>,
    user: Option<CurrentUser>,
) -> Result<Response, ApiError> {
    if let Some(user) = user {
        state.db.sessions.delete(&user.token_hash).await?;
        info!(subsystem = "auth", user_id = %user.user_id, "User logged out");
    }
    let cookie = auth::clear_session_cookie(state.session.cookie_secure);
    Ok(([(header::SET_COOKIE, cookie)], Redirect::to("/login")).into_response())
}

/// `GET /`
pub async fn index(user: Option<CurrentUser>) -> Redirect {
    match user {
        Some(_) => Redirect::to("/dashboard"),
        None => Redirect::to("/login"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(username: &str, password: &str, confirm: &str) -> SignupForm {
        SignupForm {
            username: username.to_string(),
            password: password.to_string(),
            confirm_password: confirm.to_string(),
        }
    }

    fn rejection(form: SignupForm) -> String {
        match validate_signup(form) {
            Err(ApiError::BadRequest(msg)) => msg,
            other => panic!("expected validation failure, got {:?}", other),
        }
    }

    #[test]
    fn test_signup_requires_all_fields() {
        assert_eq!(rejection(form("", "secret1", "secret1")), MSG_FILL_ALL_FIELDS);
        assert_eq!(rejection(form("alice", "", "secret1")), MSG_FILL_ALL_FIELDS);
        assert_eq!(rejection(form("alice", "secret1", "")), MSG_FILL_ALL_FIELDS);
        assert_eq!(rejection(form("   ", "secret1", "secret1")), MSG_FILL_ALL_FIELDS);
    }

    #[test]
    fn test_signup_length_rules() {
        assert_eq!(rejection(form("ab", "secret1", "secret1")), MSG_USERNAME_TOO_SHORT);
        assert_eq!(rejection(form("alice", "12345", "12345")), MSG_PASSWORD_TOO_SHORT);
    }

    #[test]
    fn test_signup_password_mismatch() {
        assert_eq!(rejection(form("alice", "secret1", "secret2")), MSG_PASSWORD_MISMATCH);
    }

    #[test]
    fn test_signup_trims_username_only() {
        let signup = validate_signup(form("  alice  ", " secret1", " secret1")).unwrap();
        assert_eq!(signup.username, "alice");
        assert_eq!(signup.password, " secret1");
    }

    #[test]
    fn test_username_length_counts_characters() {
        assert!(validate_signup(form("ção", "secret1", "secret1")).is_ok());
    }
}
