//! Session authentication.
//!
//! A login issues a random alphanumeric token in the `zetria_session` cookie.
//! The server keeps only the SHA-256 hex digest of the token, so a leaked
//! session table cannot be replayed. Passwords are stored as Argon2id PHC
//! strings and hashed on the blocking pool.

use std::time::Duration;

use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap},
};
use rand::{distributions::Alphanumeric, Rng};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use zetria_core::{defaults, Error, SessionRepository};

use crate::{error::ApiError, AppState};

// =============================================================================
// PASSWORDS
// =============================================================================

fn hash_password_blocking(password: &str) -> zetria_core::Result<String> {
    let mut salt_bytes = [0u8; 16];
    rand::thread_rng().fill(&mut salt_bytes);
    let salt = SaltString::encode_b64(&salt_bytes).map_err(|e| Error::Internal(e.to_string()))?;
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| Error::Internal(e.to_string()))?;
    Ok(hash.to_string())
}

fn verify_password_blocking(password: &str, stored: &str) -> bool {
    match PasswordHash::new(stored) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(e) => {
            tracing::warn!(subsystem = "auth", error = %e, "Stored password hash is malformed");
            false
        }
    }
}

/// Hash a password into an Argon2id PHC string with a random salt.
pub async fn hash_password(password: String) -> Result<String, ApiError> {
    tokio::task::spawn_blocking(move || hash_password_blocking(&password))
        .await
        .map_err(|e| ApiError::Internal(Error::Internal(e.to_string())))?
        .map_err(ApiError::from)
}

/// Check a password against a stored PHC string.
pub async fn verify_password(password: String, stored: String) -> Result<bool, ApiError> {
    tokio::task::spawn_blocking(move || verify_password_blocking(&password, &stored))
        .await
        .map_err(|e| ApiError::Internal(Error::Internal(e.to_string())))
}

// =============================================================================
// SESSION TOKENS & COOKIES
// =============================================================================

/// Generate a new random session token.
pub fn generate_session_token() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(defaults::SESSION_TOKEN_LEN)
        .map(char::from)
        .collect()
}

/// Digest stored in place of the raw token.
pub fn hash_token(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}

fn is_well_formed_token(token: &str) -> bool {
    token.len() == defaults::SESSION_TOKEN_LEN && token.bytes().all(|b| b.is_ascii_alphanumeric())
}

/// Session token from the request's `Cookie` headers, if present and well formed.
pub fn session_token_from_headers(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == defaults::SESSION_COOKIE)
        .map(|(_, value)| value.trim().to_string())
        .filter(|token| is_well_formed_token(token))
}

/// `Set-Cookie` value that stores a session token.
pub fn session_cookie(token: &str, ttl: Duration, secure: bool) -> String {
    let mut cookie = format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        defaults::SESSION_COOKIE,
        token,
        ttl.as_secs()
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// `Set-Cookie` value that removes the session cookie.
pub fn clear_session_cookie(secure: bool) -> String {
    session_cookie("", Duration::ZERO, secure)
}

/// Whether a rejected request should get JSON instead of a login redirect.
pub fn wants_json(parts: &Parts) -> bool {
    if parts.uri.path().starts_with("/api/") {
        return true;
    }
    [header::ACCEPT, header::CONTENT_TYPE].iter().any(|name| {
        parts
            .headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.contains("application/json"))
    })
}

// =============================================================================
// EXTRACTOR
// =============================================================================

/// The logged-in user of a request.
///
/// Handlers taking this extractor are login-protected; requests without a
/// valid session are rejected with [`ApiError::LoginRequired`].
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user_id: Uuid,
    pub username: String,
    /// Digest of the session token, used by logout.
    pub token_hash: String,
}

#[axum::async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let json = wants_json(parts);
        let Some(token) = session_token_from_headers(&parts.headers) else {
            return Err(ApiError::LoginRequired { json });
        };

        let token_hash = hash_token(&token);
        match state.db.sessions.find_active(&token_hash).await? {
            Some(user) => Ok(CurrentUser {
                user_id: user.user_id,
                username: user.username,
                token_hash,
            }),
            None => Err(ApiError::LoginRequired { json }),
        }
    }
}
