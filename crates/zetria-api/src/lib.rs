//! # zetria-api
//!
//! HTTP server for Zetria: session login, notes with derived tags and links,
//! flashcards, tasks and the notes/tags graph.
//!
//! The router is built by [`app`] so tests can drive it without binding a
//! socket.

pub mod auth;
pub mod config;
pub mod dates;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod services;

use std::sync::Arc;

use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    limit::RequestBodyLimitLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use zetria_db::Database;

use crate::config::SessionSettings;
use crate::handlers::{auth as auth_handlers, flashcards, graph, health, links, notes, pages, tasks};
use crate::middleware::{rate_limit_middleware, GlobalRateLimiter, MakeRequestUuidV7};
use crate::services::GraphEventPublisher;

pub use error::ApiError;

/// Largest accepted request body.
const MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

/// Shared state of every handler.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub session: SessionSettings,
    pub rate_limiter: Option<Arc<GlobalRateLimiter>>,
    pub graph_events: GraphEventPublisher,
}

impl AppState {
    /// State with default sessions, no rate limit and no event publishing.
    pub fn new(db: Database) -> Self {
        Self {
            db,
            session: SessionSettings::default(),
            rate_limiter: None,
            graph_events: GraphEventPublisher::disabled(),
        }
    }
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .allow_credentials(true)
        .max_age(std::time::Duration::from_secs(3600))
}

/// Build the full router with middleware.
pub fn app(state: AppState, allowed_origins: &[String]) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        // Authentication
        .route("/", get(auth_handlers::index))
        .route("/login", get(pages::login_page).post(auth_handlers::login))
        .route("/cadastro", get(pages::signup_page).post(auth_handlers::signup))
        .route("/logout", get(auth_handlers::logout))
        // Pages
        .route("/dashboard", get(pages::dashboard))
        .route("/notas", get(pages::notes))
        .route("/notas/nova", get(pages::new_note))
        .route("/notas/:id/editar", get(pages::edit_note))
        .route("/flashcards", get(pages::flashcards))
        .route("/flashcards/novo", get(pages::new_flashcard))
        .route("/flashcards/estudar", get(pages::study_flashcards))
        .route("/calendario", get(pages::calendar))
        .route("/grafos", get(pages::graph))
        // Notes & links
        .route("/api/notas", get(notes::list_notes).post(notes::create_note))
        .route(
            "/api/notas/:id",
            get(notes::get_note)
                .put(notes::update_note)
                .delete(notes::delete_note),
        )
        .route("/api/notas/:id/links", get(links::note_links))
        .route("/api/links", post(links::create_link))
        // Flashcards
        .route(
            "/api/flashcards",
            get(flashcards::list_flashcards).post(flashcards::create_flashcard),
        )
        .route(
            "/api/flashcards/:id",
            get(flashcards::get_flashcard)
                .put(flashcards::update_flashcard)
                .delete(flashcards::delete_flashcard),
        )
        // Tasks
        .route("/api/tasks", get(tasks::list_tasks).post(tasks::create_task))
        .route(
            "/api/tasks/:id",
            axum::routing::put(tasks::update_task).delete(tasks::delete_task),
        )
        .route("/api/tasks/date/:date", get(tasks::tasks_for_date))
        // Graph
        .route("/api/grafos/nodes", get(graph::graph_nodes))
        .route("/api/grafos/edges", get(graph::graph_edges))
        // Middleware
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            rate_limit_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7))
        .layer(cors_layer(allowed_origins))
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .with_state(state)
}
