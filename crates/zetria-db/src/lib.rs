//! # zetria-db
//!
//! PostgreSQL database layer for Zetria.
//!
//! This crate provides:
//! - Connection pool management
//! - Repository implementations for every core entity
//! - Transactional note writes that keep tags and inline links in sync
//!
//! ## Example
//!
//! ```rust,ignore
//! use zetria_db::{Database, NoteRepository, SaveNoteRequest};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::connect("postgres://localhost/zetria").await?;
//!
//!     let note = db.notes.insert(user_id, SaveNoteRequest {
//!         title: "Ownership".to_string(),
//!         content: "Moves and borrows #rust".to_string(),
//!     }).await?;
//!
//!     println!("Created note: {}", note.id);
//!     Ok(())
//! }
//! ```
pub mod flashcards;
pub mod links;
pub mod notes;
pub mod pool;
pub mod sessions;
pub mod tags;
pub mod tasks;
pub mod users;

// Test fixtures for integration tests
// Note: Always compiled so integration tests (in tests/) can use DEFAULT_TEST_DATABASE_URL
pub mod test_fixtures;

// Re-export core types
pub use zetria_core::*;

// Re-export repository implementations
pub use flashcards::PgFlashcardRepository;
pub use links::PgLinkRepository;
pub use notes::PgNoteRepository;
pub use pool::{create_lazy_pool, create_pool, create_pool_with_config, log_pool_metrics, PoolConfig};
pub use sessions::PgSessionRepository;
pub use tags::PgTagRepository;
pub use tasks::PgTaskRepository;
pub use users::PgUserRepository;

/// Combined database context with all repositories.
pub struct Database {
    /// The underlying connection pool.
    pub pool: sqlx::Pool<sqlx::Postgres>,
    /// User account repository.
    pub users: PgUserRepository,
    /// Login session repository.
    pub sessions: PgSessionRepository,
    /// Note repository for CRUD operations.
    pub notes: PgNoteRepository,
    /// Tag repository.
    pub tags: PgTagRepository,
    /// Note link repository.
    pub links: PgLinkRepository,
    /// Flashcard repository.
    pub flashcards: PgFlashcardRepository,
    /// Task repository.
    pub tasks: PgTaskRepository,
}

impl Database {
    /// Create a new Database instance from a connection pool.
    pub fn new(pool: sqlx::Pool<sqlx::Postgres>) -> Self {
        Self {
            users: PgUserRepository::new(pool.clone()),
            sessions: PgSessionRepository::new(pool.clone()),
            notes: PgNoteRepository::new(pool.clone()),
            tags: PgTagRepository::new(pool.clone()),
            links: PgLinkRepository::new(pool.clone()),
            flashcards: PgFlashcardRepository::new(pool.clone()),
            tasks: PgTaskRepository::new(pool.clone()),
            pool,
        }
    }

    /// Create a new Database instance by connecting to the given URL.
    pub async fn connect(url: &str) -> Result<Self> {
        let pool = create_pool(url).await?;
        Ok(Self::new(pool))
    }

    /// Create with custom pool configuration.
    pub async fn connect_with_config(url: &str, config: PoolConfig) -> Result<Self> {
        let pool = create_pool_with_config(url, config).await?;
        Ok(Self::new(pool))
    }

    /// Create without connecting; connections open on first use.
    pub fn connect_lazy(url: &str, config: PoolConfig) -> Result<Self> {
        let pool = create_lazy_pool(url, config)?;
        Ok(Self::new(pool))
    }

    /// Run pending migrations.
    #[cfg(feature = "migrations")]
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("../../migrations")
            .run(&self.pool)
            .await
            .map_err(|e| Error::Database(sqlx::Error::Migrate(Box::new(e))))?;
        Ok(())
    }

    /// Get the underlying connection pool.
    pub fn pool(&self) -> &sqlx::Pool<sqlx::Postgres> {
        &self.pool
    }
}

impl Clone for Database {
    fn clone(&self) -> Self {
        Self::new(self.pool.clone())
    }
}
