//! Flashcard repository implementation.
//!
//! Flashcards carry no owner column; every statement joins through the
//! card's note and filters on `note.user_id`.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{postgres::PgRow, Pool, Postgres, Row};
use uuid::Uuid;

use zetria_core::{
    new_v7, CreateFlashcardRequest, Error, Flashcard, FlashcardRepository, Result,
    UpdateFlashcardRequest,
};

const SELECT_FLASHCARD: &str = "SELECT f.id, f.note_id, n.title AS note_title, f.front_content,
        f.back_content, f.audio_path, f.created_at, f.review_at
     FROM flashcard f
     JOIN note n ON n.id = f.note_id";

/// PostgreSQL implementation of FlashcardRepository.
pub struct PgFlashcardRepository {
    pool: Pool<Postgres>,
}

impl PgFlashcardRepository {
    /// Create a new PgFlashcardRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

fn flashcard_from_row(row: &PgRow) -> Flashcard {
    Flashcard {
        id: row.get("id"),
        note_id: row.get("note_id"),
        note_title: row.get("note_title"),
        front_content: row.get("front_content"),
        back_content: row.get("back_content"),
        audio_path: row.get("audio_path"),
        created_at: row.get("created_at"),
        review_at: row.get("review_at"),
    }
}

fn not_found(id: Uuid) -> Error {
    Error::NotFound(format!("flashcard {}", id))
}

#[async_trait]
impl FlashcardRepository for PgFlashcardRepository {
    async fn list(&self, user_id: Uuid) -> Result<Vec<Flashcard>> {
        let sql = format!("{SELECT_FLASHCARD} WHERE n.user_id = $1 ORDER BY f.created_at DESC");
        let rows = sqlx::query(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await
            .map_err(Error::Database)?;
        Ok(rows.iter().map(flashcard_from_row).collect())
    }

    async fn fetch(&self, user_id: Uuid, id: Uuid) -> Result<Flashcard> {
        let sql = format!("{SELECT_FLASHCARD} WHERE f.id = $1 AND n.user_id = $2");
        let row = sqlx::query(&sql)
            .bind(id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::Database)?
            .ok_or_else(|| not_found(id))?;
        Ok(flashcard_from_row(&row))
    }

    async fn insert(&self, user_id: Uuid, req: CreateFlashcardRequest) -> Result<Flashcard> {
        let id = new_v7();
        let now = Utc::now();

        let note_title: String =
            sqlx::query_scalar("SELECT title FROM note WHERE id = $1 AND user_id = $2")
                .bind(req.note_id)
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await
                .map_err(Error::Database)?
                .ok_or_else(|| Error::NotFound(format!("note {}", req.note_id)))?;

        sqlx::query(
            "INSERT INTO flashcard (id, note_id, front_content, back_content, created_at)
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(id)
        .bind(req.note_id)
        .bind(&req.front_content)
        .bind(&req.back_content)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(Flashcard {
            id,
            note_id: req.note_id,
            note_title,
            front_content: req.front_content,
            back_content: req.back_content,
            audio_path: None,
            created_at: now,
            review_at: None,
        })
    }

    async fn update(&self, user_id: Uuid, id: Uuid, req: UpdateFlashcardRequest) -> Result<()> {
        let result = sqlx::query(
            "UPDATE flashcard f
             SET front_content = $1, back_content = $2, review_at = COALESCE($3, f.review_at)
             FROM note n
             WHERE f.id = $4 AND n.id = f.note_id AND n.user_id = $5",
        )
        .bind(&req.front_content)
        .bind(&req.back_content)
        .bind(req.review_at)
        .bind(id)
        .bind(user_id)
        .execute(&self.pool)
        .await
        .map_err(Error::Database)?;

        if result.rows_affected() == 0 {
            return Err(not_found(id));
        }
        Ok(())
    }

    async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<()> {
        let result = sqlx::query(
            "DELETE FROM flashcard f USING note n
             WHERE f.id = $1 AND n.id = f.note_id AND n.user_id = $2",
        )
        .bind(id)
        .bind(user_id)
        .execute(&self.pool)
        .await
        .map_err(Error::Database)?;

        if result.rows_affected() == 0 {
            return Err(not_found(id));
        }
        Ok(())
    }
}
