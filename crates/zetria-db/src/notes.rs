//! Note repository implementation.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{postgres::PgRow, Pool, Postgres, Row, Transaction};
use tracing::debug;
use uuid::Uuid;

use zetria_core::{
    extract_links, extract_tags, new_v7, Error, GraphNoteRow, Note, NoteRepository, Result,
    SaveNoteRequest,
};

use crate::links::{delete_for_note_tx, replace_inline_links_tx};
use crate::tags::{fetch_tags_for_notes, replace_note_tags_tx};

/// PostgreSQL implementation of NoteRepository.
pub struct PgNoteRepository {
    pool: Pool<Postgres>,
}

fn note_from_row(row: &PgRow) -> Note {
    Note {
        id: row.get("id"),
        title: row.get("title"),
        content: row.get("content"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
        tags: Vec::new(),
    }
}

impl PgNoteRepository {
    /// Create a new PgNoteRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Derive tags and inline links from the content and store them.
    async fn sync_derived_tx(
        tx: &mut Transaction<'_, Postgres>,
        user_id: Uuid,
        note_id: Uuid,
        content: &str,
    ) -> Result<Vec<String>> {
        let tags = extract_tags(content);
        let titles = extract_links(content);

        replace_note_tags_tx(tx, note_id, &tags).await?;
        replace_inline_links_tx(tx, user_id, note_id, &titles).await?;

        debug!(
            subsystem = "db",
            component = "notes",
            note_id = %note_id,
            tag_count = tags.len(),
            link_count = titles.len(),
            "Synced derived tags and links"
        );
        Ok(tags)
    }
}

// =============================================================================
// TRANSACTION-AWARE VARIANTS
// =============================================================================

impl PgNoteRepository {
    /// Insert a note with its tags and inline links within an existing transaction.
    pub async fn insert_tx(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user_id: Uuid,
        req: SaveNoteRequest,
    ) -> Result<Note> {
        let id = new_v7();
        let now = Utc::now();

        sqlx::query(
            "INSERT INTO note (id, user_id, title, content, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $5)",
        )
        .bind(id)
        .bind(user_id)
        .bind(&req.title)
        .bind(&req.content)
        .bind(now)
        .execute(&mut **tx)
        .await
        .map_err(Error::Database)?;

        let tags = Self::sync_derived_tx(tx, user_id, id, &req.content).await?;

        Ok(Note {
            id,
            title: req.title,
            content: req.content,
            created_at: now,
            updated_at: now,
            tags,
        })
    }

    /// Update a note and fully replace its tags and inline links within an
    /// existing transaction.
    pub async fn update_tx(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user_id: Uuid,
        id: Uuid,
        req: SaveNoteRequest,
    ) -> Result<()> {
        let result = sqlx::query(
            "UPDATE note SET title = $1, content = $2, updated_at = $3
             WHERE id = $4 AND user_id = $5",
        )
        .bind(&req.title)
        .bind(&req.content)
        .bind(Utc::now())
        .bind(id)
        .bind(user_id)
        .execute(&mut **tx)
        .await
        .map_err(Error::Database)?;

        if result.rows_affected() == 0 {
            return Err(Error::NotFound(format!("note {}", id)));
        }

        Self::sync_derived_tx(tx, user_id, id, &req.content).await?;
        Ok(())
    }

    /// Delete a note and everything that references it within an existing
    /// transaction.
    pub async fn delete_tx(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user_id: Uuid,
        id: Uuid,
    ) -> Result<()> {
        let owned = sqlx::query("SELECT id FROM note WHERE id = $1 AND user_id = $2 FOR UPDATE")
            .bind(id)
            .bind(user_id)
            .fetch_optional(&mut **tx)
            .await
            .map_err(Error::Database)?;
        if owned.is_none() {
            return Err(Error::NotFound(format!("note {}", id)));
        }

        sqlx::query("DELETE FROM note_tag WHERE note_id = $1")
            .bind(id)
            .execute(&mut **tx)
            .await
            .map_err(Error::Database)?;

        let links_removed = delete_for_note_tx(tx, id).await?;

        let cards_removed = sqlx::query("DELETE FROM flashcard WHERE note_id = $1")
            .bind(id)
            .execute(&mut **tx)
            .await
            .map_err(Error::Database)?
            .rows_affected();

        sqlx::query("DELETE FROM note WHERE id = $1")
            .bind(id)
            .execute(&mut **tx)
            .await
            .map_err(Error::Database)?;

        debug!(
            subsystem = "db",
            component = "notes",
            note_id = %id,
            links_removed,
            cards_removed,
            "Deleted note"
        );
        Ok(())
    }
}

#[async_trait]
impl NoteRepository for PgNoteRepository {
    async fn list(&self, user_id: Uuid) -> Result<Vec<Note>> {
        let rows = sqlx::query(
            "SELECT id, title, content, created_at, updated_at
             FROM note WHERE user_id = $1
             ORDER BY updated_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        let mut notes: Vec<Note> = rows.iter().map(note_from_row).collect();
        let ids: Vec<Uuid> = notes.iter().map(|n| n.id).collect();
        let mut tags = fetch_tags_for_notes(&self.pool, &ids).await?;
        for note in &mut notes {
            note.tags = tags.remove(&note.id).unwrap_or_default();
        }
        Ok(notes)
    }

    async fn fetch(&self, user_id: Uuid, id: Uuid) -> Result<Note> {
        let row = sqlx::query(
            "SELECT id, title, content, created_at, updated_at
             FROM note WHERE id = $1 AND user_id = $2",
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?
        .ok_or_else(|| Error::NotFound(format!("note {}", id)))?;

        let mut note = note_from_row(&row);
        note.tags = fetch_tags_for_notes(&self.pool, &[id])
            .await?
            .remove(&id)
            .unwrap_or_default();
        Ok(note)
    }

    async fn insert(&self, user_id: Uuid, req: SaveNoteRequest) -> Result<Note> {
        let mut tx = self.pool.begin().await.map_err(Error::Database)?;
        let note = self.insert_tx(&mut tx, user_id, req).await?;
        tx.commit().await.map_err(Error::Database)?;
        Ok(note)
    }

    async fn update(&self, user_id: Uuid, id: Uuid, req: SaveNoteRequest) -> Result<()> {
        let mut tx = self.pool.begin().await.map_err(Error::Database)?;
        self.update_tx(&mut tx, user_id, id, req).await?;
        tx.commit().await.map_err(Error::Database)?;
        Ok(())
    }

    async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<()> {
        let mut tx = self.pool.begin().await.map_err(Error::Database)?;
        self.delete_tx(&mut tx, user_id, id).await?;
        tx.commit().await.map_err(Error::Database)?;
        Ok(())
    }

    async fn exists(&self, user_id: Uuid, id: Uuid) -> Result<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM note WHERE id = $1 AND user_id = $2)")
                .bind(id)
                .bind(user_id)
                .fetch_one(&self.pool)
                .await
                .map_err(Error::Database)?;
        Ok(exists)
    }

    async fn graph_rows(&self, user_id: Uuid) -> Result<Vec<GraphNoteRow>> {
        let rows = sqlx::query(
            "SELECT id, title, content, created_at FROM note
             WHERE user_id = $1
             ORDER BY created_at",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(rows
            .into_iter()
            .map(|r| GraphNoteRow {
                id: r.get("id"),
                title: r.get("title"),
                content: r.get("content"),
                created_at: r.get("created_at"),
            })
            .collect())
    }
}
