//! Link repository implementation.
//!
//! Links are directed note→note edges. Inline links mirror the `[[Title]]`
//! references in the source note's content and are rewritten on every save;
//! manual links are only created through the API and survive content edits.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Pool, Postgres, Row, Transaction};
use uuid::Uuid;

use zetria_core::{
    Error, LinkRepository, LinkSource, NoteLinkPair, NoteLinkRef, NoteLinks, Result,
};

/// PostgreSQL implementation of LinkRepository.
pub struct PgLinkRepository {
    pool: Pool<Postgres>,
}

impl PgLinkRepository {
    /// Create a new PgLinkRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    async fn link_refs(&self, sql: &str, user_id: Uuid, note_id: Uuid) -> Result<Vec<NoteLinkRef>> {
        let rows = sqlx::query(sql)
            .bind(note_id)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await
            .map_err(Error::Database)?;

        Ok(rows
            .into_iter()
            .map(|r| {
                let source: String = r.get("source");
                NoteLinkRef {
                    note_id: r.get("note_id"),
                    title: r.get("title"),
                    source: LinkSource::from_db(&source),
                }
            })
            .collect())
    }
}

/// Replace a note's inline links within an existing transaction.
///
/// Each target title resolves to every note of the same user with exactly
/// that title, excluding the source note. Unresolved titles are dropped. An
/// existing manual link to the same target is left as is.
pub(crate) async fn replace_inline_links_tx(
    tx: &mut Transaction<'_, Postgres>,
    user_id: Uuid,
    note_id: Uuid,
    titles: &[String],
) -> Result<()> {
    sqlx::query("DELETE FROM note_link WHERE source_note_id = $1 AND source = $2")
        .bind(note_id)
        .bind(LinkSource::Inline.as_str())
        .execute(&mut **tx)
        .await
        .map_err(Error::Database)?;

    if titles.is_empty() {
        return Ok(());
    }

    sqlx::query(
        "INSERT INTO note_link (source_note_id, target_note_id, source, created_at)
         SELECT $1, n.id, $4, $5
         FROM note n
         WHERE n.user_id = $2 AND n.title = ANY($3) AND n.id <> $1
         ON CONFLICT (source_note_id, target_note_id) DO NOTHING",
    )
    .bind(note_id)
    .bind(user_id)
    .bind(titles)
    .bind(LinkSource::Inline.as_str())
    .bind(Utc::now())
    .execute(&mut **tx)
    .await
    .map_err(Error::Database)?;

    Ok(())
}

/// Remove every link touching a note, in either direction.
pub(crate) async fn delete_for_note_tx(
    tx: &mut Transaction<'_, Postgres>,
    note_id: Uuid,
) -> Result<u64> {
    let result =
        sqlx::query("DELETE FROM note_link WHERE source_note_id = $1 OR target_note_id = $1")
            .bind(note_id)
            .execute(&mut **tx)
            .await
            .map_err(Error::Database)?;
    Ok(result.rows_affected())
}

#[async_trait]
impl LinkRepository for PgLinkRepository {
    async fn create(&self, user_id: Uuid, source_id: Uuid, target_id: Uuid) -> Result<()> {
        if source_id == target_id {
            return Err(Error::InvalidInput("a note cannot link to itself".to_string()));
        }

        let owned: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM note WHERE user_id = $1 AND id IN ($2, $3)")
                .bind(user_id)
                .bind(source_id)
                .bind(target_id)
                .fetch_one(&self.pool)
                .await
                .map_err(Error::Database)?;
        if owned != 2 {
            return Err(Error::NotFound("note".to_string()));
        }

        // An inline link to the same target is promoted so it survives edits.
        sqlx::query(
            "INSERT INTO note_link (source_note_id, target_note_id, source, created_at)
             VALUES ($1, $2, $3, $4)
             ON CONFLICT (source_note_id, target_note_id) DO UPDATE SET source = EXCLUDED.source",
        )
        .bind(source_id)
        .bind(target_id)
        .bind(LinkSource::Manual.as_str())
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(())
    }

    async fn for_note(&self, user_id: Uuid, note_id: Uuid) -> Result<NoteLinks> {
        let owned: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM note WHERE id = $1 AND user_id = $2)")
                .bind(note_id)
                .bind(user_id)
                .fetch_one(&self.pool)
                .await
                .map_err(Error::Database)?;
        if !owned {
            return Err(Error::NotFound(format!("note {}", note_id)));
        }

        let links = self
            .link_refs(
                "SELECT l.target_note_id AS note_id, n.title, l.source
                 FROM note_link l
                 JOIN note n ON n.id = l.target_note_id
                 WHERE l.source_note_id = $1 AND n.user_id = $2
                 ORDER BY n.title, l.target_note_id",
                user_id,
                note_id,
            )
            .await?;
        let backlinks = self
            .link_refs(
                "SELECT l.source_note_id AS note_id, n.title, l.source
                 FROM note_link l
                 JOIN note n ON n.id = l.source_note_id
                 WHERE l.target_note_id = $1 AND n.user_id = $2
                 ORDER BY n.title, l.source_note_id",
                user_id,
                note_id,
            )
            .await?;

        Ok(NoteLinks { links, backlinks })
    }

    async fn pairs_for_user(&self, user_id: Uuid) -> Result<Vec<NoteLinkPair>> {
        let rows = sqlx::query(
            "SELECT l.source_note_id, l.target_note_id
             FROM note_link l
             JOIN note n ON n.id = l.source_note_id
             WHERE n.user_id = $1
             ORDER BY l.source_note_id, l.target_note_id",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(rows
            .into_iter()
            .map(|r| NoteLinkPair {
                source_note_id: r.get("source_note_id"),
                target_note_id: r.get("target_note_id"),
            })
            .collect())
    }
}
