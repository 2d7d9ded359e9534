//! Tag repository implementation.
//!
//! Tags are global rows deduplicated by their case-sensitive name; notes refer
//! to them through `note_tag`. The `_tx` helpers let note writes replace tag
//! associations inside the note's own transaction.

use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::{Pool, Postgres, Row, Transaction};
use uuid::Uuid;

use zetria_core::{new_v7, Error, NoteTagPair, Result, TagRepository, TagUsage};

/// PostgreSQL implementation of TagRepository.
pub struct PgTagRepository {
    pool: Pool<Postgres>,
}

impl PgTagRepository {
    /// Create a new PgTagRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

pub(crate) async fn fetch_tags_for_notes(
    pool: &Pool<Postgres>,
    note_ids: &[Uuid],
) -> Result<HashMap<Uuid, Vec<String>>> {
    if note_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let rows = sqlx::query(
        "SELECT nt.note_id, t.name
         FROM note_tag nt
         JOIN tag t ON t.id = nt.tag_id
         WHERE nt.note_id = ANY($1)
         ORDER BY nt.note_id, t.name",
    )
    .bind(note_ids)
    .fetch_all(pool)
    .await
    .map_err(Error::Database)?;

    let mut by_note: HashMap<Uuid, Vec<String>> = HashMap::new();
    for row in rows {
        by_note
            .entry(row.get("note_id"))
            .or_default()
            .push(row.get("name"));
    }
    Ok(by_note)
}

/// Replace every tag association of a note within an existing transaction.
///
/// Missing tag rows are inserted first (`ON CONFLICT (name) DO NOTHING`), so
/// concurrent writers converge on a single row per name.
pub(crate) async fn replace_note_tags_tx(
    tx: &mut Transaction<'_, Postgres>,
    note_id: Uuid,
    tags: &[String],
) -> Result<()> {
    sqlx::query("DELETE FROM note_tag WHERE note_id = $1")
        .bind(note_id)
        .execute(&mut **tx)
        .await
        .map_err(Error::Database)?;

    if tags.is_empty() {
        return Ok(());
    }

    let ids: Vec<Uuid> = tags.iter().map(|_| new_v7()).collect();
    sqlx::query(
        "INSERT INTO tag (id, name)
         SELECT * FROM UNNEST($1::uuid[], $2::text[])
         ON CONFLICT (name) DO NOTHING",
    )
    .bind(&ids)
    .bind(tags)
    .execute(&mut **tx)
    .await
    .map_err(Error::Database)?;

    sqlx::query(
        "INSERT INTO note_tag (note_id, tag_id)
         SELECT $1, id FROM tag WHERE name = ANY($2)
         ON CONFLICT DO NOTHING",
    )
    .bind(note_id)
    .bind(tags)
    .execute(&mut **tx)
    .await
    .map_err(Error::Database)?;

    Ok(())
}

#[async_trait]
impl TagRepository for PgTagRepository {
    async fn get_for_note(&self, note_id: Uuid) -> Result<Vec<String>> {
        let rows = sqlx::query(
            "SELECT t.name FROM note_tag nt
             JOIN tag t ON t.id = nt.tag_id
             WHERE nt.note_id = $1
             ORDER BY t.name",
        )
        .bind(note_id)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(rows.into_iter().map(|r| r.get("name")).collect())
    }

    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<TagUsage>> {
        let rows = sqlx::query(
            "SELECT t.id, t.name, COUNT(nt.note_id) AS usage_count
             FROM tag t
             JOIN note_tag nt ON nt.tag_id = t.id
             JOIN note n ON n.id = nt.note_id
             WHERE n.user_id = $1
             GROUP BY t.id, t.name
             ORDER BY t.name",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(rows
            .into_iter()
            .map(|r| TagUsage {
                id: r.get("id"),
                name: r.get("name"),
                usage_count: r.get("usage_count"),
            })
            .collect())
    }

    async fn pairs_for_user(&self, user_id: Uuid) -> Result<Vec<NoteTagPair>> {
        let rows = sqlx::query(
            "SELECT nt.note_id, nt.tag_id
             FROM note_tag nt
             JOIN note n ON n.id = nt.note_id
             WHERE n.user_id = $1
             ORDER BY nt.note_id, nt.tag_id",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(rows
            .into_iter()
            .map(|r| NoteTagPair {
                note_id: r.get("note_id"),
                tag_id: r.get("tag_id"),
            })
            .collect())
    }
}
