//! Task repository implementation.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use sqlx::{postgres::PgRow, Pool, Postgres, Row};
use uuid::Uuid;

use zetria_core::{new_v7, Error, Result, SaveTaskRequest, Task, TaskRepository};

const TASK_COLUMNS: &str =
    "id, title, description, due_date, recurring, recurrence_rule, completed, created_at";

/// PostgreSQL implementation of TaskRepository.
pub struct PgTaskRepository {
    pool: Pool<Postgres>,
}

impl PgTaskRepository {
    /// Create a new PgTaskRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

fn task_from_row(row: &PgRow) -> Task {
    Task {
        id: row.get("id"),
        title: row.get("title"),
        description: row.get("description"),
        due_date: row.get("due_date"),
        recurring: row.get("recurring"),
        recurrence_rule: row.get("recurrence_rule"),
        completed: row.get("completed"),
        created_at: row.get("created_at"),
    }
}

/// Half-open UTC interval `[start, end)` covering one calendar day.
///
/// Fails for the last day chrono can represent, which has no successor.
pub fn day_bounds(date: NaiveDate) -> Result<(DateTime<Utc>, DateTime<Utc>)> {
    let next = date
        .succ_opt()
        .ok_or_else(|| Error::InvalidInput(format!("date {} has no following day", date)))?;
    Ok((
        date.and_time(NaiveTime::MIN).and_utc(),
        next.and_time(NaiveTime::MIN).and_utc(),
    ))
}

fn not_found(id: Uuid) -> Error {
    Error::NotFound(format!("task {}", id))
}

#[async_trait]
impl TaskRepository for PgTaskRepository {
    async fn list(&self, user_id: Uuid) -> Result<Vec<Task>> {
        let sql = format!(
            "SELECT {TASK_COLUMNS} FROM task WHERE user_id = $1
             ORDER BY due_date ASC NULLS FIRST, created_at DESC"
        );
        let rows = sqlx::query(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await
            .map_err(Error::Database)?;
        Ok(rows.iter().map(task_from_row).collect())
    }

    async fn list_for_date(&self, user_id: Uuid, date: NaiveDate) -> Result<Vec<Task>> {
        let (start, end) = day_bounds(date)?;
        let sql = format!(
            "SELECT {TASK_COLUMNS} FROM task
             WHERE user_id = $1 AND due_date >= $2 AND due_date < $3
             ORDER BY due_date ASC, created_at DESC"
        );
        let rows = sqlx::query(&sql)
            .bind(user_id)
            .bind(start)
            .bind(end)
            .fetch_all(&self.pool)
            .await
            .map_err(Error::Database)?;
        Ok(rows.iter().map(task_from_row).collect())
    }

    async fn insert(&self, user_id: Uuid, req: SaveTaskRequest) -> Result<Task> {
        let id = new_v7();
        let now = Utc::now();

        sqlx::query(
            "INSERT INTO task (id, user_id, title, description, due_date, recurring,
                               recurrence_rule, completed, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, FALSE, $8)",
        )
        .bind(id)
        .bind(user_id)
        .bind(&req.title)
        .bind(&req.description)
        .bind(req.due_date)
        .bind(req.recurring)
        .bind(&req.recurrence_rule)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(Task {
            id,
            title: req.title,
            description: req.description,
            due_date: req.due_date,
            recurring: req.recurring,
            recurrence_rule: req.recurrence_rule,
            completed: false,
            created_at: now,
        })
    }

    async fn update(&self, user_id: Uuid, id: Uuid, req: SaveTaskRequest) -> Result<()> {
        let result = sqlx::query(
            "UPDATE task
             SET title = $1, description = $2, due_date = $3, completed = $4,
                 recurring = $5, recurrence_rule = $6
             WHERE id = $7 AND user_id = $8",
        )
        .bind(&req.title)
        .bind(&req.description)
        .bind(req.due_date)
        .bind(req.completed)
        .bind(req.recurring)
        .bind(&req.recurrence_rule)
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
        let result = sqlx::query("DELETE FROM task WHERE id = $1 AND user_id = $2")
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_day_bounds_cover_one_utc_day() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 14).unwrap();
        let (start, end) = day_bounds(date).unwrap();
        assert_eq!(start.to_rfc3339(), "2026-03-14T00:00:00+00:00");
        assert_eq!(end.to_rfc3339(), "2026-03-15T00:00:00+00:00");
    }

    #[test]
    fn test_day_bounds_month_rollover() {
        let date = NaiveDate::from_ymd_opt(2026, 2, 28).unwrap();
        let (_, end) = day_bounds(date).unwrap();
        assert_eq!(end.date_naive(), NaiveDate::from_ymd_opt(2026, 3, 1).unwrap());
    }

    #[test]
    fn test_day_bounds_last_representable_day_is_an_error() {
        assert!(matches!(day_bounds(NaiveDate::MAX), Err(Error::InvalidInput(_))));

        // Extended years parse with %Y; bounds must not overflow on them.
        let date = NaiveDate::parse_from_str("+262142-12-31", "%Y-%m-%d").unwrap();
        let _ = day_bounds(date);
    }
}
