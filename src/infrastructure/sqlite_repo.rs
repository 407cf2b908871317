use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{sqlite::{SqlitePoolOptions, SqliteRow}, Pool, Row, Sqlite};

use crate::domain::{
    error::EngineError,
    repository::{HistoryRepository, TaskRepository},
    summary::{DATE_FORMAT, DaySummary},
    task::{Importance, Task, TaskId, TaskStatus},
};

/// SQLite-backed store for both the current task list and the history.
#[derive(Clone)]
pub struct SqliteStore {
    pool: Arc<Pool<Sqlite>>,
}

impl SqliteStore {
    pub async fn connect(database_url: &str) -> Result<Self> {
        // every in-memory connection is its own database, so keep exactly one alive
        let in_memory = database_url.starts_with("sqlite::memory:");
        let mut options = SqlitePoolOptions::new().max_connections(if in_memory { 1 } else { 5 });
        if in_memory {
            options = options.idle_timeout(None).max_lifetime(None);
        }
        let pool = options
            .connect(database_url)
            .await
            .with_context(|| format!("opening {database_url}"))?;
        tracing::debug!(%database_url, "sqlite pool ready");
        Ok(Self { pool: Arc::new(pool) })
    }

    /// Creates both tables.
    pub async fn init_all(&self) -> Result<()> {
        TaskRepository::init(self).await?;
        HistoryRepository::init(self).await
    }
}

#[async_trait]
impl TaskRepository for SqliteStore {
    async fn init(&self) -> Result<()> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS tasks (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                importance INTEGER NOT NULL CHECK (importance BETWEEN 1 AND 3),
                status TEXT NOT NULL,
                position INTEGER NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )",
        )
        .execute(&*self.pool)
        .await?;
        Ok(())
    }

    async fn insert(&self, task: Task) -> Result<Task> {
        sqlx::query(
            "INSERT INTO tasks (id, name, importance, status, position, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, (SELECT COALESCE(MAX(position), -1) + 1 FROM tasks), ?5, ?6)",
        )
        .bind(task.id.0.to_string())
        .bind(&task.name)
        .bind(i64::from(u8::from(task.importance)))
        .bind(task.status.as_str())
        .bind(task.created_at.to_rfc3339())
        .bind(task.updated_at.to_rfc3339())
        .execute(&*self.pool)
        .await?;
        Ok(task)
    }

    async fn get(&self, id: TaskId) -> Result<Option<Task>> {
        let row = sqlx::query("SELECT id, name, importance, status, created_at, updated_at FROM tasks WHERE id = ?1")
            .bind(id.0.to_string())
            .fetch_optional(&*self.pool)
            .await?;
        row.as_ref().map(row_to_task).transpose()
    }

    async fn list(&self) -> Result<Vec<Task>> {
        let rows = sqlx::query("SELECT id, name, importance, status, created_at, updated_at FROM tasks ORDER BY position ASC, created_at ASC")
            .fetch_all(&*self.pool)
            .await?;
        rows.iter().map(row_to_task).collect()
    }

    async fn save(&self, task: &Task) -> Result<bool> {
        let result = sqlx::query("UPDATE tasks SET name = ?2, importance = ?3, status = ?4, updated_at = ?5 WHERE id = ?1")
            .bind(task.id.0.to_string())
            .bind(&task.name)
            .bind(i64::from(u8::from(task.importance)))
            .bind(task.status.as_str())
            .bind(task.updated_at.to_rfc3339())
            .execute(&*self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: TaskId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = ?1")
            .bind(id.0.to_string())
            .execute(&*self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn save_order(&self, ids: &[TaskId]) -> Result<()> {
        let mut tx = self.pool.begin().await?;
        for (position, id) in ids.iter().enumerate() {
            sqlx::query("UPDATE tasks SET position = ?2 WHERE id = ?1")
                .bind(id.0.to_string())
                .bind(position as i64)
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;
        Ok(())
    }
}

#[async_trait]
impl HistoryRepository for SqliteStore {
    async fn init(&self) -> Result<()> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS history (
                date TEXT PRIMARY KEY,
                completion_rate INTEGER NOT NULL,
                score REAL NOT NULL,
                task_snapshot TEXT NOT NULL,
                created_at TEXT NOT NULL
            )",
        )
        .execute(&*self.pool)
        .await?;
        Ok(())
    }

    async fn load_history(&self) -> Result<Vec<DaySummary>> {
        let rows = sqlx::query("SELECT date, completion_rate, score, task_snapshot FROM history ORDER BY date ASC")
            .fetch_all(&*self.pool)
            .await?;
        rows.iter().map(row_to_summary).collect()
    }

    async fn append_summary(&self, summary: &DaySummary) -> Result<()> {
        let snapshot = serde_json::to_string(&summary.task_snapshot)?;
        let result = sqlx::query(
            "INSERT INTO history (date, completion_rate, score, task_snapshot, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )
        .bind(summary.date.format(DATE_FORMAT).to_string())
        .bind(i64::from(summary.completion_rate))
        .bind(summary.score)
        .bind(snapshot)
        .bind(Utc::now().to_rfc3339())
        .execute(&*self.pool)
        .await;
        match result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(db)) if is_unique_violation(db.as_ref()) => Err(EngineError::DuplicateDate(summary.date).into()),
            Err(e) => Err(e.into()),
        }
    }

    async fn delete_summary(&self, date: NaiveDate) -> Result<bool> {
        let result = sqlx::query("DELETE FROM history WHERE date = ?1")
            .bind(date.format(DATE_FORMAT).to_string())
            .execute(&*self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

fn is_unique_violation(err: &dyn sqlx::error::DatabaseError) -> bool {
    err.is_unique_violation() || err.message().contains("UNIQUE constraint failed")
}

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>> {
    Ok(DateTime::parse_from_rfc3339(value)
        .with_context(|| format!("bad timestamp '{value}'"))?
        .with_timezone(&Utc))
}

fn row_to_task(row: &SqliteRow) -> Result<Task> {
    let id_str: String = row.try_get("id")?;
    let importance: i64 = row.try_get("importance")?;
    let status_str: String = row.try_get("status")?;
    let created_at_str: String = row.try_get("created_at")?;
    let updated_at_str: String = row.try_get("updated_at")?;

    let importance = u8::try_from(importance)
        .map_err(|_| EngineError::validation(format!("importance {importance} out of range")))?;

    Ok(Task {
        id: id_str.parse::<TaskId>()?,
        name: row.try_get("name")?,
        importance: Importance::try_from(importance)?,
        status: status_str.parse::<TaskStatus>()?,
        created_at: parse_timestamp(&created_at_str)?,
        updated_at: parse_timestamp(&updated_at_str)?,
    })
}

fn row_to_summary(row: &SqliteRow) -> Result<DaySummary> {
    let date_str: String = row.try_get("date")?;
    let rate: i64 = row.try_get("completion_rate")?;
    let snapshot: String = row.try_get("task_snapshot")?;

    Ok(DaySummary {
        date: NaiveDate::parse_from_str(&date_str, DATE_FORMAT).with_context(|| format!("bad date '{date_str}'"))?,
        completion_rate: u8::try_from(rate).with_context(|| format!("bad completion rate {rate}"))?,
        score: row.try_get("score")?,
        task_snapshot: serde_json::from_str(&snapshot).context("decoding task snapshot")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn store() -> SqliteStore {
        let store = SqliteStore::connect("sqlite::memory:").await.unwrap();
        store.init_all().await.unwrap();
        store
    }

    fn task(name: &str) -> Task { Task::new(name, Importance::Important, Utc::now()).unwrap() }

    #[tokio::test]
    async fn tasks_round_trip_in_insert_order() {
        let store = store().await;
        let a = store.insert(task("a")).await.unwrap();
        let b = store.insert(task("b")).await.unwrap();

        let listed = store.list().await.unwrap();
        assert_eq!(listed.iter().map(|t| t.id).collect::<Vec<_>>(), [a.id, b.id]);
        assert_eq!(listed[0].importance, Importance::Important);

        store.save_order(&[b.id, a.id]).await.unwrap();
        let listed = store.list().await.unwrap();
        assert_eq!(listed[0].id, b.id);
    }

    #[tokio::test]
    async fn duplicate_date_is_reported() {
        let store = store().await;
        let summary = crate::domain::summary::build_day_summary("2025-01-10", &[task("a")]).unwrap();
        store.append_summary(&summary).await.unwrap();
        let err = store.append_summary(&summary).await.unwrap_err();
        assert_eq!(err.downcast_ref::<EngineError>(), Some(&EngineError::DuplicateDate(summary.date)));

        let history = store.load_history().await.unwrap();
        assert_eq!(history, vec![summary]);
    }
}
