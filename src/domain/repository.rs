use async_trait::async_trait;
use chrono::NaiveDate;

use super::summary::DaySummary;
use super::task::{Task, TaskId};

/// Current day's task list, kept in display order.
#[async_trait]
pub trait TaskRepository: Send + Sync + 'static {
    async fn init(&self) -> anyhow::Result<()>;
    /// Appends at the end of the list.
    async fn insert(&self, task: Task) -> anyhow::Result<Task>;
    async fn get(&self, id: TaskId) -> anyhow::Result<Option<Task>>;
    async fn list(&self) -> anyhow::Result<Vec<Task>>;
    async fn save(&self, task: &Task) -> anyhow::Result<bool>;
    async fn delete(&self, id: TaskId) -> anyhow::Result<bool>;
    async fn save_order(&self, ids: &[TaskId]) -> anyhow::Result<()>;
}

/// Append-only store of validated days. `append_summary` must fail with
/// `EngineError::DuplicateDate` when the date is already present.
#[async_trait]
pub trait HistoryRepository: Send + Sync + 'static {
    async fn init(&self) -> anyhow::Result<()>;
    /// Sorted by date, oldest first.
    async fn load_history(&self) -> anyhow::Result<Vec<DaySummary>>;
    async fn append_summary(&self, summary: &DaySummary) -> anyhow::Result<()>;
    async fn delete_summary(&self, date: NaiveDate) -> anyhow::Result<bool>;
}
