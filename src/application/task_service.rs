use crate::domain::ordering::{StatusFilter, filter_tasks, reorder_tasks};
use crate::domain::repository::TaskRepository;
use crate::domain::task::{CreateTask, Task, TaskId, TaskStatus, UpdateTask, transition_status, validate_name};
use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;

#[async_trait]
pub trait TaskService: Send + Sync + 'static {
    async fn create(&self, input: CreateTask) -> Result<Task>;
    async fn get(&self, id: TaskId) -> Result<Option<Task>>;
    async fn list(&self, filter: StatusFilter) -> Result<Vec<Task>>;
    async fn update(&self, id: TaskId, input: UpdateTask) -> Result<Option<Task>>;
    async fn set_status(&self, id: TaskId, status: TaskStatus) -> Result<Option<Task>>;
    /// Moves a task and returns the full list in its new order.
    async fn move_to(&self, id: TaskId, index: usize) -> Result<Vec<Task>>;
    async fn delete(&self, id: TaskId) -> Result<bool>;
}

#[derive(Clone)]
pub struct TaskServiceImpl<R: TaskRepository> {
    repo: R,
}

impl<R: TaskRepository> TaskServiceImpl<R> {
    pub fn new(repo: R) -> Self { Self { repo } }
}

#[async_trait]
impl<R: TaskRepository> TaskService for TaskServiceImpl<R> {
    async fn create(&self, input: CreateTask) -> Result<Task> {
        let task = Task::new(&input.name, input.importance, Utc::now())?;
        tracing::debug!(id = %task.id, name = %task.name, "creating task");
        self.repo.insert(task).await
    }

    async fn get(&self, id: TaskId) -> Result<Option<Task>> { self.repo.get(id).await }

    async fn list(&self, filter: StatusFilter) -> Result<Vec<Task>> {
        let tasks = self.repo.list().await?;
        Ok(filter_tasks(&tasks, filter))
    }

    async fn update(&self, id: TaskId, input: UpdateTask) -> Result<Option<Task>> {
        let Some(mut task) = self.repo.get(id).await? else { return Ok(None) };
        if let Some(name) = input.name { task.name = validate_name(&name)?; }
        if let Some(importance) = input.importance { task.importance = importance; }
        let task = match input.status {
            Some(status) => transition_status(&task, status),
            None => Task { updated_at: Utc::now(), ..task },
        };
        Ok(self.repo.save(&task).await?.then_some(task))
    }

    async fn set_status(&self, id: TaskId, status: TaskStatus) -> Result<Option<Task>> {
        let Some(task) = self.repo.get(id).await? else { return Ok(None) };
        let task = transition_status(&task, status);
        tracing::debug!(%id, %status, "status changed");
        Ok(self.repo.save(&task).await?.then_some(task))
    }

    async fn move_to(&self, id: TaskId, index: usize) -> Result<Vec<Task>> {
        let tasks = self.repo.list().await?;
        let ordered = reorder_tasks(&tasks, id, index)?;
        let ids: Vec<TaskId> = ordered.iter().map(|t| t.id).collect();
        self.repo.save_order(&ids).await?;
        Ok(ordered)
    }

    async fn delete(&self, id: TaskId) -> Result<bool> {
        let deleted = self.repo.delete(id).await?;
        if !deleted {
            tracing::debug!(%id, "delete of unknown task");
        }
        Ok(deleted)
    }
}

