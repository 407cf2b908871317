use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use serde::Serialize;

use super::advisor::Advisor;
use crate::domain::error::EngineError;
use crate::domain::history::{ChartPoint, HistoryStats, chart_series, history_stats};
use crate::domain::repository::{HistoryRepository, TaskRepository};
use crate::domain::scoring::{Performance, classify_performance, compute_completion_rate, compute_score};
use crate::domain::summary::{DaySummary, parse_date, summarize_day};

/// Live metrics for the task list as it currently stands.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DayReport {
    pub task_count: usize,
    pub completion_rate: u8,
    pub score: f64,
    pub performance: Performance,
    pub advice: &'static str,
    pub quote: &'static str,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct HistoryReport {
    pub stats: HistoryStats,
    pub series: Vec<ChartPoint>,
}

#[async_trait]
pub trait DayService: Send + Sync + 'static {
    async fn today(&self) -> Result<DayReport>;
    /// Freezes the current task list as the summary for `date`.
    async fn finalize(&self, date: &str) -> Result<DaySummary>;
    async fn history(&self) -> Result<Vec<DaySummary>>;
    async fn stats(&self) -> Result<HistoryReport>;
    async fn delete(&self, date: &str) -> Result<bool>;
}

#[derive(Clone)]
pub struct DayServiceImpl<T: TaskRepository, H: HistoryRepository> {
    tasks: T,
    history: H,
    advisor: Arc<Advisor>,
}

impl<T: TaskRepository, H: HistoryRepository> DayServiceImpl<T, H> {
    pub fn new(tasks: T, history: H, advisor: Arc<Advisor>) -> Self { Self { tasks, history, advisor } }
}

#[async_trait]
impl<T: TaskRepository, H: HistoryRepository> DayService for DayServiceImpl<T, H> {
    async fn today(&self) -> Result<DayReport> {
        let tasks = self.tasks.list().await?;
        let completion_rate = compute_completion_rate(&tasks);
        let performance = classify_performance(completion_rate);
        let (advice, quote) = self.advisor.pick(performance);
        Ok(DayReport {
            task_count: tasks.len(),
            completion_rate,
            score: compute_score(&tasks),
            performance,
            advice,
            quote,
        })
    }

    async fn finalize(&self, date: &str) -> Result<DaySummary> {
        let date = parse_date(date)?;
        let tasks = self.tasks.list().await?;
        let summary = summarize_day(date, &tasks)?;
        if let Err(err) = self.history.append_summary(&summary).await {
            if let Some(EngineError::DuplicateDate(date)) = err.downcast_ref::<EngineError>() {
                tracing::warn!(%date, "day already validated");
            }
            return Err(err);
        }
        tracing::info!(%date, rate = summary.completion_rate, score = summary.score, "day validated");
        Ok(summary)
    }

    async fn history(&self) -> Result<Vec<DaySummary>> { self.history.load_history().await }

    async fn stats(&self) -> Result<HistoryReport> {
        let history = self.history.load_history().await?;
        Ok(HistoryReport { stats: history_stats(&history), series: chart_series(&history) })
    }

    async fn delete(&self, date: &str) -> Result<bool> {
        let date = parse_date(date)?;
        let deleted = self.history.delete_summary(date).await?;
        if deleted {
            tracing::info!(%date, "summary deleted");
        }
        Ok(deleted)
    }
}
