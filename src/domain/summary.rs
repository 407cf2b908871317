use std::collections::HashSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::error::EngineError;
use super::scoring::{Performance, classify_performance, compute_completion_rate, compute_score};
use super::task::Task;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Frozen record of one validated day.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DaySummary {
    pub date: NaiveDate,
    pub completion_rate: u8,
    pub score: f64,
    pub task_snapshot: Vec<Task>,
}

impl DaySummary {
    pub fn performance(&self) -> Performance { classify_performance(self.completion_rate) }
}

/// Parses a `YYYY-MM-DD` calendar date.
pub fn parse_date(input: &str) -> Result<NaiveDate, EngineError> {
    NaiveDate::parse_from_str(input, DATE_FORMAT)
        .map_err(|_| EngineError::validation(format!("'{input}' is not a valid calendar date")))
}

pub fn build_day_summary(date: &str, tasks: &[Task]) -> Result<DaySummary, EngineError> {
    summarize_day(parse_date(date)?, tasks)
}

/// Same as [`build_day_summary`] for callers holding an already parsed date.
pub fn summarize_day(date: NaiveDate, tasks: &[Task]) -> Result<DaySummary, EngineError> {
    let mut seen = HashSet::with_capacity(tasks.len());
    if let Some(dup) = tasks.iter().find(|t| !seen.insert(t.id)) {
        return Err(EngineError::validation(format!("duplicate task id {}", dup.id)));
    }
    Ok(DaySummary {
        date,
        completion_rate: compute_completion_rate(tasks),
        score: compute_score(tasks),
        task_snapshot: tasks.to_vec(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::task::{Importance, TaskStatus, transition_status};
    use chrono::Utc;

    fn task(name: &str, importance: Importance, status: TaskStatus) -> Task {
        let t = Task::new(name, importance, Utc::now()).unwrap();
        transition_status(&t, status)
    }

    #[test]
    fn invalid_dates_are_rejected() {
        for bad in ["2025-02-30", "2025-13-01", "yesterday", "", "10/01/2025", " 2025-01-10 ", "2025-01-10T00:00"] {
            let err = build_day_summary(bad, &[]).unwrap_err();
            assert!(matches!(err, EngineError::Validation(_)), "{bad} should fail");
        }
    }

    #[test]
    fn leap_day_is_accepted() {
        let summary = build_day_summary("2024-02-29", &[]).unwrap();
        assert_eq!(summary.date, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
        assert_eq!(summary.completion_rate, 0);
        assert_eq!(summary.score, 0.0);
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let a = task("A", Importance::Standard, TaskStatus::Done);
        let err = build_day_summary("2025-01-10", &[a.clone(), a]).unwrap_err();
        assert!(matches!(err, EngineError::Validation(_)));
    }

    #[test]
    fn snapshot_is_isolated_from_later_changes() {
        let mut tasks = vec![task("A", Importance::Standard, TaskStatus::NotStarted)];
        let first = build_day_summary("2025-01-10", &tasks).unwrap();
        tasks[0] = transition_status(&tasks[0], TaskStatus::Done);
        let second = build_day_summary("2025-01-10", &tasks).unwrap();

        assert_eq!(first.task_snapshot[0].status, TaskStatus::NotStarted);
        assert_eq!(second.task_snapshot[0].status, TaskStatus::Done);
        assert_ne!(first.task_snapshot, second.task_snapshot);
    }

    #[test]
    fn end_to_end_day() {
        let tasks = vec![
            task("A", Importance::Important, TaskStatus::Done),
            task("B", Importance::Standard, TaskStatus::InProgress),
        ];
        let summary = build_day_summary("2025-01-10", &tasks).unwrap();
        assert_eq!(summary.date, NaiveDate::from_ymd_opt(2025, 1, 10).unwrap());
        assert_eq!(summary.completion_rate, 50);
        assert_eq!(summary.score, 13.3);
        assert_eq!(summary.performance(), Performance::NeedsWork);
        assert_eq!(summary.task_snapshot, tasks);
    }
}
