use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::EngineError;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct TaskId(pub Uuid);

impl Default for TaskId {
    fn default() -> Self { Self(Uuid::new_v4()) }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { fmt::Display::fmt(&self.0, f) }
}

impl FromStr for TaskId {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(TaskId).map_err(|_| EngineError::validation(format!("invalid task id '{s}'")))
    }
}

/// Weight coefficient of a task: 1 standard, 2 important, 3 critical.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(try_from = "u8", into = "u8")]
pub enum Importance {
    #[default]
    Standard = 1,
    Important = 2,
    Critical = 3,
}

impl Importance {
    pub fn weight(self) -> u32 { self as u32 }

    /// Cycles 1 → 2 → 3 → 1.
    pub fn next(self) -> Self {
        match self {
            Self::Standard => Self::Important,
            Self::Important => Self::Critical,
            Self::Critical => Self::Standard,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Important => "important",
            Self::Critical => "critical",
        }
    }
}

impl TryFrom<u8> for Importance {
    type Error = EngineError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Standard),
            2 => Ok(Self::Important),
            3 => Ok(Self::Critical),
            other => Err(EngineError::validation(format!("importance must be 1, 2 or 3, got {other}"))),
        }
    }
}

impl From<Importance> for u8 {
    fn from(value: Importance) -> Self { value as u8 }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    NotStarted,
    InProgress,
    Done,
}

impl TaskStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NotStarted => "not_started",
            Self::InProgress => "in_progress",
            Self::Done => "done",
        }
    }

    /// Next status when toggling from a UI: NotStarted → InProgress → Done → NotStarted.
    pub fn cycle(self) -> Self {
        match self {
            Self::NotStarted => Self::InProgress,
            Self::InProgress => Self::Done,
            Self::Done => Self::NotStarted,
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

impl FromStr for TaskStatus {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "not_started" => Ok(Self::NotStarted),
            "in_progress" => Ok(Self::InProgress),
            "done" => Ok(Self::Done),
            other => Err(EngineError::validation(format!("unknown status '{other}'"))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Task {
    pub id: TaskId,
    pub name: String,
    pub importance: Importance,
    pub status: TaskStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Creates a NotStarted task with a fresh id. The name is trimmed and must not be empty.
    pub fn new(name: &str, importance: Importance, now: DateTime<Utc>) -> Result<Self, EngineError> {
        Ok(Self {
            id: TaskId::default(),
            name: validate_name(name)?,
            importance,
            status: TaskStatus::NotStarted,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn is_done(&self) -> bool { self.status == TaskStatus::Done }
}

pub(crate) fn validate_name(name: &str) -> Result<String, EngineError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(EngineError::validation("task name must not be empty"));
    }
    Ok(name.to_string())
}

/// Returns a copy of `task` moved to `new_status`. Every transition is allowed.
pub fn transition_status(task: &Task, new_status: TaskStatus) -> Task {
    transition_status_at(task, new_status, Utc::now())
}

pub fn transition_status_at(task: &Task, new_status: TaskStatus, now: DateTime<Utc>) -> Task {
    Task { status: new_status, updated_at: now, ..task.clone() }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateTask {
    pub name: String,
    #[serde(default)]
    pub importance: Importance,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTask {
    pub name: Option<String>,
    pub importance: Option<Importance>,
    pub status: Option<TaskStatus>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(hour: u32) -> DateTime<Utc> { Utc.with_ymd_and_hms(2025, 1, 10, hour, 0, 0).unwrap() }

    #[test]
    fn new_task_defaults() {
        let task = Task::new("  Read  ", Importance::default(), at(8)).unwrap();
        assert_eq!(task.name, "Read");
        assert_eq!(task.importance, Importance::Standard);
        assert_eq!(task.status, TaskStatus::NotStarted);
        assert_eq!(task.created_at, task.updated_at);
    }

    #[test]
    fn blank_name_is_rejected() {
        let err = Task::new("   ", Importance::Standard, at(8)).unwrap_err();
        assert_eq!(err.code(), "validation_error");
    }

    #[test]
    fn importance_outside_range_is_rejected() {
        assert!(Importance::try_from(0).is_err());
        assert!(Importance::try_from(4).is_err());
        assert_eq!(Importance::try_from(3).unwrap(), Importance::Critical);
        assert!(serde_json::from_str::<Importance>("5").is_err());
        assert_eq!(serde_json::to_string(&Importance::Important).unwrap(), "2");
    }

    #[test]
    fn unknown_status_is_rejected() {
        assert!("finished".parse::<TaskStatus>().is_err());
        assert!(serde_json::from_str::<TaskStatus>("\"finished\"").is_err());
        assert_eq!("in_progress".parse::<TaskStatus>().unwrap(), TaskStatus::InProgress);
    }

    #[test]
    fn transition_leaves_input_untouched() {
        let task = Task::new("Run", Importance::Critical, at(8)).unwrap();
        let moved = transition_status_at(&task, TaskStatus::Done, at(9));
        assert_eq!(task.status, TaskStatus::NotStarted);
        assert_eq!(task.updated_at, at(8));
        assert_eq!(moved.status, TaskStatus::Done);
        assert_eq!(moved.updated_at, at(9));
        assert_eq!(moved.id, task.id);
        assert_eq!(moved.created_at, task.created_at);
    }

    #[test]
    fn any_status_can_follow_any_other() {
        let task = Task::new("Cook", Importance::Standard, at(8)).unwrap();
        let statuses = [TaskStatus::NotStarted, TaskStatus::InProgress, TaskStatus::Done];
        for from in statuses {
            let start = transition_status_at(&task, from, at(9));
            for to in statuses {
                assert_eq!(transition_status_at(&start, to, at(10)).status, to);
            }
        }
    }
}
