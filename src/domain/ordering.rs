use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::EngineError;
use super::task::{Task, TaskId, TaskStatus};

/// Moves the task `moved` to `target_index`, keeping everyone else in their
/// relative order. Indices past the end land on the last slot.
pub fn reorder_tasks(tasks: &[Task], moved: TaskId, target_index: usize) -> Result<Vec<Task>, EngineError> {
    let from = tasks.iter().position(|t| t.id == moved).ok_or(EngineError::NotFound(moved))?;
    let mut out = tasks.to_vec();
    let task = out.remove(from);
    let to = target_index.min(out.len());
    out.insert(to, task);
    Ok(out)
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StatusFilter {
    #[default]
    All,
    NotStarted,
    InProgress,
    Done,
}

impl StatusFilter {
    pub fn matches(self, status: TaskStatus) -> bool {
        match self {
            Self::All => true,
            Self::NotStarted => status == TaskStatus::NotStarted,
            Self::InProgress => status == TaskStatus::InProgress,
            Self::Done => status == TaskStatus::Done,
        }
    }

    pub fn next(self) -> Self {
        match self {
            Self::All => Self::NotStarted,
            Self::NotStarted => Self::InProgress,
            Self::InProgress => Self::Done,
            Self::Done => Self::All,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::All => "All",
            Self::NotStarted => "Not started",
            Self::InProgress => "In progress",
            Self::Done => "Done",
        }
    }
}

impl FromStr for StatusFilter {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(Self::All),
            other => other.parse::<TaskStatus>().map(|status| match status {
                TaskStatus::NotStarted => Self::NotStarted,
                TaskStatus::InProgress => Self::InProgress,
                TaskStatus::Done => Self::Done,
            }),
        }
    }
}

pub fn filter_tasks(tasks: &[Task], filter: StatusFilter) -> Vec<Task> {
    tasks.iter().filter(|t| filter.matches(t.status)).cloned().collect()
}

/// Full-list index of the closest task above (or below) `moved` that passes
/// `filter`. Feeding it to [`reorder_tasks`] swaps the two in the filtered view.
pub fn visible_neighbour_slot(tasks: &[Task], filter: StatusFilter, moved: TaskId, up: bool) -> Option<usize> {
    let from = tasks.iter().position(|t| t.id == moved)?;
    let visible = |&(_, t): &(usize, &Task)| filter.matches(t.status);
    if up {
        tasks[..from].iter().enumerate().rev().find(visible).map(|(i, _)| i)
    } else {
        tasks.iter().enumerate().skip(from + 1).find(visible).map(|(i, _)| i)
    }
}
