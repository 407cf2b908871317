use chrono::NaiveDate;
use thiserror::Error;

use super::task::TaskId;

/// Failures reported by the scoring engine and surfaced unchanged by the
/// layers above it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("task {0} not found")]
    NotFound(TaskId),

    #[error("a summary for {0} already exists")]
    DuplicateDate(NaiveDate),
}

impl EngineError {
    pub fn validation<M: Into<String>>(message: M) -> Self {
        Self::Validation(message.into())
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation_error",
            Self::NotFound(_) => "not_found",
            Self::DuplicateDate(_) => "duplicate_date",
        }
    }
}
