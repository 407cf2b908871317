//! Completion metrics for a day's task list.
//!
//! All arithmetic is done on integers and rounded half-up, so the same list
//! always yields the same rate and score regardless of float quirks.

use serde::{Deserialize, Serialize};

use super::task::Task;

pub const MAX_SCORE: f64 = 20.0;

pub const EXCELLENT_THRESHOLD: u8 = 85;
pub const GOOD_THRESHOLD: u8 = 60;

/// Performance band selected from a completion rate.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Performance {
    Excellent,
    Good,
    NeedsWork,
}

impl Performance {
    pub fn label(self) -> &'static str {
        match self {
            Self::Excellent => "Excellent",
            Self::Good => "Good",
            Self::NeedsWork => "Needs work",
        }
    }

    /// Good or better.
    pub fn is_passing(self) -> bool { !matches!(self, Self::NeedsWork) }
}

/// Percentage of Done tasks, 0 for an empty list.
pub fn compute_completion_rate(tasks: &[Task]) -> u8 {
    let total = tasks.len() as u64;
    if total == 0 {
        return 0;
    }
    let done = tasks.iter().filter(|t| t.is_done()).count() as u64;
    // round(100 * done / total), half-up
    ((200 * done + total) / (2 * total)) as u8
}

/// Importance-weighted completion on a 0-20 scale, one decimal.
pub fn compute_score(tasks: &[Task]) -> f64 {
    let total: u64 = tasks.iter().map(|t| u64::from(t.importance.weight())).sum();
    if total == 0 {
        return 0.0;
    }
    let done: u64 = tasks.iter().filter(|t| t.is_done()).map(|t| u64::from(t.importance.weight())).sum();
    // score in tenths: round(200 * done / total), half-up
    let tenths = (400 * done + total) / (2 * total);
    tenths as f64 / 10.0
}

pub fn classify_performance(completion_rate: u8) -> Performance {
    if completion_rate >= EXCELLENT_THRESHOLD {
        Performance::Excellent
    } else if completion_rate >= GOOD_THRESHOLD {
        Performance::Good
    } else {
        Performance::NeedsWork
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::task::{Importance, TaskStatus};
    use chrono::Utc;
    use proptest::prelude::*;

    fn task(importance: u8, status: TaskStatus) -> Task {
        let mut t = Task::new("t", Importance::try_from(importance).unwrap(), Utc::now()).unwrap();
        t.status = status;
        t
    }

    #[test]
    fn empty_list_scores_zero() {
        assert_eq!(compute_completion_rate(&[]), 0);
        assert_eq!(compute_score(&[]), 0.0);
    }

    #[test]
    fn all_done_is_full_marks() {
        let tasks = vec![task(1, TaskStatus::Done), task(3, TaskStatus::Done), task(2, TaskStatus::Done)];
        assert_eq!(compute_completion_rate(&tasks), 100);
        assert_eq!(compute_score(&tasks), 20.0);
    }

    #[test]
    fn critical_task_outweighs_standard_ones() {
        let tasks = vec![task(3, TaskStatus::Done), task(1, TaskStatus::NotStarted)];
        assert_eq!(compute_score(&tasks), 15.0);
        assert_eq!(compute_completion_rate(&tasks), 50);
    }

    #[test]
    fn rate_rounds_half_up() {
        // 1 of 8 = 12.5%
        let mut tasks = vec![task(1, TaskStatus::Done)];
        tasks.extend((0..7).map(|_| task(1, TaskStatus::InProgress)));
        assert_eq!(compute_completion_rate(&tasks), 13);

        // 2 of 3 = 66.67%
        let tasks = vec![task(1, TaskStatus::Done), task(1, TaskStatus::Done), task(1, TaskStatus::NotStarted)];
        assert_eq!(compute_completion_rate(&tasks), 67);
    }

    #[test]
    fn score_rounds_to_one_decimal() {
        let tasks = vec![task(2, TaskStatus::Done), task(1, TaskStatus::InProgress)];
        assert_eq!(compute_score(&tasks), 13.3);

        let tasks = vec![task(1, TaskStatus::Done), task(2, TaskStatus::NotStarted)];
        assert_eq!(compute_score(&tasks), 6.7);
    }

    #[test]
    fn score_tie_rounds_half_up() {
        // 1 of 16 weight = 12.5 tenths
        let mut tasks = vec![task(1, TaskStatus::Done)];
        tasks.extend((0..5).map(|_| task(3, TaskStatus::NotStarted)));
        assert_eq!(compute_score(&tasks), 1.3);
    }

    #[test]
    fn performance_band_boundaries() {
        assert_eq!(classify_performance(86), Performance::Excellent);
        assert_eq!(classify_performance(85), Performance::Excellent);
        assert_eq!(classify_performance(84), Performance::Good);
        assert_eq!(classify_performance(60), Performance::Good);
        assert_eq!(classify_performance(59), Performance::NeedsWork);
        assert_eq!(classify_performance(0), Performance::NeedsWork);
        assert_eq!(classify_performance(100), Performance::Excellent);
    }

    fn arb_task() -> impl Strategy<Value = Task> {
        (1u8..=3, 0u8..3).prop_map(|(imp, st)| {
            let status = match st {
                0 => TaskStatus::NotStarted,
                1 => TaskStatus::InProgress,
                _ => TaskStatus::Done,
            };
            task(imp, status)
        })
    }

    proptest! {
        #[test]
        fn metrics_stay_in_range(tasks in prop::collection::vec(arb_task(), 0..40)) {
            let rate = compute_completion_rate(&tasks);
            let score = compute_score(&tasks);
            prop_assert!(rate <= 100);
            prop_assert!((0.0..=MAX_SCORE).contains(&score));
        }
    }
}
