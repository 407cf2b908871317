//! Figures derived from the validated-days history. Every view reads these
//! instead of recomputing rates on its own.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::scoring::Performance;
use super::summary::DaySummary;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ChartPoint {
    pub date: NaiveDate,
    pub completion_rate: u8,
    pub score: f64,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PerformanceTally {
    pub excellent: u32,
    pub good: u32,
    pub needs_work: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct HistoryStats {
    pub days: u32,
    pub average_completion_rate: f64,
    pub average_score: f64,
    pub best_day: Option<NaiveDate>,
    pub current_streak: u32,
    pub tally: PerformanceTally,
}

fn sorted_by_date(history: &[DaySummary]) -> Vec<&DaySummary> {
    let mut days: Vec<&DaySummary> = history.iter().collect();
    days.sort_by_key(|d| d.date);
    days
}

fn one_decimal(value: f64) -> f64 { (value * 10.0).round() / 10.0 }

pub fn chart_series(history: &[DaySummary]) -> Vec<ChartPoint> {
    sorted_by_date(history)
        .into_iter()
        .map(|d| ChartPoint { date: d.date, completion_rate: d.completion_rate, score: d.score })
        .collect()
}

/// Streak after adding `summary` on top of `prior` consecutive passing days.
pub fn next_streak(prior: u32, summary: &DaySummary) -> u32 {
    if summary.performance().is_passing() { prior.saturating_add(1) } else { 0 }
}

/// Consecutive calendar days, ending at the latest summary, rated Good or better.
pub fn current_streak(history: &[DaySummary]) -> u32 {
    let days = sorted_by_date(history);
    let mut streak = 0;
    let mut expected: Option<NaiveDate> = None;
    for day in days.iter().rev() {
        if expected.is_some_and(|e| e != day.date) {
            break;
        }
        if !day.performance().is_passing() {
            break;
        }
        streak += 1;
        expected = day.date.pred_opt();
        if expected.is_none() {
            break;
        }
    }
    streak
}

pub fn history_stats(history: &[DaySummary]) -> HistoryStats {
    if history.is_empty() {
        return HistoryStats::default();
    }
    let n = history.len() as f64;
    let mut tally = PerformanceTally::default();
    let mut best: Option<&DaySummary> = None;
    for day in sorted_by_date(history) {
        match day.performance() {
            Performance::Excellent => tally.excellent += 1,
            Performance::Good => tally.good += 1,
            Performance::NeedsWork => tally.needs_work += 1,
        }
        if best.is_none_or(|b| day.score > b.score) {
            best = Some(day);
        }
    }
    HistoryStats {
        days: history.len() as u32,
        average_completion_rate: one_decimal(history.iter().map(|d| f64::from(d.completion_rate)).sum::<f64>() / n),
        average_score: one_decimal(history.iter().map(|d| d.score).sum::<f64>() / n),
        best_day: best.map(|b| b.date),
        current_streak: current_streak(history),
        tally,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(date: &str, rate: u8, score: f64) -> DaySummary {
        DaySummary {
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            completion_rate: rate,
            score,
            task_snapshot: Vec::new(),
        }
    }

    #[test]
    fn empty_history() {
        assert_eq!(current_streak(&[]), 0);
        assert_eq!(history_stats(&[]), HistoryStats::default());
        assert!(chart_series(&[]).is_empty());
    }

    #[test]
    fn series_is_sorted_by_date() {
        let history = vec![day("2025-01-12", 40, 8.0), day("2025-01-10", 90, 18.0)];
        let series = chart_series(&history);
        assert_eq!(series[0].date.to_string(), "2025-01-10");
        assert_eq!(series[1].completion_rate, 40);
    }

    #[test]
    fn streak_counts_consecutive_passing_days() {
        let history = vec![
            day("2025-01-08", 30, 5.0),
            day("2025-01-09", 60, 12.0),
            day("2025-01-11", 70, 14.0),
            day("2025-01-10", 100, 20.0),
        ];
        assert_eq!(current_streak(&history), 3);
    }

    #[test]
    fn gap_breaks_streak() {
        let history = vec![day("2025-01-08", 90, 18.0), day("2025-01-10", 90, 18.0)];
        assert_eq!(current_streak(&history), 1);
    }

    #[test]
    fn failing_latest_day_resets_streak() {
        let history = vec![day("2025-01-09", 90, 18.0), day("2025-01-10", 59, 11.0)];
        assert_eq!(current_streak(&history), 0);
    }

    #[test]
    fn next_streak_builds_on_prior() {
        assert_eq!(next_streak(4, &day("2025-01-10", 85, 17.0)), 5);
        assert_eq!(next_streak(4, &day("2025-01-10", 20, 4.0)), 0);
    }

    #[test]
    fn next_streak_saturates_at_max() {
        assert_eq!(next_streak(u32::MAX, &day("2025-01-10", 90, 18.0)), u32::MAX);
    }

    #[test]
    fn stats_aggregate_history() {
        let history = vec![
            day("2025-01-09", 50, 13.3),
            day("2025-01-10", 100, 20.0),
            day("2025-01-11", 67, 20.0),
        ];
        let stats = history_stats(&history);
        assert_eq!(stats.days, 3);
        assert_eq!(stats.average_completion_rate, 72.3);
        assert_eq!(stats.average_score, 17.8);
        assert_eq!(stats.best_day.map(|d| d.to_string()).as_deref(), Some("2025-01-10"));
        assert_eq!(stats.current_streak, 2);
        assert_eq!(stats.tally, PerformanceTally { excellent: 1, good: 1, needs_work: 1 });
    }
}
