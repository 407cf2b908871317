use rand::Rng;
use rand::seq::SliceRandom;

use super::scoring::Performance;

const EXCELLENT: &[&str] = &[
    "Outstanding day. Keep the same rhythm tomorrow.",
    "You handled your priorities brilliantly. Take time to rest.",
    "A day to be proud of. Note what worked so you can repeat it.",
];

const GOOD: &[&str] = &[
    "Solid progress. Start tomorrow with your most important task.",
    "Good work. A little more focus on critical tasks will get you to excellent.",
    "You are on track. Try to close the tasks you left in progress.",
];

const NEEDS_WORK: &[&str] = &[
    "Tomorrow is a new start. Pick three tasks and finish them first.",
    "Break big tasks into smaller steps so they are easier to complete.",
    "Be kind to yourself. Plan fewer tasks and give them more care.",
];

const QUOTES: &[&str] = &[
    "Small daily improvements lead to stunning results.",
    "Discipline is choosing between what you want now and what you want most.",
    "Success is the sum of small efforts repeated day in and day out.",
    "Do not watch the clock; do what it does. Keep going.",
    "The secret of getting ahead is getting started.",
];

/// Canned advice lines per performance band plus motivational quotes. The
/// caller supplies the random source.
#[derive(Debug, Clone, Copy)]
pub struct AdviceBook {
    excellent: &'static [&'static str],
    good: &'static [&'static str],
    needs_work: &'static [&'static str],
    quotes: &'static [&'static str],
}

impl Default for AdviceBook {
    fn default() -> Self {
        Self { excellent: EXCELLENT, good: GOOD, needs_work: NEEDS_WORK, quotes: QUOTES }
    }
}

impl AdviceBook {
    pub fn lines(&self, performance: Performance) -> &'static [&'static str] {
        match performance {
            Performance::Excellent => self.excellent,
            Performance::Good => self.good,
            Performance::NeedsWork => self.needs_work,
        }
    }

    pub fn advice_for<R: Rng + ?Sized>(&self, performance: Performance, rng: &mut R) -> &'static str {
        self.lines(performance).choose(rng).copied().unwrap_or_default()
    }

    pub fn quote<R: Rng + ?Sized>(&self, rng: &mut R) -> &'static str {
        self.quotes.choose(rng).copied().unwrap_or_default()
    }
}
