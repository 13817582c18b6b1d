//! Streak record: per-day marks plus the derived streak length.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::time::day_gap;

/// Durable state for one learning goal.
///
/// A day is never in both `learned_dates` and `freezed_dates`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct StreakRecord {
    pub learned_dates: BTreeSet<NaiveDate>,
    pub freezed_dates: BTreeSet<NaiveDate>,
    /// Derived. Only [`StreakRecord::recompute_streak`] writes it.
    pub streak_days: u32,
    pub freezes_used: u32,
    /// Instant of the last learn/freeze action. Not day-normalized.
    pub last_logged: Option<DateTime<Utc>>,
}

impl StreakRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_learned(&self, day: NaiveDate) -> bool {
        self.learned_dates.contains(&day)
    }

    pub fn is_frozen(&self, day: NaiveDate) -> bool {
        self.freezed_dates.contains(&day)
    }

    /// Learned or frozen days, ascending.
    pub fn active_days(&self) -> BTreeSet<NaiveDate> {
        self.learned_dates.union(&self.freezed_dates).copied().collect()
    }

    pub fn recompute_streak(&mut self) {
        self.streak_days = trailing_run_length(&self.active_days());
    }
}

/// Length of the run of consecutive days ending at the last day in `days`.
///
/// Walks the whole history every time: a gap anywhere resets the counter,
/// so only the run after the final gap survives.
pub fn trailing_run_length(days: &BTreeSet<NaiveDate>) -> u32 {
    let mut iter = days.iter();
    let Some(mut prev) = iter.next().copied() else {
        return 0;
    };

    let mut count = 1;
    for &day in iter {
        count = if day_gap(prev, day) <= 1 { count + 1 } else { 1 };
        prev = day;
    }
    count
}
