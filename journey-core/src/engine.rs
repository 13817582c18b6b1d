//! Streak engine: owns one goal's record, mutates it, and tells observers.
//!
//! Single-threaded by design. Every user action and every clock tick goes
//! through `&mut self`, and observers are plain `FnMut` boxes, so the engine
//! is neither `Send` nor `Sync`.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use crate::calendar::{CalendarDay, DayMark, annotate, month_days, week_days};
use crate::goals::{GoalContext, GoalDuration};
use crate::persist::{load_goal, load_record, save_goal, save_record};
use crate::store::KeyValueStore;
use crate::streak::StreakRecord;
use crate::time::day_of;

/// A streak with no learn/freeze action for longer than this is abandoned.
pub const EXPIRY_HOURS: i64 = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResetReason {
    Manual,
    Expired,
    GoalChanged,
}

/// Sent to observers after every state change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreakEvent {
    Learned { day: NaiveDate },
    Frozen { day: NaiveDate },
    Unfrozen { day: NaiveDate },
    Reset { reason: ResetReason },
    DayRolledOver { day: NaiveDate },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubscriptionId(u64);

type Observer = Box<dyn FnMut(&StreakEvent)>;

/// What one clock tick did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickOutcome {
    pub expired: bool,
    pub rolled_over: bool,
}

/// Headline state for today, in display precedence order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TodayState {
    Expired,
    Completed,
    Frozen,
    Learned,
    NotLearned,
}

/// Explicit starting state, for previews and tests. Bypasses the store on load.
#[derive(Debug, Clone, Default)]
pub struct StreakSeed {
    pub learned: BTreeSet<NaiveDate>,
    pub frozen: BTreeSet<NaiveDate>,
    pub goal: GoalContext,
    pub last_logged: Option<DateTime<Utc>>,
    pub freezes_used: u32,
}

/// Serializable summary of everything a status screen shows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreakStatus {
    pub learning_topic: String,
    pub duration: GoalDuration,
    pub today: NaiveDate,
    pub today_state: TodayState,
    pub streak_days: u32,
    pub target_days: u32,
    pub freezes_used: u32,
    pub freeze_quota: u32,
    pub freeze_disabled: bool,
    /// Whether `toggle_freeze` would spend a token right now. Unlike
    /// `freeze_disabled`, a day already learned can still be frozen.
    pub can_freeze: bool,
    pub expired: bool,
    pub completed: bool,
    pub last_logged: Option<DateTime<Utc>>,
}

pub struct StreakEngine<S: KeyValueStore> {
    store: S,
    tz: Tz,
    record: StreakRecord,
    goal: GoalContext,
    last_seen_day: NaiveDate,
    observers: Vec<(SubscriptionId, Observer)>,
    next_subscription: u64,
}

impl<S: KeyValueStore> StreakEngine<S> {
    /// Restore from `store`. The persisted streak length is discarded and
    /// recomputed from the date sets.
    pub fn load(store: S, tz: Tz, now: DateTime<Utc>) -> Self {
        let mut record = load_record(&store);
        let stored_streak = record.streak_days;
        record.recompute_streak();
        let goal = load_goal(&store).unwrap_or_default();

        tracing::debug!(
            stored_streak,
            streak_days = record.streak_days,
            learned = record.learned_dates.len(),
            frozen = record.freezed_dates.len(),
            "loaded streak state"
        );

        Self::from_parts(store, tz, record, goal, now)
    }

    pub fn seeded(store: S, tz: Tz, seed: StreakSeed, now: DateTime<Utc>) -> Self {
        let StreakSeed {
            learned,
            mut frozen,
            goal,
            last_logged,
            freezes_used,
        } = seed;
        frozen.retain(|d| !learned.contains(d));

        let mut record = StreakRecord {
            learned_dates: learned,
            freezed_dates: frozen,
            streak_days: 0,
            freezes_used,
            last_logged,
        };
        record.recompute_streak();

        Self::from_parts(store, tz, record, goal, now)
    }

    fn from_parts(store: S, tz: Tz, record: StreakRecord, goal: GoalContext, now: DateTime<Utc>) -> Self {
        Self {
            store,
            tz,
            record,
            goal,
            last_seen_day: day_of(now, tz),
            observers: Vec::new(),
            next_subscription: 0,
        }
    }

    // --- observers ---------------------------------------------------------

    pub fn subscribe(&mut self, observer: impl FnMut(&StreakEvent) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    /// Returns false if `id` was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(sub, _)| *sub != id);
        self.observers.len() != before
    }

    fn notify(&mut self, event: StreakEvent) {
        for (_, observer) in self.observers.iter_mut() {
            observer(&event);
        }
    }

    // --- accessors ---------------------------------------------------------

    pub fn record(&self) -> &StreakRecord {
        &self.record
    }

    pub fn goal(&self) -> &GoalContext {
        &self.goal
    }

    pub fn learning_topic(&self) -> &str {
        &self.goal.learning_topic
    }

    pub fn duration(&self) -> GoalDuration {
        self.goal.duration
    }

    pub fn streak_days(&self) -> u32 {
        self.record.streak_days
    }

    pub fn freezes_used(&self) -> u32 {
        self.record.freezes_used
    }

    pub fn freeze_quota(&self) -> u32 {
        self.goal.duration.freeze_quota()
    }

    pub fn freezes_remaining(&self) -> u32 {
        self.freeze_quota().saturating_sub(self.record.freezes_used)
    }

    pub fn learned_dates(&self) -> &BTreeSet<NaiveDate> {
        &self.record.learned_dates
    }

    pub fn freezed_dates(&self) -> &BTreeSet<NaiveDate> {
        &self.record.freezed_dates
    }

    pub fn last_logged(&self) -> Option<DateTime<Utc>> {
        self.record.last_logged
    }

    pub fn timezone(&self) -> Tz {
        self.tz
    }

    pub fn today(&self, now: DateTime<Utc>) -> NaiveDate {
        day_of(now, self.tz)
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    // --- actions -----------------------------------------------------------

    pub fn mark_learned(&mut self, now: DateTime<Utc>) {
        let today = self.today(now);
        if self.record.is_learned(today) {
            tracing::debug!(day = %today, "already learned today");
            return;
        }

        self.record.learned_dates.insert(today);
        self.record.freezed_dates.remove(&today);
        self.record.last_logged = Some(now);
        self.record.recompute_streak();
        self.persist();

        tracing::info!(day = %today, streak_days = self.record.streak_days, "marked learned");
        self.notify(StreakEvent::Learned { day: today });
    }

    /// Spend a freeze token on today. A day already learned is converted to frozen.
    ///
    /// The streak length is only recomputed when a learned entry was removed.
    /// Freezing an idle day leaves `streak_days` stale until the next
    /// recomputing action or reload.
    pub fn toggle_freeze(&mut self, now: DateTime<Utc>) {
        let today = self.today(now);
        if self.record.is_frozen(today) {
            tracing::debug!(day = %today, "already frozen today");
            return;
        }
        if self.record.freezes_used >= self.freeze_quota() {
            tracing::debug!(
                freezes_used = self.record.freezes_used,
                quota = self.freeze_quota(),
                "freeze quota exhausted"
            );
            return;
        }

        if self.record.learned_dates.remove(&today) {
            self.record.recompute_streak();
        }
        self.record.freezed_dates.insert(today);
        self.record.freezes_used += 1;
        self.record.last_logged = Some(now);
        self.persist();

        tracing::info!(
            day = %today,
            freezes_used = self.record.freezes_used,
            streak_days = self.record.streak_days,
            "froze day"
        );
        self.notify(StreakEvent::Frozen { day: today });
    }

    /// Give back today's freeze token.
    ///
    /// Leaves `streak_days` as it was: the length is only refreshed by the
    /// next recomputing action or by reloading.
    pub fn unfreeze_day(&mut self, now: DateTime<Utc>) {
        let today = self.today(now);
        if !self.record.is_frozen(today) || self.record.freezes_used == 0 {
            tracing::debug!(day = %today, "nothing to unfreeze");
            return;
        }

        self.record.freezed_dates.remove(&today);
        self.record.freezes_used -= 1;
        self.persist();

        tracing::info!(day = %today, freezes_used = self.record.freezes_used, "unfroze day");
        self.notify(StreakEvent::Unfrozen { day: today });
    }

    pub fn reset_streak(&mut self) {
        self.reset_with(ResetReason::Manual);
    }

    /// Change topic and duration, then start a fresh streak.
    /// Unrecognized duration labels mean a week.
    pub fn edit_goal(&mut self, topic: impl Into<String>, duration_label: &str) {
        self.goal = GoalContext::new(topic, GoalDuration::from_label(duration_label));
        tracing::info!(
            topic = %self.goal.learning_topic,
            duration = %self.goal.duration,
            "goal edited"
        );
        self.reset_with(ResetReason::GoalChanged);
    }

    fn reset_with(&mut self, reason: ResetReason) {
        self.record = StreakRecord::new();
        self.persist();
        tracing::info!(?reason, "streak reset");
        self.notify(StreakEvent::Reset { reason });
    }

    fn persist(&mut self) {
        save_record(&mut self.store, &self.record);
        save_goal(&mut self.store, &self.goal);
        self.store.flush();
    }

    // --- queries -----------------------------------------------------------

    pub fn freeze_disabled(&self, now: DateTime<Utc>) -> bool {
        !self.can_freeze(now) || self.record.is_learned(self.today(now))
    }

    /// The guard `toggle_freeze` actually applies: a token left and today not frozen.
    pub fn can_freeze(&self, now: DateTime<Utc>) -> bool {
        self.record.freezes_used < self.freeze_quota() && !self.record.is_frozen(self.today(now))
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.record
            .last_logged
            .is_some_and(|last| now - last > Duration::hours(EXPIRY_HOURS))
    }

    pub fn is_completed(&self) -> bool {
        self.record.streak_days >= self.goal.duration.target_days()
    }

    pub fn day_mark(&self, day: NaiveDate) -> DayMark {
        DayMark::of(&self.record, day)
    }

    pub fn today_state(&self, now: DateTime<Utc>) -> TodayState {
        if self.is_expired(now) {
            return TodayState::Expired;
        }
        if self.is_completed() {
            return TodayState::Completed;
        }
        match self.day_mark(self.today(now)) {
            DayMark::Frozen => TodayState::Frozen,
            DayMark::Learned => TodayState::Learned,
            DayMark::Idle => TodayState::NotLearned,
        }
    }

    /// Sunday-first week, `week_offset` weeks away from the current one.
    /// Empty when the offset runs past the representable calendar.
    pub fn week_view(&self, now: DateTime<Utc>, week_offset: i64) -> Vec<CalendarDay> {
        let today = self.today(now);
        let Some(anchor) = Duration::try_weeks(week_offset).and_then(|d| today.checked_add_signed(d))
        else {
            return Vec::new();
        };
        week_days(anchor)
            .map(|days| annotate(&self.record, days, today))
            .unwrap_or_default()
    }

    pub fn month_view(&self, year: i32, month: u32, now: DateTime<Utc>) -> Vec<CalendarDay> {
        annotate(&self.record, month_days(year, month), self.today(now))
    }

    pub fn status(&self, now: DateTime<Utc>) -> StreakStatus {
        StreakStatus {
            learning_topic: self.goal.learning_topic.clone(),
            duration: self.goal.duration,
            today: self.today(now),
            today_state: self.today_state(now),
            streak_days: self.record.streak_days,
            target_days: self.goal.duration.target_days(),
            freezes_used: self.record.freezes_used,
            freeze_quota: self.freeze_quota(),
            freeze_disabled: self.freeze_disabled(now),
            can_freeze: self.can_freeze(now),
            expired: self.is_expired(now),
            completed: self.is_completed(),
            last_logged: self.record.last_logged,
        }
    }

    // --- clock -------------------------------------------------------------

    /// Periodic tick: drop an abandoned streak, then announce a new day.
    pub fn tick(&mut self, now: DateTime<Utc>) -> TickOutcome {
        let mut outcome = TickOutcome::default();

        if self.is_expired(now) {
            tracing::info!(last_logged = ?self.record.last_logged, "streak expired");
            self.reset_with(ResetReason::Expired);
            outcome.expired = true;
        }

        let today = self.today(now);
        if today > self.last_seen_day {
            self.last_seen_day = today;
            tracing::debug!(day = %today, "day rolled over");
            self.notify(StreakEvent::DayRolledOver { day: today });
            outcome.rolled_over = true;
        }

        outcome
    }
}

impl<S: KeyValueStore> fmt::Debug for StreakEngine<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StreakEngine")
            .field("tz", &self.tz)
            .field("record", &self.record)
            .field("goal", &self.goal)
            .field("last_seen_day", &self.last_seen_day)
            .field("observers", &self.observers.len())
            .finish_non_exhaustive()
    }
}
