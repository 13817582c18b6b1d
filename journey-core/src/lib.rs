//! journey-core: streak bookkeeping for a single learning goal.
//!
//! Days are marked learned or frozen; the streak is the run of consecutive
//! marked days ending at the latest one. Persistence goes through an injected
//! [`KeyValueStore`], and time only enters through explicit `now` arguments.

pub mod calendar;
pub mod engine;
pub mod goals;
pub mod persist;
pub mod store;
pub mod streak;
pub mod time;

pub use calendar::{CalendarDay, DayMark, month_days, week_days};
pub use engine::{
    EXPIRY_HOURS, ResetReason, StreakEngine, StreakEvent, StreakSeed, StreakStatus, SubscriptionId,
    TickOutcome, TodayState,
};
pub use goals::{GoalContext, GoalDuration};
pub use store::{FileStore, KeyValueStore, MemoryStore, StoreError};
pub use streak::{StreakRecord, trailing_run_length};
pub use time::{day_of, parse_timezone};
