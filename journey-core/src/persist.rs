//! Encoding of [`StreakRecord`] and [`GoalContext`] into store keys.
//!
//! Decoding is fail-soft: a bad value becomes the field's empty default.

use chrono::{DateTime, NaiveDate, Utc};
use serde_json::{Value, json};
use std::collections::BTreeSet;

use crate::goals::{GoalContext, GoalDuration};
use crate::store::KeyValueStore;
use crate::streak::StreakRecord;

pub mod keys {
    pub const LEARNED_DATES: &str = "learned-dates";
    pub const FREEZED_DATES: &str = "freezed-dates";
    pub const STREAK_DAYS: &str = "streak-days";
    pub const FREEZES_USED: &str = "freezes-used";
    pub const LAST_LOGGED_DATE: &str = "last-logged-date";
    pub const LEARNING_TOPIC: &str = "learning-topic";
    pub const GOAL_DURATION: &str = "goal-duration";
}

pub fn save_record<S: KeyValueStore + ?Sized>(store: &mut S, record: &StreakRecord) {
    store.set(keys::LEARNED_DATES, encode_days(&record.learned_dates));
    store.set(keys::FREEZED_DATES, encode_days(&record.freezed_dates));
    store.set(keys::STREAK_DAYS, json!(record.streak_days));
    store.set(keys::FREEZES_USED, json!(record.freezes_used));
    match record.last_logged {
        Some(at) => store.set(keys::LAST_LOGGED_DATE, json!(at.to_rfc3339())),
        None => store.remove(keys::LAST_LOGGED_DATE),
    }
}

/// Read a record back. `streak_days` is whatever was stored; callers recompute.
/// A day listed as both learned and frozen stays learned.
pub fn load_record<S: KeyValueStore + ?Sized>(store: &S) -> StreakRecord {
    let learned_dates = decode_days(store.get(keys::LEARNED_DATES), keys::LEARNED_DATES);
    let mut freezed_dates = decode_days(store.get(keys::FREEZED_DATES), keys::FREEZED_DATES);
    let before = freezed_dates.len();
    freezed_dates.retain(|d| !learned_dates.contains(d));
    if freezed_dates.len() != before {
        tracing::warn!(
            dropped = before - freezed_dates.len(),
            "days stored as both learned and frozen, keeping learned"
        );
    }

    StreakRecord {
        learned_dates,
        freezed_dates,
        streak_days: decode_count(store.get(keys::STREAK_DAYS)),
        freezes_used: decode_count(store.get(keys::FREEZES_USED)),
        last_logged: decode_instant(store.get(keys::LAST_LOGGED_DATE)),
    }
}

pub fn save_goal<S: KeyValueStore + ?Sized>(store: &mut S, goal: &GoalContext) {
    store.set(keys::LEARNING_TOPIC, json!(goal.learning_topic));
    store.set(keys::GOAL_DURATION, json!(goal.duration.label()));
}

/// `None` when no goal was ever saved.
pub fn load_goal<S: KeyValueStore + ?Sized>(store: &S) -> Option<GoalContext> {
    let topic = store.get(keys::LEARNING_TOPIC);
    let duration = store.get(keys::GOAL_DURATION);
    if topic.is_none() && duration.is_none() {
        return None;
    }

    Some(GoalContext {
        learning_topic: topic
            .as_ref()
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        duration: duration
            .as_ref()
            .and_then(Value::as_str)
            .map(GoalDuration::from_label)
            .unwrap_or_default(),
    })
}

fn encode_days(days: &BTreeSet<NaiveDate>) -> Value {
    json!(days.iter().map(|d| d.to_string()).collect::<Vec<_>>())
}

fn decode_days(value: Option<Value>, key: &str) -> BTreeSet<NaiveDate> {
    let Some(value) = value else {
        return BTreeSet::new();
    };
    match serde_json::from_value::<Vec<NaiveDate>>(value) {
        Ok(days) => days.into_iter().collect(),
        Err(e) => {
            tracing::warn!(key, error = %e, "undecodable date list, treating as empty");
            BTreeSet::new()
        }
    }
}

fn decode_count(value: Option<Value>) -> u32 {
    value
        .as_ref()
        .and_then(Value::as_u64)
        .and_then(|n| u32::try_from(n).ok())
        .unwrap_or(0)
}

fn decode_instant(value: Option<Value>) -> Option<DateTime<Utc>> {
    let raw = value?;
    let s = raw.as_str()?;
    match DateTime::parse_from_rfc3339(s) {
        Ok(dt) => Some(dt.with_timezone(&Utc)),
        Err(e) => {
            tracing::warn!(value = s, error = %e, "undecodable last-logged date, ignoring");
            None
        }
    }
}
