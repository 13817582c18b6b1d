use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use journey_core::persist::keys;
use journey_core::{
    FileStore, GoalContext, GoalDuration, KeyValueStore, MemoryStore, StreakEngine, StreakSeed,
    parse_timezone,
};
use serde_json::json;
use std::collections::BTreeSet;

fn chicago() -> chrono_tz::Tz {
    parse_timezone("America/Chicago").unwrap()
}

/// 20:00 local Chicago time (CDT, UTC-5) on the given date.
fn evening(m: u32, d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, m, d, 1, 0, 0).unwrap() + Duration::days(1)
}

fn day(m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, m, d).unwrap()
}

/// Engine seeded with learned days `offsets` days before June 15th.
fn seeded(offsets: &[i64]) -> StreakEngine<MemoryStore> {
    let learned: BTreeSet<_> = offsets.iter().map(|&o| day(6, 15) - Duration::days(o)).collect();
    StreakEngine::seeded(
        MemoryStore::new(),
        chicago(),
        StreakSeed {
            learned,
            ..Default::default()
        },
        evening(6, 15),
    )
}

#[test]
fn test_streak_recompute_cases_via_seed() {
    assert_eq!(seeded(&[2, 1, 0]).streak_days(), 3);
    assert_eq!(seeded(&[5, 1, 0]).streak_days(), 2);
    assert_eq!(seeded(&[]).streak_days(), 0);
}

#[test]
fn test_evening_utc_instants_map_to_local_day() {
    // 01:00 UTC on June 16th is still June 15th in Chicago.
    let now = evening(6, 15);
    let mut engine = StreakEngine::load(MemoryStore::new(), chicago(), now);
    engine.mark_learned(now);
    assert!(engine.learned_dates().contains(&day(6, 15)));
    assert!(!engine.learned_dates().contains(&day(6, 16)));
}

#[test]
fn test_round_trip_recomputes_from_dates() {
    let mut store = MemoryStore::new();
    store.set(keys::LEARNED_DATES, json!(["2026-06-13", "2026-06-14"]));
    store.set(keys::FREEZED_DATES, json!(["2026-06-15"]));
    // stale counter from an older build
    store.set(keys::STREAK_DAYS, json!(42));
    store.set(keys::FREEZES_USED, json!(1));

    let engine = StreakEngine::load(store, chicago(), evening(6, 15));
    assert_eq!(engine.streak_days(), 3);
    assert_eq!(engine.freezes_used(), 1);
    assert!(engine.last_logged().is_none());
}

#[test]
fn test_week_of_activity_survives_file_store_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state.json");
    let start = evening(6, 1);

    {
        let mut engine = StreakEngine::load(FileStore::open(&path), chicago(), start);
        engine.edit_goal("Swift", "Week");
        for i in 0..7 {
            let now = start + Duration::days(i);
            engine.tick(now);
            if i == 3 {
                engine.toggle_freeze(now);
            } else {
                engine.mark_learned(now);
            }
        }
        assert!(engine.is_completed());
    }

    let reopened = StreakEngine::load(FileStore::open(&path), chicago(), start + Duration::days(6));
    assert_eq!(reopened.goal(), &GoalContext::new("Swift", GoalDuration::Week));
    assert_eq!(reopened.streak_days(), 7);
    assert_eq!(reopened.learned_dates().len(), 6);
    assert_eq!(reopened.freezed_dates().iter().copied().collect::<Vec<_>>(), vec![day(6, 4)]);
    assert_eq!(reopened.freezes_used(), 1);
    assert_eq!(reopened.last_logged(), Some(start + Duration::days(6)));
    assert!(reopened.is_completed());
}

#[test]
fn test_expired_streak_is_reset_and_persisted() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state.json");
    let start = evening(6, 1);

    {
        let mut engine = StreakEngine::load(FileStore::open(&path), chicago(), start);
        engine.mark_learned(start);
        engine.mark_learned(start + Duration::days(1));
        assert_eq!(engine.streak_days(), 2);
    }

    // a whole day skipped
    let later = start + Duration::days(1) + Duration::hours(40);
    let mut engine = StreakEngine::load(FileStore::open(&path), chicago(), later);
    assert!(engine.is_expired(later));
    assert!(engine.tick(later).expired);

    let store = engine.into_store();
    assert_eq!(store.get(keys::LEARNED_DATES), Some(json!([])));
    assert!(store.get(keys::LAST_LOGGED_DATE).is_none());

    let reopened = StreakEngine::load(FileStore::open(&path), chicago(), later);
    assert_eq!(reopened.streak_days(), 0);
    assert!(!reopened.is_expired(later));
}

#[test]
fn test_month_quota_allows_eight_freezes() {
    let start = evening(6, 1);
    let mut engine = StreakEngine::load(MemoryStore::new(), chicago(), start);
    engine.edit_goal("Piano", "Month");

    for i in 0..10 {
        engine.toggle_freeze(start + Duration::days(i));
    }
    assert_eq!(engine.freezes_used(), 8);
    assert_eq!(engine.freezed_dates().len(), 8);
    assert!(engine.freeze_disabled(start + Duration::days(10)));
}
