//! End-to-end session behaviour through the public API, with an in-memory
//! store, a settable clock and scripted rewards.

use tubecoins::games::tubecoins::events::GameEvent;
use tubecoins::games::tubecoins::save::STORAGE_KEY;
use tubecoins::games::tubecoins::state::ProductionState;
use tubecoins::games::tubecoins::tuning::{Tuning, TICKS_PER_SECOND};
use tubecoins::games::tubecoins::{Outcome, Session};
use tubecoins::rng::ScriptedRewards;
use tubecoins::store::MemoryStore;
use tubecoins::time::{FixedClock, TickClock};

const T0: i64 = 1_700_000_000_000;

fn open(store: &MemoryStore, clock: &FixedClock) -> Session {
    Session::open(
        Box::new(store.clone()),
        Box::new(clock.clone()),
        Box::new(ScriptedRewards::new([20, 45])),
        Tuning::default(),
    )
}

/// A save with 10 coins/s of passive income written at `last_save_ms`.
fn auto_income_blob(last_save_ms: i64) -> String {
    serde_json::json!({
        "balance": 100.0,
        "total_taps": 3,
        "tap_yield": 1,
        "tap_upgrade_level": 0,
        "tap_upgrade_cost": 500,
        "auto_yield_per_second": 10,
        "auto_upgrade_level": 2,
        "auto_upgrade_cost": 2200,
        "videos_created": 0,
        "videos": [],
        "achievements": [],
        "last_save_ms": last_save_ms,
    })
    .to_string()
}

#[test]
fn ten_taps_unlock_first_achievement() {
    let store = MemoryStore::new();
    let clock = FixedClock::at(T0);
    let mut s = open(&store, &clock);

    for _ in 0..10 {
        s.tap();
    }

    assert_eq!(s.state().total_taps, 10);
    assert_eq!(s.state().display_balance(), 30);
    assert!(s.state().achievements[0].unlocked);
    assert!(s.state().achievements[1..].iter().all(|a| !a.unlocked));
    let unlocks: Vec<_> = s
        .drain_events()
        .into_iter()
        .filter(|e| matches!(e, GameEvent::AchievementUnlocked { .. }))
        .collect();
    assert_eq!(unlocks.len(), 1);
}

#[test]
fn first_tap_upgrade_jumps_to_fifty() {
    let store = MemoryStore::new();
    let clock = FixedClock::at(T0);
    let mut s = open(&store, &clock);

    for _ in 0..470 {
        s.tap();
    }
    // 470 taps + 20 (10 taps) + 200 (100 taps) = 690
    assert_eq!(s.state().display_balance(), 690);

    assert_eq!(s.buy_tap_upgrade(), Outcome::Applied { balance: 190 });
    assert_eq!(s.state().tap_yield, 50);
    assert_eq!(s.state().tap_upgrade_level, 1);
    assert_eq!(s.state().tap_upgrade_cost, 1_000);

    s.tap();
    assert_eq!(s.state().display_balance(), 240);
}

#[test]
fn purchase_rejected_leaves_state_untouched() {
    let store = MemoryStore::new();
    let clock = FixedClock::at(T0);
    let mut s = open(&store, &clock);
    s.tap();
    let before = s.state().clone();

    let out = s.buy_auto_income_upgrade();

    assert_eq!(
        out,
        Outcome::InsufficientFunds {
            shortfall: 799,
            balance: 1
        }
    );
    assert_eq!(s.state(), &before);
}

#[test]
fn offline_earnings_granted_on_open() {
    let store = MemoryStore::new();
    store.insert(STORAGE_KEY, &auto_income_blob(T0));
    let clock = FixedClock::at(T0 + 125_000);

    let mut s = open(&store, &clock);

    assert_eq!(s.state().display_balance(), 100 + 1_250);
    assert_eq!(
        s.drain_events(),
        vec![GameEvent::OfflineEarnings {
            coins: 1_250,
            elapsed_seconds: 125
        }]
    );
    assert!(s.income_running());
    assert_eq!(s.state().last_save_ms, T0 + 125_000);

    // The grant was persisted, so reopening at the same instant adds nothing.
    let mut again = open(&store, &clock);
    assert_eq!(again.state().display_balance(), 1_350);
    assert!(again.drain_events().is_empty());
}

#[test]
fn absence_beyond_a_day_grants_nothing() {
    let store = MemoryStore::new();
    store.insert(STORAGE_KEY, &auto_income_blob(T0));
    let clock = FixedClock::at(T0 + 90_001_000);

    let mut s = open(&store, &clock);

    assert_eq!(s.state().display_balance(), 100);
    assert!(s.drain_events().is_empty());
}

#[test]
fn clock_moved_backwards_grants_nothing() {
    let store = MemoryStore::new();
    store.insert(STORAGE_KEY, &auto_income_blob(T0));
    let clock = FixedClock::at(T0 - 60_000);

    let s = open(&store, &clock);

    assert_eq!(s.state().display_balance(), 100);
}

#[test]
fn corrupt_save_falls_back_to_defaults() {
    let store = MemoryStore::new();
    store.insert(STORAGE_KEY, "{ not json");
    let clock = FixedClock::at(T0);

    let s = open(&store, &clock);

    assert_eq!(s.state().display_balance(), 0);
    assert_eq!(s.state().total_taps, 0);
    assert!(store.get(STORAGE_KEY).is_none());
}

#[test]
fn unavailable_store_is_not_fatal() {
    let store = MemoryStore::new();
    store.set_offline(true);
    let clock = FixedClock::at(T0);

    let mut s = open(&store, &clock);
    for _ in 0..10 {
        s.tap();
    }

    assert_eq!(s.state().display_balance(), 30);
    store.set_offline(false);
    assert!(store.get(STORAGE_KEY).is_none());
    s.tap();
    assert!(store.get(STORAGE_KEY).is_some());
}

#[test]
fn recovered_store_keeps_the_real_save() {
    let store = MemoryStore::new();
    let clock = FixedClock::at(T0);
    let mut first = open(&store, &clock);
    for _ in 0..200 {
        first.tap();
    }
    first.shutdown();

    store.set_offline(true);
    let mut s = open(&store, &clock);
    store.set_offline(false);
    s.tap();
    drop(s);

    let reopened = open(&store, &clock);
    assert_eq!(reopened.state().total_taps, 200);
}

#[test]
fn backgrounded_tab_keeps_earning() {
    let store = MemoryStore::new();
    let clock = FixedClock::at(T0);
    let mut s = open(&store, &clock);
    for _ in 0..800 {
        s.tap();
    }
    assert!(s.buy_auto_income_upgrade().is_applied());
    let before = s.state().display_balance();
    s.drain_events();

    // No frames for ten minutes, then one clamped frame.
    let mut frames = TickClock::new(TICKS_PER_SECOND);
    frames.update(0.0);
    clock.advance_secs(600);
    let ticks = frames.update(600_000.0);
    s.advance(ticks);

    let gained = s.state().display_balance() - before;
    assert!((2_995..=3_000).contains(&gained), "gained {gained}");
    assert!(s
        .drain_events()
        .iter()
        .any(|e| matches!(e, GameEvent::OfflineEarnings { .. })));

    // The grant was saved, so a reload right away adds nothing more.
    drop(s);
    let reopened = open(&store, &clock);
    assert_eq!(reopened.state().display_balance(), before + gained);
}

#[test]
fn progress_survives_reopen() {
    let store = MemoryStore::new();
    let clock = FixedClock::at(T0);
    let mut s = open(&store, &clock);
    for _ in 0..12 {
        s.tap();
    }
    s.start_video_production();
    s.advance(20);
    let video_id = s.state().videos[0].id;
    s.shutdown();

    let reopened = open(&store, &clock);

    assert_eq!(reopened.state().total_taps, 12);
    assert_eq!(reopened.state().display_balance(), 32);
    assert!(reopened.state().achievements[0].unlocked);
    assert_eq!(reopened.state().videos.len(), 1);
    assert_eq!(reopened.state().videos[0].id, video_id);
    assert_eq!(reopened.state().videos[0].reward_coins, 20);
}

#[test]
fn video_in_production_is_dropped_on_reload() {
    let store = MemoryStore::new();
    let clock = FixedClock::at(T0);
    let mut s = open(&store, &clock);
    s.tap();
    s.start_video_production();
    s.advance(7);
    assert_eq!(
        s.state().production,
        ProductionState::InProgress { progress: 35 }
    );

    let reopened = open(&store, &clock);

    assert_eq!(reopened.state().production, ProductionState::Idle);
    assert!(!reopened.production_running());
}

#[test]
fn second_start_while_producing_is_ignored() {
    let store = MemoryStore::new();
    let clock = FixedClock::at(T0);
    let mut s = open(&store, &clock);

    assert!(s.start_video_production().is_applied());
    s.advance(4);
    assert_eq!(s.start_video_production(), Outcome::Ignored { balance: 0 });
    assert_eq!(s.state().production.progress(), Some(20));
}

#[test]
fn two_videos_get_distinct_ids_and_rewards() {
    let store = MemoryStore::new();
    let clock = FixedClock::at(T0);
    let mut s = open(&store, &clock);

    for _ in 0..2 {
        s.start_video_production();
        s.advance(20);
    }

    let videos = &s.state().videos;
    assert_eq!(videos.len(), 2);
    assert_ne!(videos[0].id, videos[1].id);
    assert_eq!(videos[0].reward_coins, 20);
    assert_eq!(videos[1].reward_coins, 45);

    let second = videos[1].id;
    assert_eq!(s.publish_video(second), Outcome::Applied { balance: 45 });
    assert_eq!(s.state().videos.len(), 1);
}

#[test]
fn shutdown_stops_both_jobs() {
    let store = MemoryStore::new();
    store.insert(STORAGE_KEY, &auto_income_blob(T0));
    let clock = FixedClock::at(T0);
    let mut s = open(&store, &clock);
    s.start_video_production();
    assert!(s.income_running());
    assert!(s.production_running());

    s.shutdown();
    let balance = s.state().display_balance();
    s.advance(50);

    assert!(!s.income_running());
    assert!(!s.production_running());
    assert_eq!(s.state().display_balance(), balance);
    assert_eq!(s.state().production.progress(), Some(0));
}

#[test]
fn reset_clears_everything() {
    let store = MemoryStore::new();
    store.insert(STORAGE_KEY, &auto_income_blob(T0));
    let clock = FixedClock::at(T0);
    let mut s = open(&store, &clock);
    s.start_video_production();

    s.reset_progress();

    assert!(store.get(STORAGE_KEY).is_none());
    assert_eq!(s.state().display_balance(), 0);
    assert_eq!(s.state().auto_yield_per_second, 0);
    assert!(!s.income_running());
    assert!(!s.production_running());
}
