//! TubeCoins save/load and offline catch-up.
//!
//! The whole economy is written as one JSON blob under [`STORAGE_KEY`] after
//! every persisted change. Videos in production are not saved: a reload
//! drops an unfinished video, the same as closing the tab.
//!
//! On load, the time since the last save is converted into passive income at
//! the rate stored in that save, capped at one day.

use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::store::SaveStore;

use super::state::{EconomyState, ProductionState, VideoItem};
use super::tuning::Tuning;

/// Key of the save blob.
pub const STORAGE_KEY: &str = "tubecoins_save";

/// Serialized form of `EconomyState`. Transient state (production progress)
/// is not included.
#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct SaveData {
    balance: f64,
    total_taps: u64,
    tap_yield: u64,
    tap_upgrade_level: u32,
    tap_upgrade_cost: u64,
    auto_yield_per_second: u64,
    auto_upgrade_level: u32,
    auto_upgrade_cost: u64,
    #[serde(default)]
    videos_created: u64,
    videos: Vec<VideoSave>,
    achievements: Vec<AchievementSave>,
    last_save_ms: i64,
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct VideoSave {
    id: u64,
    title: String,
    reward_coins: u64,
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct AchievementSave {
    id: u32,
    unlocked: bool,
}

/// Coins granted for time spent away.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OfflineGrant {
    pub coins: u64,
    pub elapsed_seconds: u64,
}

fn extract_save(state: &EconomyState) -> SaveData {
    SaveData {
        balance: state.balance,
        total_taps: state.total_taps,
        tap_yield: state.tap_yield,
        tap_upgrade_level: state.tap_upgrade_level,
        tap_upgrade_cost: state.tap_upgrade_cost,
        auto_yield_per_second: state.auto_yield_per_second,
        auto_upgrade_level: state.auto_upgrade_level,
        auto_upgrade_cost: state.auto_upgrade_cost,
        videos_created: state.videos_created,
        videos: state
            .videos
            .iter()
            .map(|v| VideoSave {
                id: v.id,
                title: v.title.clone(),
                reward_coins: v.reward_coins,
            })
            .collect(),
        achievements: state
            .achievements
            .iter()
            .map(|a| AchievementSave {
                id: a.id,
                unlocked: a.unlocked,
            })
            .collect(),
        last_save_ms: state.last_save_ms,
    }
}

/// Restore a save on top of a fresh state. Achievements are matched by id;
/// saved ids with no current definition are ignored.
fn apply_save(state: &mut EconomyState, save: &SaveData) {
    state.balance = save.balance.max(0.0);
    state.total_taps = save.total_taps;
    state.tap_yield = save.tap_yield;
    state.tap_upgrade_level = save.tap_upgrade_level;
    state.tap_upgrade_cost = save.tap_upgrade_cost;
    state.auto_yield_per_second = save.auto_yield_per_second;
    state.auto_upgrade_level = save.auto_upgrade_level;
    state.auto_upgrade_cost = save.auto_upgrade_cost;
    state.videos = save
        .videos
        .iter()
        .map(|v| VideoItem {
            id: v.id,
            title: v.title.clone(),
            reward_coins: v.reward_coins,
        })
        .collect();
    // Older blobs may lack the counter; never let it fall behind the queue.
    let max_id = state.videos.iter().map(|v| v.id).max().unwrap_or(0);
    state.videos_created = save.videos_created.max(max_id);

    for saved in &save.achievements {
        if let Some(a) = state.achievements.iter_mut().find(|a| a.id == saved.id) {
            a.unlocked = saved.unlocked;
        }
    }

    state.production = ProductionState::Idle;
    state.last_save_ms = save.last_save_ms;
}

/// Stamp `state` with `now_ms` and write it to the store.
pub fn save_game(
    state: &mut EconomyState,
    store: &mut dyn SaveStore,
    now_ms: i64,
) -> Result<(), StoreError> {
    state.last_save_ms = now_ms;
    let json = serde_json::to_string(&extract_save(state))
        .map_err(|e| StoreError::PersistenceUnavailable(e.to_string()))?;
    store.write(STORAGE_KEY, &json)
}

/// Read the saved state. `Ok(None)` when nothing was saved; `CorruptSave`
/// when the blob does not parse.
pub fn load_game(
    store: &dyn SaveStore,
    tuning: &Tuning,
) -> Result<Option<EconomyState>, StoreError> {
    let json = match store.read(STORAGE_KEY)? {
        Some(j) => j,
        None => return Ok(None),
    };
    let save: SaveData = serde_json::from_str(&json)?;
    let mut state = EconomyState::new(tuning);
    apply_save(&mut state, &save);
    Ok(Some(state))
}

/// Remove the save blob.
pub fn delete_save(store: &mut dyn SaveStore) -> Result<(), StoreError> {
    store.remove(STORAGE_KEY)
}

/// Offline income for the gap between `last_save_ms` and `now_ms`.
///
/// Nothing is granted without passive income, for a gap under one second or
/// running backwards, or for a gap at or beyond `cap_seconds`.
pub fn offline_grant(
    auto_yield_per_second: u64,
    last_save_ms: i64,
    now_ms: i64,
    cap_seconds: u64,
) -> Option<OfflineGrant> {
    if auto_yield_per_second == 0 {
        return None;
    }
    let elapsed = now_ms.saturating_sub(last_save_ms).div_euclid(1000);
    if elapsed <= 0 || elapsed as u64 >= cap_seconds {
        return None;
    }
    let elapsed_seconds = elapsed as u64;
    Some(OfflineGrant {
        coins: auto_yield_per_second.saturating_mul(elapsed_seconds),
        elapsed_seconds,
    })
}
