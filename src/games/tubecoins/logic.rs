//! TubeCoins economy rules as pure functions over `EconomyState`.

use crate::error::SpendError;

use super::ladder::{self, Track};
use super::state::EconomyState;

/// An achievement that unlocked during an evaluation pass.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Unlock {
    pub id: u32,
    pub title: String,
    pub reward: u64,
}

/// A completed upgrade purchase.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Purchase {
    pub track: Track,
    /// Level after the purchase.
    pub level: u32,
    pub new_yield: u64,
    pub next_cost: u64,
}

/// Grant one tap's worth of coins and re-check achievements.
/// Returns the coins gained and any achievements it unlocked.
pub fn tap(state: &mut EconomyState) -> (u64, Vec<Unlock>) {
    let gained = state.tap_yield;
    state.balance += gained as f64;
    state.total_taps += 1;
    let unlocks = evaluate_achievements(state);
    (gained, unlocks)
}

/// Credit `elapsed_seconds` of passive income. Returns the coins granted.
pub fn accrue_passive_income(state: &mut EconomyState, elapsed_seconds: u64) -> u64 {
    if state.auto_yield_per_second == 0 || elapsed_seconds == 0 {
        return 0;
    }
    let coins = state.auto_yield_per_second.saturating_mul(elapsed_seconds);
    state.balance += coins as f64;
    coins
}

/// Deduct `amount` if the balance covers it; otherwise leave the balance
/// untouched and report how much is missing.
pub fn spend(state: &mut EconomyState, amount: u64) -> Result<(), SpendError> {
    let cost = amount as f64;
    if state.balance < cost {
        let shortfall = (cost - state.balance).ceil() as u64;
        return Err(SpendError::InsufficientFunds {
            shortfall: shortfall.max(1),
        });
    }
    state.balance -= cost;
    Ok(())
}

/// Try to buy the next level on `track`.
pub fn buy_upgrade(state: &mut EconomyState, track: Track) -> Result<Purchase, SpendError> {
    let cost = state.cost_of(track);
    spend(state, cost)?;

    let level_before = state.level(track);
    let new_yield = ladder::next_yield(track, level_before, state.yield_of(track));
    let next_cost = ladder::next_cost(track, cost);
    match track {
        Track::Tap => {
            state.tap_upgrade_level += 1;
            state.tap_yield = new_yield;
            state.tap_upgrade_cost = next_cost;
        }
        Track::AutoIncome => {
            state.auto_upgrade_level += 1;
            state.auto_yield_per_second = new_yield;
            state.auto_upgrade_cost = next_cost;
        }
    }

    Ok(Purchase {
        track,
        level: level_before + 1,
        new_yield,
        next_cost,
    })
}

/// Unlock every locked achievement whose target `total_taps` has reached,
/// crediting its reward. Visits in ascending id; safe to call repeatedly.
pub fn evaluate_achievements(state: &mut EconomyState) -> Vec<Unlock> {
    let taps = state.total_taps;
    let mut unlocks = Vec::new();
    let mut credited = 0u64;

    for achievement in &mut state.achievements {
        if achievement.unlocked || taps < achievement.target {
            continue;
        }
        achievement.unlocked = true;
        let reward = achievement.reward();
        credited = credited.saturating_add(reward);
        unlocks.push(Unlock {
            id: achievement.id,
            title: achievement.title.clone(),
            reward,
        });
    }

    state.balance += credited as f64;
    unlocks
}

/// Format a number with comma separators: 1234567 → "1,234,567".
pub fn format_number(n: u64) -> String {
    let s = n.to_string();
    let mut out = String::with_capacity(s.len() + s.len() / 3);
    for (i, c) in s.chars().enumerate() {
        if i > 0 && (s.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Format a duration as hours and minutes: 3725 → "1ч 2м".
pub fn format_duration(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    if hours > 0 {
        format!("{}ч {}м", hours, minutes)
    } else if minutes > 0 {
        format!("{}м", minutes)
    } else {
        format!("{}с", seconds)
    }
}
