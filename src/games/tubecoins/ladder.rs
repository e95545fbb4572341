//! Upgrade ladder: yield and cost progression for both purchase tracks.
//!
//! Each track has a flat "first unlock" step at level 0 followed by a linear
//! regime. The jump at level 0 is intentional and must not be folded into the
//! linear formula.

use serde::{Deserialize, Serialize};

/// The two independent upgrade tracks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Track {
    /// Coins per tap.
    Tap,
    /// Coins per second.
    AutoIncome,
}

impl Track {
    /// Yield before any purchase.
    pub fn base_yield(self) -> u64 {
        match self {
            Track::Tap => 1,
            Track::AutoIncome => 0,
        }
    }

    /// Yield granted by the first purchase.
    pub fn first_yield(self) -> u64 {
        match self {
            Track::Tap => 50,
            Track::AutoIncome => 5,
        }
    }

    /// Yield added by every purchase after the first.
    pub fn yield_step(self) -> u64 {
        match self {
            Track::Tap => 250,
            Track::AutoIncome => 10,
        }
    }

    /// Price of the first purchase.
    pub fn initial_cost(self) -> u64 {
        match self {
            Track::Tap => 500,
            Track::AutoIncome => 800,
        }
    }

    pub fn cost_step(self) -> u64 {
        match self {
            Track::Tap => 500,
            Track::AutoIncome => 700,
        }
    }
}

/// Yield after buying at `level`, given the yield currently in effect.
pub fn next_yield(track: Track, level: u32, current_yield: u64) -> u64 {
    if level == 0 {
        track.first_yield()
    } else {
        current_yield.saturating_add(track.yield_step())
    }
}

/// Price of the following purchase, given the price just paid.
pub fn next_cost(track: Track, current_cost: u64) -> u64 {
    current_cost.saturating_add(track.cost_step())
}
