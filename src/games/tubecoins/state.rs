//! TubeCoins economy state definitions.

use super::ladder::Track;
use super::tuning::{AchievementDef, Tuning};

/// A finished video waiting to be published.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VideoItem {
    pub id: u64,
    pub title: String,
    pub reward_coins: u64,
}

/// The single production slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ProductionState {
    #[default]
    Idle,
    /// Progress in percent, 0..=100.
    InProgress { progress: u8 },
}

impl ProductionState {
    pub fn is_in_progress(&self) -> bool {
        matches!(self, ProductionState::InProgress { .. })
    }

    pub fn progress(&self) -> Option<u8> {
        match self {
            ProductionState::Idle => None,
            ProductionState::InProgress { progress } => Some(*progress),
        }
    }
}

/// A one-way unlock tied to a cumulative tap threshold.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Achievement {
    pub id: u32,
    pub title: String,
    pub description: String,
    pub target: u64,
    pub unlocked: bool,
    pub reward_multiplier: u64,
}

impl Achievement {
    pub fn from_def(def: &AchievementDef, reward_multiplier: u64) -> Self {
        Self {
            id: def.id,
            title: def.title.clone(),
            description: def.description.clone(),
            target: def.target,
            unlocked: false,
            reward_multiplier,
        }
    }

    /// Coins credited when this achievement unlocks.
    pub fn reward(&self) -> u64 {
        self.target.saturating_mul(self.reward_multiplier)
    }
}

/// Full state of a TubeCoins game.
#[derive(Clone, Debug, PartialEq)]
pub struct EconomyState {
    /// Coin balance. Fractional internally, floored for display.
    pub balance: f64,
    /// Coins granted per tap.
    pub tap_yield: u64,
    pub tap_upgrade_level: u32,
    /// Price of the next tap upgrade.
    pub tap_upgrade_cost: u64,
    /// Coins granted per second of passive income.
    pub auto_yield_per_second: u64,
    pub auto_upgrade_level: u32,
    /// Price of the next auto-income upgrade.
    pub auto_upgrade_cost: u64,
    /// Manual taps ever made. Never decremented.
    pub total_taps: u64,
    /// Videos ever produced, published or not.
    pub videos_created: u64,
    /// Completed videos in completion order.
    pub videos: Vec<VideoItem>,
    /// Fixed set, ascending by id.
    pub achievements: Vec<Achievement>,
    pub production: ProductionState,
    /// Epoch milliseconds of the last persisted snapshot.
    pub last_save_ms: i64,
}

impl EconomyState {
    pub fn new(tuning: &Tuning) -> Self {
        let mut achievements: Vec<Achievement> = tuning
            .achievements
            .iter()
            .map(|d| Achievement::from_def(d, tuning.achievement_reward_multiplier))
            .collect();
        achievements.sort_by_key(|a| a.id);

        Self {
            balance: 0.0,
            tap_yield: Track::Tap.base_yield(),
            tap_upgrade_level: 0,
            tap_upgrade_cost: Track::Tap.initial_cost(),
            auto_yield_per_second: Track::AutoIncome.base_yield(),
            auto_upgrade_level: 0,
            auto_upgrade_cost: Track::AutoIncome.initial_cost(),
            total_taps: 0,
            videos_created: 0,
            videos: Vec::new(),
            achievements,
            production: ProductionState::Idle,
            last_save_ms: 0,
        }
    }

    /// Balance as shown to the player.
    pub fn display_balance(&self) -> u64 {
        self.balance.max(0.0).floor() as u64
    }

    pub fn level(&self, track: Track) -> u32 {
        match track {
            Track::Tap => self.tap_upgrade_level,
            Track::AutoIncome => self.auto_upgrade_level,
        }
    }

    pub fn yield_of(&self, track: Track) -> u64 {
        match track {
            Track::Tap => self.tap_yield,
            Track::AutoIncome => self.auto_yield_per_second,
        }
    }

    pub fn cost_of(&self, track: Track) -> u64 {
        match track {
            Track::Tap => self.tap_upgrade_cost,
            Track::AutoIncome => self.auto_upgrade_cost,
        }
    }

    pub fn unlocked_count(&self) -> usize {
        self.achievements.iter().filter(|a| a.unlocked).count()
    }
}
