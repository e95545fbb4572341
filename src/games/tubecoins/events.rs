//! Events emitted to the presentation layer.
//!
//! Each carries only the numbers needed for display. Wording and styling
//! belong to whoever renders them.

use super::ladder::Track;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GameEvent {
    /// A tap landed.
    TapPulse { gained: u64, balance: u64 },
    UpgradePurchased {
        track: Track,
        level: u32,
        new_yield: u64,
        next_cost: u64,
        balance: u64,
    },
    InsufficientFunds { track: Track, shortfall: u64 },
    VideoStarted,
    VideoCompleted {
        id: u64,
        title: String,
        reward_coins: u64,
    },
    VideoPublished {
        id: u64,
        reward_coins: u64,
        balance: u64,
    },
    AchievementUnlocked { id: u32, title: String, reward: u64 },
    OfflineEarnings { coins: u64, elapsed_seconds: u64 },
    ProgressReset,
    /// The store came back after failing at open and its save replaced the
    /// in-memory fallback.
    SaveRestored { balance: u64 },
}

impl GameEvent {
    /// Whether the event deserves a highlighted notice rather than a plain line.
    pub fn is_important(&self) -> bool {
        matches!(
            self,
            GameEvent::UpgradePurchased { .. }
                | GameEvent::VideoCompleted { .. }
                | GameEvent::AchievementUnlocked { .. }
                | GameEvent::OfflineEarnings { .. }
                | GameEvent::SaveRestored { .. }
        )
    }
}
