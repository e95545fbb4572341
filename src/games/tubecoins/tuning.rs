//! Numeric rules and the injectable tuning table.

use serde::{Deserialize, Serialize};

/// Engine ticks per real-time second (one tick = 100ms).
pub const TICKS_PER_SECOND: u32 = 10;

/// Wall-clock length of one tick.
pub const MS_PER_TICK: i64 = 1_000 / TICKS_PER_SECOND as i64;

/// Passive income fires once per second.
pub const INCOME_PERIOD_TICKS: u32 = TICKS_PER_SECOND;

/// Video production advances every tick.
pub const PRODUCTION_PERIOD_TICKS: u32 = 1;

/// Progress gained per production step, in percent.
pub const PRODUCTION_STEP: u8 = 5;

/// Offline earnings are forfeited once this many seconds have passed.
pub const OFFLINE_CAP_SECONDS: u64 = 86_400;

/// Mid-session catch-up shorter than this is credited without a notice.
pub const CATCH_UP_NOTICE_SECONDS: u64 = 60;

pub const ACHIEVEMENT_REWARD_MULTIPLIER: u64 = 2;
pub const VIDEO_REWARD_MIN: u64 = 10;
pub const VIDEO_REWARD_MAX: u64 = 59;

/// Display data and threshold for one achievement.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AchievementDef {
    pub id: u32,
    pub title: String,
    pub description: String,
    pub target: u64,
}

impl AchievementDef {
    fn new(id: u32, title: &str, description: &str, target: u64) -> Self {
        Self {
            id,
            title: title.into(),
            description: description.into(),
            target,
        }
    }
}

/// Balance knobs that are not structural to the economy.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub achievement_reward_multiplier: u64,
    /// Inclusive bounds of a finished video's reward.
    pub video_reward_min: u64,
    pub video_reward_max: u64,
    pub offline_cap_seconds: u64,
    pub achievements: Vec<AchievementDef>,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            achievement_reward_multiplier: ACHIEVEMENT_REWARD_MULTIPLIER,
            video_reward_min: VIDEO_REWARD_MIN,
            video_reward_max: VIDEO_REWARD_MAX,
            offline_cap_seconds: OFFLINE_CAP_SECONDS,
            achievements: default_achievements(),
        }
    }
}

impl Tuning {
    /// Parse a tuning table from JSON. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let mut tuning: Tuning = serde_json::from_str(json)?;
        tuning.normalize();
        Ok(tuning)
    }

    /// Restore the orderings and bounds the engine relies on.
    pub fn normalize(&mut self) {
        if self.video_reward_min == 0 {
            self.video_reward_min = 1;
        }
        if self.video_reward_max < self.video_reward_min {
            self.video_reward_max = self.video_reward_min;
        }
        self.achievements.retain(|a| a.target > 0);
        self.achievements.sort_by_key(|a| a.id);
        self.achievements.dedup_by_key(|a| a.id);
    }
}

fn default_achievements() -> Vec<AchievementDef> {
    vec![
        AchievementDef::new(1, "Новичок", "Сделай 10 тапов", 10),
        AchievementDef::new(2, "Любитель", "Сделай 100 тапов", 100),
        AchievementDef::new(3, "Блогер", "Сделай 500 тапов", 500),
        AchievementDef::new(4, "Звезда", "Сделай 1000 тапов", 1_000),
        AchievementDef::new(5, "Легенда", "Сделай 5000 тапов", 5_000),
    ]
}
