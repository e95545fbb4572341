//! Rolling notice log shown beside the game.

use super::events::GameEvent;
use super::ladder::Track;
use super::logic::{format_duration, format_number};

const MAX_ENTRIES: usize = 50;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FeedEntry {
    pub text: String,
    pub is_important: bool,
}

#[derive(Clone, Debug, Default)]
pub struct Feed {
    pub entries: Vec<FeedEntry>,
}

impl Feed {
    pub fn new() -> Self {
        let mut feed = Self::default();
        feed.add("Добро пожаловать в TubeCoins!", true);
        feed
    }

    pub fn add(&mut self, text: &str, is_important: bool) {
        self.entries.push(FeedEntry {
            text: text.to_string(),
            is_important,
        });
        if self.entries.len() > MAX_ENTRIES {
            self.entries.remove(0);
        }
    }

    /// Append a line for `event`. Taps are too frequent to log.
    pub fn record(&mut self, event: &GameEvent) {
        if let Some(text) = describe(event) {
            self.add(&text, event.is_important());
        }
    }

    pub fn latest(&self, n: usize) -> &[FeedEntry] {
        let start = self.entries.len().saturating_sub(n);
        &self.entries[start..]
    }
}

fn track_name(track: Track) -> &'static str {
    match track {
        Track::Tap => "Сила тапа",
        Track::AutoIncome => "Автодоход",
    }
}

fn describe(event: &GameEvent) -> Option<String> {
    let text = match event {
        GameEvent::TapPulse { .. } => return None,
        GameEvent::UpgradePurchased {
            track,
            level,
            new_yield,
            ..
        } => format!(
            "⬆ {} ур. {} → {}",
            track_name(*track),
            level,
            format_number(*new_yield)
        ),
        GameEvent::InsufficientFunds { track, shortfall } => format!(
            "Не хватает {} монет ({})",
            format_number(*shortfall),
            track_name(*track)
        ),
        GameEvent::VideoStarted => "🎬 Съёмка видео началась".to_string(),
        GameEvent::VideoCompleted {
            title,
            reward_coins,
            ..
        } => format!("✔ {} готово (+{})", title, format_number(*reward_coins)),
        GameEvent::VideoPublished { id, reward_coins, .. } => format!(
            "▶ Video #{} опубликовано: +{}",
            id,
            format_number(*reward_coins)
        ),
        GameEvent::AchievementUnlocked { title, reward, .. } => {
            format!("★ Достижение «{}»: +{}", title, format_number(*reward))
        }
        GameEvent::OfflineEarnings {
            coins,
            elapsed_seconds,
        } => format!(
            "Пока вас не было ({}): +{}",
            format_duration(*elapsed_seconds),
            format_number(*coins)
        ),
        GameEvent::ProgressReset => "Прогресс сброшен".to_string(),
        GameEvent::SaveRestored { balance } => {
            format!("Сохранение восстановлено: {} монет", format_number(*balance))
        }
    };
    Some(text)
}
