//! Player intents and the click/key bindings that produce them.
//!
//! Click action IDs are registered during render and dispatched via
//! `InputEvent::Click`.

use crate::input::InputEvent;

use super::state::EconomyState;

/// Something the player asked for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Intent {
    Tap,
    BuyTapUpgrade,
    BuyAutoIncomeUpgrade,
    StartVideoProduction,
    PublishVideo(u64),
    ResetProgress,
}

// ── Core actions ────────────────────────────────────────────────
pub const TAP: u16 = 0;
pub const BUY_TAP_UPGRADE: u16 = 1;
pub const BUY_AUTO_UPGRADE: u16 = 2;
pub const START_VIDEO: u16 = 3;
pub const RESET_PROGRESS: u16 = 9;

// ── Publish (base + queue index) ────────────────────────────────
pub const PUBLISH_VIDEO_BASE: u16 = 100;

/// Map an input event to an intent. Publishing resolves against the queue as
/// it is right now, so a stale click on a vanished row does nothing.
pub fn intent_for(event: &InputEvent, state: &EconomyState) -> Option<Intent> {
    match event {
        InputEvent::Key(c) => intent_for_key(*c, state),
        InputEvent::Click(id) => intent_for_click(*id, state),
    }
}

fn intent_for_key(key: char, state: &EconomyState) -> Option<Intent> {
    match key {
        ' ' | 't' => Some(Intent::Tap),
        '1' => Some(Intent::BuyTapUpgrade),
        '2' => Some(Intent::BuyAutoIncomeUpgrade),
        'v' => Some(Intent::StartVideoProduction),
        // Oldest finished video first.
        'p' => state.videos.first().map(|v| Intent::PublishVideo(v.id)),
        'R' => Some(Intent::ResetProgress),
        _ => None,
    }
}

fn intent_for_click(id: u16, state: &EconomyState) -> Option<Intent> {
    match id {
        TAP => Some(Intent::Tap),
        BUY_TAP_UPGRADE => Some(Intent::BuyTapUpgrade),
        BUY_AUTO_UPGRADE => Some(Intent::BuyAutoIncomeUpgrade),
        START_VIDEO => Some(Intent::StartVideoProduction),
        RESET_PROGRESS => Some(Intent::ResetProgress),
        id if id >= PUBLISH_VIDEO_BASE => {
            let idx = (id - PUBLISH_VIDEO_BASE) as usize;
            state.videos.get(idx).map(|v| Intent::PublishVideo(v.id))
        }
        _ => None,
    }
}
