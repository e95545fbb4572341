//! Video production: a single slot that fills to 100% and drops a publishable
//! video into the queue.

use crate::rng::RewardRng;

use super::state::{EconomyState, ProductionState, VideoItem};
use super::tuning::{Tuning, PRODUCTION_STEP};

/// What a single production step did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    /// Nothing in flight.
    Idle,
    Advanced { progress: u8 },
    Completed(VideoItem),
}

/// Begin a production. Returns false if one is already in flight.
pub fn start(state: &mut EconomyState) -> bool {
    if state.production.is_in_progress() {
        return false;
    }
    state.production = ProductionState::InProgress { progress: 0 };
    true
}

/// Advance the in-flight production by one step. Reaching 100% completes it
/// in the same step: the slot returns to idle and the new video is queued.
pub fn step(state: &mut EconomyState, tuning: &Tuning, rng: &mut dyn RewardRng) -> StepOutcome {
    let progress = match state.production {
        ProductionState::Idle => return StepOutcome::Idle,
        ProductionState::InProgress { progress } => progress,
    };

    let next = progress.saturating_add(PRODUCTION_STEP).min(100);
    if next < 100 {
        state.production = ProductionState::InProgress { progress: next };
        return StepOutcome::Advanced { progress: next };
    }

    state.production = ProductionState::Idle;
    let ordinal = state.videos_created + 1;
    let video = VideoItem {
        id: ordinal,
        title: format!("Video #{}", ordinal),
        reward_coins: rng.roll(tuning.video_reward_min, tuning.video_reward_max),
    };
    state.videos_created = ordinal;
    state.videos.push(video.clone());
    StepOutcome::Completed(video)
}

/// Publish a queued video, crediting its reward. Unknown ids are ignored.
pub fn publish(state: &mut EconomyState, id: u64) -> Option<VideoItem> {
    let idx = state.videos.iter().position(|v| v.id == id)?;
    let video = state.videos.remove(idx);
    state.balance += video.reward_coins as f64;
    Some(video)
}
