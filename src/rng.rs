//! Injectable random source for video rewards.

use std::collections::VecDeque;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Source of reward rolls. Implementations must return a value in
/// `min..=max`.
pub trait RewardRng {
    fn roll(&mut self, min: u64, max: u64) -> u64;
}

/// Seeded ChaCha stream used in normal play.
pub struct ChaChaRewards {
    rng: ChaCha8Rng,
}

impl ChaChaRewards {
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

impl RewardRng for ChaChaRewards {
    fn roll(&mut self, min: u64, max: u64) -> u64 {
        if max <= min {
            return min;
        }
        self.rng.gen_range(min..=max)
    }
}

/// Replays a fixed list of rolls, clamped into range. Falls back to `min`
/// once the script runs out.
#[derive(Debug, Default)]
pub struct ScriptedRewards {
    rolls: VecDeque<u64>,
}

impl ScriptedRewards {
    pub fn new(rolls: impl IntoIterator<Item = u64>) -> Self {
        Self {
            rolls: rolls.into_iter().collect(),
        }
    }
}

impl RewardRng for ScriptedRewards {
    fn roll(&mut self, min: u64, max: u64) -> u64 {
        let max = max.max(min);
        self.rolls.pop_front().unwrap_or(min).clamp(min, max)
    }
}
