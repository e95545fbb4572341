//! TubeCoins: an idle clicker where taps, upgrades and video production
//! earn coins.
//!
//! [`Session`] owns the economy and everything it talks to: the save store,
//! the wall clock, the reward RNG, and the two recurring jobs (passive income
//! every second, production progress every 100ms). Presentation code feeds it
//! intents and frame ticks and reads back state and events.

pub mod actions;
pub mod events;
pub mod feed;
pub mod game;
pub mod ladder;
pub mod logic;
pub mod production;
pub mod render;
pub mod save;
pub mod state;
pub mod tuning;

use tracing::{debug, info, trace, warn};

use crate::error::StoreError;
use crate::rng::RewardRng;
use crate::store::SaveStore;
use crate::time::{PeriodicTask, WallClock};

use actions::Intent;
use events::GameEvent;
use ladder::Track;
use production::StepOutcome;
use state::{EconomyState, ProductionState};
use tuning::{
    Tuning, CATCH_UP_NOTICE_SECONDS, INCOME_PERIOD_TICKS, MS_PER_TICK, PRODUCTION_PERIOD_TICKS,
};

pub use game::TubeCoinsGame;

/// Result of an intent, with enough for the caller to render feedback.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Applied { balance: u64 },
    /// A guarded no-op (double start, unknown video).
    Ignored { balance: u64 },
    InsufficientFunds { shortfall: u64, balance: u64 },
}

impl Outcome {
    pub fn balance(&self) -> u64 {
        match self {
            Outcome::Applied { balance }
            | Outcome::Ignored { balance }
            | Outcome::InsufficientFunds { balance, .. } => *balance,
        }
    }

    pub fn is_applied(&self) -> bool {
        matches!(self, Outcome::Applied { .. })
    }
}

/// A running game.
pub struct Session {
    state: EconomyState,
    tuning: Tuning,
    store: Box<dyn SaveStore>,
    clock: Box<dyn WallClock>,
    rng: Box<dyn RewardRng>,
    income_task: PeriodicTask,
    production_task: PeriodicTask,
    events: Vec<GameEvent>,
    /// A persisted field changed since the last save.
    dirty: bool,
    /// False while the store has not been read successfully. Nothing is
    /// written until a read succeeds, so a store that recovers mid-session
    /// keeps its save.
    store_synced: bool,
    /// Wall-clock instant that tick time is measured from.
    wall_anchor_ms: i64,
    /// Wall time accounted for since the anchor, by ticks or catch-up.
    covered_ms: i64,
    closed: bool,
}

impl Session {
    /// Load the last save (or start fresh), settle offline earnings, and
    /// start whichever recurring jobs the restored state needs.
    pub fn open(
        mut store: Box<dyn SaveStore>,
        clock: Box<dyn WallClock>,
        rng: Box<dyn RewardRng>,
        mut tuning: Tuning,
    ) -> Self {
        tuning.normalize();

        let mut store_synced = true;
        let state = match save::load_game(store.as_ref(), &tuning) {
            Ok(Some(state)) => {
                info!(
                    balance = state.display_balance(),
                    total_taps = state.total_taps,
                    "restored saved game"
                );
                state
            }
            Ok(None) => {
                info!("no save found, starting fresh");
                EconomyState::new(&tuning)
            }
            Err(StoreError::CorruptSave(reason)) => {
                warn!(%reason, "discarding unreadable save");
                if let Err(e) = save::delete_save(store.as_mut()) {
                    warn!(error = %e, "could not remove unreadable save");
                }
                EconomyState::new(&tuning)
            }
            Err(e) => {
                warn!(error = %e, "save store unavailable, playing in memory");
                store_synced = false;
                EconomyState::new(&tuning)
            }
        };

        let now = clock.now_ms();
        let mut session = Self {
            state,
            tuning,
            store,
            clock,
            rng,
            income_task: PeriodicTask::every(INCOME_PERIOD_TICKS),
            production_task: PeriodicTask::every(PRODUCTION_PERIOD_TICKS),
            events: Vec::new(),
            dirty: false,
            store_synced,
            wall_anchor_ms: now,
            covered_ms: 0,
            closed: false,
        };
        session.reconcile_offline();
        session.sync_tasks();
        session.flush();
        session
    }

    pub fn state(&self) -> &EconomyState {
        &self.state
    }

    pub fn income_running(&self) -> bool {
        self.income_task.is_armed()
    }

    pub fn production_running(&self) -> bool {
        self.production_task.is_armed()
    }

    /// Take all events emitted since the last call.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn dispatch(&mut self, intent: Intent) -> Outcome {
        match intent {
            Intent::Tap => self.tap(),
            Intent::BuyTapUpgrade => self.buy_tap_upgrade(),
            Intent::BuyAutoIncomeUpgrade => self.buy_auto_income_upgrade(),
            Intent::StartVideoProduction => self.start_video_production(),
            Intent::PublishVideo(id) => self.publish_video(id),
            Intent::ResetProgress => self.reset_progress(),
        }
    }

    pub fn tap(&mut self) -> Outcome {
        let (gained, unlocks) = logic::tap(&mut self.state);
        self.events.push(GameEvent::TapPulse {
            gained,
            balance: self.state.display_balance(),
        });
        self.push_unlocks(unlocks);
        self.dirty = true;
        self.finish(true)
    }

    pub fn buy_tap_upgrade(&mut self) -> Outcome {
        self.buy(Track::Tap)
    }

    pub fn buy_auto_income_upgrade(&mut self) -> Outcome {
        self.buy(Track::AutoIncome)
    }

    fn buy(&mut self, track: Track) -> Outcome {
        match logic::buy_upgrade(&mut self.state, track) {
            Ok(p) => {
                info!(?track, level = p.level, new_yield = p.new_yield, "upgrade purchased");
                self.events.push(GameEvent::UpgradePurchased {
                    track,
                    level: p.level,
                    new_yield: p.new_yield,
                    next_cost: p.next_cost,
                    balance: self.state.display_balance(),
                });
                self.dirty = true;
                self.sync_tasks();
                self.finish(true)
            }
            Err(e) => {
                let shortfall = e.shortfall();
                debug!(?track, shortfall, "purchase rejected");
                self.events
                    .push(GameEvent::InsufficientFunds { track, shortfall });
                Outcome::InsufficientFunds {
                    shortfall,
                    balance: self.state.display_balance(),
                }
            }
        }
    }

    pub fn start_video_production(&mut self) -> Outcome {
        if !production::start(&mut self.state) {
            return self.finish(false);
        }
        debug!("video production started");
        self.events.push(GameEvent::VideoStarted);
        self.sync_tasks();
        self.finish(true)
    }

    pub fn publish_video(&mut self, id: u64) -> Outcome {
        let Some(video) = production::publish(&mut self.state, id) else {
            return self.finish(false);
        };
        info!(id, reward = video.reward_coins, "video published");
        self.events.push(GameEvent::VideoPublished {
            id,
            reward_coins: video.reward_coins,
            balance: self.state.display_balance(),
        });
        self.dirty = true;
        self.finish(true)
    }

    /// Wipe the save and start over with every achievement locked.
    pub fn reset_progress(&mut self) -> Outcome {
        match save::delete_save(self.store.as_mut()) {
            Ok(()) => self.store_synced = true,
            Err(e) => warn!(error = %e, "could not remove save during reset"),
        }
        self.state = EconomyState::new(&self.tuning);
        self.dirty = false;
        let now = self.clock.now_ms();
        self.rebase_wall_clock(now);
        self.sync_tasks();
        info!("progress reset");
        self.events.push(GameEvent::ProgressReset);
        Outcome::Applied { balance: 0 }
    }

    /// Run `ticks` 100ms steps of the recurring jobs, then pay passive
    /// income for any wall time the ticks did not cover.
    pub fn advance(&mut self, ticks: u32) {
        for _ in 0..ticks {
            if self.production_task.step() {
                self.step_production();
            }
            if self.income_task.step() {
                let coins = logic::accrue_passive_income(&mut self.state, 1);
                if coins > 0 {
                    trace!(coins, "passive income");
                    self.dirty = true;
                }
            }
        }
        self.covered_ms += i64::from(ticks) * MS_PER_TICK;
        self.catch_up_wall_clock();
        self.flush();
    }

    /// Stop both recurring jobs and write a final snapshot.
    pub fn shutdown(&mut self) {
        self.income_task.cancel();
        self.production_task.cancel();
        self.dirty = true;
        self.flush();
        self.closed = true;
        debug!("session shut down");
    }

    fn step_production(&mut self) {
        match production::step(&mut self.state, &self.tuning, self.rng.as_mut()) {
            StepOutcome::Completed(video) => {
                info!(id = video.id, reward = video.reward_coins, "video completed");
                self.events.push(GameEvent::VideoCompleted {
                    id: video.id,
                    title: video.title,
                    reward_coins: video.reward_coins,
                });
                self.dirty = true;
                self.sync_tasks();
            }
            StepOutcome::Advanced { progress } => trace!(progress, "production step"),
            StepOutcome::Idle => self.sync_tasks(),
        }
    }

    fn reconcile_offline(&mut self) {
        let now = self.clock.now_ms();
        let Some(grant) = save::offline_grant(
            self.state.auto_yield_per_second,
            self.state.last_save_ms,
            now,
            self.tuning.offline_cap_seconds,
        ) else {
            return;
        };
        logic::accrue_passive_income(&mut self.state, grant.elapsed_seconds);
        info!(
            coins = grant.coins,
            elapsed_seconds = grant.elapsed_seconds,
            "offline earnings granted"
        );
        self.events.push(GameEvent::OfflineEarnings {
            coins: grant.coins,
            elapsed_seconds: grant.elapsed_seconds,
        });
        self.dirty = true;
    }

    /// Frames stop while a browser tab is hidden, so the ticks that follow
    /// cover only a fraction of the absence. The missing whole seconds are
    /// paid like offline earnings, with the same cap.
    fn catch_up_wall_clock(&mut self) {
        let now = self.clock.now_ms();
        let covered_until = self.wall_anchor_ms.saturating_add(self.covered_ms);
        let gap = now.saturating_sub(covered_until);
        if (0..1_000).contains(&gap) {
            return;
        }
        let grant = if gap > 0 && self.income_task.is_armed() {
            save::offline_grant(
                self.state.auto_yield_per_second,
                covered_until,
                now,
                self.tuning.offline_cap_seconds,
            )
        } else {
            None
        };
        let Some(grant) = grant else {
            // Clock moved backwards, ticks ran ahead of it, nothing was
            // earning, or the gap is past the cap.
            trace!(gap, "wall clock rebased");
            self.rebase_wall_clock(now);
            return;
        };
        logic::accrue_passive_income(&mut self.state, grant.elapsed_seconds);
        // Bounded by the gap, which already fits in milliseconds.
        self.covered_ms += grant.elapsed_seconds as i64 * 1_000;
        info!(
            coins = grant.coins,
            elapsed_seconds = grant.elapsed_seconds,
            "missed income caught up"
        );
        if grant.elapsed_seconds >= CATCH_UP_NOTICE_SECONDS {
            self.events.push(GameEvent::OfflineEarnings {
                coins: grant.coins,
                elapsed_seconds: grant.elapsed_seconds,
            });
        }
        self.dirty = true;
    }

    fn rebase_wall_clock(&mut self, now: i64) {
        self.wall_anchor_ms = now;
        self.covered_ms = 0;
    }

    /// Arm or cancel each recurring job to match the state.
    fn sync_tasks(&mut self) {
        if self.state.auto_yield_per_second > 0 {
            self.income_task.arm();
        } else {
            self.income_task.cancel();
        }
        match self.state.production {
            ProductionState::InProgress { .. } => self.production_task.arm(),
            ProductionState::Idle => self.production_task.cancel(),
        }
    }

    fn push_unlocks(&mut self, unlocks: Vec<logic::Unlock>) {
        for u in unlocks {
            info!(id = u.id, reward = u.reward, "achievement unlocked");
            self.events.push(GameEvent::AchievementUnlocked {
                id: u.id,
                title: u.title,
                reward: u.reward,
            });
        }
    }

    fn finish(&mut self, applied: bool) -> Outcome {
        self.flush();
        let balance = self.state.display_balance();
        if applied {
            Outcome::Applied { balance }
        } else {
            Outcome::Ignored { balance }
        }
    }

    /// Persist if anything saved has changed. Failures are logged only.
    fn flush(&mut self) {
        if !self.dirty {
            return;
        }
        if !self.store_synced {
            self.resync_store();
            if !self.store_synced || !self.dirty {
                return;
            }
        }
        self.dirty = false;
        let now = self.clock.now_ms();
        if let Err(e) = save::save_game(&mut self.state, self.store.as_mut(), now) {
            warn!(error = %e, "save failed, continuing in memory");
        }
    }

    /// Retry the read that failed at open. A save found there replaces the
    /// in-memory fallback; an empty or unreadable store lets saving resume.
    fn resync_store(&mut self) {
        match save::load_game(self.store.as_ref(), &self.tuning) {
            Ok(Some(saved)) => {
                info!(
                    balance = saved.display_balance(),
                    total_taps = saved.total_taps,
                    "save store back, restoring saved game"
                );
                self.state = saved;
                self.dirty = false;
                self.store_synced = true;
                self.reconcile_offline();
                let now = self.clock.now_ms();
                self.rebase_wall_clock(now);
                self.sync_tasks();
                self.events.push(GameEvent::SaveRestored {
                    balance: self.state.display_balance(),
                });
            }
            Ok(None) => {
                info!("save store back, nothing saved yet");
                self.store_synced = true;
            }
            Err(StoreError::CorruptSave(reason)) => {
                warn!(%reason, "save store back with an unreadable save, overwriting");
                self.store_synced = true;
            }
            Err(e) => debug!(error = %e, "save store still unavailable"),
        }
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        if !self.closed {
            self.shutdown();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::ScriptedRewards;
    use crate::store::MemoryStore;
    use crate::time::FixedClock;

    const T0: i64 = 1_700_000_000_000;

    fn open_with(store: &MemoryStore, clock: &FixedClock, rolls: Vec<u64>) -> Session {
        Session::open(
            Box::new(store.clone()),
            Box::new(clock.clone()),
            Box::new(ScriptedRewards::new(rolls)),
            Tuning::default(),
        )
    }

    fn fresh() -> (Session, MemoryStore, FixedClock) {
        let store = MemoryStore::new();
        let clock = FixedClock::at(T0);
        let session = open_with(&store, &clock, vec![]);
        (session, store, clock)
    }

    #[test]
    fn fresh_session_has_no_timers() {
        let (s, store, _) = fresh();
        assert!(!s.income_running());
        assert!(!s.production_running());
        assert!(store.get(save::STORAGE_KEY).is_none());
    }

    #[test]
    fn tap_saves_immediately() {
        let (mut s, store, _) = fresh();
        let out = s.tap();
        assert_eq!(out, Outcome::Applied { balance: 1 });
        assert!(store.get(save::STORAGE_KEY).is_some());
        assert_eq!(s.state().last_save_ms, T0);
    }

    #[test]
    fn insufficient_funds_reports_shortfall_and_event() {
        let (mut s, _, _) = fresh();
        s.tap();
        s.drain_events();
        let out = s.buy_tap_upgrade();
        assert_eq!(
            out,
            Outcome::InsufficientFunds {
                shortfall: 499,
                balance: 1
            }
        );
        assert_eq!(
            s.drain_events(),
            vec![GameEvent::InsufficientFunds {
                track: Track::Tap,
                shortfall: 499
            }]
        );
    }

    #[test]
    fn buying_auto_income_arms_income_timer() {
        let (mut s, _, _) = fresh();
        s.state.balance = 800.0;
        assert!(s.buy_auto_income_upgrade().is_applied());
        assert!(s.income_running());
        s.advance(10);
        assert_eq!(s.state().display_balance(), 5);
        s.advance(9);
        assert_eq!(s.state().display_balance(), 5);
        s.advance(1);
        assert_eq!(s.state().display_balance(), 10);
    }

    #[test]
    fn production_timer_runs_only_while_in_progress() {
        let store = MemoryStore::new();
        let clock = FixedClock::at(T0);
        let mut s = open_with(&store, &clock, vec![25]);
        assert!(s.start_video_production().is_applied());
        assert!(s.production_running());
        assert!(!s.start_video_production().is_applied());
        s.advance(19);
        assert_eq!(
            s.state().production,
            ProductionState::InProgress { progress: 95 }
        );
        s.advance(1);
        assert_eq!(s.state().production, ProductionState::Idle);
        assert!(!s.production_running());
        assert_eq!(s.state().videos.len(), 1);
        assert_eq!(s.state().videos[0].reward_coins, 25);
    }

    #[test]
    fn publish_credits_and_unknown_is_ignored() {
        let store = MemoryStore::new();
        let clock = FixedClock::at(T0);
        let mut s = open_with(&store, &clock, vec![40]);
        s.start_video_production();
        s.advance(20);
        let id = s.state().videos[0].id;
        assert_eq!(s.publish_video(id), Outcome::Applied { balance: 40 });
        assert_eq!(s.publish_video(id), Outcome::Ignored { balance: 40 });
    }

    #[test]
    fn shutdown_cancels_timers() {
        let (mut s, _, _) = fresh();
        s.state.balance = 800.0;
        s.buy_auto_income_upgrade();
        s.start_video_production();
        s.shutdown();
        assert!(!s.income_running());
        assert!(!s.production_running());
        let before = s.state().clone();
        s.advance(100);
        assert_eq!(s.state().balance, before.balance);
        assert_eq!(s.state().production, before.production);
    }

    fn with_auto_income(s: &mut Session) {
        s.state.balance = 800.0;
        assert!(s.buy_auto_income_upgrade().is_applied());
        s.drain_events();
    }

    #[test]
    fn hidden_tab_gap_is_paid_on_next_frame() {
        let (mut s, _, clock) = fresh();
        with_auto_income(&mut s);

        clock.advance_secs(600);
        s.advance(5);

        // The five ticks cover half a second; the other 599 are caught up.
        assert_eq!(s.state().display_balance(), 2_995);
        assert_eq!(
            s.drain_events(),
            vec![GameEvent::OfflineEarnings {
                coins: 2_995,
                elapsed_seconds: 599
            }]
        );
        assert_eq!(s.state().last_save_ms, T0 + 600_000);

        // The income period that began before the gap still completes.
        s.advance(5);
        assert_eq!(s.state().display_balance(), 3_000);
        assert!(s.drain_events().is_empty());
    }

    #[test]
    fn short_catch_up_is_silent() {
        let (mut s, _, clock) = fresh();
        with_auto_income(&mut s);

        clock.advance_secs(3);
        s.advance(1);

        assert_eq!(s.state().display_balance(), 10);
        assert!(s.drain_events().is_empty());
    }

    #[test]
    fn ticks_in_step_with_the_clock_are_not_paid_twice() {
        let (mut s, _, clock) = fresh();
        with_auto_income(&mut s);

        for _ in 0..30 {
            clock.advance_secs(1);
            s.advance(10);
        }

        assert_eq!(s.state().display_balance(), 150);
    }

    #[test]
    fn gap_past_the_cap_is_forfeited() {
        let (mut s, _, clock) = fresh();
        with_auto_income(&mut s);

        clock.advance_secs(90_000);
        s.advance(1);
        assert_eq!(s.state().display_balance(), 0);

        // Later frames measure from the new instant.
        clock.advance_secs(3);
        s.advance(1);
        assert_eq!(s.state().display_balance(), 10);
    }

    #[test]
    fn gap_before_buying_auto_income_is_not_paid() {
        let (mut s, _, clock) = fresh();
        clock.advance_secs(600);
        s.advance(1);

        with_auto_income(&mut s);
        s.advance(1);

        assert_eq!(s.state().display_balance(), 0);
    }

    #[test]
    fn unavailable_store_is_not_written_until_read() {
        let store = MemoryStore::new();
        let clock = FixedClock::at(T0);
        let mut first = open_with(&store, &clock, vec![]);
        for _ in 0..200 {
            first.tap();
        }
        drop(first);

        store.set_offline(true);
        let mut s = open_with(&store, &clock, vec![]);
        assert_eq!(s.state().total_taps, 0);
        s.tap();

        store.set_offline(false);
        s.tap();

        assert_eq!(s.state().total_taps, 200);
        assert!(s
            .drain_events()
            .iter()
            .any(|e| matches!(e, GameEvent::SaveRestored { .. })));
        drop(s);
        let reopened = open_with(&store, &clock, vec![]);
        assert_eq!(reopened.state().total_taps, 200);
    }

    #[test]
    fn dropping_session_writes_final_snapshot() {
        let (mut s, store, _) = fresh();
        s.start_video_production();
        assert!(store.get(save::STORAGE_KEY).is_none());

        drop(s);

        assert!(store.get(save::STORAGE_KEY).is_some());
    }

    #[test]
    fn reset_wipes_save_and_state() {
        let (mut s, store, _) = fresh();
        for _ in 0..10 {
            s.tap();
        }
        s.drain_events();
        s.reset_progress();
        assert!(store.get(save::STORAGE_KEY).is_none());
        assert_eq!(s.state().total_taps, 0);
        assert_eq!(s.state().unlocked_count(), 0);
        assert_eq!(s.drain_events(), vec![GameEvent::ProgressReset]);
    }

    #[test]
    fn dispatch_routes_intents() {
        let (mut s, _, _) = fresh();
        s.dispatch(Intent::Tap);
        s.dispatch(Intent::StartVideoProduction);
        assert_eq!(s.state().total_taps, 1);
        assert!(s.production_running());
    }
}
