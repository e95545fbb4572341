//! Time sources and fixed-timestep scheduling.
//!
//! Wall-clock time (epoch ms) is only used for save timestamps and the offline
//! catch-up. In-session progress is driven by discrete ticks: [`TickClock`]
//! turns variable frame timestamps into a whole number of 100ms ticks, and
//! each recurring job is a [`PeriodicTask`] that fires every N ticks while
//! armed.

use std::cell::Cell;
use std::rc::Rc;

/// Source of wall-clock time in epoch milliseconds.
pub trait WallClock {
    fn now_ms(&self) -> i64;
}

/// The real clock: `Date.now()` in the browser, `SystemTime` elsewhere.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl WallClock for SystemClock {
    #[cfg(target_arch = "wasm32")]
    fn now_ms(&self) -> i64 {
        js_sys::Date::now() as i64
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn now_ms(&self) -> i64 {
        use std::time::{SystemTime, UNIX_EPOCH};
        match SystemTime::now().duration_since(UNIX_EPOCH) {
            Ok(d) => d.as_millis() as i64,
            // Clock set before 1970.
            Err(e) => -(e.duration().as_millis() as i64),
        }
    }
}

/// A settable clock. Clones share the same instant.
#[derive(Clone, Debug, Default)]
pub struct FixedClock {
    now: Rc<Cell<i64>>,
}

impl FixedClock {
    pub fn at(now_ms: i64) -> Self {
        Self {
            now: Rc::new(Cell::new(now_ms)),
        }
    }

    pub fn set(&self, now_ms: i64) {
        self.now.set(now_ms);
    }

    /// Move the clock by `seconds` (negative goes backward).
    pub fn advance_secs(&self, seconds: i64) {
        self.now.set(self.now.get() + seconds * 1000);
    }
}

impl WallClock for FixedClock {
    fn now_ms(&self) -> i64 {
        self.now.get()
    }
}

/// Fixed-timestep accumulator.
///
/// `draw_web()` calls at ~60fps with variable delta. TickClock converts this
/// into a fixed number of discrete ticks per second, keeping game logic
/// deterministic.
pub struct TickClock {
    /// Milliseconds per tick (e.g. 100ms = 10 ticks/sec)
    ms_per_tick: f64,
    /// Accumulated milliseconds not yet consumed as ticks
    accumulator: f64,
    /// Timestamp of the last update (ms), None if first frame
    last_timestamp: Option<f64>,
}

/// Largest frame delta honoured. Longer gaps (backgrounded tab) are dropped
/// here; the session pays for them from the wall clock.
const MAX_FRAME_DELTA_MS: f64 = 500.0;

impl TickClock {
    pub fn new(ticks_per_sec: u32) -> Self {
        Self {
            ms_per_tick: 1000.0 / ticks_per_sec as f64,
            accumulator: 0.0,
            last_timestamp: None,
        }
    }

    /// Feed a frame timestamp (from `performance.now()` or similar) and get
    /// the number of ticks to process this frame.
    pub fn update(&mut self, now_ms: f64) -> u32 {
        let delta = match self.last_timestamp {
            Some(prev) => (now_ms - prev).clamp(0.0, MAX_FRAME_DELTA_MS),
            None => 0.0,
        };
        self.last_timestamp = Some(now_ms);

        self.accumulator += delta;
        let ticks = (self.accumulator / self.ms_per_tick) as u32;
        self.accumulator -= ticks as f64 * self.ms_per_tick;
        ticks
    }
}

/// A recurring job that fires once every `period` ticks while armed.
///
/// Disarmed tasks ignore ticks entirely, and re-arming starts a fresh period.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PeriodicTask {
    period: u32,
    elapsed: u32,
    armed: bool,
}

impl PeriodicTask {
    /// A disarmed task with the given period (minimum 1 tick).
    pub fn every(period: u32) -> Self {
        Self {
            period: period.max(1),
            elapsed: 0,
            armed: false,
        }
    }

    /// Start the task. No effect if it is already running.
    pub fn arm(&mut self) {
        if !self.armed {
            self.armed = true;
            self.elapsed = 0;
        }
    }

    pub fn cancel(&mut self) {
        self.armed = false;
        self.elapsed = 0;
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /// Consume one tick. Returns true when the task fires.
    pub fn step(&mut self) -> bool {
        if !self.armed {
            return false;
        }
        self.elapsed += 1;
        if self.elapsed >= self.period {
            self.elapsed = 0;
            true
        } else {
            false
        }
    }
}
