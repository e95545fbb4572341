//! TubeCoins: an idle clicker economy with a browser terminal frontend and
//! a headless runner.

pub mod error;
pub mod games;
pub mod input;
pub mod rng;
pub mod store;
pub mod time;
pub mod widgets;
