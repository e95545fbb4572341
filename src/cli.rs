//! Headless runner: loads the save from disk, settles offline earnings,
//! plays a scripted list of steps, and prints a summary.
//!
//! ```text
//! tubecoins --save-dir . tapx20 buy-auto video wait:3 publish
//! ```

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use tubecoins::games::tubecoins::logic::format_number;
use tubecoins::games::tubecoins::tuning::{Tuning, TICKS_PER_SECOND};
use tubecoins::games::tubecoins::{Outcome, Session};
use tubecoins::rng::ChaChaRewards;
use tubecoins::store::FileStore;
use tubecoins::time::{SystemClock, WallClock};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Step {
    Tap(u32),
    BuyTap,
    BuyAuto,
    Video,
    Publish,
    Wait(u64),
    Reset,
}

#[derive(Debug, PartialEq)]
struct Args {
    save_dir: PathBuf,
    tuning: Option<PathBuf>,
    seed: Option<u64>,
    steps: Vec<Step>,
}

fn parse_step(s: &str) -> Result<Step> {
    let step = match s {
        "tap" => Step::Tap(1),
        "buy-tap" => Step::BuyTap,
        "buy-auto" => Step::BuyAuto,
        "video" => Step::Video,
        "publish" => Step::Publish,
        "reset" => Step::Reset,
        _ => {
            if let Some(n) = s.strip_prefix("tapx") {
                Step::Tap(n.parse().with_context(|| format!("bad tap count in {s:?}"))?)
            } else if let Some(secs) = s.strip_prefix("wait:") {
                Step::Wait(secs.parse().with_context(|| format!("bad seconds in {s:?}"))?)
            } else {
                bail!("unknown step {s:?}");
            }
        }
    };
    Ok(step)
}

fn parse_args(args: impl IntoIterator<Item = String>) -> Result<Args> {
    let mut parsed = Args {
        save_dir: PathBuf::from("."),
        tuning: None,
        seed: None,
        steps: Vec::new(),
    };
    let mut it = args.into_iter();
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--save-dir" => {
                parsed.save_dir = it.next().context("--save-dir needs a directory")?.into()
            }
            "--tuning" => parsed.tuning = Some(it.next().context("--tuning needs a file")?.into()),
            "--seed" => {
                let seed = it.next().context("--seed needs a number")?;
                parsed.seed = Some(seed.parse().context("--seed must be an integer")?);
            }
            step => parsed.steps.push(parse_step(step)?),
        }
    }
    Ok(parsed)
}

fn load_tuning(path: Option<&PathBuf>) -> Result<Tuning> {
    let Some(path) = path else {
        return Ok(Tuning::default());
    };
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("reading tuning file {}", path.display()))?;
    Tuning::from_json(&json).with_context(|| format!("parsing tuning file {}", path.display()))
}

fn apply(session: &mut Session, step: Step) {
    let outcome = match step {
        Step::Tap(n) => {
            for _ in 0..n {
                session.tap();
            }
            return;
        }
        Step::BuyTap => session.buy_tap_upgrade(),
        Step::BuyAuto => session.buy_auto_income_upgrade(),
        Step::Video => session.start_video_production(),
        Step::Publish => match session.state().videos.first().map(|v| v.id) {
            Some(id) => session.publish_video(id),
            None => Outcome::Ignored {
                balance: session.state().display_balance(),
            },
        },
        Step::Wait(secs) => {
            let ticks = secs.saturating_mul(TICKS_PER_SECOND as u64);
            session.advance(u32::try_from(ticks).unwrap_or(u32::MAX));
            return;
        }
        Step::Reset => session.reset_progress(),
    };
    info!(?step, ?outcome, "step");
}

pub fn run() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let args = parse_args(std::env::args().skip(1))?;
    let tuning = load_tuning(args.tuning.as_ref())?;
    let seed = args.seed.unwrap_or_else(|| SystemClock.now_ms().unsigned_abs());
    info!(save_dir = %args.save_dir.display(), seed, steps = args.steps.len(), "starting");

    let mut session = Session::open(
        Box::new(FileStore::new(&args.save_dir)),
        Box::new(SystemClock),
        Box::new(ChaChaRewards::from_seed(seed)),
        tuning,
    );
    for step in &args.steps {
        apply(&mut session, *step);
    }
    for event in session.drain_events() {
        info!(?event, "event");
    }
    session.shutdown();

    let state = session.state();
    println!(
        "Balance: {} | tap: +{} (lvl {}) | auto: +{}/s (lvl {}) | taps: {} | videos waiting: {} | achievements: {}/{}",
        format_number(state.display_balance()),
        format_number(state.tap_yield),
        state.tap_upgrade_level,
        format_number(state.auto_yield_per_second),
        state.auto_upgrade_level,
        format_number(state.total_taps),
        state.videos.len(),
        state.unlocked_count(),
        state.achievements.len(),
    );
    Ok(())
}
