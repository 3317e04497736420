//! Racket Lift headless demo
//!
//! Plays rounds against the in-memory world with a seeded autopilot holding
//! the device, and prints each round's result.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use racket_lift::platform::headless::{
    AutopilotFeed, HeadlessWorld, HeadlessWorldConfig, RecordingDisplay, RecordingSound,
};
use racket_lift::sim::SimTime;
use racket_lift::{RoundController, Session, Settings, TickResolution};

#[derive(Parser, Debug)]
#[command(name = "racket-lift", about = "Headless Racket Lift rounds")]
struct Args {
    /// Autopilot seed
    #[arg(long, default_value_t = 7)]
    seed: u64,
    /// Number of rounds to play
    #[arg(long, default_value_t = 3)]
    rounds: u32,
    /// Settings JSON file
    #[arg(long)]
    config: Option<PathBuf>,
    /// Give up on a round after this many simulated seconds
    #[arg(long, default_value_t = 120)]
    max_seconds: u64,
    /// Stopwatch resolution (tenths | seconds)
    #[arg(long)]
    resolution: Option<String>,
    /// Largest hand movement per frame (metres)
    #[arg(long, default_value_t = 0.01)]
    wobble: f32,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut settings = match &args.config {
        Some(path) => Settings::load(path),
        None => Settings::default(),
    };
    if let Some(res) = &args.resolution {
        settings.tick_resolution = TickResolution::from_str(res)
            .with_context(|| format!("unknown resolution '{res}'"))?;
    }
    log::info!(
        "Racket Lift (headless) starting: seed={} rounds={} resolution={}",
        args.seed,
        args.rounds,
        settings.tick_resolution.as_str()
    );

    let clips = [settings.contact_clip.clone(), settings.end_clip.clone()];
    let sound = RecordingSound::with_clips(&[clips[0].as_str(), clips[1].as_str()]);
    let controller = RoundController::new(
        settings,
        HeadlessWorld::new(HeadlessWorldConfig::default()),
        RecordingDisplay::new(),
        sound,
    );
    let feed = AutopilotFeed::new(args.seed, args.wobble);
    let mut session = Session::new(feed, controller).context("round setup failed")?;

    let max_time = SimTime::from_millis(args.max_seconds.saturating_mul(1_000));
    for round in 1..=args.rounds {
        match session.run_round(1.0 / 60.0, max_time)? {
            Some(summary) => {
                let display = session.controller().display();
                println!(
                    "Round {round} [{}]\n{}\n",
                    display.timer,
                    display.result.as_deref().unwrap_or_default()
                );
                log::debug!("{summary:?}");
            }
            None => {
                println!(
                    "Round {round}: still airborne after {}s (score {})\n",
                    args.max_seconds,
                    session.controller().round().contact_count
                );
                break;
            }
        }
    }

    Ok(())
}
