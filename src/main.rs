//! Pool Playback entry point
//!
//! Headless native driver: plays a recorded shot log, or auto-plays
//! synthetic strikes on a racked table, and prints where every ball settles.

use std::path::PathBuf;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Result;
use clap::Parser;

use pool_playback::consts::CUE_BALL;
use pool_playback::replay::ShotLog;
use pool_playback::sim::{BallId, ShotPlayer, ShotSource, TickOutcome};
use pool_playback::synth::StrikeSource;
use pool_playback::{BallRenderState, RackLayout, Settings};

#[derive(Parser, Debug)]
#[command(name = "pool-playback")]
#[command(about = "Replay billiards shots from sparse physics events", long_about = None)]
struct Args {
    /// Settings file (JSON); defaults are used if missing
    #[arg(long, default_value = "pool-playback.json")]
    settings: PathBuf,

    /// Shot log to replay instead of synthetic strikes
    #[arg(long)]
    replay: Option<PathBuf>,

    /// Stop after this many wall-clock seconds
    #[arg(long, default_value_t = 30.0)]
    seconds: f64,

    /// Seed for synthetic strikes
    #[arg(long, default_value_t = 0xB411)]
    seed: u64,

    /// Number of synthetic strikes
    #[arg(long, default_value_t = 3)]
    shots: usize,

    /// Base heading of synthetic strikes (degrees)
    #[arg(long, default_value_t = 90.0)]
    heading: f64,

    /// Starting layout for synthetic strikes: full, one-ball or two-ball
    #[arg(long, default_value = "full", value_parser = parse_layout)]
    layout: RackLayout,
}

fn parse_layout(s: &str) -> Result<RackLayout, String> {
    RackLayout::from_str(s).ok_or_else(|| format!("unknown layout '{}'", s))
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    log::info!("Pool Playback (native) starting...");

    let settings = Settings::load(&args.settings);

    let (mut player, mut source): (ShotPlayer, Box<dyn ShotSource>) = match &args.replay {
        Some(path) => {
            let shot_log = ShotLog::load(path)?;
            let player = shot_log.player(settings.effective_speed_factor());
            let source: Box<dyn ShotSource> = Box::new(shot_log.into_source());
            (player, source)
        }
        None => {
            let player = ShotPlayer::from_settings(&settings, settings.table.layout(args.layout));
            let source: Box<dyn ShotSource> = Box::new(
                StrikeSource::new(args.seed, settings.table, CUE_BALL, args.heading, 2.0)
                    .with_jitter(10.0)
                    .with_limit(args.shots),
            );
            (player, source)
        }
    };

    run(&mut player, source.as_mut(), &settings, args.seconds);
    Ok(())
}

/// Wall-clock pause between shots when auto-play is off
const SETTLE_PAUSE: f64 = 1.0;

/// Drive the player at the configured frame rate until there is nothing left
/// to play or the time budget is spent. Each shot is requested only once the
/// previous one has settled, so it starts from where the balls came to rest.
fn run(player: &mut ShotPlayer, source: &mut dyn ShotSource, settings: &Settings, budget: f64) {
    let frame = Duration::from_secs_f64(settings.frame_interval());
    let clock = Instant::now();
    let mut frames: u64 = 0;
    let mut settled = 0;
    let mut resume_at = 0.0;

    loop {
        let now = clock.elapsed().as_secs_f64();
        if now > budget {
            log::warn!("Time budget of {:.1}s spent, stopping", budget);
            player.cancel();
            break;
        }

        let outcome = if now >= resume_at {
            player.tick_with(now, source)
        } else {
            player.tick(now)
        };

        match outcome {
            TickOutcome::Exhausted => break,
            TickOutcome::Settled => {
                settled += 1;
                println!("Shot {} settled after {} frames:", settled, frames);
                for (id, ball) in player.render_states() {
                    print_ball(*id, ball);
                }
                if !settings.auto_play {
                    resume_at = now + SETTLE_PAUSE;
                }
            }
            TickOutcome::Idle | TickOutcome::Playing { .. } => {}
        }

        frames += 1;
        thread::sleep(frame);
    }

    log::info!("Played {} shots in {} frames", settled, frames);
}

fn print_ball(id: BallId, ball: &BallRenderState) {
    println!(
        "  ball {:>2}: ({:.4}, {:.4}) {}",
        id,
        ball.position.x,
        ball.position.y,
        ball.state.as_str()
    );
}
