//! Cadence Demo - headless run of the frame loop and state stack
//!
//! Usage:
//!   cadence-demo [--config <loop.toml>] [--rate <steps/s>] [--duration <s>] [--log <filter>]

use anyhow::{Context, Result};
use cadence_core::{ErrorPolicy, LoopConfig};
use cadence_demo::logging::{init_logging, LoggingConfig};
use cadence_demo::{DemoGame, DemoSettings};
use cadence_runtime::{run_host, StackHost};
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "cadence-demo")]
#[command(about = "Cadence demo - a bouncing ball behind a menu, with HUD and pause overlays")]
struct Args {
    /// Loop configuration file (TOML)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Simulation steps per second, overriding the config file
    #[arg(long)]
    rate: Option<f64>,

    /// Largest wall-clock delta banked per frame, in seconds
    #[arg(long)]
    max_frame_time: Option<f64>,

    /// Simulated seconds of gameplay before the demo quits
    #[arg(long, default_value_t = 3.0)]
    duration: f64,

    /// Frame pacing target; 0 runs as fast as possible
    #[arg(long, default_value_t = 60.0)]
    fps: f64,

    /// Report failures as process exit codes instead of errors
    #[arg(long)]
    exit_codes: bool,

    /// Log filter, e.g. "debug" or "cadence_runtime=trace"
    #[arg(long)]
    log: Option<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(LoggingConfig {
        env_filter: args.log.clone(),
        ..Default::default()
    });

    let mut config = match &args.config {
        Some(path) => LoopConfig::load_from_file(path)
            .with_context(|| format!("Failed to load loop config {}", path.display()))?,
        None => LoopConfig::default(),
    };
    if let Some(rate) = args.rate {
        config = config.with_simulation_rate(rate);
    }
    if let Some(max_frame_time) = args.max_frame_time {
        config = config.with_max_frame_time(max_frame_time);
    }
    if args.exit_codes {
        config = config.with_error_policy(ErrorPolicy::ExitCode);
    }

    let settings = DemoSettings {
        play_time: args.duration,
        target_fps: (args.fps > 0.0).then_some(args.fps),
        ..Default::default()
    };

    let mut host = StackHost::new(DemoGame::new(settings));
    let argv: Vec<String> = std::env::args().collect();
    let code = run_host(&mut host, config, &argv).context("Frame loop failed")?;

    println!(
        "Exit code {code} after {} frames ({} bounces, {} pauses)",
        host.game().frames,
        host.game().ball.bounces,
        host.game().pauses
    );
    std::process::exit(code);
}
