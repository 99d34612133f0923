//! StretchFlow - guided stretching in the terminal
//!
//! Reads pose frames from a recording or a simulated performer, drives the
//! session state machine once per frame and renders the result.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::thread;
use stretchflow::app::App;
use stretchflow::cli::{Command, HeadlessRenderer, InputHandler, Renderer, TerminalDisplay};
use stretchflow::session::{SessionConfig, SessionController, Timestamp};
use stretchflow::source::{FrameRecorder, PoseSource, ReplaySource, SimulatedPerformer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "stretchflow")]
#[command(about = "Guided stretching session driven by body-pose input")]
struct Args {
    /// Session config (JSON); stock routine when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Seconds to hold each stretch (overrides the config)
    #[arg(short, long)]
    timer: Option<u64>,

    /// Dropped frames tolerated during a hold (overrides the config)
    #[arg(long)]
    grace_frames: Option<u32>,

    /// Replay recorded frames (JSON lines) instead of simulating
    #[arg(short, long)]
    replay: Option<PathBuf>,

    /// Record every processed frame to this file (JSON lines)
    #[arg(long)]
    record: Option<PathBuf>,

    /// Seed for the simulated performer
    #[arg(long, default_value = "42")]
    seed: u64,

    /// Probability that a simulated frame has no detected pose
    #[arg(long, default_value = "0.0")]
    dropout: f64,

    /// Maximum per-axis landmark noise for the simulated performer
    #[arg(long, default_value = "0.004")]
    jitter: f32,

    /// Simulated frame rate
    #[arg(long, default_value = "30")]
    fps: u32,

    /// Process frames as fast as possible instead of in real time
    #[arg(long)]
    fast: bool,

    /// Log views instead of drawing them
    #[arg(long)]
    headless: bool,

    /// Skip the home screen and begin aligning immediately
    #[arg(long)]
    autostart: bool,

    /// Exit after the first completed session
    #[arg(long)]
    once: bool,

    /// Stop after this many frames
    #[arg(long)]
    max_frames: Option<u64>,
}

/// Initialize tracing on stderr so stdout stays with the display
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "stretchflow=info".into()),
    );
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn load_config(args: &Args) -> Result<SessionConfig> {
    let mut config = match &args.config {
        Some(path) => SessionConfig::load(path)
            .with_context(|| format!("failed to load session config {}", path.display()))?,
        None => SessionConfig::default(),
    };
    if let Some(secs) = args.timer {
        config.hold_ms = secs.saturating_mul(1000);
    }
    if let Some(grace) = args.grace_frames {
        config.grace_frames = grace;
    }
    Ok(config)
}

fn open_source(args: &Args) -> Result<Box<dyn PoseSource>> {
    match &args.replay {
        Some(path) => {
            let source = ReplaySource::open(path)
                .with_context(|| format!("failed to open recording {}", path.display()))?;
            info!(path = %path.display(), "replaying recorded frames");
            Ok(Box::new(source))
        }
        None => {
            info!(
                seed = args.seed,
                fps = args.fps,
                dropout = args.dropout,
                jitter = args.jitter,
                "simulating performer"
            );
            Ok(Box::new(
                SimulatedPerformer::new(args.seed, args.fps)
                    .with_dropout(args.dropout)
                    .with_jitter(args.jitter),
            ))
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing();

    let config = load_config(&args)?;
    let exercises = config.exercises.len();
    let controller = SessionController::new(config).context("invalid session configuration")?;
    let mut app = App::new(controller);
    if args.autostart {
        app.start();
    }

    let mut source = open_source(&args)?;
    let mut recorder = match &args.record {
        Some(path) => Some(
            FrameRecorder::create(path)
                .with_context(|| format!("failed to create recording {}", path.display()))?,
        ),
        None => None,
    };

    let input = if args.headless {
        None
    } else {
        InputHandler::enable_raw_mode()?;
        Some(InputHandler::new())
    };
    let mut renderer: Box<dyn Renderer> = if args.headless {
        Box::new(HeadlessRenderer::new())
    } else {
        Box::new(TerminalDisplay::fullscreen()?)
    };

    info!(exercises, "StretchFlow ready");

    let mut frames: u64 = 0;
    let mut last_at: Option<Timestamp> = None;

    // Frame loop
    'frames: loop {
        if let Some(input) = &input {
            match input.read_command()? {
                Some(Command::Quit) => break 'frames,
                Some(Command::Start) => app.start(),
                Some(Command::Home) => app.go_home(),
                None => {}
            }
        }

        source.cue(app.cue());
        let Some(frame) = source.next_frame()? else {
            info!("frame source exhausted");
            break 'frames;
        };

        if !args.fast {
            if let Some(prev) = last_at {
                thread::sleep(frame.at.saturating_since(prev));
            }
        }
        last_at = Some(frame.at);

        if let Some(recorder) = recorder.as_mut() {
            recorder.record(&frame)?;
        }

        let view = app.frame(&frame);
        renderer.render(&view)?;
        frames += 1;

        if args.once && app.completed() > 0 {
            break 'frames;
        }
        if args.max_frames.is_some_and(|max| frames >= max) {
            break 'frames;
        }
    }

    // Cleanup
    renderer.shutdown()?;
    if input.is_some() {
        InputHandler::disable_raw_mode()?;
    }
    if let Some(recorder) = recorder.as_mut() {
        recorder.flush()?;
        info!(frames = recorder.written(), "recording saved");
    }

    println!(
        "Sessions completed: {} | frames processed: {}",
        app.completed(),
        frames
    );

    Ok(())
}
