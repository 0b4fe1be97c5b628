use std::{path::PathBuf, time::Duration};

use anyhow::Context as _;
use gptris_engine::{GameSession, PieceSeed, RandomPieces, ScoreFile, SpeedSettings};

use crate::{command::play::app::PlayApp, tui::Tui};

mod app;
mod screen;

const DEFAULT_TICK_MS: u64 = 500;
const DEFAULT_FAST_TICK_MS: u64 = 50;

#[derive(Debug, Clone, PartialEq, Eq, clap::Args)]
pub(crate) struct PlayArg {
    /// File the final score of every game is appended to
    #[clap(long, default_value = ScoreFile::DEFAULT_PATH)]
    score_file: PathBuf,
    /// Milliseconds between gravity steps
    #[clap(
        long,
        default_value_t = DEFAULT_TICK_MS,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    tick_ms: u64,
    /// Milliseconds between gravity steps while fast dropping
    #[clap(
        long,
        default_value_t = DEFAULT_FAST_TICK_MS,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    fast_tick_ms: u64,
    /// Seed for the piece sequence, as 32 hexadecimal digits (random if omitted)
    #[clap(long)]
    seed: Option<PieceSeed>,
}

impl Default for PlayArg {
    fn default() -> Self {
        Self {
            score_file: PathBuf::from(ScoreFile::DEFAULT_PATH),
            tick_ms: DEFAULT_TICK_MS,
            fast_tick_ms: DEFAULT_FAST_TICK_MS,
            seed: None,
        }
    }
}

pub(crate) fn run(arg: &PlayArg) -> anyhow::Result<()> {
    let PlayArg {
        score_file,
        tick_ms,
        fast_tick_ms,
        seed,
    } = arg;

    let pieces = seed.map_or_else(RandomPieces::new, RandomPieces::with_seed);
    let seed = pieces.seed();
    let speed_settings = SpeedSettings {
        normal: Duration::from_millis(*tick_ms),
        fast: Duration::from_millis(*fast_tick_ms),
    };
    let session = GameSession::new(pieces, ScoreFile::new(score_file))
        .context("Failed to load high scores")?
        .with_speed_settings(speed_settings);

    let mut app = PlayApp::new(session);
    Tui::new().run(&mut app)?;

    // The terminal is restored at this point
    for message in app.diagnostics() {
        eprintln!("{message}");
    }
    eprintln!("Piece seed: {seed}");
    eprintln!("Scores recorded in {}", score_file.display());
    Ok(())
}
