use std::path::PathBuf;

use anyhow::Context as _;
use gptris_engine::{
    Command, CommandError, GameSession, MemoryScoreStore, PieceSeed, PieceSource, RandomPieces,
    ScriptedPieces, Snapshot,
};

use crate::util::Output;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct SimulateArg {
    /// Commands to run after starting, one character each:
    /// l (left), r (right), d (down), u (rotate), f (fast drop), s (restart)
    #[clap(long)]
    commands: String,
    /// Seed for the piece sequence, as 32 hexadecimal digits (random if omitted)
    #[clap(long, conflicts_with = "pieces")]
    seed: Option<PieceSeed>,
    /// Fixed piece sequence such as "IOTSZJL", repeated when exhausted
    #[clap(long)]
    pieces: Option<String>,
    /// Output file path (stdout if omitted)
    #[clap(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &SimulateArg) -> anyhow::Result<()> {
    let SimulateArg {
        commands,
        seed,
        pieces,
        output,
    } = arg;

    let commands = Command::parse_script(commands).context("Invalid command script")?;
    let snapshot = if let Some(pieces) = pieces {
        let pieces = ScriptedPieces::parse(pieces)
            .with_context(|| format!("Invalid piece sequence: {pieces:?}"))?;
        simulate(pieces, &commands)?
    } else {
        let seed = seed.unwrap_or_else(rand::random);
        eprintln!("Piece seed: {seed}");
        simulate(RandomPieces::with_seed(seed), &commands)?
    };

    Output::save_json(&snapshot, output.clone())?;
    Ok(())
}

/// Starts a game, runs `commands` in order and returns the final state.
///
/// Rejected moves are skipped like in interactive play. Scores go to an
/// in-memory store, so the score file is never touched.
fn simulate<P>(pieces: P, commands: &[Command]) -> anyhow::Result<Snapshot>
where
    P: PieceSource,
{
    let mut session = GameSession::new(pieces, MemoryScoreStore::default())?;
    session.start()?;
    for (index, &command) in commands.iter().enumerate() {
        match session.apply(command) {
            Ok(()) | Err(CommandError::Move(_)) => {}
            Err(e @ CommandError::Store(_)) => {
                return Err(e).with_context(|| format!("Command #{index} failed"));
            }
        }
    }
    Ok(session.snapshot())
}
