use std::{
    io::{self, Write},
    path::PathBuf,
};

use anyhow::Context as _;
use gptris_engine::{HighScores, ScoreFile, ScoreStore as _};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct ScoresArg {
    /// File the final scores are recorded in
    #[clap(long, default_value = ScoreFile::DEFAULT_PATH)]
    score_file: PathBuf,
}

pub(crate) fn run(arg: &ScoresArg) -> anyhow::Result<()> {
    let ScoresArg { score_file } = arg;

    let history = ScoreFile::new(score_file)
        .load()
        .context("Failed to load high scores")?;
    let high_scores = HighScores::new(history);

    let mut stdout = io::stdout().lock();
    write_ranking(&mut stdout, &high_scores).context("Failed to write to stdout")?;
    Ok(())
}

fn write_ranking<W>(writer: &mut W, high_scores: &HighScores) -> io::Result<()>
where
    W: Write,
{
    let ranking = high_scores.ranking();
    if ranking.is_empty() {
        writeln!(writer, "No games recorded yet")?;
        return Ok(());
    }
    for (rank, score) in ranking.iter().enumerate() {
        writeln!(writer, "{}. {score:>8}", rank + 1)?;
    }
    writeln!(writer, "({} games recorded)", high_scores.history().len())?;
    Ok(())
}
