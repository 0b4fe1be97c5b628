use clap::{Parser, Subcommand};

use self::{play::PlayArg, scores::ScoresArg, simulate::SimulateArg};

mod play;
mod scores;
mod simulate;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// What mode to run the program in (default: play)
    #[command(subcommand)]
    mode: Option<Mode>,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Play in the terminal
    Play(#[clap(flatten)] PlayArg),
    /// Replay a command script without a terminal and print the final state as JSON
    Simulate(#[clap(flatten)] SimulateArg),
    /// Show the high scores
    Scores(#[clap(flatten)] ScoresArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode.unwrap_or(Mode::Play(PlayArg::default())) {
        Mode::Play(arg) => play::run(&arg)?,
        Mode::Simulate(arg) => simulate::run(&arg)?,
        Mode::Scores(arg) => scores::run(&arg)?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory as _;

    use super::*;

    #[test]
    fn test_command_definition() {
        CommandArgs::command().debug_assert();
    }

    #[test]
    fn test_play_is_default() {
        let args = CommandArgs::try_parse_from(["gptris"]).unwrap();
        assert!(args.mode.is_none());
    }

    #[test]
    fn test_play_defaults_match_flags() {
        let args = CommandArgs::try_parse_from(["gptris", "play"]).unwrap();
        let Some(Mode::Play(arg)) = args.mode else {
            panic!("expected play mode");
        };
        assert_eq!(arg, PlayArg::default());
    }

    #[test]
    fn test_simulate_seed_conflicts_with_pieces() {
        let result = CommandArgs::try_parse_from([
            "gptris",
            "simulate",
            "--commands",
            "sdd",
            "--seed",
            "000102030405060708090a0b0c0d0e0f",
            "--pieces",
            "IO",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_seed_is_rejected() {
        let result = CommandArgs::try_parse_from(["gptris", "play", "--seed", "xyz"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_zero_tick_intervals_are_rejected() {
        for flag in ["--tick-ms", "--fast-tick-ms"] {
            let result = CommandArgs::try_parse_from(["gptris", "play", flag, "0"]);
            assert!(result.is_err(), "{flag} 0 was accepted");
        }
        assert!(CommandArgs::try_parse_from(["gptris", "play", "--fast-tick-ms", "1"]).is_ok());
    }
}
