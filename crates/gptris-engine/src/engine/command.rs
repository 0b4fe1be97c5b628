use serde::{Deserialize, Serialize};

/// Discrete inputs accepted by a [`GameSession`](crate::GameSession).
///
/// Each command has a one-character script form used by headless drivers:
///
/// | command | char |
/// |---------|------|
/// | `MoveLeft` | `l` |
/// | `MoveRight` | `r` |
/// | `SoftDrop` | `d` |
/// | `Rotate` | `u` |
/// | `FastDrop` | `f` |
/// | `Start` | `s` |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    MoveLeft,
    MoveRight,
    /// Moves the piece one row down, settling it when it cannot move.
    /// Timer ticks take the same path.
    SoftDrop,
    Rotate,
    /// Switches to fast gravity until the piece settles.
    FastDrop,
    /// Starts a new game, discarding the current one.
    Start,
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("unknown command {found:?} at position {position}")]
pub struct ParseCommandError {
    found: char,
    position: usize,
}

impl Command {
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            Command::MoveLeft => 'l',
            Command::MoveRight => 'r',
            Command::SoftDrop => 'd',
            Command::Rotate => 'u',
            Command::FastDrop => 'f',
            Command::Start => 's',
        }
    }

    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_lowercase() {
            'l' => Some(Command::MoveLeft),
            'r' => Some(Command::MoveRight),
            'd' => Some(Command::SoftDrop),
            'u' => Some(Command::Rotate),
            'f' => Some(Command::FastDrop),
            's' => Some(Command::Start),
            _ => None,
        }
    }

    /// Parses a command script such as `"llu dddd"`, ignoring whitespace.
    ///
    /// ```
    /// use gptris_engine::Command;
    ///
    /// let script = Command::parse_script("lr d").unwrap();
    /// assert_eq!(script, [Command::MoveLeft, Command::MoveRight, Command::SoftDrop]);
    /// assert!(Command::parse_script("lx").is_err());
    /// ```
    pub fn parse_script(script: &str) -> Result<Vec<Self>, ParseCommandError> {
        script
            .chars()
            .enumerate()
            .filter(|(_, c)| !c.is_whitespace())
            .map(|(position, found)| {
                Self::from_char(found).ok_or(ParseCommandError { found, position })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_char_round_trip() {
        for command in [
            Command::MoveLeft,
            Command::MoveRight,
            Command::SoftDrop,
            Command::Rotate,
            Command::FastDrop,
            Command::Start,
        ] {
            assert_eq!(Command::from_char(command.as_char()), Some(command));
        }
    }

    #[test]
    fn test_parse_script_reports_position() {
        let err = Command::parse_script("ll\ndq").unwrap_err();
        assert_eq!(err, ParseCommandError { found: 'q', position: 4 });
        assert_eq!(err.to_string(), "unknown command 'q' at position 4");
    }
}
