//! Game engine logic and state management.
//!
//! This module builds the game rules on top of the core data structures:
//!
//! - [`GameField`] - Board, falling piece and next-piece preview of one game
//! - [`GameSession`] - Session state machine driven by commands and ticks
//! - [`GameStats`] - Score and counters
//! - [`PieceSource`] - Injectable piece selection ([`RandomPieces`], [`ScriptedPieces`])
//! - [`ScoreStore`] - Append-only score history ([`ScoreFile`], [`MemoryScoreStore`])
//! - [`Snapshot`] - Serializable view of a session for renderers
//!
//! # Game Flow
//!
//! 1. [`GameSession::start`] clears the board and spawns the first piece
//! 2. The player moves and rotates the falling piece
//! 3. Every tick moves it down one row; when it cannot move it settles
//! 4. Full lines are cleared and the next piece spawns
//! 5. Repeat until a spawned piece does not fit (block-out), then the final
//!    score is appended to the store
//!
//! # Example
//!
//! ```
//! use gptris_engine::{Command, GameSession, MemoryScoreStore, ScriptedPieces};
//!
//! let pieces = ScriptedPieces::parse("IOTSZJL").unwrap();
//! let mut session = GameSession::new(pieces, MemoryScoreStore::default()).unwrap();
//!
//! for command in Command::parse_script("slluf").unwrap() {
//!     session.apply(command).unwrap();
//! }
//!
//! let snapshot = session.snapshot();
//! assert!(snapshot.state.is_running());
//! assert!(snapshot.drop_speed.is_fast());
//! ```

pub use self::{
    command::*, drop_speed::*, game_field::*, game_session::*, game_stats::*, high_scores::*,
    piece_source::*, snapshot::*,
};

mod command;
mod drop_speed;
mod game_field;
mod game_session;
mod game_stats;
mod high_scores;
mod piece_source;
mod snapshot;
