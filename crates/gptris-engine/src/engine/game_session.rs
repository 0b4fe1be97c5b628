use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{
    CommandError, MoveError, PieceCollisionError,
    core::{
        board::Board,
        piece::{Piece, PieceKind},
    },
};

use super::{
    command::Command,
    drop_speed::{DropSpeed, SpeedSettings},
    game_field::GameField,
    game_stats::GameStats,
    high_scores::{HighScores, ScoreFile, ScoreStore, ScoreStoreError},
    piece_source::{PieceSource, RandomPieces},
    snapshot::Snapshot,
};

#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, derive_more::IsVariant,
)]
pub enum SessionState {
    #[default]
    NotStarted,
    Running,
    GameOver,
}

/// Result of moving the falling piece one row down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum DropOutcome {
    /// The piece moved down one row.
    Moved,
    /// The piece settled and the next piece spawned.
    Settled { cleared_lines: usize },
    /// The piece settled and the next piece did not fit; the game is over.
    BlockedOut { cleared_lines: usize },
}

/// One player's sequence of games.
///
/// The session owns the field, the score and the high-score history, and
/// exposes every operation the input and timer layers need. It never
/// schedules ticks itself: the driver calls [`Self::tick`] every
/// [`Self::tick_interval`].
///
/// # Example
///
/// ```
/// use gptris_engine::{GameSession, MemoryScoreStore, PieceKind, ScriptedPieces};
///
/// let pieces = ScriptedPieces::new([PieceKind::O]);
/// let mut session = GameSession::new(pieces, MemoryScoreStore::default()).unwrap();
/// assert!(session.state().is_not_started());
///
/// session.start().unwrap();
/// assert!(session.state().is_running());
/// assert_eq!(session.stats().score(), 100);
///
/// // Let the piece fall until it settles on the floor
/// while session.tick().unwrap().is_moved() {}
/// assert_eq!(session.stats().score(), 200);
/// ```
#[derive(Debug)]
pub struct GameSession<P = RandomPieces, S = ScoreFile> {
    state: SessionState,
    field: Option<GameField>,
    stats: GameStats,
    drop_speed: DropSpeed,
    speed_settings: SpeedSettings,
    high_scores: HighScores,
    store_error: Option<ScoreStoreError>,
    pieces: P,
    store: S,
}

impl<P, S> GameSession<P, S>
where
    P: PieceSource,
    S: ScoreStore,
{
    /// Creates a session that has not started yet.
    ///
    /// The score history is loaded right away so it can be shown before the
    /// first game.
    pub fn new(pieces: P, mut store: S) -> Result<Self, ScoreStoreError> {
        let high_scores = HighScores::new(store.load()?);
        Ok(Self {
            state: SessionState::NotStarted,
            field: None,
            stats: GameStats::new(),
            drop_speed: DropSpeed::Normal,
            speed_settings: SpeedSettings::default(),
            high_scores,
            store_error: None,
            pieces,
            store,
        })
    }

    #[must_use]
    pub fn with_speed_settings(mut self, speed_settings: SpeedSettings) -> Self {
        self.speed_settings = speed_settings;
        self
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    #[must_use]
    pub fn stats(&self) -> &GameStats {
        &self.stats
    }

    /// The field of the current or last game, `None` before the first start.
    #[must_use]
    pub fn field(&self) -> Option<&GameField> {
        self.field.as_ref()
    }

    #[must_use]
    pub fn falling_piece(&self) -> Option<&Piece> {
        self.field.as_ref().and_then(GameField::falling_piece)
    }

    #[must_use]
    pub fn next_piece(&self) -> Option<PieceKind> {
        self.field.as_ref().map(GameField::next_piece)
    }

    #[must_use]
    pub fn drop_speed(&self) -> DropSpeed {
        self.drop_speed
    }

    /// Current interval between gravity ticks.
    #[must_use]
    pub fn tick_interval(&self) -> Duration {
        self.speed_settings.interval(self.drop_speed)
    }

    #[must_use]
    pub fn high_scores(&self) -> &HighScores {
        &self.high_scores
    }

    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Takes the error of the last failed score append, if any.
    pub fn take_store_error(&mut self) -> Option<ScoreStoreError> {
        self.store_error.take()
    }

    /// Where the falling piece would settle, for the landing preview.
    #[must_use]
    pub fn landing_position(&self) -> Option<Piece> {
        self.field.as_ref().and_then(GameField::landing_position)
    }

    /// Starts a new game, discarding the current one if any.
    ///
    /// The score history is reloaded from the store first; the game does
    /// not start if that fails.
    pub fn start(&mut self) -> Result<(), ScoreStoreError> {
        self.high_scores = HighScores::new(self.store.load()?);
        self.field = Some(GameField::new(self.pieces.next_kind()));
        self.stats = GameStats::new();
        self.drop_speed = DropSpeed::Normal;
        self.store_error = None;
        self.state = SessionState::Running;
        let spawned = self.spawn();
        debug_assert!(spawned.is_ok(), "first piece must fit on an empty board");
        Ok(())
    }

    pub fn try_move_left(&mut self) -> Result<(), MoveError> {
        self.try_shift(Piece::left)
    }

    pub fn try_move_right(&mut self) -> Result<(), MoveError> {
        self.try_shift(Piece::right)
    }

    /// Rotates the falling piece a quarter turn in place, without kicks.
    pub fn try_rotate(&mut self) -> Result<(), MoveError> {
        self.try_shift(Piece::rotated)
    }

    /// Moves the falling piece one row down, settling it when it cannot move.
    ///
    /// Settling writes the piece into the board, restores normal speed,
    /// clears full lines and spawns the next piece.
    pub fn move_down(&mut self) -> Result<DropOutcome, MoveError> {
        let field = self.running_field()?;
        let piece = *field.falling_piece().ok_or(MoveError::NotRunning)?;
        if field.set_falling_piece(piece.down()).is_ok() {
            return Ok(DropOutcome::Moved);
        }

        field.settle_falling_piece();
        self.stats.record_settle();
        self.drop_speed = DropSpeed::Normal;
        let cleared_lines = self.clear_lines();

        match self.spawn() {
            Ok(()) => Ok(DropOutcome::Settled { cleared_lines }),
            Err(PieceCollisionError) => Ok(DropOutcome::BlockedOut { cleared_lines }),
        }
    }

    /// Applies one step of gravity. Same as [`Self::move_down`].
    pub fn tick(&mut self) -> Result<DropOutcome, MoveError> {
        self.move_down()
    }

    /// Switches to fast gravity until the falling piece settles.
    pub fn activate_fast_drop(&mut self) -> Result<(), MoveError> {
        self.running_field()?;
        self.drop_speed = DropSpeed::Fast;
        Ok(())
    }

    pub fn apply(&mut self, command: Command) -> Result<(), CommandError> {
        match command {
            Command::MoveLeft => self.try_move_left()?,
            Command::MoveRight => self.try_move_right()?,
            Command::SoftDrop => {
                self.move_down()?;
            }
            Command::Rotate => self.try_rotate()?,
            Command::FastDrop => self.activate_fast_drop()?,
            Command::Start => self.start()?,
        }
        Ok(())
    }

    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        let falling_piece = self.falling_piece().copied();
        let landing_piece = self.landing_position();
        Snapshot {
            state: self.state,
            score: self.stats.score(),
            drop_speed: self.drop_speed,
            next_piece: self.next_piece(),
            falling_piece,
            board: self
                .field
                .as_ref()
                .map_or(Board::EMPTY, |field| field.board().clone()),
            falling_cells: falling_piece.iter().flat_map(Piece::cells).collect(),
            landing_cells: landing_piece.iter().flat_map(Piece::cells).collect(),
            high_scores: self.high_scores.ranking().to_vec(),
        }
    }

    fn running_field(&mut self) -> Result<&mut GameField, MoveError> {
        if !self.state.is_running() {
            return Err(MoveError::NotRunning);
        }
        self.field.as_mut().ok_or(MoveError::NotRunning)
    }

    fn try_shift<F>(&mut self, shift: F) -> Result<(), MoveError>
    where
        F: FnOnce(&Piece) -> Piece,
    {
        let field = self.running_field()?;
        let piece = shift(field.falling_piece().ok_or(MoveError::NotRunning)?);
        field.set_falling_piece(piece)?;
        Ok(())
    }

    fn clear_lines(&mut self) -> usize {
        let Some(field) = self.field.as_mut() else {
            return 0;
        };
        let cleared_lines = field.clear_lines();
        self.stats.record_cleared_lines(cleared_lines);
        cleared_lines
    }

    /// Spawns the next piece, ending the game on block-out.
    ///
    /// The spawn bonus is awarded either way.
    fn spawn(&mut self) -> Result<(), PieceCollisionError> {
        let following = self.pieces.next_kind();
        self.stats.record_spawn();
        let result = match self.field.as_mut() {
            Some(field) => field.spawn_next(following).map(|_| ()),
            None => Err(PieceCollisionError),
        };
        if result.is_err() {
            self.game_over();
        }
        result
    }

    fn game_over(&mut self) {
        self.state = SessionState::GameOver;
        self.drop_speed = DropSpeed::Normal;
        let score = self.stats.score();
        if let Err(e) = self.store.append(score) {
            self.store_error = Some(e);
        }
        self.high_scores.record(score);
    }
}
