pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;

#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("piece colliding when setting falling piece")]
pub struct PieceCollisionError;

/// Rejection of a move, rotation or drop request.
///
/// Rejections never change the session; front-ends usually ignore them.
#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum MoveError {
    #[display("no piece is falling")]
    NotRunning,
    #[display("piece colliding at the requested position")]
    Collision(PieceCollisionError),
}

impl From<PieceCollisionError> for MoveError {
    fn from(err: PieceCollisionError) -> Self {
        MoveError::Collision(err)
    }
}

/// Failure of [`GameSession::apply`].
#[derive(Debug, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum CommandError {
    #[display("{_0}")]
    Move(MoveError),
    #[display("{_0}")]
    Store(ScoreStoreError),
}
