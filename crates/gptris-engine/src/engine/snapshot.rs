use serde::{Deserialize, Serialize};

use crate::{Board, DropSpeed, Piece, PieceKind, Position, SessionState};

/// Read-only view of a [`GameSession`](crate::GameSession) for renderers
/// and headless drivers.
///
/// Cells above the board (negative rows) are included as-is; renderers
/// skip them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub state: SessionState,
    pub score: u64,
    pub drop_speed: DropSpeed,
    pub next_piece: Option<PieceKind>,
    pub falling_piece: Option<Piece>,
    pub board: Board,
    pub falling_cells: Vec<Position>,
    pub landing_cells: Vec<Position>,
    pub high_scores: Vec<u64>,
}

impl Snapshot {
    /// Whether `position` is covered by the falling piece.
    #[must_use]
    pub fn is_falling_cell(&self, position: Position) -> bool {
        self.falling_cells.contains(&position)
    }

    /// Whether `position` is covered by the landing preview.
    #[must_use]
    pub fn is_landing_cell(&self, position: Position) -> bool {
        self.landing_cells.contains(&position)
    }
}
