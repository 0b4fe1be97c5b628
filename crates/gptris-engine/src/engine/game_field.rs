use crate::{
    PieceCollisionError,
    core::{
        board::Board,
        piece::{Piece, PieceKind},
    },
};

/// Board, falling piece and next-piece preview of one game.
///
/// The field knows nothing about scoring or timing; [`GameSession`]
/// drives it.
///
/// [`GameSession`]: crate::GameSession
#[derive(Debug, Clone)]
pub struct GameField {
    board: Board,
    falling_piece: Option<Piece>,
    next_piece: PieceKind,
}

impl GameField {
    /// Creates an empty field with no falling piece.
    #[must_use]
    pub fn new(next_piece: PieceKind) -> Self {
        Self {
            board: Board::EMPTY,
            falling_piece: None,
            next_piece,
        }
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[cfg(test)]
    pub(crate) fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    #[must_use]
    pub fn falling_piece(&self) -> Option<&Piece> {
        self.falling_piece.as_ref()
    }

    #[must_use]
    pub fn next_piece(&self) -> PieceKind {
        self.next_piece
    }

    #[must_use]
    pub fn is_valid_position(&self, piece: &Piece) -> bool {
        self.board.is_valid_position(piece)
    }

    /// Replaces the falling piece if `piece` fits on the board.
    pub fn set_falling_piece(&mut self, piece: Piece) -> Result<(), PieceCollisionError> {
        if !self.is_valid_position(&piece) {
            return Err(PieceCollisionError);
        }
        self.falling_piece = Some(piece);
        Ok(())
    }

    /// Promotes the next piece to a falling piece at the spawn position and
    /// queues `following` as the new next piece.
    ///
    /// If the spawned piece does not fit, the field is left without a
    /// falling piece and the board is not touched.
    pub fn spawn_next(&mut self, following: PieceKind) -> Result<Piece, PieceCollisionError> {
        let piece = Piece::new(self.next_piece);
        self.next_piece = following;
        if !self.is_valid_position(&piece) {
            self.falling_piece = None;
            return Err(PieceCollisionError);
        }
        self.falling_piece = Some(piece);
        Ok(piece)
    }

    /// Writes the falling piece into the board and removes it.
    ///
    /// Returns the settled piece, or `None` if nothing was falling.
    pub fn settle_falling_piece(&mut self) -> Option<Piece> {
        let piece = self.falling_piece.take()?;
        self.board.fill_piece(&piece);
        Some(piece)
    }

    /// Removes full rows and returns how many were removed.
    pub fn clear_lines(&mut self) -> usize {
        self.board.clear_lines()
    }

    /// Where the falling piece would settle if it kept moving down.
    #[must_use]
    pub fn landing_position(&self) -> Option<Piece> {
        self.falling_piece
            .map(|piece| piece.simulate_drop_position(&self.board))
    }
}

#[cfg(test)]
mod tests {
    use crate::Position;

    use super::*;

    #[test]
    fn test_spawn_promotes_next_piece() {
        let mut field = GameField::new(PieceKind::T);
        assert!(field.falling_piece().is_none());

        let piece = field.spawn_next(PieceKind::S).unwrap();
        assert_eq!(piece.kind(), PieceKind::T);
        assert_eq!(piece.position(), Position::SPAWN);
        assert_eq!(field.falling_piece(), Some(&piece));
        assert_eq!(field.next_piece(), PieceKind::S);
    }

    #[test]
    fn test_spawn_onto_occupied_cells_leaves_board() {
        let mut field = GameField::new(PieceKind::O);
        let mut board = Board::EMPTY;
        board.fill_piece(&Piece::new(PieceKind::I).with_position(Position::new(-1, 3)));
        *field.board_mut() = board.clone();

        assert!(field.spawn_next(PieceKind::L).is_err());
        assert!(field.falling_piece().is_none());
        assert_eq!(field.board(), &board);
        assert_eq!(field.next_piece(), PieceKind::L);
    }

    #[test]
    fn test_set_falling_piece_rejects_invalid() {
        let mut field = GameField::new(PieceKind::I);
        let piece = field.spawn_next(PieceKind::I).unwrap();

        let outside = piece.with_position(Position::new(0, 7));
        assert!(field.set_falling_piece(outside).is_err());
        assert_eq!(field.falling_piece(), Some(&piece));

        let inside = piece.with_position(Position::new(5, 6));
        field.set_falling_piece(inside).unwrap();
        assert_eq!(field.falling_piece(), Some(&inside));
    }

    #[test]
    fn test_settle_and_landing() {
        let mut field = GameField::new(PieceKind::O);
        field.spawn_next(PieceKind::O).unwrap();

        let landing = field.landing_position().unwrap();
        assert_eq!(landing.position(), Position::new(18, 3));

        field.set_falling_piece(landing).unwrap();
        assert_eq!(field.settle_falling_piece(), Some(landing));
        assert!(field.falling_piece().is_none());
        assert!(field.landing_position().is_none());
        assert!(field.board().is_occupied(Position::new(19, 4)));
        assert!(field.board().is_occupied(Position::new(18, 5)));
        assert_eq!(field.settle_falling_piece(), None);
    }
}
