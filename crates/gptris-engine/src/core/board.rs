use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use super::{
    BOARD_HEIGHT, BOARD_WIDTH,
    piece::{Piece, Position},
};

// Full row (all cells occupied)
const FULL_ROW_MASK: u16 = (1 << BOARD_WIDTH) - 1;

/// Single row of the board.
///
/// Stores one row as a bitmask where bit N is set when column N is occupied.
/// Bits above [`BOARD_WIDTH`] are always clear.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BoardRow {
    bits: u16,
}

impl BoardRow {
    pub const EMPTY: Self = Self { bits: 0 };
    pub const FULL: Self = Self {
        bits: FULL_ROW_MASK,
    };

    /// Checks if every cell of the row is occupied.
    #[inline]
    #[must_use]
    pub fn is_filled(self) -> bool {
        self.bits == FULL_ROW_MASK
    }

    #[inline]
    #[must_use]
    pub fn is_empty(self) -> bool {
        self.bits == 0
    }

    /// Checks if the cell at column `col` is occupied.
    #[inline]
    #[must_use]
    pub fn is_occupied(self, col: usize) -> bool {
        col < BOARD_WIDTH && (self.bits & (1 << col)) != 0
    }

    #[inline]
    fn occupy(&mut self, col: usize) {
        debug_assert!(col < BOARD_WIDTH);
        self.bits |= 1 << col;
    }

    /// Iterates over the cells of the row from left to right.
    #[inline]
    pub fn cells(self) -> impl Iterator<Item = bool> {
        (0..BOARD_WIDTH).map(move |col| self.is_occupied(col))
    }
}

impl fmt::Display for BoardRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for occupied in self.cells() {
            f.write_str(if occupied { "#" } else { "." })?;
        }
        Ok(())
    }
}

impl FromStr for BoardRow {
    type Err = ParseBoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut row = Self::EMPTY;
        let mut width = 0;
        for (col, ch) in s.trim().chars().enumerate() {
            match ch {
                '#' if col < BOARD_WIDTH => row.occupy(col),
                '#' | '.' => {}
                _ => return Err(ParseBoardError::InvalidCell(ch)),
            }
            width += 1;
        }
        if width != BOARD_WIDTH {
            return Err(ParseBoardError::RowWidth(width));
        }
        Ok(row)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ParseBoardError {
    #[display("expected {} cells per row, got {_0}", BOARD_WIDTH)]
    RowWidth(#[error(not(source))] usize),
    #[display("expected {} rows, got {_0}", BOARD_HEIGHT)]
    RowCount(#[error(not(source))] usize),
    #[display("invalid cell character {_0:?}, expected '#' or '.'")]
    InvalidCell(#[error(not(source))] char),
}

/// The 10×20 grid of settled cells.
///
/// Each row is a [`BoardRow`] bitmask. Only settled cells live here; the
/// falling piece is tracked separately and written in when it settles.
///
/// # Text form
///
/// A board prints as 20 lines of 10 characters, `#` for an occupied cell
/// and `.` for an empty one, top row first. The same form parses back:
///
/// ```
/// use gptris_engine::Board;
///
/// let board = Board::EMPTY;
/// let text = board.to_string();
/// assert_eq!(text.lines().count(), 20);
/// assert_eq!(text.parse::<Board>().unwrap(), board);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    rows: [BoardRow; BOARD_HEIGHT],
}

impl Default for Board {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl Board {
    pub const EMPTY: Self = Self {
        rows: [BoardRow::EMPTY; BOARD_HEIGHT],
    };

    /// Builds a board from the bottom `rows.len()` rows, top to bottom.
    ///
    /// Rows above the given ones are empty. Useful for setting up positions:
    ///
    /// ```
    /// use gptris_engine::Board;
    ///
    /// let board = Board::from_bottom_rows(&["##########", "#........."]).unwrap();
    /// assert!(board.row(18).is_filled());
    /// assert!(board.row(19).is_occupied(0));
    /// ```
    pub fn from_bottom_rows(rows: &[&str]) -> Result<Self, ParseBoardError> {
        if rows.len() > BOARD_HEIGHT {
            return Err(ParseBoardError::RowCount(rows.len()));
        }
        let mut board = Self::EMPTY;
        let top = BOARD_HEIGHT - rows.len();
        for (y, row) in rows.iter().enumerate() {
            board.rows[top + y] = row.parse()?;
        }
        Ok(board)
    }

    #[must_use]
    pub fn row(&self, row: usize) -> BoardRow {
        self.rows[row]
    }

    /// Returns an iterator over the rows, top first.
    pub fn rows(&self) -> impl Iterator<Item = BoardRow> + '_ {
        self.rows.iter().copied()
    }

    /// Checks whether a board cell is occupied.
    ///
    /// Positions outside the board report `false`.
    #[must_use]
    pub fn is_occupied(&self, position: Position) -> bool {
        match (usize::try_from(position.row), usize::try_from(position.col)) {
            (Ok(row), Ok(col)) if row < BOARD_HEIGHT => self.rows[row].is_occupied(col),
            _ => false,
        }
    }

    /// Checks whether the piece may occupy its current position.
    ///
    /// A cell is rejected when its column is outside `0..10`, when its row
    /// is 20 or more, or when it overlaps an occupied cell. Cells with a
    /// negative row are above the board and are never checked against it.
    #[must_use]
    pub fn is_valid_position(&self, piece: &Piece) -> bool {
        piece.cells().all(|Position { row, col }| {
            let Some(col) = usize::try_from(col).ok().filter(|c| *c < BOARD_WIDTH) else {
                return false;
            };
            match usize::try_from(row) {
                Ok(row) => row < BOARD_HEIGHT && !self.rows[row].is_occupied(col),
                Err(_) => true,
            }
        })
    }

    /// Writes the piece's cells into the board.
    ///
    /// Cells above the top row are dropped.
    pub fn fill_piece(&mut self, piece: &Piece) {
        for Position { row, col } in piece.cells() {
            if let (Ok(row), Ok(col)) = (usize::try_from(row), usize::try_from(col))
                && row < BOARD_HEIGHT
                && col < BOARD_WIDTH
            {
                self.rows[row].occupy(col);
            }
        }
    }

    /// Clears filled lines and returns the number of lines cleared.
    ///
    /// Remaining rows keep their order and move down; empty rows are
    /// inserted at the top.
    pub fn clear_lines(&mut self) -> usize {
        let mut count = 0;
        for y in (0..BOARD_HEIGHT).rev() {
            if self.rows[y].is_filled() {
                count += 1;
                continue;
            }
            if count > 0 {
                self.rows[y + count] = self.rows[y];
            }
        }
        self.rows[..count].fill(BoardRow::EMPTY);
        count
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.rows.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            write!(f, "{row}")?;
        }
        Ok(())
    }
}

impl FromStr for Board {
    type Err = ParseBoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rows: Vec<&str> = s.lines().filter(|line| !line.trim().is_empty()).collect();
        if rows.len() != BOARD_HEIGHT {
            return Err(ParseBoardError::RowCount(rows.len()));
        }
        Self::from_bottom_rows(&rows)
    }
}

impl Serialize for Board {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        // Format: ["..........", "...##.....", ...] (top row first)
        serializer.collect_seq(self.rows.iter().map(ToString::to_string))
    }
}

impl<'de> Deserialize<'de> for Board {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let rows = Vec::<String>::deserialize(deserializer)?;
        if rows.len() != BOARD_HEIGHT {
            return Err(serde::de::Error::custom(ParseBoardError::RowCount(
                rows.len(),
            )));
        }
        let rows: Vec<&str> = rows.iter().map(String::as_str).collect();
        Self::from_bottom_rows(&rows).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use crate::core::piece::{PieceKind, PieceRotation};

    use super::*;

    fn occupy(board: &mut Board, row: usize, col: usize) {
        board.rows[row].occupy(col);
    }

    fn i_piece_at(row: i32, col: i32) -> Piece {
        // Horizontal I: cells at (row + 1, col..col + 4)
        Piece::new(PieceKind::I).with_position(Position::new(row, col))
    }

    #[test]
    fn test_empty_board() {
        let board = Board::EMPTY;
        assert!(board.rows().all(BoardRow::is_empty));
        assert_eq!(board.rows().count(), BOARD_HEIGHT);
    }

    #[test]
    fn test_board_row_is_filled() {
        let mut row = BoardRow::EMPTY;
        for col in 0..BOARD_WIDTH - 1 {
            row.occupy(col);
        }
        assert!(!row.is_filled());
        row.occupy(BOARD_WIDTH - 1);
        assert!(row.is_filled());
        assert_eq!(row, BoardRow::FULL);
    }

    #[test]
    fn test_valid_position_rejects_side_walls() {
        let board = Board::EMPTY;
        assert!(board.is_valid_position(&i_piece_at(0, 0)));
        assert!(board.is_valid_position(&i_piece_at(0, 6)));
        assert!(!board.is_valid_position(&i_piece_at(0, -1)));
        assert!(!board.is_valid_position(&i_piece_at(0, 7)));
    }

    #[test]
    fn test_valid_position_rejects_floor() {
        let board = Board::EMPTY;
        // I cells sit on origin row + 1
        assert!(board.is_valid_position(&i_piece_at(18, 3)));
        assert!(!board.is_valid_position(&i_piece_at(19, 3)));
    }

    #[test]
    fn test_valid_position_allows_cells_above_board() {
        let mut board = Board::EMPTY;
        // Fill the whole top row; cells above it are never checked.
        for col in 0..BOARD_WIDTH {
            occupy(&mut board, 0, col);
        }
        assert!(board.is_valid_position(&i_piece_at(-2, 3)));
        assert!(!board.is_valid_position(&i_piece_at(-1, 3)));

        // Vertical I reaching from row -3 to row 0 overlaps only at row 0
        let vertical = Piece::new(PieceKind::I)
            .with_rotation(PieceRotation::new(1))
            .with_position(Position::new(0, 3));
        assert!(vertical.cells().any(|c| c.row < 0));
        assert!(vertical.cells().any(|c| c.row == 0));
        assert!(!board.is_valid_position(&vertical));
    }

    #[test]
    fn test_valid_position_rejects_overlap() {
        let mut board = Board::EMPTY;
        occupy(&mut board, 10, 5);
        assert!(!board.is_valid_position(&i_piece_at(9, 3)));
        assert!(board.is_valid_position(&i_piece_at(8, 3)));
        assert!(board.is_valid_position(&i_piece_at(9, 6)));
    }

    #[test]
    fn test_valid_position_exhaustive_against_single_cell() {
        let mut board = Board::EMPTY;
        occupy(&mut board, 12, 4);
        for kind in PieceKind::ALL {
            for r in 0..4 {
                for row in -4..24 {
                    for col in -4..14 {
                        let piece = Piece::new(kind)
                            .with_rotation(PieceRotation::new(r))
                            .with_position(Position::new(row, col));
                        let expected = piece.cells().all(|c| {
                            (0..10).contains(&c.col)
                                && c.row < 20
                                && !(c.row == 12 && c.col == 4)
                        });
                        assert_eq!(board.is_valid_position(&piece), expected, "{piece:?}");
                    }
                }
            }
        }
    }

    #[test]
    fn test_fill_piece_skips_cells_above_board() {
        let mut board = Board::EMPTY;
        let vertical = Piece::new(PieceKind::I)
            .with_rotation(PieceRotation::new(1))
            .with_position(Position::new(1, 3));
        // Rotated I cells: column 4, rows -2..=1
        board.fill_piece(&vertical);
        assert!(board.is_occupied(Position::new(0, 4)));
        assert!(board.is_occupied(Position::new(1, 4)));
        assert_eq!(board.rows().filter(|r| !r.is_empty()).count(), 2);
    }

    #[test]
    fn test_clear_lines_none_filled() {
        let mut board = Board::from_bottom_rows(&["#########.", "##.#######"]).unwrap();
        let before = board.clone();
        assert_eq!(board.clear_lines(), 0);
        assert_eq!(board, before);
    }

    #[test]
    fn test_clear_lines_non_adjacent() {
        let mut board = Board::from_bottom_rows(&[
            "#.........",
            "##########",
            ".#........",
            "##########",
            "..#.......",
        ])
        .unwrap();

        assert_eq!(board.clear_lines(), 2);

        let expected =
            Board::from_bottom_rows(&["#.........", ".#........", "..#......."]).unwrap();
        assert_eq!(board, expected);
    }

    #[test]
    fn test_clear_lines_all_filled() {
        let mut board = Board::EMPTY;
        board.rows.fill(BoardRow::FULL);
        assert_eq!(board.clear_lines(), BOARD_HEIGHT);
        assert_eq!(board, Board::EMPTY);
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            "#####".parse::<BoardRow>(),
            Err(ParseBoardError::RowWidth(5))
        );
        assert_eq!(
            "####x#####".parse::<BoardRow>(),
            Err(ParseBoardError::InvalidCell('x'))
        );
        assert_eq!(
            "..........".parse::<Board>(),
            Err(ParseBoardError::RowCount(1))
        );
    }

    #[test]
    fn test_board_serialization() {
        let board = Board::from_bottom_rows(&["##.......#"]).unwrap();
        let json = serde_json::to_value(&board).unwrap();
        let rows = json.as_array().unwrap();
        assert_eq!(rows.len(), BOARD_HEIGHT);
        assert_eq!(rows[0], "..........");
        assert_eq!(rows[19], "##.......#");

        let deserialized: Board = serde_json::from_value(json).unwrap();
        assert_eq!(deserialized, board);
    }
}
