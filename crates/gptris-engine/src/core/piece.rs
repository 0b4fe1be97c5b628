use rand::{Rng, distr::StandardUniform, prelude::Distribution};
use serde::{Deserialize, Serialize};

use super::{BOARD_WIDTH, board::Board};

/// A location on the board.
///
/// Row 0 is the top row and rows grow downward. Coordinates are signed
/// because a piece may sit partly above the board, and rotated piece
/// offsets may be negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub row: i32,
    pub col: i32,
}

impl Position {
    /// Origin of a freshly spawned piece: top row, 4-wide box centered.
    #[expect(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    pub const SPAWN: Self = Self::new(0, (BOARD_WIDTH / 2) as i32 - 2);

    #[must_use]
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    #[must_use]
    pub const fn offset(self, d_row: i32, d_col: i32) -> Self {
        Self::new(self.row + d_row, self.col + d_col)
    }
}

/// A falling piece: its kind, rotation state and origin on the board.
///
/// Pieces are values. Movement and rotation return new `Piece`s and never
/// look at the board; whether the result is allowed is decided by
/// [`Board::is_valid_position`].
///
/// # Example
///
/// ```
/// use gptris_engine::{Piece, PieceKind, Position};
///
/// let piece = Piece::new(PieceKind::T);
/// assert_eq!(piece.position(), Position::SPAWN);
///
/// let moved = piece.right().down();
/// assert_eq!(moved.position(), Position::new(1, 4));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Piece {
    position: Position,
    rotation: PieceRotation,
    kind: PieceKind,
}

impl Serialize for Piece {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        // Format: "kind#rotation@row,col" (e.g., "S#1@4,-1")
        let s = format!(
            "{}#{}@{},{}",
            self.kind.as_char(),
            self.rotation.0,
            self.position.row,
            self.position.col
        );
        serializer.serialize_str(&s)
    }
}

impl<'de> Deserialize<'de> for Piece {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use serde::de::Error as _;

        let s = String::deserialize(deserializer)?;
        let invalid = || D::Error::custom(format!("expected 'kind#rotation@row,col', got '{s}'"));

        let (kind_str, rest) = s.split_once('#').ok_or_else(invalid)?;
        let (rotation_str, position_str) = rest.split_once('@').ok_or_else(invalid)?;
        let (row_str, col_str) = position_str.split_once(',').ok_or_else(invalid)?;

        let mut kind_chars = kind_str.chars();
        let kind = match (kind_chars.next(), kind_chars.next()) {
            (Some(c), None) => PieceKind::from_char(c)
                .ok_or_else(|| D::Error::custom(format!("invalid piece kind: {c}")))?,
            _ => {
                return Err(D::Error::custom(format!(
                    "piece kind must be single character, got '{kind_str}'"
                )));
            }
        };

        let rotation = rotation_str
            .parse::<u8>()
            .ok()
            .filter(|r| *r < 4)
            .map(PieceRotation)
            .ok_or_else(|| D::Error::custom(format!("rotation must be 0-3, got {rotation_str}")))?;

        let row = row_str
            .parse::<i32>()
            .map_err(|e| D::Error::custom(format!("invalid row: {row_str} ({e})")))?;
        let col = col_str
            .parse::<i32>()
            .map_err(|e| D::Error::custom(format!("invalid column: {col_str} ({e})")))?;

        Ok(Piece {
            position: Position::new(row, col),
            rotation,
            kind,
        })
    }
}

impl Piece {
    /// Creates a piece of the given kind at the spawn origin, unrotated.
    #[must_use]
    pub fn new(kind: PieceKind) -> Self {
        Self {
            position: Position::SPAWN,
            rotation: PieceRotation::default(),
            kind,
        }
    }

    #[must_use]
    pub fn with_position(self, position: Position) -> Self {
        Self { position, ..self }
    }

    #[must_use]
    pub fn with_rotation(self, rotation: PieceRotation) -> Self {
        Self { rotation, ..self }
    }

    #[must_use]
    pub fn position(&self) -> Position {
        self.position
    }

    #[must_use]
    pub fn rotation(&self) -> PieceRotation {
        self.rotation
    }

    #[must_use]
    pub fn kind(&self) -> PieceKind {
        self.kind
    }

    /// Absolute board positions of the four cells of this piece.
    pub fn cells(&self) -> impl Iterator<Item = Position> + '_ {
        self.kind
            .offsets(self.rotation)
            .into_iter()
            .map(move |(dx, dy)| self.position.offset(dy, dx))
    }

    #[must_use]
    pub fn left(&self) -> Self {
        self.with_position(self.position.offset(0, -1))
    }

    #[must_use]
    pub fn right(&self) -> Self {
        self.with_position(self.position.offset(0, 1))
    }

    #[must_use]
    pub fn down(&self) -> Self {
        self.with_position(self.position.offset(1, 0))
    }

    /// Turns the piece a quarter turn about its origin.
    ///
    /// No kick is attempted; the caller validates the result.
    #[must_use]
    pub fn rotated(&self) -> Self {
        self.with_rotation(self.rotation.rotated())
    }

    /// Returns the lowest position this piece reaches by falling straight down.
    #[must_use]
    pub fn simulate_drop_position(&self, board: &Board) -> Self {
        let mut dropped = *self;
        while board.is_valid_position(&dropped.down()) {
            dropped = dropped.down();
        }
        dropped
    }
}

/// Rotation state of a piece, one of 0 to 3 quarter turns from spawn.
///
/// Rotation wraps around modulo 4.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PieceRotation(u8);

impl PieceRotation {
    #[must_use]
    pub const fn new(quarter_turns: u8) -> Self {
        Self(quarter_turns % 4)
    }

    #[must_use]
    pub const fn rotated(self) -> Self {
        Self((self.0 + 1) % 4)
    }

    #[must_use]
    pub const fn quarter_turns(self) -> u8 {
        self.0
    }

    const fn as_usize(self) -> usize {
        self.0 as usize
    }
}

/// Enum representing the type of piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[repr(u8)]
pub enum PieceKind {
    /// I-piece.
    I = 0,
    /// O-piece.
    O = 1,
    /// T-piece.
    T = 2,
    /// S-piece.
    S = 3,
    /// Z-piece.
    Z = 4,
    /// J-piece.
    J = 5,
    /// L-piece.
    L = 6,
}

/// Uniform choice among the seven kinds.
impl Distribution<PieceKind> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PieceKind {
        PieceKind::ALL[rng.random_range(0..PieceKind::LEN)]
    }
}

impl PieceKind {
    /// Number of piece types (7).
    pub const LEN: usize = 7;

    pub const ALL: [Self; Self::LEN] = [
        PieceKind::I,
        PieceKind::O,
        PieceKind::T,
        PieceKind::S,
        PieceKind::Z,
        PieceKind::J,
        PieceKind::L,
    ];

    /// Returns the `(column, row)` offsets of the four cells in the given rotation.
    #[must_use]
    pub const fn offsets(self, rotation: PieceRotation) -> PieceOffsets {
        PIECE_OFFSETS[self as usize][rotation.as_usize()]
    }

    /// Returns the single character representation of this piece kind.
    ///
    /// # Examples
    ///
    /// ```
    /// use gptris_engine::PieceKind;
    ///
    /// assert_eq!(PieceKind::I.as_char(), 'I');
    /// assert_eq!(PieceKind::T.as_char(), 'T');
    /// ```
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            PieceKind::I => 'I',
            PieceKind::O => 'O',
            PieceKind::T => 'T',
            PieceKind::S => 'S',
            PieceKind::Z => 'Z',
            PieceKind::J => 'J',
            PieceKind::L => 'L',
        }
    }

    /// Parses a piece kind from a single character, ignoring case.
    ///
    /// # Examples
    ///
    /// ```
    /// use gptris_engine::PieceKind;
    ///
    /// assert_eq!(PieceKind::from_char('I'), Some(PieceKind::I));
    /// assert_eq!(PieceKind::from_char('t'), Some(PieceKind::T));
    /// assert_eq!(PieceKind::from_char('X'), None);
    /// ```
    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'I' => Some(PieceKind::I),
            'O' => Some(PieceKind::O),
            'T' => Some(PieceKind::T),
            'S' => Some(PieceKind::S),
            'Z' => Some(PieceKind::Z),
            'J' => Some(PieceKind::J),
            'L' => Some(PieceKind::L),
            _ => None,
        }
    }
}

/// Cell offsets of a piece as `(column, row)` pairs relative to its origin.
pub type PieceOffsets = [(i32, i32); 4];

/// Generates all 4 rotation states by repeatedly mapping `(x, y)` to `(y, -x)`.
const fn offset_rotations(base: PieceOffsets) -> [PieceOffsets; 4] {
    let mut rotations = [base; 4];
    let mut i = 1;
    while i < 4 {
        let mut j = 0;
        while j < 4 {
            let (x, y) = rotations[i - 1][j];
            rotations[i][j] = (y, -x);
            j += 1;
        }
        i += 1;
    }
    rotations
}

const PIECE_OFFSETS: [[PieceOffsets; 4]; PieceKind::LEN] = [
    // I-piece
    offset_rotations([(0, 1), (1, 1), (2, 1), (3, 1)]),
    // O-piece
    offset_rotations([(1, 0), (2, 0), (1, 1), (2, 1)]),
    // T-piece
    offset_rotations([(1, 0), (0, 1), (1, 1), (2, 1)]),
    // S-piece
    offset_rotations([(1, 0), (2, 0), (0, 1), (1, 1)]),
    // Z-piece
    offset_rotations([(0, 0), (1, 0), (1, 1), (2, 1)]),
    // J-piece
    offset_rotations([(0, 0), (0, 1), (1, 1), (2, 1)]),
    // L-piece
    offset_rotations([(2, 0), (0, 1), (1, 1), (2, 1)]),
];
