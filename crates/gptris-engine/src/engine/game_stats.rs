/// Points awarded every time a piece spawns.
pub const SPAWN_BONUS: u64 = 100;

/// Points awarded per cleared line. Simultaneous clears are not multiplied.
pub const LINE_CLEAR_BONUS: u64 = 500;

/// Game statistics tracking score, lines cleared, and piece count.
///
/// # Scoring
///
/// - Each spawned piece is worth [`SPAWN_BONUS`], including a spawn that
///   ends the game.
/// - Each cleared line is worth [`LINE_CLEAR_BONUS`], flat.
/// - No combo, back-to-back, level or drop-distance bonuses.
///
/// # Example
///
/// ```
/// use gptris_engine::GameStats;
///
/// let mut stats = GameStats::new();
/// stats.record_spawn();
/// stats.record_settle();
/// stats.record_cleared_lines(2);
///
/// assert_eq!(stats.score(), 1100);
/// assert_eq!(stats.cleared_lines(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameStats {
    score: u64,
    spawned_pieces: usize,
    settled_pieces: usize,
    cleared_lines: usize,
}

impl Default for GameStats {
    fn default() -> Self {
        Self::new()
    }
}

impl GameStats {
    /// Creates a new game statistics tracker with all counters at zero.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            score: 0,
            spawned_pieces: 0,
            settled_pieces: 0,
            cleared_lines: 0,
        }
    }

    #[must_use]
    pub const fn score(&self) -> u64 {
        self.score
    }

    #[must_use]
    pub const fn spawned_pieces(&self) -> usize {
        self.spawned_pieces
    }

    #[must_use]
    pub const fn settled_pieces(&self) -> usize {
        self.settled_pieces
    }

    #[must_use]
    pub const fn cleared_lines(&self) -> usize {
        self.cleared_lines
    }

    pub const fn record_spawn(&mut self) {
        self.spawned_pieces += 1;
        self.score += SPAWN_BONUS;
    }

    pub const fn record_settle(&mut self) {
        self.settled_pieces += 1;
    }

    /// Adds the line bonus for `lines` rows cleared at once.
    pub const fn record_cleared_lines(&mut self, lines: usize) {
        self.cleared_lines += lines;
        self.score += LINE_CLEAR_BONUS * lines as u64;
    }
}
