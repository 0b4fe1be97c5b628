use std::{collections::VecDeque, fmt, str::FromStr};

use rand::{
    Rng, SeedableRng as _,
    distr::{Distribution, StandardUniform},
};
use rand_pcg::Pcg32;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::PieceKind;

/// Supplier of the kinds of upcoming pieces.
///
/// The session asks for one kind at game start (the first "next" piece) and
/// one more on every spawn. Implement this to control piece selection, for
/// example to replay a fixed sequence in tests.
pub trait PieceSource: fmt::Debug {
    fn next_kind(&mut self) -> PieceKind;
}

impl<P> PieceSource for Box<P>
where
    P: PieceSource + ?Sized,
{
    fn next_kind(&mut self) -> PieceKind {
        (**self).next_kind()
    }
}

/// Seed for deterministic piece generation.
///
/// This is a 128-bit (16-byte) seed for the PCG generator behind
/// [`RandomPieces`]. The same seed produces the same sequence of pieces.
/// Its text form is 32 hexadecimal digits.
///
/// # Example
///
/// ```
/// use gptris_engine::{PieceSeed, PieceSource as _, RandomPieces};
///
/// let seed: PieceSeed = "000102030405060708090a0b0c0d0e0f".parse().unwrap();
/// let mut a = RandomPieces::with_seed(seed);
/// let mut b = RandomPieces::with_seed(seed);
/// for _ in 0..10 {
///     assert_eq!(a.next_kind(), b.next_kind());
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PieceSeed([u8; 16]);

impl fmt::Display for PieceSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:032x}", u128::from_be_bytes(self.0))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("invalid piece seed {input:?}: expected 32 hexadecimal digits")]
pub struct ParseSeedError {
    input: String,
}

impl FromStr for PieceSeed {
    type Err = ParseSeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseSeedError {
            input: s.to_owned(),
        };
        if s.len() != 32 || !s.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let num = u128::from_str_radix(s, 16).map_err(|_| invalid())?;
        Ok(Self(num.to_be_bytes()))
    }
}

impl Serialize for PieceSeed {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PieceSeed {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let hex_str = String::deserialize(deserializer)?;
        hex_str.parse().map_err(serde::de::Error::custom)
    }
}

/// Allows generating random `PieceSeed` values using the standard random distribution.
impl Distribution<PieceSeed> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PieceSeed {
        let mut seed = [0; 16];
        rng.fill(&mut seed);
        PieceSeed(seed)
    }
}

/// Uniformly random piece kinds, each drawn independently.
#[derive(Debug, Clone)]
pub struct RandomPieces {
    seed: PieceSeed,
    rng: Pcg32,
}

impl Default for RandomPieces {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomPieces {
    /// Creates a generator with a random seed.
    ///
    /// For reproducible sequences, use [`Self::with_seed`] instead.
    #[must_use]
    pub fn new() -> Self {
        Self::with_seed(rand::rng().random())
    }

    #[must_use]
    pub fn with_seed(seed: PieceSeed) -> Self {
        Self {
            seed,
            rng: Pcg32::from_seed(seed.0),
        }
    }

    #[must_use]
    pub fn seed(&self) -> PieceSeed {
        self.seed
    }
}

impl PieceSource for RandomPieces {
    fn next_kind(&mut self) -> PieceKind {
        self.rng.random()
    }
}

/// A fixed sequence of piece kinds, repeated from the start once exhausted.
#[derive(Debug, Clone)]
pub struct ScriptedPieces {
    queue: VecDeque<PieceKind>,
}

impl ScriptedPieces {
    /// Creates a source replaying `kinds` in order.
    ///
    /// # Panics
    ///
    /// Panics if `kinds` is empty.
    pub fn new<I>(kinds: I) -> Self
    where
        I: IntoIterator<Item = PieceKind>,
    {
        let queue: VecDeque<_> = kinds.into_iter().collect();
        assert!(!queue.is_empty(), "scripted piece sequence must not be empty");
        Self { queue }
    }

    /// Parses a sequence such as `"ITOSZJL"`, ignoring whitespace.
    ///
    /// Returns `None` when a character is not a piece kind or the sequence
    /// is empty.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        let kinds = s
            .chars()
            .filter(|c| !c.is_whitespace())
            .map(PieceKind::from_char)
            .collect::<Option<VecDeque<_>>>()?;
        (!kinds.is_empty()).then(|| Self::new(kinds))
    }
}

impl PieceSource for ScriptedPieces {
    fn next_kind(&mut self) -> PieceKind {
        self.queue.rotate_left(1);
        // rotate_left moved the front to the back
        self.queue[self.queue.len() - 1]
    }
}
