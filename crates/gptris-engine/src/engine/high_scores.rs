use std::{
    fmt,
    fs::{File, OpenOptions},
    io::{
        self, BufRead as _, BufReader, BufWriter, Read as _, Seek as _, SeekFrom, Write as _,
    },
    num::ParseIntError,
    path::{Path, PathBuf},
};

use arrayvec::ArrayVec;

/// Number of entries in the high-score ranking.
pub const RANKING_LEN: usize = 3;

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum ScoreStoreError {
    #[display("failed to access score file {}", path.display())]
    Io { path: PathBuf, source: io::Error },
    #[display("invalid score at {}:{line}", path.display())]
    Parse {
        path: PathBuf,
        line: usize,
        source: ParseIntError,
    },
}

/// Persistent, append-only history of final scores.
pub trait ScoreStore: fmt::Debug {
    /// Loads every score recorded so far, oldest first.
    fn load(&mut self) -> Result<Vec<u64>, ScoreStoreError>;

    /// Records one more final score after the existing ones.
    fn append(&mut self, score: u64) -> Result<(), ScoreStoreError>;
}

/// Score history kept in a flat text file.
///
/// # Format
///
/// ```text
/// Score
/// 1200
/// 300
/// ```
///
/// The first line is a header. Every following line holds one score; only
/// the first comma-separated field is read, and blank lines are skipped.
/// The file is only ever appended to.
#[derive(Debug, Clone)]
pub struct ScoreFile {
    path: PathBuf,
}

impl Default for ScoreFile {
    fn default() -> Self {
        Self::new(Self::DEFAULT_PATH)
    }
}

impl ScoreFile {
    pub const DEFAULT_PATH: &str = "high_scores.csv";
    pub const HEADER: &str = "Score";

    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: io::Error) -> ScoreStoreError {
        ScoreStoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl ScoreStore for ScoreFile {
    /// A missing file is an empty history.
    fn load(&mut self) -> Result<Vec<u64>, ScoreStoreError> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(vec![]),
            Err(e) => return Err(self.io_error(e)),
        };

        let mut scores = vec![];
        // Skip the header record
        for (index, line) in BufReader::new(file).lines().enumerate().skip(1) {
            let line = line.map_err(|e| self.io_error(e))?;
            let record = line.split(',').next().unwrap_or_default().trim();
            if record.is_empty() {
                continue;
            }
            let score = record
                .parse()
                .map_err(|source| ScoreStoreError::Parse {
                    path: self.path.clone(),
                    line: index + 1,
                    source,
                })?;
            scores.push(score);
        }
        Ok(scores)
    }

    /// Writes the header first when the file does not exist yet or is empty.
    ///
    /// A last line without a line ending is terminated before the score is
    /// written, so existing records are never changed.
    fn append(&mut self, score: u64) -> Result<(), ScoreStoreError> {
        let mut file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| self.io_error(e))?;
        let is_new = file.metadata().map_err(|e| self.io_error(e))?.len() == 0;
        let needs_newline =
            !is_new && !ends_with_newline(&mut file).map_err(|e| self.io_error(e))?;

        let mut writer = BufWriter::new(file);
        if is_new {
            writeln!(writer, "{}", Self::HEADER).map_err(|e| self.io_error(e))?;
        }
        if needs_newline {
            writeln!(writer).map_err(|e| self.io_error(e))?;
        }
        writeln!(writer, "{score}").map_err(|e| self.io_error(e))?;
        writer.flush().map_err(|e| self.io_error(e))
    }
}

fn ends_with_newline(file: &mut File) -> io::Result<bool> {
    let mut last = [0; 1];
    file.seek(SeekFrom::End(-1))?;
    file.read_exact(&mut last)?;
    Ok(last[0] == b'\n')
}

/// Score history held in memory, for headless runs and tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryScoreStore {
    scores: Vec<u64>,
}

impl MemoryScoreStore {
    #[must_use]
    pub fn new(scores: Vec<u64>) -> Self {
        Self { scores }
    }

    #[must_use]
    pub fn scores(&self) -> &[u64] {
        &self.scores
    }
}

impl ScoreStore for MemoryScoreStore {
    fn load(&mut self) -> Result<Vec<u64>, ScoreStoreError> {
        Ok(self.scores.clone())
    }

    fn append(&mut self, score: u64) -> Result<(), ScoreStoreError> {
        self.scores.push(score);
        Ok(())
    }
}

/// All known final scores and their top-[`RANKING_LEN`] ranking.
///
/// The history is every score loaded from the store plus the scores recorded
/// since. Ranking is computed on demand and never written back.
///
/// # Example
///
/// ```
/// use gptris_engine::HighScores;
///
/// let mut high_scores = HighScores::new(vec![50, 200, 10]);
/// high_scores.record(100);
///
/// assert_eq!(high_scores.ranking().as_slice(), [200, 100, 50]);
/// assert_eq!(high_scores.history(), [50, 200, 10, 100]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HighScores {
    history: Vec<u64>,
}

impl HighScores {
    #[must_use]
    pub fn new(history: Vec<u64>) -> Self {
        Self { history }
    }

    pub fn record(&mut self, score: u64) {
        self.history.push(score);
    }

    #[must_use]
    pub fn history(&self) -> &[u64] {
        &self.history
    }

    /// Returns the best scores, highest first.
    #[must_use]
    pub fn ranking(&self) -> ArrayVec<u64, RANKING_LEN> {
        let mut sorted = self.history.clone();
        sorted.sort_unstable_by(|a, b| b.cmp(a));
        sorted.into_iter().take(RANKING_LEN).collect()
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    /// Path in the system temp directory, removed before and after the test.
    struct TempPath(PathBuf);

    impl TempPath {
        fn new(name: &str) -> Self {
            let path = std::env::temp_dir().join(format!(
                "gptris-{}-{name}.csv",
                std::process::id()
            ));
            let _ = fs::remove_file(&path);
            Self(path)
        }
    }

    impl Drop for TempPath {
        fn drop(&mut self) {
            let _ = fs::remove_file(&self.0);
        }
    }

    #[test]
    fn test_missing_file_is_empty_history() {
        let path = TempPath::new("missing");
        let mut store = ScoreFile::new(&path.0);
        assert_eq!(store.load().unwrap(), Vec::<u64>::new());
    }

    #[test]
    fn test_first_append_writes_header() {
        let path = TempPath::new("first-append");
        let mut store = ScoreFile::new(&path.0);
        store.append(700).unwrap();
        store.append(200).unwrap();

        let content = fs::read_to_string(&path.0).unwrap();
        assert_eq!(content, "Score\n700\n200\n");
        assert_eq!(store.load().unwrap(), [700, 200]);
    }

    #[test]
    fn test_append_keeps_existing_history() {
        let path = TempPath::new("existing");
        fs::write(&path.0, "Score\r\n50\r\n200\r\n10\r\n").unwrap();

        let mut store = ScoreFile::new(&path.0);
        let mut high_scores = HighScores::new(store.load().unwrap());
        store.append(100).unwrap();
        high_scores.record(100);

        assert_eq!(high_scores.ranking().as_slice(), [200, 100, 50]);
        assert_eq!(store.load().unwrap(), [50, 200, 10, 100]);
    }

    #[test]
    fn test_load_skips_blank_lines_and_extra_fields() {
        let path = TempPath::new("blank");
        fs::write(&path.0, "Score\n\n300,x\n  \n40\n").unwrap();
        let mut store = ScoreFile::new(&path.0);
        assert_eq!(store.load().unwrap(), [300, 40]);
    }

    #[test]
    fn test_load_reports_malformed_line() {
        let path = TempPath::new("malformed");
        fs::write(&path.0, "Score\n10\nten\n").unwrap();
        let mut store = ScoreFile::new(&path.0);

        let err = store.load().unwrap_err();
        assert!(matches!(err, ScoreStoreError::Parse { line: 3, .. }), "{err:?}");
        assert!(err.to_string().ends_with(":3"), "{err}");
    }

    #[test]
    fn test_header_only_file() {
        let path = TempPath::new("header-only");
        fs::write(&path.0, "Score\n").unwrap();
        let mut store = ScoreFile::new(&path.0);
        assert!(store.load().unwrap().is_empty());

        store.append(5).unwrap();
        assert_eq!(fs::read_to_string(&path.0).unwrap(), "Score\n5\n");
    }

    #[test]
    fn test_append_terminates_unfinished_last_line() {
        let path = TempPath::new("unterminated");
        fs::write(&path.0, "Score\n50").unwrap();
        let mut store = ScoreFile::new(&path.0);

        store.append(100).unwrap();
        assert_eq!(fs::read_to_string(&path.0).unwrap(), "Score\n50\n100\n");
        assert_eq!(store.load().unwrap(), [50, 100]);
    }

    #[test]
    fn test_ranking_shorter_than_limit() {
        assert!(HighScores::default().ranking().is_empty());
        assert_eq!(HighScores::new(vec![3, 9]).ranking().as_slice(), [9, 3]);
    }

    #[test]
    fn test_ranking_keeps_duplicates() {
        let high_scores = HighScores::new(vec![100, 300, 100, 300]);
        assert_eq!(high_scores.ranking().as_slice(), [300, 300, 100]);
    }

    #[test]
    fn test_memory_store() {
        let mut store = MemoryScoreStore::new(vec![1, 2]);
        store.append(3).unwrap();
        assert_eq!(store.load().unwrap(), [1, 2, 3]);
        assert_eq!(store.scores(), [1, 2, 3]);
    }
}
