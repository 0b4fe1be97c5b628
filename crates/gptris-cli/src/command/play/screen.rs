use std::time::Duration;

use crossterm::event::{Event, KeyCode};
use gptris_engine::{
    Command, CommandError, GameSession, PieceSource, RandomPieces, ScoreFile, ScoreStore,
    ScoreStoreError, SessionState,
};
use ratatui::{
    Frame,
    layout::{Constraint, Layout},
    text::Text,
};

use crate::view::widgets::{SessionDisplay, style};

/// Maps a key to the game command it triggers.
pub(crate) fn command_for_key(code: KeyCode) -> Option<Command> {
    let command = match code {
        KeyCode::Enter => Command::Start,
        KeyCode::Left => Command::MoveLeft,
        KeyCode::Right => Command::MoveRight,
        KeyCode::Down => Command::SoftDrop,
        KeyCode::Up => Command::Rotate,
        KeyCode::Char(' ') => Command::FastDrop,
        _ => return None,
    };
    Some(command)
}

#[derive(Debug)]
pub struct PlayScreen<P = RandomPieces, S = ScoreFile> {
    session: GameSession<P, S>,
    last_error: Option<String>,
    diagnostics: Vec<String>,
    is_exiting: bool,
}

impl<P, S> PlayScreen<P, S>
where
    P: PieceSource,
    S: ScoreStore,
{
    pub fn new(session: GameSession<P, S>) -> Self {
        Self {
            session,
            last_error: None,
            diagnostics: vec![],
            is_exiting: false,
        }
    }

    pub fn is_exiting(&self) -> bool {
        self.is_exiting
    }

    /// Messages to report once the terminal is restored.
    pub fn diagnostics(&self) -> &[String] {
        &self.diagnostics
    }

    /// Interval until the next gravity step, `None` while no game is running.
    pub fn tick_interval(&self) -> Option<Duration> {
        self.session
            .state()
            .is_running()
            .then(|| self.session.tick_interval())
    }

    pub fn draw(&self, frame: &mut Frame<'_>) {
        let snapshot = self.session.snapshot();
        let session_display = SessionDisplay::new(&snapshot, true);
        let help_text = match (&self.last_error, self.session.state()) {
            (Some(error), _) => Text::from(error.as_str()).style(style::ERROR),
            (None, SessionState::Running) => Text::from(
                "Controls: ← → (Move) | ↓ (Soft Drop) | ↑ (Rotate) | Space (Fast Drop) | Enter (Restart) | Q (Quit)",
            )
            .style(style::HELP),
            (None, SessionState::NotStarted | SessionState::GameOver) => {
                Text::from("Controls: Enter (Start) | Q (Quit)").style(style::HELP)
            }
        };

        let [main_area, help_area] =
            Layout::vertical([Constraint::Length(22), Constraint::Length(1)])
                .areas::<2>(frame.area());
        frame.render_widget(session_display, main_area);
        frame.render_widget(help_text.centered(), help_area);
    }

    pub fn handle_event(&mut self, event: &Event) {
        let Some(key) = event.as_key_press_event() else {
            return;
        };
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.is_exiting = true,
            code => {
                if let Some(command) = command_for_key(code) {
                    self.apply(command);
                }
            }
        }
    }

    /// Advances gravity by one step.
    pub fn update(&mut self) {
        _ = self.session.tick();
        self.collect_store_error();
    }

    fn apply(&mut self, command: Command) {
        match self.session.apply(command) {
            Ok(()) => {
                if command == Command::Start {
                    self.last_error = None;
                }
            }
            // Rejected moves are part of normal play
            Err(CommandError::Move(_)) => {}
            Err(CommandError::Store(e)) => self.report(&e),
        }
        self.collect_store_error();
    }

    fn collect_store_error(&mut self) {
        if let Some(e) = self.session.take_store_error() {
            self.report(&e);
        }
    }

    fn report(&mut self, error: &ScoreStoreError) {
        let message = format!("Score file error: {error}");
        self.last_error = Some(message.clone());
        self.diagnostics.push(message);
    }

    #[cfg(test)]
    fn session(&self) -> &GameSession<P, S> {
        &self.session
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyEvent, KeyEventKind, KeyModifiers};
    use gptris_engine::{MemoryScoreStore, PieceKind, Position, ScriptedPieces};

    use super::*;

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn screen() -> PlayScreen<ScriptedPieces, MemoryScoreStore> {
        let pieces = ScriptedPieces::new([PieceKind::T]);
        let session = GameSession::new(pieces, MemoryScoreStore::default()).unwrap();
        PlayScreen::new(session)
    }

    #[test]
    fn test_key_bindings() {
        assert_eq!(command_for_key(KeyCode::Enter), Some(Command::Start));
        assert_eq!(command_for_key(KeyCode::Up), Some(Command::Rotate));
        assert_eq!(command_for_key(KeyCode::Char(' ')), Some(Command::FastDrop));
        assert_eq!(command_for_key(KeyCode::Char('z')), None);
    }

    #[test]
    fn test_keys_drive_session() {
        let mut screen = screen();
        assert_eq!(screen.tick_interval(), None);

        // Moves are ignored before the game starts
        screen.handle_event(&key(KeyCode::Left));
        assert!(screen.session().state().is_not_started());

        screen.handle_event(&key(KeyCode::Enter));
        assert!(screen.session().state().is_running());
        assert_eq!(screen.tick_interval(), Some(Duration::from_millis(500)));

        screen.handle_event(&key(KeyCode::Left));
        screen.handle_event(&key(KeyCode::Down));
        let piece = screen.session().falling_piece().copied().unwrap();
        assert_eq!(piece.position(), Position::new(1, 2));

        screen.handle_event(&key(KeyCode::Char(' ')));
        assert_eq!(screen.tick_interval(), Some(Duration::from_millis(50)));

        screen.update();
        let piece = screen.session().falling_piece().copied().unwrap();
        assert_eq!(piece.position(), Position::new(2, 2));
    }

    #[test]
    fn test_key_release_is_ignored() {
        let mut screen = screen();
        let mut release = KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE);
        release.kind = KeyEventKind::Release;
        screen.handle_event(&Event::Key(release));
        assert!(screen.session().state().is_not_started());
    }

    #[test]
    fn test_quit_keys() {
        for code in [KeyCode::Char('q'), KeyCode::Esc] {
            let mut screen = screen();
            screen.handle_event(&key(code));
            assert!(screen.is_exiting());
        }
    }
}
