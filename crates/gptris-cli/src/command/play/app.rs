use crossterm::event::Event;
use ratatui::Frame;

use crate::{
    command::play::screen::PlayScreen,
    tui::{App, Tui},
};

#[derive(Debug)]
pub struct PlayApp {
    screen: PlayScreen,
}

impl PlayApp {
    pub fn new(session: gptris_engine::GameSession) -> Self {
        Self {
            screen: PlayScreen::new(session),
        }
    }

    pub fn diagnostics(&self) -> &[String] {
        self.screen.diagnostics()
    }

    /// Follows the session's drop speed, and stops ticking between games.
    fn sync_tick_interval(&self, tui: &mut Tui) {
        tui.set_tick_interval(self.screen.tick_interval());
    }
}

impl App for PlayApp {
    fn init(&mut self, tui: &mut Tui) {
        self.sync_tick_interval(tui);
    }

    fn should_exit(&self) -> bool {
        self.screen.is_exiting()
    }

    fn handle_event(&mut self, tui: &mut Tui, event: Event) {
        self.screen.handle_event(&event);
        self.sync_tick_interval(tui);
    }

    fn draw(&self, frame: &mut Frame) {
        self.screen.draw(frame);
    }

    fn update(&mut self, tui: &mut Tui) {
        self.screen.update();
        self.sync_tick_interval(tui);
    }
}
