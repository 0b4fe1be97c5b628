use gptris_engine::{SessionState, Snapshot};
use ratatui::{
    layout::{Constraint, Flex, Layout},
    prelude::{Buffer, Rect},
    text::{Line, Text},
    widgets::{Block, Clear, Padding, Widget},
};

use crate::view::widgets::{BoardDisplay, PieceDisplay, ScoreDisplay, color, style};

/// Full game screen: score panel, board and next-piece preview.
#[derive(Debug)]
pub struct SessionDisplay<'a> {
    snapshot: &'a Snapshot,
    show_ghost: bool,
    horizontal_padding: u16,
    vertical_padding: u16,
}

impl<'a> SessionDisplay<'a> {
    pub fn new(snapshot: &'a Snapshot, show_ghost: bool) -> Self {
        Self {
            snapshot,
            show_ghost,
            horizontal_padding: 1,
            vertical_padding: 0,
        }
    }
}

impl Widget for SessionDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &SessionDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        let style = style::DEFAULT;
        let block_padding = Padding::symmetric(self.horizontal_padding, self.vertical_padding);
        let border_style = match self.snapshot.state {
            SessionState::NotStarted => color::GRAY,
            SessionState::Running => color::WHITE,
            SessionState::GameOver => color::RED,
        };

        let game_board = BoardDisplay::new(self.snapshot)
            .show_ghost(self.show_ghost)
            .block(Block::bordered().border_style(border_style).style(style));
        let next_panel = PieceDisplay::new().piece(self.snapshot.next_piece).block(
            Block::bordered()
                .title(Line::from("NEXT").centered())
                .padding(block_padding)
                .border_style(border_style)
                .style(style),
        );
        let score_panel = ScoreDisplay::new(self.snapshot).block(
            Block::bordered()
                .title(Line::from("SCORE").centered())
                .padding(block_padding)
                .border_style(border_style)
                .style(style),
        );

        let [left_column, center_column, right_column] = Layout::horizontal([
            Constraint::Length(score_panel.width()),
            Constraint::Length(game_board.width()),
            Constraint::Length(next_panel.width()),
        ])
        .flex(Flex::Center)
        .spacing(1)
        .areas(area);

        let [score_area] =
            Layout::vertical([Constraint::Length(score_panel.height())]).areas(left_column);
        let [board_area] =
            Layout::vertical([Constraint::Length(game_board.height())]).areas(center_column);
        let [next_area] =
            Layout::vertical([Constraint::Length(next_panel.height())]).areas(right_column);

        let game_board_width = game_board.width();
        score_panel.render(score_area, buf);
        game_board.render(board_area, buf);
        next_panel.render(next_area, buf);

        let popup = match self.snapshot.state {
            SessionState::NotStarted => Some(("PRESS ENTER", style::START_POPUP)),
            SessionState::Running => None,
            SessionState::GameOver => Some(("GAME OVER", style::GAME_OVER_POPUP)),
        };

        if let Some((text, style)) = popup {
            let block = Block::new().style(style);
            let text = Text::styled(text, style).centered();
            let area =
                board_area.centered(Constraint::Length(game_board_width), Constraint::Length(3));
            let inner = block.inner(area);
            Clear.render(area, buf);
            block.render(area, buf);
            text.render(inner.centered_vertically(Constraint::Length(1)), buf);
        }
    }
}

#[cfg(test)]
mod tests {
    use gptris_engine::{GameSession, MemoryScoreStore, PieceKind, ScriptedPieces};

    use super::*;
    use crate::view::widgets::test_util::buffer_text;

    fn render(snapshot: &Snapshot) -> String {
        let mut buf = Buffer::empty(Rect::new(0, 0, 64, 24));
        SessionDisplay::new(snapshot, true).render(buf.area, &mut buf);
        buffer_text(&buf)
    }

    fn session() -> GameSession<ScriptedPieces, MemoryScoreStore> {
        let pieces = ScriptedPieces::new([PieceKind::I, PieceKind::O]);
        GameSession::new(pieces, MemoryScoreStore::new(vec![900])).unwrap()
    }

    #[test]
    fn test_start_popup_before_first_game() {
        let text = render(&session().snapshot());
        assert!(text.contains("PRESS ENTER"));
        assert!(text.contains("NEXT"));
        assert!(text.contains("900"));
    }

    #[test]
    fn test_running_has_no_popup() {
        let mut session = session();
        session.start().unwrap();
        let text = render(&session.snapshot());
        assert!(!text.contains("PRESS ENTER"));
        assert!(!text.contains("GAME OVER"));
        assert!(text.contains("SCORE:"));
    }

    #[test]
    fn test_game_over_popup() {
        let mut session = session();
        session.start().unwrap();
        let mut snapshot = session.snapshot();
        snapshot.state = SessionState::GameOver;
        assert!(render(&snapshot).contains("GAME OVER"));
    }
}
