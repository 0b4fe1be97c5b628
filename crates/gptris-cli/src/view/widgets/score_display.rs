use std::iter;

use gptris_engine::{DropSpeed, RANKING_LEN, Snapshot};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    text::Line,
    widgets::{Block as BlockWidget, BlockExt as _, Widget},
};

use crate::view::widgets::style;

/// Current score, drop speed and the high-score ranking.
pub struct ScoreDisplay<'a> {
    snapshot: &'a Snapshot,
    block: Option<BlockWidget<'a>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Row {
    Empty,
    FullLabel(&'static str),
    FullValue(String),
    LabelValue(String, String),
}

impl<'a> ScoreDisplay<'a> {
    pub fn new(snapshot: &'a Snapshot) -> Self {
        Self {
            snapshot,
            block: None,
        }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    pub fn width(&self) -> u16 {
        16 + super::block_horizontal_margin(self.block.as_ref())
    }

    #[expect(clippy::cast_possible_truncation)]
    pub fn height(&self) -> u16 {
        (5 + RANKING_LEN) as u16 + super::block_vertical_margin(self.block.as_ref())
    }

    fn rows(&self) -> Vec<Row> {
        let speed = match self.snapshot.drop_speed {
            DropSpeed::Normal => "NORMAL",
            DropSpeed::Fast => "FAST",
        };
        let mut rows = vec![
            Row::FullLabel("SCORE:"),
            Row::FullValue(self.snapshot.score.to_string()),
            Row::LabelValue("SPEED:".to_owned(), speed.to_owned()),
            Row::Empty,
            Row::FullLabel("HIGH SCORES:"),
        ];
        rows.extend((0..RANKING_LEN).map(|rank| {
            let score = self
                .snapshot
                .high_scores
                .get(rank)
                .map_or_else(|| "-".to_owned(), ToString::to_string);
            Row::LabelValue(format!("{}.", rank + 1), score)
        }));
        rows
    }
}

impl Widget for ScoreDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        let style = style::DEFAULT;
        let rows = self.rows();
        let rows_areas =
            Layout::vertical((0..rows.len()).map(|_| Constraint::Length(1))).split(area);

        for (row, area) in iter::zip(rows, rows_areas.iter().copied()) {
            match row {
                Row::Empty => {}
                Row::FullLabel(label) => {
                    Line::styled(label, style).left_aligned().render(area, buf);
                }
                Row::FullValue(value) => {
                    Line::styled(value, style).right_aligned().render(area, buf);
                }
                Row::LabelValue(label, value) => {
                    let [label_area, value_area] = area.layout(&Layout::horizontal([
                        Constraint::Fill(1),
                        Constraint::Fill(1),
                    ]));
                    Line::styled(label, style)
                        .left_aligned()
                        .render(label_area, buf);
                    Line::styled(value, style)
                        .right_aligned()
                        .render(value_area, buf);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use gptris_engine::{GameSession, MemoryScoreStore, PieceKind, ScriptedPieces};

    use super::*;
    use crate::view::widgets::test_util::line_text;

    fn snapshot(history: Vec<u64>) -> Snapshot {
        let pieces = ScriptedPieces::new([PieceKind::L]);
        let mut session = GameSession::new(pieces, MemoryScoreStore::new(history)).unwrap();
        session.start().unwrap();
        session.activate_fast_drop().unwrap();
        session.snapshot()
    }

    #[test]
    fn test_rows_pad_ranking() {
        let snapshot = snapshot(vec![300, 1200]);
        let rows = ScoreDisplay::new(&snapshot).rows();
        assert_eq!(rows.len(), 5 + RANKING_LEN);
        assert_eq!(rows[1], Row::FullValue("100".to_owned()));
        assert_eq!(
            rows[2],
            Row::LabelValue("SPEED:".to_owned(), "FAST".to_owned())
        );
        assert_eq!(
            rows[5..],
            [
                Row::LabelValue("1.".to_owned(), "1200".to_owned()),
                Row::LabelValue("2.".to_owned(), "300".to_owned()),
                Row::LabelValue("3.".to_owned(), "-".to_owned()),
            ]
        );
    }

    #[test]
    fn test_render() {
        let snapshot = snapshot(vec![50, 200, 10, 100]);
        let widget = ScoreDisplay::new(&snapshot);
        let mut buf = Buffer::empty(Rect::new(0, 0, widget.width(), widget.height()));
        widget.render(buf.area, &mut buf);

        assert_eq!(line_text(&buf, 0), "SCORE:          ");
        assert_eq!(line_text(&buf, 1), "             100");
        assert_eq!(line_text(&buf, 5), "1.           200");
        assert_eq!(line_text(&buf, 7), "3.            50");
    }
}
