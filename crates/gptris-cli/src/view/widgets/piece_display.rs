use gptris_engine::{PieceKind, PieceRotation};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Flex, Layout, Rect},
    widgets::{Block as BlockWidget, BlockExt as _, Widget},
};

use crate::view::widgets::{Block, BlockDisplay};

/// Preview of a single piece in its spawn orientation.
#[derive(Debug)]
pub struct PieceDisplay<'a> {
    piece: Option<PieceKind>,
    block: Option<BlockWidget<'a>>,
}

impl<'a> PieceDisplay<'a> {
    pub fn new() -> Self {
        Self {
            piece: None,
            block: None,
        }
    }

    pub fn piece(self, piece: Option<PieceKind>) -> Self {
        Self { piece, ..self }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    pub fn width(&self) -> u16 {
        4 * BlockDisplay::width() + super::block_horizontal_margin(self.block.as_ref())
    }

    pub fn height(&self) -> u16 {
        2 * BlockDisplay::height() + super::block_vertical_margin(self.block.as_ref())
    }
}

/// Cells of `kind` at spawn orientation, shifted to start at (0, 0), and
/// the (width, height) of their bounding box.
fn normalized_cells(kind: PieceKind) -> ([(u16, u16); 4], (u16, u16)) {
    let offsets = kind.offsets(PieceRotation::default());
    let min_x = offsets.iter().map(|&(x, _)| x).min().unwrap_or_default();
    let min_y = offsets.iter().map(|&(_, y)| y).min().unwrap_or_default();

    let mut cells = [(0, 0); 4];
    let mut size = (0, 0);
    for (cell, (x, y)) in cells.iter_mut().zip(offsets) {
        let x = u16::try_from(x - min_x).unwrap_or_default();
        let y = u16::try_from(y - min_y).unwrap_or_default();
        *cell = (x, y);
        size = (size.0.max(x + 1), size.1.max(y + 1));
    }
    (cells, size)
}

impl Widget for PieceDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &PieceDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        let Some(piece) = self.piece else {
            return;
        };
        let (cells, (width, height)) = normalized_cells(piece);
        let piece_area = area.centered(
            Constraint::Length(width * BlockDisplay::width()),
            Constraint::Length(height * BlockDisplay::height()),
        );

        let col_constraints = (0..width).map(|_| Constraint::Length(BlockDisplay::width()));
        let row_constraints = (0..height).map(|_| Constraint::Length(BlockDisplay::height()));
        let horizontal = Layout::horizontal(col_constraints).flex(Flex::Center);
        let vertical = Layout::vertical(row_constraints);
        let grid_rows = piece_area
            .layout_vec(&vertical)
            .into_iter()
            .map(|row| row.layout_vec(&horizontal));

        let empty_block = BlockDisplay::from_block(Block::Empty, false);
        let occupied_block = BlockDisplay::from_block(Block::Falling, false);
        for (y, grid_row) in (0..).zip(grid_rows) {
            for (x, grid_cell) in (0..).zip(grid_row) {
                if cells.contains(&(x, y)) {
                    Widget::render(&occupied_block, grid_cell, buf);
                } else {
                    Widget::render(&empty_block, grid_cell, buf);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::widgets::color;

    #[test]
    fn test_normalized_cells() {
        let (cells, size) = normalized_cells(PieceKind::I);
        assert_eq!(cells, [(0, 0), (1, 0), (2, 0), (3, 0)]);
        assert_eq!(size, (4, 1));

        let (cells, size) = normalized_cells(PieceKind::O);
        assert_eq!(cells, [(0, 0), (1, 0), (0, 1), (1, 1)]);
        assert_eq!(size, (2, 2));

        for kind in PieceKind::ALL {
            let (_, (width, height)) = normalized_cells(kind);
            assert!(width <= 4 && height <= 2, "{kind:?}");
        }
    }

    #[test]
    fn test_render_t_piece() {
        let widget = PieceDisplay::new().piece(Some(PieceKind::T));
        let mut buf = Buffer::empty(Rect::new(0, 0, widget.width(), widget.height()));
        widget.render(buf.area, &mut buf);

        // T is 3 cells wide, centered in 4: one terminal cell of margin
        assert_eq!(buf[(3, 0)].bg, color::YELLOW);
        assert_eq!(buf[(1, 0)].bg, color::BLACK);
        assert_eq!(buf[(1, 1)].bg, color::YELLOW);
        assert_eq!(buf[(6, 1)].bg, color::YELLOW);
    }

    #[test]
    fn test_render_nothing() {
        let widget = PieceDisplay::new();
        let mut buf = Buffer::empty(Rect::new(0, 0, 8, 2));
        widget.render(buf.area, &mut buf);
        assert_eq!(buf, Buffer::empty(Rect::new(0, 0, 8, 2)));
    }
}
