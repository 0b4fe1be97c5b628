use std::iter;

use gptris_engine::{BOARD_HEIGHT, BOARD_WIDTH, Position, Snapshot};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Flex, Layout, Rect},
    widgets::{Block as BlockWidget, BlockExt, Widget},
};

use crate::view::widgets::{Block, BlockDisplay};

/// The 10×20 playfield: settled cells, the falling piece and its landing
/// preview.
#[derive(Debug)]
pub struct BoardDisplay<'a> {
    snapshot: &'a Snapshot,
    show_ghost: bool,
    block: Option<BlockWidget<'a>>,
}

impl<'a> BoardDisplay<'a> {
    pub fn new(snapshot: &'a Snapshot) -> Self {
        Self {
            snapshot,
            show_ghost: true,
            block: None,
        }
    }

    pub fn show_ghost(self, show_ghost: bool) -> Self {
        Self { show_ghost, ..self }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    #[expect(clippy::cast_possible_truncation)]
    pub fn width(&self) -> u16 {
        BOARD_WIDTH as u16 * BlockDisplay::width()
            + super::block_horizontal_margin(self.block.as_ref())
    }

    #[expect(clippy::cast_possible_truncation)]
    pub fn height(&self) -> u16 {
        BOARD_HEIGHT as u16 * BlockDisplay::height()
            + super::block_vertical_margin(self.block.as_ref())
    }

    #[expect(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    fn block_at(&self, row: usize, col: usize) -> Block {
        let position = Position::new(row as i32, col as i32);
        if self.snapshot.is_falling_cell(position) {
            Block::Falling
        } else if self.snapshot.board.row(row).is_occupied(col) {
            Block::Settled
        } else if self.show_ghost && self.snapshot.is_landing_cell(position) {
            Block::Ghost
        } else {
            Block::Empty
        }
    }
}

impl Widget for BoardDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &BoardDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        let col_constraints = (0..BOARD_WIDTH).map(|_| Constraint::Length(BlockDisplay::width()));
        let row_constraints =
            (0..BOARD_HEIGHT).map(|_| Constraint::Length(BlockDisplay::height()));
        let horizontal = Layout::horizontal(col_constraints).flex(Flex::Center);
        let vertical = Layout::vertical(row_constraints);

        let grid_cells = area
            .layout::<BOARD_HEIGHT>(&vertical)
            .into_iter()
            .map(|row| row.layout::<BOARD_WIDTH>(&horizontal));

        for (row, grid_row) in iter::zip(0..BOARD_HEIGHT, grid_cells) {
            for (col, grid_cell) in iter::zip(0..BOARD_WIDTH, grid_row) {
                BlockDisplay::from_block(self.block_at(row, col), true).render(grid_cell, buf);
            }
        }
    }
}
