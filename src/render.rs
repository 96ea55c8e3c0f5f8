//! Renderer contract. The engine never draws; front ends implement [`Renderer`].

use crate::board::{Board, WIDTH};
use crate::game::Game;
use std::io::{self, Write};

pub trait Renderer {
    type Error;

    /// Draw one snapshot. The flags tell whether undo/redo are currently possible.
    fn render(
        &mut self,
        game: &Game,
        undo_available: bool,
        redo_available: bool,
    ) -> Result<(), Self::Error>;

    fn render_game_over(&mut self, score: u32) -> Result<(), Self::Error>;
}

/// Board with the falling pair (upper-case letters) overlaid, one text line per row.
pub fn board_with_pair(game: &Game) -> String {
    let mut board: Board = *game.board();
    if let Some(pair) = game.current_pair() {
        for (pos, puyo) in pair.cells() {
            if let Ok(next) = board.set(pos.x, pos.y, puyo.marked()) {
                board = next;
            }
        }
    }
    board.to_string()
}

/// Plain-text renderer, for logs and headless runs.
#[derive(Debug)]
pub struct TextRenderer<W: Write> {
    out: W,
}

impl<W: Write> TextRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Renderer for TextRenderer<W> {
    type Error = io::Error;

    fn render(&mut self, game: &Game, undo_available: bool, redo_available: bool) -> io::Result<()> {
        writeln!(
            self.out,
            "state={:?} score={} chain={} undo={} redo={}",
            game.state(),
            game.score(),
            game.chain_count(),
            undo_available,
            redo_available
        )?;
        writeln!(self.out, "+{}+", "-".repeat(WIDTH))?;
        for line in board_with_pair(game).lines() {
            writeln!(self.out, "|{line}|")?;
        }
        writeln!(self.out, "+{}+", "-".repeat(WIDTH))
    }

    fn render_game_over(&mut self, score: u32) -> io::Result<()> {
        writeln!(self.out, "GAME OVER  score={score}")
    }
}
