//! Board: fixed 6x14 grid of puyos split into crane, ghost and normal-field rows.
//!
//! `y = 0` is the top row. Every mutation returns a new board; the receiver is never altered.

use crate::error::{GameError, Result};
use crate::puyo::{Puyo, PuyoColor};
use std::fmt;

pub const WIDTH: usize = 6;
pub const HEIGHT: usize = 14;
/// Inert row: no gravity, no chains.
pub const CRANE_ROW: usize = 0;
/// Falls with gravity but never takes part in a chain.
pub const GHOST_ROW: usize = 1;
/// First row of the 12-row normal field.
pub const FIRST_NORMAL_ROW: usize = 2;
/// Smallest connected group that gets erased.
pub const MIN_GROUP_SIZE: usize = 4;

const NEIGHBOURS_4: [(i32, i32); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

/// A connected same-colour group found by [`Board::find_groups`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    pub color: PuyoColor,
    pub cells: Vec<(usize, usize)>,
}

impl Group {
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Board {
    /// rows[y][x]; rows[0] is the crane row.
    rows: [[Puyo; WIDTH]; HEIGHT],
}

impl Board {
    pub fn create_empty() -> Self {
        Self::default()
    }

    /// Build a board from ASCII rows (`r g b y p`, `.` for empty), listed top to bottom and
    /// aligned to the bottom of the board.
    pub fn from_rows(rows: &[&str]) -> Result<Self> {
        if rows.len() > HEIGHT {
            return Err(GameError::OutOfBounds {
                x: 0,
                y: rows.len() as i32 - 1,
            });
        }
        let offset = HEIGHT - rows.len();
        let mut board = Self::create_empty();
        for (i, row) in rows.iter().enumerate() {
            let y = offset + i;
            for (x, ch) in row.chars().enumerate() {
                if x >= WIDTH {
                    return Err(GameError::OutOfBounds {
                        x: x as i32,
                        y: y as i32,
                    });
                }
                if ch != '.' && ch != ' ' {
                    board.rows[y][x] = Puyo::new(PuyoColor::from_code(ch));
                }
            }
        }
        Ok(board)
    }

    #[inline]
    pub fn in_bounds(x: i32, y: i32) -> bool {
        (0..WIDTH as i32).contains(&x) && (0..HEIGHT as i32).contains(&y)
    }

    /// Cell at `(x, y)`; out-of-range coordinates read as an empty puyo.
    #[inline]
    pub fn get(&self, x: i32, y: i32) -> Puyo {
        if Self::in_bounds(x, y) {
            self.rows[y as usize][x as usize]
        } else {
            Puyo::EMPTY
        }
    }

    /// New board with exactly one cell replaced.
    pub fn set(&self, x: i32, y: i32, puyo: Puyo) -> Result<Self> {
        if !Self::in_bounds(x, y) {
            return Err(GameError::OutOfBounds { x, y });
        }
        let mut next = *self;
        next.rows[y as usize][x as usize] = puyo;
        Ok(next)
    }

    /// True only for in-bounds cells holding no puyo.
    #[inline]
    pub fn is_empty_at(&self, x: i32, y: i32) -> bool {
        Self::in_bounds(x, y) && self.rows[y as usize][x as usize].is_empty()
    }

    /// A column is full once its top normal-field cell is taken.
    pub fn is_column_full(&self, x: i32) -> bool {
        Self::in_bounds(x, FIRST_NORMAL_ROW as i32) && !self.is_empty_at(x, FIRST_NORMAL_ROW as i32)
    }

    pub fn is_board_empty(&self) -> bool {
        self.rows.iter().flatten().all(Puyo::is_empty)
    }

    pub fn puyo_count(&self) -> usize {
        self.rows.iter().flatten().filter(|p| !p.is_empty()).count()
    }

    /// One gravity step: every floating puyo below the crane row drops by one cell.
    /// Returns the new board and whether anything moved; call until it reports `false`.
    pub fn apply_gravity(&self) -> (Self, bool) {
        let mut next = *self;
        let mut moved = false;
        for x in 0..WIDTH {
            for y in (GHOST_ROW..HEIGHT - 1).rev() {
                if !next.rows[y][x].is_empty() && next.rows[y + 1][x].is_empty() {
                    next.rows[y + 1][x] = next.rows[y][x];
                    next.rows[y][x] = Puyo::EMPTY;
                    moved = true;
                }
            }
        }
        (next, moved)
    }

    /// Repeat [`Self::apply_gravity`] until the board is settled.
    pub fn settle(&self) -> Self {
        let mut board = *self;
        loop {
            let (next, moved) = board.apply_gravity();
            if !moved {
                return next;
            }
            board = next;
        }
    }

    /// Connected same-colour group containing `(x, y)`, restricted to the normal field.
    /// Marked puyos never join a group.
    pub fn connected_group(&self, x: usize, y: usize) -> Vec<(usize, usize)> {
        let mut visited = [[false; WIDTH]; HEIGHT];
        self.flood(x, y, &mut visited)
    }

    fn flood(&self, x: usize, y: usize, visited: &mut [[bool; WIDTH]; HEIGHT]) -> Vec<(usize, usize)> {
        if x >= WIDTH || y >= HEIGHT {
            return Vec::new();
        }
        let start = self.rows[y][x];
        if y < FIRST_NORMAL_ROW || start.is_empty() || start.is_marked() || visited[y][x] {
            return Vec::new();
        }
        let color = start.color;
        let mut component = Vec::new();
        let mut stack = vec![(x, y)];
        visited[y][x] = true;
        while let Some((cx, cy)) = stack.pop() {
            component.push((cx, cy));
            for (dx, dy) in NEIGHBOURS_4 {
                let nx = cx as i32 + dx;
                let ny = cy as i32 + dy;
                if !Self::in_bounds(nx, ny) || ny < FIRST_NORMAL_ROW as i32 {
                    continue;
                }
                let (nx, ny) = (nx as usize, ny as usize);
                let p = self.rows[ny][nx];
                if !visited[ny][nx] && p.color == color && !p.is_marked() {
                    visited[ny][nx] = true;
                    stack.push((nx, ny));
                }
            }
        }
        component
    }

    /// All groups of at least [`MIN_GROUP_SIZE`] in the normal field, scanned top-left first.
    pub fn find_groups(&self) -> Vec<Group> {
        let mut visited = [[false; WIDTH]; HEIGHT];
        let mut groups = Vec::new();
        for y in FIRST_NORMAL_ROW..HEIGHT {
            for x in 0..WIDTH {
                let color = self.rows[y][x].color;
                let mut cells = self.flood(x, y, &mut visited);
                if cells.len() >= MIN_GROUP_SIZE {
                    cells.sort_unstable_by_key(|&(cx, cy)| (cy, cx));
                    groups.push(Group { color, cells });
                }
            }
        }
        groups
    }

    /// Mark every cell of `groups`; cells off the board are ignored.
    pub fn mark_for_deletion(&self, groups: &[Group]) -> Self {
        let mut next = *self;
        for &(x, y) in groups.iter().flat_map(|g| g.cells.iter()) {
            if let Some(cell) = next.rows.get_mut(y).and_then(|row| row.get_mut(x)) {
                *cell = cell.marked();
            }
        }
        next
    }

    pub fn has_marked(&self) -> bool {
        self.rows.iter().flatten().any(Puyo::is_marked)
    }

    /// Replace every marked puyo with an empty cell.
    pub fn remove_marked(&self) -> Self {
        let mut next = *self;
        for cell in next.rows.iter_mut().flatten() {
            if cell.is_marked() {
                *cell = Puyo::EMPTY;
            }
        }
        next
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (y, row) in self.rows.iter().enumerate() {
            for puyo in row {
                write!(f, "{puyo}")?;
            }
            if y + 1 < HEIGHT {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}
