//! Falling pair: anchor (main) puyo plus a second puyo placed by rotation.

use crate::board::{Board, FIRST_NORMAL_ROW};
use crate::error::{GameError, Result};
use crate::puyo::Puyo;

/// Anchor cell of a freshly spawned pair.
pub const SPAWN_POSITION: Position = Position {
    x: 2,
    y: FIRST_NORMAL_ROW as i32,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn offset(self, (dx, dy): (i32, i32)) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// Where the second puyo sits relative to the anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Rotation {
    #[default]
    Up,
    Right,
    Down,
    Left,
}

impl Rotation {
    pub const ALL: [Self; 4] = [Self::Up, Self::Right, Self::Down, Self::Left];

    /// Second-cell offset from the anchor (`y` grows downwards).
    pub fn offset(self) -> (i32, i32) {
        match self {
            Self::Up => (0, -1),
            Self::Right => (1, 0),
            Self::Down => (0, 1),
            Self::Left => (-1, 0),
        }
    }

    pub fn clockwise(self) -> Self {
        match self {
            Self::Up => Self::Right,
            Self::Right => Self::Down,
            Self::Down => Self::Left,
            Self::Left => Self::Up,
        }
    }

    pub fn counter_clockwise(self) -> Self {
        match self {
            Self::Up => Self::Left,
            Self::Left => Self::Down,
            Self::Down => Self::Right,
            Self::Right => Self::Up,
        }
    }

    pub fn opposite(self) -> Self {
        self.clockwise().clockwise()
    }

    /// Anchor shifts tried, in order, when the plain rotation into `self` is blocked.
    fn wall_kicks(self) -> &'static [(i32, i32)] {
        match self {
            Self::Down => &[(0, -1)],
            Self::Right => &[(-1, 0)],
            Self::Left => &[(1, 0)],
            Self::Up => &[(-1, 0), (1, 0), (0, -1), (0, 1)],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PuyoPair {
    pub main_puyo: Puyo,
    pub second_puyo: Puyo,
    pub position: Position,
    pub rotation: Rotation,
}

impl PuyoPair {
    pub fn new(main_puyo: Puyo, second_puyo: Puyo, position: Position, rotation: Rotation) -> Self {
        Self {
            main_puyo,
            second_puyo,
            position,
            rotation,
        }
    }

    /// Pair at the spawn cell with the second puyo above the anchor.
    ///
    /// Hard-dropped as spawned, the main puyo lands below the second; rotate to
    /// [`Rotation::Down`] first to land it on top.
    pub fn spawn(main_puyo: Puyo, second_puyo: Puyo) -> Self {
        Self::new(main_puyo, second_puyo, SPAWN_POSITION, Rotation::Up)
    }

    #[inline]
    pub fn second_position(&self) -> Position {
        self.position.offset(self.rotation.offset())
    }

    /// Both cells with their puyos, anchor first.
    pub fn cells(&self) -> [(Position, Puyo); 2] {
        [
            (self.position, self.main_puyo),
            (self.second_position(), self.second_puyo),
        ]
    }

    /// True if both cells would be in bounds and empty.
    pub fn fits(board: &Board, position: Position, rotation: Rotation) -> bool {
        let second = position.offset(rotation.offset());
        board.is_empty_at(position.x, position.y) && board.is_empty_at(second.x, second.y)
    }

    fn translate(&self, board: &Board, delta: (i32, i32)) -> Result<Self> {
        let position = self.position.offset(delta);
        if !Self::fits(board, position, self.rotation) {
            return Err(GameError::InvalidMove);
        }
        Ok(Self { position, ..*self })
    }

    pub fn move_left(&self, board: &Board) -> Result<Self> {
        self.translate(board, (-1, 0))
    }

    pub fn move_right(&self, board: &Board) -> Result<Self> {
        self.translate(board, (1, 0))
    }

    /// Fails once the pair has landed.
    pub fn move_down(&self, board: &Board) -> Result<Self> {
        self.translate(board, (0, 1))
    }

    pub fn rotate_clockwise(&self, board: &Board) -> Result<Self> {
        self.rotate_to(board, self.rotation.clockwise())
    }

    pub fn rotate_counter_clockwise(&self, board: &Board) -> Result<Self> {
        self.rotate_to(board, self.rotation.counter_clockwise())
    }

    fn rotate_to(&self, board: &Board, rotation: Rotation) -> Result<Self> {
        if Self::fits(board, self.position, rotation) {
            return Ok(Self { rotation, ..*self });
        }
        rotation
            .wall_kicks()
            .iter()
            .map(|&kick| self.position.offset(kick))
            .find(|&position| Self::fits(board, position, rotation))
            .map(|position| Self {
                position,
                rotation,
                ..*self
            })
            .ok_or(GameError::InvalidRotation)
    }

    /// 180-degree flip for a vertical pair squeezed on both sides.
    pub fn quick_turn(&self, board: &Board) -> Result<Self> {
        if !matches!(self.rotation, Rotation::Up | Rotation::Down) {
            return Err(GameError::InvalidMove);
        }
        let Position { x, y } = self.position;
        let left_open = board.is_empty_at(x - 1, y);
        let right_open = board.is_empty_at(x + 1, y);
        if left_open || right_open {
            return Err(GameError::InvalidMove);
        }
        Ok(Self {
            position: self.second_position(),
            rotation: self.rotation.opposite(),
            ..*self
        })
    }

    /// Write both puyos onto `board` in one step.
    pub fn place_on_board(&self, board: &Board) -> Result<Board> {
        let mut next = *board;
        for (pos, puyo) in self.cells() {
            if !next.is_empty_at(pos.x, pos.y) {
                return Err(GameError::InvalidMove);
            }
            next = next.set(pos.x, pos.y, puyo).map_err(|_| GameError::InvalidMove)?;
        }
        Ok(next)
    }

    /// Anchor position after falling as far as possible.
    pub fn landing(&self, board: &Board) -> Self {
        let mut pair = *self;
        while let Ok(lower) = pair.move_down(board) {
            pair = lower;
        }
        pair
    }
}
