//! Single puyo: a colour tag plus a deletion marker.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PuyoColor {
    Red,
    Green,
    Blue,
    Yellow,
    Purple,
    /// Empty cell.
    #[default]
    None,
}

impl PuyoColor {
    /// Playable colours, in sequence-table order.
    pub const ALL: [Self; 5] = [Self::Red, Self::Green, Self::Blue, Self::Yellow, Self::Purple];

    /// Decode a sequence-table letter. Unknown letters fall back to the first colour.
    pub fn from_code(code: char) -> Self {
        match code.to_ascii_lowercase() {
            'r' => Self::Red,
            'g' => Self::Green,
            'b' => Self::Blue,
            'y' => Self::Yellow,
            'p' => Self::Purple,
            _ => Self::ALL[0],
        }
    }

    pub fn code(self) -> char {
        match self {
            Self::Red => 'r',
            Self::Green => 'g',
            Self::Blue => 'b',
            Self::Yellow => 'y',
            Self::Purple => 'p',
            Self::None => '.',
        }
    }

    /// Index 0..5 into theme colour tables; `None` has no index.
    pub fn index(self) -> Option<usize> {
        Self::ALL.iter().position(|&c| c == self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PuyoState {
    #[default]
    Normal,
    MarkedForDeletion,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Puyo {
    pub color: PuyoColor,
    pub state: PuyoState,
}

impl Puyo {
    pub const EMPTY: Self = Self {
        color: PuyoColor::None,
        state: PuyoState::Normal,
    };

    pub const fn new(color: PuyoColor) -> Self {
        Self {
            color,
            state: PuyoState::Normal,
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.color == PuyoColor::None
    }

    #[inline]
    pub fn is_marked(&self) -> bool {
        self.state == PuyoState::MarkedForDeletion
    }

    /// Copy of this puyo flagged for removal.
    pub fn marked(self) -> Self {
        Self {
            state: PuyoState::MarkedForDeletion,
            ..self
        }
    }
}

impl fmt::Display for Puyo {
    /// Upper-case letter for marked puyos, lower-case otherwise.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = self.color.code();
        if self.is_marked() {
            write!(f, "{}", c.to_ascii_uppercase())
        } else {
            write!(f, "{c}")
        }
    }
}
