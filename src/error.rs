//! Engine errors. Every rejected command leaves the previous snapshot untouched.

use crate::game::GameState;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GameError {
    #[error("cell ({x}, {y}) is outside the board")]
    OutOfBounds { x: i32, y: i32 },
    #[error("invalid move")]
    InvalidMove,
    #[error("no valid orientation for rotation")]
    InvalidRotation,
    #[error("command not allowed in state {0:?}")]
    InvalidState(GameState),
    #[error("game over")]
    GameOver,
    /// Retryable: the provider has not been loaded yet.
    #[error("puyo sequence table not loaded yet")]
    PuyoSeqNotLoaded,
    #[error("sequence table line {line}: {reason}")]
    SequenceFormat { line: usize, reason: String },
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl GameError {
    /// True for failures the caller may retry later without changing anything.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::PuyoSeqNotLoaded)
    }
}

pub type Result<T> = std::result::Result<T, GameError>;
