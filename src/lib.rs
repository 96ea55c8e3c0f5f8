//! puyotui engine: a deterministic falling-pair, connect-four-and-clear puzzle simulation.
//!
//! Everything here is a value: [`Board`], [`PuyoPair`] and [`Game`] are never mutated in place.
//! Commands return a new snapshot or a [`GameError`]; [`Game::update_game`] is the per-frame tick.

pub mod board;
pub mod error;
pub mod game;
pub mod history;
pub mod pair;
pub mod puyo;
pub mod render;
pub mod scoring;
pub mod sequence;

pub use board::{Board, Group, HEIGHT, WIDTH};
pub use error::GameError;
pub use game::{Game, GameState, FLASH_DURATION, FRAME_TIME};
pub use history::GameHistory;
pub use pair::{Position, PuyoPair, Rotation};
pub use puyo::{Puyo, PuyoColor, PuyoState};
pub use render::Renderer;
pub use scoring::{calculate_score, ClearedGroups};
pub use sequence::{PuyoSeq, PuyoSeqProvider, SEQUENCE_LENGTH};
