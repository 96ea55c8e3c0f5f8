//! Game snapshot and state machine: spawn, control, drop, chain check, flash, respawn.
//!
//! A [`Game`] is an immutable value. Commands and [`Game::update`] return a brand-new snapshot
//! (or a typed error that leaves the receiver untouched), so callers keep the old one for undo
//! or simply drop it.

use crate::board::Board;
use crate::error::{GameError, Result};
use crate::pair::{PuyoPair, Rotation, SPAWN_POSITION};
use crate::puyo::Puyo;
use crate::scoring::{calculate_score, ClearedGroups};
use crate::sequence::{PuyoSeq, PuyoSeqProvider};
use tracing::{debug, info, trace};

/// Time marked puyos stay on the board before removal.
pub const FLASH_DURATION: u32 = 500;
/// Time advanced by one [`Game::update_game`] call (about one 60 Hz frame).
pub const FRAME_TIME: u32 = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GameState {
    /// Before the first `start_game`.
    #[default]
    Idle,
    /// A pair is under player control.
    Playing,
    /// Gravity settling; no input.
    Dropping,
    /// Looking for groups to erase.
    CheckingChains,
    /// Erased groups stay visible until [`FLASH_DURATION`] has elapsed.
    FlashingPuyos,
    GameOver,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Game {
    board: Board,
    current_pair: Option<PuyoPair>,
    next_pair: Option<PuyoPair>,
    state: GameState,
    score: u32,
    chain_count: u32,
    flashing_time: u32,
    puyo_seq: Option<PuyoSeq>,
    /// Pairs placed so far; pair `k` draws sequence indices `2k` and `2k + 1`.
    move_count: usize,
    last_chain: u32,
    max_chain: u32,
    last_step_score: u32,
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

impl Game {
    /// Idle game with an empty board; call [`Self::start_game`] to play.
    pub fn new() -> Self {
        Self {
            board: Board::create_empty(),
            current_pair: None,
            next_pair: None,
            state: GameState::Idle,
            score: 0,
            chain_count: 0,
            flashing_time: 0,
            puyo_seq: None,
            move_count: 0,
            last_chain: 0,
            max_chain: 0,
            last_step_score: 0,
        }
    }

    /// Fresh game on an empty board. A missing seed is drawn at random.
    ///
    /// Fails with [`GameError::PuyoSeqNotLoaded`] (retryable) if the provider is not ready.
    pub fn start_game(provider: &PuyoSeqProvider, seed: Option<u64>) -> Result<Self> {
        let seed = seed.unwrap_or_else(rand::random);
        let puyo_seq = provider.create_puyo_seq(seed)?;
        info!(seed, "game started");
        Ok(Self {
            puyo_seq: Some(puyo_seq),
            ..Self::new()
        }
        .spawn())
    }

    /// Game that starts by settling and resolving `board` before the first pair spawns.
    pub fn from_board(board: Board, puyo_seq: PuyoSeq) -> Self {
        let next_pair = Some(Self::pair_from(&puyo_seq, 0));
        Self {
            board,
            next_pair,
            state: GameState::Dropping,
            puyo_seq: Some(puyo_seq),
            ..Self::new()
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn current_pair(&self) -> Option<&PuyoPair> {
        self.current_pair.as_ref()
    }

    pub fn next_pair(&self) -> Option<&PuyoPair> {
        self.next_pair.as_ref()
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    /// Steps of the cascade in progress; 0 outside a cascade.
    pub fn chain_count(&self) -> u32 {
        self.chain_count
    }

    pub fn flashing_time(&self) -> u32 {
        self.flashing_time
    }

    pub fn puyo_seq(&self) -> Option<&PuyoSeq> {
        self.puyo_seq.as_ref()
    }

    pub fn move_count(&self) -> usize {
        self.move_count
    }

    /// Length of the most recently finished cascade.
    pub fn last_chain(&self) -> u32 {
        self.last_chain
    }

    pub fn max_chain(&self) -> u32 {
        self.max_chain
    }

    /// Points earned by the latest clear step.
    pub fn last_step_score(&self) -> u32 {
        self.last_step_score
    }

    pub fn is_game_over(&self) -> bool {
        self.state == GameState::GameOver
    }

    fn pair_from(seq: &PuyoSeq, n: usize) -> PuyoPair {
        let (main, second) = seq.pair(n);
        PuyoPair::spawn(Puyo::new(main), Puyo::new(second))
    }

    /// Put pair `move_count` into play, or end the game if the spawn cell is taken.
    fn spawn(&self) -> Self {
        let Some(seq) = &self.puyo_seq else {
            return self.clone();
        };
        if !PuyoPair::fits(&self.board, SPAWN_POSITION, Rotation::Up) {
            info!(score = self.score, moves = self.move_count, "game over");
            return Self {
                current_pair: None,
                state: GameState::GameOver,
                ..self.clone()
            };
        }
        let current = Self::pair_from(seq, self.move_count);
        let next = Self::pair_from(seq, self.move_count + 1);
        debug!(move_count = self.move_count, ?current, "pair spawned");
        Self {
            current_pair: Some(current),
            next_pair: Some(next),
            state: GameState::Playing,
            ..self.clone()
        }
    }

    /// The pair under control, or the error a command in this state should report.
    fn controllable(&self) -> Result<PuyoPair> {
        match (self.state, self.current_pair) {
            (GameState::Playing, Some(pair)) => Ok(pair),
            (GameState::GameOver, _) => Err(GameError::GameOver),
            (state, _) => Err(GameError::InvalidState(state)),
        }
    }

    fn with_pair(&self, pair: PuyoPair) -> Self {
        Self {
            current_pair: Some(pair),
            ..self.clone()
        }
    }

    /// Blocked moves are absorbed: the snapshot comes back unchanged.
    pub fn move_left(&self) -> Result<Self> {
        let pair = self.controllable()?;
        Ok(pair
            .move_left(&self.board)
            .map_or_else(|_| self.clone(), |p| self.with_pair(p)))
    }

    pub fn move_right(&self) -> Result<Self> {
        let pair = self.controllable()?;
        Ok(pair
            .move_right(&self.board)
            .map_or_else(|_| self.clone(), |p| self.with_pair(p)))
    }

    pub fn rotate_clockwise(&self) -> Result<Self> {
        let pair = self.controllable()?.rotate_clockwise(&self.board)?;
        Ok(self.with_pair(pair))
    }

    pub fn rotate_counter_clockwise(&self) -> Result<Self> {
        let pair = self.controllable()?.rotate_counter_clockwise(&self.board)?;
        Ok(self.with_pair(pair))
    }

    pub fn quick_turn(&self) -> Result<Self> {
        let pair = self.controllable()?.quick_turn(&self.board)?;
        Ok(self.with_pair(pair))
    }

    /// One row down; a landed pair is placed instead.
    pub fn soft_drop(&self) -> Result<Self> {
        let pair = self.controllable()?;
        match pair.move_down(&self.board) {
            Ok(lower) => Ok(self.with_pair(lower)),
            Err(_) => self.place(pair),
        }
    }

    /// Drop the pair as far as it goes, place it and start settling.
    pub fn hard_drop(&self) -> Result<Self> {
        let pair = self.controllable()?.landing(&self.board);
        self.place(pair)
    }

    fn place(&self, pair: PuyoPair) -> Result<Self> {
        let board = pair.place_on_board(&self.board)?;
        debug!(?pair, "pair placed");
        Ok(Self {
            board,
            current_pair: None,
            state: GameState::Dropping,
            chain_count: 0,
            move_count: self.move_count + 1,
            ..self.clone()
        })
    }

    /// Per-frame driver: advance by [`FRAME_TIME`].
    pub fn update_game(&self) -> Self {
        self.update(FRAME_TIME)
    }

    /// Advance the state machine; `elapsed` only matters while flashing.
    pub fn update(&self, elapsed: u32) -> Self {
        match self.state {
            GameState::Idle | GameState::Playing | GameState::GameOver => self.clone(),
            GameState::Dropping => self.drop_step(),
            GameState::CheckingChains => self.check_chains(),
            GameState::FlashingPuyos => self.flash_step(elapsed),
        }
    }

    fn drop_step(&self) -> Self {
        let (board, moved) = self.board.apply_gravity();
        if moved {
            trace!("gravity step");
            Self {
                board,
                ..self.clone()
            }
        } else {
            Self {
                state: GameState::CheckingChains,
                ..self.clone()
            }
        }
    }

    fn check_chains(&self) -> Self {
        let groups = self.board.find_groups();
        if groups.is_empty() {
            if self.chain_count > 0 {
                debug!(chain = self.chain_count, score = self.score, "cascade finished");
            }
            let last_chain = if self.chain_count > 0 {
                self.chain_count
            } else {
                self.last_chain
            };
            return Self {
                chain_count: 0,
                last_chain,
                ..self.clone()
            }
            .spawn();
        }
        let chain = self.chain_count + 1;
        let cleared = ClearedGroups::from_groups(&groups);
        let step_score = calculate_score(chain, &cleared);
        debug!(
            chain,
            puyos = cleared.puyo_count,
            groups = ?cleared.group_sizes,
            colors = cleared.distinct_colors,
            step_score,
            "chain step"
        );
        Self {
            board: self.board.mark_for_deletion(&groups),
            state: GameState::FlashingPuyos,
            score: self.score + step_score,
            chain_count: chain,
            max_chain: self.max_chain.max(chain),
            flashing_time: 0,
            last_step_score: step_score,
            ..self.clone()
        }
    }

    fn flash_step(&self, elapsed: u32) -> Self {
        let flashing_time = self.flashing_time.saturating_add(elapsed);
        if flashing_time < FLASH_DURATION {
            return Self {
                flashing_time,
                ..self.clone()
            };
        }
        Self {
            board: self.board.remove_marked(),
            state: GameState::Dropping,
            flashing_time: 0,
            ..self.clone()
        }
    }

    /// Tick until a pair is controllable again (or the game is over or idle).
    pub fn run_until_controllable(&self) -> Self {
        let mut game = self.clone();
        while matches!(
            game.state,
            GameState::Dropping | GameState::CheckingChains | GameState::FlashingPuyos
        ) {
            game = game.update_game();
        }
        game
    }
}
