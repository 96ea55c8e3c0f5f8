//! In-memory undo/redo over controllable game snapshots.

use crate::game::{Game, GameState};
use std::collections::VecDeque;

/// Snapshots kept before the oldest is dropped.
pub const DEFAULT_CAPACITY: usize = 256;

#[derive(Debug, Clone)]
pub struct GameHistory {
    entries: VecDeque<Game>,
    /// Index of the snapshot the player is on.
    cursor: usize,
    capacity: usize,
}

impl Default for GameHistory {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}

impl GameHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            cursor: 0,
            capacity: capacity.max(1),
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.cursor = 0;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Record a freshly spawned pair. Ignores non-controllable snapshots and drops any redo branch.
    pub fn record(&mut self, game: &Game) -> bool {
        if game.state() != GameState::Playing {
            return false;
        }
        if !self.entries.is_empty() {
            self.entries.truncate(self.cursor + 1);
        }
        self.entries.push_back(game.clone());
        while self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
        self.cursor = self.entries.len() - 1;
        true
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.entries.len()
    }

    /// Snapshot of the previous pair, if any.
    pub fn undo(&mut self) -> Option<Game> {
        if !self.can_undo() {
            return None;
        }
        self.cursor -= 1;
        self.entries.get(self.cursor).cloned()
    }

    pub fn redo(&mut self) -> Option<Game> {
        if !self.can_redo() {
            return None;
        }
        self.cursor += 1;
        self.entries.get(self.cursor).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sequence::PuyoSeqProvider;

    fn play(game: &Game) -> Game {
        game.hard_drop().unwrap().run_until_controllable()
    }

    fn first_game() -> Game {
        let provider = PuyoSeqProvider::with_default_table().unwrap();
        Game::start_game(&provider, Some(11)).unwrap()
    }

    #[test]
    fn undo_redo_walks_snapshots() {
        let mut history = GameHistory::new();
        let g0 = first_game();
        let g1 = play(&g0);
        let g2 = play(&g1);
        assert!(history.record(&g0));
        assert!(history.record(&g1));
        assert!(history.record(&g2));
        assert!(!history.can_redo());

        assert_eq!(history.undo(), Some(g1.clone()));
        assert_eq!(history.undo(), Some(g0.clone()));
        assert_eq!(history.undo(), None);
        assert!(history.can_redo());
        assert_eq!(history.redo(), Some(g1.clone()));
        assert_eq!(history.redo(), Some(g2));
        assert_eq!(history.redo(), None);
    }

    #[test]
    fn recording_after_undo_drops_redo_branch() {
        let mut history = GameHistory::new();
        let g0 = first_game();
        let g1 = play(&g0);
        history.record(&g0);
        history.record(&g1);
        let back = history.undo().unwrap();
        let alt = play(&back.move_left().unwrap());
        history.record(&alt);
        assert!(!history.can_redo());
        assert_eq!(history.len(), 2);
        assert_eq!(history.undo(), Some(g0));
    }

    #[test]
    fn ignores_non_controllable_snapshots() {
        let mut history = GameHistory::new();
        let dropping = first_game().hard_drop().unwrap();
        assert!(!history.record(&dropping));
        assert!(history.is_empty());
    }

    #[test]
    fn capacity_drops_oldest() {
        let mut history = GameHistory::with_capacity(2);
        let g0 = first_game();
        let g1 = play(&g0);
        let g2 = play(&g1);
        history.record(&g0);
        history.record(&g1);
        history.record(&g2);
        assert_eq!(history.len(), 2);
        assert_eq!(history.undo(), Some(g1));
        assert!(!history.can_undo());
    }
}
