//! App: terminal init, main loop, tick and key handling.

use crate::GameConfig;
use crate::highscores;
use crate::input::{key_to_action, Action};
use crate::theme::Theme;
use crate::ui::TerminalRenderer;
use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyEventKind};
use puyotui::{Game, GameHistory, GameState, PuyoSeqProvider, Renderer};
use std::path::Path;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

pub struct App {
    config: GameConfig,
    provider: PuyoSeqProvider,
    theme: Theme,
    game: Game,
    history: GameHistory,
    high_score: u32,
    /// Game-over already handled (best score saved).
    game_over_seen: bool,
}

impl App {
    pub fn new(config: GameConfig, sequence_file: Option<&Path>, theme: Theme) -> Result<Self> {
        let provider = PuyoSeqProvider::new();
        match sequence_file {
            Some(path) => provider
                .load_from_path(path)
                .with_context(|| format!("loading sequence table {}", path.display()))?,
            None => provider.load_default()?,
        }
        let mut app = Self {
            config,
            provider,
            theme,
            game: Game::new(),
            history: GameHistory::new(),
            high_score: highscores::load_high_score(),
            game_over_seen: false,
        };
        app.start_game()?;
        Ok(app)
    }

    fn start_game(&mut self) -> Result<()> {
        self.game = Game::start_game(&self.provider, self.config.seed)?;
        self.history.clear();
        self.history.record(&self.game);
        self.game_over_seen = false;
        Ok(())
    }

    /// Apply a player action. Rejected commands leave the game as it was.
    fn apply_action(&mut self, action: Action) -> Result<()> {
        let result = match action {
            Action::MoveLeft => self.game.move_left(),
            Action::MoveRight => self.game.move_right(),
            Action::RotateCw => self.game.rotate_clockwise(),
            Action::RotateCcw => self.game.rotate_counter_clockwise(),
            Action::QuickTurn => self.game.quick_turn(),
            Action::SoftDrop => self.game.soft_drop(),
            Action::HardDrop => self.game.hard_drop(),
            Action::Undo => {
                self.step_history(true);
                return Ok(());
            }
            Action::Redo => {
                self.step_history(false);
                return Ok(());
            }
            Action::NewGame => return self.start_game(),
            Action::Quit | Action::None => return Ok(()),
        };
        match result {
            Ok(next) => self.advance_to(next),
            Err(err) => debug!(?action, %err, "command rejected"),
        }
        Ok(())
    }

    /// Undo/redo only while a pair is under control.
    fn step_history(&mut self, back: bool) {
        if self.game.state() != GameState::Playing {
            return;
        }
        let snapshot = if back {
            self.history.undo()
        } else {
            self.history.redo()
        };
        if let Some(game) = snapshot {
            info!(back, move_count = game.move_count(), "history step");
            self.game = game;
        }
    }

    /// Swap in a new snapshot, recording it when a new pair has just become controllable.
    fn advance_to(&mut self, next: Game) {
        let spawned = next.state() == GameState::Playing && self.game.state() != GameState::Playing;
        self.game = next;
        if spawned {
            self.history.record(&self.game);
        }
        if self.game.is_game_over() && !self.game_over_seen {
            self.game_over_seen = true;
            if self.game.score() > self.high_score {
                self.high_score = self.game.score();
                if let Err(err) = highscores::save_high_score(self.high_score) {
                    warn!(%err, "could not save high score");
                }
            }
        }
    }

    pub fn run(&mut self) -> Result<()> {
        use crossterm::{
            execute,
            terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
        };

        enable_raw_mode()?;
        let mut stdout = std::io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let terminal = ratatui::DefaultTerminal::new(ratatui::backend::CrosstermBackend::new(stdout))?;
        let mut renderer = TerminalRenderer::new(terminal, self.theme.clone());

        let result = self.run_loop(&mut renderer);

        // Restore
        execute!(std::io::stdout(), LeaveAlternateScreen)?;
        disable_raw_mode()?;

        result
    }

    fn run_loop(&mut self, renderer: &mut TerminalRenderer) -> Result<()> {
        let frame = Duration::from_millis(self.config.frame_ms);
        let mut last_tick = Instant::now();
        loop {
            renderer.set_high_score(self.high_score);
            if self.game.is_game_over() {
                renderer.render_game_over(self.game.score())?;
            } else {
                renderer.render(&self.game, self.history.can_undo(), self.history.can_redo())?;
            }

            let timeout = frame.saturating_sub(last_tick.elapsed());
            if event::poll(timeout)? {
                while event::poll(Duration::ZERO)? {
                    if let Event::Key(key) = event::read()? {
                        if key.kind != KeyEventKind::Press {
                            continue;
                        }
                        let action = key_to_action(key);
                        if action == Action::Quit {
                            return Ok(());
                        }
                        self.apply_action(action)?;
                    }
                }
            }

            if last_tick.elapsed() >= frame {
                let next = self.game.update(self.config.frame_ms as u32);
                self.advance_to(next);
                last_tick = Instant::now();
            }
        }
    }
}
