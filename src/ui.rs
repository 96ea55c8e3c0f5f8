//! Layout and drawing: board, next pair, score, chain and game-over screen.

use crate::theme::Theme;
use puyotui::board::{FIRST_NORMAL_ROW, HEIGHT, WIDTH};
use puyotui::{Game, GameState, Puyo, PuyoPair, Renderer};
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, Paragraph, Widget};
use ratatui::{DefaultTerminal, Frame};

/// Each puyo is drawn two terminal columns wide.
const CELL_WIDTH: u16 = 2;
const SIDEBAR_WIDTH: u16 = 24;
const PUYO_SYMBOL: &str = "● ";
const MARKED_SYMBOL: &str = "◎ ";

/// Board size in terminal cells, border included.
fn board_area_size() -> (u16, u16) {
    (WIDTH as u16 * CELL_WIDTH + 2, HEIGHT as u16 + 2)
}

pub struct TerminalRenderer {
    terminal: DefaultTerminal,
    theme: Theme,
    high_score: u32,
}

impl TerminalRenderer {
    pub fn new(terminal: DefaultTerminal, theme: Theme) -> Self {
        Self {
            terminal,
            theme,
            high_score: 0,
        }
    }

    pub fn set_high_score(&mut self, score: u32) {
        self.high_score = score;
    }
}

impl Renderer for TerminalRenderer {
    type Error = std::io::Error;

    fn render(&mut self, game: &Game, undo_available: bool, redo_available: bool) -> std::io::Result<()> {
        let theme = &self.theme;
        let high_score = self.high_score;
        self.terminal.draw(|f| {
            draw_game(f, theme, game, high_score, undo_available, redo_available);
        })?;
        Ok(())
    }

    fn render_game_over(&mut self, score: u32) -> std::io::Result<()> {
        let theme = &self.theme;
        let high_score = self.high_score;
        self.terminal.draw(|f| draw_game_over(f, theme, score, high_score))?;
        Ok(())
    }
}

/// Centre a `width` x `height` rectangle inside `area`.
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let horiz = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Fill(1),
            Constraint::Length(width),
            Constraint::Fill(1),
        ])
        .split(area);
    let vert = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Fill(1),
            Constraint::Length(height),
            Constraint::Fill(1),
        ])
        .split(horiz[1]);
    vert[1]
}

fn draw_game(
    frame: &mut Frame,
    theme: &Theme,
    game: &Game,
    high_score: u32,
    undo_available: bool,
    redo_available: bool,
) {
    let (bw, bh) = board_area_size();
    let active = centered(frame.area(), bw + SIDEBAR_WIDTH, bh);
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(bw), Constraint::Length(SIDEBAR_WIDTH)])
        .split(active);
    draw_board(frame, theme, game, chunks[0]);
    draw_sidebar(frame, theme, game, high_score, undo_available, redo_available, chunks[1]);
}

fn cell_style(theme: &Theme, puyo: Puyo, y: usize) -> (&'static str, Style) {
    let row_bg = if y < FIRST_NORMAL_ROW {
        theme.div_line
    } else {
        theme.bg
    };
    if puyo.is_empty() {
        return ("  ", Style::default().bg(row_bg));
    }
    if puyo.is_marked() {
        return (
            MARKED_SYMBOL,
            Style::default()
                .fg(Color::White)
                .bg(row_bg)
                .add_modifier(Modifier::BOLD),
        );
    }
    let fg = theme.puyo_color(puyo.color);
    let style = if y < FIRST_NORMAL_ROW {
        Style::default().fg(fg).bg(row_bg).add_modifier(Modifier::DIM)
    } else {
        Style::default().fg(fg).bg(row_bg)
    };
    (PUYO_SYMBOL, style)
}

fn draw_board(frame: &mut Frame, theme: &Theme, game: &Game, area: Rect) {
    let title = match game.chain_count() {
        0 => " puyotui ".to_string(),
        n => format!(" {n} chain! "),
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.div_line).bg(theme.bg))
        .title(Span::styled(title, Style::default().fg(theme.title)));
    let inner = block.inner(area);
    block.render(area, frame.buffer_mut());

    let pair_cells = game.current_pair().map(PuyoPair::cells);
    let buf = frame.buffer_mut();
    for y in 0..HEIGHT {
        for x in 0..WIDTH {
            let falling = pair_cells.iter().flatten().find(|(pos, _)| {
                pos.x == x as i32 && pos.y == y as i32
            });
            let puyo = falling.map_or_else(|| game.board().get(x as i32, y as i32), |&(_, p)| p);
            let (symbol, style) = cell_style(theme, puyo, y);
            let rx = inner.x + x as u16 * CELL_WIDTH;
            let ry = inner.y + y as u16;
            if rx + 1 < inner.x + inner.width && ry < inner.y + inner.height {
                buf.set_string(rx, ry, symbol, style);
            }
        }
    }
}

fn draw_sidebar(
    frame: &mut Frame,
    theme: &Theme,
    game: &Game,
    high_score: u32,
    undo_available: bool,
    redo_available: bool,
    area: Rect,
) {
    let title_style = Style::default().fg(theme.title);
    let fg_style = Style::default().fg(theme.main_fg);
    let dim_style = Style::default().fg(theme.inactive_fg);
    let border_style = Style::default().fg(theme.div_line).bg(theme.bg);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5), // Next
            Constraint::Length(8), // Stats
            Constraint::Fill(1),   // Keys
        ])
        .split(area);

    // --- Next ---
    let next_block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(Span::styled("Next", title_style));
    let next_inner = next_block.inner(chunks[0]);
    next_block.render(chunks[0], frame.buffer_mut());
    if let Some(next) = game.next_pair() {
        let buf = frame.buffer_mut();
        // Second puyo on top, as it spawns.
        for (row, puyo) in [next.second_puyo, next.main_puyo].into_iter().enumerate() {
            let style = Style::default().fg(theme.puyo_color(puyo.color)).bg(theme.bg);
            let ry = next_inner.y + row as u16;
            if ry < next_inner.y + next_inner.height {
                buf.set_string(next_inner.x + 1, ry, PUYO_SYMBOL, style);
            }
        }
    }

    // --- Stats ---
    let stat = |label: &str, value: String| {
        Line::from(vec![
            Span::styled(format!("{label}: "), title_style),
            Span::styled(value, fg_style),
        ])
    };
    let flag = |on: bool| (if on { "yes" } else { "no" }).to_string();
    let stats = vec![
        stat("Score", game.score().to_string()),
        stat("Best", high_score.max(game.score()).to_string()),
        stat("Chain", format!("{} (max {})", game.last_chain(), game.max_chain())),
        stat("Moves", game.move_count().to_string()),
        stat("State", state_label(game.state()).to_string()),
        Line::from(vec![
            Span::styled("Undo ", title_style),
            Span::styled(flag(undo_available), fg_style),
            Span::styled("  Redo ", title_style),
            Span::styled(flag(redo_available), fg_style),
        ]),
    ];
    let stats_block = Block::default().borders(Borders::ALL).border_style(border_style);
    let stats_inner = stats_block.inner(chunks[1]);
    stats_block.render(chunks[1], frame.buffer_mut());
    Paragraph::new(Text::from(stats)).render(stats_inner, frame.buffer_mut());

    let keys = Text::from(vec![
        Line::from(Span::styled("←/→ move  ↓ soft", dim_style)),
        Line::from(Span::styled("↑/x cw  z ccw  c flip", dim_style)),
        Line::from(Span::styled("space drop  u/r undo/redo", dim_style)),
        Line::from(Span::styled("n new  q quit", dim_style)),
    ]);
    Paragraph::new(keys).render(chunks[2], frame.buffer_mut());
}

fn state_label(state: GameState) -> &'static str {
    match state {
        GameState::Idle => "idle",
        GameState::Playing => "playing",
        GameState::Dropping => "dropping",
        GameState::CheckingChains => "checking",
        GameState::FlashingPuyos => "clearing",
        GameState::GameOver => "game over",
    }
}

fn draw_game_over(frame: &mut Frame, theme: &Theme, score: u32, high_score: u32) {
    let area = centered(frame.area(), 30, 7);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.div_line).bg(theme.bg))
        .title(Span::styled(" Game over ", Style::default().fg(theme.title)));
    let best = if score > 0 && score >= high_score {
        "New best!".to_string()
    } else {
        format!("Best: {high_score}")
    };
    let text = Text::from(vec![
        Line::from(Span::styled(
            format!("Score: {score}"),
            Style::default().fg(theme.main_fg).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(best, Style::default().fg(theme.main_fg))),
        Line::from(""),
        Line::from(Span::styled(
            "n: new game   q: quit",
            Style::default().fg(theme.inactive_fg),
        )),
    ]);
    Paragraph::new(text)
        .block(block)
        .alignment(Alignment::Center)
        .render(area, frame.buffer_mut());
}
