//! puyotui: falling-pair connect-and-clear puzzle in the terminal.

mod app;
mod highscores;
mod input;
mod theme;
mod ui;

use anyhow::{Context, Result};
use app::App;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing::Level;

/// Options resolved from the command line that shape a session.
#[derive(Debug, Clone)]
pub struct GameConfig {
    /// Fixed seed for every new game; random per game when `None`.
    pub seed: Option<u64>,
    /// Frame length in ms; also the time fed to each engine tick.
    pub frame_ms: u64,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args)?;
    let theme = theme::Theme::load(args.theme.as_deref()).unwrap_or_default();
    let config = GameConfig {
        seed: args.seed,
        frame_ms: args.frame_ms.max(1),
    };
    let mut app = App::new(config, args.sequence_file.as_deref(), theme)?;
    app.run()?;
    Ok(())
}

/// Log to a file only: the terminal belongs to the game screen.
fn init_logging(args: &Args) -> Result<()> {
    let Some(path) = &args.log_file else {
        return Ok(());
    };
    let file = std::fs::File::create(path)
        .with_context(|| format!("creating log file {}", path.display()))?;
    let level = if args.verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_max_level(level)
        .init();
    Ok(())
}

/// Falling-pair puzzle in the terminal.
#[derive(Debug, Parser)]
#[command(
    name = "puyotui",
    version,
    about = "Falling-pair puzzle in the terminal. Connect four or more of a colour to clear them and build chains.",
    long_about = "puyotui drops coloured pairs onto a 6-wide board. Groups of four or more \
        same-coloured puyos vanish; whatever falls into the gap can set off the next step \
        of a chain, and longer chains score far more.\n\n\
        CONTROLS:\n  Left/Right  Move      Up / x     Rotate CW    z        Rotate CCW\n  \
        c           Quick turn  Down      Soft drop    Space    Hard drop\n  \
        u           Undo      r          Redo         n        New game   q / Esc  Quit"
)]
pub struct Args {
    /// Seed selecting the pair sequence. Random for each game if not set.
    #[arg(short, long, value_name = "N")]
    pub seed: Option<u64>,

    /// Sequence table to load instead of the bundled one (one 256-letter line per seed bucket).
    #[arg(long, value_name = "FILE")]
    pub sequence_file: Option<PathBuf>,

    /// Path to theme file (btop-style theme[key]="value").
    #[arg(short, long, value_name = "FILE")]
    pub theme: Option<PathBuf>,

    /// Frame length in milliseconds.
    #[arg(long, default_value = "16", value_name = "MS")]
    pub frame_ms: u64,

    /// Write logs to this file.
    #[arg(long, value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Debug-level logging (needs --log-file).
    #[arg(short, long)]
    pub verbose: bool,
}
