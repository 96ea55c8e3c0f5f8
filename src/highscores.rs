//! Best score on disk (XDG config or ~/.config/puyotui).

use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

const FILENAME: &str = "highscore";

fn config_dir() -> PathBuf {
    let xdg = std::env::var("XDG_CONFIG_HOME").ok().filter(|s| !s.is_empty());
    let base = match xdg {
        Some(dir) => PathBuf::from(dir),
        None => std::env::var("HOME")
            .map(|h| PathBuf::from(h).join(".config"))
            .unwrap_or_else(|_| PathBuf::from(".")),
    };
    base.join("puyotui")
}

/// Best score so far; 0 when the file is missing or unreadable.
pub fn load_high_score() -> u32 {
    fs::read_to_string(config_dir().join(FILENAME))
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(0)
}

pub fn save_high_score(score: u32) -> Result<()> {
    let dir = config_dir();
    fs::create_dir_all(&dir).with_context(|| format!("creating {}", dir.display()))?;
    fs::write(dir.join(FILENAME), format!("{score}\n"))?;
    Ok(())
}
