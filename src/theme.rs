//! Theme loading: btop-style `theme[key]="value"` and hex → ratatui Color.

use puyotui::PuyoColor;
use ratatui::style::Color;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

/// Puyo and UI colours.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Indexed by `PuyoColor::index`: red, green, blue, yellow, purple.
    pub puyo: [Color; 5],
    pub bg: Color,
    /// Border and row-band separators.
    pub div_line: Color,
    pub main_fg: Color,
    pub title: Color,
    /// Crane and ghost rows, hints.
    pub inactive_fg: Color,
}

#[derive(Debug, Error)]
pub enum ThemeError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid hex: {0}")]
    InvalidHex(String),
}

/// (field key, btop fallback key, One Dark default)
const PUYO_KEYS: [(&str, &str, (u8, u8, u8)); 5] = [
    ("puyo_red", "cpu_end", (0xE0, 0x6C, 0x75)),
    ("puyo_green", "mem_box", (0x98, 0xC3, 0x79)),
    ("puyo_blue", "cpu_box", (0x61, 0xAF, 0xEF)),
    ("puyo_yellow", "cpu_mid", (0xE5, 0xC0, 0x7B)),
    ("puyo_purple", "net_box", (0xC6, 0x78, 0xDD)),
];

impl Default for Theme {
    fn default() -> Self {
        Self::from_map(&HashMap::new())
    }
}

impl Theme {
    /// Load from a theme file; no path or a missing file gives the One Dark defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ThemeError> {
        let path = match path {
            Some(p) if p.exists() => p,
            _ => return Ok(Self::default()),
        };
        let s = std::fs::read_to_string(path)?;
        Ok(Self::from_map(&parse_theme_file(&s)))
    }

    fn from_map(map: &HashMap<String, String>) -> Self {
        let get = |key: &str| map.get(key).and_then(|v| parse_hex(v).ok());
        let rgb = |(r, g, b): (u8, u8, u8)| Color::Rgb(r, g, b);
        let puyo = PUYO_KEYS.map(|(key, fallback, default)| {
            get(key).or_else(|| get(fallback)).unwrap_or_else(|| rgb(default))
        });
        Self {
            puyo,
            bg: get("meter_bg").unwrap_or(rgb((0x31, 0x35, 0x3F))),
            div_line: get("div_line").unwrap_or(rgb((0x3F, 0x44, 0x4F))),
            main_fg: get("main_fg").unwrap_or(rgb((0xAB, 0xB2, 0xBF))),
            title: get("title").unwrap_or(rgb((0xE5, 0xC0, 0x7B))),
            inactive_fg: get("inactive_fg").unwrap_or(rgb((0x5C, 0x63, 0x70))),
        }
    }

    /// Colour for a puyo; empty cells get the background.
    pub fn puyo_color(&self, color: PuyoColor) -> Color {
        color.index().map_or(self.bg, |i| self.puyo[i])
    }
}

/// Parse btop-style theme file into key -> value map.
fn parse_theme_file(s: &str) -> HashMap<String, String> {
    s.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| {
            let rest = line.strip_prefix("theme[")?;
            let (key, rest) = rest.split_once(']')?;
            let (_, value) = rest.split_once('=')?;
            let value = value.trim().trim_matches('"').trim_matches('\'');
            (!value.is_empty()).then(|| (key.trim().to_string(), value.to_string()))
        })
        .collect()
}

/// Parse hex colour "#RRGGBB" or "#RGB" into ratatui Color.
pub fn parse_hex(s: &str) -> Result<Color, ThemeError> {
    let hex = s.trim().trim_start_matches('#');
    let invalid = || ThemeError::InvalidHex(hex.to_string());
    let channel = |range: std::ops::Range<usize>, scale: u8| {
        hex.get(range)
            .and_then(|c| u8::from_str_radix(c, 16).ok())
            .map(|v| v * scale)
            .ok_or_else(invalid)
    };
    match hex.len() {
        6 => Ok(Color::Rgb(channel(0..2, 1)?, channel(2..4, 1)?, channel(4..6, 1)?)),
        3 => Ok(Color::Rgb(channel(0..1, 17)?, channel(1..2, 17)?, channel(2..3, 17)?)),
        _ => Err(invalid()),
    }
}
