//! Seeded, table-driven puyo colour sequences.
//!
//! The table is a line-oriented text resource: every non-blank line that does not start with
//! `#` holds [`SEQUENCE_LENGTH`] colour letters (`r g b y p`). A seed selects line
//! `seed mod line_count`. The table is parsed once per [`PuyoSeqProvider`]; every sequence handed
//! out afterwards shares the same colour slice, so a seed maps to identical colours for as long
//! as the provider lives.

use crate::error::{GameError, Result};
use crate::puyo::PuyoColor;
use std::path::Path;
use std::sync::{Arc, OnceLock};
use tracing::{debug, info};

pub const SEQUENCE_LENGTH: usize = 256;

/// Table shipped with the crate.
pub const DEFAULT_TABLE: &str = include_str!("../assets/puyo_sequences.txt");

/// Immutable colour sequence; indices wrap around its length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PuyoSeq {
    seed: u64,
    colors: Arc<[PuyoColor]>,
}

impl PuyoSeq {
    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn colors(&self) -> &[PuyoColor] {
        &self.colors
    }

    #[inline]
    pub fn get(&self, index: usize) -> PuyoColor {
        self.colors[index % self.colors.len()]
    }

    /// Colours of the `n`-th pair: (main, second).
    pub fn pair(&self, n: usize) -> (PuyoColor, PuyoColor) {
        (self.get(2 * n), self.get(2 * n + 1))
    }
}

/// Load-once, query-many source of [`PuyoSeq`]s.
#[derive(Debug, Default)]
pub struct PuyoSeqProvider {
    table: OnceLock<Vec<Arc<[PuyoColor]>>>,
}

impl PuyoSeqProvider {
    /// Provider with nothing loaded; [`Self::create_puyo_seq`] fails until a load succeeds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Provider preloaded with [`DEFAULT_TABLE`].
    pub fn with_default_table() -> Result<Self> {
        let provider = Self::new();
        provider.load_default()?;
        Ok(provider)
    }

    pub fn is_loaded(&self) -> bool {
        self.table.get().is_some()
    }

    pub fn line_count(&self) -> usize {
        self.table.get().map_or(0, Vec::len)
    }

    /// Parse and cache `text`. Only the first successful load counts; later calls are no-ops.
    pub fn load_from_str(&self, text: &str) -> Result<()> {
        if self.is_loaded() {
            return Ok(());
        }
        let lines = parse_table(text)?;
        let count = lines.len();
        if self.table.set(lines).is_ok() {
            info!(lines = count, "puyo sequence table loaded");
        }
        Ok(())
    }

    pub fn load_from_path(&self, path: &Path) -> Result<()> {
        if self.is_loaded() {
            return Ok(());
        }
        let text = std::fs::read_to_string(path)?;
        self.load_from_str(&text)
    }

    pub fn load_default(&self) -> Result<()> {
        self.load_from_str(DEFAULT_TABLE)
    }

    /// Sequence for `seed`, or [`GameError::PuyoSeqNotLoaded`] before the table is loaded.
    pub fn create_puyo_seq(&self, seed: u64) -> Result<PuyoSeq> {
        let table = self.table.get().ok_or(GameError::PuyoSeqNotLoaded)?;
        let line = (seed % table.len() as u64) as usize;
        debug!(seed, line, "puyo sequence selected");
        Ok(PuyoSeq {
            seed,
            colors: Arc::clone(&table[line]),
        })
    }
}

fn parse_table(text: &str) -> Result<Vec<Arc<[PuyoColor]>>> {
    let mut lines = Vec::new();
    for (i, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let colors: Vec<PuyoColor> = line.chars().map(PuyoColor::from_code).collect();
        if colors.len() != SEQUENCE_LENGTH {
            return Err(GameError::SequenceFormat {
                line: i + 1,
                reason: format!("expected {SEQUENCE_LENGTH} colours, found {}", colors.len()),
            });
        }
        lines.push(Arc::from(colors));
    }
    if lines.is_empty() {
        return Err(GameError::SequenceFormat {
            line: 0,
            reason: "no sequence lines".to_string(),
        });
    }
    Ok(lines)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(c: char) -> String {
        std::iter::repeat(c).take(SEQUENCE_LENGTH).collect()
    }

    #[test]
    fn not_loaded_is_retryable() {
        let provider = PuyoSeqProvider::new();
        let err = provider.create_puyo_seq(1).unwrap_err();
        assert!(matches!(err, GameError::PuyoSeqNotLoaded));
        assert!(err.is_retryable());
        provider.load_default().unwrap();
        assert!(provider.create_puyo_seq(1).is_ok());
    }

    #[test]
    fn same_seed_same_sequence() {
        let provider = PuyoSeqProvider::with_default_table().unwrap();
        for seed in [0u64, 1, 7, 127, 128, 65_535, u64::MAX] {
            let a = provider.create_puyo_seq(seed).unwrap();
            let b = provider.create_puyo_seq(seed).unwrap();
            assert_eq!(a.len(), SEQUENCE_LENGTH);
            assert_eq!(a.colors(), b.colors());
        }
    }

    #[test]
    fn distinct_lines_differ() {
        let provider = PuyoSeqProvider::with_default_table().unwrap();
        let n = provider.line_count() as u64;
        assert!(n > 1);
        for s1 in 0..n {
            for s2 in (s1 + 1)..n {
                let a = provider.create_puyo_seq(s1).unwrap();
                let b = provider.create_puyo_seq(s2).unwrap();
                assert_ne!(a.colors(), b.colors(), "seeds {s1} and {s2}");
            }
        }
    }

    #[test]
    fn seed_wraps_modulo_line_count() {
        let text = format!("# header\n\n{}\n{}\n", line('r'), line('b'));
        let provider = PuyoSeqProvider::new();
        provider.load_from_str(&text).unwrap();
        assert_eq!(provider.line_count(), 2);
        assert_eq!(provider.create_puyo_seq(0).unwrap().get(0), PuyoColor::Red);
        assert_eq!(provider.create_puyo_seq(3).unwrap().get(0), PuyoColor::Blue);
    }

    #[test]
    fn first_load_wins() {
        let provider = PuyoSeqProvider::new();
        provider.load_from_str(&line('g')).unwrap();
        provider.load_from_str(&line('y')).unwrap();
        assert_eq!(provider.create_puyo_seq(0).unwrap().get(5), PuyoColor::Green);
    }

    #[test]
    fn unknown_letters_default_to_red() {
        let mut text = line('g');
        text.replace_range(0..1, "?");
        let provider = PuyoSeqProvider::new();
        provider.load_from_str(&text).unwrap();
        let seq = provider.create_puyo_seq(0).unwrap();
        assert_eq!(seq.get(0), PuyoColor::Red);
        assert_eq!(seq.get(1), PuyoColor::Green);
    }

    #[test]
    fn bad_line_length_is_rejected() {
        let provider = PuyoSeqProvider::new();
        let err = provider.load_from_str("rgb\n").unwrap_err();
        assert!(matches!(err, GameError::SequenceFormat { line: 1, .. }));
        assert!(!provider.is_loaded());
        assert!(matches!(
            provider.load_from_str("# only comments\n"),
            Err(GameError::SequenceFormat { line: 0, .. })
        ));
    }

    #[test]
    fn pairs_use_consecutive_indices_and_wrap() {
        let provider = PuyoSeqProvider::with_default_table().unwrap();
        let seq = provider.create_puyo_seq(42).unwrap();
        assert_eq!(seq.pair(0), (seq.get(0), seq.get(1)));
        assert_eq!(seq.pair(3), (seq.get(6), seq.get(7)));
        assert_eq!(seq.pair(128), seq.pair(0));
    }
}
