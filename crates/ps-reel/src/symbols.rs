//! Symbol definitions and reel strips

use serde::{Deserialize, Serialize};

/// Height of one symbol on the rendered strip, in pixels.
///
/// The continuous reel position is expressed in these units: a full
/// revolution of a 20-symbol strip spans `20.0 * SYMBOL_HEIGHT`.
pub const SYMBOL_HEIGHT: f64 = 50.0;

/// Number of reels on the machine.
pub const REEL_COUNT: usize = 3;

/// A symbol printed on a reel strip
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Symbol {
    Bell = 0,
    Replay = 1,
    Watermelon = 2,
    Cherry = 3,
    Bar = 4,
    Seven = 5,
}

impl Symbol {
    /// Short display name, for logs and the CLI
    pub fn name(&self) -> &'static str {
        match self {
            Symbol::Bell => "BELL",
            Symbol::Replay => "REPLAY",
            Symbol::Watermelon => "WATERMELON",
            Symbol::Cherry => "CHERRY",
            Symbol::Bar => "BAR",
            Symbol::Seven => "SEVEN",
        }
    }
}

/// The fixed, repeating symbol sequence printed on one reel
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReelStrip {
    /// Symbols in strip order
    pub symbols: Vec<Symbol>,
    /// Which reel this strip belongs to (0 = left)
    pub reel_index: u8,
}

impl ReelStrip {
    pub fn new(reel_index: u8, symbols: Vec<Symbol>) -> Self {
        Self { symbols, reel_index }
    }

    /// Symbol at a discrete position, wrapping around the strip
    pub fn symbol_at(&self, position: usize) -> Symbol {
        self.symbols[position % self.symbols.len()]
    }

    /// Position shifted by a signed row offset, wrapped into the strip.
    ///
    /// Offset convention matches the visible window: the top row shows the
    /// symbol one position *before* the middle index, the bottom row one
    /// position after.
    pub fn offset(&self, position: usize, delta: isize) -> usize {
        let len = self.symbols.len() as isize;
        (((position as isize + delta) % len + len) % len) as usize
    }

    /// All strip indices holding the given symbol
    pub fn positions_of(&self, symbol: Symbol) -> impl Iterator<Item = usize> + '_ {
        self.symbols
            .iter()
            .enumerate()
            .filter(move |(_, s)| **s == symbol)
            .map(|(i, _)| i)
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Total strip height in continuous-position units
    pub fn scroll_height(&self) -> f64 {
        self.symbols.len() as f64 * SYMBOL_HEIGHT
    }
}

/// The three reel strips of the reference layout (20 symbols each)
pub fn reference_strips() -> [ReelStrip; REEL_COUNT] {
    use Symbol::*;
    [
        ReelStrip::new(0, vec![
            Bell, Replay, Watermelon, Cherry, Bar,
            Replay, Bell, Replay, Watermelon, Seven,
            Bell, Replay, Watermelon, Cherry, Bar,
            Replay, Bell, Replay, Watermelon, Seven,
        ]),
        ReelStrip::new(1, vec![
            Replay, Watermelon, Cherry, Bell, Replay,
            Bell, Replay, Watermelon, Seven, Replay,
            Bell, Bar, Cherry, Bell, Replay,
            Bell, Replay, Watermelon, Seven, Replay,
        ]),
        ReelStrip::new(2, vec![
            Watermelon, Cherry, Bell, Replay, Bell,
            Watermelon, Seven, Replay, Bell, Replay,
            Watermelon, Cherry, Bar, Replay, Bell,
            Watermelon, Seven, Replay, Bell, Replay,
        ]),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_strip_lengths() {
        for strip in reference_strips() {
            assert_eq!(strip.len(), 20);
        }
    }

    #[test]
    fn test_strip_wraps() {
        let strip = &reference_strips()[0];
        assert_eq!(strip.symbol_at(0), Symbol::Bell);
        assert_eq!(strip.symbol_at(20), Symbol::Bell);
        assert_eq!(strip.symbol_at(21), Symbol::Replay);
    }

    #[test]
    fn test_offset_wraps_both_ways() {
        let strip = &reference_strips()[0];
        assert_eq!(strip.offset(0, -1), 19);
        assert_eq!(strip.offset(19, 1), 0);
        assert_eq!(strip.offset(5, 0), 5);
    }

    #[test]
    fn test_positions_of_cherry_on_left_reel() {
        let strip = &reference_strips()[0];
        let positions: Vec<usize> = strip.positions_of(Symbol::Cherry).collect();
        assert_eq!(positions, vec![3, 13]);
    }

    #[test]
    fn test_every_strip_carries_every_symbol() {
        use Symbol::*;
        for strip in reference_strips() {
            for symbol in [Bell, Replay, Watermelon, Cherry, Bar, Seven] {
                assert!(
                    strip.positions_of(symbol).next().is_some(),
                    "reel {} is missing {:?}",
                    strip.reel_index,
                    symbol
                );
            }
        }
    }
}
