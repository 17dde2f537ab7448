//! Stop-position resolution
//!
//! Reconciles "which symbol must land in which row" with the reel the
//! player just stopped. The search never considers the reel's in-flight
//! position: any stop index is reachable. Real machines bound the pull-in
//! range; the reference does not, and neither does this resolver.

use rand::Rng;
use rand::rngs::StdRng;

use ps_reel::{REEL_COUNT, ReelStrip, Symbol, WinCombination, WinKind};

/// Which visible row the target symbol must occupy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RowTarget {
    Top,
    Middle,
    Bottom,
}

impl RowTarget {
    /// Offset added to the symbol's strip index to obtain the middle-row
    /// stop index: the top row shows the symbol one position before the
    /// middle, the bottom row one position after.
    fn index_delta(self) -> isize {
        match self {
            RowTarget::Top => 1,
            RowTarget::Middle => 0,
            RowTarget::Bottom => -1,
        }
    }
}

/// Resolve the discrete stop index for `reel_index`.
///
/// `left_middle_symbols` holds the middle-row symbols of reels already
/// stopped to the left, used for best-effort near-miss avoidance when no
/// win is pending.
pub(crate) fn resolve_stop_position(
    strips: &[ReelStrip; REEL_COUNT],
    reel_index: usize,
    pending: Option<&WinCombination>,
    left_middle_symbols: &[Symbol],
    rng: &mut StdRng,
) -> usize {
    let strip = &strips[reel_index];

    let Some(win) = pending else {
        return resolve_miss_position(strip, left_middle_symbols, rng);
    };

    let Some(target) = win.symbols[reel_index] else {
        // This reel is unconstrained by the win
        return rng.random_range(0..strip.len());
    };

    let row = required_row(win.kind, reel_index, rng);

    // Place the first occurrence of the target in the required row; the
    // wrap-around strip makes any row offset reachable from an occurrence.
    if let Some(j) = strip.positions_of(target).next() {
        return strip.offset(j, row.index_delta());
    }

    // Symbol absent from the strip entirely
    rng.random_range(0..strip.len())
}

/// Row the win's semantics demand for this reel
fn required_row(kind: WinKind, reel_index: usize, rng: &mut StdRng) -> RowTarget {
    match kind {
        // Reach pattern lands watermelon top / middle / top
        WinKind::Reach => match reel_index {
            1 => RowTarget::Middle,
            _ => RowTarget::Top,
        },
        WinKind::CherryGuarantee => RowTarget::Middle,
        // Plain cherry shows on the top or bottom row of the left reel
        WinKind::Cherry => {
            if rng.random::<bool>() {
                RowTarget::Top
            } else {
                RowTarget::Bottom
            }
        }
        _ => RowTarget::Middle,
    }
}

/// No win pending: avoid echoing the middle-row symbols of reels already
/// stopped to the left, falling back to a uniform draw.
fn resolve_miss_position(
    strip: &ReelStrip,
    left_middle_symbols: &[Symbol],
    rng: &mut StdRng,
) -> usize {
    let candidates: Vec<usize> = (0..strip.len())
        .filter(|&i| !left_middle_symbols.contains(&strip.symbol_at(i)))
        .collect();

    if candidates.is_empty() {
        rng.random_range(0..strip.len())
    } else {
        candidates[rng.random_range(0..candidates.len())]
    }
}
