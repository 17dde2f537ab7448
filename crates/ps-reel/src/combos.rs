//! Win-combination catalog

use serde::{Deserialize, Serialize};

use crate::symbols::Symbol;

/// Identifies a winning combination
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WinKind {
    Replay,
    Bell,
    Watermelon,
    Cherry,
    /// Middle-row cherry on the left reel; guarantees a BIG bonus
    CherryGuarantee,
    /// The reach pattern (watermelon top/middle/top); pays nothing,
    /// signals a pending bonus
    Reach,
}

/// A catalog entry: target symbols per reel, payout and flags
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WinCombination {
    pub kind: WinKind,
    /// Target symbol per reel; `None` leaves that reel unconstrained
    pub symbols: [Option<Symbol>; 3],
    /// Base payout in credits
    pub payout: u32,
    /// Payout override while a bonus is active
    pub bonus_payout: Option<u32>,
    /// Grants a free next game instead of paying out
    pub is_replay: bool,
    /// Entry guarantees a BIG bonus at lottery time
    pub is_bonus_guarantee: bool,
}

impl WinCombination {
    /// Look up the catalog entry for a kind
    pub fn of(kind: WinKind) -> Self {
        use Symbol::*;
        match kind {
            WinKind::Replay => Self {
                kind,
                symbols: [Some(Replay), Some(Replay), Some(Replay)],
                payout: 0,
                bonus_payout: None,
                is_replay: true,
                is_bonus_guarantee: false,
            },
            WinKind::Bell => Self {
                kind,
                symbols: [Some(Bell), Some(Bell), Some(Bell)],
                payout: 5,
                bonus_payout: Some(11),
                is_replay: false,
                is_bonus_guarantee: false,
            },
            WinKind::Watermelon => Self {
                kind,
                symbols: [Some(Watermelon), Some(Watermelon), Some(Watermelon)],
                payout: 10,
                bonus_payout: None,
                is_replay: false,
                is_bonus_guarantee: false,
            },
            WinKind::Cherry => Self {
                kind,
                symbols: [Some(Cherry), None, None],
                payout: 2,
                bonus_payout: None,
                is_replay: false,
                is_bonus_guarantee: false,
            },
            WinKind::CherryGuarantee => Self {
                kind,
                symbols: [Some(Cherry), None, None],
                payout: 2,
                bonus_payout: None,
                is_replay: false,
                is_bonus_guarantee: true,
            },
            WinKind::Reach => Self {
                kind,
                symbols: [Some(Watermelon), Some(Watermelon), Some(Watermelon)],
                payout: 0,
                bonus_payout: None,
                is_replay: false,
                is_bonus_guarantee: false,
            },
        }
    }

    /// Effective payout given the bonus state
    pub fn payout_in(&self, in_bonus: bool) -> u32 {
        if in_bonus {
            self.bonus_payout.unwrap_or(self.payout)
        } else {
            self.payout
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bell_bonus_override() {
        let bell = WinCombination::of(WinKind::Bell);
        assert_eq!(bell.payout_in(false), 5);
        assert_eq!(bell.payout_in(true), 11);
    }

    #[test]
    fn test_replay_pays_nothing() {
        let replay = WinCombination::of(WinKind::Replay);
        assert!(replay.is_replay);
        assert_eq!(replay.payout_in(false), 0);
        assert_eq!(replay.payout_in(true), 0);
    }

    #[test]
    fn test_cherry_constrains_left_reel_only() {
        let cherry = WinCombination::of(WinKind::Cherry);
        assert_eq!(cherry.symbols[0], Some(Symbol::Cherry));
        assert_eq!(cherry.symbols[1], None);
        assert_eq!(cherry.symbols[2], None);
    }

    #[test]
    fn test_guarantee_flag() {
        assert!(WinCombination::of(WinKind::CherryGuarantee).is_bonus_guarantee);
        assert!(!WinCombination::of(WinKind::Cherry).is_bonus_guarantee);
    }
}
