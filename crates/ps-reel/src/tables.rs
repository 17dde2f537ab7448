//! Per-setting probability tables
//!
//! All odds are reproduced verbatim from the reference machine data.
//! Higher settings monotonically increase bonus probability.

use serde::{Deserialize, Serialize};

use crate::symbols::Symbol;

/// Lowest selectable setting
pub const MIN_SETTING: u8 = 1;
/// Highest selectable setting
pub const MAX_SETTING: u8 = 6;

/// Probability of the guaranteed-bonus roll (freeze combination)
pub const GUARANTEE_PROB: f64 = 1.0 / 8192.0;
/// Probability of the reach-pattern roll
pub const REACH_PROB: f64 = 1.0 / 6532.0;
/// Share of reach hits that become a BIG bonus (remainder is REG)
pub const REACH_BIG_SHARE: f64 = 0.4;

/// BIG bonus length in games
pub const BIG_BONUS_GAMES: u32 = 70;
/// REG bonus length in games
pub const REG_BONUS_GAMES: u32 = 20;

/// BIG/REG probability pair
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BonusOdds {
    pub big: f64,
    pub reg: f64,
}

/// Direct bonus odds per setting (index 0 = setting 1)
const BONUS_ODDS: [BonusOdds; 6] = [
    BonusOdds { big: 1.0 / 300.0, reg: 1.0 / 400.0 },
    BonusOdds { big: 1.0 / 280.0, reg: 1.0 / 380.0 },
    BonusOdds { big: 1.0 / 260.0, reg: 1.0 / 360.0 },
    BonusOdds { big: 1.0 / 240.0, reg: 1.0 / 340.0 },
    BonusOdds { big: 1.0 / 220.0, reg: 1.0 / 320.0 },
    BonusOdds { big: 1.0 / 200.0, reg: 1.0 / 300.0 },
];

/// Bonus odds rolled when a cherry lands, per setting
const CHERRY_BONUS_ODDS: [BonusOdds; 6] = [
    BonusOdds { big: 1.0 / 250.0, reg: 1.0 / 350.0 },
    BonusOdds { big: 1.0 / 230.0, reg: 1.0 / 330.0 },
    BonusOdds { big: 1.0 / 210.0, reg: 1.0 / 310.0 },
    BonusOdds { big: 1.0 / 190.0, reg: 1.0 / 290.0 },
    BonusOdds { big: 1.0 / 170.0, reg: 1.0 / 270.0 },
    BonusOdds { big: 1.0 / 150.0, reg: 1.0 / 250.0 },
];

/// Bonus odds rolled when a watermelon lands, per setting
const WATERMELON_BONUS_ODDS: [BonusOdds; 6] = [
    BonusOdds { big: 1.0 / 200.0, reg: 1.0 / 300.0 },
    BonusOdds { big: 1.0 / 180.0, reg: 1.0 / 280.0 },
    BonusOdds { big: 1.0 / 160.0, reg: 1.0 / 260.0 },
    BonusOdds { big: 1.0 / 140.0, reg: 1.0 / 240.0 },
    BonusOdds { big: 1.0 / 120.0, reg: 1.0 / 220.0 },
    BonusOdds { big: 1.0 / 100.0, reg: 1.0 / 200.0 },
];

fn table_index(setting: u8) -> usize {
    setting.clamp(MIN_SETTING, MAX_SETTING) as usize - 1
}

/// Direct bonus odds for a setting (1–6)
pub fn bonus_odds(setting: u8) -> BonusOdds {
    BONUS_ODDS[table_index(setting)]
}

/// Bonus odds for the secondary roll attached to a landed symbol.
///
/// Only cherry and watermelon carry a secondary roll; other symbols
/// return zero odds.
pub fn symbol_bonus_odds(setting: u8, symbol: Symbol) -> BonusOdds {
    match symbol {
        Symbol::Cherry => CHERRY_BONUS_ODDS[table_index(setting)],
        Symbol::Watermelon => WATERMELON_BONUS_ODDS[table_index(setting)],
        _ => BonusOdds { big: 0.0, reg: 0.0 },
    }
}

/// Cumulative thresholds for the regular-symbol lottery.
///
/// A single uniform draw in `[0, 1)` is compared against the thresholds in
/// order: replay, bell, watermelon, cherry. A draw at or beyond `cherry`
/// is a miss in normal mode; assist mode has no miss band.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RegularBands {
    pub replay: f64,
    pub bell: f64,
    pub watermelon: f64,
    pub cherry: f64,
}

/// Bands used outside assist mode
pub const NORMAL_BANDS: RegularBands = RegularBands {
    replay: 0.20,
    bell: 0.35,
    watermelon: 0.45,
    cherry: 0.55,
};

/// Bands used while assist mode is active (replay/bell boosted, no miss)
pub const ASSIST_BANDS: RegularBands = RegularBands {
    replay: 0.40,
    bell: 0.70,
    watermelon: 0.85,
    cherry: 1.0,
};
