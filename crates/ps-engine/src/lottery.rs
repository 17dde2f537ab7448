//! Per-game outcome lottery
//!
//! Runs once per lever pull, before the reels start moving. Priority
//! order (first match wins):
//!
//! 1. in a bonus → forced BELL
//! 2. guaranteed-bonus roll (1/8192) → cherry guarantee + BIG
//! 3. reach-pattern roll (1/6532) → reach, 40% BIG / 60% REG
//! 4. setting-indexed BIG then REG rolls; on hit the regular lottery
//!    still runs for a simultaneous small win
//! 5. regular-symbol lottery (band table, assist or normal)
//!
//! Watermelon and cherry outcomes additionally run the setting-indexed
//! bonus-from-symbol roll. None of the bonus paths guard against a bonus
//! already set in the same pass; the reference behaves the same way.

use rand::Rng;
use rand::rngs::StdRng;

use ps_reel::{
    ASSIST_BANDS, GUARANTEE_PROB, NORMAL_BANDS, REACH_BIG_SHARE, REACH_PROB, Symbol,
    WinCombination, WinKind, bonus_odds, symbol_bonus_odds,
};

use crate::session::{BonusKind, GameSession};

/// Outcome injection for tests and scripted simulation runs.
///
/// Bypasses every random roll; the side effects mirror what the real
/// lottery would apply for the same outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForcedOutcome {
    Miss,
    Replay,
    Bell,
    Watermelon,
    Cherry,
    CherryGuarantee,
    ReachBig,
    ReachReg,
}

/// Run the full outcome lottery, mutating the session's pending win,
/// bonus fields and counters.
pub(crate) fn determine_winning_combination(session: &mut GameSession, rng: &mut StdRng) {
    // Bonus play forces the bell rhythm; nothing else is rolled.
    if session.in_bonus() {
        session.pending_win = Some(WinCombination::of(WinKind::Bell));
        return;
    }

    if rng.random::<f64>() < GUARANTEE_PROB {
        session.pending_win = Some(WinCombination::of(WinKind::CherryGuarantee));
        session.award_bonus(BonusKind::Big);
        log::info!("lottery: cherry guarantee (forced BIG)");
        return;
    }

    if rng.random::<f64>() < REACH_PROB {
        session.pending_win = Some(WinCombination::of(WinKind::Reach));
        let kind = if rng.random::<f64>() < REACH_BIG_SHARE {
            BonusKind::Big
        } else {
            BonusKind::Reg
        };
        session.award_bonus(kind);
        log::info!("lottery: reach pattern ({kind:?})");
        return;
    }

    let odds = bonus_odds(session.current_setting);
    if rng.random::<f64>() < odds.big {
        session.award_bonus(BonusKind::Big);
        log::info!("lottery: direct BIG at setting {}", session.current_setting);
        determine_regular_win(session, rng);
        return;
    }
    if rng.random::<f64>() < odds.reg {
        session.award_bonus(BonusKind::Reg);
        log::info!("lottery: direct REG at setting {}", session.current_setting);
        determine_regular_win(session, rng);
        return;
    }

    determine_regular_win(session, rng);
}

/// Regular-symbol lottery: one uniform draw against the band table
fn determine_regular_win(session: &mut GameSession, rng: &mut StdRng) {
    let draw = rng.random::<f64>();
    let bands = if session.is_assist { ASSIST_BANDS } else { NORMAL_BANDS };

    session.pending_win = if draw < bands.replay {
        Some(WinCombination::of(WinKind::Replay))
    } else if draw < bands.bell {
        Some(WinCombination::of(WinKind::Bell))
    } else if draw < bands.watermelon {
        roll_symbol_bonus(session, rng, Symbol::Watermelon);
        Some(WinCombination::of(WinKind::Watermelon))
    } else if draw < bands.cherry {
        roll_symbol_bonus(session, rng, Symbol::Cherry);
        Some(WinCombination::of(WinKind::Cherry))
    } else {
        None
    };
}

/// Secondary bonus roll attached to a landed cherry or watermelon
fn roll_symbol_bonus(session: &mut GameSession, rng: &mut StdRng, symbol: Symbol) {
    let odds = symbol_bonus_odds(session.current_setting, symbol);
    if rng.random::<f64>() < odds.big {
        session.award_bonus(BonusKind::Big);
        log::info!("lottery: BIG from {}", symbol.name());
    } else if rng.random::<f64>() < odds.reg {
        session.award_bonus(BonusKind::Reg);
        log::info!("lottery: REG from {}", symbol.name());
    }
}

/// Apply a forced outcome with the same side effects the random path
/// would produce (secondary symbol rolls excluded for determinism).
pub(crate) fn apply_forced(session: &mut GameSession, outcome: ForcedOutcome) {
    session.pending_win = match outcome {
        ForcedOutcome::Miss => None,
        ForcedOutcome::Replay => Some(WinCombination::of(WinKind::Replay)),
        ForcedOutcome::Bell => Some(WinCombination::of(WinKind::Bell)),
        ForcedOutcome::Watermelon => Some(WinCombination::of(WinKind::Watermelon)),
        ForcedOutcome::Cherry => Some(WinCombination::of(WinKind::Cherry)),
        ForcedOutcome::CherryGuarantee => {
            session.award_bonus(BonusKind::Big);
            Some(WinCombination::of(WinKind::CherryGuarantee))
        }
        ForcedOutcome::ReachBig => {
            session.award_bonus(BonusKind::Big);
            Some(WinCombination::of(WinKind::Reach))
        }
        ForcedOutcome::ReachReg => {
            session.award_bonus(BonusKind::Reg);
            Some(WinCombination::of(WinKind::Reach))
        }
    };
}
