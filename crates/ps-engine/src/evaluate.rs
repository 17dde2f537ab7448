//! Result evaluation against the final symbol grid
//!
//! The lottery's pending win is advisory for reel placement only; payout
//! is always recomputed from the 3×3 grid the reels actually stopped on.

use rand::Rng;
use rand::rngs::StdRng;

use ps_reel::{REEL_COUNT, ReelStrip, Symbol, WinCombination, WinKind};

use crate::error::EngineError;
use crate::session::{BonusKind, GameSession};

/// Visible symbol window, indexed `[reel][row]` with rows top/middle/bottom
pub type Grid = [[Symbol; 3]; 3];

/// Line shapes tested for three-of-a-kind, in check order.
///
/// Entries are `(reel, row)`; later lines overwrite the payout of earlier
/// ones instead of accumulating, matching the reference evaluator.
const LINES: [[(usize, usize); 3]; 3] = [
    // Middle row
    [(0, 1), (1, 1), (2, 1)],
    // Down diagonal
    [(0, 0), (1, 1), (2, 2)],
    // Up diagonal
    [(0, 2), (1, 1), (2, 0)],
];

/// Assist-mode entry chance when a BAR line lands during a bonus
const ASSIST_ENTRY_PROB: f64 = 0.1;

/// What one evaluation did to the session
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct EvalSummary {
    /// Credits paid out
    pub payout: u32,
    /// A replay lined up; the next bet is free
    pub replay: bool,
}

/// Build the visible window from each reel's final middle-row index
pub(crate) fn build_grid(
    strips: &[ReelStrip; REEL_COUNT],
    indices: [usize; REEL_COUNT],
) -> Result<Grid, EngineError> {
    let mut grid = [[Symbol::Bell; 3]; 3];
    for reel in 0..REEL_COUNT {
        let strip = &strips[reel];
        if strip.is_empty() {
            return Err(EngineError::EmptyStrip(reel));
        }
        if indices[reel] >= strip.len() {
            return Err(EngineError::IndexOutOfRange(reel, indices[reel], strip.len()));
        }
        let middle = indices[reel];
        grid[reel][0] = strip.symbol_at(strip.offset(middle, -1));
        grid[reel][1] = strip.symbol_at(middle);
        grid[reel][2] = strip.symbol_at(strip.offset(middle, 1));
    }
    Ok(grid)
}

/// Evaluate the stopped grid and settle the game.
///
/// Applies payout, bonus/assist bookkeeping and the pending-win carry
/// rule. The caller owns the state transition back to READY (which must
/// happen even if this returns an error).
pub(crate) fn evaluate_result(
    session: &mut GameSession,
    strips: &[ReelStrip; REEL_COUNT],
    indices: [usize; REEL_COUNT],
    rng: &mut StdRng,
) -> Result<EvalSummary, EngineError> {
    let grid = build_grid(strips, indices)?;
    let in_bonus_at_entry = session.in_bonus();

    let mut payout: u32 = 0;
    let mut replay = false;
    let mut bar_line = false;

    // Bonus-entry lines are independent of the payout precedence below: a
    // cherry or reach result never masks a seven or bar line.
    for line in LINES {
        let symbols = line.map(|(reel, row)| grid[reel][row]);

        if symbols.iter().all(|&s| s == Symbol::Seven) && !session.in_bonus() {
            session.award_bonus(BonusKind::Big);
            log::info!("result: seven line, BIG bonus");
        }
        if symbols.iter().all(|&s| s == Symbol::Bar) {
            bar_line = true;
            if !session.in_bonus() {
                session.award_bonus(BonusKind::Reg);
                log::info!("result: bar line, REG bonus");
            }
        }
    }

    if grid[0][1] == Symbol::Cherry {
        payout = WinCombination::of(WinKind::CherryGuarantee).payout;
        log::info!("result: middle-row cherry (guarantee payout)");
    } else if grid[0][0] == Symbol::Watermelon
        && grid[1][1] == Symbol::Watermelon
        && grid[2][0] == Symbol::Watermelon
    {
        // Reach pattern: informational, pays nothing
        log::info!("result: reach pattern");
    } else if grid[0][0] == Symbol::Cherry || grid[0][2] == Symbol::Cherry {
        payout = WinCombination::of(WinKind::Cherry).payout;
        log::info!("result: cherry");
    } else {
        for line in LINES {
            let symbols = line.map(|(reel, row)| grid[reel][row]);

            if symbols.iter().all(|&s| s == Symbol::Replay) {
                replay = true;
                session.pending_win = Some(WinCombination::of(WinKind::Replay));
                log::info!("result: replay");
            }
            if symbols.iter().all(|&s| s == Symbol::Bell) {
                payout = WinCombination::of(WinKind::Bell).payout_in(session.in_bonus());
                log::info!("result: bell, payout {payout}");
            }
            if symbols.iter().all(|&s| s == Symbol::Watermelon) {
                payout = WinCombination::of(WinKind::Watermelon).payout;
                log::info!("result: watermelon");
            }
        }
    }

    // A bar line inside a bonus can kick off assist time
    if bar_line && in_bonus_at_entry && rng.random::<f64>() < ASSIST_ENTRY_PROB {
        session.is_assist = true;
        session.assist_games_remaining = rng.random_range(30..=120);
        log::info!("assist time entered: {} games", session.assist_games_remaining);
    }

    session.credit += payout as i64;
    session.coin_difference += payout as i64;

    if session.in_bonus() && session.bonus_games_remaining > 0 {
        session.bonus_games_remaining -= 1;
        if session.bonus_games_remaining == 0 {
            log::info!("bonus ended");
            session.bonus = None;
        }
    }

    if session.is_assist && session.assist_games_remaining > 0 {
        session.assist_games_remaining -= 1;
        if session.assist_games_remaining == 0 {
            session.is_assist = false;
        }
    }

    if !session.pending_replay() {
        session.pending_win = None;
    }

    Ok(EvalSummary { payout, replay })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ps_reel::reference_strips;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(1)
    }

    /// Middle-row indices on the reference strips that show bell on the
    /// middle line of every reel: 0 (left), 3 (center), 2 (right).
    const BELL_LINE: [usize; 3] = [0, 3, 2];

    #[test]
    fn test_grid_rows_follow_window_convention() {
        let strips = reference_strips();
        let grid = build_grid(&strips, [1, 0, 0]).unwrap();
        // Left reel index 1: top shows index 0, bottom index 2
        assert_eq!(grid[0][0], strips[0].symbol_at(0));
        assert_eq!(grid[0][1], strips[0].symbol_at(1));
        assert_eq!(grid[0][2], strips[0].symbol_at(2));
    }

    #[test]
    fn test_bell_line_pays_base_rate_outside_bonus() {
        let strips = reference_strips();
        let mut session = GameSession::default();
        let summary =
            evaluate_result(&mut session, &strips, BELL_LINE, &mut rng()).unwrap();
        assert_eq!(summary.payout, 5);
        assert_eq!(session.credit, 1005);
    }

    #[test]
    fn test_bell_line_pays_bonus_rate_inside_bonus() {
        let strips = reference_strips();
        let mut session = GameSession::default();
        session.award_bonus(BonusKind::Big);
        let summary =
            evaluate_result(&mut session, &strips, BELL_LINE, &mut rng()).unwrap();
        assert_eq!(summary.payout, 11);
        // The completed game consumed one bonus game
        assert_eq!(session.bonus_games_remaining, 69);
    }

    #[test]
    fn test_middle_cherry_takes_precedence() {
        let strips = reference_strips();
        let mut session = GameSession::default();
        // Left reel index 3 is a cherry on the middle row
        let summary =
            evaluate_result(&mut session, &strips, [3, 0, 0], &mut rng()).unwrap();
        assert_eq!(summary.payout, 2);
    }

    #[test]
    fn test_corner_cherry_pays() {
        let strips = reference_strips();
        let mut session = GameSession::default();
        // Left reel index 4: top row shows index 3 (cherry)
        let grid = build_grid(&strips, [4, 0, 0]).unwrap();
        assert_eq!(grid[0][0], Symbol::Cherry);
        let summary =
            evaluate_result(&mut session, &strips, [4, 0, 0], &mut rng()).unwrap();
        assert_eq!(summary.payout, 2);
    }

    #[test]
    fn test_replay_line_sets_pending_and_pays_nothing() {
        let strips = reference_strips();
        let mut session = GameSession::default();
        // Replay on the middle line: left 1, center 0, right 3
        let summary =
            evaluate_result(&mut session, &strips, [1, 0, 3], &mut rng()).unwrap();
        assert!(summary.replay);
        assert_eq!(summary.payout, 0);
        assert!(session.pending_replay());
        assert_eq!(session.credit, 1000);
    }

    #[test]
    fn test_pending_cleared_after_non_replay_result() {
        let strips = reference_strips();
        let mut session = GameSession::default();
        session.pending_win = Some(WinCombination::of(WinKind::Bell));
        evaluate_result(&mut session, &strips, BELL_LINE, &mut rng()).unwrap();
        assert!(session.pending_win.is_none());
    }

    #[test]
    fn test_bonus_clears_exactly_at_zero() {
        let strips = reference_strips();
        let mut session = GameSession::default();
        session.award_bonus(BonusKind::Reg);
        for expected in (0..20).rev() {
            evaluate_result(&mut session, &strips, BELL_LINE, &mut rng()).unwrap();
            assert_eq!(session.bonus_games_remaining, expected);
            if expected == 0 {
                assert!(session.bonus.is_none());
            } else {
                assert_eq!(session.bonus, Some(BonusKind::Reg));
            }
        }
    }

    #[test]
    fn test_bar_line_grants_reg_under_cherry_payout() {
        // Left stop 4 shows a top-row cherry over a middle-row bar; center
        // 11 and right 12 complete the middle bar line. The cherry decides
        // the payout but must not mask the bonus grant.
        let strips = reference_strips();
        let mut session = GameSession::default();
        let grid = build_grid(&strips, [4, 11, 12]).unwrap();
        assert_eq!(grid[0][0], Symbol::Cherry);
        assert!((0..REEL_COUNT).all(|r| grid[r][1] == Symbol::Bar));

        let summary =
            evaluate_result(&mut session, &strips, [4, 11, 12], &mut rng()).unwrap();
        assert_eq!(summary.payout, 2);
        assert_eq!(session.bonus, Some(BonusKind::Reg));
        assert_eq!(session.reg_count, 1);
        // The granting game itself consumed one bonus game
        assert_eq!(session.bonus_games_remaining, 19);
        assert!(!session.is_assist, "entry roll requires an active bonus");
    }

    #[test]
    fn test_assist_decrements_once_per_game_and_clears() {
        let strips = reference_strips();
        let mut session = GameSession::default();
        session.is_assist = true;
        session.assist_games_remaining = 2;

        evaluate_result(&mut session, &strips, BELL_LINE, &mut rng()).unwrap();
        assert!(session.is_assist);
        assert_eq!(session.assist_games_remaining, 1);

        evaluate_result(&mut session, &strips, BELL_LINE, &mut rng()).unwrap();
        assert!(!session.is_assist);
        assert_eq!(session.assist_games_remaining, 0);
    }

    #[test]
    fn test_bar_line_in_bonus_rolls_assist_entry() {
        let strips = reference_strips();
        let mut entered = 0;
        for seed in 0..200 {
            let mut session = GameSession::default();
            session.award_bonus(BonusKind::Big);
            let mut rng = StdRng::seed_from_u64(seed);
            evaluate_result(&mut session, &strips, [4, 11, 12], &mut rng).unwrap();

            // An in-bonus bar line never grants another REG
            assert_eq!(session.reg_count, 0);
            if session.is_assist {
                entered += 1;
                // Entry duration 30..=120, minus the completed game
                assert!((29..=119).contains(&session.assist_games_remaining));
            }
        }
        assert!(entered > 0, "entry roll never landed across 200 seeds");
        assert!(entered < 200, "entry roll landed on every seed");
    }

    #[test]
    fn test_out_of_range_index_is_an_error() {
        let strips = reference_strips();
        let mut session = GameSession::default();
        let err = evaluate_result(&mut session, &strips, [99, 0, 0], &mut rng());
        assert!(matches!(err, Err(EngineError::IndexOutOfRange(0, 99, 20))));
    }
}
