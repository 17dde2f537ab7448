//! Game session state and persistent snapshot

use serde::{Deserialize, Serialize};

use ps_reel::{BIG_BONUS_GAMES, MAX_SETTING, MIN_SETTING, REG_BONUS_GAMES, WinCombination};

/// Starting credit for a fresh session
pub const INITIAL_CREDIT: i64 = 1000;

/// Fixed stake per game
pub const BET_AMOUNT: u32 = 3;

/// Top-level game state.
///
/// Bonus play is not a separate state: it is carried by
/// [`GameSession::bonus`] and overlays the normal cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameState {
    Ready,
    BetPlaced,
    Spinning,
}

/// Bonus mode kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BonusKind {
    Big,
    Reg,
}

/// The engine's persistent fields
#[derive(Debug, Clone)]
pub struct GameSession {
    pub credit: i64,
    pub bet_amount: u32,
    pub game_state: GameState,
    pub bonus: Option<BonusKind>,
    pub bonus_games_remaining: u32,
    pub is_assist: bool,
    pub assist_games_remaining: u32,
    /// Probability-table row selector, 1–6
    pub current_setting: u8,
    pub total_games: u64,
    pub big_count: u32,
    pub reg_count: u32,
    pub coin_difference: i64,
    /// Combination selected by the most recent lottery, advisory for
    /// reel-stop placement; payout is always recomputed from the grid
    pub pending_win: Option<WinCombination>,
}

impl Default for GameSession {
    fn default() -> Self {
        Self {
            credit: INITIAL_CREDIT,
            bet_amount: BET_AMOUNT,
            game_state: GameState::Ready,
            bonus: None,
            bonus_games_remaining: 0,
            is_assist: false,
            assist_games_remaining: 0,
            current_setting: MIN_SETTING,
            total_games: 0,
            big_count: 0,
            reg_count: 0,
            coin_difference: 0,
            pending_win: None,
        }
    }
}

impl GameSession {
    pub fn in_bonus(&self) -> bool {
        self.bonus.is_some()
    }

    /// True when the pending win grants a free next game
    pub fn pending_replay(&self) -> bool {
        self.pending_win.is_some_and(|w| w.is_replay)
    }

    /// Enter a bonus and bump the matching counter.
    ///
    /// Deliberately overwrites any bonus already set this game: the
    /// reference lottery carries no mutual-exclusion guard and neither
    /// does this one.
    pub fn award_bonus(&mut self, kind: BonusKind) {
        self.bonus = Some(kind);
        match kind {
            BonusKind::Big => {
                self.bonus_games_remaining = BIG_BONUS_GAMES;
                self.big_count += 1;
            }
            BonusKind::Reg => {
                self.bonus_games_remaining = REG_BONUS_GAMES;
                self.reg_count += 1;
            }
        }
    }

    /// Zero the cumulative statistics; credit and setting are untouched
    pub fn reset_data(&mut self) {
        self.total_games = 0;
        self.big_count = 0;
        self.reg_count = 0;
        self.coin_difference = 0;
    }
}

/// Serializable subset of the session persisted between runs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub credit: i64,
    pub current_setting: u8,
    pub total_games: u64,
    pub big_count: u32,
    pub reg_count: u32,
    pub coin_difference: i64,
    pub is_assist: bool,
    pub assist_games_remaining: u32,
    pub bonus: Option<BonusKind>,
    pub bonus_games_remaining: u32,
    /// Unix time in milliseconds at capture
    pub timestamp: u64,
}

impl SessionSnapshot {
    /// Capture the persistent subset of a session
    pub fn capture(session: &GameSession, timestamp: u64) -> Self {
        Self {
            credit: session.credit,
            current_setting: session.current_setting,
            total_games: session.total_games,
            big_count: session.big_count,
            reg_count: session.reg_count,
            coin_difference: session.coin_difference,
            is_assist: session.is_assist,
            assist_games_remaining: session.assist_games_remaining,
            bonus: session.bonus,
            bonus_games_remaining: session.bonus_games_remaining,
            timestamp,
        }
    }

    /// Restore the persistent fields into a session.
    ///
    /// Transient fields (state machine, pending win) are reset to the
    /// READY defaults; a snapshot is only taken between games.
    pub fn restore_into(&self, session: &mut GameSession) {
        session.credit = self.credit;
        session.current_setting = self.current_setting.clamp(MIN_SETTING, MAX_SETTING);
        session.total_games = self.total_games;
        session.big_count = self.big_count;
        session.reg_count = self.reg_count;
        session.coin_difference = self.coin_difference;
        session.is_assist = self.is_assist;
        session.assist_games_remaining = self.assist_games_remaining;
        session.bonus = self.bonus;
        session.bonus_games_remaining = self.bonus_games_remaining;
        session.game_state = GameState::Ready;
        session.pending_win = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_award_big_bonus() {
        let mut session = GameSession::default();
        session.award_bonus(BonusKind::Big);
        assert_eq!(session.bonus, Some(BonusKind::Big));
        assert_eq!(session.bonus_games_remaining, 70);
        assert_eq!(session.big_count, 1);
    }

    #[test]
    fn test_award_overwrites_existing_bonus() {
        let mut session = GameSession::default();
        session.award_bonus(BonusKind::Big);
        session.award_bonus(BonusKind::Reg);
        assert_eq!(session.bonus, Some(BonusKind::Reg));
        assert_eq!(session.bonus_games_remaining, 20);
        assert_eq!(session.big_count, 1);
        assert_eq!(session.reg_count, 1);
    }

    #[test]
    fn test_snapshot_round_trip() {
        let mut session = GameSession::default();
        session.credit = 742;
        session.current_setting = 4;
        session.total_games = 120;
        session.big_count = 2;
        session.coin_difference = -258;
        session.award_bonus(BonusKind::Reg);

        let snap = SessionSnapshot::capture(&session, 1_700_000_000_000);
        let mut restored = GameSession::default();
        snap.restore_into(&mut restored);

        assert_eq!(restored.credit, 742);
        assert_eq!(restored.current_setting, 4);
        assert_eq!(restored.total_games, 120);
        assert_eq!(restored.bonus, Some(BonusKind::Reg));
        assert_eq!(restored.game_state, GameState::Ready);
        assert!(restored.pending_win.is_none());
    }

    #[test]
    fn test_reset_data_keeps_credit() {
        let mut session = GameSession::default();
        session.credit = 555;
        session.total_games = 99;
        session.big_count = 3;
        session.reset_data();
        assert_eq!(session.credit, 555);
        assert_eq!(session.total_games, 0);
        assert_eq!(session.big_count, 0);
    }
}
