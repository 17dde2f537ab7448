//! The game engine: state machine, scheduling and public surface

use std::time::{SystemTime, UNIX_EPOCH};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use ps_reel::{MAX_SETTING, MIN_SETTING, REEL_COUNT, ReelStrip, Symbol, reference_strips};

use crate::evaluate::{self, Grid};
use crate::lottery::{self, ForcedOutcome};
use crate::reel::ReelState;
use crate::scheduler::{FrameScheduler, TaskKind};
use crate::session::{BonusKind, GameSession, GameState, SessionSnapshot};

/// Delay between successive reel spin-ups on a lever pull (ms)
pub const REEL_START_STAGGER_MS: f64 = 100.0;

/// Mechanical latency between a stop request and the reel fixing (ms)
pub const REEL_STOP_DELAY_MS: f64 = 80.0;

/// A history record is due every this many completed games
pub const HISTORY_INTERVAL: u64 = 30;

/// Unix time in milliseconds
pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// The slot machine core.
///
/// Single-threaded: the caller invokes the lifecycle operations in
/// response to user input and pumps [`GameEngine::advance`] once per
/// display frame with the elapsed milliseconds.
pub struct GameEngine {
    session: GameSession,
    strips: [ReelStrip; REEL_COUNT],
    reels: [ReelState; REEL_COUNT],
    scheduler: FrameScheduler,
    rng: StdRng,
    /// One-shot guard: evaluation runs at most once per game
    evaluation_pending: bool,
    /// A bonus was awarded by this game's lottery
    bonus_started_this_game: bool,
    history_due: bool,
    last_payout: u32,
}

impl GameEngine {
    pub fn new() -> Self {
        let strips = reference_strips();
        let mut rng = StdRng::from_os_rng();
        let reels = std::array::from_fn(|i| {
            let len = strips[i].len();
            ReelState::new(rng.random_range(0..len))
        });
        Self {
            session: GameSession::default(),
            strips,
            reels,
            scheduler: FrameScheduler::new(),
            rng,
            evaluation_pending: false,
            bonus_started_this_game: false,
            history_due: false,
            last_payout: 0,
        }
    }

    /// Seed the RNG for reproducible runs
    pub fn seed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }

    // ── Read-only surface for the presentation layer ────────────────────

    pub fn credit(&self) -> i64 {
        self.session.credit
    }

    pub fn bet_amount(&self) -> u32 {
        self.session.bet_amount
    }

    pub fn game_state(&self) -> GameState {
        self.session.game_state
    }

    pub fn bonus(&self) -> Option<BonusKind> {
        self.session.bonus
    }

    pub fn bonus_games_remaining(&self) -> u32 {
        self.session.bonus_games_remaining
    }

    pub fn is_assist(&self) -> bool {
        self.session.is_assist
    }

    pub fn assist_games_remaining(&self) -> u32 {
        self.session.assist_games_remaining
    }

    pub fn current_setting(&self) -> u8 {
        self.session.current_setting
    }

    pub fn total_games(&self) -> u64 {
        self.session.total_games
    }

    pub fn big_count(&self) -> u32 {
        self.session.big_count
    }

    pub fn reg_count(&self) -> u32 {
        self.session.reg_count
    }

    pub fn coin_difference(&self) -> i64 {
        self.session.coin_difference
    }

    pub fn reels(&self) -> &[ReelState; REEL_COUNT] {
        &self.reels
    }

    pub fn strips(&self) -> &[ReelStrip; REEL_COUNT] {
        &self.strips
    }

    /// Payout of the most recently evaluated game
    pub fn last_payout(&self) -> u32 {
        self.last_payout
    }

    pub fn all_reels_stopped(&self) -> bool {
        self.reels.iter().all(|r| !r.is_spinning)
    }

    /// The visible 3×3 window at the current reel indices
    pub fn visible_grid(&self) -> Grid {
        let mut grid = [[Symbol::Bell; 3]; 3];
        for reel in 0..REEL_COUNT {
            let strip = &self.strips[reel];
            let middle = self.reels[reel].index();
            grid[reel][0] = strip.symbol_at(strip.offset(middle, -1));
            grid[reel][1] = strip.symbol_at(middle);
            grid[reel][2] = strip.symbol_at(strip.offset(middle, 1));
        }
        grid
    }

    // ── Lifecycle operations ────────────────────────────────────────────

    /// Place the fixed bet. Legal only in READY; a pending replay makes
    /// the bet free.
    pub fn place_bet(&mut self) -> bool {
        if self.session.game_state != GameState::Ready {
            log::warn!("bet refused: state is {:?}", self.session.game_state);
            return false;
        }
        let bet = self.session.bet_amount as i64;
        if self.session.credit < bet && !self.session.pending_replay() {
            log::warn!("bet refused: insufficient credit ({})", self.session.credit);
            return false;
        }
        if !self.session.pending_replay() {
            self.session.credit -= bet;
            self.session.coin_difference -= bet;
        }
        self.session.game_state = GameState::BetPlaced;
        true
    }

    /// Pull the lever: run the lottery and start the reels
    pub fn pull_lever(&mut self) -> bool {
        self.lever_internal(None)
    }

    /// Lever pull with an injected lottery outcome (tests, scripted runs)
    pub fn pull_lever_forced(&mut self, outcome: ForcedOutcome) -> bool {
        self.lever_internal(Some(outcome))
    }

    fn lever_internal(&mut self, forced: Option<ForcedOutcome>) -> bool {
        if self.session.game_state != GameState::BetPlaced {
            log::warn!("lever refused: no bet placed");
            return false;
        }

        // Inconsistent state repair: no reel may still be spinning here
        if self.reels.iter().any(|r| r.is_spinning) {
            log::warn!("reels still spinning on lever pull; forcing stop");
            self.scheduler.cancel_all();
            for reel in &mut self.reels {
                if reel.is_spinning {
                    reel.force_stop();
                }
            }
        }

        let counters_before = self.session.big_count + self.session.reg_count;
        match forced {
            Some(outcome) => lottery::apply_forced(&mut self.session, outcome),
            None => lottery::determine_winning_combination(&mut self.session, &mut self.rng),
        }
        self.bonus_started_this_game =
            self.session.big_count + self.session.reg_count > counters_before;

        self.session.total_games += 1;

        // A lottery-drawn replay is consumed here: its free bet applies to
        // the game that lines it up, not to steered placement.
        if forced.is_none() && self.session.pending_replay() {
            self.session.pending_win = None;
        }

        for i in 0..REEL_COUNT {
            let idx = self.rng.random_range(0..self.strips[i].len());
            self.reels[i].begin_spin(idx);
            self.scheduler
                .schedule_in(i as f64 * REEL_START_STAGGER_MS, TaskKind::StartReel(i));
        }

        self.evaluation_pending = true;
        self.history_due = false;
        self.last_payout = 0;
        self.session.game_state = GameState::Spinning;
        log::debug!("game {} started", self.session.total_games);
        true
    }

    /// Request a stop for one reel.
    ///
    /// Resolves the stop index immediately; the reel fixes after the
    /// mechanical latency. Returns false when the reel is already stopped
    /// or already stopping; if every reel turns out to be stopped while
    /// the state is still SPINNING, evaluation is forced as a repair.
    pub fn stop_reel(&mut self, reel_index: usize) -> bool {
        if reel_index >= REEL_COUNT {
            return false;
        }
        if !self.reels[reel_index].is_spinning {
            log::warn!("reel {reel_index} is already stopped");
            if self.all_reels_stopped() && self.session.game_state == GameState::Spinning {
                log::warn!("all reels stopped but state is SPINNING; evaluating now");
                self.run_evaluation();
            }
            return false;
        }
        if self.reels[reel_index].stop_position.is_some() {
            // Stop already requested; finalization is in flight
            return false;
        }
        if self.session.game_state != GameState::Spinning {
            log::warn!("stop requested outside SPINNING; stopping reel {reel_index} anyway");
        }

        let left_middles: Vec<Symbol> = (0..reel_index)
            .filter(|&j| !self.reels[j].is_spinning)
            .map(|j| self.strips[j].symbol_at(self.reels[j].index()))
            .collect();

        let position = crate::stops::resolve_stop_position(
            &self.strips,
            reel_index,
            self.session.pending_win.as_ref(),
            &left_middles,
            &mut self.rng,
        );
        self.reels[reel_index].stop_position = Some(position);
        self.scheduler.schedule_in(
            REEL_STOP_DELAY_MS,
            TaskKind::FinalizeStop { reel: reel_index, position },
        );
        true
    }

    /// Pump the frame clock: fire due tasks, integrate reel motion.
    ///
    /// The last stop finalization that observes all reels stopped runs
    /// result evaluation exactly once.
    pub fn advance(&mut self, dt_ms: f64) {
        for kind in self.scheduler.advance(dt_ms) {
            match kind {
                TaskKind::StartReel(i) => self.reels[i].start_motion(),
                TaskKind::FinalizeStop { reel, position } => {
                    self.reels[reel].finalize(position);
                    log::debug!("reel {reel} fixed at {position}");
                    if self.all_reels_stopped()
                        && self.evaluation_pending
                        && self.session.game_state == GameState::Spinning
                    {
                        self.run_evaluation();
                    }
                }
            }
        }
        for (i, reel) in self.reels.iter_mut().enumerate() {
            reel.integrate(dt_ms, self.strips[i].scroll_height());
        }
    }

    fn run_evaluation(&mut self) {
        self.evaluation_pending = false;
        let counters_before = self.session.big_count + self.session.reg_count;
        let indices = std::array::from_fn(|i| self.reels[i].index());

        match evaluate::evaluate_result(&mut self.session, &self.strips, indices, &mut self.rng)
        {
            Ok(summary) => {
                self.last_payout = summary.payout;
            }
            Err(e) => {
                // Liveness over strictness: the machine never strands
                log::error!("evaluation failed: {e}; forcing READY");
                self.session.pending_win = None;
                self.last_payout = 0;
            }
        }
        self.session.game_state = GameState::Ready;

        let bonus_started = self.bonus_started_this_game
            || self.session.big_count + self.session.reg_count > counters_before;
        self.history_due =
            self.session.total_games % HISTORY_INTERVAL == 0 || bonus_started;
    }

    /// Emergency escape hatch: cancel all in-flight motion and deferred
    /// work, return to READY. Statistics and credit are untouched.
    pub fn force_reset(&mut self) {
        self.scheduler.cancel_all();
        for (i, reel) in self.reels.iter_mut().enumerate() {
            let idx = self.rng.random_range(0..self.strips[i].len());
            *reel = ReelState::new(idx);
        }
        self.evaluation_pending = false;
        self.session.game_state = GameState::Ready;
        log::warn!("engine force-reset");
    }

    /// Select a probability-table setting (1–6 only)
    pub fn change_setting(&mut self, setting: u8) -> bool {
        if !(MIN_SETTING..=MAX_SETTING).contains(&setting) {
            return false;
        }
        self.session.current_setting = setting;
        true
    }

    /// Zero the cumulative statistics
    pub fn reset_data(&mut self) {
        self.session.reset_data();
    }

    // ── Persistence adapters ────────────────────────────────────────────

    /// Capture the persistent session subset
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot::capture(&self.session, now_millis())
    }

    /// Restore a snapshot; in-flight motion is discarded
    pub fn restore(&mut self, snapshot: &SessionSnapshot) {
        self.scheduler.cancel_all();
        for reel in &mut self.reels {
            reel.force_stop();
        }
        self.evaluation_pending = false;
        snapshot.restore_into(&mut self.session);
    }

    /// True once after each completed game that qualifies for a history
    /// record (every 30th game, or a game that started a bonus)
    pub fn take_history_due(&mut self) -> bool {
        std::mem::take(&mut self.history_due)
    }
}

impl Default for GameEngine {
    fn default() -> Self {
        Self::new()
    }
}
