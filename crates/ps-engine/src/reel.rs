//! Per-reel motion state

use ps_reel::SYMBOL_HEIGHT;

/// Base scroll speed in position units per second
pub const BASE_SPIN_SPEED: f64 = 100.0;

/// Speed decay per second of spin time (fraction of base speed)
const SPEED_DECAY_PER_SEC: f64 = 0.05;

/// Floor for the decayed speed, as a fraction of base
const MIN_SPEED_FACTOR: f64 = 0.8;

/// Runtime state of one physical reel.
///
/// `continuous_position` is only meaningful while `is_spinning`; once the
/// reel is fixed, `index` is the authoritative discrete strip index.
#[derive(Debug, Clone)]
pub struct ReelState {
    /// Scroll offset in pixels, wrapped modulo the strip height
    pub continuous_position: f64,
    /// Reel is in motion (or waiting out its staggered start)
    pub is_spinning: bool,
    /// Resolved stop index, set as soon as a stop is requested
    pub stop_position: Option<usize>,
    /// Current scroll speed (decays while spinning, floored at 80% base)
    pub spin_speed: f64,
    /// Discrete middle-row strip index, authoritative once stopped
    index: usize,
    /// Staggered start has fired; motion integrates from here on
    motion_live: bool,
    /// Elapsed spin time in ms, drives speed decay
    spin_elapsed_ms: f64,
}

impl ReelState {
    pub fn new(index: usize) -> Self {
        Self {
            continuous_position: index as f64 * SYMBOL_HEIGHT,
            is_spinning: false,
            stop_position: None,
            spin_speed: BASE_SPIN_SPEED,
            index,
            motion_live: false,
            spin_elapsed_ms: 0.0,
        }
    }

    /// Discrete middle-row strip index
    pub fn index(&self) -> usize {
        self.index
    }

    /// Mark the reel spinning from a randomized internal position.
    ///
    /// Motion does not integrate until [`ReelState::start_motion`] fires
    /// from the scheduler (staggered start).
    pub fn begin_spin(&mut self, initial_index: usize) {
        self.is_spinning = true;
        self.stop_position = None;
        self.index = initial_index;
        self.continuous_position = initial_index as f64 * SYMBOL_HEIGHT;
        self.spin_speed = BASE_SPIN_SPEED;
        self.motion_live = false;
        self.spin_elapsed_ms = 0.0;
    }

    /// Staggered start: begin integrating motion
    pub fn start_motion(&mut self) {
        if self.is_spinning {
            self.motion_live = true;
        }
    }

    /// Integrate continuous motion over `dt_ms`
    pub fn integrate(&mut self, dt_ms: f64, strip_height: f64) {
        if !self.is_spinning || !self.motion_live {
            return;
        }
        self.spin_elapsed_ms += dt_ms;

        let decay = 1.0 - (self.spin_elapsed_ms / 1000.0) * SPEED_DECAY_PER_SEC;
        self.spin_speed = BASE_SPIN_SPEED * decay.max(MIN_SPEED_FACTOR);

        self.continuous_position += self.spin_speed * dt_ms / 1000.0;
        if self.continuous_position >= strip_height {
            self.continuous_position %= strip_height;
        }
    }

    /// Fix the reel at its resolved stop position.
    ///
    /// The rest offset places the stop index on the middle row (one symbol
    /// above the raw scroll offset, matching the render window).
    pub fn finalize(&mut self, position: usize) {
        self.is_spinning = false;
        self.motion_live = false;
        self.index = position;
        self.continuous_position = position as f64 * SYMBOL_HEIGHT - SYMBOL_HEIGHT;
    }

    /// Cancel motion without resolving a stop (defensive repair path)
    pub fn force_stop(&mut self) {
        self.is_spinning = false;
        self.motion_live = false;
        self.stop_position = None;
        self.spin_elapsed_ms = 0.0;
    }
}
