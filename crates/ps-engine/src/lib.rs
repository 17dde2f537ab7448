//! # ps-engine — Pachislot game-state machine and reel-stop control
//!
//! Owns all mutable game state: the bet/lever/stop lifecycle, the weighted
//! outcome lottery, per-reel motion with deferred stop finalization, and
//! result evaluation against the final symbol grid.
//!
//! ## Control flow
//!
//! ```text
//! place_bet() → pull_lever() → stop_reel(0..3) → [advance() ticks]
//!      │             │               │                  │
//!    READY       lottery +        resolve stop     finalize stops,
//!               reel spin-up       position         evaluate once
//!                                                   → READY
//! ```
//!
//! The engine is single-threaded: the caller pumps [`GameEngine::advance`]
//! with elapsed wall time (one call per display frame) and the internal
//! scheduler fires staggered spin-ups and deferred stop finalizations.
//! A scheduler epoch guards every deferred task so [`GameEngine::force_reset`]
//! can never be corrupted by a stale callback.

pub mod engine;
pub mod error;
pub mod evaluate;
pub mod lottery;
pub mod reel;
pub mod scheduler;
pub mod session;
pub mod stops;

pub use engine::*;
pub use error::*;
pub use lottery::ForcedOutcome;
pub use reel::*;
pub use session::*;

pub use ps_reel::REEL_COUNT;
