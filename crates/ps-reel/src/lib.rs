//! # ps-reel — Static reel configuration for the pachislot simulator
//!
//! Read-only data consumed by the game engine:
//!
//! - **Symbols & strips**: the three 20-symbol reel strips of the
//!   reference layout, with wrap-around indexing
//! - **Win catalog**: every winning combination with payouts, bonus
//!   overrides and flags
//! - **Probability tables**: per-setting bonus odds and the regular-symbol
//!   lottery bands, reproduced as data (never derived analytically)

pub mod combos;
pub mod symbols;
pub mod tables;

pub use combos::*;
pub use symbols::*;
pub use tables::*;
