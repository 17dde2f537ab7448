//! # ps-store — session and play-history persistence
//!
//! JSON files in a data directory: `session.json` holds the latest
//! [`SessionSnapshot`], `history.json` the rolling play-history records
//! behind the slump graph. Both are small enough to rewrite whole on
//! every save.

pub mod error;
pub mod history;
pub mod store;

pub use error::StoreError;
pub use history::{HistoryRecord, downsample};
pub use store::{HISTORY_KEEP, SlotStore};
