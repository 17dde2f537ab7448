//! Engine error taxonomy
//!
//! Illegal transitions and insufficient credit are signalled by boolean
//! returns, never by errors. `EngineError` only covers internal
//! inconsistencies caught at the evaluation boundary; none of them are
//! allowed to strand the state machine outside READY.

/// Internal engine failure
#[derive(Debug, Clone, thiserror::Error)]
pub enum EngineError {
    #[error("reel {0} has an empty strip")]
    EmptyStrip(usize),

    #[error("reel {0} index {1} outside strip of length {2}")]
    IndexOutOfRange(usize, usize, usize),
}
