//! Editor error type.

use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorError {
    /// Voice index outside `0..NUM_VOICES`.
    #[error("unknown voice {0}")]
    UnknownVoice(usize),

    /// Snapping to a zero-column grid is meaningless.
    #[error("snap interval must be at least 1")]
    ZeroSnapInterval,

    /// Tempo that is zero, negative or not finite.
    #[error("tempo must be a positive number of beats per minute")]
    InvalidTempo,
}
