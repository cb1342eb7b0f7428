//! Engine error type.

use alloc::string::String;

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// Voice index outside `0..NUM_VOICES`.
    #[error("unknown voice {0}")]
    UnknownVoice(usize),

    #[error("unknown instrument {0:?}")]
    UnknownInstrument(String),

    /// A load task's value was read before it completed.
    #[error("resource is still loading")]
    NotReady,
}
