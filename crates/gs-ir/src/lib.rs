//! Core data types for the gridscore editor.
//!
//! This crate defines the score representation shared by the editing
//! engines and the player: the column/pitch grid of note commands, the
//! per-column dynamics commands, and the small numeric primitives
//! (inclusive ranges, value converters, max finders) used to reason
//! about columns and time.
//!
//! Designed to be `no_std` compatible with the `alloc` crate.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

mod command;
mod convert;
mod max;
mod range;
mod score;
mod voice;

pub use command::{ContinuousDynamicsCommand, NoteCommand};
pub use convert::{Composed, Inverted, Linear, ValueConverter};
pub use max::{Maximum, MaximumBy};
pub use range::Range;
pub use score::{ScoreData, COLUMNS_PER_BEAT, DEFAULT_BPM, NUM_NOTES, NUM_VOICES};
pub use voice::VoiceData;
