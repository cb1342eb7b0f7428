//! Playback engine for gridscore.
//!
//! Converts the note grid into timed instrument triggers, drives a scroll
//! position that follows the transport clock, and provides the instrument,
//! transport and scroll-pane capabilities the player is built against.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

mod catalog;
mod error;
mod frequency;
mod instrument;
pub mod player;
pub mod schedule;
mod scroll;
mod task;
mod transport;

pub use catalog::{GatedInstrument, InstrumentKind};
pub use error::EngineError;
pub use frequency::{pitch_frequency, REFERENCE_HZ, REFERENCE_PITCH};
pub use instrument::{Instrument, NullInstrument};
pub use player::{FrameTicket, PlayStart, ScorePlayer, ScrollGeometry, StopTimer};
pub use schedule::{schedule_score, Schedule, TriggerEvent, TriggerKind, NOTE_RELEASE_COLUMNS};
pub use scroll::{
    NullSyncer, PaneKey, PaneSyncer, ScrollPane, ScrollSyncer, SharedSyncer, SyncMode, VirtualPane,
};
pub use task::LoadTask;
pub use transport::{ManualClock, ManualTransport, Transport};
