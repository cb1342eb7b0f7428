//! gridscore: a grid-based score editor driven by gesture scripts.
//!
//! The binary replays a script of pointer gestures against the headless
//! controller, then prints the resulting grid, hairpins and playback
//! schedule.

pub mod report;
pub mod script;
