//! Gesture-driven editing for gridscore.
//!
//! Turns pointer drags over the score grid into run-length note commands
//! and continuous-dynamics hairpins, keeping run boundaries and the derived
//! hairpin intervals consistent after every step, and reports which cells
//! changed so a UI can redraw only those.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

mod boundary;
mod dynamics_editor;
mod error;
mod interaction;
mod note_editor;
mod score_editor;
mod updates;

pub use boundary::{repair, Boundary};
pub use dynamics_editor::DynamicsEditor;
pub use error::EditorError;
pub use interaction::{grid_column, DynamicsInteraction, NoteGesture, NoteInteraction, Snap};
pub use note_editor::NoteEditor;
pub use score_editor::ScoreEditor;
pub use updates::{CallbackKey, DynamicsCell, NoteCell, PendingUpdates, UpdateRegistry};
