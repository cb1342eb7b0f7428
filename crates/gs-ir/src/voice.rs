//! Dense per-voice command storage.

use alloc::vec;
use alloc::vec::Vec;

use crate::command::{ContinuousDynamicsCommand, NoteCommand};
use crate::score::NUM_NOTES;

/// Commands for a single voice across the whole score.
///
/// Out-of-range reads return the empty command and out-of-range writes
/// are ignored.
#[derive(Clone, Debug)]
pub struct VoiceData {
    length: usize,
    /// Note commands, stored column-major: notes[column * NUM_NOTES + pitch]
    notes: Vec<NoteCommand>,
    /// One dynamics command per column
    dynamics: Vec<ContinuousDynamicsCommand>,
}

impl VoiceData {
    /// Allocate an empty voice `length` columns long.
    pub fn new(length: usize) -> Self {
        Self {
            length,
            notes: vec![NoteCommand::None; length * NUM_NOTES],
            dynamics: vec![ContinuousDynamicsCommand::None; length],
        }
    }

    pub fn len(&self) -> usize {
        self.length
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    fn note_index(&self, column: usize, pitch: usize) -> Option<usize> {
        (column < self.length && pitch < NUM_NOTES).then(|| column * NUM_NOTES + pitch)
    }

    pub fn note(&self, column: usize, pitch: usize) -> NoteCommand {
        self.note_index(column, pitch)
            .map_or(NoteCommand::None, |i| self.notes[i])
    }

    pub fn set_note(&mut self, column: usize, pitch: usize, command: NoteCommand) {
        if let Some(i) = self.note_index(column, pitch) {
            self.notes[i] = command;
        }
    }

    /// All pitches at one column.
    pub fn column(&self, column: usize) -> &[NoteCommand] {
        if column >= self.length {
            return &[];
        }
        let start = column * NUM_NOTES;
        &self.notes[start..start + NUM_NOTES]
    }

    pub fn dynamics(&self, column: usize) -> ContinuousDynamicsCommand {
        self.dynamics
            .get(column)
            .copied()
            .unwrap_or(ContinuousDynamicsCommand::None)
    }

    pub fn set_dynamics(&mut self, column: usize, command: ContinuousDynamicsCommand) {
        if let Some(slot) = self.dynamics.get_mut(column) {
            *slot = command;
        }
    }

    pub fn dynamics_commands(&self) -> &[ContinuousDynamicsCommand] {
        &self.dynamics
    }

    /// Reset every cell to the empty command without reallocating.
    pub fn clear(&mut self) {
        self.notes.fill(NoteCommand::None);
        self.dynamics.fill(ContinuousDynamicsCommand::None);
    }
}
