//! A score together with the editors that mutate it.

use gs_ir::{ContinuousDynamicsCommand, NoteCommand, Range, ScoreData, NUM_VOICES};
use tracing::debug;

use crate::dynamics_editor::DynamicsEditor;
use crate::error::EditorError;
use crate::interaction::NoteGesture;
use crate::note_editor::NoteEditor;
use crate::updates::{CallbackKey, DynamicsCell, NoteCell};

/// Owns the score and routes pointer gestures to the right editor.
///
/// At most one interaction is active across both editors: starting a
/// gesture ends whatever was in progress.
pub struct ScoreEditor {
    score: ScoreData,
    active_voice: usize,
    notes: NoteEditor,
    dynamics: DynamicsEditor,
}

impl ScoreEditor {
    pub fn new(length: usize) -> Self {
        Self::from_score(ScoreData::new(length))
    }

    /// Wrap existing score data. Hairpins are derived immediately.
    pub fn from_score(score: ScoreData) -> Self {
        let dynamics = DynamicsEditor::new(&score);
        Self {
            score,
            active_voice: 0,
            notes: NoteEditor::new(),
            dynamics,
        }
    }

    pub fn score(&self) -> &ScoreData {
        &self.score
    }

    pub fn set_bpm(&mut self, bpm: f64) -> Result<(), EditorError> {
        if !bpm.is_finite() || bpm <= 0.0 {
            return Err(EditorError::InvalidTempo);
        }
        self.score.bpm = bpm;
        Ok(())
    }

    pub fn active_voice(&self) -> usize {
        self.active_voice
    }

    pub fn set_active_voice(&mut self, voice: usize) -> Result<(), EditorError> {
        if voice >= NUM_VOICES {
            return Err(EditorError::UnknownVoice(voice));
        }
        self.active_voice = voice;
        Ok(())
    }

    pub fn snap_interval(&self) -> usize {
        self.notes.snap().interval()
    }

    pub fn set_snap_interval(&mut self, interval: usize) -> Result<(), EditorError> {
        self.notes.set_snap_interval(interval)
    }

    pub fn note_editor(&self) -> &NoteEditor {
        &self.notes
    }

    pub fn dynamics_editor(&self) -> &DynamicsEditor {
        &self.dynamics
    }

    pub fn is_interacting(&self) -> bool {
        self.notes.is_interacting() || self.dynamics.is_interacting()
    }

    /// Start a note drag for the active voice.
    pub fn start_note_interaction(&mut self, column: usize, pitch: usize, gesture: NoteGesture) {
        self.end_interaction();
        self.notes
            .start_interaction(&mut self.score, self.active_voice, column, pitch, gesture);
    }

    /// Start painting dynamics for the active voice.
    pub fn start_dynamics_interaction(&mut self, column: usize, command: ContinuousDynamicsCommand) {
        self.end_interaction();
        self.dynamics
            .start_interaction(&mut self.score, self.active_voice, column, command);
    }

    /// Pointer entered `column` during a drag.
    pub fn mouse_enter_column(&mut self, column: usize) {
        if self.notes.is_interacting() {
            self.notes.move_interaction_to(&mut self.score, column);
        } else if self.dynamics.is_interacting() {
            self.dynamics.move_interaction_to(&mut self.score, column);
        }
    }

    /// Pointer released or focus lost. Safe to call when idle.
    pub fn end_interaction(&mut self) {
        self.notes.end_interaction();
        self.dynamics.end_interaction();
    }

    pub fn clear_notes(&mut self) {
        self.end_interaction();
        self.notes.clear_notes(&mut self.score);
    }

    /// Erase all notes and dynamics, keeping the length.
    pub fn clear_score(&mut self) {
        debug!(length = self.score.len(), "clearing score");
        self.end_interaction();
        self.notes.clear_notes(&mut self.score);
        self.dynamics.clear_all(&mut self.score);
    }

    /// Start over with an empty score of `length` columns.
    ///
    /// Cells are cleared through the editors first so their redraw
    /// callbacks fire.
    pub fn resize(&mut self, length: usize) {
        self.clear_score();
        if length == self.score.len() {
            return;
        }
        debug!(from = self.score.len(), to = length, "resizing score");
        self.score.resize(length);
        self.dynamics.rebuild(&self.score);
    }

    pub fn note(&self, voice: usize, column: usize, pitch: usize) -> NoteCommand {
        self.score.note(voice, column, pitch)
    }

    pub fn dynamics(&self, voice: usize, column: usize) -> ContinuousDynamicsCommand {
        self.dynamics.command(&self.score, voice, column)
    }

    pub fn hairpin(&self, voice: usize, column: usize) -> Option<Range> {
        self.dynamics.hairpin(voice, column)
    }

    pub fn register_note_callback(&mut self, cell: NoteCell, callback: impl FnMut() + 'static) -> CallbackKey {
        self.notes.register_callback(cell, callback)
    }

    pub fn unregister_note_callback(&mut self, key: CallbackKey) -> bool {
        self.notes.unregister_callback(key)
    }

    pub fn register_dynamics_callback(
        &mut self,
        cell: DynamicsCell,
        callback: impl FnMut() + 'static,
    ) -> CallbackKey {
        self.dynamics.register_callback(cell, callback)
    }

    pub fn unregister_dynamics_callback(&mut self, key: CallbackKey) -> bool {
        self.dynamics.unregister_callback(key)
    }
}
